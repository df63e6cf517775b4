pub mod participant;
pub mod quiz;
pub mod quiz_attempt;
pub mod refresh_token;
pub mod session;
pub mod user;

pub use participant::SessionParticipant;
pub use quiz::{Answer, Difficulty, Question, Quiz, SourceKind};
pub use quiz_attempt::QuizAttempt;
pub use refresh_token::RefreshToken;
pub use session::{QuizSession, SessionStatus};
pub use user::{User, UserRole};
