pub mod generation_service;
pub mod leaderboard;
pub mod navigation;
pub mod quiz_attempt_service;
pub mod quiz_service;
pub mod scoring;
pub mod session_service;
pub mod session_worker;
pub mod source_service;
pub mod user_service;

pub use generation_service::GenerationService;
pub use quiz_attempt_service::QuizAttemptService;
pub use quiz_service::QuizService;
pub use session_service::SessionService;
pub use session_worker::SessionWorker;
pub use source_service::SourceService;
pub use user_service::UserService;
