use crate::models::domain::{QuizAttempt, SessionParticipant};
use crate::models::dto::response::LeaderboardEntry;
use crate::services::scoring;

/// Ranks completed participants: score descending, then time_taken
/// ascending, then joined_at, then id. The trailing keys keep the order
/// total so repeated sorts of the same input are identical.
pub fn rank_participants(participants: &[SessionParticipant]) -> Vec<LeaderboardEntry> {
    let mut completed: Vec<&SessionParticipant> =
        participants.iter().filter(|p| p.completed).collect();

    completed.sort_by(|a, b| {
        b.score
            .cmp(&a.score)
            .then_with(|| time_of(a).cmp(&time_of(b)))
            .then_with(|| a.joined_at.cmp(&b.joined_at))
            .then_with(|| a.id.cmp(&b.id))
    });

    completed
        .into_iter()
        .enumerate()
        .map(|(index, p)| LeaderboardEntry {
            rank: index + 1,
            display_name: p.display_name.clone(),
            score: p.score,
            max_score: p.max_score,
            accuracy: scoring::accuracy(p.score, p.max_score),
            time_taken_seconds: time_of(p),
        })
        .collect()
}

/// Practice-mode counterpart: ranks a user pool of completed attempts for a
/// quiz with the same ordering rule.
pub fn rank_attempts(attempts: &[QuizAttempt]) -> Vec<LeaderboardEntry> {
    let mut completed: Vec<&QuizAttempt> = attempts.iter().filter(|a| a.completed).collect();

    completed.sort_by(|a, b| {
        b.score
            .cmp(&a.score)
            .then_with(|| attempt_time(a).cmp(&attempt_time(b)))
            .then_with(|| a.started_at.cmp(&b.started_at))
            .then_with(|| a.id.cmp(&b.id))
    });

    completed
        .into_iter()
        .enumerate()
        .map(|(index, a)| LeaderboardEntry {
            rank: index + 1,
            display_name: a.user_id.clone(),
            score: a.score,
            max_score: a.max_score,
            accuracy: scoring::accuracy(a.score, a.max_score),
            time_taken_seconds: attempt_time(a),
        })
        .collect()
}

fn time_of(p: &SessionParticipant) -> i64 {
    p.time_taken_seconds.unwrap_or(i64::MAX)
}

fn attempt_time(a: &QuizAttempt) -> i64 {
    a.time_taken_seconds.unwrap_or(i64::MAX)
}
