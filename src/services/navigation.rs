use std::collections::{HashMap, HashSet};

/// Practice-mode question pointer. Tracks the participant's position, their
/// single-select choices, and which questions are locked because the answer
/// was revealed or the whole run was submitted.
///
/// Locked-question selection attempts are silent no-ops, not errors.
#[derive(Debug, Clone)]
pub struct QuizNavigation {
    question_ids: Vec<String>,
    current_index: usize,
    flagged: HashSet<usize>,
    selections: HashMap<String, String>,
    locked: HashSet<String>,
    submitted: bool,
}

impl QuizNavigation {
    pub fn new(question_ids: Vec<String>) -> Self {
        QuizNavigation {
            question_ids,
            current_index: 0,
            flagged: HashSet::new(),
            selections: HashMap::new(),
            locked: HashSet::new(),
            submitted: false,
        }
    }

    pub fn len(&self) -> usize {
        self.question_ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.question_ids.is_empty()
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn current_question_id(&self) -> Option<&str> {
        self.question_ids.get(self.current_index).map(|s| s.as_str())
    }

    /// Advances the pointer; blocked at the last question.
    pub fn next(&mut self) {
        if self.current_index + 1 < self.question_ids.len() {
            self.current_index += 1;
        }
    }

    /// Moves the pointer back; blocked at the first question.
    pub fn previous(&mut self) {
        if self.current_index > 0 {
            self.current_index -= 1;
        }
    }

    /// Jumps to any valid index; out-of-range jumps are ignored.
    pub fn jump(&mut self, index: usize) {
        if index < self.question_ids.len() {
            self.current_index = index;
        }
    }

    /// Flags are purely for the participant's own review and never affect
    /// scoring.
    pub fn toggle_flag(&mut self, index: usize) {
        if index >= self.question_ids.len() {
            return;
        }
        if !self.flagged.remove(&index) {
            self.flagged.insert(index);
        }
    }

    pub fn is_flagged(&self, index: usize) -> bool {
        self.flagged.contains(&index)
    }

    /// Records a single-select choice, overwriting any earlier one. Ignored
    /// once the question is revealed or the navigation is submitted.
    pub fn select_answer(&mut self, question_id: &str, answer_id: &str) {
        if self.submitted || self.locked.contains(question_id) {
            return;
        }
        if !self.question_ids.iter().any(|q| q == question_id) {
            return;
        }
        self.selections
            .insert(question_id.to_string(), answer_id.to_string());
    }

    pub fn selection(&self, question_id: &str) -> Option<&str> {
        self.selections.get(question_id).map(|s| s.as_str())
    }

    /// Reveals the answer for a question, freezing its selection.
    pub fn reveal(&mut self, question_id: &str) {
        if self.question_ids.iter().any(|q| q == question_id) {
            self.locked.insert(question_id.to_string());
        }
    }

    pub fn is_revealed(&self, question_id: &str) -> bool {
        self.locked.contains(question_id)
    }

    /// Final submit: all further selections become no-ops.
    pub fn submit(&mut self) {
        self.submitted = true;
    }

    pub fn is_submitted(&self) -> bool {
        self.submitted
    }

    pub fn selections(&self) -> &HashMap<String, String> {
        &self.selections
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn nav(n: usize) -> QuizNavigation {
        QuizNavigation::new((0..n).map(|i| format!("q{}", i)).collect())
    }

    #[test]
    fn next_blocked_at_last_question() {
        let mut n = nav(3);

        n.next();
        n.next();
        assert_eq!(n.current_index(), 2);

        n.next();
        assert_eq!(n.current_index(), 2);
    }

    #[test]
    fn previous_blocked_at_first_question() {
        let mut n = nav(3);

        n.previous();
        assert_eq!(n.current_index(), 0);

        n.next();
        n.previous();
        assert_eq!(n.current_index(), 0);
    }

    #[test]
    fn jump_to_valid_index_only() {
        let mut n = nav(5);

        n.jump(4);
        assert_eq!(n.current_index(), 4);

        n.jump(99);
        assert_eq!(n.current_index(), 4);
    }

    #[test]
    fn toggle_flag_is_reversible_and_scoring_neutral() {
        let mut n = nav(3);

        n.toggle_flag(1);
        assert!(n.is_flagged(1));

        n.toggle_flag(1);
        assert!(!n.is_flagged(1));

        assert!(n.selections().is_empty());
    }

    #[test]
    fn select_answer_overwrites_previous_choice() {
        let mut n = nav(2);

        n.select_answer("q0", "a1");
        n.select_answer("q0", "a2");

        assert_eq!(n.selection("q0"), Some("a2"));
    }

    #[test]
    fn reveal_locks_further_selection() {
        let mut n = nav(2);
        n.select_answer("q0", "a1");

        n.reveal("q0");
        n.select_answer("q0", "a2");

        assert_eq!(n.selection("q0"), Some("a1"));
        // other questions remain selectable
        n.select_answer("q1", "a3");
        assert_eq!(n.selection("q1"), Some("a3"));
    }

    #[test]
    fn submit_locks_all_questions() {
        let mut n = nav(2);
        n.select_answer("q0", "a1");

        n.submit();
        n.select_answer("q0", "a2");
        n.select_answer("q1", "a3");

        assert_eq!(n.selection("q0"), Some("a1"));
        assert!(n.selection("q1").is_none());
    }

    #[test]
    fn unknown_question_selection_is_ignored() {
        let mut n = nav(1);

        n.select_answer("nope", "a1");
        assert!(n.selections().is_empty());
    }

    #[test]
    fn empty_quiz_is_representable() {
        let mut n = nav(0);

        assert!(n.is_empty());
        assert!(n.current_question_id().is_none());
        n.next();
        n.previous();
        n.jump(0);
        assert_eq!(n.current_index(), 0);
    }
}
