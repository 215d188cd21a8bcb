//! State machine for one quiz attempt.
//!
//! `InProgress { index }` advances one question per answer until the tally
//! holds an answer for every question, then resolves to `Complete`.

use crate::core::content::CategoryTag;
use crate::core::participation::ParticipationGate;

use super::resolver::resolve;
use super::tally::AnswerTally;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuizState {
    InProgress { index: usize },
    Complete { category: CategoryTag },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnswerOutcome {
    Next { index: usize },
    Complete { category: CategoryTag },
    /// Answer arrived after completion.
    Ignored,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttemptStart {
    Fresh,
    Resumed,
}

#[derive(Debug, Clone, PartialEq)]
pub struct QuizEngine {
    question_count: usize,
    tally: AnswerTally,
    state: QuizState,
}

impl QuizEngine {
    pub fn new(question_count: usize) -> Self {
        Self {
            question_count,
            tally: AnswerTally::new(),
            state: QuizState::InProgress { index: 0 },
        }
    }

    pub fn question_count(&self) -> usize {
        self.question_count
    }

    pub fn state(&self) -> &QuizState {
        &self.state
    }

    pub fn tally(&self) -> &AnswerTally {
        &self.tally
    }

    /// Index of the question awaiting an answer.
    pub fn current_index(&self) -> Option<usize> {
        match self.state {
            QuizState::InProgress { index } => Some(index),
            QuizState::Complete { .. } => None,
        }
    }

    pub fn outcome(&self) -> Option<&CategoryTag> {
        match &self.state {
            QuizState::Complete { category } => Some(category),
            QuizState::InProgress { .. } => None,
        }
    }

    pub fn answer(&mut self, category: &CategoryTag) -> AnswerOutcome {
        let QuizState::InProgress { index } = self.state else {
            tracing::debug!(category = %category, "answer after completion ignored");
            return AnswerOutcome::Ignored;
        };

        self.tally.record(category);
        tracing::debug!(index, category = %category, "answer recorded");

        if self.tally.is_complete(self.question_count) {
            let category = resolve(&self.tally, self.question_count);
            self.state = QuizState::Complete {
                category: category.clone(),
            };
            AnswerOutcome::Complete { category }
        } else {
            let index = index + 1;
            self.state = QuizState::InProgress { index };
            AnswerOutcome::Next { index }
        }
    }

    /// Enter the quiz. An attempt with answers already recorded is resumed
    /// untouched; anything else starts over.
    pub fn begin_attempt(&mut self, gate: &ParticipationGate) -> AttemptStart {
        let resumable =
            matches!(self.state, QuizState::InProgress { .. }) && !self.tally.is_empty();
        if resumable {
            tracing::debug!(answered = self.tally.answered(), "resuming quiz attempt");
            return AttemptStart::Resumed;
        }
        self.restart(gate);
        AttemptStart::Fresh
    }

    /// Start over from the first question. A participation already recorded
    /// is cleared so the new attempt may be counted.
    pub fn restart(&mut self, gate: &ParticipationGate) {
        self.tally.clear();
        self.state = QuizState::InProgress { index: 0 };
        if gate.is_counted() {
            gate.reset();
        }
        tracing::info!(questions = self.question_count, "quiz attempt started");
    }
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;
    use std::sync::Arc;

    use futures::executor::block_on;

    use super::*;
    use crate::core::counter::{MemoryCounterBackend, TransactionalCounter};
    use crate::core::participation::ParticipationState;
    use crate::core::storage::MemorySessionStore;

    fn gate() -> ParticipationGate {
        let counter = TransactionalCounter::new(MemoryCounterBackend::new(), 5);
        ParticipationGate::new(
            Rc::new(counter),
            Arc::new(MemorySessionStore::new()),
            "participantCount",
        )
    }

    fn tag(raw: &str) -> CategoryTag {
        CategoryTag::from(raw)
    }

    #[test]
    fn advances_then_completes() {
        let mut engine = QuizEngine::new(3);
        assert_eq!(engine.current_index(), Some(0));

        assert_eq!(engine.answer(&tag("a")), AnswerOutcome::Next { index: 1 });
        assert_eq!(engine.answer(&tag("b")), AnswerOutcome::Next { index: 2 });
        assert_eq!(
            engine.answer(&tag("b")),
            AnswerOutcome::Complete {
                category: tag("b")
            }
        );
        assert_eq!(engine.outcome(), Some(&tag("b")));
        assert_eq!(engine.current_index(), None);
    }

    #[test]
    fn answers_after_completion_are_ignored() {
        let mut engine = QuizEngine::new(1);
        engine.answer(&tag("a"));
        assert_eq!(engine.answer(&tag("b")), AnswerOutcome::Ignored);
        assert_eq!(engine.tally().answered(), 1);
    }

    #[test]
    fn fresh_attempt_after_counted_result_resets_gate() {
        let gate = gate();
        let mut engine = QuizEngine::new(1);
        assert_eq!(engine.begin_attempt(&gate), AttemptStart::Fresh);
        engine.answer(&tag("a"));
        assert_eq!(block_on(gate.register_once()), Ok(Some(1)));

        assert_eq!(engine.begin_attempt(&gate), AttemptStart::Fresh);
        assert_eq!(gate.state(), ParticipationState::NotCounted);
        assert!(engine.tally().is_empty());
        assert_eq!(block_on(gate.register_once()), Ok(Some(2)));
    }

    #[test]
    fn revisiting_in_progress_attempt_changes_nothing() {
        let gate = gate();
        let mut engine = QuizEngine::new(3);
        engine.begin_attempt(&gate);
        engine.answer(&tag("a"));

        // Counted earlier in this session, e.g. before a reload.
        assert_eq!(block_on(gate.register_once()), Ok(Some(1)));

        assert_eq!(engine.begin_attempt(&gate), AttemptStart::Resumed);
        assert_eq!(engine.current_index(), Some(1));
        assert!(gate.is_counted());
    }

    #[test]
    fn restart_leaves_uncounted_gate_alone() {
        let gate = gate();
        let mut engine = QuizEngine::new(2);
        engine.answer(&tag("a"));
        engine.restart(&gate);

        assert_eq!(engine.current_index(), Some(0));
        assert_eq!(gate.state(), ParticipationState::NotCounted);
        assert_eq!(gate.ordinal(), None);
    }
}
