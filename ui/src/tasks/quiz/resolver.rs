//! Picks the winning category of a finished tally.
//!
//! Categories are scanned in the order they were first answered and a later
//! category only takes the lead with a strictly greater count, so ties go to
//! whichever category the participant picked first.

use crate::core::content::CategoryTag;

use super::tally::AnswerTally;

/// Winning category of a complete tally.
///
/// # Panics
///
/// When the tally is empty or has not recorded exactly `question_count`
/// answers. Both mean the caller resolved too early.
pub fn resolve(tally: &AnswerTally, question_count: usize) -> CategoryTag {
    assert!(
        !tally.is_empty(),
        "cannot resolve a result from an empty tally"
    );
    assert!(
        tally.is_complete(question_count),
        "cannot resolve a result after {} of {question_count} answers",
        tally.answered()
    );
    match tally.leader() {
        Some(tag) => {
            tracing::info!(category = %tag, question_count, "quiz result resolved");
            tag.clone()
        }
        None => unreachable!("non-empty tally always has a leader"),
    }
}

/// Non-panicking lookup; `None` until the tally is complete.
pub fn try_resolve(tally: &AnswerTally, question_count: usize) -> Option<CategoryTag> {
    if tally.is_empty() || !tally.is_complete(question_count) {
        return None;
    }
    tally.leader().cloned()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tally_of(answers: &[&str]) -> AnswerTally {
        let mut tally = AnswerTally::new();
        for answer in answers {
            tally.record(&CategoryTag::from(*answer));
        }
        tally
    }

    #[test]
    fn two_way_tie_goes_to_first_inserted() {
        let tally = tally_of(&["A", "B", "A", "B"]);
        assert_eq!(resolve(&tally, 4).as_str(), "A");
    }

    #[test]
    fn later_equal_score_does_not_overwrite_leader() {
        let tally = tally_of(&["A", "B", "C", "A", "B", "C", "B", "C"]);
        assert_eq!(tally.count("A"), 2);
        assert_eq!(tally.count("B"), 3);
        assert_eq!(tally.count("C"), 3);
        assert_eq!(resolve(&tally, 8).as_str(), "B");
    }

    #[test]
    fn strictly_greater_later_count_wins() {
        let tally = tally_of(&["A", "B", "B"]);
        assert_eq!(resolve(&tally, 3).as_str(), "B");
    }

    #[test]
    fn order_is_first_appearance_not_alphabetical() {
        let tally = tally_of(&["zebra", "alpha", "alpha", "zebra"]);
        assert_eq!(resolve(&tally, 4).as_str(), "zebra");
    }

    #[test]
    #[should_panic(expected = "empty tally")]
    fn empty_tally_fails_loudly() {
        resolve(&AnswerTally::new(), 0);
    }

    #[test]
    #[should_panic(expected = "after 2 of 6 answers")]
    fn incomplete_tally_fails_loudly() {
        resolve(&tally_of(&["A", "B"]), 6);
    }

    #[test]
    fn try_resolve_waits_for_completion() {
        let tally = tally_of(&["A", "B"]);
        assert_eq!(try_resolve(&tally, 3), None);
        assert_eq!(try_resolve(&AnswerTally::new(), 0), None);
        assert_eq!(try_resolve(&tally, 2), Some(CategoryTag::from("A")));
    }
}
