//! A whole attempt: answers, result, participation counting and export.

use std::rc::Rc;
use std::sync::Arc;

use futures::executor::block_on;
use ui::capture::Display;
use ui::core::config::Settings;
use ui::core::content::ContentBank;
use ui::core::counter::{AtomicCounter, MemoryCounterBackend, TransactionalCounter};
use ui::core::participation::ParticipationGate;
use ui::core::storage::MemorySessionStore;
use ui::results::{build_result_card, png_artifact, MUSIC_CONTROLLER_ID};
use ui::tasks::quiz::{AnswerOutcome, AttemptStart, QuizEngine};

const KEY: &str = "participantCount";

fn session_gate(backend: &MemoryCounterBackend) -> ParticipationGate {
    let counter: Rc<dyn AtomicCounter> =
        Rc::new(TransactionalCounter::new(backend.clone(), 25));
    ParticipationGate::new(counter, Arc::new(MemorySessionStore::new()), KEY)
}

#[test]
fn six_host_answers_count_once_and_export() {
    let bank = ContentBank::embedded().unwrap();
    let settings = Settings::embedded().unwrap();
    let backend = MemoryCounterBackend::new();

    // Earlier visitors.
    for _ in 0..41 {
        block_on(session_gate(&backend).register_once()).unwrap();
    }
    let before = backend.value(KEY).unwrap();

    let gate = session_gate(&backend);
    let mut engine = QuizEngine::new(bank.len());
    assert_eq!(engine.begin_attempt(&gate), AttemptStart::Fresh);

    let mut last = AnswerOutcome::Ignored;
    for index in 0..bank.len() {
        let host = bank
            .question(index)
            .unwrap()
            .choices
            .iter()
            .find(|choice| choice.category.as_str() == "host")
            .unwrap();
        last = engine.answer(&host.category);
    }

    assert_eq!(engine.tally().count("host"), 6);
    assert_eq!(engine.tally().answered(), 6);
    let AnswerOutcome::Complete { category } = last else {
        panic!("quiz should be complete, got {last:?}");
    };
    assert_eq!(category.as_str(), "host");

    assert_eq!(block_on(gate.register_once()), Ok(Some(before + 1)));
    assert_eq!(block_on(gate.register_once()), Ok(None));
    assert_eq!(backend.value(KEY), Some(before + 1));

    let mut card = build_result_card(bank.result(category.as_str()).unwrap(), gate.ordinal());
    let before_export = card.clone();
    let mut export = settings.export.clone();
    export.static_scale = 0.5;
    let artifact = png_artifact(&mut card, &export, category.as_str()).unwrap();

    assert_eq!(artifact.mime, "image/png");
    assert_eq!(card, before_export);
    assert_eq!(
        card.find(MUSIC_CONTROLLER_ID).unwrap().display,
        Display::Shown
    );
}

#[test]
fn retaking_after_a_counted_result_counts_again() {
    let bank = ContentBank::embedded().unwrap();
    let backend = MemoryCounterBackend::new();
    let gate = session_gate(&backend);
    let mut engine = QuizEngine::new(bank.len());

    for _ in 0..2 {
        engine.begin_attempt(&gate);
        for index in 0..bank.len() {
            let choice = &bank.question(index).unwrap().choices[0];
            engine.answer(&choice.category);
        }
        assert!(engine.outcome().is_some());
        block_on(gate.register_once()).unwrap();
    }

    assert_eq!(backend.value(KEY), Some(2));
    assert_eq!(gate.ordinal(), Some(2));
}
