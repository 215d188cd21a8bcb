//! The personality quiz: answer tally, result resolution and the engine
//! driving one attempt.

mod engine;
mod resolver;
mod tally;
mod view;

pub use engine::{AnswerOutcome, AttemptStart, QuizEngine, QuizState};
pub use resolver::{resolve, try_resolve};
pub use tally::AnswerTally;
pub use view::QuizView;
