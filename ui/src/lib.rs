//! Shared crate for Yuletype: quiz logic, participant counting, result card
//! capture and export, plus the views every platform renders.

pub mod capture;
pub mod core;
pub mod results;
pub mod session;
pub mod tasks;
pub mod views;

pub mod components {
    pub mod nav;
    pub use nav::{register_nav, AppNavbar, NavBuilder};
}

pub use session::{CounterWiring, QuizProvider, QuizSession};
