mod home;
pub use home::Home;

mod quiz;
pub use quiz::Question;

mod result;
pub use result::Outcome;
