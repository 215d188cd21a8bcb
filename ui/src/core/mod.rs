pub mod config;
pub mod content;
pub mod counter;
pub mod format;
pub mod participation;
pub mod platform;
pub mod storage;
pub mod timing;
