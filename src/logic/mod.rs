pub mod compass;
pub mod dispatch;
pub mod normalize;
pub mod prompt;
pub mod report;
pub mod scheduler;

pub use dispatch::Notifier;
pub use scheduler::{RainForecaster, Summarizer, WindForecaster};
