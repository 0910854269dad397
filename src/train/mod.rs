pub mod config;
pub mod driver;
pub mod preview;

pub use config::TrainConfig;
pub use driver::{BatchStep, EpochDriver};
pub use preview::{BatchObserver, NullObserver, PreviewLogger};
