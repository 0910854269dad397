pub mod batch;
pub mod config;
pub mod info;
pub mod iter;
pub mod loader;

pub use batch::SampleBatch;
pub use config::LoaderConfig;
pub use info::log_loader_info;
pub use iter::BatchIter;
pub use loader::BatchLoader;
