pub mod dataset;
pub mod error;
pub mod loader;
pub mod thread_pool;
pub mod train;
pub mod transform;

pub use dataset::{CarvanaDataset, DatasetSplit, Sample, SamplePaths, Tensor};
pub use error::PipelineError;
pub use loader::{BatchIter, BatchLoader, LoaderConfig, SampleBatch};
pub use train::{BatchObserver, BatchStep, EpochDriver, NullObserver, PreviewLogger, TrainConfig};
pub use transform::{CenterCrop, PairTransform, RandomCrop, Scale, TransformPipeline};
