pub mod ops;
pub mod pipeline;

pub use ops::{CenterCrop, ImagePair, PairTransform, RandomCrop, Scale};
pub use pipeline::TransformPipeline;
