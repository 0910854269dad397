pub mod carvana;
pub mod sample;

pub use carvana::{CarvanaDataset, DatasetSplit};
pub use sample::{Sample, SamplePaths, Tensor};
