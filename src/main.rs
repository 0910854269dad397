use std::env;

use anyhow::Result;
use tracing_subscriber::EnvFilter;

use carseg::dataset::{CarvanaDataset, DatasetSplit};
use carseg::loader::{log_loader_info, BatchLoader, LoaderConfig, SampleBatch};
use carseg::train::{BatchStep, EpochDriver, PreviewLogger, TrainConfig};
use carseg::transform::TransformPipeline;

const SHORTER_SIDE: u32 = 256;
const CROP_SIZE: u32 = 256;

/// Pulls every batch without updating anything; the place a model step
/// plugs in.
struct DryRunStep;

impl BatchStep for DryRunStep {
    fn on_batch(&mut self, epoch: usize, batch: &SampleBatch) -> Result<()> {
        tracing::debug!(
            "epoch {} batch {}: {} samples",
            epoch + 1,
            batch.batch_number,
            batch.len(),
        );
        Ok(())
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("carseg=info".parse()?))
        .init();

    let root = env::args().nth(1).unwrap_or_else(|| "./data".to_string());

    let dataset = CarvanaDataset::new(&root, DatasetSplit::Train)?;
    let pipeline = TransformPipeline::training(SHORTER_SIDE, CROP_SIZE);
    let config = LoaderConfig {
        batch_size: 8,
        ..LoaderConfig::default()
    }
    .build()?;

    let loader = BatchLoader::new(dataset, pipeline, config);
    log_loader_info(&loader);

    let driver = EpochDriver::new(TrainConfig::default().build()?);
    driver.run(&loader, &mut DryRunStep, &mut PreviewLogger)
}
