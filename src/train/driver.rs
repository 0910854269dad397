use anyhow::Result;

use crate::loader::{BatchLoader, SampleBatch};

use super::config::TrainConfig;
use super::preview::BatchObserver;

/// The per-batch model update, supplied by the caller so the driver stays
/// agnostic of any particular model or optimizer.
pub trait BatchStep {
    fn on_batch(&mut self, epoch: usize, batch: &SampleBatch) -> Result<()>;
}

/// Counted epoch-by-batch loop over a [`BatchLoader`].
pub struct EpochDriver {
    config: TrainConfig,
}

impl EpochDriver {
    pub fn new(config: TrainConfig) -> Self {
        EpochDriver { config }
    }

    pub fn config(&self) -> &TrainConfig {
        &self.config
    }

    /// Drive the loader end-to-end for the configured number of epochs,
    /// invoking the observer and then the step once per batch. The first
    /// loader or step error ends the run.
    pub fn run(
        &self,
        loader: &BatchLoader,
        step: &mut dyn BatchStep,
        observer: &mut dyn BatchObserver,
    ) -> Result<()> {
        for epoch in 0..self.config.epochs {
            let mut batches = 0usize;
            let mut samples = 0usize;

            for batch in loader.epoch_iter()? {
                let batch = batch?;
                observer.on_batch(epoch, &batch);
                step.on_batch(epoch, &batch)?;
                batches += 1;
                samples += batch.len();
            }

            tracing::info!(
                "epoch {}/{}: {} batches, {} samples",
                epoch + 1,
                self.config.epochs,
                batches,
                samples,
            );
        }

        Ok(())
    }
}
