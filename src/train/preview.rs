use crate::loader::SampleBatch;

/// Side observer called once per batch, before the model step. Meant for
/// inspection hooks like image previews; it must never influence the
/// pipeline.
pub trait BatchObserver {
    fn on_batch(&mut self, epoch: usize, batch: &SampleBatch);
}

pub struct NullObserver;

impl BatchObserver for NullObserver {
    fn on_batch(&mut self, _epoch: usize, _batch: &SampleBatch) {}
}

/// Logs first-sample statistics per batch for eyeballing the stream.
#[derive(Default)]
pub struct PreviewLogger;

impl BatchObserver for PreviewLogger {
    fn on_batch(&mut self, epoch: usize, batch: &SampleBatch) {
        let image = batch.image(0);
        let mask = batch.mask(0);

        let mean = image.iter().sum::<f32>() / image.len() as f32;
        let coverage = mask.iter().filter(|&&v| v > 0.5).count() as f32 / mask.len() as f32;

        tracing::debug!(
            "epoch {} batch {}: image mean {:.3}, mask coverage {:.1}%",
            epoch + 1,
            batch.batch_number,
            mean,
            coverage * 100.0,
        );
    }
}
