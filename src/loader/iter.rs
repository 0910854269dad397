use std::sync::Arc;
use std::thread;

use crossbeam_channel::{bounded, Receiver};

use crate::dataset::CarvanaDataset;
use crate::error::PipelineError;
use crate::thread_pool::{ThreadPool, WorkResult, WorkType};
use crate::transform::TransformPipeline;

use super::batch::SampleBatch;

/// One epoch's batch stream, assembled ahead of the consumer by a producer
/// thread and handed over through a bounded channel.
pub struct BatchIter {
    receiver: Receiver<Result<SampleBatch, PipelineError>>,
}

impl BatchIter {
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn spawn(
        dataset: Arc<CarvanaDataset>,
        pipeline: Arc<TransformPipeline>,
        thread_pool: Arc<ThreadPool>,
        order: Vec<usize>,
        seeds: Vec<u64>,
        batch_size: usize,
        drop_last: bool,
        prefetch: usize,
    ) -> Self {
        let (sender, receiver) = bounded(prefetch);

        thread::spawn(move || {
            let mut batch_number = 0;
            for (chunk, chunk_seeds) in order.chunks(batch_size).zip(seeds.chunks(batch_size)) {
                if drop_last && chunk.len() < batch_size {
                    break;
                }

                let work = chunk
                    .iter()
                    .zip(chunk_seeds)
                    .map(|(&index, &seed)| WorkType::LoadSample {
                        paths: dataset.pair(index).clone(),
                        pipeline: Arc::clone(&pipeline),
                        seed,
                    })
                    .collect();

                let results = thread_pool.submit_batch(work).wait();
                let outcome = assemble(results, chunk, batch_number);
                let failed = outcome.is_err();

                // A dropped receiver means the consumer walked away early.
                if sender.send(outcome).is_err() || failed {
                    break;
                }

                tracing::trace!("batch {batch_number} ready ({} samples)", chunk.len());
                batch_number += 1;
            }
        });

        BatchIter { receiver }
    }
}

fn assemble(
    results: Vec<WorkResult>,
    indices: &[usize],
    batch_number: usize,
) -> Result<SampleBatch, PipelineError> {
    let mut samples = Vec::with_capacity(results.len());
    for result in results {
        match result {
            WorkResult::LoadSample(Ok(sample)) => samples.push(sample),
            WorkResult::LoadSample(Err(err)) => return Err(err),
        }
    }

    SampleBatch::stack(samples, indices.to_vec(), batch_number)
}

impl Iterator for BatchIter {
    type Item = Result<SampleBatch, PipelineError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.receiver.recv().ok()
    }
}
