use std::sync::{Arc, Mutex};

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use crate::dataset::CarvanaDataset;
use crate::error::PipelineError;
use crate::thread_pool::ThreadPool;
use crate::transform::TransformPipeline;

use super::config::LoaderConfig;
use super::iter::BatchIter;

/// Hands out one prefetched batch stream per epoch over a fixed dataset.
///
/// The dataset itself is never reordered; each epoch draws a fresh index
/// permutation (when shuffling) and fresh per-sample crop seeds from the
/// loader RNG, so a fixed `shuffle_seed` pins the whole run.
pub struct BatchLoader {
    dataset: Arc<CarvanaDataset>,
    pipeline: Arc<TransformPipeline>,
    config: LoaderConfig,
    thread_pool: Arc<ThreadPool>,
    rng: Arc<Mutex<StdRng>>,
    seed: u64,
}

impl BatchLoader {
    pub fn new(
        dataset: CarvanaDataset,
        pipeline: TransformPipeline,
        config: LoaderConfig,
    ) -> Self {
        let seed = config
            .shuffle_seed
            .unwrap_or_else(|| rand::thread_rng().gen());

        BatchLoader {
            dataset: Arc::new(dataset),
            pipeline: Arc::new(pipeline),
            thread_pool: Arc::new(ThreadPool::new(config.workers)),
            rng: Arc::new(Mutex::new(StdRng::seed_from_u64(seed))),
            config,
            seed,
        }
    }

    pub fn len(&self) -> usize {
        self.dataset.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dataset.is_empty()
    }

    pub fn config(&self) -> &LoaderConfig {
        &self.config
    }

    pub fn dataset(&self) -> &CarvanaDataset {
        &self.dataset
    }

    /// The seed actually in use, drawn from entropy when the config left it
    /// unset.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn num_batches(&self) -> usize {
        num_batches(self.len(), self.config.batch_size, self.config.drop_last)
    }

    /// Start one full pass over the dataset. Batches are decoded and
    /// transformed ahead of the consumer; `next()` blocks only when the next
    /// batch is not ready yet.
    pub fn epoch_iter(&self) -> Result<BatchIter, PipelineError> {
        let (order, seeds) = {
            let mut rng = self.rng.lock().map_err(|_| PipelineError::RngLock)?;
            let order = epoch_order(self.len(), self.config.shuffle, &mut rng);
            let seeds: Vec<u64> = (0..order.len()).map(|_| rng.gen()).collect();
            (order, seeds)
        };

        Ok(BatchIter::spawn(
            Arc::clone(&self.dataset),
            Arc::clone(&self.pipeline),
            Arc::clone(&self.thread_pool),
            order,
            seeds,
            self.config.batch_size,
            self.config.drop_last,
            self.config.prefetch,
        ))
    }
}

pub(crate) fn num_batches(len: usize, batch_size: usize, drop_last: bool) -> usize {
    if drop_last {
        len / batch_size
    } else {
        len.div_ceil(batch_size)
    }
}

pub(crate) fn epoch_order(len: usize, shuffle: bool, rng: &mut StdRng) -> Vec<usize> {
    let mut indices: Vec<usize> = (0..len).collect();
    if shuffle {
        indices.shuffle(rng);
    }
    indices
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn num_batches_rounds_up_unless_dropping() {
        assert_eq!(num_batches(10, 4, false), 3);
        assert_eq!(num_batches(10, 4, true), 2);
        assert_eq!(num_batches(8, 4, false), 2);
        assert_eq!(num_batches(3, 4, false), 1);
        assert_eq!(num_batches(3, 4, true), 0);
    }

    #[test]
    fn unshuffled_order_is_identity() {
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(epoch_order(5, false, &mut rng), vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn shuffled_order_is_a_permutation_and_varies() {
        let mut rng = StdRng::seed_from_u64(727);
        let first = epoch_order(32, true, &mut rng);
        let second = epoch_order(32, true, &mut rng);

        let mut sorted = first.clone();
        sorted.sort_unstable();
        assert_eq!(sorted, (0..32).collect::<Vec<_>>());
        assert_ne!(first, second);
    }
}
