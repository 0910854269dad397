use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Condvar, Mutex};
use std::thread;

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::dataset::{Sample, SamplePaths};
use crate::error::PipelineError;
use crate::transform::TransformPipeline;

pub enum WorkType {
    LoadSample {
        paths: SamplePaths,
        pipeline: Arc<TransformPipeline>,
        seed: u64,
    },
}

pub enum WorkResult {
    LoadSample(Result<Sample, PipelineError>),
}

#[derive(Clone)]
pub struct WorkFuture {
    state: Arc<(Mutex<Option<WorkResult>>, Condvar)>,
}

impl WorkFuture {
    pub fn new() -> Self {
        WorkFuture {
            state: Arc::new((Mutex::new(None), Condvar::new())),
        }
    }

    pub fn wait(self) -> WorkResult {
        let (lock, cvar) = &*self.state;
        let mut result = lock.lock().unwrap();
        while result.is_none() {
            result = cvar.wait(result).unwrap();
        }
        result.take().unwrap()
    }

    pub fn complete(&self, result: WorkResult) {
        let (lock, cvar) = &*self.state;
        *lock.lock().unwrap() = Some(result);
        cvar.notify_one();
    }
}

impl Default for WorkFuture {
    fn default() -> Self {
        Self::new()
    }
}

pub struct WorkItem {
    pub work: WorkType,
    pub future: WorkFuture,
}

pub struct WorkQueue {
    pub queue: Mutex<VecDeque<WorkItem>>,
    pub items_count: AtomicUsize,
    pub condvar: Condvar,
}

impl WorkQueue {
    fn wait_and_get_next_work(&self) -> Option<WorkItem> {
        let mut queue = self.queue.lock().unwrap();
        while self.items_count.load(Ordering::SeqCst) == 0 {
            queue = self.condvar.wait(queue).unwrap();
        }

        let item = queue.pop_front();
        if item.is_some() {
            self.items_count.fetch_sub(1, Ordering::SeqCst);
        }
        item
    }
}

/// Futures for one submitted batch, in submission order.
pub struct WorkFutureBatch {
    pub futures: Vec<WorkFuture>,
}

impl WorkFutureBatch {
    pub fn wait(self) -> Vec<WorkResult> {
        self.futures
            .into_iter()
            .map(|future| future.wait())
            .collect()
    }
}

pub struct Worker {
    _handle: thread::JoinHandle<()>,
}

impl Worker {
    pub fn new(id: usize, work_queue: Arc<WorkQueue>) -> Worker {
        let handle = thread::spawn(move || {
            tracing::trace!("loader worker {id} started");
            loop {
                if let Some(work_item) = work_queue.wait_and_get_next_work() {
                    Self::process_work(work_item);
                }
            }
        });

        Worker { _handle: handle }
    }

    fn process_work(work_item: WorkItem) {
        let result = match work_item.work {
            WorkType::LoadSample {
                paths,
                pipeline,
                seed,
            } => {
                let mut rng = StdRng::seed_from_u64(seed);
                WorkResult::LoadSample(pipeline.load_sample(&paths, &mut rng))
            }
        };

        work_item.future.complete(result);
    }
}
