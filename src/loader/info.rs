use super::loader::BatchLoader;

/// Log a one-time summary of what an epoch over this loader looks like.
pub fn log_loader_info(loader: &BatchLoader) {
    let config = loader.config();
    let total = loader.len();
    let batches = loader.num_batches();
    let last_batch = total % config.batch_size;

    tracing::info!(
        "{:?} split at {}: {} samples",
        loader.dataset().split(),
        loader.dataset().root().display(),
        total,
    );
    tracing::info!(
        "{} batches of {} per epoch (last batch: {})",
        batches,
        config.batch_size,
        if last_batch == 0 || config.drop_last {
            config.batch_size
        } else {
            last_batch
        },
    );
    tracing::info!(
        "shuffle: {}, seed: {}, workers: {}, prefetch: {}",
        config.shuffle,
        loader.seed(),
        config.workers,
        config.prefetch,
    );
}
