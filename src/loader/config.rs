use crate::error::PipelineError;

#[derive(Debug)]
pub struct LoaderConfig {
    pub batch_size: usize,
    /// Threads decoding and transforming samples.
    pub workers: usize,
    /// Assembled batches buffered ahead of the consumer.
    pub prefetch: usize,
    pub shuffle: bool,
    pub shuffle_seed: Option<u64>,
    pub drop_last: bool,
}

impl LoaderConfig {
    pub fn build(self) -> Result<Self, PipelineError> {
        if self.batch_size == 0 {
            return Err(PipelineError::InvalidConfig(
                "batch_size must be non-zero".into(),
            ));
        }
        if self.workers == 0 {
            return Err(PipelineError::InvalidConfig(
                "workers must be non-zero".into(),
            ));
        }
        if self.prefetch == 0 {
            return Err(PipelineError::InvalidConfig(
                "prefetch must be non-zero".into(),
            ));
        }

        Ok(self)
    }
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            batch_size: 8,
            workers: num_cpus::get(),
            prefetch: 4,
            shuffle: true,
            shuffle_seed: None,
            drop_last: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_builds() {
        assert!(LoaderConfig::default().build().is_ok());
    }

    #[test]
    fn zero_batch_size_is_rejected() {
        let err = LoaderConfig {
            batch_size: 0,
            ..LoaderConfig::default()
        }
        .build()
        .unwrap_err();
        assert!(matches!(err, PipelineError::InvalidConfig(_)));
    }

    #[test]
    fn zero_prefetch_is_rejected() {
        let err = LoaderConfig {
            prefetch: 0,
            ..LoaderConfig::default()
        }
        .build()
        .unwrap_err();
        assert!(matches!(err, PipelineError::InvalidConfig(_)));
    }
}
