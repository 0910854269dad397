use crate::error::PipelineError;

/// Run-level settings, fixed before the driver starts.
///
/// The optimizer hyper-parameters are not consumed by the driver itself;
/// they travel here so a model-update step has one immutable place to read
/// them from.
#[derive(Debug, Clone)]
pub struct TrainConfig {
    pub epochs: usize,
    pub learning_rate: f64,
    pub momentum: f64,
    pub nesterov: bool,
}

impl TrainConfig {
    pub fn build(self) -> Result<Self, PipelineError> {
        if self.epochs == 0 {
            return Err(PipelineError::InvalidConfig("epochs must be non-zero".into()));
        }
        if self.learning_rate <= 0.0 {
            return Err(PipelineError::InvalidConfig(
                "learning_rate must be positive".into(),
            ));
        }

        Ok(self)
    }
}

impl Default for TrainConfig {
    fn default() -> Self {
        Self {
            epochs: 100,
            learning_rate: 1e-3,
            momentum: 0.9,
            nesterov: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_builds() {
        assert!(TrainConfig::default().build().is_ok());
    }

    #[test]
    fn zero_epochs_is_rejected() {
        let err = TrainConfig {
            epochs: 0,
            ..TrainConfig::default()
        }
        .build()
        .unwrap_err();
        assert!(matches!(err, PipelineError::InvalidConfig(_)));
    }
}
