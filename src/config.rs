//! Run configuration

use crate::engine::ExecutionModel;
use crate::error::EngineError;

/// Parameters for one benchmark run.
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Total sequence length N
    pub numints: usize,

    /// Number of timed repetitions of the compute core
    pub numiterations: usize,

    /// Number of workers P
    pub workers: usize,

    /// Execution model to drive the run with
    pub model: ExecutionModel,

    /// Also print the input and result sequences
    pub write_outputs: bool,

    /// Seed for the synthetic input; a fixed seed makes re-runs reproducible
    pub seed: Option<u64>,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            numints: 1024,
            numiterations: 1,
            workers: num_cpus::get(), // Use all available cores
            model: ExecutionModel::Shared,
            write_outputs: false,
            seed: None,
        }
    }
}

impl RunConfig {
    /// Check that every parameter is usable before any work starts.
    pub fn validate(&self) -> Result<(), EngineError> {
        if self.numints == 0 {
            return Err(EngineError::Usage("numints must be positive".into()));
        }
        if self.numiterations == 0 {
            return Err(EngineError::Usage("numiterations must be positive".into()));
        }
        if self.workers == 0 {
            return Err(EngineError::Usage("worker count must be positive".into()));
        }
        Ok(())
    }

    /// Partition length `ceil(numints / workers)`, reported in the run summary.
    pub fn numints_per_worker(&self) -> usize {
        crate::partition::chunk_len(self.numints, self.workers)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_uses_all_cores() {
        let config = RunConfig::default();
        assert!(config.workers >= 1);
        assert_eq!(config.model, ExecutionModel::Shared);
    }

    #[test]
    fn test_validate_rejects_zero_parameters() {
        let mut config = RunConfig::default();
        config.numints = 0;
        assert!(matches!(config.validate(), Err(EngineError::Usage(_))));

        let mut config = RunConfig::default();
        config.numiterations = 0;
        assert!(matches!(config.validate(), Err(EngineError::Usage(_))));

        let mut config = RunConfig::default();
        config.workers = 0;
        assert!(matches!(config.validate(), Err(EngineError::Usage(_))));
    }
}
