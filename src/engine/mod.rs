//! Execution engines
//!
//! One reduction/scan pipeline, three execution models behind a common
//! interface:
//!
//! - [`serial::SerialEngine`] — sequential baseline, no partitioning.
//! - [`shared::SharedEngine`] — shared-memory thread pool; workers operate
//!   on disjoint slices of one memory image.
//! - [`message::MessageEngine`] — private-memory ranks exchanging typed
//!   messages; nothing is shared but the channels.
//!
//! Every engine returns, together with its result, the wall-clock time of
//! the compute core only (local phase, collect, combine, broadcast,
//! add-back); input copying and distribution are excluded so the models
//! are comparable.

pub mod message;
pub mod serial;
pub mod shared;

use std::fmt;
use std::ops::AddAssign;
use std::str::FromStr;
use std::time::Duration;

use num_traits::Num;

use crate::error::EngineError;

/// The execution model driving a run, selected at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionModel {
    /// Sequential baseline on the calling thread
    Serial,
    /// Fixed pool of worker threads over one shared memory image
    Shared,
    /// Private-memory ranks communicating via typed messages
    Message,
}

impl fmt::Display for ExecutionModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ExecutionModel::Serial => "serial",
            ExecutionModel::Shared => "shared",
            ExecutionModel::Message => "message",
        };
        write!(f, "{}", name)
    }
}

impl FromStr for ExecutionModel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "serial" => Ok(ExecutionModel::Serial),
            "shared" => Ok(ExecutionModel::Shared),
            "message" => Ok(ExecutionModel::Message),
            other => Err(format!(
                "unknown execution model '{}' (expected serial, shared or message)",
                other
            )),
        }
    }
}

/// Result of one reduction: the global sum and the compute-core time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReduceRun<T> {
    pub total: T,
    pub elapsed: Duration,
}

/// Result of one scan: the global inclusive prefix sum and the
/// compute-core time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanRun<T> {
    pub values: Vec<T>,
    pub elapsed: Duration,
}

/// A reduction/scan engine bound to one execution model and worker count.
///
/// Implementations guarantee that for the same input, `reduce` and `scan`
/// produce results identical to the sequential references in
/// [`crate::scan`], independent of the worker count.
pub trait Engine<T>: Send + Sync {
    /// The model this engine runs under.
    fn model(&self) -> ExecutionModel;

    /// Number of workers P.
    fn workers(&self) -> usize;

    /// Global sum of `input`.
    fn reduce(&self, input: &[T]) -> Result<ReduceRun<T>, EngineError>;

    /// Global inclusive prefix sum of `input`.
    fn scan(&self, input: &[T]) -> Result<ScanRun<T>, EngineError>;
}

/// Create an engine for the given model and worker count.
///
/// The serial model ignores `workers` beyond validation; the other models
/// spin up exactly `workers` workers.
pub fn create_engine<T>(
    model: ExecutionModel,
    workers: usize,
) -> Result<Box<dyn Engine<T>>, EngineError>
where
    T: Copy + Num + AddAssign + Send + Sync + 'static,
{
    if workers == 0 {
        return Err(EngineError::Usage("worker count must be positive".into()));
    }
    match model {
        ExecutionModel::Serial => Ok(Box::new(serial::SerialEngine::new())),
        ExecutionModel::Shared => Ok(Box::new(shared::SharedEngine::new(workers)?)),
        ExecutionModel::Message => Ok(Box::new(message::MessageEngine::new(workers))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_round_trips_through_str() {
        for model in [
            ExecutionModel::Serial,
            ExecutionModel::Shared,
            ExecutionModel::Message,
        ] {
            assert_eq!(model.to_string().parse::<ExecutionModel>(), Ok(model));
        }
        assert!("openmp".parse::<ExecutionModel>().is_err());
    }

    #[test]
    fn test_factory_rejects_zero_workers() {
        let result = create_engine::<i64>(ExecutionModel::Shared, 0);
        assert!(matches!(result, Err(EngineError::Usage(_))));
    }

    #[test]
    fn test_factory_reports_model_and_workers() {
        let engine = create_engine::<i64>(ExecutionModel::Message, 3).unwrap();
        assert_eq!(engine.model(), ExecutionModel::Message);
        assert_eq!(engine.workers(), 3);
    }
}
