//! Timing harness
//!
//! Repeats an engine's compute core over the same canonical input and
//! reports the mean elapsed time per iteration in microseconds. Only the
//! compute core is accumulated: every engine re-copies its working state
//! from the canonical input inside each call and excludes that copy (and
//! any distribution) from the duration it reports, so repeated iterations
//! never double-accumulate. Input generation and verification happen
//! entirely outside this harness.

use std::time::{Duration, Instant};

use crate::engine::Engine;
use crate::error::EngineError;

/// Accumulated timing over a whole run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimingReport {
    pub iterations: usize,
    pub total: Duration,
}

impl TimingReport {
    /// Mean elapsed microseconds per iteration.
    pub fn mean_micros(&self) -> f64 {
        if self.iterations == 0 {
            return 0.0;
        }
        self.total.as_micros() as f64 / self.iterations as f64
    }
}

/// Measure a one-shot operation (e.g. input generation).
pub fn measure<R>(f: impl FnOnce() -> R) -> (R, Duration) {
    let start = Instant::now();
    let value = f();
    (value, start.elapsed())
}

/// Run the scan compute core `iterations` times over `input`; returns the
/// last result together with the accumulated timing.
pub fn time_scan<T>(
    engine: &dyn Engine<T>,
    input: &[T],
    iterations: usize,
) -> Result<(Vec<T>, TimingReport), EngineError> {
    if iterations == 0 {
        return Err(EngineError::Usage("numiterations must be positive".into()));
    }
    let mut total = Duration::ZERO;
    let mut values = Vec::new();
    for iteration in 0..iterations {
        let run = engine.scan(input)?;
        log::debug!("scan iteration {}: {:?}", iteration, run.elapsed);
        total += run.elapsed;
        values = run.values;
    }
    Ok((values, TimingReport { iterations, total }))
}

/// Run the reduce compute core `iterations` times over `input`; returns
/// the last total together with the accumulated timing.
pub fn time_reduce<T>(
    engine: &dyn Engine<T>,
    input: &[T],
    iterations: usize,
) -> Result<(T, TimingReport), EngineError> {
    if iterations == 0 {
        return Err(EngineError::Usage("numiterations must be positive".into()));
    }
    let run = engine.reduce(input)?;
    let mut total = run.elapsed;
    let mut value = run.total;
    for iteration in 1..iterations {
        let run = engine.reduce(input)?;
        log::debug!("reduce iteration {}: {:?}", iteration, run.elapsed);
        total += run.elapsed;
        value = run.total;
    }
    Ok((value, TimingReport { iterations, total }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{create_engine, ExecutionModel};

    #[test]
    fn test_mean_micros() {
        let report = TimingReport {
            iterations: 4,
            total: Duration::from_micros(1000),
        };
        assert!((report.mean_micros() - 250.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_time_scan_accumulates_iterations() {
        let engine = create_engine::<i64>(ExecutionModel::Serial, 1).unwrap();
        let input = vec![1i64, 2, 3];
        let (values, report) = time_scan(engine.as_ref(), &input, 5).unwrap();
        assert_eq!(values, vec![1, 3, 6]);
        assert_eq!(report.iterations, 5);
    }

    #[test]
    fn test_zero_iterations_is_a_usage_error() {
        let engine = create_engine::<i64>(ExecutionModel::Serial, 1).unwrap();
        let result = time_scan(engine.as_ref(), &[1i64], 0);
        assert!(matches!(result, Err(EngineError::Usage(_))));
        let result = time_reduce(engine.as_ref(), &[1i64], 0);
        assert!(matches!(result, Err(EngineError::Usage(_))));
    }
}
