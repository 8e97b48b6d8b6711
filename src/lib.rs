//! # PARSCAN: Parallel Reduction and Prefix Scan for Multicore Systems
//!
//! PARSCAN computes global sums and inclusive prefix sums over partitioned
//! integer sequences, under interchangeable execution models.
//!
//! ## Overview
//!
//! The engine splits a sequence of length N into P contiguous partitions,
//! has each worker reduce or scan its own partition locally, combines the
//! per-worker partials in a single serial step, and (for scans) folds each
//! worker's offset back into its partition. The same pipeline runs under:
//!
//! - a **serial** baseline on the calling thread,
//! - a **shared-memory** thread pool where workers own disjoint slices of
//!   one memory image, and
//! - a **message-passing** world of private-memory ranks exchanging typed
//!   envelopes, coordinated by rank 0.
//!
//! ## Pipeline Components
//!
//! 1. **Partitioner**: pure `(n, p, rank)` → range arithmetic; partitions
//!    tile the sequence exactly.
//!
//! 2. **Local kernels**: per-partition sum and in-place inclusive scan.
//!
//! 3. **Combine step**: serial sum (reduction) or exclusive prefix
//!    (scan offsets) over the P partial results.
//!
//! 4. **Verifier**: recomputes the result sequentially and reports every
//!    diverging index; runs after every timed run.
//!
//! 5. **Timing harness**: mean elapsed microseconds per iteration over the
//!    compute core only.
//!
//! ## Usage
//!
//! ```
//! use parscan::{create_engine, ExecutionModel};
//!
//! let engine = create_engine::<i64>(ExecutionModel::Shared, 4).unwrap();
//!
//! let run = engine.scan(&[1, 2, 3, 4, 5, 6, 7, 8]).unwrap();
//! assert_eq!(run.values, vec![1, 3, 6, 10, 15, 21, 28, 36]);
//!
//! let run = engine.reduce(&[1, 2, 3, 4, 5, 6, 7, 8]).unwrap();
//! assert_eq!(run.total, 36);
//! ```

pub mod config;
pub mod engine;
pub mod error;
pub mod input;
pub mod partition;
pub mod scan;
pub mod timing;
pub mod verify;

// Re-export primary components
pub use config::RunConfig;
pub use engine::{create_engine, Engine, ExecutionModel, ReduceRun, ScanRun};
pub use error::EngineError;
pub use partition::{chunk_len, partition_range};
pub use scan::{exclusive_offsets, inclusive_scan, inclusive_scan_in_place, partial_sum};
pub use timing::{time_reduce, time_scan, TimingReport};
pub use verify::{verify_reduce, verify_scan, Mismatch, Report};

/// Version information for the PARSCAN library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
