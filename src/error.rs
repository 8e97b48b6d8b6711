//! Error taxonomy
//!
//! A verification mismatch is deliberately *not* represented here: it is a
//! data-level finding carried by [`crate::verify::Report`] and reported to
//! the user without failing the process.

use thiserror::Error;

use crate::engine::message::PhaseTag;

/// Errors raised while configuring or driving an engine.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// Malformed or missing run parameters. No work is attempted.
    #[error("usage: {0}")]
    Usage(String),

    /// A worker could not acquire the resources it needs to run.
    #[error("worker {rank}: unable to allocate execution resources: {reason}")]
    Resource { rank: usize, reason: String },

    /// A peer's channel closed while a message was still expected.
    #[error("worker {rank}: peer channel closed before the protocol completed")]
    WorkerLost { rank: usize },

    /// A rank thread panicked; its partial result never arrived.
    #[error("worker {rank} panicked during the compute phase")]
    WorkerPanic { rank: usize },

    /// A message arrived tagged for a different phase than the one in flight.
    #[error("protocol violation: worker {from} sent a {got:?} message while {expected:?} was expected")]
    Protocol {
        from: usize,
        expected: PhaseTag,
        got: PhaseTag,
    },

    /// A message carried the wrong payload kind for its phase.
    #[error("worker {from}: unexpected payload kind for a {tag:?} message")]
    MalformedPayload { from: usize, tag: PhaseTag },
}
