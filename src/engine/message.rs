//! Message-passing engine
//!
//! P rank threads, each with private memory; the only shared state is the
//! channel mesh and one barrier. The coordinator (rank 0) owns the
//! canonical input, distributes partition blocks, collects partial results,
//! runs the serial combine step and redistributes offsets. Workers block on
//! receive as their only suspension point.
//!
//! Every message travels as a value-typed [`Envelope`] carrying the sender
//! rank and a phase tag; receivers index partial results by the sender
//! identity, never by arrival order, so the protocol is deterministic under
//! any message interleaving. Both roles step through the same phase
//! sequence (distribute, local compute, collect, combine, broadcast,
//! finalize), with the role split confined to each phase function.
//!
//! There are no receive timeouts: a rank that stops participating while its
//! channels stay open blocks the run indefinitely. A rank whose channel
//! closes, or that panics, is detected and reported as an error instead of
//! letting the combine step run on incomplete partials.

use std::ops::AddAssign;
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Barrier};
use std::thread;
use std::time::{Duration, Instant};

use num_traits::Num;

use crate::error::EngineError;
use crate::partition::partition_range;
use crate::scan::{exclusive_offsets, inclusive_scan_in_place, partial_sum};

use super::{Engine, ExecutionModel, ReduceRun, ScanRun};

/// Protocol phase a message belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhaseTag {
    /// Coordinator hands a partition block to a worker
    Distribute,
    /// Worker sends its partial result to the coordinator
    Collect,
    /// Coordinator sends a combined scalar back to a worker
    Broadcast,
    /// Worker returns its finalized block to the coordinator
    Gather,
}

/// Message payload: a single scalar or a partition block.
#[derive(Debug, Clone)]
enum Payload<T> {
    Scalar(T),
    Block(Vec<T>),
}

/// Value-typed message envelope exchanged between ranks.
#[derive(Debug, Clone)]
struct Envelope<T> {
    from: usize,
    tag: PhaseTag,
    payload: Payload<T>,
}

/// One rank's endpoint: senders to every rank, its own inbox, and the
/// world barrier.
struct Mailbox<T> {
    rank: usize,
    peers: Vec<Sender<Envelope<T>>>,
    inbox: Receiver<Envelope<T>>,
    barrier: Arc<Barrier>,
}

impl<T> Mailbox<T> {
    fn send(&self, to: usize, tag: PhaseTag, payload: Payload<T>) -> Result<(), EngineError> {
        self.peers[to]
            .send(Envelope {
                from: self.rank,
                tag,
                payload,
            })
            .map_err(|_| EngineError::WorkerLost { rank: to })
    }

    /// Blocking receive; the envelope must carry the expected phase tag.
    fn recv(&self, expected: PhaseTag) -> Result<Envelope<T>, EngineError> {
        let envelope = self
            .inbox
            .recv()
            .map_err(|_| EngineError::WorkerLost { rank: self.rank })?;
        if envelope.tag != expected {
            return Err(EngineError::Protocol {
                from: envelope.from,
                expected,
                got: envelope.tag,
            });
        }
        Ok(envelope)
    }

    fn barrier(&self) {
        self.barrier.wait();
    }
}

/// Wire up a P-rank world and run `body` once per rank on its own thread.
/// Results are returned in rank order; a panicked rank surfaces as
/// [`EngineError::WorkerPanic`].
fn run_world<T, R, F>(workers: usize, body: F) -> Result<Vec<R>, EngineError>
where
    T: Send,
    R: Send,
    F: Fn(Mailbox<T>) -> Result<R, EngineError> + Sync,
{
    let mut senders = Vec::with_capacity(workers);
    let mut inboxes = Vec::with_capacity(workers);
    for _ in 0..workers {
        let (tx, rx) = mpsc::channel();
        senders.push(tx);
        inboxes.push(rx);
    }
    let barrier = Arc::new(Barrier::new(workers));
    let mailboxes: Vec<Mailbox<T>> = inboxes
        .into_iter()
        .enumerate()
        .map(|(rank, inbox)| Mailbox {
            rank,
            peers: senders.clone(),
            inbox,
            barrier: Arc::clone(&barrier),
        })
        .collect();
    drop(senders);

    thread::scope(|s| {
        let body = &body;
        let handles: Vec<_> = mailboxes
            .into_iter()
            .map(|mailbox| s.spawn(move || body(mailbox)))
            .collect();
        let mut outcomes = Vec::with_capacity(workers);
        for (rank, handle) in handles.into_iter().enumerate() {
            match handle.join() {
                Ok(outcome) => outcomes.push(outcome?),
                Err(_) => return Err(EngineError::WorkerPanic { rank }),
            }
        }
        Ok(outcomes)
    })
}

/// Distribute phase: the coordinator sends every rank its partition block
/// (empty partitions travel as empty blocks) and keeps its own; a worker
/// receives its block.
fn distribute<T>(
    mailbox: &Mailbox<T>,
    canonical: Option<&[T]>,
    n: usize,
    p: usize,
) -> Result<Vec<T>, EngineError>
where
    T: Copy + Num + AddAssign,
{
    match canonical {
        Some(input) => {
            for rank in 1..p {
                let block = input[partition_range(n, p, rank)].to_vec();
                mailbox.send(rank, PhaseTag::Distribute, Payload::Block(block))?;
            }
            Ok(input[partition_range(n, p, 0)].to_vec())
        }
        None => {
            let envelope = mailbox.recv(PhaseTag::Distribute)?;
            match envelope.payload {
                Payload::Block(block) => Ok(block),
                Payload::Scalar(_) => Err(EngineError::MalformedPayload {
                    from: envelope.from,
                    tag: PhaseTag::Distribute,
                }),
            }
        }
    }
}

/// Collect phase: workers send their partial to the coordinator, which
/// slots each one by sender rank. Returns the full partial-result vector
/// on the coordinator, `None` elsewhere.
fn collect<T>(mailbox: &Mailbox<T>, partial: T, p: usize) -> Result<Option<Vec<T>>, EngineError>
where
    T: Copy + Num + AddAssign,
{
    if mailbox.rank == 0 {
        let mut partials = vec![T::zero(); p];
        partials[0] = partial;
        for _ in 1..p {
            let envelope = mailbox.recv(PhaseTag::Collect)?;
            match envelope.payload {
                Payload::Scalar(value) => partials[envelope.from] = value,
                Payload::Block(_) => {
                    return Err(EngineError::MalformedPayload {
                        from: envelope.from,
                        tag: PhaseTag::Collect,
                    })
                }
            }
        }
        Ok(Some(partials))
    } else {
        mailbox.send(0, PhaseTag::Collect, Payload::Scalar(partial))?;
        Ok(None)
    }
}

/// Broadcast phase: the coordinator sends `scalars[rank]` to each rank and
/// keeps `scalars[0]`; a worker receives its scalar.
fn broadcast<T>(mailbox: &Mailbox<T>, scalars: Option<&[T]>) -> Result<T, EngineError>
where
    T: Copy + Num + AddAssign,
{
    match scalars {
        Some(scalars) => {
            for rank in 1..scalars.len() {
                mailbox.send(rank, PhaseTag::Broadcast, Payload::Scalar(scalars[rank]))?;
            }
            Ok(scalars[0])
        }
        None => {
            let envelope = mailbox.recv(PhaseTag::Broadcast)?;
            match envelope.payload {
                Payload::Scalar(value) => Ok(value),
                Payload::Block(_) => Err(EngineError::MalformedPayload {
                    from: envelope.from,
                    tag: PhaseTag::Broadcast,
                }),
            }
        }
    }
}

/// Gather phase: workers send their finalized blocks back; the coordinator
/// reassembles the global result in partition order, placing each block by
/// its sender rank.
fn gather<T>(
    mailbox: &Mailbox<T>,
    local: Vec<T>,
    n: usize,
    p: usize,
) -> Result<Option<Vec<T>>, EngineError>
where
    T: Copy + Num + AddAssign,
{
    if mailbox.rank == 0 {
        let mut result = vec![T::zero(); n];
        result[partition_range(n, p, 0)].copy_from_slice(&local);
        for _ in 1..p {
            let envelope = mailbox.recv(PhaseTag::Gather)?;
            match envelope.payload {
                Payload::Block(block) => {
                    let range = partition_range(n, p, envelope.from);
                    if block.len() != range.len() {
                        return Err(EngineError::MalformedPayload {
                            from: envelope.from,
                            tag: PhaseTag::Gather,
                        });
                    }
                    result[range].copy_from_slice(&block);
                }
                Payload::Scalar(_) => {
                    return Err(EngineError::MalformedPayload {
                        from: envelope.from,
                        tag: PhaseTag::Gather,
                    })
                }
            }
        }
        Ok(Some(result))
    } else {
        mailbox.send(0, PhaseTag::Gather, Payload::Block(local))?;
        Ok(None)
    }
}

/// One rank's scan protocol, phase by phase. The clock starts after the
/// post-distribution barrier and stops after the add-back barrier, so the
/// reported time covers exactly the compute core; only the coordinator's
/// measurement is consumed.
fn scan_rank<T>(
    mailbox: Mailbox<T>,
    canonical: Option<&[T]>,
    n: usize,
    p: usize,
) -> Result<(Option<Vec<T>>, Duration), EngineError>
where
    T: Copy + Num + AddAssign,
{
    let mut local = distribute(&mailbox, canonical, n, p)?;
    mailbox.barrier();

    let start = Instant::now();
    inclusive_scan_in_place(&mut local);
    let partial = local.last().copied().unwrap_or_else(T::zero);

    let partials = collect(&mailbox, partial, p)?;
    mailbox.barrier();

    // Combine runs on the coordinator alone
    let offsets = partials.map(|ps| exclusive_offsets(&ps));
    let offset = broadcast(&mailbox, offsets.as_deref())?;

    for v in local.iter_mut() {
        *v += offset;
    }
    mailbox.barrier();
    let elapsed = start.elapsed();

    let result = gather(&mailbox, local, n, p)?;
    mailbox.barrier();
    Ok((result, elapsed))
}

/// One rank's reduction protocol. The combined total is broadcast back to
/// every rank, so each rank finishes holding the global sum.
fn reduce_rank<T>(
    mailbox: Mailbox<T>,
    canonical: Option<&[T]>,
    n: usize,
    p: usize,
) -> Result<(T, Duration), EngineError>
where
    T: Copy + Num + AddAssign,
{
    let local = distribute(&mailbox, canonical, n, p)?;
    mailbox.barrier();

    let start = Instant::now();
    let partial = partial_sum(&local);

    let partials = collect(&mailbox, partial, p)?;
    mailbox.barrier();

    let totals = partials.map(|ps| vec![partial_sum(&ps); ps.len()]);
    let total = broadcast(&mailbox, totals.as_deref())?;
    mailbox.barrier();
    let elapsed = start.elapsed();

    Ok((total, elapsed))
}

/// Private-memory engine. Ranks are spawned per call; spawn and
/// distribution cost is excluded from the reported compute time.
#[derive(Debug)]
pub struct MessageEngine {
    workers: usize,
}

impl MessageEngine {
    pub fn new(workers: usize) -> Self {
        Self { workers }
    }
}

impl<T> Engine<T> for MessageEngine
where
    T: Copy + Num + AddAssign + Send + Sync + 'static,
{
    fn model(&self) -> ExecutionModel {
        ExecutionModel::Message
    }

    fn workers(&self) -> usize {
        self.workers
    }

    fn reduce(&self, input: &[T]) -> Result<ReduceRun<T>, EngineError> {
        if input.is_empty() {
            return Ok(ReduceRun {
                total: T::zero(),
                elapsed: Duration::ZERO,
            });
        }
        let n = input.len();
        let p = self.workers;
        let outcomes = run_world(p, |mailbox| {
            let canonical = (mailbox.rank == 0).then_some(input);
            reduce_rank(mailbox, canonical, n, p)
        })?;
        let (total, elapsed) = outcomes[0];
        log::debug!("message reduce: n={} workers={} elapsed={:?}", n, p, elapsed);
        Ok(ReduceRun { total, elapsed })
    }

    fn scan(&self, input: &[T]) -> Result<ScanRun<T>, EngineError> {
        if input.is_empty() {
            return Ok(ScanRun {
                values: Vec::new(),
                elapsed: Duration::ZERO,
            });
        }
        let n = input.len();
        let p = self.workers;
        let mut outcomes = run_world(p, |mailbox| {
            let canonical = (mailbox.rank == 0).then_some(input);
            scan_rank(mailbox, canonical, n, p)
        })?;
        let (result, elapsed) = outcomes.swap_remove(0);
        log::debug!("message scan: n={} workers={} elapsed={:?}", n, p, elapsed);
        match result {
            Some(values) => Ok(ScanRun { values, elapsed }),
            None => Err(EngineError::WorkerLost { rank: 0 }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scan::inclusive_scan;

    fn mailbox_pair() -> (Mailbox<i64>, Mailbox<i64>) {
        let (tx0, rx0) = mpsc::channel();
        let (tx1, rx1) = mpsc::channel();
        let peers = vec![tx0, tx1];
        let barrier = Arc::new(Barrier::new(1));
        (
            Mailbox {
                rank: 0,
                peers: peers.clone(),
                inbox: rx0,
                barrier: Arc::clone(&barrier),
            },
            Mailbox {
                rank: 1,
                peers,
                inbox: rx1,
                barrier,
            },
        )
    }

    #[test]
    fn test_tag_mismatch_is_a_protocol_error() {
        let (coordinator, worker) = mailbox_pair();
        worker
            .send(0, PhaseTag::Collect, Payload::Scalar(7))
            .unwrap();
        let err = coordinator.recv(PhaseTag::Broadcast).unwrap_err();
        assert_eq!(
            err,
            EngineError::Protocol {
                from: 1,
                expected: PhaseTag::Broadcast,
                got: PhaseTag::Collect,
            }
        );
    }

    #[test]
    fn test_closed_channel_is_reported() {
        // A mailbox whose every peer sender is gone
        let (tx, rx) = mpsc::channel::<Envelope<i64>>();
        drop(tx);
        let mailbox = Mailbox {
            rank: 3,
            peers: Vec::new(),
            inbox: rx,
            barrier: Arc::new(Barrier::new(1)),
        };
        let err = mailbox.recv(PhaseTag::Collect).unwrap_err();
        assert_eq!(err, EngineError::WorkerLost { rank: 3 });
    }

    #[test]
    fn test_partials_indexed_by_sender_rank() {
        // Arrival order reversed relative to rank order
        let (coordinator, worker) = mailbox_pair();
        worker
            .send(0, PhaseTag::Collect, Payload::Scalar(40))
            .unwrap();
        drop(worker);
        let partials = collect(&coordinator, 2, 2).unwrap().unwrap();
        assert_eq!(partials, vec![2, 40]);
    }

    #[test]
    fn test_message_scan_matches_reference() {
        let engine = MessageEngine::new(3);
        let input: Vec<i64> = (1..=20).collect();
        let run = Engine::scan(&engine, &input).unwrap();
        assert_eq!(run.values, inclusive_scan(&input));
    }

    #[test]
    fn test_message_reduce_matches_reference() {
        let engine = MessageEngine::new(4);
        let input: Vec<i64> = (1..=100).collect();
        assert_eq!(Engine::reduce(&engine, &input).unwrap().total, 5050);
    }

    #[test]
    fn test_single_rank_world() {
        let engine = MessageEngine::new(1);
        let input = vec![4i64, -1, 9];
        assert_eq!(Engine::scan(&engine, &input).unwrap().values, vec![4, 3, 12]);
        assert_eq!(Engine::reduce(&engine, &input).unwrap().total, 12);
    }

    #[test]
    fn test_more_ranks_than_elements() {
        let engine = MessageEngine::new(8);
        let input = vec![1i64, 2, 3];
        assert_eq!(Engine::scan(&engine, &input).unwrap().values, vec![1, 3, 6]);
        assert_eq!(Engine::reduce(&engine, &input).unwrap().total, 6);
    }
}
