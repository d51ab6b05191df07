//! CPU worker: one thread scanning one derivation subtree.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

use crossbeam_channel::Sender;

use crate::crypto::node::hardened;
use crate::crypto::{BaseNode, Curve, DeriveError};
use crate::derive::ChildDeriver;
use crate::matcher::{Evaluator, SearchTarget};

use super::VanityResult;

/// Stats counters flushed in batches to keep atomics off the hot path.
const BATCH_SIZE: u64 = 1024;

/// Shared search statistics.
#[derive(Debug, Default)]
pub struct WorkerStats {
    /// Child scalars derived
    pub scalars_derived: AtomicU64,
    /// Candidates that reached the evaluator (post-filter)
    pub candidates_evaluated: AtomicU64,
    /// Matches found
    pub matches_found: AtomicU64,
}

impl WorkerStats {
    /// Creates zeroed stats.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the total scalars derived.
    pub fn total_scalars(&self) -> u64 {
        self.scalars_derived.load(Ordering::Relaxed)
    }

    /// Returns the total candidates evaluated.
    pub fn total_evaluated(&self) -> u64 {
        self.candidates_evaluated.load(Ordering::Relaxed)
    }

    /// Returns the total matches found.
    pub fn total_matches(&self) -> u64 {
        self.matches_found.load(Ordering::Relaxed)
    }
}

/// Returns the path segment distinguishing `worker_id`'s subtree.
///
/// Segments `offset + 1 ..= offset + worker_count` are pairwise distinct,
/// so no two workers ever derive the same base node.
pub fn thread_segment(path_offset: u32, worker_id: usize) -> u32 {
    path_offset + 1 + worker_id as u32
}

/// A worker scanning the non-hardened index range of its base node.
pub struct CpuWorker {
    id: usize,
    seed: Arc<[u8; 64]>,
    path_offset: u32,
    index_end: u32,
    target: Arc<SearchTarget>,
    curve: Arc<Curve>,
    result_tx: Sender<VanityResult>,
    stop_flag: Arc<AtomicBool>,
    stats: Arc<WorkerStats>,
}

impl CpuWorker {
    /// Creates a worker. `index_end` is exclusive.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: usize,
        seed: Arc<[u8; 64]>,
        path_offset: u32,
        index_end: u32,
        target: Arc<SearchTarget>,
        curve: Arc<Curve>,
        result_tx: Sender<VanityResult>,
        stop_flag: Arc<AtomicBool>,
        stats: Arc<WorkerStats>,
    ) -> Self {
        Self {
            id,
            seed,
            path_offset,
            index_end,
            target,
            curve,
            result_tx,
            stop_flag,
            stats,
        }
    }

    /// Runs the search loop over `[0, index_end)`.
    ///
    /// Indices are evaluated strictly in increasing order. Returns when the
    /// range is exhausted, the stop flag is set, or the result channel is
    /// closed. A derivation error is fatal to this worker only.
    pub fn run(&self) -> Result<(), DeriveError> {
        let node = BaseNode::from_seed(
            &self.curve,
            self.seed.as_ref(),
            &[
                hardened(44),
                hardened(1237),
                hardened(0),
                thread_segment(self.path_offset, self.id),
            ],
        )?;
        let mut deriver = ChildDeriver::new(&self.curve, &node)?;
        let evaluator = Evaluator::new(&self.curve, &self.target);

        let mut derived: u64 = 0;
        let mut evaluated: u64 = 0;

        for index in 0..self.index_end {
            if self.stop_flag.load(Ordering::Relaxed) {
                break;
            }

            let scalar = deriver.scalar_at(index);
            derived += 1;
            if derived % BATCH_SIZE == 0 {
                self.stats
                    .scalars_derived
                    .fetch_add(BATCH_SIZE, Ordering::Relaxed);
            }

            // Cheap length gate before any curve work.
            if !self.target.accepts_scalar_len(scalar.len()) {
                continue;
            }
            evaluated += 1;

            if let Some(candidate) = evaluator.evaluate(&scalar) {
                self.stats.matches_found.fetch_add(1, Ordering::Relaxed);

                let result = VanityResult {
                    worker_id: self.id,
                    index,
                    encoded: candidate.encoded,
                    x_hex_prefix: hex::encode(&candidate.x_coordinate[..4]),
                    scalar_len: candidate.scalar_len,
                };

                // A closed channel means the coordinator is done listening.
                if self.result_tx.send(result).is_err() {
                    break;
                }
            }
        }

        self.stats
            .scalars_derived
            .fetch_add(derived % BATCH_SIZE, Ordering::Relaxed);
        self.stats
            .candidates_evaluated
            .fetch_add(evaluated, Ordering::Relaxed);
        Ok(())
    }

    /// Returns the worker ID.
    pub fn id(&self) -> usize {
        self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_thread_segments_pairwise_distinct() {
        let offset = 7;
        let count = 6;
        let segments: Vec<u32> = (0..count).map(|id| thread_segment(offset, id)).collect();
        assert_eq!(segments, vec![8, 9, 10, 11, 12, 13]);
        for (i, a) in segments.iter().enumerate() {
            for b in &segments[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn test_thread_segments_stay_non_hardened() {
        use crate::crypto::node::FIRST_HARDENED_INDEX;
        assert!(thread_segment(7, 127) < FIRST_HARDENED_INDEX);
    }
}
