//! Worker pool management.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crossbeam_channel::{bounded, Receiver, RecvTimeoutError, Sender};

use crate::crypto::node::FIRST_HARDENED_INDEX;
use crate::crypto::Curve;
use crate::matcher::SearchTarget;

use super::cpu::{CpuWorker, WorkerStats};

/// A reported match. Diagnostic payload, not a stable machine format.
#[derive(Debug, Clone)]
pub struct VanityResult {
    /// The ID of the worker that found this match
    pub worker_id: usize,
    /// The child index it was found at
    pub index: u32,
    /// The full bech32 encoding of the matching public key
    pub encoded: String,
    /// Truncated hex view of the x-coordinate
    pub x_hex_prefix: String,
    /// Minimal byte length of the raw child scalar
    pub scalar_len: usize,
}

/// What the coordinator observed while waiting for results.
#[derive(Debug)]
pub enum PoolEvent {
    /// A worker reported a match
    Match(VanityResult),
    /// The wait timed out; a good moment for a progress report
    Tick,
    /// Every worker has exhausted its index range
    Exhausted,
}

/// Manages a fixed pool of search workers over disjoint derivation subtrees.
pub struct WorkerPool {
    /// Number of workers
    num_workers: usize,
    /// Path offset distinguishing the per-worker subtrees
    path_offset: u32,
    /// Worker thread handles (Option to allow taking during join)
    handles: Option<Vec<JoinHandle<()>>>,
    /// Channel receiver for results
    result_rx: Receiver<VanityResult>,
    /// Shared stop flag
    stop_flag: Arc<AtomicBool>,
    /// Shared statistics
    stats: Arc<WorkerStats>,
    /// Start time
    start_time: Instant,
}

impl WorkerPool {
    /// Starts `num_workers` workers over the full non-hardened index range.
    pub fn new(
        num_workers: usize,
        path_offset: u32,
        seed: [u8; 64],
        target: SearchTarget,
    ) -> Self {
        Self::bounded(num_workers, path_offset, seed, target, FIRST_HARDENED_INDEX)
    }

    /// Starts workers scanning only `[0, index_end)` per subtree.
    ///
    /// Used by tests and calibration runs; `new` passes the full range.
    pub fn bounded(
        num_workers: usize,
        path_offset: u32,
        seed: [u8; 64],
        target: SearchTarget,
        index_end: u32,
    ) -> Self {
        let (result_tx, result_rx) = bounded(100);
        let stop_flag = Arc::new(AtomicBool::new(false));
        let stats = Arc::new(WorkerStats::new());

        let handles = Self::spawn_workers(
            num_workers,
            path_offset,
            Arc::new(seed),
            Arc::new(target),
            index_end,
            result_tx,
            stop_flag.clone(),
            stats.clone(),
        );

        Self {
            num_workers,
            path_offset,
            handles: Some(handles),
            result_rx,
            stop_flag,
            stats,
            start_time: Instant::now(),
        }
    }

    /// Spawns worker threads.
    #[allow(clippy::too_many_arguments)]
    fn spawn_workers(
        num_workers: usize,
        path_offset: u32,
        seed: Arc<[u8; 64]>,
        target: Arc<SearchTarget>,
        index_end: u32,
        result_tx: Sender<VanityResult>,
        stop_flag: Arc<AtomicBool>,
        stats: Arc<WorkerStats>,
    ) -> Vec<JoinHandle<()>> {
        // The curve context is built once and shared read-only.
        let curve = Arc::new(Curve::new());

        (0..num_workers)
            .map(|id| {
                let seed = seed.clone();
                let target = target.clone();
                let curve = curve.clone();
                let result_tx = result_tx.clone();
                let stop_flag = stop_flag.clone();
                let stats = stats.clone();

                thread::Builder::new()
                    .name(format!("npub-worker-{}", id))
                    .spawn(move || {
                        let worker = CpuWorker::new(
                            id, seed, path_offset, index_end, target, curve, result_tx,
                            stop_flag, stats,
                        );
                        // Fatal to this worker only; siblings keep running.
                        if let Err(e) = worker.run() {
                            eprintln!("worker {id}: derivation failed: {e}");
                        }
                    })
                    .expect("Failed to spawn worker thread")
            })
            .collect()
        // The original result_tx drops here, so the channel disconnects
        // once the last worker finishes.
    }

    /// Waits up to `timeout` for the next pool event.
    pub fn next_event(&self, timeout: Duration) -> PoolEvent {
        match self.result_rx.recv_timeout(timeout) {
            Ok(result) => PoolEvent::Match(result),
            Err(RecvTimeoutError::Timeout) => PoolEvent::Tick,
            Err(RecvTimeoutError::Disconnected) => PoolEvent::Exhausted,
        }
    }

    /// Signals all workers to stop.
    pub fn stop(&self) {
        self.stop_flag.store(true, Ordering::Relaxed);
    }

    /// Waits for all workers to complete.
    pub fn join(mut self) {
        if let Some(handles) = self.handles.take() {
            for handle in handles {
                let _ = handle.join();
            }
        }
    }

    /// Returns the number of workers.
    pub fn num_workers(&self) -> usize {
        self.num_workers
    }

    /// Returns the configured path offset.
    pub fn path_offset(&self) -> u32 {
        self.path_offset
    }

    /// Returns the total child scalars derived across all workers.
    pub fn total_scalars(&self) -> u64 {
        self.stats.total_scalars()
    }

    /// Returns the total candidates that reached the evaluator.
    pub fn total_evaluated(&self) -> u64 {
        self.stats.total_evaluated()
    }

    /// Returns the total matches found.
    pub fn total_matches(&self) -> u64 {
        self.stats.total_matches()
    }

    /// Returns the elapsed time since the pool was created.
    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }

    /// Returns the current derivation rate (scalars per second).
    pub fn scalars_per_second(&self) -> f64 {
        let elapsed = self.elapsed().as_secs_f64();
        if elapsed > 0.0 {
            self.total_scalars() as f64 / elapsed
        } else {
            0.0
        }
    }

    /// Returns a clone of the stop flag for external use (e.g. signal
    /// handlers).
    pub fn stop_flag_clone(&self) -> Arc<AtomicBool> {
        self.stop_flag.clone()
    }

    /// Returns true if the pool has been signaled to stop.
    pub fn is_stopped(&self) -> bool {
        self.stop_flag.load(Ordering::Relaxed)
    }
}

impl Drop for WorkerPool {
    fn drop(&mut self) {
        self.stop();
        if let Some(handles) = self.handles.take() {
            for handle in handles {
                let _ = handle.join();
            }
        }
    }
}
