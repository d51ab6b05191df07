//! Worker pool for the parallel index-space search.
//!
//! This module provides:
//! - Per-thread CPU workers, each bound to a disjoint derivation subtree
//! - Pool construction, result collection and joined shutdown
//! - Progress statistics

mod cpu;
mod pool;

pub use cpu::{thread_segment, CpuWorker, WorkerStats};
pub use pool::{PoolEvent, VanityResult, WorkerPool};
