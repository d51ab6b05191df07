//! # npub_vanity
//!
//! Parallel vanity `npub` miner over NIP-06 hierarchical-deterministic
//! key derivation.
//!
//! ## Architecture
//!
//! - `crypto`: seed handling, BIP-32 path derivation and bech32 encoding
//! - `derive`: the fast non-hardened child-scalar generator (hot path)
//! - `matcher`: heuristic pre-filter and exact candidate evaluation
//! - `worker`: parallel execution and worker pool management
//! - `config`: runtime configuration

pub mod config;
pub mod crypto;
pub mod derive;
pub mod matcher;
pub mod worker;

pub use config::Config;
pub use crypto::node::{BaseNode, FIRST_HARDENED_INDEX};
pub use crypto::Curve;
pub use derive::ChildDeriver;
pub use matcher::{Candidate, Evaluator, ScalarFilter, SearchTarget};
pub use worker::{VanityResult, WorkerPool};
