//! Candidate filtering and evaluation.
//!
//! Two layers, cheapest first:
//! - `target`: the search target plus the heuristic scalar-length pre-filter
//! - `evaluator`: curve point computation, bech32 encoding and the exact
//!   prefix comparison

mod evaluator;
mod target;

pub use evaluator::{Candidate, Evaluator};
pub use target::{ScalarFilter, SearchTarget};
