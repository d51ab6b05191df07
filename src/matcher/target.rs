//! The search target and its heuristic pre-filter.

/// Cheap pre-filter parameters applied before any curve work.
///
/// The scalar-length floor exploits the correlation between short scalars
/// and the leading characters of the resulting encoding; the two x-prefix
/// bytes are an exact secondary check that is cheaper than bech32 encoding.
/// Both are throughput heuristics: pruning is probabilistic, not equivalent
/// to the exact prefix match performed afterwards.
#[derive(Debug, Clone, Copy)]
pub struct ScalarFilter {
    /// Minimum minimal-big-endian byte length of an acceptable child scalar
    pub min_scalar_len: usize,
    /// Required first two bytes of the public-key x-coordinate
    pub x_prefix: [u8; 2],
}

/// Immutable search configuration shared read-only across all workers.
#[derive(Debug, Clone)]
pub struct SearchTarget {
    prefix: String,
    filter: Option<ScalarFilter>,
}

impl SearchTarget {
    /// Creates a target for `prefix`, optionally with the heuristic filter.
    pub fn new(prefix: impl Into<String>, filter: Option<ScalarFilter>) -> Self {
        Self {
            prefix: prefix.into(),
            filter,
        }
    }

    /// Returns the desired encoded prefix.
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Returns the filter parameters, if filtering is enabled.
    pub fn filter(&self) -> Option<&ScalarFilter> {
        self.filter.as_ref()
    }

    /// Scalar-length gate: rejects scalars below the floor when filtering is
    /// enabled. `len` is the scalar's minimal big-endian byte length.
    #[inline]
    pub fn accepts_scalar_len(&self, len: usize) -> bool {
        match &self.filter {
            Some(f) => len >= f.min_scalar_len,
            None => true,
        }
    }

    /// X-coordinate byte gate, applied after point computation but before
    /// encoding.
    #[inline]
    pub fn accepts_x(&self, x: &[u8; 32]) -> bool {
        match &self.filter {
            Some(f) => x[..2] == f.x_prefix,
            None => true,
        }
    }

    /// Exact comparison of the encoded string's leading characters.
    #[inline]
    pub fn matches_encoded(&self, encoded: &str) -> bool {
        encoded.starts_with(&self.prefix)
    }
}
