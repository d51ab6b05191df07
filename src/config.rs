//! Runtime configuration for the vanity npub miner.

use clap::Parser;

use crate::crypto::node::FIRST_HARDENED_INDEX;
use crate::crypto::seed::TEST_VECTOR_MNEMONIC;
use crate::matcher::{ScalarFilter, SearchTarget};

/// Characters allowed in the data part of a bech32 string.
const BECH32_CHARSET: &str = "qpzry9x8gf2tvdw0s3jn54khce6mua7l";

/// Vanity npub Miner
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Config {
    /// BIP-39 mnemonic to derive from
    #[arg(short = 's', long, default_value = TEST_VECTOR_MNEMONIC)]
    pub mnemonic: String,

    /// Generate a fresh mnemonic instead (printed before the search starts)
    #[arg(short = 'S', long, default_value = "false")]
    pub generate: bool,

    /// Echo the configured mnemonic before the search starts
    #[arg(short = 'v', long, default_value = "false")]
    pub verbose: bool,

    /// Target prefix of the encoded public key
    #[arg(short = 't', long, default_value = "npub10hac")]
    pub target: String,

    /// Enable the heuristic pre-filter (scalar length + x-coordinate bytes)
    #[arg(short = 'u', long, default_value = "false")]
    pub use_filter: bool,

    /// Minimum scalar byte length accepted by the filter
    #[arg(short = 'L', long, default_value = "32")]
    pub min_scalar_len: usize,

    /// Required first byte of the x-coordinate (filter mode)
    #[arg(short = 'f', long, default_value = "125")]
    pub filter1: u8,

    /// Required second byte of the x-coordinate (filter mode)
    #[arg(short = 'g', long, default_value = "251")]
    pub filter2: u8,

    /// Number of worker threads (default: number of CPU cores)
    #[arg(short = 'c', long)]
    pub workers: Option<usize>,

    /// Derivation path offset; worker i uses thread segment offset + 1 + i
    #[arg(short = 'o', long, default_value = "7")]
    pub offset: u32,

    /// Stop after finding N matches (0 = run until the space is exhausted)
    #[arg(short = 'n', long, default_value = "0")]
    pub count: usize,

    /// Progress report interval in seconds
    #[arg(short = 'r', long, default_value = "5")]
    pub report_interval: u64,
}

impl Config {
    /// Returns the number of workers, defaulting to CPU count
    pub fn worker_count(&self) -> usize {
        self.workers.unwrap_or_else(num_cpus::get)
    }

    /// Validates the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.target.starts_with("npub1") {
            return Err(ConfigError::InvalidTarget(
                "Target must start with \"npub1\"".into(),
            ));
        }

        // bech32 strings are at most 90 characters.
        if self.target.len() > 90 {
            return Err(ConfigError::InvalidTarget(
                "Target cannot be longer than 90 characters".into(),
            ));
        }

        if let Some(c) = self.target["npub1".len()..]
            .chars()
            .find(|c| !BECH32_CHARSET.contains(*c))
        {
            return Err(ConfigError::InvalidTarget(format!(
                "Character {c:?} cannot appear in a bech32 string"
            )));
        }

        if self.min_scalar_len > 32 {
            return Err(ConfigError::InvalidFilter(
                "Scalar length floor cannot exceed 32 bytes".into(),
            ));
        }

        // Thread segments offset+1 ..= offset+workers must stay non-hardened.
        let workers = self.worker_count() as u64;
        if u64::from(self.offset) + workers >= u64::from(FIRST_HARDENED_INDEX) {
            return Err(ConfigError::InvalidOffset(
                "Path offset plus worker count reaches the hardened index space".into(),
            ));
        }

        Ok(())
    }

    /// Builds the immutable search target shared across workers.
    pub fn search_target(&self) -> SearchTarget {
        let filter = self.use_filter.then_some(ScalarFilter {
            min_scalar_len: self.min_scalar_len,
            x_prefix: [self.filter1, self.filter2],
        });
        SearchTarget::new(self.target.clone(), filter)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid target: {0}")]
    InvalidTarget(String),
    #[error("Invalid filter: {0}")]
    InvalidFilter(String),
    #[error("Invalid offset: {0}")]
    InvalidOffset(String),
}
