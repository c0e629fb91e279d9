use thiserror::Error;

use crate::{BlockHeight, Timestamp};

#[derive(Debug, Error)]
pub enum FeerateError {
    /// The chain accessor or fee oracle failed. Passed through as-is;
    /// retries belong to the collaborator, not here.
    #[error("bitcoin-cli call failed: {0}")]
    Rpc(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("malformed response: {0}")]
    Json(#[from] serde_json::Error),

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    /// The window minimum came out negative or non-finite. Infinite means
    /// every block in the window was empty after coinbase removal.
    #[error("invalid F value computed: F(t={t}, n={n}, p={p}) = {computed}")]
    InvalidResult {
        t: Timestamp,
        n: u64,
        p: f64,
        computed: f64,
    },

    #[error("window of {blocks} blocks starting at height {start} extends past chain tip {tip}")]
    WindowOutOfRange {
        start: BlockHeight,
        blocks: u64,
        tip: BlockHeight,
    },
}
