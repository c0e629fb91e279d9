//! The F query engine.
//!
//! ```text
//! F(t, n, p) = min{ feerate(tx) | M <= height(tx) < M + n, tx in G(height(tx), p) }
//! ```
//!
//! where `M` is the height of the first block mined at or after time `t`
//! and `G(b, p)` is the set of the top-paying `p` fraction of transactions
//! in block `b`. The value is a robust lower bound on fee-market pressure
//! over the window.

use std::time::Instant;

use log::{debug, info};

use crate::block_fees::BlockFeeSets;
use crate::cache::{query_key, FValueCache};
use crate::chain::ChainAccessor;
use crate::error::FeerateError;
use crate::height::first_block_at_or_after;
use crate::oracle::FeeOracle;
use crate::{FeeRate, Timestamp};

/// Computes F values over a chain accessor and a fee oracle, memoizing
/// sub-computations in process and, optionally, final results on disk.
pub struct FQueryEngine<C, O> {
    chain: C,
    oracle: O,
    fee_sets: BlockFeeSets,
    cache: Option<FValueCache>,
}

impl<C: ChainAccessor, O: FeeOracle> FQueryEngine<C, O> {
    pub fn new(chain: C, oracle: O) -> Self {
        FQueryEngine {
            chain,
            oracle,
            fee_sets: BlockFeeSets::new(),
            cache: None,
        }
    }

    /// Attaches a persistent result cache. Computed values are served from
    /// and written to it across process restarts; entries never go stale
    /// because the underlying history is immutable.
    pub fn with_cache(mut self, cache: FValueCache) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Computes `F(t, n, p)`: the lowest fee rate among the top-paying `p`
    /// fraction of transactions in each of the `n` consecutive blocks
    /// starting at the first block mined at or after `t`.
    ///
    /// Fails with [`FeerateError::WindowOutOfRange`] when the window would
    /// reach past the chain tip, and with [`FeerateError::InvalidResult`]
    /// when every block in the window is empty after coinbase removal.
    /// Collaborator failures propagate unmodified. Errors are never cached.
    pub fn query(&mut self, t: Timestamp, n: u64, p: f64) -> Result<FeeRate, FeerateError> {
        let started = Instant::now();

        let key = query_key(t, n, p);
        if let Some(value) = self.cache.as_ref().and_then(|cache| cache.get(&key)) {
            debug!("F(t={t}, n={n}, p={p}) = {value} (cached)");
            return Ok(value);
        }

        let tip = self.chain.chain_height()?;
        let start = first_block_at_or_after(&self.chain, t)?;
        // n is caller-supplied, so the window end can overflow u64
        let end = match start.checked_add(n) {
            Some(end) if end <= tip + 1 => end,
            _ => {
                return Err(FeerateError::WindowOutOfRange {
                    start,
                    blocks: n,
                    tip,
                })
            }
        };

        // an empty G(b, p) puts no constraint on the window minimum
        let mut result = f64::INFINITY;
        for height in start..end {
            let top = self
                .fee_sets
                .top_fraction(&self.chain, &self.oracle, height, p)?;
            if let Some(&block_min) = top.last() {
                result = result.min(block_min);
            }
        }

        if !result.is_finite() || result < 0.0 {
            return Err(FeerateError::InvalidResult {
                t,
                n,
                p,
                computed: result,
            });
        }

        if let Some(cache) = self.cache.as_mut() {
            cache.insert_if_absent(&key, result)?;
        }
        info!(
            "F(t={t}, n={n}, p={p}) = {result} [{:?}]",
            started.elapsed()
        );
        Ok(result)
    }
}
