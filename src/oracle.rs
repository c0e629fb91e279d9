use std::cell::RefCell;
use std::collections::HashMap;

use serde::Deserialize;

use crate::chain::BitcoinCli;
use crate::error::FeerateError;
use crate::{FeeRate, Txid};

/// A fee-rate source: an opaque total function from txid to fee rate.
/// Implementations compose by delegation, so a memoizing layer can wrap a
/// remote-lookup layer without callers noticing.
pub trait FeeOracle {
    fn fee_rate(&self, txid: &str) -> Result<FeeRate, FeerateError>;
}

/// Memoizing oracle layer. Fee rates of confirmed transactions never
/// change, so the memo is unbounded and lives for the whole process.
pub struct CachingOracle<O> {
    inner: O,
    memo: RefCell<HashMap<Txid, FeeRate>>,
}

impl<O: FeeOracle> CachingOracle<O> {
    pub fn new(inner: O) -> Self {
        CachingOracle {
            inner,
            memo: RefCell::new(HashMap::new()),
        }
    }
}

impl<O: FeeOracle> FeeOracle for CachingOracle<O> {
    fn fee_rate(&self, txid: &str) -> Result<FeeRate, FeerateError> {
        if let Some(&rate) = self.memo.borrow().get(txid) {
            return Ok(rate);
        }
        let rate = self.inner.fee_rate(txid)?;
        self.memo.borrow_mut().insert(txid.to_string(), rate);
        Ok(rate)
    }
}

/// Derives fee rates from `getrawtransaction <txid> 2`, which reports the
/// absolute fee (in BTC) when the node can see the spent prevouts.
pub struct BitcoinCliOracle {
    cli: BitcoinCli,
}

impl BitcoinCliOracle {
    pub fn new(cli: BitcoinCli) -> Self {
        BitcoinCliOracle { cli }
    }
}

#[derive(Deserialize)]
struct VerboseTx {
    fee: Option<f64>,
    vsize: u64,
}

impl FeeOracle for BitcoinCliOracle {
    fn fee_rate(&self, txid: &str) -> Result<FeeRate, FeerateError> {
        let tx: VerboseTx = self.cli.call_json(&["getrawtransaction", txid, "2"])?;
        let fee_btc = tx.fee.ok_or_else(|| {
            FeerateError::Rpc(format!("no fee reported for {txid}; node cannot see prevouts"))
        })?;
        let fee_sat = fee_btc * 100_000_000.0;
        Ok(fee_sat / tx.vsize as f64)
    }
}
