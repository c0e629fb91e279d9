//! In-memory collaborators for tests.

use std::collections::HashMap;
use std::path::PathBuf;

use crate::chain::{Block, ChainAccessor, Transaction, TxInput};
use crate::error::FeerateError;
use crate::oracle::FeeOracle;
use crate::{BlockHeight, FeeRate, Timestamp, Txid};

/// A synthetic chain where heights are vector indices. Every block carries
/// a coinbase plus one transaction per configured fee rate; the coinbase
/// txid is unknown to [`FixedOracle`], so any code that forgets to drop it
/// fails loudly.
#[derive(Debug, Clone)]
pub struct MockChain {
    blocks: Vec<Block>,
    transactions: HashMap<Txid, Transaction>,
    rates: HashMap<Txid, FeeRate>,
}

impl MockChain {
    pub fn new(layout: &[(Timestamp, &[FeeRate])]) -> Self {
        let mut blocks = Vec::new();
        let mut transactions = HashMap::new();
        let mut rates = HashMap::new();

        for (height, &(time, feerates)) in layout.iter().enumerate() {
            let coinbase_txid = format!("coinbase-{height}");
            transactions.insert(
                coinbase_txid.clone(),
                Transaction {
                    vin: vec![TxInput {
                        coinbase: Some("04ffff001d".to_string()),
                        txid: None,
                    }],
                },
            );

            let mut tx = vec![coinbase_txid];
            for (i, &rate) in feerates.iter().enumerate() {
                let txid = format!("tx-{height}-{i}");
                transactions.insert(
                    txid.clone(),
                    Transaction {
                        vin: vec![TxInput {
                            coinbase: None,
                            txid: Some(format!("prev-{height}-{i}")),
                        }],
                    },
                );
                rates.insert(txid.clone(), rate);
                tx.push(txid);
            }
            blocks.push(Block { time, tx });
        }

        MockChain {
            blocks,
            transactions,
            rates,
        }
    }

    pub fn oracle(&self) -> FixedOracle {
        FixedOracle {
            rates: self.rates.clone(),
        }
    }
}

impl ChainAccessor for MockChain {
    fn chain_height(&self) -> Result<BlockHeight, FeerateError> {
        Ok(self.blocks.len() as BlockHeight - 1)
    }

    fn block_time(&self, height: BlockHeight) -> Result<Timestamp, FeerateError> {
        self.block_by_height(height).map(|block| block.time)
    }

    fn block_by_height(&self, height: BlockHeight) -> Result<Block, FeerateError> {
        self.blocks
            .get(height as usize)
            .cloned()
            .ok_or_else(|| FeerateError::Rpc(format!("block height {height} out of range")))
    }

    fn transaction_by_id(&self, txid: &str) -> Result<Transaction, FeerateError> {
        self.transactions
            .get(txid)
            .cloned()
            .ok_or_else(|| FeerateError::Rpc(format!("no such transaction: {txid}")))
    }
}

/// Fee oracle backed by a fixed txid -> rate table.
#[derive(Debug, Clone)]
pub struct FixedOracle {
    rates: HashMap<Txid, FeeRate>,
}

impl FeeOracle for FixedOracle {
    fn fee_rate(&self, txid: &str) -> Result<FeeRate, FeerateError> {
        self.rates
            .get(txid)
            .copied()
            .ok_or_else(|| FeerateError::Rpc(format!("no fee rate for {txid}")))
    }
}

/// A per-process unique path under the system temp dir.
pub fn temp_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("feerates-test-{}-{name}", std::process::id()))
}
