use std::process::Command;

use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::error::FeerateError;
use crate::{BlockHeight, Timestamp, Txid};

/// A block as this crate sees it: mined time plus the ordered txid list.
/// The coinbase transaction is conventionally the first entry.
#[derive(Debug, Clone, Deserialize)]
pub struct Block {
    pub time: Timestamp,
    pub tx: Vec<Txid>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TxInput {
    /// Present only on coinbase inputs, which spend no prior output.
    pub coinbase: Option<String>,
    pub txid: Option<Txid>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Transaction {
    pub vin: Vec<TxInput>,
}

impl Transaction {
    pub fn is_coinbase(&self) -> bool {
        self.vin
            .first()
            .is_some_and(|input| input.coinbase.is_some())
    }
}

/// Read access to blockchain state. Heights below the tip are immutable,
/// so repeated lookups for the same height must return the same data.
pub trait ChainAccessor {
    fn chain_height(&self) -> Result<BlockHeight, FeerateError>;
    fn block_time(&self, height: BlockHeight) -> Result<Timestamp, FeerateError>;
    fn block_by_height(&self, height: BlockHeight) -> Result<Block, FeerateError>;
    fn transaction_by_id(&self, txid: &str) -> Result<Transaction, FeerateError>;
}

/// Runs `bitcoin-cli` subcommands and hands back raw stdout.
#[derive(Debug, Clone)]
pub struct BitcoinCli {
    binary: String,
    base_args: Vec<String>,
}

impl BitcoinCli {
    pub fn new(binary: impl Into<String>, base_args: Vec<String>) -> Self {
        BitcoinCli {
            binary: binary.into(),
            base_args,
        }
    }

    pub fn call(&self, args: &[&str]) -> Result<Vec<u8>, FeerateError> {
        let result = Command::new(&self.binary)
            .args(&self.base_args)
            .args(args)
            .output()?;

        if result.status.success() {
            Ok(result.stdout)
        } else {
            let stderr = String::from_utf8_lossy(&result.stderr);
            Err(FeerateError::Rpc(stderr.trim().to_string()))
        }
    }

    pub fn call_json<T: DeserializeOwned>(&self, args: &[&str]) -> Result<T, FeerateError> {
        Ok(serde_json::from_slice(&self.call(args)?)?)
    }

    /// For subcommands whose output is a bare string rather than JSON,
    /// e.g. `getblockhash`.
    pub fn call_text(&self, args: &[&str]) -> Result<String, FeerateError> {
        let stdout = self.call(args)?;
        Ok(String::from_utf8_lossy(&stdout).trim().to_string())
    }
}

/// Chain accessor backed by a local `bitcoin-cli`.
#[derive(Debug, Clone)]
pub struct BitcoinCliChain {
    cli: BitcoinCli,
}

impl BitcoinCliChain {
    pub fn new(cli: BitcoinCli) -> Self {
        BitcoinCliChain { cli }
    }

    fn block_hash(&self, height: BlockHeight) -> Result<String, FeerateError> {
        self.cli.call_text(&["getblockhash", &height.to_string()])
    }
}

impl ChainAccessor for BitcoinCliChain {
    fn chain_height(&self) -> Result<BlockHeight, FeerateError> {
        self.cli.call_json(&["getblockcount"])
    }

    fn block_time(&self, height: BlockHeight) -> Result<Timestamp, FeerateError> {
        #[derive(Deserialize)]
        struct Header {
            time: Timestamp,
        }

        let hash = self.block_hash(height)?;
        let header: Header = self.cli.call_json(&["getblockheader", &hash])?;
        Ok(header.time)
    }

    fn block_by_height(&self, height: BlockHeight) -> Result<Block, FeerateError> {
        let hash = self.block_hash(height)?;
        self.cli.call_json(&["getblock", &hash, "1"])
    }

    fn transaction_by_id(&self, txid: &str) -> Result<Transaction, FeerateError> {
        self.cli.call_json(&["getrawtransaction", txid, "1"])
    }
}
