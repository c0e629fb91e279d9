pub mod block_fees;
pub mod cache;
pub mod chain;
pub mod config;
pub mod engine;
pub mod error;
pub mod height;
pub mod oracle;
pub mod result;

#[cfg(test)]
pub(crate) mod testing;

/// Chain-native time, unix seconds.
pub type Timestamp = u64;

pub type BlockHeight = u64;

/// Fee paid per virtual byte, in satoshi.
pub type FeeRate = f64;

pub type Txid = String;

pub use engine::FQueryEngine;
pub use error::FeerateError;
