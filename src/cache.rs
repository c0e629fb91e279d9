use std::collections::HashMap;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::PathBuf;

use crate::error::FeerateError;
use crate::{FeeRate, Timestamp};

/// Stable text form of an F query key. `f64` shortest-display round-trips,
/// so the fraction is safe to embed.
pub fn query_key(t: Timestamp, n: u64, p: f64) -> String {
    format!("{t}:{n}:{p}")
}

/// File-backed `(t, n, p) -> feerate` map that survives process restarts.
///
/// Blockchain history below the tip is append-only and immutable, so an
/// entry written once is correct forever. The store accordingly supports
/// only point lookup and insert-if-absent: no TTL, no invalidation, no
/// delete, and existing entries are never rewritten.
#[derive(Debug)]
pub struct FValueCache {
    path: PathBuf,
    entries: HashMap<String, FeeRate>,
}

impl FValueCache {
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, FeerateError> {
        let path = path.into();
        let entries = if path.exists() {
            serde_json::from_str(&fs::read_to_string(&path)?)?
        } else {
            HashMap::new()
        };
        Ok(FValueCache { path, entries })
    }

    pub fn get(&self, key: &str) -> Option<FeeRate> {
        self.entries.get(key).copied()
    }

    /// Records `value` under `key` unless the key is already present.
    pub fn insert_if_absent(&mut self, key: &str, value: FeeRate) -> Result<(), FeerateError> {
        if self.entries.contains_key(key) {
            return Ok(());
        }
        self.entries.insert(key.to_string(), value);

        // the map goes to a scratch file first so a failed write cannot
        // destroy entries already persisted
        let scratch = self.path.with_extension("tmp");
        let mut writer = BufWriter::new(File::create(&scratch)?);
        serde_json::to_writer_pretty(&mut writer, &self.entries)?;
        writer.flush()?;
        fs::rename(&scratch, &self.path)?;
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
