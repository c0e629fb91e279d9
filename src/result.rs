use std::fs::OpenOptions;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::FeerateError;

/// One computed F sample, as logged for later analysis.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryRecord {
    pub timestamp: u64,
    pub blocks: u64,
    pub fraction: f64,
    pub feerate: f64,
}

/// Appends `record` to a CSV file, writing the header row only when the
/// file is new.
pub fn append_record(path: &Path, record: &QueryRecord) -> Result<(), FeerateError> {
    let write_header = !path.exists();
    let file = OpenOptions::new().create(true).append(true).open(path)?;

    let mut writer = csv::WriterBuilder::new()
        .has_headers(write_header)
        .from_writer(file);
    writer.serialize(record)?;
    writer.flush()?;
    Ok(())
}
