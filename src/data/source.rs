// ============================================================
// Layer 4 — Record Source
// ============================================================
// Reads a JSONL training file once, eagerly, and keeps every
// Record in memory in file order.
//
//   {"input": "...", "target": "..."}   ← line 1 → index 0
//   {"input": "...", "target": "..."}   ← line 2 → index 1
//
// Error policy:
//   - blank lines are skipped
//   - any other line that is not a valid Record aborts the
//     whole read, naming the file and 1-based line number
//
// Nothing is tokenised here; encoding happens per access in
// DialogueDataset.
//
// Reference: Rust Book §9 (Error Handling), §12 (Reading a File)

use anyhow::{Context, Result};
use std::{
    fs,
    io::{BufRead, BufReader},
    path::Path,
};

use crate::domain::record::Record;

/// An ordered, immutable collection of raw records.
#[derive(Debug, Clone, Default)]
pub struct RecordSource {
    records: Vec<Record>,
}

impl RecordSource {
    /// Wrap records that are already in memory
    pub fn from_records(records: Vec<Record>) -> Self {
        Self { records }
    }

    /// Read every line of a JSONL file.
    pub fn from_jsonl(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = fs::File::open(path)
            .with_context(|| format!("Cannot open training file '{}'", path.display()))?;

        let source = Self::from_reader(BufReader::new(file), &path.display().to_string())?;
        if source.is_empty() {
            tracing::warn!("'{}' contains no records", path.display());
        } else {
            tracing::info!(
                "There are {} records in '{}'",
                source.len(),
                path.display()
            );
        }
        Ok(source)
    }

    /// Read JSONL from any buffered reader. `origin` only appears
    /// in error messages.
    pub fn from_reader<R: BufRead>(reader: R, origin: &str) -> Result<Self> {
        let mut records = Vec::new();

        for (line_num, line) in reader.lines().enumerate() {
            let line = line
                .with_context(|| format!("Cannot read line {} of '{}'", line_num + 1, origin))?;
            if line.trim().is_empty() {
                continue;
            }

            let record: Record = serde_json::from_str(&line).with_context(|| {
                format!("Malformed record at line {} of '{}'", line_num + 1, origin)
            })?;
            records.push(record);
        }

        Ok(Self::from_records(records))
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Record at a 0-based index, or None when out of range
    pub fn get(&self, index: usize) -> Option<&Record> {
        self.records.get(index)
    }
}
