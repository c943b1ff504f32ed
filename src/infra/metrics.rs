// ============================================================
// Layer 6 — Batch Metrics Logger
// ============================================================
// Records one CSV row per collated batch, so the shape of the
// data the trainer will see can be checked before training:
//
//   batch,rows,seq_len,real_tokens,loss_tokens,padding_fraction
//   0,8,412,2214,903,0.328277
//   1,8,1024,5930,2871,0.276123
//
// How to read the metrics:
//   - a high padding_fraction means batches mix very short and
//     very long dialogues; sorting by length would help
//   - loss_tokens close to 0 means most responses are being
//     truncated away by max_seq_length
//
// Output file: <output_dir>/batch_metrics.csv (recreated per run)

use anyhow::{Context, Result};
use std::{
    fs::{self, OpenOptions},
    io::Write,
    path::{Path, PathBuf},
};
use serde::{Deserialize, Serialize};

/// Token statistics for one collated batch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchMetrics {
    /// 0-based batch index within the run
    pub batch: usize,

    pub rows: usize,

    /// Padded length of every row
    pub seq_len: usize,

    /// Positions with attention_mask = 1
    pub real_tokens: usize,

    /// Positions whose label is not the ignore index
    pub loss_tokens: usize,
}

impl BatchMetrics {
    pub fn new(
        batch:       usize,
        rows:        usize,
        seq_len:     usize,
        real_tokens: usize,
        loss_tokens: usize,
    ) -> Self {
        Self { batch, rows, seq_len, real_tokens, loss_tokens }
    }

    /// Share of the batch's cells that are padding, in [0.0, 1.0]
    pub fn padding_fraction(&self) -> f64 {
        let cells = self.rows * self.seq_len;
        if cells == 0 {
            return 0.0;
        }
        (cells - self.real_tokens.min(cells)) as f64 / cells as f64
    }
}

/// Writes BatchMetrics rows to a CSV file.
pub struct MetricsLogger {
    csv_path: PathBuf,
}

impl MetricsLogger {
    /// Create (or truncate) `<dir>/batch_metrics.csv` and write the header.
    pub fn new(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir)
            .with_context(|| format!("Cannot create '{}'", dir.display()))?;

        let csv_path = dir.join("batch_metrics.csv");
        let mut f = fs::File::create(&csv_path)
            .with_context(|| format!("Cannot create '{}'", csv_path.display()))?;
        writeln!(f, "batch,rows,seq_len,real_tokens,loss_tokens,padding_fraction")?;
        tracing::debug!("Created metrics CSV: '{}'", csv_path.display());

        Ok(Self { csv_path })
    }

    /// Append one batch as a new CSV row.
    pub fn log(&self, m: &BatchMetrics) -> Result<()> {
        let mut f = OpenOptions::new()
            .append(true)
            .open(&self.csv_path)?;

        writeln!(
            f,
            "{},{},{},{},{},{:.6}",
            m.batch,
            m.rows,
            m.seq_len,
            m.real_tokens,
            m.loss_tokens,
            m.padding_fraction(),
        )?;

        tracing::debug!(
            "Batch {}: {}x{} real={} loss={}",
            m.batch,
            m.rows,
            m.seq_len,
            m.real_tokens,
            m.loss_tokens,
        );
        Ok(())
    }

    pub fn csv_path(&self) -> &PathBuf {
        &self.csv_path
    }
}
