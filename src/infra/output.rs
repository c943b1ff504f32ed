// ============================================================
// Layer 6 — Output Directory
// ============================================================
// Everything a prepare run writes lives in one directory:
//
//   output/
//     prepare_config.json  ← the resolved configuration
//     batch_metrics.csv    ← written by MetricsLogger
//     prepare.log          ← the run's log, appended per run
//     encoded.jsonl        ← optional, one EncodedExample per line
//
// Saving the config next to the data makes a run reproducible:
// `prepare --config output/prepare_config.json` repeats it.

use anyhow::{Context, Result};
use std::{
    fs,
    io::{BufWriter, Write},
    path::{Path, PathBuf},
};

use crate::application::config::PrepareConfig;
use crate::domain::example::EncodedExample;

pub struct OutputDir {
    dir: PathBuf,
}

impl OutputDir {
    /// Open the output directory, creating it (and parents) if needed.
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)
            .with_context(|| format!("Cannot create output directory '{}'", dir.display()))?;
        Ok(Self { dir })
    }

    pub fn path(&self) -> &Path {
        &self.dir
    }

    pub fn save_config(&self, cfg: &PrepareConfig) -> Result<()> {
        let path = self.dir.join("prepare_config.json");
        let json = serde_json::to_string_pretty(cfg)?;

        fs::write(&path, json)
            .with_context(|| format!("Cannot write config to '{}'", path.display()))?;

        tracing::debug!("Saved prepare config to '{}'", path.display());
        Ok(())
    }

    /// Where the prepare run's log is written
    pub fn log_file(&self) -> PathBuf {
        self.dir.join("prepare.log")
    }

    /// Write examples as JSON lines to `encoded.jsonl`, in iteration
    /// order. Returns how many were written.
    pub fn export_examples<I>(&self, examples: I) -> Result<usize>
    where
        I: IntoIterator<Item = Result<EncodedExample>>,
    {
        let path = self.dir.join("encoded.jsonl");
        let file = fs::File::create(&path)
            .with_context(|| format!("Cannot create '{}'", path.display()))?;
        let mut out = BufWriter::new(file);

        let mut written = 0usize;
        for example in examples {
            serde_json::to_writer(&mut out, &example?)?;
            out.write_all(b"\n")?;
            written += 1;
        }
        out.flush()
            .with_context(|| format!("Cannot flush '{}'", path.display()))?;

        tracing::info!("Exported {} encoded examples to '{}'", written, path.display());
        Ok(written)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_round_trips_through_disk() {
        let dir = tempfile::tempdir().unwrap();
        let out = OutputDir::new(dir.path().join("nested/out")).unwrap();

        let cfg = PrepareConfig {
            max_seq_length: 77,
            shuffle_seed:   Some(3),
            ..PrepareConfig::default()
        };
        out.save_config(&cfg).unwrap();
        let loaded =
            PrepareConfig::from_json_file(out.path().join("prepare_config.json")).unwrap();
        assert_eq!(loaded.max_seq_length, 77);
        assert_eq!(loaded.shuffle_seed, Some(3));
        assert_eq!(out.log_file(), dir.path().join("nested/out/prepare.log"));
    }

    #[test]
    fn test_export_writes_one_line_per_example() {
        let dir = tempfile::tempdir().unwrap();
        let out = OutputDir::new(dir.path()).unwrap();
        let ex  = EncodedExample {
            input_ids:      vec![1, 10, 2],
            attention_mask: vec![1, 1, 1],
            target_mask:    vec![0, 1, 1],
        };

        let n = out
            .export_examples(vec![Ok(ex.clone()), Ok(ex.clone())])
            .unwrap();
        assert_eq!(n, 2);

        let text = fs::read_to_string(dir.path().join("encoded.jsonl")).unwrap();
        let first: EncodedExample = serde_json::from_str(text.lines().next().unwrap()).unwrap();
        assert_eq!(first, ex);
        assert_eq!(text.lines().count(), 2);
    }

    #[test]
    fn test_export_stops_on_error() {
        let dir = tempfile::tempdir().unwrap();
        let out = OutputDir::new(dir.path()).unwrap();
        let res = out.export_examples(vec![Err(anyhow::anyhow!("boom"))]);
        assert!(res.is_err());
    }
}
