// ============================================================
// Layer 2 — Prepare Configuration
// ============================================================
// All settings for a prepare run. Built either from CLI flags
// or from a JSON args file; missing keys take the defaults
// below. The aliases accept the key names used by common
// HuggingFace training-args files, so an existing
// `train_args/finetune.json` can be pointed at directly:
//
//   {
//     "train_file": "data/dialogues.jsonl",
//     "model_name_or_path": "models/bloom-560m",
//     "max_seq_length": 512,
//     "per_device_train_batch_size": 4,
//     "seed": 42
//   }

use anyhow::{ensure, Context, Result};
use serde::{Deserialize, Serialize};
use std::{fs, path::Path};

use crate::data::collator::IGNORE_INDEX;
use crate::infra::tokenizer_store::SpecialTokenOverrides;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PrepareConfig {
    /// JSONL file, one {"input", "target"} object per line
    pub train_file: String,

    /// tokenizer.json, or a model directory containing one
    #[serde(alias = "model_name_or_path")]
    pub tokenizer_path: String,

    pub output_dir: String,

    pub max_seq_length: usize,

    #[serde(alias = "per_device_train_batch_size")]
    pub batch_size: usize,

    /// Dataloader worker threads; 0 batches on the calling thread
    #[serde(alias = "dataloader_num_workers")]
    pub num_workers: usize,

    /// Shuffle batches with this seed; file order when absent
    pub shuffle_seed: Option<u64>,

    /// Training-args seed, used for shuffling only when
    /// `shuffle_seed` is not set
    pub seed: Option<u64>,

    pub bos_token: Option<String>,
    pub eos_token: Option<String>,
    pub pad_token: Option<String>,

    /// Label value for positions excluded from the loss
    pub ignore_index: i64,

    /// Also write every encoded example to encoded.jsonl
    pub export_encoded: bool,
}

impl Default for PrepareConfig {
    fn default() -> Self {
        Self {
            train_file:     "data/train.jsonl".to_string(),
            tokenizer_path: "tokenizer".to_string(),
            output_dir:     "output".to_string(),
            max_seq_length: 1024,
            batch_size:     8,
            num_workers:    1,
            shuffle_seed:   None,
            seed:           None,
            bos_token:      None,
            eos_token:      None,
            pad_token:      None,
            ignore_index:   IGNORE_INDEX,
            export_encoded: false,
        }
    }
}

impl PrepareConfig {
    /// Read a JSON args file. Unknown keys are ignored.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = fs::read_to_string(path)
            .with_context(|| format!("Cannot read config from '{}'", path.display()))?;
        serde_json::from_str(&json)
            .with_context(|| format!("Invalid config in '{}'", path.display()))
    }

    pub fn validate(&self) -> Result<()> {
        ensure!(self.max_seq_length > 0, "max_seq_length must be positive");
        ensure!(self.batch_size > 0, "batch_size must be positive");
        Ok(())
    }

    /// The seed batches are shuffled with, if any
    pub fn effective_shuffle_seed(&self) -> Option<u64> {
        self.shuffle_seed.or(self.seed)
    }

    pub fn special_token_overrides(&self) -> SpecialTokenOverrides {
        SpecialTokenOverrides {
            bos_token: self.bos_token.clone(),
            eos_token: self.eos_token.clone(),
            pad_token: self.pad_token.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_keys_take_defaults() {
        let cfg: PrepareConfig =
            serde_json::from_str(r#"{"train_file": "a.jsonl", "max_seq_length": 16}"#).unwrap();
        assert_eq!(cfg.train_file, "a.jsonl");
        assert_eq!(cfg.max_seq_length, 16);
        assert_eq!(cfg.batch_size, 8);
        assert_eq!(cfg.ignore_index, -100);
    }

    #[test]
    fn test_training_args_aliases() {
        let json = r#"{
            "model_name_or_path": "models/bloom",
            "per_device_train_batch_size": 4,
            "seed": 42,
            "learning_rate": 1e-4
        }"#;
        let cfg: PrepareConfig = serde_json::from_str(json).unwrap();
        assert_eq!(cfg.tokenizer_path, "models/bloom");
        assert_eq!(cfg.batch_size, 4);
        assert_eq!(cfg.effective_shuffle_seed(), Some(42));
    }

    #[test]
    fn test_shuffle_seed_wins_over_training_seed() {
        let cfg: PrepareConfig =
            serde_json::from_str(r#"{"seed": 42, "shuffle_seed": 7}"#).unwrap();
        assert_eq!(cfg.effective_shuffle_seed(), Some(7));
        assert_eq!(PrepareConfig::default().effective_shuffle_seed(), None);
    }

    #[test]
    fn test_zero_dataloader_workers_is_valid() {
        let json = r#"{"model_name_or_path": "m", "dataloader_num_workers": 0, "seed": 42}"#;
        let cfg: PrepareConfig = serde_json::from_str(json).unwrap();
        assert_eq!(cfg.num_workers, 0);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_zero_sizes() {
        let cfg = PrepareConfig { max_seq_length: 0, ..Default::default() };
        assert!(cfg.validate().is_err());
        let cfg = PrepareConfig { batch_size: 0, ..Default::default() };
        assert!(cfg.validate().is_err());
        assert!(PrepareConfig::default().validate().is_ok());
    }

    #[test]
    fn test_reads_json_file() {
        let dir  = tempfile::tempdir().unwrap();
        let path = dir.path().join("args.json");
        fs::write(&path, r#"{"eos_token": "<|end|>"}"#).unwrap();

        let cfg = PrepareConfig::from_json_file(&path).unwrap();
        assert_eq!(cfg.special_token_overrides().eos_token.as_deref(), Some("<|end|>"));
        assert!(PrepareConfig::from_json_file(dir.path().join("none.json")).is_err());
    }
}
