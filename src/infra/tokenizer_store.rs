// ============================================================
// Layer 6 — Tokenizer Store
// ============================================================
// Loads a HuggingFace `tokenizer.json` and adapts it to the
// TextTokenizer capability the encoder expects.
//
// Special-token resolution, first match wins:
//   1. explicit overrides (CLI flags / args file)
//   2. bos_token / eos_token / pad_token in a sibling
//      tokenizer_config.json, either "<s>" or {"content": "<s>"}
//   3. "<s>" / "</s>" for bos / eos (no default pad)
//
// bos and eos must be in the vocabulary. A pad token that is
// not is dropped, and the collator pads with eos instead.
//
// Any padding configured inside tokenizer.json is switched off:
// every turn must be tokenised to its natural length.

use anyhow::{Context, Result};
use serde_json::Value;
use std::{
    fs,
    path::{Path, PathBuf},
};
use tokenizers::Tokenizer;

use crate::domain::traits::{SpecialTokens, TextTokenizer};

pub const DEFAULT_BOS_TOKEN: &str = "<s>";
pub const DEFAULT_EOS_TOKEN: &str = "</s>";

/// Special-token strings chosen by the user; `None` means "look it up".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SpecialTokenOverrides {
    pub bos_token: Option<String>,
    pub eos_token: Option<String>,
    pub pad_token: Option<String>,
}

/// A HuggingFace tokenizer with its resolved special tokens.
pub struct HfTokenizer {
    inner:    Tokenizer,
    specials: SpecialTokens,
}

impl HfTokenizer {
    /// Wrap an already-loaded tokenizer and look up the ids of the
    /// given special-token strings.
    pub fn new(
        mut inner: Tokenizer,
        bos_token: &str,
        eos_token: &str,
        pad_token: Option<&str>,
    ) -> Result<Self> {
        inner.with_padding(None);
        if inner.get_truncation().is_some() {
            tracing::warn!("Ignoring truncation configured in tokenizer.json");
            inner
                .with_truncation(None)
                .map_err(|e| anyhow::anyhow!("Cannot disable tokenizer truncation: {e}"))?;
        }

        let bos_id = lookup(&inner, bos_token, "bos")?;
        let eos_id = lookup(&inner, eos_token, "eos")?;

        let pad_id = match pad_token {
            Some(tok) => {
                let id = inner.token_to_id(tok);
                if id.is_none() {
                    tracing::warn!(
                        "Pad token '{}' is not in the vocabulary, padding with eos instead",
                        tok
                    );
                }
                id
            }
            None => None,
        };

        Ok(Self {
            inner,
            specials: SpecialTokens {
                bos_token: bos_token.to_string(),
                bos_id,
                eos_token: eos_token.to_string(),
                eos_id,
                pad_id,
            },
        })
    }
}

fn lookup(tokenizer: &Tokenizer, token: &str, what: &str) -> Result<u32> {
    anyhow::ensure!(!token.is_empty(), "The {what} token must not be empty");
    tokenizer
        .token_to_id(token)
        .ok_or_else(|| anyhow::anyhow!("The {what} token '{token}' is not in the vocabulary"))
}

impl TextTokenizer for HfTokenizer {
    fn encode_batch(&self, texts: &[&str]) -> Result<Vec<Vec<u32>>> {
        let encodings = self
            .inner
            .encode_batch(texts.to_vec(), false)
            .map_err(|e| anyhow::anyhow!("Tokenisation error: {e}"))?;

        Ok(encodings
            .iter()
            .map(|enc| enc.get_ids().to_vec())
            .collect())
    }

    fn special_tokens(&self) -> &SpecialTokens {
        &self.specials
    }

    fn id_to_token(&self, id: u32) -> Option<String> {
        self.inner.id_to_token(id)
    }
}

// ─── TokenizerStore ───────────────────────────────────────────────────────────
/// Locates tokenizer files given either a `tokenizer.json` path
/// or a model directory that contains one.
pub struct TokenizerStore {
    path: PathBuf,
}

impl TokenizerStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the tokenizer.json file
    pub fn tokenizer_file(&self) -> PathBuf {
        if self.path.is_dir() {
            self.path.join("tokenizer.json")
        } else {
            self.path.clone()
        }
    }

    /// Path of the tokenizer_config.json sitting next to tokenizer.json
    pub fn config_file(&self) -> PathBuf {
        let file = self.tokenizer_file();
        file.parent()
            .unwrap_or_else(|| Path::new("."))
            .join("tokenizer_config.json")
    }

    /// Load the tokenizer and resolve its special tokens.
    pub fn load(&self, overrides: &SpecialTokenOverrides) -> Result<HfTokenizer> {
        let path = self.tokenizer_file();
        let tokenizer = Tokenizer::from_file(&path).map_err(|e| {
            anyhow::anyhow!("Cannot load tokenizer from '{}': {}", path.display(), e)
        })?;

        let file_config = self.read_config()?;
        let resolve = |explicit: &Option<String>, key: &str| {
            explicit
                .clone()
                .or_else(|| file_config.as_ref().and_then(|cfg| config_token(cfg, key)))
        };

        let bos = resolve(&overrides.bos_token, "bos_token")
            .unwrap_or_else(|| DEFAULT_BOS_TOKEN.to_string());
        let eos = resolve(&overrides.eos_token, "eos_token")
            .unwrap_or_else(|| DEFAULT_EOS_TOKEN.to_string());
        let pad = resolve(&overrides.pad_token, "pad_token");

        let hf = HfTokenizer::new(tokenizer, &bos, &eos, pad.as_deref())?;
        let sp = hf.special_tokens();
        tracing::info!(
            "Loaded tokenizer '{}' (bos={}:{}, eos={}:{}, pad={:?})",
            path.display(),
            sp.bos_token,
            sp.bos_id,
            sp.eos_token,
            sp.eos_id,
            sp.pad_id,
        );
        Ok(hf)
    }

    fn read_config(&self) -> Result<Option<Value>> {
        let path = self.config_file();
        if !path.exists() {
            return Ok(None);
        }
        let json = fs::read_to_string(&path)
            .with_context(|| format!("Cannot read '{}'", path.display()))?;
        let value = serde_json::from_str(&json)
            .with_context(|| format!("Invalid JSON in '{}'", path.display()))?;
        Ok(Some(value))
    }
}

/// Read a special token from tokenizer_config.json, accepting both
/// the plain-string and the AddedToken-object forms.
fn config_token(config: &Value, key: &str) -> Option<String> {
    match config.get(key)? {
        Value::String(s) => Some(s.clone()),
        Value::Object(obj) => obj.get("content")?.as_str().map(str::to_string),
        _ => None,
    }
}

// ─── Test fixture ─────────────────────────────────────────────────────────────
#[cfg(test)]
fn added_token(id: u32, content: &str) -> Value {
    serde_json::json!({
        "id": id, "content": content, "single_word": false, "lstrip": false,
        "rstrip": false, "normalized": false, "special": true
    })
}

/// Write a word-level tokenizer.json with batch padding turned on.
#[cfg(test)]
pub(crate) fn write_test_tokenizer(dir: &Path) {
    let json = serde_json::json!({
        "version": "1.0",
        "truncation": null,
        "padding": {
            "strategy": "BatchLongest",
            "direction": "Right",
            "pad_to_multiple_of": null,
            "pad_id": 0,
            "pad_type_id": 0,
            "pad_token": "<pad>"
        },
        "added_tokens": [
            added_token(0, "<pad>"), added_token(1, "<s>"), added_token(2, "</s>"),
            added_token(3, "<unk>"), added_token(4, "<|end|>")
        ],
        "normalizer": null,
        "pre_tokenizer": { "type": "Whitespace" },
        "post_processor": null,
        "decoder": null,
        "model": {
            "type": "WordLevel",
            "vocab": {
                "<pad>": 0, "<s>": 1, "</s>": 2, "<unk>": 3, "<|end|>": 4,
                "hi": 10, "hello": 11, "bye": 12
            },
            "unk_token": "<unk>"
        }
    });
    fs::write(dir.join("tokenizer.json"), json.to_string()).unwrap();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_resolve_from_vocab() {
        let dir = tempfile::tempdir().unwrap();
        write_test_tokenizer(dir.path());

        let tok = TokenizerStore::new(dir.path())
            .load(&SpecialTokenOverrides::default())
            .unwrap();
        let sp = tok.special_tokens();
        assert_eq!((sp.bos_id, sp.eos_id, sp.pad_id), (1, 2, None));
        assert_eq!(sp.padding_id(), 2);
    }

    #[test]
    fn test_encode_batch_adds_no_specials_and_no_padding() {
        let dir = tempfile::tempdir().unwrap();
        write_test_tokenizer(dir.path());

        let tok = TokenizerStore::new(dir.path().join("tokenizer.json"))
            .load(&SpecialTokenOverrides::default())
            .unwrap();
        let ids = tok.encode_batch(&["hi hello", "bye"]).unwrap();
        assert_eq!(ids, vec![vec![10, 11], vec![12]]);
        assert_eq!(tok.id_to_token(11).as_deref(), Some("hello"));
    }

    #[test]
    fn test_tokenizer_config_is_used() {
        let dir = tempfile::tempdir().unwrap();
        write_test_tokenizer(dir.path());
        fs::write(
            dir.path().join("tokenizer_config.json"),
            r#"{"bos_token": {"content": "<s>"}, "eos_token": "<|end|>", "pad_token": "<pad>"}"#,
        )
        .unwrap();

        let tok = TokenizerStore::new(dir.path())
            .load(&SpecialTokenOverrides::default())
            .unwrap();
        let sp = tok.special_tokens();
        assert_eq!(sp.eos_token, "<|end|>");
        assert_eq!((sp.bos_id, sp.eos_id, sp.pad_id), (1, 4, Some(0)));
    }

    #[test]
    fn test_overrides_win_over_config() {
        let dir = tempfile::tempdir().unwrap();
        write_test_tokenizer(dir.path());
        fs::write(dir.path().join("tokenizer_config.json"), r#"{"eos_token": "<|end|>"}"#).unwrap();

        let overrides = SpecialTokenOverrides {
            eos_token: Some("</s>".into()),
            ..Default::default()
        };
        let tok = TokenizerStore::new(dir.path()).load(&overrides).unwrap();
        assert_eq!(tok.special_tokens().eos_id, 2);
    }

    #[test]
    fn test_unknown_eos_fails() {
        let dir = tempfile::tempdir().unwrap();
        write_test_tokenizer(dir.path());

        let overrides = SpecialTokenOverrides {
            eos_token: Some("<eos>".into()),
            ..Default::default()
        };
        let err = TokenizerStore::new(dir.path()).load(&overrides).err().unwrap();
        assert!(err.to_string().contains("<eos>"));
    }

    #[test]
    fn test_unknown_pad_is_dropped() {
        let dir = tempfile::tempdir().unwrap();
        write_test_tokenizer(dir.path());

        let overrides = SpecialTokenOverrides {
            pad_token: Some("[PAD]".into()),
            ..Default::default()
        };
        let tok = TokenizerStore::new(dir.path()).load(&overrides).unwrap();
        assert_eq!(tok.special_tokens().pad_id, None);
    }

    #[test]
    fn test_missing_tokenizer_fails() {
        let dir = tempfile::tempdir().unwrap();
        assert!(TokenizerStore::new(dir.path())
            .load(&SpecialTokenOverrides::default())
            .is_err());
    }

    #[test]
    fn test_configured_truncation_is_disabled() {
        let dir = tempfile::tempdir().unwrap();
        write_test_tokenizer(dir.path());
        let path = dir.path().join("tokenizer.json");
        let mut json: Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        json["truncation"] = serde_json::json!({
            "direction": "Right", "max_length": 1, "strategy": "LongestFirst", "stride": 0
        });
        fs::write(&path, json.to_string()).unwrap();

        let tok = TokenizerStore::new(dir.path())
            .load(&SpecialTokenOverrides::default())
            .unwrap();
        assert_eq!(tok.encode_batch(&["hi hello bye"]).unwrap(), vec![vec![10, 11, 12]]);
    }
}
