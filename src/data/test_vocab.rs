// Fixed word-level vocabulary used by unit tests across the crate.

use std::collections::HashMap;

use anyhow::Result;

use crate::domain::traits::{SpecialTokens, TextTokenizer};

/// Id returned for words missing from the vocabulary
pub const UNK_ID: u32 = 99;

/// Whitespace tokenizer over a hand-written vocabulary.
pub struct VocabTokenizer {
    vocab:    HashMap<String, u32>,
    specials: SpecialTokens,
}

impl VocabTokenizer {
    /// bos "<s>" = 1, eos "</s>" = 2, pad = 0
    pub fn new() -> Self {
        Self::with_specials(SpecialTokens {
            bos_token: "<s>".into(),
            bos_id:    1,
            eos_token: "</s>".into(),
            eos_id:    2,
            pad_id:    Some(0),
        })
    }

    pub fn with_specials(specials: SpecialTokens) -> Self {
        let vocab = [
            ("hi", 10), ("hello", 20), ("bye", 30),
            ("how", 40), ("are", 41), ("you", 42),
            ("fine", 50), ("thanks", 51),
        ]
        .into_iter()
        .map(|(w, id)| (w.to_string(), id))
        .collect();
        Self { vocab, specials }
    }
}

impl TextTokenizer for VocabTokenizer {
    fn encode_batch(&self, texts: &[&str]) -> Result<Vec<Vec<u32>>> {
        Ok(texts
            .iter()
            .map(|t| {
                t.split_whitespace()
                    .map(|w| self.vocab.get(w).copied().unwrap_or(UNK_ID))
                    .collect()
            })
            .collect())
    }

    fn special_tokens(&self) -> &SpecialTokens {
        &self.specials
    }

    fn id_to_token(&self, id: u32) -> Option<String> {
        self.vocab
            .iter()
            .find(|(_, v)| **v == id)
            .map(|(k, _)| k.clone())
    }
}

/// Tokenizer whose encode always fails, for error-path tests.
pub struct FailingTokenizer {
    specials: SpecialTokens,
}

impl FailingTokenizer {
    pub fn new() -> Self {
        Self { specials: VocabTokenizer::new().specials }
    }
}

impl TextTokenizer for FailingTokenizer {
    fn encode_batch(&self, _texts: &[&str]) -> Result<Vec<Vec<u32>>> {
        anyhow::bail!("tokenizer backend unavailable")
    }

    fn special_tokens(&self) -> &SpecialTokens {
        &self.specials
    }
}
