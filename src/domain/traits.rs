// ============================================================
// Layer 3 — Core Traits (Abstractions)
// ============================================================
// The encoder never touches a concrete tokenizer library.
// It only needs three things from a tokenizer:
//
//   1. text → ids for a batch of strings, WITHOUT adding any
//      special tokens on its own
//   2. the begin/end-of-sequence tokens (string and id)
//   3. an id to pad with
//
// Implementations:
//   - HfTokenizer (infra) → HuggingFace tokenizer.json files
//   - test vocabularies   → fixed word → id maps
//
// Reference: Rust Book §10 (Traits: Defining Shared Behaviour)

use anyhow::Result;

/// The special tokens the encoder and collator rely on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecialTokens {
    /// Begin-of-sequence marker as it appears in text, e.g. "<s>"
    pub bos_token: String,
    pub bos_id:    u32,

    /// End-of-sequence marker as it appears in text, e.g. "</s>"
    /// Also used to split a target into turns.
    pub eos_token: String,
    pub eos_id:    u32,

    /// Dedicated padding id, if the vocabulary has one
    pub pad_id: Option<u32>,
}

impl SpecialTokens {
    /// The id used for right-padding: the pad id when defined,
    /// otherwise the eos id
    pub fn padding_id(&self) -> u32 {
        self.pad_id.unwrap_or(self.eos_id)
    }
}

// ─── TextTokenizer ────────────────────────────────────────────────────────────
/// Text → token id capability.
///
/// Implementations must be `Send + Sync`: dataloader workers share
/// one tokenizer and encode disjoint records concurrently.
pub trait TextTokenizer: Send + Sync {
    /// Tokenise each string independently, without special tokens.
    /// Returns one id list per input, in the same order.
    fn encode_batch(&self, texts: &[&str]) -> Result<Vec<Vec<u32>>>;

    /// The begin/end/pad tokens of this vocabulary
    fn special_tokens(&self) -> &SpecialTokens;

    /// Reverse lookup, used for human-readable dumps only
    fn id_to_token(&self, _id: u32) -> Option<String> {
        None
    }
}
