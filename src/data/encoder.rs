// ============================================================
// Layer 4 — Example Encoder
// ============================================================
// Turns one raw Record into a flat token sequence plus a
// target (loss) mask.
//
// Record format:
//   input  = "<s>input1</s>"
//   target = "target1</s>input2</s>target2</s>"
//
// Encoded layout:
//   <bos> input1 <eos> target1 <eos> input2 <eos> target2 <eos>
//     0     0..0   0    1..1    1     0..0   0     1..1    1     ← target_mask
//
// Steps:
//   1. Rewrite the literal "<s>" / "</s>" markers into the
//      tokenizer's own bos/eos strings
//   2. Split the target on eos into turns
//   3. [input] + turns, each trimmed, tagged Prompt/Response;
//      an odd trailing turn is dropped
//   4. Tokenise every turn independently (no special tokens)
//   5. Concatenate turn ids, each followed by eos; mask follows
//      the role of the turn
//   6. Hard right-truncate to max_seq_length
//
// Encoding is a pure function of the record and the tokenizer,
// so any number of dataloader workers can share one encoder.

use std::sync::Arc;

use anyhow::{ensure, Result};

use crate::domain::{
    example::EncodedExample,
    record::Record,
    traits::TextTokenizer,
    utterance::{pair_turns, Utterance},
};

/// Literal begin-of-sequence marker used in the training files
pub const RAW_BOS_MARKER: &str = "<s>";

/// Literal end-of-sequence marker used in the training files
pub const RAW_EOS_MARKER: &str = "</s>";

pub struct ExampleEncoder<T: TextTokenizer> {
    tokenizer:      Arc<T>,
    max_seq_length: usize,
}

impl<T: TextTokenizer> Clone for ExampleEncoder<T> {
    fn clone(&self) -> Self {
        Self {
            tokenizer:      Arc::clone(&self.tokenizer),
            max_seq_length: self.max_seq_length,
        }
    }
}

impl<T: TextTokenizer> ExampleEncoder<T> {
    /// Create an encoder that truncates to `max_seq_length` tokens.
    ///
    /// # Panics
    /// Panics if `max_seq_length` is 0.
    pub fn new(tokenizer: Arc<T>, max_seq_length: usize) -> Self {
        assert!(max_seq_length > 0, "max_seq_length must be positive");
        Self { tokenizer, max_seq_length }
    }

    pub fn tokenizer(&self) -> &T {
        &self.tokenizer
    }

    /// Split a record into role-tagged turns (steps 1–3).
    pub fn utterances(&self, record: &Record) -> Vec<Utterance> {
        let specials = self.tokenizer.special_tokens();
        let input  = self.normalise_markers(&record.input);
        let target = self.normalise_markers(&record.target);

        let turns = std::iter::once(input.as_str())
            .chain(target.split(specials.eos_token.as_str()))
            .map(str::trim);

        pair_turns(turns)
    }

    /// Encode one record (steps 1–6).
    pub fn encode(&self, record: &Record) -> Result<EncodedExample> {
        let specials   = self.tokenizer.special_tokens();
        let utterances = self.utterances(record);

        let texts: Vec<&str> = utterances.iter().map(|u| u.text.as_str()).collect();
        let turn_ids = if texts.is_empty() {
            Vec::new()
        } else {
            self.tokenizer.encode_batch(&texts)?
        };
        ensure!(
            turn_ids.len() == utterances.len(),
            "tokenizer returned {} id lists for {} turns",
            turn_ids.len(),
            utterances.len()
        );

        let mut input_ids   = vec![specials.bos_id];
        let mut target_mask = vec![0u8];

        for (utterance, ids) in utterances.iter().zip(&turn_ids) {
            input_ids.extend_from_slice(ids);
            input_ids.push(specials.eos_id);
            // +1 covers the eos that closes this turn
            target_mask.extend(std::iter::repeat(utterance.role.mask_value()).take(ids.len() + 1));
        }
        assert_eq!(
            input_ids.len(),
            target_mask.len(),
            "input_ids and target_mask diverged during assembly"
        );

        let full_len = input_ids.len();
        input_ids.truncate(self.max_seq_length);
        target_mask.truncate(self.max_seq_length);
        if full_len > self.max_seq_length {
            tracing::debug!(
                "Truncated example from {} to {} tokens",
                full_len,
                self.max_seq_length
            );
        }

        let attention_mask = vec![1u8; input_ids.len()];
        assert!(
            input_ids.len() == target_mask.len() && input_ids.len() == attention_mask.len(),
            "encoded sequences have different lengths"
        );

        Ok(EncodedExample { input_ids, attention_mask, target_mask })
    }

    /// Trim and replace the file's literal markers with the
    /// tokenizer's canonical bos/eos strings.
    fn normalise_markers(&self, text: &str) -> String {
        let specials = self.tokenizer.special_tokens();
        text.trim()
            .replace(RAW_BOS_MARKER, &specials.bos_token)
            .replace(RAW_EOS_MARKER, &specials.eos_token)
    }
}
