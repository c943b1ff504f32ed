// ============================================================
// Layer 3 — EncodedExample Domain Type
// ============================================================
// The output of the encoder for one record. Three parallel
// sequences of equal length:
//
//   input_ids      — token ids: <bos> turn0 <eos> turn1 <eos> ...
//   attention_mask — 1 for every position (no padding yet)
//   target_mask    — 1 where the model's prediction is trained on
//
// Example (prompt "hi" → 10, response "hello" → 20, bos=1, eos=2):
//   input_ids      = [1, 10, 2, 20, 2]
//   attention_mask = [1,  1, 1,  1, 1]
//   target_mask    = [0,  0, 0,  1, 1]
//
// Padding is added later by the collator, per batch.
//
// Reference: Rust Book §5 (Structs), §8 (Vectors)

use serde::{Deserialize, Serialize};

/// One encoded, unpadded training example.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncodedExample {
    pub input_ids:      Vec<u32>,
    pub attention_mask: Vec<u8>,
    pub target_mask:    Vec<u8>,
}

impl EncodedExample {
    /// Number of positions in the example
    pub fn len(&self) -> usize {
        self.input_ids.len()
    }

    /// Number of positions whose loss is computed
    pub fn loss_token_count(&self) -> usize {
        self.target_mask.iter().filter(|&&m| m == 1).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_loss_token_count() {
        let ex = EncodedExample {
            input_ids:      vec![1, 10, 2, 20, 2],
            attention_mask: vec![1; 5],
            target_mask:    vec![0, 0, 0, 1, 1],
        };
        assert_eq!(ex.len(), 5);
        assert_eq!(ex.loss_token_count(), 2);
    }
}
