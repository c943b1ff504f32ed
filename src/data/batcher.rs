// ============================================================
// Layer 4 — Dialogue Batcher
// ============================================================
// Implements Burn's Batcher trait so a DataLoader can turn a
// Vec<EncodedExample> straight into tensors.
//
// Padding and label masking live in DialogueCollator; this
// file only flattens its rows and reshapes them:
//
//   [row0..., row1..., rowN...] → [batch_size, seq_len]
//
// Reference: Burn Book §4 (Batcher)

use burn::{
    data::dataloader::batcher::Batcher,
    prelude::*,
    tensor::TensorData,
};

use crate::data::collator::{CollatedBatch, DialogueCollator};
use crate::domain::example::EncodedExample;

/// A padded batch ready for a causal-LM forward pass.
/// All tensors have shape [batch_size, seq_len].
#[derive(Debug, Clone)]
pub struct DialogueBatch<B: Backend> {
    /// Token ids, right-padded with the pad id
    pub input_ids: Tensor<B, 2, Int>,

    /// 1 = real token, 0 = padding
    pub attention_mask: Tensor<B, 2, Int>,

    /// Token id where the loss applies, ignore index elsewhere
    pub labels: Tensor<B, 2, Int>,
}

#[derive(Clone, Debug)]
pub struct DialogueBatcher {
    collator: DialogueCollator,
}

impl DialogueBatcher {
    pub fn new(collator: DialogueCollator) -> Self {
        Self { collator }
    }
}

impl<B: Backend> Batcher<B, EncodedExample, DialogueBatch<B>> for DialogueBatcher {
    /// # Panics
    /// Panics on an empty item list. The DataLoader never builds one.
    fn batch(&self, items: Vec<EncodedExample>, device: &B::Device) -> DialogueBatch<B> {
        let collated = self
            .collator
            .collate(&items)
            .unwrap_or_else(|e| panic!("{e}"));

        DialogueBatch {
            input_ids:      rows_to_tensor(&collated, &collated.input_ids, device),
            attention_mask: rows_to_tensor(&collated, &collated.attention_mask, device),
            labels:         rows_to_tensor(&collated, &collated.labels, device),
        }
    }
}

fn rows_to_tensor<B: Backend>(
    batch:  &CollatedBatch,
    rows:   &[Vec<i64>],
    device: &B::Device,
) -> Tensor<B, 2, Int> {
    let flat: Vec<i64> = rows.iter().flatten().copied().collect();
    let data = TensorData::new(flat, [batch.batch_size, batch.seq_len]);
    Tensor::<B, 2, Int>::from_data(data, device)
}
