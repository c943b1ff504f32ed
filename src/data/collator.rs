// ============================================================
// Layer 4 — Dialogue Collator
// ============================================================
// Right-pads a list of EncodedExamples to one common length
// and derives the labels used by the causal-LM loss.
//
//   example A (len 5): ids [1 10 2 20 2]   mask [0 0 0 1 1]
//   example B (len 3): ids [1 10 2]        mask [0 0 0]
//
//   input_ids      = [[1 10 2 20 2], [1 10 2 pad pad]]
//   attention_mask = [[1  1 1  1 1], [1  1 1   0   0]]
//   labels         = [[-100 -100 -100 20 2],
//                     [-100 -100 -100 -100 -100]]
//
// labels copy input_ids where target_mask is 1 and hold the
// ignore index everywhere else, padding included, so the
// model is never trained to predict a pad token.
//
// This type is backend-free; DialogueBatcher turns its output
// into Burn tensors.

use anyhow::{ensure, Result};

use crate::domain::{example::EncodedExample, traits::SpecialTokens};

/// Label value excluded from the loss
pub const IGNORE_INDEX: i64 = -100;

/// A padded batch as plain row vectors.
///
/// Every row of every field has exactly `seq_len` entries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollatedBatch {
    pub batch_size:     usize,
    pub seq_len:        usize,
    pub input_ids:      Vec<Vec<i64>>,
    pub attention_mask: Vec<Vec<i64>>,
    pub labels:         Vec<Vec<i64>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DialogueCollator {
    pad_id:         u32,
    ignore_index:   i64,
    max_seq_length: Option<usize>,
}

impl DialogueCollator {
    pub fn new(pad_id: u32) -> Self {
        Self {
            pad_id,
            ignore_index:   IGNORE_INDEX,
            max_seq_length: None,
        }
    }

    /// Pad with the tokenizer's pad id, or eos when it has none
    pub fn from_special_tokens(specials: &SpecialTokens) -> Self {
        Self::new(specials.padding_id())
    }

    pub fn with_ignore_index(mut self, ignore_index: i64) -> Self {
        self.ignore_index = ignore_index;
        self
    }

    /// Cap the padded length; longer rows are right-truncated
    pub fn with_max_seq_length(mut self, max_seq_length: usize) -> Self {
        self.max_seq_length = Some(max_seq_length);
        self
    }

    pub fn ignore_index(&self) -> i64 {
        self.ignore_index
    }

    /// Pad `items` into one rectangular batch, keeping their order.
    ///
    /// Fails on an empty list: there is no length to pad to.
    pub fn collate(&self, items: &[EncodedExample]) -> Result<CollatedBatch> {
        ensure!(!items.is_empty(), "cannot collate an empty batch");

        let longest = items.iter().map(EncodedExample::len).max().unwrap_or(0);
        let seq_len = match self.max_seq_length {
            Some(cap) => longest.min(cap),
            None      => longest,
        };

        let mut input_ids      = Vec::with_capacity(items.len());
        let mut attention_mask = Vec::with_capacity(items.len());
        let mut labels         = Vec::with_capacity(items.len());

        for item in items {
            let real = item.len().min(seq_len);
            let pad  = seq_len - real;

            let mut ids: Vec<i64> = item.input_ids[..real].iter().map(|&id| id as i64).collect();
            ids.extend(std::iter::repeat(self.pad_id as i64).take(pad));

            let mut attn: Vec<i64> = item.attention_mask[..real].iter().map(|&m| m as i64).collect();
            attn.extend(std::iter::repeat(0).take(pad));

            let mut lab: Vec<i64> = item.input_ids[..real]
                .iter()
                .zip(&item.target_mask[..real])
                .map(|(&id, &m)| if m == 1 { id as i64 } else { self.ignore_index })
                .collect();
            lab.extend(std::iter::repeat(self.ignore_index).take(pad));

            input_ids.push(ids);
            attention_mask.push(attn);
            labels.push(lab);
        }

        Ok(CollatedBatch {
            batch_size: items.len(),
            seq_len,
            input_ids,
            attention_mask,
            labels,
        })
    }
}
