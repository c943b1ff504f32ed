// ============================================================
// Layer 4 — Data Pipeline
// ============================================================
// Everything from a JSONL file to tensor batches.
//
//   train.jsonl
//       │
//       ▼
//   RecordSource      → reads every line once into Records
//       │
//       ▼
//   DialogueDataset   → Burn Dataset; encodes a Record per get()
//       │                 (uses ExampleEncoder)
//       ▼
//   DialogueBatcher   → Burn Batcher; pads via DialogueCollator
//       │
//       ▼
//   DataLoader        → hands DialogueBatch to the consumer
//
// Reference: Burn Book §4 (Datasets and Dataloaders)

/// Reads JSONL training files into Records
pub mod source;

/// Record → token ids + target mask
pub mod encoder;

/// Implements Burn's Dataset trait over encoded records
pub mod dataset;

/// Pads encoded examples and derives loss labels
pub mod collator;

/// Implements Burn's Batcher trait on top of the collator
pub mod batcher;

#[cfg(test)]
pub mod test_vocab;
