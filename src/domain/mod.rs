// ============================================================
// Layer 3 — Domain Layer
// ============================================================
// Pure Rust structs, enums and traits that define what a
// dialogue training example IS:
//
//   record.rs    — one raw JSONL line: an input and a target
//   utterance.rs — a single turn tagged with its role
//                  (prompt or response)
//   example.rs   — the encoded token sequence and its masks
//   traits.rs    — the tokenizer capability other layers use
//
// Rules for this layer:
//   - NO Burn framework types allowed here
//   - NO file I/O
//   - NO concrete tokenizer implementation
//
// Reference: Rust Book §5 (Structs), §6 (Enums), §10 (Traits)

/// A raw input/target record read from disk
pub mod record;

/// Dialogue turns with explicit prompt/response roles
pub mod utterance;

/// Encoded token ids with attention and target masks
pub mod example;

/// The tokenizer capability (text → ids, special tokens)
pub mod traits;
