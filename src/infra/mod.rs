// ============================================================
// Layer 6 — Infrastructure Layer
// ============================================================
// File-system and third-party concerns used by the workflows:
//
//   tokenizer_store.rs — loads a HuggingFace tokenizer.json and
//                        resolves its bos/eos/pad tokens
//
//   metrics.rs         — per-batch token statistics to CSV
//
//   output.rs          — the run's output directory: saved
//                        config and exported encoded examples
//
//   logging.rs         — tracing subscriber: stderr plus the
//                        run's prepare.log
//
// Reference: Rust Book §7 (Modules)
//            Rust Book §9 (Error Handling with anyhow)

/// HuggingFace tokenizer loading and special-token resolution
pub mod tokenizer_store;

/// Batch metrics CSV logger
pub mod metrics;

/// Output directory management
pub mod output;

/// Tracing subscriber setup
pub mod logging;
