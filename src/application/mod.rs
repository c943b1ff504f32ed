// ============================================================
// Layer 2 — Application / Use Cases
// ============================================================
// Orchestrates the data and infra layers for one goal each:
//
//   config.rs           — settings shared by both workflows
//   prepare_use_case.rs — JSONL → encoded, collated batches
//   inspect_use_case.rs — debug view of a single record
//
// No tokenisation or padding logic lives here; this layer
// only wires components together.
//
// Reference: Clean Architecture pattern
//            Rust Book §7 (Module System)

/// Prepare / inspect configuration
pub mod config;

/// The batch preparation workflow
pub mod prepare_use_case;

/// The single-record inspection workflow
pub mod inspect_use_case;
