// ============================================================
// Layer 2 — PrepareUseCase
// ============================================================
// Runs the whole data preparation pipeline in order:
//
//   Step 1: Validate and save config    (Layer 6 - infra)
//   Step 2: Load tokenizer              (Layer 6 - infra)
//   Step 3: Read the JSONL records      (Layer 4 - data)
//   Step 4: Build dataset + collator    (Layer 4 - data)
//   Step 5: Export encoded examples     (Layer 6 - infra, optional)
//   Step 6: Pull every batch through a
//           Burn DataLoader and log
//           its token statistics        (Layer 4 + 6)
//
// The collated batches are what a causal-LM training loop
// consumes; this workflow stops right before that loop.
//
// Reference: Burn Book §4 (Datasets and Dataloaders)

use anyhow::{bail, Result};
use burn::{
    data::dataloader::DataLoaderBuilder,
    prelude::*,
};
use std::sync::Arc;

use crate::application::config::PrepareConfig;
use crate::data::{
    batcher::{DialogueBatch, DialogueBatcher},
    collator::DialogueCollator,
    dataset::DialogueDataset,
    encoder::ExampleEncoder,
    source::RecordSource,
};
use crate::domain::{example::EncodedExample, traits::TextTokenizer};
use crate::infra::{
    metrics::{BatchMetrics, MetricsLogger},
    output::OutputDir,
    tokenizer_store::TokenizerStore,
};

/// Batches are assembled on the CPU; the trainer moves them to
/// its own device.
type PrepBackend = burn::backend::NdArray;

/// Totals over one prepare run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PrepareSummary {
    pub records:     usize,
    pub batches:     usize,
    pub examples:    usize,
    pub real_tokens: usize,
    pub loss_tokens: usize,
    /// Examples written to encoded.jsonl, when export was requested
    pub exported:    Option<usize>,
}

impl PrepareSummary {
    /// Fraction of real (non-padding) tokens that carry loss
    pub fn loss_share(&self) -> f64 {
        if self.real_tokens == 0 {
            0.0
        } else {
            self.loss_tokens as f64 / self.real_tokens as f64
        }
    }
}

pub struct PrepareUseCase {
    config: PrepareConfig,
}

impl PrepareUseCase {
    pub fn new(config: PrepareConfig) -> Self {
        Self { config }
    }

    /// Load the HuggingFace tokenizer named in the config and run.
    pub fn execute(&self) -> Result<PrepareSummary> {
        let cfg = &self.config;
        cfg.validate()?;
        tracing::info!("Prepare config: {:?}", cfg);

        let tokenizer = TokenizerStore::new(&cfg.tokenizer_path)
            .load(&cfg.special_token_overrides())?;
        self.execute_with(Arc::new(tokenizer))
    }

    /// Run the pipeline with an already-loaded tokenizer.
    pub fn execute_with<T>(&self, tokenizer: Arc<T>) -> Result<PrepareSummary>
    where
        T: TextTokenizer + 'static,
    {
        let cfg = &self.config;
        cfg.validate()?;

        let output = OutputDir::new(&cfg.output_dir)?;
        output.save_config(cfg)?;

        let source = RecordSource::from_jsonl(&cfg.train_file)?;
        let collator = DialogueCollator::from_special_tokens(tokenizer.special_tokens())
            .with_ignore_index(cfg.ignore_index)
            .with_max_seq_length(cfg.max_seq_length);
        let encoder = ExampleEncoder::new(tokenizer, cfg.max_seq_length);
        let dataset = DialogueDataset::new(source, encoder);

        let mut summary = PrepareSummary {
            records: dataset.record_count(),
            ..PrepareSummary::default()
        };

        if cfg.export_encoded {
            let examples = (0..dataset.record_count()).map(|i| {
                dataset
                    .try_get(i)?
                    .ok_or_else(|| anyhow::anyhow!("record {i} vanished during export"))
            });
            summary.exported = Some(output.export_examples(examples)?);
        }

        if summary.records == 0 {
            tracing::info!("Nothing to batch");
            return Ok(summary);
        }

        let metrics = MetricsLogger::new(output.path())?;
        let ignore_index = collator.ignore_index();
        let batcher = DialogueBatcher::new(collator);

        let mut builder =
            DataLoaderBuilder::<PrepBackend, EncodedExample, DialogueBatch<PrepBackend>>::new(batcher)
                .batch_size(cfg.batch_size);
        // 0 workers: batches are built on this thread
        if cfg.num_workers > 0 {
            builder = builder.num_workers(cfg.num_workers);
        }
        if let Some(seed) = cfg.effective_shuffle_seed() {
            builder = builder.shuffle(seed);
        }
        let loader = builder.build(dataset);

        for (index, batch) in loader.iter().enumerate() {
            let [rows, seq_len] = batch.input_ids.dims();
            let real_tokens = batch
                .attention_mask
                .clone()
                .sum()
                .into_scalar()
                .elem::<i64>() as usize;
            let loss_tokens = batch
                .labels
                .clone()
                .not_equal_elem(ignore_index)
                .int()
                .sum()
                .into_scalar()
                .elem::<i64>() as usize;

            metrics.log(&BatchMetrics::new(index, rows, seq_len, real_tokens, loss_tokens))?;

            summary.batches     += 1;
            summary.examples    += rows;
            summary.real_tokens += real_tokens;
            summary.loss_tokens += loss_tokens;
        }

        if summary.examples != summary.records {
            bail!(
                "only {} of {} records could be encoded; see the errors above",
                summary.examples,
                summary.records
            );
        }

        tracing::info!(
            "Prepared {} examples in {} batches ({} tokens, {:.1}% trained on); metrics in '{}'",
            summary.examples,
            summary.batches,
            summary.real_tokens,
            summary.loss_share() * 100.0,
            metrics.csv_path().display(),
        );
        Ok(summary)
    }
}
