// ============================================================
// Layer 1 — CLI Commands and Arguments
// ============================================================
// Defines the two subcommands, `prepare` and `inspect`, and
// their flags. clap's derive macros generate --help text,
// missing-argument errors and type conversion.
//
// Reference: Rust Book §12 (Building a CLI Program)

use clap::{Args, Subcommand};
use crate::application::config::PrepareConfig;
use crate::data::collator::IGNORE_INDEX;

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Encode and batch a JSONL dialogue file
    Prepare(PrepareArgs),

    /// Show how one record is split, tokenised and masked
    Inspect(InspectArgs),
}

/// Tokenizer flags shared by both subcommands
#[derive(Args, Debug, Clone)]
pub struct TokenizerArgs {
    /// tokenizer.json file, or a model directory containing one
    #[arg(long, default_value = "tokenizer")]
    pub tokenizer_path: String,

    /// Begin-of-sequence token (default: tokenizer_config.json, then "<s>")
    #[arg(long)]
    pub bos_token: Option<String>,

    /// End-of-sequence token, also the turn separator in targets
    /// (default: tokenizer_config.json, then "</s>")
    #[arg(long)]
    pub eos_token: Option<String>,

    /// Padding token (default: tokenizer_config.json, then eos)
    #[arg(long)]
    pub pad_token: Option<String>,
}

#[derive(Args, Debug)]
pub struct PrepareArgs {
    /// JSON args file; when given, all other flags are ignored
    #[arg(long)]
    pub config: Option<String>,

    /// JSONL file with one {"input", "target"} object per line
    #[arg(long, default_value = "data/train.jsonl")]
    pub train_file: String,

    #[command(flatten)]
    pub tokenizer: TokenizerArgs,

    /// Directory for the saved config, metrics and exports
    #[arg(long, default_value = "output")]
    pub output_dir: String,

    /// Hard limit on tokens per example; longer dialogues are cut
    #[arg(long, default_value_t = 1024)]
    pub max_seq_length: usize,

    /// Examples per collated batch
    #[arg(long, default_value_t = 8)]
    pub batch_size: usize,

    /// Dataloader worker threads; 0 batches on the main thread
    #[arg(long, default_value_t = 1)]
    pub num_workers: usize,

    /// Shuffle with this seed instead of keeping file order
    #[arg(long)]
    pub shuffle_seed: Option<u64>,

    /// Label value for positions excluded from the loss
    #[arg(long, default_value_t = IGNORE_INDEX, allow_hyphen_values = true)]
    pub ignore_index: i64,

    /// Also write every encoded example to encoded.jsonl
    #[arg(long)]
    pub export_encoded: bool,
}

/// Convert CLI PrepareArgs into the application-layer config.
/// The application layer never sees clap types.
impl From<PrepareArgs> for PrepareConfig {
    fn from(a: PrepareArgs) -> Self {
        PrepareConfig {
            train_file:     a.train_file,
            tokenizer_path: a.tokenizer.tokenizer_path,
            output_dir:     a.output_dir,
            max_seq_length: a.max_seq_length,
            batch_size:     a.batch_size,
            num_workers:    a.num_workers,
            shuffle_seed:   a.shuffle_seed,
            seed:           None,
            bos_token:      a.tokenizer.bos_token,
            eos_token:      a.tokenizer.eos_token,
            pad_token:      a.tokenizer.pad_token,
            ignore_index:   a.ignore_index,
            export_encoded: a.export_encoded,
        }
    }
}

#[derive(Args, Debug)]
pub struct InspectArgs {
    /// JSONL file with one {"input", "target"} object per line
    #[arg(long, default_value = "data/train.jsonl")]
    pub train_file: String,

    #[command(flatten)]
    pub tokenizer: TokenizerArgs,

    /// 0-based index of the record to show
    #[arg(long, default_value_t = 0)]
    pub index: usize,

    #[arg(long, default_value_t = 1024)]
    pub max_seq_length: usize,
}

impl From<InspectArgs> for PrepareConfig {
    fn from(a: InspectArgs) -> Self {
        PrepareConfig {
            train_file:     a.train_file,
            tokenizer_path: a.tokenizer.tokenizer_path,
            max_seq_length: a.max_seq_length,
            bos_token:      a.tokenizer.bos_token,
            eos_token:      a.tokenizer.eos_token,
            pad_token:      a.tokenizer.pad_token,
            ..PrepareConfig::default()
        }
    }
}
