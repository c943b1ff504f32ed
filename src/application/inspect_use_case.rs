// ============================================================
// Layer 2 — InspectUseCase
// ============================================================
// Encodes a single record and renders how its tokens line up
// with the target mask and the final labels. Used to check
// a new data file or tokenizer before a long training run:
//
//   record 0: 2 turns, 5 tokens, 2 trained on
//     [prompt]   hi
//     [response] hello
//
//     pos      id  token            mask   label
//       0       1  <s>                 0    -100
//       1      10  hi                  0    -100
//       2       2  </s>                0    -100
//       3      20  hello               1      20
//       4       2  </s>                1       2

use anyhow::{Context, Result};
use std::fmt::Write;
use std::sync::Arc;

use crate::application::config::PrepareConfig;
use crate::data::{
    collator::DialogueCollator,
    encoder::ExampleEncoder,
    source::RecordSource,
};
use crate::domain::{traits::TextTokenizer, utterance::Role};
use crate::infra::tokenizer_store::{HfTokenizer, TokenizerStore};

pub struct InspectUseCase<T: TextTokenizer> {
    source:   RecordSource,
    encoder:  ExampleEncoder<T>,
    collator: DialogueCollator,
}

impl InspectUseCase<HfTokenizer> {
    /// Load the training file and tokenizer named in `cfg`.
    pub fn from_config(cfg: &PrepareConfig) -> Result<Self> {
        cfg.validate()?;
        let tokenizer = TokenizerStore::new(&cfg.tokenizer_path)
            .load(&cfg.special_token_overrides())?;
        let source = RecordSource::from_jsonl(&cfg.train_file)?;
        Ok(Self::new(source, Arc::new(tokenizer), cfg.max_seq_length, cfg.ignore_index))
    }
}

impl<T: TextTokenizer> InspectUseCase<T> {
    pub fn new(
        source:         RecordSource,
        tokenizer:      Arc<T>,
        max_seq_length: usize,
        ignore_index:   i64,
    ) -> Self {
        let collator = DialogueCollator::from_special_tokens(tokenizer.special_tokens())
            .with_ignore_index(ignore_index);
        Self {
            source,
            encoder: ExampleEncoder::new(tokenizer, max_seq_length),
            collator,
        }
    }

    /// Render the turns and per-token alignment of record `index`.
    pub fn render(&self, index: usize) -> Result<String> {
        let record = self.source.get(index).with_context(|| {
            format!("Record {} out of range (file has {})", index, self.source.len())
        })?;

        let utterances = self.encoder.utterances(record);
        let example    = self.encoder.encode(record)?;
        let collated   = self.collator.collate(std::slice::from_ref(&example))?;
        let labels     = &collated.labels[0];

        let mut out = String::new();
        writeln!(
            out,
            "record {}: {} turns, {} tokens, {} trained on",
            index,
            utterances.len(),
            example.len(),
            example.loss_token_count(),
        )?;
        for u in &utterances {
            let tag = match u.role {
                Role::Prompt   => "[prompt]  ",
                Role::Response => "[response]",
            };
            writeln!(out, "  {} {}", tag, u.text)?;
        }

        writeln!(out)?;
        writeln!(out, "  {:>4}  {:>6}  {:<16} {:>4}  {:>6}", "pos", "id", "token", "mask", "label")?;
        for (pos, (&id, &mask)) in example.input_ids.iter().zip(&example.target_mask).enumerate() {
            let token = self
                .encoder
                .tokenizer()
                .id_to_token(id)
                .unwrap_or_else(|| "?".to_string());
            writeln!(
                out,
                "  {:>4}  {:>6}  {:<16} {:>4}  {:>6}",
                pos, id, token, mask, labels[pos]
            )?;
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::test_vocab::VocabTokenizer;
    use crate::domain::record::Record;

    fn inspector() -> InspectUseCase<VocabTokenizer> {
        let source = RecordSource::from_records(vec![Record::new("hi", "hello</s>bye")]);
        InspectUseCase::new(source, Arc::new(VocabTokenizer::new()), 64, -100)
    }

    #[test]
    fn test_render_lists_turns_and_labels() {
        let text = inspector().render(0).unwrap();
        assert!(text.starts_with("record 0: 2 turns, 5 tokens, 2 trained on"));
        assert!(text.contains("[prompt]   hi"));
        assert!(text.contains("[response] hello"));
        // one row per token after the header lines
        let rows: Vec<&str> = text.lines().skip(5).collect();
        assert_eq!(rows.len(), 5);
        assert!(rows[3].trim_end().ends_with("20"));
        assert!(rows[0].trim_end().ends_with("-100"));
    }

    #[test]
    fn test_out_of_range_index_fails() {
        assert!(inspector().render(3).is_err());
    }
}
