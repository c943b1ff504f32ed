use std::sync::Arc;

use anyhow::Result;
use burn::data::dataset::Dataset;

use crate::data::{encoder::ExampleEncoder, source::RecordSource};
use crate::domain::{example::EncodedExample, traits::TextTokenizer};

/// Burn dataset over a RecordSource that encodes each record on access.
///
/// Nothing is cached, so every `get` re-runs the encoder. The
/// records sit behind an `Arc` and the encoder is side-effect free,
/// which lets dataloader workers read disjoint indices concurrently.
pub struct DialogueDataset<T: TextTokenizer> {
    source:  Arc<RecordSource>,
    encoder: ExampleEncoder<T>,
}

impl<T: TextTokenizer> DialogueDataset<T> {
    pub fn new(source: RecordSource, encoder: ExampleEncoder<T>) -> Self {
        Self { source: Arc::new(source), encoder }
    }

    /// Encode the record at `index`. `Ok(None)` when out of range.
    pub fn try_get(&self, index: usize) -> Result<Option<EncodedExample>> {
        self.source
            .get(index)
            .map(|record| self.encoder.encode(record))
            .transpose()
    }

    pub fn record_count(&self) -> usize {
        self.source.len()
    }

}

impl<T: TextTokenizer> Dataset<EncodedExample> for DialogueDataset<T> {
    /// Encoding failures are logged and surface as `None`;
    /// use `try_get` to see the error itself.
    fn get(&self, index: usize) -> Option<EncodedExample> {
        match self.try_get(index) {
            Ok(example) => example,
            Err(e) => {
                tracing::error!("Cannot encode record {}: {:#}", index, e);
                None
            }
        }
    }

    fn len(&self) -> usize {
        self.source.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::test_vocab::{FailingTokenizer, VocabTokenizer};
    use crate::domain::record::Record;

    fn dataset() -> DialogueDataset<VocabTokenizer> {
        let source = RecordSource::from_records(vec![
            Record::new("hi", "hello</s>bye"),
            Record::new("how are you", "fine thanks"),
        ]);
        let encoder = ExampleEncoder::new(Arc::new(VocabTokenizer::new()), 64);
        DialogueDataset::new(source, encoder)
    }

    #[test]
    fn test_len_matches_source() {
        let ds = dataset();
        assert_eq!(ds.len(), 2);
        assert_eq!(ds.record_count(), 2);
    }

    #[test]
    fn test_get_encodes_on_access() {
        let ds = dataset();
        let ex = ds.get(0).unwrap();
        assert_eq!(ex.input_ids, vec![1, 10, 2, 20, 2]);
        // repeated access encodes again and yields the same example
        assert_eq!(ds.get(0), Some(ex));
    }

    #[test]
    fn test_out_of_range_is_none() {
        let ds = dataset();
        assert!(ds.get(2).is_none());
        assert!(ds.try_get(2).unwrap().is_none());
    }

    #[test]
    fn test_iter_preserves_order() {
        let ds = dataset();
        let lens: Vec<usize> = ds.iter().map(|ex| ex.len()).collect();
        assert_eq!(lens, vec![5, 8]);
    }

    #[test]
    fn test_encode_failure_is_none_from_get_and_err_from_try_get() {
        let source  = RecordSource::from_records(vec![Record::new("hi", "hello")]);
        let encoder = ExampleEncoder::new(Arc::new(FailingTokenizer::new()), 64);
        let ds      = DialogueDataset::new(source, encoder);

        assert_eq!(ds.len(), 1);
        assert!(ds.get(0).is_none());
        let err = ds.try_get(0).unwrap_err();
        assert!(format!("{err:#}").contains("tokenizer backend unavailable"));
    }
}
