// ============================================================
// Layer 3 — Record Domain Type
// ============================================================
// One raw training record, exactly as it appears on a line
// of the JSONL training file:
//
//   {"input": "<s>hi</s>", "target": "hello</s>how are you?</s>fine</s>"}
//
// `input` is the opening prompt turn. `target` holds one or
// more turns joined by the end-of-sequence marker, so a
// multi-turn dialogue is packed into a single record:
//
//   <s>input1</s>target1</s>input2</s>target2</s>...
//
// Records are immutable once read.
//
// Reference: Rust Book §5 (Structs)

use serde::{Deserialize, Serialize};

/// A raw dialogue record read from the training file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    /// The first prompt turn
    pub input: String,

    /// All following turns, separated by the end-of-sequence marker
    pub target: String,
}

impl Record {
    /// Create a new Record.
    /// Accepts &str or String for both fields.
    #[cfg(test)]
    pub fn new(input: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            input:  input.into(),
            target: target.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialises_from_json_line() {
        let line = r#"{"input": "hi", "target": "hello</s>bye"}"#;
        let rec: Record = serde_json::from_str(line).unwrap();
        assert_eq!(rec, Record::new("hi", "hello</s>bye"));
    }

    #[test]
    fn test_extra_fields_are_ignored() {
        let line = r#"{"input": "hi", "target": "yo", "source": "web"}"#;
        let rec: Record = serde_json::from_str(line).unwrap();
        assert_eq!(rec.target, "yo");
    }

    #[test]
    fn test_missing_target_is_rejected() {
        let line = r#"{"input": "hi"}"#;
        assert!(serde_json::from_str::<Record>(line).is_err());
    }
}
