//! Dataset loading and featurization for the toxic comment task.

use crate::error::{Error, Result};
use serde::Deserialize;
use std::collections::HashMap;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use tokenizers::Tokenizer;

/// The six label columns of the toxic comment dataset, in head output order.
pub const LABELS: &[&str] = &[
    "toxic",
    "severe_toxic",
    "obscene",
    "threat",
    "insult",
    "identity_hate",
];

pub const NUM_LABELS: usize = 6;

/// One raw record: identifier, comment text and (for labeled data) the
/// multi-label target vector. Test data carries an empty label vector.
#[derive(Debug, Clone)]
pub struct InputExample {
    pub id: String,
    pub text: String,
    pub labels: Vec<f32>,
}

impl InputExample {
    pub fn is_labeled(&self) -> bool {
        !self.labels.is_empty()
    }
}

/// Fixed-length feature record fed to the encoder. All three token vectors
/// have exactly `max_seq_len` entries.
#[derive(Debug, Clone)]
pub struct InputFeatures {
    pub input_ids: Vec<u32>,
    pub token_type_ids: Vec<u32>,
    pub attention_mask: Vec<u32>,
    pub label_ids: Vec<f32>,
}

impl InputFeatures {
    /// Builds a feature record from a tokenizer encoding, truncating and
    /// padding every vector to `max_seq_len`. Padding positions get
    /// `pad_id` in the input ids and 0 in the type ids and attention mask.
    pub fn new(
        input_ids: &[u32],
        token_type_ids: &[u32],
        attention_mask: &[u32],
        label_ids: Vec<f32>,
        max_seq_len: usize,
        pad_id: u32,
    ) -> Self {
        let mut input_ids = input_ids.to_vec();
        let mut token_type_ids = token_type_ids.to_vec();
        let mut attention_mask = attention_mask.to_vec();

        input_ids.truncate(max_seq_len);
        token_type_ids.truncate(max_seq_len);
        attention_mask.truncate(max_seq_len);

        input_ids.resize(max_seq_len, pad_id);
        token_type_ids.resize(max_seq_len, 0);
        attention_mask.resize(max_seq_len, 0);

        Self {
            input_ids,
            token_type_ids,
            attention_mask,
            label_ids,
        }
    }
}

#[derive(Debug, Deserialize)]
struct JsonRecord {
    #[serde(rename = "ID")]
    id: serde_json::Value,
    comment_text: String,
    #[serde(default)]
    labels: Vec<f32>,
    #[serde(flatten)]
    extra: HashMap<String, serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct CsvRecord {
    id: String,
    comment_text: String,
}

fn id_to_string(id: &serde_json::Value) -> String {
    match id {
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn validate_labels(id: &str, labels: &[f32]) -> Result<()> {
    if !labels.is_empty() && labels.len() != NUM_LABELS {
        return Err(Error::DatasetError(format!(
            "example {}: expected {} labels, got {}",
            id,
            NUM_LABELS,
            labels.len()
        )));
    }
    Ok(())
}

/// Reads a labeled JSON dataset: an array of records with an `ID`, a
/// `comment_text` and either a `labels` array or the six per-category
/// binary columns.
pub fn read_json_examples<P: AsRef<Path>>(path: P) -> Result<Vec<InputExample>> {
    let reader = BufReader::new(File::open(path)?);
    let records: Vec<JsonRecord> = serde_json::from_reader(reader)?;

    let mut examples = Vec::with_capacity(records.len());
    for record in records {
        let id = id_to_string(&record.id);
        let labels = if record.labels.is_empty() {
            column_labels(&record.extra)
        } else {
            record.labels
        };
        validate_labels(&id, &labels)?;
        examples.push(InputExample {
            id,
            text: record.comment_text,
            labels,
        });
    }
    Ok(examples)
}

// Per-category binary columns, used when the record has no `labels` array.
// Only produces a vector when all six columns are present.
fn column_labels(extra: &HashMap<String, serde_json::Value>) -> Vec<f32> {
    let columns: Option<Vec<f32>> = LABELS
        .iter()
        .map(|name| extra.get(*name).and_then(|v| v.as_f64()).map(|v| v as f32))
        .collect();
    columns.unwrap_or_default()
}

/// Reads an unlabeled CSV test file with `id` and `comment_text` columns.
pub fn read_csv_examples<P: AsRef<Path>>(path: P) -> Result<Vec<InputExample>> {
    let mut reader = csv::Reader::from_path(path)?;
    let mut examples = Vec::new();
    for record in reader.deserialize() {
        let record: CsvRecord = record?;
        examples.push(InputExample {
            id: record.id,
            text: record.comment_text,
            labels: Vec::new(),
        });
    }
    Ok(examples)
}

/// Dispatches on file extension: `.csv` goes to the CSV reader, everything
/// else is treated as JSON.
pub fn read_examples<P: AsRef<Path>>(path: P) -> Result<Vec<InputExample>> {
    let path = path.as_ref();
    match path.extension().and_then(|e| e.to_str()) {
        Some("csv") => read_csv_examples(path),
        _ => read_json_examples(path),
    }
}

/// Tokenizes a slice of examples into fixed-length feature records.
/// Example order is preserved.
pub fn convert_examples_to_features(
    examples: &[InputExample],
    tokenizer: &Tokenizer,
    max_seq_len: usize,
    pad_id: u32,
) -> Result<Vec<InputFeatures>> {
    if examples.is_empty() {
        return Ok(Vec::new());
    }
    let texts: Vec<&str> = examples.iter().map(|e| e.text.as_str()).collect();
    let encodings = tokenizer.encode_batch(texts, true)?;

    Ok(encodings
        .iter()
        .zip(examples)
        .map(|(encoding, example)| {
            InputFeatures::new(
                encoding.get_ids(),
                encoding.get_type_ids(),
                encoding.get_attention_mask(),
                example.labels.clone(),
                max_seq_len,
                pad_id,
            )
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn features_pad_to_fixed_length() {
        let features = InputFeatures::new(&[101, 7592, 102], &[0, 0, 0], &[1, 1, 1], vec![], 8, 0);
        assert_eq!(features.input_ids, vec![101, 7592, 102, 0, 0, 0, 0, 0]);
        assert_eq!(features.token_type_ids.len(), 8);
        assert_eq!(features.attention_mask, vec![1, 1, 1, 0, 0, 0, 0, 0]);
    }

    #[test]
    fn features_truncate_to_fixed_length() {
        let ids: Vec<u32> = (0..20).collect();
        let mask = vec![1; 20];
        let types = vec![0; 20];
        let features = InputFeatures::new(&ids, &types, &mask, vec![], 4, 0);
        assert_eq!(features.input_ids, vec![0, 1, 2, 3]);
        assert_eq!(features.attention_mask, vec![1, 1, 1, 1]);
    }

    #[test]
    fn reads_json_with_labels_array() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[{{"ID": "abc123", "comment_text": "hello", "labels": [0, 1, 0, 0, 0, 0]}}]"#
        )
        .unwrap();
        let examples = read_json_examples(file.path()).unwrap();
        assert_eq!(examples.len(), 1);
        assert_eq!(examples[0].id, "abc123");
        assert_eq!(examples[0].labels, vec![0.0, 1.0, 0.0, 0.0, 0.0, 0.0]);
        assert!(examples[0].is_labeled());
    }

    #[test]
    fn reads_json_with_label_columns() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[{{"ID": 7, "comment_text": "hi", "toxic": 1, "severe_toxic": 0,
                 "obscene": 0, "threat": 0, "insult": 1, "identity_hate": 0}}]"#
        )
        .unwrap();
        let examples = read_json_examples(file.path()).unwrap();
        assert_eq!(examples[0].id, "7");
        assert_eq!(examples[0].labels, vec![1.0, 0.0, 0.0, 0.0, 1.0, 0.0]);
    }

    #[test]
    fn json_without_labels_is_unlabeled() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"[{{"ID": "x", "comment_text": "plain"}}]"#).unwrap();
        let examples = read_json_examples(file.path()).unwrap();
        assert!(!examples[0].is_labeled());
    }

    #[test]
    fn rejects_wrong_label_dimensionality() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[{{"ID": "x", "comment_text": "bad", "labels": [1, 0]}}]"#
        )
        .unwrap();
        let err = read_json_examples(file.path()).unwrap_err();
        assert!(matches!(err, Error::DatasetError(_)));
    }

    #[test]
    fn reads_csv_test_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "id,comment_text").unwrap();
        writeln!(file, "0001,first comment").unwrap();
        writeln!(file, "0002,\"second, quoted\"").unwrap();
        let examples = read_csv_examples(file.path()).unwrap();
        assert_eq!(examples.len(), 2);
        assert_eq!(examples[1].text, "second, quoted");
        assert!(!examples[0].is_labeled());
    }

    #[test]
    fn dispatches_on_extension() {
        let dir = tempfile::tempdir().unwrap();
        let csv_path = dir.path().join("test.csv");
        std::fs::write(&csv_path, "id,comment_text\n1,hey\n").unwrap();
        let examples = read_examples(&csv_path).unwrap();
        assert_eq!(examples.len(), 1);
    }

    #[test]
    fn empty_dataset_yields_no_examples() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "[]").unwrap();
        let examples = read_json_examples(file.path()).unwrap();
        assert!(examples.is_empty());
    }
}
