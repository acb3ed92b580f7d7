//! Batched prediction and output serialization.

use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use crate::classifier::ToxicCommentClassifier;
use crate::data::InputExample;
use crate::error::{Error, Result};

/// One output record: input identifier plus the predicted probability for
/// each label, in head output order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Prediction {
    pub qas_id: String,
    pub labels: Vec<f32>,
}

/// Featurizes the examples, runs the model batch by batch and aligns the
/// probability rows back to the input identifiers.
pub fn run(
    classifier: &ToxicCommentClassifier,
    examples: &[InputExample],
    batch_size: usize,
    max_seq_len: usize,
) -> Result<Vec<Prediction>> {
    if examples.is_empty() {
        return Ok(Vec::new());
    }

    let features = classifier.featurize(examples, max_seq_len)?;
    let mut probs = Vec::with_capacity(examples.len());
    for (i, batch) in features.chunks(batch_size).enumerate() {
        probs.extend(classifier.predict_batch(batch)?);
        tracing::debug!(batch = i, done = probs.len(), total = examples.len(), "predicting");
    }

    if probs.len() != examples.len() {
        return Err(Error::DatasetError(format!(
            "prediction count {} does not match example count {}",
            probs.len(),
            examples.len()
        )));
    }

    Ok(examples
        .iter()
        .zip(probs)
        .map(|(example, labels)| Prediction {
            qas_id: example.id.clone(),
            labels,
        })
        .collect())
}

/// Writes predictions as a pretty-printed JSON array.
pub fn write_predictions<P: AsRef<Path>>(path: P, predictions: &[Prediction]) -> Result<()> {
    let writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(writer, predictions)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prediction_serializes_with_original_field_names() {
        let prediction = Prediction {
            qas_id: "abc".to_string(),
            labels: vec![0.1, 0.9],
        };
        let value = serde_json::to_value(&prediction).unwrap();
        assert!(value.get("qas_id").is_some());
        assert!(value.get("labels").is_some());
    }

    #[test]
    fn writes_and_reads_back_predictions() {
        let predictions = vec![
            Prediction {
                qas_id: "1".to_string(),
                labels: vec![0.2, 0.8, 0.0, 0.0, 0.5, 0.1],
            },
            Prediction {
                qas_id: "2".to_string(),
                labels: vec![0.0; 6],
            },
        ];
        let file = tempfile::NamedTempFile::new().unwrap();
        write_predictions(file.path(), &predictions).unwrap();

        let parsed: Vec<Prediction> =
            serde_json::from_reader(File::open(file.path()).unwrap()).unwrap();
        assert_eq!(parsed.len(), 2);
        assert_eq!(parsed[0].qas_id, "1");
        assert_eq!(parsed[0].labels.len(), 6);
    }

    #[test]
    fn writes_empty_prediction_array() {
        let file = tempfile::NamedTempFile::new().unwrap();
        write_predictions(file.path(), &[]).unwrap();
        let parsed: Vec<Prediction> =
            serde_json::from_reader(File::open(file.path()).unwrap()).unwrap();
        assert!(parsed.is_empty());
    }
}
