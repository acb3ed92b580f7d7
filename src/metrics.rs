//! Thresholded accuracy for multi-label predictions.

use crate::error::{Error, Result};

/// Element-wise accuracy of `prob > thresh` against binary targets, the
/// standard multi-label metric for this task.
pub fn accuracy_thresh(probs: &[Vec<f32>], targets: &[Vec<f32>], thresh: f32) -> Result<f32> {
    if probs.len() != targets.len() {
        return Err(Error::DatasetError(format!(
            "accuracy over {} predictions but {} targets",
            probs.len(),
            targets.len()
        )));
    }

    let mut correct = 0usize;
    let mut total = 0usize;
    for (prob_row, target_row) in probs.iter().zip(targets) {
        if prob_row.len() != target_row.len() {
            return Err(Error::DatasetError(format!(
                "prediction row has {} labels but target has {}",
                prob_row.len(),
                target_row.len()
            )));
        }
        for (prob, target) in prob_row.iter().zip(target_row) {
            if (*prob > thresh) == (*target > 0.5) {
                correct += 1;
            }
            total += 1;
        }
    }

    if total == 0 {
        return Ok(0.0);
    }
    Ok(correct as f32 / total as f32)
}
