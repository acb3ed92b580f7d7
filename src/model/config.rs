use candle_transformers::models::bert::Config as BertConfig;
use serde::Deserialize;
use std::collections::HashMap;

use crate::data::{LABELS, NUM_LABELS};

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(flatten)]
    pub bert_config: BertConfig,
    #[serde(flatten)]
    pub classifier_config: ClassifierConfig,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct ClassifierConfig {
    #[serde(default)]
    pub id2label: HashMap<String, String>,
    #[serde(default)]
    pub label2id: HashMap<String, usize>,
}

impl Config {
    pub fn num_labels(&self) -> usize {
        if self.classifier_config.id2label.is_empty() {
            NUM_LABELS
        } else {
            self.classifier_config.id2label.len()
        }
    }

    /// Label names ordered by head output index. Checkpoints without an
    /// `id2label` map get the standard toxic comment categories.
    pub fn label_names(&self) -> Vec<String> {
        if self.classifier_config.id2label.is_empty() {
            return LABELS.iter().map(|l| l.to_string()).collect();
        }
        let mut labels: Vec<(usize, String)> = self
            .classifier_config
            .id2label
            .iter()
            .filter_map(|(k, v)| Some((k.parse::<usize>().ok()?, v.clone())))
            .collect();
        labels.sort_by_key(|(i, _)| *i);
        labels.into_iter().map(|(_, l)| l).collect()
    }
}
