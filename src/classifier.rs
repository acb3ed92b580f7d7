pub use candle_core::Device;
use candle_core::{DType, Tensor};
use candle_nn::VarBuilder;
use std::fs::File;
use std::path::{Path, PathBuf};
use tokenizers::{Tokenizer, TruncationParams};

use crate::data::{self, InputExample, InputFeatures};
use crate::error::Result;
use crate::model::config::Config;
use crate::model::BertForMultiLabelClassification;

/// Pretrained encoder plus classification head, with the tokenizer and
/// label names it was trained with.
pub struct ToxicCommentClassifier {
    model: BertForMultiLabelClassification,
    tokenizer: Tokenizer,
    labels: Vec<String>,
    pad_id: u32,
    device: Device,
}

impl ToxicCommentClassifier {
    /// Loads `config.json`, `tokenizer.json` and `model.safetensors` from
    /// a model directory. Tokenizer truncation is capped at `max_seq_len`;
    /// padding to the fixed length happens during featurization.
    pub fn load<P: AsRef<Path>>(path: P, device: Device, max_seq_len: usize) -> Result<Self> {
        let mut dir = PathBuf::from(path.as_ref());

        dir.push("config.json");
        let config_reader = File::open(&dir)?;
        let config: Config = serde_json::from_reader(config_reader)?;
        dir.pop();

        dir.push("tokenizer.json");
        let mut tokenizer = Tokenizer::from_file(&dir)?;
        tokenizer.with_truncation(Some(TruncationParams {
            max_length: max_seq_len,
            ..Default::default()
        }))?;
        dir.pop();

        dir.push("model.safetensors");
        let model_builder =
            unsafe { VarBuilder::from_mmaped_safetensors(&[&dir], DType::F32, &device) }?;
        dir.pop();

        let model = BertForMultiLabelClassification::load(model_builder, &config)?;
        let pad_id = tokenizer.token_to_id("[PAD]").unwrap_or(0);
        Ok(Self {
            model,
            tokenizer,
            labels: config.label_names(),
            pad_id,
            device,
        })
    }

    pub fn featurize(
        &self,
        examples: &[InputExample],
        max_seq_len: usize,
    ) -> Result<Vec<InputFeatures>> {
        data::convert_examples_to_features(examples, &self.tokenizer, max_seq_len, self.pad_id)
    }

    /// Forward pass over one batch of fixed-length features. Returns one
    /// probability row per feature, each value in `[0, 1]` after sigmoid.
    pub fn predict_batch(&self, features: &[InputFeatures]) -> Result<Vec<Vec<f32>>> {
        let mut input_ids = Vec::with_capacity(features.len());
        let mut token_type_ids = Vec::with_capacity(features.len());
        let mut attention_mask = Vec::with_capacity(features.len());
        for feature in features {
            input_ids.push(Tensor::new(feature.input_ids.as_slice(), &self.device)?);
            token_type_ids.push(Tensor::new(feature.token_type_ids.as_slice(), &self.device)?);
            attention_mask.push(Tensor::new(feature.attention_mask.as_slice(), &self.device)?);
        }
        let logits = self.model.forward(
            &Tensor::stack(input_ids.as_slice(), 0)?,
            &Tensor::stack(token_type_ids.as_slice(), 0)?,
            &Tensor::stack(attention_mask.as_slice(), 0)?,
        )?;
        let probs = candle_nn::ops::sigmoid(&logits)?;
        Ok(probs.to_vec2()?)
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }
}
