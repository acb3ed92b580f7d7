//! BERT encoder with a linear multi-label classification head.

pub mod config;

use candle_core::{IndexOp, Result, Tensor};
use candle_nn::{Linear, Module, VarBuilder};
use candle_transformers::models::bert::BertModel;

use crate::model::config::Config;

pub struct BertForMultiLabelClassification {
    bert: BertModel,
    classifier: Linear,
}

impl BertForMultiLabelClassification {
    pub fn load(vb: VarBuilder, config: &Config) -> Result<Self> {
        let bert = BertModel::load(vb.pp("bert"), &config.bert_config)?;
        let classifier = candle_nn::linear(
            config.bert_config.hidden_size,
            config.num_labels(),
            vb.pp("classifier"),
        )?;
        Ok(Self { bert, classifier })
    }

    /// Raw logits of shape `[batch, num_labels]`, classifying from the
    /// hidden state of the CLS token.
    pub fn forward(
        &self,
        input_ids: &Tensor,
        token_type_ids: &Tensor,
        attention_mask: &Tensor,
    ) -> Result<Tensor> {
        let hidden = self
            .bert
            .forward(input_ids, token_type_ids, Some(attention_mask))?;
        let cls = hidden.i((.., 0))?;
        cls.apply(&self.classifier)
    }
}
