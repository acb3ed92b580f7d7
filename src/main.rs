mod classifier;
mod data;
mod error;
mod metrics;
mod model;
mod predict;

use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use crate::classifier::{Device, ToxicCommentClassifier};

/// Multi-label toxic comment inference over a pretrained encoder.
#[derive(Debug, Parser)]
#[command(version)]
struct Args {
    /// Directory holding config.json, tokenizer.json and model.safetensors
    #[arg(long)]
    model_dir: PathBuf,

    /// Input dataset: a labeled JSON file or an unlabeled CSV test file
    #[arg(long)]
    input: PathBuf,

    /// Output JSON file of per-example label probabilities
    #[arg(long)]
    output: PathBuf,

    #[arg(long, default_value_t = 16)]
    batch_size: usize,

    #[arg(long, default_value_t = 512)]
    max_seq_len: usize,

    /// Decision threshold used when reporting accuracy on labeled input
    #[arg(long, default_value_t = 0.5)]
    threshold: f32,

    /// Run on CPU even when a CUDA device is available
    #[arg(long)]
    cpu: bool,
}

fn run(args: &Args) -> error::Result<()> {
    let device = if args.cpu {
        Device::Cpu
    } else {
        Device::cuda_if_available(0)?
    };

    tracing::info!(model_dir = %args.model_dir.display(), ?device, "loading model");
    let model = ToxicCommentClassifier::load(&args.model_dir, device, args.max_seq_len)?;
    tracing::info!(labels = ?model.labels(), "model ready");

    let examples = data::read_examples(&args.input)?;
    tracing::info!(examples = examples.len(), input = %args.input.display(), "loaded dataset");

    let predictions = predict::run(&model, &examples, args.batch_size, args.max_seq_len)?;

    if !examples.is_empty() && examples.iter().all(|e| e.is_labeled()) {
        let probs: Vec<Vec<f32>> = predictions.iter().map(|p| p.labels.clone()).collect();
        let targets: Vec<Vec<f32>> = examples.iter().map(|e| e.labels.clone()).collect();
        let accuracy = metrics::accuracy_thresh(&probs, &targets, args.threshold)?;
        tracing::info!(accuracy, threshold = args.threshold, "thresholded accuracy");
    }

    predict::write_predictions(&args.output, &predictions)?;
    tracing::info!(
        predictions = predictions.len(),
        output = %args.output.display(),
        "wrote predictions"
    );
    Ok(())
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    if let Err(e) = run(&args) {
        tracing::error!(error = %e, "prediction failed");
        std::process::exit(1);
    }
}
