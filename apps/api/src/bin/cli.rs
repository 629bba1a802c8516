//! Operator CLI: train, evaluate, inspect and try the classifier offline.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;

use resume_classifier::classifier::vectorizer::DEFAULT_MAX_FEATURES;
use resume_classifier::classifier::{quality, DocumentInput, ResumeClassifier};
use resume_classifier::training::{evaluate, load_dataset, train_test_split};

#[derive(Parser, Debug)]
#[command(name = "resume-classifier", version, about = "Train and run the resume classifier")]
struct Cli {
    /// Directory holding vectorizer.json, classifier.json and model_info.json.
    #[arg(long, env = "MODEL_DIR", default_value = "ml_models/trained_model")]
    model_dir: PathBuf,

    /// Vocabulary size cap used when training.
    #[arg(
        long,
        env = "MAX_FEATURES",
        default_value_t = DEFAULT_MAX_FEATURES,
        value_parser = clap::builder::RangedU64ValueParser::<usize>::new().range(1..)
    )]
    max_features: usize,

    #[arg(long, env = "RUST_LOG", default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Train on a JSON dataset, hold out a test split, and print the report.
    Train {
        /// JSON array of {"text", "category"} records.
        #[arg(long)]
        dataset: PathBuf,

        #[arg(long, default_value_t = 0.2)]
        test_size: f64,

        #[arg(long, default_value_t = 42)]
        seed: u64,
    },
    /// Classify a file path, or literal text when no such file exists.
    Classify {
        input: String,

        /// Also print the quality score breakdown.
        #[arg(long)]
        explain: bool,
    },
    /// Print the stored model metadata.
    Info,
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    resume_classifier::init_tracing(&cli.log_level);

    let classifier = ResumeClassifier::open(&cli.model_dir, cli.max_features);

    match cli.command {
        Command::Train {
            dataset,
            test_size,
            seed,
        } => {
            let samples = load_dataset(&dataset)?;
            info!(samples = samples.len(), "dataset loaded");

            let (train, test) = train_test_split(&samples, test_size, seed)?;
            classifier
                .train(&train)
                .context("Training failed")?;

            if test.is_empty() {
                println!("No held-out samples; skipping evaluation.");
            } else {
                let report = evaluate(&classifier, &test)?;
                println!("Classification report ({} held-out samples):\n", test.len());
                println!("{report}");
            }
            println!("Model saved to {}", cli.model_dir.display());
        }
        Command::Classify { input, explain } => {
            let document = DocumentInput::from_path_or_text(&input);
            let result = classifier.classify(&document)?;
            println!("{}", serde_json::to_string_pretty(&result)?);

            if explain {
                let text = match &document {
                    DocumentInput::FileRef(path) => {
                        resume_classifier::classifier::extractor::extract_file(path)?
                    }
                    DocumentInput::RawText(text) => text.clone(),
                };
                println!("{}", serde_json::to_string_pretty(&quality::assess(&text))?);
            }
        }
        Command::Info => {
            let artifact = classifier.store().load()?;
            println!("{}", serde_json::to_string_pretty(&artifact.metadata)?);
        }
    }

    Ok(())
}
