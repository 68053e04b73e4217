//! Train command implementation.

use clap::Parser;

/// Train command arguments.
#[derive(Parser)]
pub struct TrainCommand {
    /// Path to the training corpus (plain text)
    #[arg(short, long)]
    pub input: String,

    /// Output directory for the trained model files
    #[arg(short, long)]
    pub output: String,

    /// Number of merges to learn
    #[arg(short, long, default_value_t = 10)]
    pub merges: usize,

    /// Also write a JSON export of the tokenizer
    #[arg(short, long, default_value_t = false)]
    pub json: bool,
}

use anyhow::{Context, Result as AnyhowResult};
use pairtok_tokenizer::{SpecialTokens, Tokenizer};
use pairtok_training::{vocab, BpeTrainer, TrainerState};
use std::path::Path;
use std::time::Instant;

pub fn run(cmd: TrainCommand) -> AnyhowResult<()> {
    let input = Path::new(&cmd.input);
    let output = Path::new(&cmd.output);

    let start = Instant::now();
    let table = vocab::build(input)
        .with_context(|| format!("reading corpus from {}", cmd.input))?;
    log::info!(
        "built vocabulary: {} entries in {:.2}s",
        table.len(),
        start.elapsed().as_secs_f64()
    );

    let start = Instant::now();
    let mut trainer = BpeTrainer::new();
    let model = trainer.train(&table, cmd.merges, true)?;
    if trainer.state() == Some(TrainerState::Exhausted) {
        log::warn!(
            "pair table exhausted after {} of {} merges",
            model.len(),
            cmd.merges
        );
    }
    log::info!(
        "learned {} merges in {:.2}s",
        model.len(),
        start.elapsed().as_secs_f64()
    );

    vocab::save_vocab(&table, &output.join("vocab.bin"))?;
    model.save(&output.join("bpe.model"))?;

    let tokenizer = Tokenizer::new(model, SpecialTokens::default())?;
    tokenizer.save(&output.join("tokenizer.model"))?;
    if cmd.json {
        tokenizer.export_json(&output.join("tokenizer.json"))?;
    }

    println!(
        "Trained {} merges, vocab size {}; model saved to {}",
        tokenizer.model().len(),
        tokenizer.vocab_size(),
        cmd.output
    );

    Ok(())
}
