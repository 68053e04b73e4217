//! Decode command implementation.

use clap::Parser;

/// Decode command arguments.
#[derive(Parser)]
pub struct DecodeCommand {
    /// Path to the trained tokenizer model
    #[arg(short, long)]
    pub tokenizer: String,

    /// Whitespace-separated token IDs ("-" reads stdin)
    #[arg(short, long)]
    pub input: String,

    /// Output file (stdout if not specified)
    #[arg(short, long)]
    pub output: Option<String>,
}

use anyhow::{Context, Result as AnyhowResult};
use pairtok_tokenizer::Tokenizer;
use std::path::Path;

pub fn run(cmd: DecodeCommand) -> AnyhowResult<()> {
    let tokenizer = Tokenizer::load(Path::new(&cmd.tokenizer))?;

    let input_text = if cmd.input == "-" {
        use std::io::Read;
        let mut buffer = String::new();
        std::io::stdin().read_to_string(&mut buffer)?;
        buffer
    } else {
        cmd.input
    };

    let ids = input_text
        .split_whitespace()
        .map(|s| {
            s.parse::<u32>()
                .with_context(|| format!("invalid token id '{}'", s))
        })
        .collect::<AnyhowResult<Vec<u32>>>()?;

    let text = tokenizer.decode(&ids);

    match &cmd.output {
        Some(path) => {
            std::fs::write(path, &text)?;
            println!("Decoded {} tokens to {}", ids.len(), path);
        }
        None => {
            println!("{}", text);
        }
    }

    Ok(())
}
