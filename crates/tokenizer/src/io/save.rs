//! Binary serialization and the JSON export.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use pairtok_core::codec;
use pairtok_core::{Result, TokenizerError};

use super::format::TokenizerFile;
use super::{TOKENIZER_MAGIC, TOKENIZER_VERSION};
use crate::tokenizer::Tokenizer;

/// Serialize a tokenizer to the versioned binary format, creating parent
/// directories as needed.
pub fn save(tokenizer: &Tokenizer, path: &Path) -> Result<()> {
    codec::ensure_parent_dir(path)?;

    let file = File::create(path).map_err(|e| TokenizerError::io(path, e))?;
    let mut w = BufWriter::new(file);

    codec::write_i32(&mut w, path, TOKENIZER_MAGIC as i32)?;
    codec::write_i32(&mut w, path, TOKENIZER_VERSION)?;
    codec::write_i32(&mut w, path, tokenizer.id_to_token.len() as i32)?;
    codec::write_i32(&mut w, path, tokenizer.model.len() as i32)?;

    for token in [
        &tokenizer.special.bos,
        &tokenizer.special.eos,
        &tokenizer.special.pad,
        &tokenizer.special.unk,
    ] {
        codec::write_bytes(&mut w, path, token.as_bytes())?;
    }

    for token in &tokenizer.id_to_token {
        codec::write_bytes(&mut w, path, token.as_bytes())?;
    }

    for merge in &tokenizer.model {
        codec::write_bytes(&mut w, path, merge.pair.as_bytes())?;
        codec::write_i32(&mut w, path, merge.freq as i32)?;
    }

    Ok(())
}

/// Write the pretty-printed JSON export.
pub fn export_json(tokenizer: &Tokenizer, path: &Path) -> Result<()> {
    codec::ensure_parent_dir(path)?;

    let file = File::create(path).map_err(|e| TokenizerError::io(path, e))?;
    let mut w = BufWriter::new(file);

    let layout = TokenizerFile::from(tokenizer);
    serde_json::to_writer_pretty(&mut w, &layout)?;
    w.write_all(b"\n").map_err(|e| TokenizerError::io(path, e))?;

    Ok(())
}
