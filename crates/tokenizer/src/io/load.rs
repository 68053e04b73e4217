//! Binary deserialization.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use compact_str::CompactString;

use pairtok_core::codec;
use pairtok_core::{MergeModel, MergeRecord, Result, TokenizerError};

use super::{TOKENIZER_MAGIC, TOKENIZER_VERSION};
use crate::tokenizer::{SpecialTokens, Tokenizer};

/// Deserialize a tokenizer, rejecting foreign magic values and any version
/// other than [`TOKENIZER_VERSION`]. No partial load is attempted.
pub fn load(path: &Path) -> Result<Tokenizer> {
    let file = File::open(path).map_err(|e| TokenizerError::io(path, e))?;
    let mut r = BufReader::new(file);

    let magic = codec::read_i32(&mut r, path)? as u32;
    if magic != TOKENIZER_MAGIC {
        return Err(TokenizerError::BadMagic {
            path: path.to_path_buf(),
            expected: TOKENIZER_MAGIC,
            found: magic,
        });
    }

    let version = codec::read_i32(&mut r, path)?;
    if version != TOKENIZER_VERSION {
        return Err(TokenizerError::BadVersion {
            path: path.to_path_buf(),
            expected: TOKENIZER_VERSION,
            found: version,
        });
    }

    let vocab_size = codec::read_i32(&mut r, path)?;
    let merge_count = codec::read_i32(&mut r, path)?;

    let read_token =
        |r: &mut BufReader<File>| -> Result<CompactString> {
            Ok(CompactString::new(codec::read_string(r, path)?))
        };

    let special = SpecialTokens {
        bos: read_token(&mut r)?,
        eos: read_token(&mut r)?,
        pad: read_token(&mut r)?,
        unk: read_token(&mut r)?,
    };

    let mut tokens = Vec::with_capacity(vocab_size.max(0) as usize);
    for _ in 0..vocab_size {
        tokens.push(read_token(&mut r)?);
    }

    let mut model = MergeModel::new();
    for _ in 0..merge_count {
        let pair = CompactString::new(codec::read_string(&mut r, path)?);
        let freq = codec::read_i32(&mut r, path)? as i64;
        model.push(MergeRecord { pair, freq });
    }

    // The persisted table is already in id order, so rebuilding the
    // inverse lookup reproduces the original ids exactly.
    Tokenizer::from_table(model, special, tokens)
}
