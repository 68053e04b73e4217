//! Vocabulary construction and serialization.
//!
//! A corpus becomes a frequency table in two steps: whitespace-delimited
//! words are counted byte-exact and case-sensitive, then each word is
//! expanded into a space-joined sequence of single-character symbols
//! (`"cat"` -> `"c a t"`), carrying its frequency along. The symbol keys
//! are what the rest of the training pipeline operates on.
//!
//! On-disk layout (all integers little-endian `i32`, no padding):
//!
//! ```text
//! [i32] magic ('syms')
//! [i32] version (currently 1)
//! [i32] entry count
//! [i32] declared capacity
//! per entry:
//!   [i32]    token byte length
//!   [bytes]  token
//!   [i32]    frequency
//! ```

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use compact_str::{CompactString, ToCompactString};
use pairtok_core::codec;
use pairtok_core::{FreqTable, Result, TokenizerError};

/// Magic number for the vocab file format ("syms", little-endian).
pub const VOCAB_MAGIC: u32 = 0x7379_6D73;

/// Current version of the vocab file format.
pub const VOCAB_VERSION: i32 = 1;

/// Bucket count for tables built from an empty corpus.
const MIN_CAPACITY: usize = 16;

/// Read a whole corpus file into memory.
pub fn read_corpus(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|e| TokenizerError::io(path, e))
}

/// Count whitespace-delimited words in `text`, byte-exact and
/// case-sensitive. An empty corpus yields an empty table.
pub fn word_frequencies(text: &str) -> Result<FreqTable> {
    let words: Vec<&str> = text.split_ascii_whitespace().collect();
    let table = FreqTable::new(words.len().max(MIN_CAPACITY))?;
    for word in words {
        table.add(word, 1)?;
    }
    Ok(table)
}

/// Expand every word into space-joined single-character symbols,
/// aggregating frequencies when two entries land on the same symbol key.
pub fn symbol_frequencies(words: &FreqTable) -> Result<FreqTable> {
    let vocab = FreqTable::new(words.capacity().max(MIN_CAPACITY))?;
    for (word, freq) in words.entries()? {
        let symbols: Vec<CompactString> = word.chars().map(|c| c.to_compact_string()).collect();
        let key = symbols.join(" ");
        vocab.add(&key, freq)?;
    }
    Ok(vocab)
}

/// Tokenize raw text straight into a symbol-frequency vocabulary.
pub fn tokenize(text: &str) -> Result<FreqTable> {
    let words = word_frequencies(text)?;
    symbol_frequencies(&words)
}

/// Build the symbol-frequency vocabulary from a plain-text corpus file.
///
/// Fails when the file is missing or unreadable.
pub fn build(path: &Path) -> Result<FreqTable> {
    let text = read_corpus(path)?;
    tokenize(&text)
}

/// Save a vocabulary table to the versioned binary format, creating parent
/// directories as needed.
pub fn save_vocab(table: &FreqTable, path: &Path) -> Result<()> {
    codec::ensure_parent_dir(path)?;

    let file = File::create(path).map_err(|e| TokenizerError::io(path, e))?;
    let mut w = BufWriter::new(file);

    codec::write_i32(&mut w, path, VOCAB_MAGIC as i32)?;
    codec::write_i32(&mut w, path, VOCAB_VERSION)?;
    codec::write_i32(&mut w, path, table.len() as i32)?;
    codec::write_i32(&mut w, path, table.capacity() as i32)?;

    for (token, freq) in table.entries()? {
        codec::write_bytes(&mut w, path, token.as_bytes())?;
        codec::write_i32(&mut w, path, freq as i32)?;
    }

    Ok(())
}

/// Load a vocabulary table, rejecting foreign magic values and any version
/// other than [`VOCAB_VERSION`].
pub fn load_vocab(path: &Path) -> Result<FreqTable> {
    let file = File::open(path).map_err(|e| TokenizerError::io(path, e))?;
    let mut r = BufReader::new(file);

    let magic = codec::read_i32(&mut r, path)? as u32;
    if magic != VOCAB_MAGIC {
        return Err(TokenizerError::BadMagic {
            path: path.to_path_buf(),
            expected: VOCAB_MAGIC,
            found: magic,
        });
    }

    let version = codec::read_i32(&mut r, path)?;
    if version != VOCAB_VERSION {
        return Err(TokenizerError::BadVersion {
            path: path.to_path_buf(),
            expected: VOCAB_VERSION,
            found: version,
        });
    }

    let count = codec::read_i32(&mut r, path)?;
    let capacity = codec::read_i32(&mut r, path)?;

    let table = FreqTable::new((capacity.max(1)) as usize)?;
    for _ in 0..count {
        let token = codec::read_string(&mut r, path)?;
        let freq = codec::read_i32(&mut r, path)? as i64;
        table.add(&token, freq)?;
    }

    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_word_frequencies() {
        let words = word_frequencies("low lower low\tlowest\nlow").unwrap();
        assert_eq!(words.get("low").unwrap(), Some(3));
        assert_eq!(words.get("lower").unwrap(), Some(1));
        assert_eq!(words.get("lowest").unwrap(), Some(1));
        assert_eq!(words.get("Low").unwrap(), None);
        assert_eq!(words.len(), 3);
    }

    #[test]
    fn test_symbol_expansion_preserves_frequency() {
        let vocab = tokenize("cat cat dog").unwrap();
        assert_eq!(vocab.get("c a t").unwrap(), Some(2));
        assert_eq!(vocab.get("d o g").unwrap(), Some(1));
        assert_eq!(vocab.total_mass().unwrap(), 3);
    }

    #[test]
    fn test_symbol_expansion_handles_multibyte_chars() {
        let vocab = tokenize("héllo héllo").unwrap();
        assert_eq!(vocab.get("h é l l o").unwrap(), Some(2));
    }

    #[test]
    fn test_empty_corpus_yields_empty_table() {
        let vocab = tokenize("").unwrap();
        assert!(vocab.is_empty());
        let vocab = tokenize(" \t\r\n").unwrap();
        assert!(vocab.is_empty());
    }

    #[test]
    fn test_build_missing_file_fails() {
        let path = std::env::temp_dir().join("pairtok_no_such_corpus.txt");
        assert!(matches!(
            build(&path),
            Err(TokenizerError::Io { .. })
        ));
    }

    #[test]
    fn test_vocab_roundtrip() {
        let vocab = tokenize("low lower lowest").unwrap();

        let path = std::env::temp_dir().join("pairtok_vocab_roundtrip/vocab.bin");
        save_vocab(&vocab, &path).unwrap();

        let loaded = load_vocab(&path).unwrap();
        assert_eq!(loaded.len(), vocab.len());
        for (token, freq) in vocab.entries().unwrap() {
            assert_eq!(loaded.get(&token).unwrap(), Some(freq));
        }

        std::fs::remove_dir_all(path.parent().unwrap()).ok();
    }

    #[test]
    fn test_load_rejects_wrong_magic() {
        let dir = std::env::temp_dir().join("pairtok_vocab_reject");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("bad.bin");
        std::fs::write(&path, [0u8; 16]).unwrap();
        assert!(matches!(
            load_vocab(&path),
            Err(TokenizerError::BadMagic { .. })
        ));
        std::fs::remove_dir_all(&dir).ok();
    }
}
