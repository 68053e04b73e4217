//! The trained merge list and its binary codec.
//!
//! A model is an ordered, append-only sequence of merge records. Order is
//! significant: a record's position is its rank, and lower rank (learned
//! earlier) wins whenever more than one merge could apply at encode time.
//!
//! On-disk layout (all integers little-endian `i32`, no padding):
//!
//! ```text
//! [i32] magic ('pair')
//! [i32] version (currently 1)
//! [i32] merge count
//! [i32] declared capacity
//! per merge, in list order:
//!   [i32]    pair key byte length
//!   [bytes]  pair key
//!   [i32]    frequency
//! ```

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use compact_str::CompactString;
use serde::{Deserialize, Serialize};

use crate::codec;
use crate::error::{Result, TokenizerError};

/// Magic number for the merges file format ("pair", little-endian).
pub const BPE_MAGIC: u32 = 0x7061_6972;

/// Current version of the merges file format.
pub const BPE_VERSION: i32 = 1;

/// One learned merge: a pair key (two symbols joined by a single space)
/// and the aggregate frequency observed when the pair was chosen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergeRecord {
    pub pair: CompactString,
    pub freq: i64,
}

/// Ordered, append-only list of merge records.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergeModel {
    merges: Vec<MergeRecord>,
}

impl MergeModel {
    /// Create an empty model.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a merge record. Rank is the record's position.
    pub fn push(&mut self, record: MergeRecord) {
        self.merges.push(record);
    }

    /// Number of learned merges.
    pub fn len(&self) -> usize {
        self.merges.len()
    }

    /// True when no merge has been learned.
    pub fn is_empty(&self) -> bool {
        self.merges.is_empty()
    }

    /// Iterate merges in rank order.
    pub fn iter(&self) -> std::slice::Iter<'_, MergeRecord> {
        self.merges.iter()
    }

    /// The record at `rank`, if trained.
    pub fn get(&self, rank: usize) -> Option<&MergeRecord> {
        self.merges.get(rank)
    }

    /// Serialize the model, creating parent directories as needed.
    pub fn save(&self, path: &Path) -> Result<()> {
        codec::ensure_parent_dir(path)?;

        let file = File::create(path).map_err(|e| TokenizerError::io(path, e))?;
        let mut w = BufWriter::new(file);

        codec::write_i32(&mut w, path, BPE_MAGIC as i32)?;
        codec::write_i32(&mut w, path, BPE_VERSION)?;
        codec::write_i32(&mut w, path, self.merges.len() as i32)?;
        codec::write_i32(&mut w, path, self.merges.capacity() as i32)?;

        for merge in &self.merges {
            codec::write_bytes(&mut w, path, merge.pair.as_bytes())?;
            codec::write_i32(&mut w, path, merge.freq as i32)?;
        }

        Ok(())
    }

    /// Load a model, rejecting missing files, foreign magic values, and any
    /// version other than [`BPE_VERSION`]. No partial load is attempted.
    pub fn load(path: &Path) -> Result<Self> {
        let file = File::open(path).map_err(|e| TokenizerError::io(path, e))?;
        let mut r = BufReader::new(file);

        let magic = codec::read_i32(&mut r, path)? as u32;
        if magic != BPE_MAGIC {
            return Err(TokenizerError::BadMagic {
                path: path.to_path_buf(),
                expected: BPE_MAGIC,
                found: magic,
            });
        }

        let version = codec::read_i32(&mut r, path)?;
        if version != BPE_VERSION {
            return Err(TokenizerError::BadVersion {
                path: path.to_path_buf(),
                expected: BPE_VERSION,
                found: version,
            });
        }

        let count = codec::read_i32(&mut r, path)?;
        let capacity = codec::read_i32(&mut r, path)?;

        let mut merges = Vec::with_capacity((capacity.max(count)).max(0) as usize);
        for _ in 0..count {
            let pair = codec::read_string(&mut r, path)?;
            let freq = codec::read_i32(&mut r, path)? as i64;
            merges.push(MergeRecord {
                pair: CompactString::new(&pair),
                freq,
            });
        }

        Ok(Self { merges })
    }
}

impl<'a> IntoIterator for &'a MergeModel {
    type Item = &'a MergeRecord;
    type IntoIter = std::slice::Iter<'a, MergeRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.merges.iter()
    }
}

/// Split a pair key into its two constituent symbols.
///
/// Fails when the key does not hold exactly two non-empty space-separated
/// symbols.
pub fn split_pair(pair: &str) -> Result<(&str, &str)> {
    let mut parts = pair.split(' ');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(a), Some(b), None) if !a.is_empty() && !b.is_empty() => Ok((a, b)),
        _ => Err(TokenizerError::InvalidMerge(pair.to_string())),
    }
}

/// Fuse every adjacent `a`,`b` occurrence in `symbols` into one symbol.
///
/// Single left-to-right, non-overlapping greedy pass: a fused symbol is
/// emitted and both inputs consumed; already-merged output is never
/// re-scanned.
pub fn fuse_symbols(symbols: &[CompactString], a: &str, b: &str) -> Vec<CompactString> {
    let mut out = Vec::with_capacity(symbols.len());
    let mut i = 0;
    while i < symbols.len() {
        if i + 1 < symbols.len() && symbols[i] == a && symbols[i + 1] == b {
            let mut fused = CompactString::new(a);
            fused.push_str(b);
            out.push(fused);
            i += 2;
        } else {
            out.push(symbols[i].clone());
            i += 1;
        }
    }
    out
}
