//! Tokenizer persistence.
//!
//! The primary format is versioned binary (all integers little-endian
//! `i32`, strings length-prefixed):
//!
//! ```text
//! [i32] magic
//! [i32] version (currently 1)
//! [i32] vocab size
//! [i32] merge count
//! [str] bos, eos, pad, unk special tokens
//! [str] every token, in id order
//! per merge, in rank order:
//!   [str]  pair key
//!   [i32]  frequency
//! ```
//!
//! A read-only JSON export exists alongside for inspection and diffing;
//! the binary file is the only load path.

pub mod format;
mod load;
mod save;

pub use load::load;
pub use save::{export_json, save};

use std::path::Path;

use crate::tokenizer::Tokenizer;
use pairtok_core::Result;

/// Magic number for the tokenizer file format.
pub const TOKENIZER_MAGIC: u32 = 0x766F_7870;

/// Current version of the tokenizer file format.
pub const TOKENIZER_VERSION: i32 = 1;

impl Tokenizer {
    /// Serialize to the versioned binary format.
    pub fn save(&self, path: &Path) -> Result<()> {
        save(self, path)
    }

    /// Deserialize from the versioned binary format.
    pub fn load(path: &Path) -> Result<Self> {
        load(path)
    }

    /// Write the JSON export. Inspection-only; never read back.
    pub fn export_json(&self, path: &Path) -> Result<()> {
        export_json(self, path)
    }
}
