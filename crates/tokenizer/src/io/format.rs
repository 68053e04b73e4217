//! The JSON export schema.

use compact_str::CompactString;
use serde::{Deserialize, Serialize};

use pairtok_core::MergeRecord;

use crate::tokenizer::{SpecialTokens, Tokenizer};

/// Serialized tokenizer layout for the JSON export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenizerFile {
    /// Crate version that produced the export.
    pub version: String,
    pub special_tokens: SpecialTokens,
    /// Every token string, in id order.
    pub vocab: Vec<CompactString>,
    /// The merge list, in rank order.
    pub merges: Vec<MergeRecord>,
}

impl From<&Tokenizer> for TokenizerFile {
    fn from(tokenizer: &Tokenizer) -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION").to_string(),
            special_tokens: tokenizer.special.clone(),
            vocab: tokenizer.id_to_token.clone(),
            merges: tokenizer.model.iter().cloned().collect(),
        }
    }
}
