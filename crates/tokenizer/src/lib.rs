//! pairtok-tokenizer - Encode/decode runtime for trained BPE models
//!
//! Builds bidirectional token/id tables from an ordered merge list plus
//! configured special tokens, and exposes `encode` (text -> ids) and
//! `decode` (ids -> text). Tokenizers persist in a versioned binary
//! format and can additionally be exported as JSON for inspection.
//!
//! # Example
//!
//! ```rust,ignore
//! use pairtok_core::MergeModel;
//! use pairtok_tokenizer::{SpecialTokens, Tokenizer};
//!
//! let model = MergeModel::load("bpe.model".as_ref())?;
//! let tokenizer = Tokenizer::new(model, SpecialTokens::default())?;
//!
//! let ids = tokenizer.encode("low lower", true, true)?;
//! let text = tokenizer.decode(&ids);
//! ```

pub use pairtok_core::{Result, TokenizerError};

pub mod tokenizer;
pub use tokenizer::{SpecialTokens, Tokenizer};

pub mod io;
