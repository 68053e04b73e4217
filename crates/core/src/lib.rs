//! pairtok-core - Core data structures for the pairtok BPE tokenizer
//!
//! This crate provides the fundamental pieces the rest of the workspace
//! builds on:
//!
//! - A hand-rolled generic associative store ([`Store`]) with pluggable key
//!   kinds, linear probing, load-factor growth, and mutex-guarded
//!   operations
//! - The [`FreqTable`] specialization used for word, symbol, and pair
//!   frequencies
//! - The trained merge list ([`MergeModel`]) and its versioned binary codec
//! - Shared error types and little-endian wire primitives
//!
//! # Example
//!
//! ```rust
//! use pairtok_core::FreqTable;
//!
//! let vocab = FreqTable::new(16)?;
//! vocab.add("l o w", 3)?;
//! assert_eq!(vocab.get("l o w")?, Some(3));
//! # Ok::<(), pairtok_core::TokenizerError>(())
//! ```

pub mod error;
pub use error::{Result, TokenizerError};

pub mod store;
pub use store::{InsertOutcome, Key, KeyKind, Store};

pub mod freq;
pub use freq::FreqTable;

pub mod model;
pub use model::{fuse_symbols, split_pair, MergeModel, MergeRecord, BPE_MAGIC, BPE_VERSION};

pub mod codec;
