//! pairtok-training - BPE training infrastructure
//!
//! This crate turns a plain-text corpus into an ordered merge list:
//!
//! - [`vocab`] builds the symbol-frequency vocabulary from a corpus file
//!   and persists it in the versioned binary vocab format
//! - [`counter`] derives adjacent-pair frequencies and selects the best
//!   merge candidate
//! - [`trainer`] iterates count / select / rewrite up to a merge budget,
//!   producing a [`pairtok_core::MergeModel`]
//!
//! # Example
//!
//! ```rust,ignore
//! use pairtok_training::{vocab, BpeTrainer};
//!
//! let table = vocab::build("corpus.txt".as_ref())?;
//! let mut trainer = BpeTrainer::new();
//! let model = trainer.train(&table, 100, false)?;
//! ```

pub use pairtok_core::{Result, TokenizerError};

pub mod training;
pub use training::counter::{best_pair, count_pairs};
pub use training::trainer::{rewrite, BpeTrainer, TrainerState};
pub use training::vocab;
