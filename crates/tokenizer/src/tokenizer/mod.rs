//! The encode/decode runtime.
//!
//! A [`Tokenizer`] couples a trained merge list with a dense id table.
//! Ids are assigned once at construction: the four special tokens take
//! ids 0..4 in a fixed order, the 256 single-byte base tokens follow in
//! byte order, then every remaining distinct symbol observed across the
//! merges (both constituents and the fused output of each merge) in
//! heap-sorted order, so two tokenizers built from the same model always
//! agree on every id. The base alphabet guarantees single characters
//! never fall back to unk just because no merge happened to touch them.

use compact_str::{CompactString, ToCompactString};
use dary_heap::OctonaryHeap;
use serde::{Deserialize, Serialize};

use pairtok_core::{
    fuse_symbols, split_pair, InsertOutcome, Key, KeyKind, MergeModel, Result, Store,
    TokenizerError,
};

/// The four special-token strings, configurable at construction.
///
/// Every field must be non-empty; the defaults follow the common
/// `<|name|>` convention.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpecialTokens {
    pub bos: CompactString,
    pub eos: CompactString,
    pub pad: CompactString,
    pub unk: CompactString,
}

impl Default for SpecialTokens {
    fn default() -> Self {
        Self {
            bos: "<|bos|>".into(),
            eos: "<|eos|>".into(),
            pad: "<|pad|>".into(),
            unk: "<|unk|>".into(),
        }
    }
}

impl SpecialTokens {
    fn validate(&self) -> Result<()> {
        for (name, token) in [
            ("bos", &self.bos),
            ("eos", &self.eos),
            ("pad", &self.pad),
            ("unk", &self.unk),
        ] {
            if token.is_empty() {
                return Err(TokenizerError::InvalidSpecialToken(name));
            }
        }
        Ok(())
    }
}

/// A trained BPE tokenizer: merge list plus bidirectional token/id tables.
pub struct Tokenizer {
    pub(crate) special: SpecialTokens,
    pub(crate) bos_id: u32,
    pub(crate) eos_id: u32,
    pub(crate) pad_id: u32,
    pub(crate) unk_id: u32,
    pub(crate) id_to_token: Vec<CompactString>,
    pub(crate) token_to_id: Store<u32>,
    pub(crate) model: MergeModel,
}

impl Tokenizer {
    /// Build a tokenizer from a trained merge model.
    ///
    /// The id table holds the specials first, then the single-byte base
    /// alphabet, then every remaining distinct merge symbol in sorted
    /// order.
    pub fn new(model: MergeModel, special: SpecialTokens) -> Result<Self> {
        special.validate()?;

        let seen: Store<()> = Store::new((model.len() * 4).max(8), KeyKind::Str)?;
        for record in &model {
            let (a, b) = split_pair(&record.pair)?;
            let mut fused = CompactString::new(a);
            fused.push_str(b);
            seen.insert(Key::str(a), ())?;
            seen.insert(Key::str(b), ())?;
            seen.insert(Key::str(&fused), ())?;
        }

        // Snapshot order is unspecified; heap-sort for a stable id layout.
        let symbols: Vec<CompactString> = seen
            .snapshot()?
            .into_iter()
            .filter_map(|(key, ())| match key {
                Key::Str(s) => Some(s),
                _ => None,
            })
            .collect();
        let symbols = OctonaryHeap::from(symbols).into_sorted_vec();

        let mut tokens = vec![
            special.bos.clone(),
            special.eos.clone(),
            special.pad.clone(),
            special.unk.clone(),
        ];
        tokens.extend((0..=u8::MAX).map(|b| char::from(b).to_compact_string()));
        tokens.extend(symbols);

        Self::from_table(model, special, tokens)
    }

    /// Assemble a tokenizer from an explicit id table. Duplicate tokens
    /// keep their first (lowest) id.
    pub(crate) fn from_table(
        model: MergeModel,
        special: SpecialTokens,
        tokens: Vec<CompactString>,
    ) -> Result<Self> {
        special.validate()?;

        let token_to_id = Store::new((tokens.len() * 2).max(8), KeyKind::Str)?;
        let mut id_to_token = Vec::with_capacity(tokens.len());
        for token in tokens {
            let id = id_to_token.len() as u32;
            if token_to_id.insert(Key::str(&token), id)? == InsertOutcome::Inserted {
                id_to_token.push(token);
            }
        }

        let resolve = |name: &'static str, token: &CompactString| -> Result<u32> {
            token_to_id
                .search(&Key::str(token))?
                .ok_or(TokenizerError::InvalidSpecialToken(name))
        };
        let bos_id = resolve("bos", &special.bos)?;
        let eos_id = resolve("eos", &special.eos)?;
        let pad_id = resolve("pad", &special.pad)?;
        let unk_id = resolve("unk", &special.unk)?;

        log::debug!(
            "tokenizer ready: {} tokens, {} merges",
            id_to_token.len(),
            model.len()
        );

        Ok(Self {
            special,
            bos_id,
            eos_id,
            pad_id,
            unk_id,
            id_to_token,
            token_to_id,
            model,
        })
    }

    /// Number of distinct ids, special tokens included.
    pub fn vocab_size(&self) -> usize {
        self.id_to_token.len()
    }

    /// The merge model this tokenizer was built from.
    pub fn model(&self) -> &MergeModel {
        &self.model
    }

    /// The configured special tokens.
    pub fn special(&self) -> &SpecialTokens {
        &self.special
    }

    pub fn bos_id(&self) -> u32 {
        self.bos_id
    }

    pub fn eos_id(&self) -> u32 {
        self.eos_id
    }

    pub fn pad_id(&self) -> u32 {
        self.pad_id
    }

    pub fn unk_id(&self) -> u32 {
        self.unk_id
    }

    /// The token string for `id`, if in range.
    pub fn token(&self, id: u32) -> Option<&str> {
        self.id_to_token.get(id as usize).map(|t| t.as_str())
    }

    /// The id for `token`, if present in the vocabulary.
    pub fn id_of(&self, token: &str) -> Result<Option<u32>> {
        self.token_to_id.search(&Key::str(token))
    }

    /// Encode text into token ids.
    ///
    /// Words are split on ASCII whitespace (the split itself is not
    /// recoverable from the ids), each word decomposes into per-character
    /// symbols, and the merges apply to every word in rank order. Symbols
    /// with no vocabulary entry map to the unk id.
    pub fn encode(&self, text: &str, add_bos: bool, add_eos: bool) -> Result<Vec<u32>> {
        let mut ids = Vec::new();
        if add_bos {
            ids.push(self.bos_id);
        }

        for word in text.split_ascii_whitespace() {
            let mut symbols: Vec<CompactString> =
                word.chars().map(|c| c.to_compact_string()).collect();

            for record in &self.model {
                if symbols.len() < 2 {
                    break;
                }
                let (a, b) = split_pair(&record.pair)?;
                symbols = fuse_symbols(&symbols, a, b);
            }

            for symbol in &symbols {
                let id = self
                    .token_to_id
                    .search(&Key::str(symbol))?
                    .unwrap_or(self.unk_id);
                ids.push(id);
            }
        }

        if add_eos {
            ids.push(self.eos_id);
        }
        Ok(ids)
    }

    /// Decode token ids back into text by concatenating token strings.
    /// Out-of-range ids render as the unk token.
    pub fn decode(&self, ids: &[u32]) -> String {
        let mut out = String::new();
        for &id in ids {
            match self.id_to_token.get(id as usize) {
                Some(token) => out.push_str(token),
                None => out.push_str(&self.special.unk),
            }
        }
        out
    }
}
