//! Adjacent-pair counting and merge selection.

use compact_str::CompactString;
use pairtok_core::{FreqTable, Result};

/// Derive the adjacent-pair frequency table from a symbol vocabulary.
///
/// Every vocabulary entry is split on single spaces into its symbol list;
/// each adjacent pair contributes the entry's whole frequency. Entries of
/// zero or one symbol contribute nothing, so the returned table's total
/// mass is `sum(freq_i * (symbols_i - 1))`.
pub fn count_pairs(vocab: &FreqTable) -> Result<FreqTable> {
    let pairs = FreqTable::new(vocab.capacity().max(1))?;

    for (key, freq) in vocab.entries()? {
        let symbols: Vec<&str> = key.split(' ').collect();
        for window in symbols.windows(2) {
            let pair = format!("{} {}", window[0], window[1]);
            pairs.add(&pair, freq)?;
        }
    }

    Ok(pairs)
}

/// Select the single best pair: strictly greatest frequency, with exact
/// ties broken by the byte-wise lexicographically smaller pair key.
///
/// Returns `None` when the pair table is empty; the trainer reads that as
/// exhaustion, not as an error.
pub fn best_pair(pairs: &FreqTable) -> Result<Option<(CompactString, i64)>> {
    let mut best: Option<(CompactString, i64)> = None;

    for (pair, freq) in pairs.entries()? {
        best = match best {
            None => Some((pair, freq)),
            Some((bp, bf)) => {
                if freq > bf || (freq == bf && pair < bp) {
                    Some((pair, freq))
                } else {
                    Some((bp, bf))
                }
            }
        };
    }

    Ok(best)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pair_mass_invariant() {
        let vocab = FreqTable::new(8).unwrap();
        vocab.add("l o w", 3).unwrap(); // 3 symbols -> 2 pairs * 3
        vocab.add("l o w e r", 1).unwrap(); // 5 symbols -> 4 pairs * 1
        vocab.add("x", 7).unwrap(); // 1 symbol -> no pairs

        let pairs = count_pairs(&vocab).unwrap();
        assert_eq!(pairs.total_mass().unwrap(), 3 * 2 + 4);
        assert_eq!(pairs.get("l o").unwrap(), Some(4));
        assert_eq!(pairs.get("o w").unwrap(), Some(4));
        assert_eq!(pairs.get("w e").unwrap(), Some(1));
    }

    #[test]
    fn test_single_symbol_entries_contribute_nothing() {
        let vocab = FreqTable::new(8).unwrap();
        vocab.add("a", 100).unwrap();
        let pairs = count_pairs(&vocab).unwrap();
        assert!(pairs.is_empty());
    }

    #[test]
    fn test_best_pair_max_frequency() {
        let pairs = FreqTable::new(8).unwrap();
        pairs.add("l o", 3).unwrap();
        pairs.add("w e", 2).unwrap();
        pairs.add("e r", 1).unwrap();

        let (pair, freq) = best_pair(&pairs).unwrap().unwrap();
        assert_eq!(pair, "l o");
        assert_eq!(freq, 3);
    }

    #[test]
    fn test_best_pair_tie_break_is_lexicographic() {
        let pairs = FreqTable::new(8).unwrap();
        pairs.add("o w", 3).unwrap();
        pairs.add("l o", 3).unwrap();

        let (pair, freq) = best_pair(&pairs).unwrap().unwrap();
        assert_eq!(pair, "l o");
        assert_eq!(freq, 3);
    }

    #[test]
    fn test_best_pair_is_deterministic() {
        let pairs = FreqTable::new(32).unwrap();
        for (k, f) in [("a b", 5), ("b c", 5), ("c d", 5), ("d e", 2)] {
            pairs.add(k, f).unwrap();
        }
        let first = best_pair(&pairs).unwrap();
        for _ in 0..10 {
            assert_eq!(best_pair(&pairs).unwrap(), first);
        }
        assert_eq!(first.unwrap().0, "a b");
    }

    #[test]
    fn test_empty_table_signals_exhaustion() {
        let pairs = FreqTable::new(8).unwrap();
        assert_eq!(best_pair(&pairs).unwrap(), None);
    }
}
