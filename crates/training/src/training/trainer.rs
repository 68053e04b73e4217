//! The iterative BPE merge trainer and the vocabulary rewriter.

use pairtok_core::{fuse_symbols, split_pair, FreqTable, MergeModel, MergeRecord, Result};

use super::counter::{best_pair, count_pairs};

/// Trainer state after the most recent `train` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrainerState {
    /// A training loop is in progress
    Running,
    /// The pair table emptied before the merge budget was spent
    Exhausted,
    /// The full merge budget was spent
    Done,
}

/// Apply one chosen pair merge across every vocabulary entry.
///
/// Each entry's symbol key is re-split, fused with the single greedy
/// left-to-right pass, and re-joined; output frequencies sum when two
/// distinct inputs collapse onto the same rewritten key, so total
/// frequency mass is conserved.
pub fn rewrite(vocab: &FreqTable, pair_key: &str) -> Result<FreqTable> {
    let (a, b) = split_pair(pair_key)?;
    let out = FreqTable::new(vocab.capacity().max(1))?;

    for (key, freq) in vocab.entries()? {
        let symbols: Vec<_> = key.split(' ').map(Into::into).collect();
        let fused = fuse_symbols(&symbols, a, b);
        out.add(&fused.join(" "), freq)?;
    }

    Ok(out)
}

/// Iterative BPE merge trainer.
///
/// Runs count -> select -> rewrite up to a merge budget, accumulating the
/// ordered merge list. Selection exhaustion (an empty pair table) ends
/// training early and normally.
#[derive(Debug, Default)]
pub struct BpeTrainer {
    state: Option<TrainerState>,
}

impl BpeTrainer {
    /// Create a trainer that has not yet run.
    pub fn new() -> Self {
        Self::default()
    }

    /// State reached by the most recent `train` call, if any.
    pub fn state(&self) -> Option<TrainerState> {
        self.state
    }

    /// Learn up to `max_merges` merges from `vocab`.
    ///
    /// Works on a private copy; the caller's table is never mutated. With
    /// `verbose` set, each chosen merge is logged at info level.
    pub fn train(
        &mut self,
        vocab: &FreqTable,
        max_merges: usize,
        verbose: bool,
    ) -> Result<MergeModel> {
        self.state = Some(TrainerState::Running);

        let mut work = vocab.copy()?;
        let mut model = MergeModel::new();

        for step in 0..max_merges {
            let pairs = count_pairs(&work)?;

            let Some((pair, freq)) = best_pair(&pairs)? else {
                self.state = Some(TrainerState::Exhausted);
                break;
            };

            if verbose {
                log::info!("merge {:>4}: '{}' ({})", step, pair, freq);
            } else {
                log::debug!("merge {:>4}: '{}' ({})", step, pair, freq);
            }

            work = rewrite(&work, &pair)?;
            model.push(MergeRecord { pair, freq });
        }

        if self.state == Some(TrainerState::Running) {
            self.state = Some(TrainerState::Done);
        }

        Ok(model)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::training::vocab;

    #[test]
    fn test_rewrite_fuses_and_conserves_mass() {
        let table = FreqTable::new(8).unwrap();
        table.add("l o w", 3).unwrap();
        table.add("l o w e r", 1).unwrap();

        let out = rewrite(&table, "l o").unwrap();
        assert_eq!(out.get("lo w").unwrap(), Some(3));
        assert_eq!(out.get("lo w e r").unwrap(), Some(1));
        assert_eq!(out.total_mass().unwrap(), table.total_mass().unwrap());
    }

    #[test]
    fn test_rewrite_sums_colliding_keys() {
        // "a b" and "ab" become the same entry once the pair fuses
        let table = FreqTable::new(8).unwrap();
        table.add("a b", 2).unwrap();
        table.add("ab", 5).unwrap();

        let out = rewrite(&table, "a b").unwrap();
        assert_eq!(out.get("ab").unwrap(), Some(7));
        assert_eq!(out.len(), 1);
        assert_eq!(out.total_mass().unwrap(), 7);
    }

    #[test]
    fn test_rewrite_rejects_malformed_pair() {
        let table = FreqTable::new(8).unwrap();
        table.add("a b", 1).unwrap();
        assert!(rewrite(&table, "a").is_err());
        assert!(rewrite(&table, "a b c").is_err());
    }

    #[test]
    fn test_low_lower_lowest_trace() {
        // Hand-computed trace for the toy corpus "low lower lowest":
        //   step 1: "l o" and "o w" both occur 3 times; "l o" wins the tie
        //   step 2: "lo w" occurs 3 times
        //   step 3: "low e" occurs 2 times
        let table = vocab::tokenize("low lower lowest").unwrap();

        let mut trainer = BpeTrainer::new();
        let model = trainer.train(&table, 3, false).unwrap();

        assert_eq!(trainer.state(), Some(TrainerState::Done));
        assert_eq!(model.len(), 3);
        assert_eq!(model.get(0).unwrap().pair, "l o");
        assert_eq!(model.get(0).unwrap().freq, 3);
        assert_eq!(model.get(1).unwrap().pair, "lo w");
        assert_eq!(model.get(1).unwrap().freq, 3);
        assert_eq!(model.get(2).unwrap().pair, "low e");
        assert_eq!(model.get(2).unwrap().freq, 2);
    }

    #[test]
    fn test_exhaustion_stops_early() {
        // "ab" offers exactly one merge, then no pairs remain
        let table = vocab::tokenize("ab").unwrap();

        let mut trainer = BpeTrainer::new();
        let model = trainer.train(&table, 100, false).unwrap();

        assert_eq!(trainer.state(), Some(TrainerState::Exhausted));
        assert_eq!(model.len(), 1);
        assert_eq!(model.get(0).unwrap().pair, "a b");
        assert_eq!(model.get(0).unwrap().freq, 1);
    }

    #[test]
    fn test_empty_vocab_exhausts_immediately() {
        let table = vocab::tokenize("").unwrap();

        let mut trainer = BpeTrainer::new();
        let model = trainer.train(&table, 10, false).unwrap();

        assert_eq!(trainer.state(), Some(TrainerState::Exhausted));
        assert!(model.is_empty());
    }

    #[test]
    fn test_caller_vocab_is_never_mutated() {
        let table = vocab::tokenize("low lower lowest").unwrap();
        let before = {
            let mut entries = table.entries().unwrap();
            entries.sort();
            entries
        };

        let mut trainer = BpeTrainer::new();
        trainer.train(&table, 5, false).unwrap();

        let mut after = table.entries().unwrap();
        after.sort();
        assert_eq!(before, after);
    }
}
