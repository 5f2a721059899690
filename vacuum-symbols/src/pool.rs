//! The seeded symbol pool and its disjoint allocator.

use crate::error::SymbolError;
use crate::range::{NoveltyReport, PoolConfig};
use crate::set::{SetRole, SymbolSet, verify_disjoint};
use crate::symbol::Symbol;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use std::collections::HashSet;

/// A shuffled universe of symbols plus the set already issued.
///
/// A symbol, once issued or reserved, is never issued again by the same
/// pool. Allocation is deterministic: the same seed and the same sequence
/// of calls yields the same symbols.
///
/// One pool belongs to one run. It is not meant to be shared.
#[derive(Debug)]
pub struct SymbolPool {
    config: PoolConfig,
    seed: u64,
    pub(crate) rng: StdRng,
    shuffled: Vec<Symbol>,
    used: HashSet<Symbol>,
}

impl SymbolPool {
    /// Build a pool from a validated config.
    pub fn new(config: PoolConfig, seed: u64) -> Result<Self, SymbolError> {
        config.validate()?;
        Ok(Self::build(config, seed))
    }

    /// Build a pool over the default ranges.
    pub fn with_defaults(seed: u64) -> Self {
        Self::build(PoolConfig::default(), seed)
    }

    fn build(config: PoolConfig, seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut shuffled = config.universe();
        shuffled.shuffle(&mut rng);
        Self {
            config,
            seed,
            rng,
            shuffled,
            used: HashSet::new(),
        }
    }

    /// The seed this pool was built with.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// The ranges this pool draws from.
    pub fn config(&self) -> &PoolConfig {
        &self.config
    }

    /// Total symbols in the universe.
    pub fn size(&self) -> usize {
        self.shuffled.len()
    }

    /// Symbols neither issued nor reserved.
    pub fn available(&self) -> usize {
        self.shuffled.len() - self.used.len()
    }

    /// Whether `symbol` has been issued or reserved.
    pub fn is_used(&self, symbol: Symbol) -> bool {
        self.used.contains(&symbol)
    }

    /// Unused symbols in shuffled order.
    pub fn eligible(&self) -> Vec<Symbol> {
        self.shuffled
            .iter()
            .filter(|s| !self.used.contains(*s))
            .copied()
            .collect()
    }

    /// Mark symbols as used without issuing them.
    ///
    /// Marker symbols are reserved this way so they can never turn up as
    /// stimulus symbols. Symbols outside the universe are ignored.
    pub fn reserve(&mut self, symbols: &[Symbol]) {
        for symbol in symbols {
            if self.shuffled.contains(symbol) {
                self.used.insert(*symbol);
            }
        }
        tracing::debug!(count = symbols.len(), available = self.available(), "reserved symbols");
    }

    /// Draw `n_sets` disjoint groups of `symbols_per_set` symbols each.
    pub fn allocate(
        &mut self,
        n_sets: usize,
        symbols_per_set: usize,
    ) -> Result<Vec<Vec<Symbol>>, SymbolError> {
        self.allocate_sized(&vec![symbols_per_set; n_sets])
    }

    /// Draw disjoint groups with the given sizes from the unused pool.
    pub fn allocate_sized(&mut self, sizes: &[usize]) -> Result<Vec<Vec<Symbol>>, SymbolError> {
        let eligible = self.eligible();
        self.draw(eligible, sizes)
    }

    /// Draw disjoint groups from an explicit candidate list.
    ///
    /// Candidates that were already issued, or that repeat, are skipped.
    pub fn allocate_from(
        &mut self,
        candidates: &[Symbol],
        sizes: &[usize],
    ) -> Result<Vec<Vec<Symbol>>, SymbolError> {
        let mut seen = HashSet::new();
        let eligible = candidates
            .iter()
            .filter(|s| !self.used.contains(*s) && seen.insert(**s))
            .copied()
            .collect();
        self.draw(eligible, sizes)
    }

    fn draw(&mut self, eligible: Vec<Symbol>, sizes: &[usize]) -> Result<Vec<Vec<Symbol>>, SymbolError> {
        let required: usize = sizes.iter().sum();
        if eligible.len() < required {
            return Err(SymbolError::InsufficientSymbols {
                required,
                available: eligible.len(),
            });
        }

        let sampled: Vec<Symbol> = rand::seq::index::sample(&mut self.rng, eligible.len(), required)
            .into_iter()
            .map(|i| eligible[i])
            .collect();

        let mut groups = Vec::with_capacity(sizes.len());
        let mut offset = 0;
        for &size in sizes {
            groups.push(sampled[offset..offset + size].to_vec());
            offset += size;
        }

        let slices: Vec<&[Symbol]> = groups.iter().map(Vec::as_slice).collect();
        verify_disjoint(&slices)?;

        self.used.extend(sampled.iter().copied());
        tracing::debug!(
            sets = sizes.len(),
            required,
            available = self.available(),
            "allocated symbols"
        );
        Ok(groups)
    }

    /// Allocate a training set and a test set that share no symbols.
    ///
    /// Sizes are `n_training * sequence_length` and
    /// `n_test * sequence_length`. The intersection is checked again before
    /// returning.
    pub fn training_test_sets(
        &mut self,
        n_training: usize,
        n_test: usize,
        sequence_length: usize,
        experiment: &str,
        rule: &str,
    ) -> Result<(SymbolSet, SymbolSet), SymbolError> {
        let mut groups = self
            .allocate_sized(&[n_training * sequence_length, n_test * sequence_length])?
            .into_iter();
        let (Some(training), Some(test)) = (groups.next(), groups.next()) else {
            return Err(SymbolError::InvalidConfig(
                "allocator returned fewer than two groups".into(),
            ));
        };

        let training = SymbolSet::new(training, SetRole::Training, experiment, n_training, sequence_length)
            .with_rule(rule)
            .with_seed(self.seed);
        let test = SymbolSet::new(test, SetRole::Test, experiment, n_test, sequence_length)
            .with_rule(rule)
            .with_seed(self.seed);

        let overlap = training.overlap(&test);
        if !overlap.is_empty() {
            tracing::error!(experiment, shared = overlap.len(), "training and test sets overlap");
            return Err(SymbolError::DisjointnessViolation { overlap });
        }
        Ok((training, test))
    }

    /// Audit a batch of symbols against this pool's ranges.
    pub fn novelty_report(&self, symbols: &[Symbol]) -> NoveltyReport {
        self.config.novelty_report(symbols)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::range::SymbolRange;

    fn pool_of(n: u32, seed: u64) -> SymbolPool {
        let start = '\u{2A00}';
        let end = char::from_u32(0x2A00 + n - 1).unwrap();
        SymbolPool::new(PoolConfig::new(vec![SymbolRange::new("test", start, end)]), seed).unwrap()
    }

    #[test]
    fn allocate_returns_equal_disjoint_groups() {
        let mut pool = SymbolPool::with_defaults(42);
        let groups = pool.allocate(3, 10).unwrap();
        assert_eq!(groups.len(), 3);
        assert!(groups.iter().all(|g| g.len() == 10));
        let all: HashSet<_> = groups.iter().flatten().collect();
        assert_eq!(all.len(), 30);
        assert_eq!(pool.available(), 184 - 30);
    }

    #[test]
    fn later_allocations_never_reissue_symbols() {
        let mut pool = pool_of(20, 7);
        let first = pool.allocate(1, 10).unwrap().remove(0);
        let second = pool.allocate(1, 10).unwrap().remove(0);
        assert!(first.iter().all(|s| !second.contains(s)));
        assert_eq!(pool.available(), 0);
        assert_eq!(
            pool.allocate(1, 1).unwrap_err(),
            SymbolError::InsufficientSymbols {
                required: 1,
                available: 0
            }
        );
    }

    #[test]
    fn same_seed_same_allocation() {
        let mut a = SymbolPool::with_defaults(42);
        let mut b = SymbolPool::with_defaults(42);
        assert_eq!(a.allocate(2, 30).unwrap(), b.allocate(2, 30).unwrap());
        assert_eq!(a.allocate(1, 5).unwrap(), b.allocate(1, 5).unwrap());
    }

    #[test]
    fn different_seeds_shuffle_differently() {
        let a = SymbolPool::with_defaults(1);
        let b = SymbolPool::with_defaults(2);
        assert_ne!(a.eligible(), b.eligible());
    }

    #[test]
    fn training_test_sets_reports_shortfall_with_counts() {
        let mut pool = pool_of(100, 42);
        let err = pool
            .training_test_sets(20, 20, 3, "1_sequential", "rotate_left")
            .unwrap_err();
        assert_eq!(
            err,
            SymbolError::InsufficientSymbols {
                required: 120,
                available: 100
            }
        );
        assert_eq!(pool.available(), 100, "failed allocation must not consume symbols");
    }

    #[test]
    fn training_test_sets_are_sized_and_tagged() {
        let mut pool = SymbolPool::with_defaults(42);
        let (training, test) = pool
            .training_test_sets(3, 20, 3, "1b_minimal", "rotate_left")
            .unwrap();
        assert_eq!(training.len(), 9);
        assert_eq!(test.len(), 60);
        assert_eq!(training.role(), SetRole::Training);
        assert_eq!(test.role(), SetRole::Test);
        assert_eq!(test.metadata().seed, Some(42));
        assert!(training.is_disjoint_from(&test));
    }

    #[test]
    fn reserved_symbols_are_never_issued() {
        let mut pool = pool_of(10, 3);
        let marker = Symbol::new('\u{2A00}');
        pool.reserve(&[marker, Symbol::new('★')]);
        assert_eq!(pool.available(), 9);
        let all = pool.allocate(1, 9).unwrap().remove(0);
        assert!(!all.contains(&marker));
    }

    #[test]
    fn allocate_from_skips_used_and_repeated_candidates() {
        let mut pool = pool_of(10, 3);
        let taken = pool.allocate(1, 4).unwrap().remove(0);
        let mut candidates = pool.config().universe();
        candidates.extend(candidates.clone());
        let err = pool.allocate_from(&candidates, &[7]).unwrap_err();
        assert_eq!(
            err,
            SymbolError::InsufficientSymbols {
                required: 7,
                available: 6
            }
        );
        let rest = pool.allocate_from(&candidates, &[6]).unwrap().remove(0);
        assert!(rest.iter().all(|s| !taken.contains(s)));
    }

    #[test]
    fn zero_sized_request_is_trivially_satisfied() {
        let mut pool = pool_of(5, 1);
        let groups = pool.allocate(2, 0).unwrap();
        assert_eq!(groups, vec![Vec::<Symbol>::new(), Vec::new()]);
        assert_eq!(pool.available(), 5);
    }
}
