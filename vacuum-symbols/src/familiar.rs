//! Familiar letters for the structural control condition.

use crate::pool::SymbolPool;
use crate::set::{SetRole, SymbolSet};
use crate::symbol::Symbol;
use rand::seq::SliceRandom;

/// The 26 uppercase Latin letters.
pub const FAMILIAR_ALPHABET: [char; 26] = [
    'A', 'B', 'C', 'D', 'E', 'F', 'G', 'H', 'I', 'J', 'K', 'L', 'M', 'N', 'O', 'P', 'Q', 'R',
    'S', 'T', 'U', 'V', 'W', 'X', 'Y', 'Z',
];

impl SymbolPool {
    /// Draw `n_sequences * sequence_length` familiar letters.
    ///
    /// Up to 26 letters are sampled without replacement using the pool's
    /// rng. Larger requests cycle through the alphabet in order, so letters
    /// repeat. Familiar letters never come from the novel universe and are
    /// not marked as used.
    pub fn familiar_set(
        &mut self,
        n_sequences: usize,
        sequence_length: usize,
        experiment: &str,
    ) -> SymbolSet {
        let total = n_sequences * sequence_length;
        let letters: Vec<Symbol> = if total <= FAMILIAR_ALPHABET.len() {
            FAMILIAR_ALPHABET
                .choose_multiple(&mut self.rng, total)
                .copied()
                .map(Symbol::new)
                .collect()
        } else {
            FAMILIAR_ALPHABET
                .iter()
                .cycle()
                .take(total)
                .copied()
                .map(Symbol::new)
                .collect()
        };
        tracing::debug!(total, experiment, "drew familiar letters");

        SymbolSet::new(letters, SetRole::Control, experiment, n_sequences, sequence_length)
            .with_seed(self.seed())
            .with_purpose("familiar_letters", "structural_control")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn small_request_samples_distinct_letters() {
        let mut pool = SymbolPool::with_defaults(42);
        let set = pool.familiar_set(5, 3, "control");
        assert_eq!(set.len(), 15);
        assert_eq!(set.metadata().unique_count, 15);
        assert!(set.symbols().iter().all(|s| s.as_char().is_ascii_uppercase()));
        assert_eq!(set.role(), SetRole::Control);
        assert_eq!(set.metadata().purpose.as_deref(), Some("structural_control"));
    }

    #[test]
    fn large_request_cycles_the_alphabet() {
        let mut pool = SymbolPool::with_defaults(42);
        let set = pool.familiar_set(10, 3, "control");
        assert_eq!(set.len(), 30);
        assert_eq!(set.symbols()[0], Symbol::new('A'));
        assert_eq!(set.symbols()[26], Symbol::new('A'));
        assert_eq!(set.symbols()[29], Symbol::new('D'));
    }

    #[test]
    fn familiar_letters_do_not_consume_the_pool() {
        let mut pool = SymbolPool::with_defaults(1);
        let before = pool.available();
        pool.familiar_set(3, 3, "control");
        assert_eq!(pool.available(), before);
    }
}
