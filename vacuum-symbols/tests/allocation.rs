use proptest::prelude::*;
use std::collections::HashSet;
use vacuum_symbols::{PoolConfig, SymbolError, SymbolPool, SymbolRange};

proptest! {
    #[test]
    fn groups_are_pairwise_disjoint_and_exactly_sized(
        seed in any::<u64>(),
        sizes in proptest::collection::vec(0usize..30, 1..6),
    ) {
        let mut pool = SymbolPool::with_defaults(seed);
        let total: usize = sizes.iter().sum();
        prop_assume!(total <= pool.size());

        let groups = pool.allocate_sized(&sizes).unwrap();
        prop_assert_eq!(groups.len(), sizes.len());
        for (group, size) in groups.iter().zip(&sizes) {
            prop_assert_eq!(group.len(), *size);
        }
        let distinct: HashSet<_> = groups.iter().flatten().collect();
        prop_assert_eq!(distinct.len(), total);
        prop_assert_eq!(pool.available(), pool.size() - total);
    }

    #[test]
    fn allocation_is_reproducible_from_the_seed(seed in any::<u64>(), n in 1usize..40) {
        let mut a = SymbolPool::with_defaults(seed);
        let mut b = SymbolPool::with_defaults(seed);
        prop_assert_eq!(a.allocate(2, n).unwrap(), b.allocate(2, n).unwrap());
    }

    #[test]
    fn successive_calls_never_reuse_symbols(seed in any::<u64>()) {
        let mut pool = SymbolPool::with_defaults(seed);
        let mut seen = HashSet::new();
        for _ in 0..6 {
            for symbol in pool.allocate(1, 30).unwrap().remove(0) {
                prop_assert!(seen.insert(symbol));
            }
        }
        prop_assert_eq!(pool.available(), 4);
    }
}

#[test]
fn requesting_more_than_the_universe_fails_with_counts() {
    let config = PoolConfig::new(vec![SymbolRange::new("a", '\u{2A00}', '\u{2A63}')]);
    let mut pool = SymbolPool::new(config, 42).unwrap();
    assert_eq!(pool.size(), 100);
    let err = pool.allocate(2, 60).unwrap_err();
    assert_eq!(
        err,
        SymbolError::InsufficientSymbols {
            required: 120,
            available: 100
        }
    );
    assert_eq!(
        err.to_string(),
        "insufficient symbols: need 120, have 100 available"
    );
}

#[test]
fn invalid_config_is_rejected_before_building() {
    let config = PoolConfig::new(vec![]);
    assert!(matches!(
        SymbolPool::new(config, 0),
        Err(SymbolError::InvalidConfig(_))
    ));
}

#[test]
fn allocated_symbols_all_come_from_configured_ranges() {
    let mut pool = SymbolPool::with_defaults(7);
    let (training, test) = pool
        .training_test_sets(20, 20, 3, "1_sequential", "rotate_left")
        .unwrap();
    let mut all = training.symbols().to_vec();
    all.extend_from_slice(test.symbols());
    let report = pool.novelty_report(&all);
    assert_eq!(report.unique_symbols, 120);
    assert!(report.all_from_designated_ranges);
}
