#![deny(missing_docs)]
//! Symbol universe and disjoint allocation for rule-induction stimuli.
//!
//! A [`SymbolPool`] owns a seeded, shuffled universe of symbols drawn from
//! named [`SymbolRange`]s and never issues the same symbol twice. Groups
//! returned by one allocation call are pairwise disjoint, which is what lets
//! training and test material share zero symbols.
//!
//! ```
//! use vacuum_symbols::SymbolPool;
//!
//! let mut pool = SymbolPool::with_defaults(42);
//! let (training, test) = pool
//!     .training_test_sets(20, 20, 3, "1_sequential", "rotate_left")
//!     .unwrap();
//! assert!(training.is_disjoint_from(&test));
//! ```

pub mod error;
pub mod familiar;
pub mod pool;
pub mod range;
pub mod set;
pub mod symbol;

pub use error::SymbolError;
pub use familiar::FAMILIAR_ALPHABET;
pub use pool::SymbolPool;
pub use range::{NoveltyReport, PoolConfig, SymbolRange};
pub use set::{SetMetadata, SetRole, SymbolSet, verify_disjoint};
pub use symbol::{Symbol, join_symbols};
