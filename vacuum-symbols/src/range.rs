//! Named code-point ranges and the pool configuration built from them.

use crate::error::SymbolError;
use crate::symbol::Symbol;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::str::FromStr;

/// A named, inclusive range of code points.
///
/// Range names are provenance bookkeeping only: allocation treats every
/// symbol in the pool alike.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymbolRange {
    /// Range name used in audit reports.
    pub name: String,
    /// First code point (inclusive).
    pub start: char,
    /// Last code point (inclusive).
    pub end: char,
}

impl SymbolRange {
    /// Create a range from its bounds.
    pub fn new(name: impl Into<String>, start: char, end: char) -> Self {
        Self {
            name: name.into(),
            start,
            end,
        }
    }

    /// Mathematical Operators supplement, U+2A00–U+2A3F.
    pub fn mathematical_operators() -> Self {
        Self::new("mathematical_operators", '\u{2A00}', '\u{2A3F}')
    }

    /// Miscellaneous Symbols and Arrows, U+2B00–U+2B3F.
    pub fn miscellaneous_symbols() -> Self {
        Self::new("miscellaneous_symbols", '\u{2B00}', '\u{2B3F}')
    }

    /// Geometric Shapes, U+25A0–U+25D7.
    pub fn geometric_shapes() -> Self {
        Self::new("geometric_shapes", '\u{25A0}', '\u{25D7}')
    }

    /// Whether `c` falls inside this range.
    pub fn contains(&self, c: char) -> bool {
        (self.start..=self.end).contains(&c)
    }

    /// Every symbol in the range, in code-point order.
    pub fn symbols(&self) -> impl Iterator<Item = Symbol> + '_ {
        (self.start..=self.end).map(Symbol::new)
    }

    /// Number of symbols in the range.
    pub fn len(&self) -> usize {
        (self.start..=self.end).count()
    }

    /// Whether the range holds no symbols (`start > end`).
    pub fn is_empty(&self) -> bool {
        self.start > self.end
    }

    fn overlaps(&self, other: &SymbolRange) -> bool {
        self.start <= other.end && other.start <= self.end
    }
}

fn parse_code_point(raw: &str) -> Result<char, SymbolError> {
    let trimmed = raw.trim();
    let digits = trimmed
        .strip_prefix("U+")
        .or_else(|| trimmed.strip_prefix("u+"))
        .unwrap_or(trimmed);
    let value = u32::from_str_radix(digits, 16)
        .map_err(|e| SymbolError::InvalidConfig(format!("bad code point '{raw}': {e}")))?;
    char::from_u32(value)
        .ok_or_else(|| SymbolError::InvalidConfig(format!("'{raw}' is not a scalar value")))
}

impl FromStr for SymbolRange {
    type Err = SymbolError;

    /// Parse `name:START-END` with hexadecimal code points,
    /// e.g. `mathematical_operators:2A00-2A3F`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (name, bounds) = s
            .split_once(':')
            .ok_or_else(|| SymbolError::InvalidConfig(format!("expected name:START-END, got '{s}'")))?;
        let (start, end) = bounds
            .split_once('-')
            .ok_or_else(|| SymbolError::InvalidConfig(format!("expected START-END, got '{bounds}'")))?;
        let name = name.trim();
        if name.is_empty() {
            return Err(SymbolError::InvalidConfig(format!("range '{s}' has no name")));
        }
        Ok(Self::new(name, parse_code_point(start)?, parse_code_point(end)?))
    }
}

/// The set of ranges a [`SymbolPool`](crate::SymbolPool) draws from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolConfig {
    /// Ranges in universe order.
    pub ranges: Vec<SymbolRange>,
}

impl Default for PoolConfig {
    /// Mathematical operators, miscellaneous symbols and geometric shapes:
    /// 184 symbols with little co-occurrence in ordinary text.
    fn default() -> Self {
        Self {
            ranges: vec![
                SymbolRange::mathematical_operators(),
                SymbolRange::miscellaneous_symbols(),
                SymbolRange::geometric_shapes(),
            ],
        }
    }
}

impl PoolConfig {
    /// Build a config from explicit ranges.
    pub fn new(ranges: Vec<SymbolRange>) -> Self {
        Self { ranges }
    }

    /// Parse a `;`-separated list of `name:START-END` ranges.
    pub fn parse_list(s: &str) -> Result<Self, SymbolError> {
        let ranges = s
            .split(';')
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .map(str::parse)
            .collect::<Result<Vec<SymbolRange>, _>>()?;
        Ok(Self::new(ranges))
    }

    /// Check the config once, before any pool is built from it.
    pub fn validate(&self) -> Result<(), SymbolError> {
        if self.ranges.is_empty() {
            return Err(SymbolError::InvalidConfig("no symbol ranges configured".into()));
        }
        let mut names = HashSet::new();
        for (i, range) in self.ranges.iter().enumerate() {
            if range.is_empty() {
                return Err(SymbolError::InvalidConfig(format!(
                    "range '{}' is empty",
                    range.name
                )));
            }
            if !names.insert(range.name.as_str()) {
                return Err(SymbolError::InvalidConfig(format!(
                    "range '{}' is declared twice",
                    range.name
                )));
            }
            if let Some(other) = self.ranges[i + 1..].iter().find(|o| o.overlaps(range)) {
                return Err(SymbolError::InvalidConfig(format!(
                    "ranges '{}' and '{}' overlap",
                    range.name, other.name
                )));
            }
        }
        Ok(())
    }

    /// Every configured symbol, range by range.
    pub fn universe(&self) -> Vec<Symbol> {
        self.ranges.iter().flat_map(SymbolRange::symbols).collect()
    }

    /// Total number of configured symbols.
    pub fn size(&self) -> usize {
        self.ranges.iter().map(SymbolRange::len).sum()
    }

    /// The range containing `c`, if any.
    pub fn range_of(&self, c: char) -> Option<&SymbolRange> {
        self.ranges.iter().find(|r| r.contains(c))
    }

    /// Whether `c` is in any configured range.
    pub fn contains(&self, c: char) -> bool {
        self.range_of(c).is_some()
    }

    /// Audit where a batch of symbols comes from.
    pub fn novelty_report(&self, symbols: &[Symbol]) -> NoveltyReport {
        let unique: HashSet<Symbol> = symbols.iter().copied().collect();
        let mut by_range: BTreeMap<String, usize> = self
            .ranges
            .iter()
            .map(|r| (r.name.clone(), 0))
            .collect();
        let mut unicode_ranges = BTreeMap::new();
        let mut from_other_ranges = 0;

        for symbol in &unique {
            unicode_ranges.insert(symbol.code_point_label(), *symbol);
            match self.range_of(symbol.as_char()) {
                Some(range) => *by_range.entry(range.name.clone()).or_default() += 1,
                None => from_other_ranges += 1,
            }
        }

        NoveltyReport {
            total_symbols: symbols.len(),
            unique_symbols: unique.len(),
            by_range,
            from_other_ranges,
            unicode_ranges,
            all_from_designated_ranges: from_other_ranges == 0,
        }
    }
}

/// Provenance audit of a batch of symbols.
///
/// Per-range counts are over unique symbols.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoveltyReport {
    /// Symbols inspected, duplicates included.
    pub total_symbols: usize,
    /// Distinct symbols inspected.
    pub unique_symbols: usize,
    /// Distinct symbols per configured range.
    pub by_range: BTreeMap<String, usize>,
    /// Distinct symbols outside every configured range.
    pub from_other_ranges: usize,
    /// `U+XXXX` label to symbol, for every distinct symbol.
    pub unicode_ranges: BTreeMap<String, Symbol>,
    /// Whether every symbol came from a configured range.
    pub all_from_designated_ranges: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_pool_has_184_symbols() {
        let config = PoolConfig::default();
        assert_eq!(config.size(), 184);
        assert_eq!(config.universe().len(), 184);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn geometric_range_ends_at_last_circle() {
        let range = SymbolRange::geometric_shapes();
        assert_eq!(range.len(), 56);
        assert!(range.contains('■'));
        assert!(range.contains('◗'));
        assert!(!range.contains('◘'));
    }

    #[test]
    fn parses_range_with_and_without_prefix() {
        let range: SymbolRange = "math:2A00-U+2A3F".parse().unwrap();
        assert_eq!(range, SymbolRange::new("math", '\u{2A00}', '\u{2A3F}'));
    }

    #[test]
    fn parse_list_skips_blank_segments() {
        let config = PoolConfig::parse_list("a:2A00-2A0F; ;b:2B00-2B0F;").unwrap();
        assert_eq!(config.ranges.len(), 2);
        assert_eq!(config.size(), 32);
    }

    #[test]
    fn rejects_malformed_ranges() {
        assert!("nocolon".parse::<SymbolRange>().is_err());
        assert!("a:2A00".parse::<SymbolRange>().is_err());
        assert!("a:ZZZZ-2A00".parse::<SymbolRange>().is_err());
        assert!(":2A00-2A01".parse::<SymbolRange>().is_err());
        assert!("a:D800-D8FF".parse::<SymbolRange>().is_err());
    }

    #[test]
    fn validate_rejects_overlap_empty_and_duplicates() {
        let overlap = PoolConfig::new(vec![
            SymbolRange::new("a", '\u{2A00}', '\u{2A10}'),
            SymbolRange::new("b", '\u{2A10}', '\u{2A20}'),
        ]);
        assert!(matches!(overlap.validate(), Err(SymbolError::InvalidConfig(m)) if m.contains("overlap")));

        let empty = PoolConfig::new(vec![SymbolRange::new("a", '\u{2A10}', '\u{2A00}')]);
        assert!(matches!(empty.validate(), Err(SymbolError::InvalidConfig(m)) if m.contains("empty")));

        let duplicate = PoolConfig::new(vec![
            SymbolRange::new("a", '\u{2A00}', '\u{2A01}'),
            SymbolRange::new("a", '\u{2B00}', '\u{2B01}'),
        ]);
        assert!(duplicate.validate().is_err());

        assert!(PoolConfig::new(vec![]).validate().is_err());
    }

    #[test]
    fn novelty_report_counts_unique_symbols_per_range() {
        let config = PoolConfig::default();
        let symbols = [
            Symbol::new('⨀'),
            Symbol::new('⨀'),
            Symbol::new('⬀'),
            Symbol::new('■'),
            Symbol::new('A'),
        ];
        let report = config.novelty_report(&symbols);
        assert_eq!(report.total_symbols, 5);
        assert_eq!(report.unique_symbols, 4);
        assert_eq!(report.by_range["mathematical_operators"], 1);
        assert_eq!(report.by_range["miscellaneous_symbols"], 1);
        assert_eq!(report.by_range["geometric_shapes"], 1);
        assert_eq!(report.from_other_ranges, 1);
        assert!(!report.all_from_designated_ranges);
        assert_eq!(report.unicode_ranges["U+0041"], Symbol::new('A'));
    }
}
