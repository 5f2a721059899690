//! Significance tests against chance and between models.
//!
//! All tests are exact. The two-sided binomial and Fisher p-values sum the
//! probabilities of every outcome no more likely than the observed one, with
//! a relative tolerance of `1e-7` on that comparison.

use crate::error::AnalysisError;
use crate::record::ExperimentResult;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

const RELATIVE_TOLERANCE: f64 = 1e-7;

/// The alternative hypothesis of a binomial test.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Alternative {
    /// True success probability is above the reference.
    #[default]
    Greater,
    /// True success probability is below the reference.
    Less,
    /// True success probability differs from the reference.
    TwoSided,
}

/// Chance of guessing an `len`-element permutation: `1 / len!`.
pub fn permutation_chance(len: usize) -> f64 {
    1.0 / (1..=len).map(|k| k as f64).product::<f64>()
}

/// Exact binomial test of `successes` out of `trials` against probability `p`.
pub fn binomial_test(
    successes: u64,
    trials: u64,
    p: f64,
    alternative: Alternative,
) -> Result<f64, AnalysisError> {
    if successes > trials {
        return Err(AnalysisError::SuccessesExceedTrials { successes, trials });
    }
    if !(0.0..=1.0).contains(&p) {
        return Err(AnalysisError::InvalidProbability(p));
    }

    let pmf = |k: u64| binomial_pmf(k, trials, p);
    let p_value: f64 = match alternative {
        Alternative::Greater => (successes..=trials).map(pmf).sum(),
        Alternative::Less => (0..=successes).map(pmf).sum(),
        Alternative::TwoSided => {
            let observed = pmf(successes) * (1.0 + RELATIVE_TOLERANCE);
            (0..=trials).map(pmf).filter(|&d| d <= observed).sum()
        }
    };
    Ok(clamp_probability(p_value))
}

/// Two-sided Fisher exact test on a 2×2 table `[[a, b], [c, d]]`.
///
/// Rows are the two groups, columns are correct and incorrect counts.
pub fn fisher_exact(table: [[u64; 2]; 2]) -> f64 {
    let [[a, b], [c, d]] = table;
    let row1 = a + b;
    let col1 = a + c;
    let n = a + b + c + d;
    if n == 0 {
        return 1.0;
    }

    let low = col1.saturating_sub(n - row1);
    let high = row1.min(col1);
    let ln_total = ln_choose(n, col1);
    let pmf = |x: u64| (ln_choose(row1, x) + ln_choose(n - row1, col1 - x) - ln_total).exp();

    let observed = pmf(a) * (1.0 + RELATIVE_TOLERANCE);
    let p_value: f64 = (low..=high).map(pmf).filter(|&d| d <= observed).sum();
    clamp_probability(p_value)
}

/// Cohen's h between two proportions.
pub fn cohens_h(p1: f64, p2: f64) -> f64 {
    2.0 * (p1.sqrt().asin() - p2.sqrt().asin())
}

/// Conventional reading of `|h|`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EffectSize {
    /// `|h| <= 0.5`
    Small,
    /// `0.5 < |h| <= 0.8`
    Medium,
    /// `0.8 < |h| <= 1.2`
    Large,
    /// `|h| > 1.2`
    Huge,
}

impl EffectSize {
    /// Classify `h`.
    pub fn from_h(h: f64) -> Self {
        match h.abs() {
            x if x > 1.2 => Self::Huge,
            x if x > 0.8 => Self::Large,
            x if x > 0.5 => Self::Medium,
            _ => Self::Small,
        }
    }
}

/// One model's accuracy tested against its condition's chance level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChanceComparison {
    /// Model identifier.
    pub model_name: String,
    /// Condition label.
    pub experiment_type: String,
    /// Items correct.
    pub n_correct: usize,
    /// Items presented.
    pub n_total: usize,
    /// Observed accuracy.
    pub accuracy: f64,
    /// Reference probability.
    pub chance_level: f64,
    /// Hypothesis tested.
    pub alternative: Alternative,
    /// Exact binomial p-value.
    pub p_value: f64,
    /// `p_value < alpha`.
    pub significant: bool,
    /// Effect size of accuracy over chance.
    pub cohens_h: f64,
    /// Reading of `cohens_h`.
    pub effect: EffectSize,
}

/// Test `result` against the chance level stored in its metadata.
pub fn compare_to_chance(
    result: &ExperimentResult,
    alternative: Alternative,
    alpha: f64,
) -> Result<ChanceComparison, AnalysisError> {
    if result.n_total == 0 {
        return Err(AnalysisError::Empty);
    }
    let chance = result.metadata.chance_level;
    let p_value = binomial_test(
        result.n_correct as u64,
        result.n_total as u64,
        chance,
        alternative,
    )?;
    let h = cohens_h(result.accuracy, chance);
    Ok(ChanceComparison {
        model_name: result.model_name.clone(),
        experiment_type: result.experiment_type.clone(),
        n_correct: result.n_correct,
        n_total: result.n_total,
        accuracy: result.accuracy,
        chance_level: chance,
        alternative,
        p_value,
        significant: p_value < alpha,
        cohens_h: h,
        effect: EffectSize::from_h(h),
    })
}

/// Two models' accuracy on the same condition compared.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelComparison {
    /// First model.
    pub first: String,
    /// Second model.
    pub second: String,
    /// `[[correct, incorrect]; 2]`, first model on top.
    pub table: [[u64; 2]; 2],
    /// Two-sided Fisher exact p-value.
    pub p_value: f64,
    /// `p_value < alpha`.
    pub significant: bool,
    /// Effect size of first over second.
    pub cohens_h: f64,
}

/// Fisher exact test between two results.
pub fn compare_models(
    first: &ExperimentResult,
    second: &ExperimentResult,
    alpha: f64,
) -> Result<ModelComparison, AnalysisError> {
    if first.n_total == 0 || second.n_total == 0 {
        return Err(AnalysisError::Empty);
    }
    let row = |r: &ExperimentResult| [r.n_correct as u64, (r.n_total - r.n_correct) as u64];
    let table = [row(first), row(second)];
    let p_value = fisher_exact(table);
    Ok(ModelComparison {
        first: first.model_name.clone(),
        second: second.model_name.clone(),
        table,
        p_value,
        significant: p_value < alpha,
        cohens_h: cohens_h(first.accuracy, second.accuracy),
    })
}

/// Which per-item tag to group by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BreakdownKey {
    /// `control` / `transfer`. Untagged items are skipped.
    TestType,
    /// Length of the expected output.
    Length,
    /// Rule selected by the item's marker. Untagged items are skipped.
    Rule,
}

/// Correct and total counts for one group.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tally {
    /// Items correct.
    pub correct: usize,
    /// Items in the group.
    pub total: usize,
}

impl Tally {
    /// `correct / total`, 0.0 for an empty group.
    pub fn accuracy(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.correct as f64 / self.total as f64
        }
    }
}

/// Accuracy per subtype.
///
/// Groups come from the tags stored with each item, never from the model's
/// output.
pub fn breakdown(result: &ExperimentResult, key: BreakdownKey) -> BTreeMap<String, Tally> {
    let mut groups: BTreeMap<String, Tally> = BTreeMap::new();
    for item in &result.responses {
        let group = match key {
            BreakdownKey::TestType => item.metadata.test_type.map(|t| t.as_str().to_string()),
            BreakdownKey::Length => Some(
                item.metadata
                    .length
                    .unwrap_or(item.expected_output.len())
                    .to_string(),
            ),
            BreakdownKey::Rule => item.metadata.rule.map(|r| r.name()),
        };
        if let Some(group) = group {
            let tally = groups.entry(group).or_default();
            tally.total += 1;
            if item.correct {
                tally.correct += 1;
            }
        }
    }
    groups
}

fn binomial_pmf(k: u64, n: u64, p: f64) -> f64 {
    (ln_choose(n, k) + xlogy(k as f64, p) + xlogy((n - k) as f64, 1.0 - p)).exp()
}

/// `x * ln(y)`, taken as 0 when `x` is 0.
fn xlogy(x: f64, y: f64) -> f64 {
    if x == 0.0 { 0.0 } else { x * y.ln() }
}

fn ln_choose(n: u64, k: u64) -> f64 {
    if k > n {
        return f64::NEG_INFINITY;
    }
    let k = k.min(n - k);
    (1..=k)
        .map(|i| ((n - k + i) as f64 / i as f64).ln())
        .sum()
}

fn clamp_probability(p: f64) -> f64 {
    p.clamp(0.0, 1.0)
}
