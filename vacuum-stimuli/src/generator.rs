//! [`StimulusGenerator`]: builds conditions from a seeded pool.

use crate::condition::{Condition, ConditionKind, ConditionMetadata};
use crate::config::{AmbiguousParams, ExperimentConfig, PlainParams, ScalingParams, TransferParams};
use crate::error::StimulusError;
use crate::example::{ExampleMetadata, SequenceExample, TestType};
use crate::transform::Transformation;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use std::collections::BTreeMap;
use vacuum_symbols::{PoolConfig, Symbol, SymbolError, SymbolPool, SymbolSet};

/// Owns a [`SymbolPool`] and a separate ordering rng.
///
/// Every symbol a generator hands out comes from its one pool, so all
/// conditions built by the same generator are mutually disjoint as well.
/// The ordering rng only shuffles test items and never affects which
/// symbols are drawn.
#[derive(Debug)]
pub struct StimulusGenerator {
    pool: SymbolPool,
    order_rng: StdRng,
    seed: u64,
}

impl StimulusGenerator {
    /// Build a generator over a validated pool config.
    pub fn new(pool_config: PoolConfig, seed: u64) -> Result<Self, StimulusError> {
        Ok(Self {
            pool: SymbolPool::new(pool_config, seed)?,
            order_rng: StdRng::seed_from_u64(seed),
            seed,
        })
    }

    /// The seed.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// The underlying pool.
    pub fn pool(&self) -> &SymbolPool {
        &self.pool
    }

    /// Build one condition on a fresh generator using `config`.
    ///
    /// A fresh pool per condition keeps each condition reproducible on its
    /// own, whatever else the run builds.
    pub fn build_fresh(kind: ConditionKind, config: &ExperimentConfig) -> Result<Condition, StimulusError> {
        let mut generator = Self::new(config.pool.clone(), config.seed)?;
        generator.build(kind, config)
    }

    /// Build the condition `kind` from the matching parameter block.
    pub fn build(&mut self, kind: ConditionKind, config: &ExperimentConfig) -> Result<Condition, StimulusError> {
        match kind {
            ConditionKind::Plain => self.plain(&config.plain),
            ConditionKind::Minimal => self.minimal(&config.minimal),
            ConditionKind::Ambiguous => self.ambiguous(&config.ambiguous),
            ConditionKind::LengthScaling => self.length_scaling(&config.scaling),
            ConditionKind::RuleTransfer => self.rule_transfer(&config.transfer),
            ConditionKind::FamiliarControl => self.familiar_control(&config.familiar),
        }
    }

    /// Rotate left by one at a fixed length.
    pub fn plain(&mut self, params: &PlainParams) -> Result<Condition, StimulusError> {
        self.rotation_condition(ConditionKind::Plain, params)
    }

    /// The plain shape with a small training set.
    pub fn minimal(&mut self, params: &PlainParams) -> Result<Condition, StimulusError> {
        self.rotation_condition(ConditionKind::Minimal, params)
    }

    fn rotation_condition(&mut self, kind: ConditionKind, params: &PlainParams) -> Result<Condition, StimulusError> {
        params.validate()?;
        let rule = Transformation::RotateLeft(1);
        let (training_set, test_set) = self.pool.training_test_sets(
            params.n_training,
            params.n_test,
            params.sequence_length,
            kind.label(),
            &rule.name(),
        )?;

        let training = examples(&training_set, params.n_training, params.sequence_length, rule)?;
        let test = examples(&test_set, params.n_test, params.sequence_length, rule)?;

        let mut metadata = self.metadata(kind, rule.name(), params.n_training, params.n_test, params.sequence_length);
        metadata.novelty = Some(self.novelty(&training_set, &test_set));
        Ok(finish(kind, training, test, metadata))
    }

    /// Marker-keyed rules, interleaved in training and shuffled at test.
    pub fn ambiguous(&mut self, params: &AmbiguousParams) -> Result<Condition, StimulusError> {
        params.validate()?;
        let kind = ConditionKind::Ambiguous;
        let markers: Vec<Symbol> = params.rules.iter().map(|r| r.marker).collect();
        self.pool.reserve(&markers);

        let n_rules = params.rules.len();
        let n_training = params.n_training_per_rule * n_rules;
        let n_test = params.n_test_per_rule * n_rules;
        let len = params.sequence_length;
        let (training_set, test_set) =
            self.pool
                .training_test_sets(n_training, n_test, len, kind.label(), "ambiguous")?;

        let training = chunks(training_set.symbols(), n_training, len)?
            .into_iter()
            .enumerate()
            .map(|(i, input)| {
                let rule = &params.rules[i % n_rules];
                SequenceExample::marked(input, rule.marker, rule.rule)
            })
            .collect();

        let mut test: Vec<SequenceExample> = chunks(test_set.symbols(), n_test, len)?
            .into_iter()
            .enumerate()
            .map(|(i, input)| {
                let rule = &params.rules[i / params.n_test_per_rule];
                SequenceExample::marked(input, rule.marker, rule.rule)
            })
            .collect();
        test.shuffle(&mut self.order_rng);

        let mut metadata = self.metadata(kind, "ambiguous".into(), n_training, n_test, len);
        metadata.rules = params
            .rules
            .iter()
            .map(|r| (r.marker.to_string(), r.rule.name()))
            .collect::<BTreeMap<_, _>>();
        metadata.n_per_rule = Some(params.n_training_per_rule);
        metadata.novelty = Some(self.novelty(&training_set, &test_set));
        Ok(finish(kind, training, test, metadata))
    }

    /// Train at one length, test at several.
    pub fn length_scaling(&mut self, params: &ScalingParams) -> Result<Condition, StimulusError> {
        params.validate()?;
        let kind = ConditionKind::LengthScaling;
        let rule = Transformation::RotateLeft(1);

        let mut sizes = vec![params.n_training * params.training_length];
        sizes.extend(params.test_lengths.iter().map(|lc| lc.length * lc.count));
        let groups = self.pool.allocate_sized(&sizes)?;

        let mut groups = groups.into_iter();
        let training_symbols = groups.next().unwrap_or_default();
        let training = chunks(&training_symbols, params.n_training, params.training_length)?
            .into_iter()
            .map(|input| SequenceExample::new(input, rule))
            .collect();

        let mut test = Vec::with_capacity(params.n_test());
        let mut test_symbols = Vec::new();
        for (lc, group) in params.test_lengths.iter().zip(groups) {
            for input in chunks(&group, lc.count, lc.length)? {
                test.push(SequenceExample::new(input, rule).with_metadata(ExampleMetadata {
                    length: Some(lc.length),
                    ..ExampleMetadata::default()
                }));
            }
            test_symbols.extend(group);
        }

        let mut all = training_symbols;
        all.extend(test_symbols);
        let mut metadata = self.metadata(kind, rule.name(), params.n_training, test.len(), params.training_length);
        metadata.test_lengths = params.test_lengths.clone();
        metadata.novelty = Some(self.pool.novelty_report(&all));
        Ok(finish(kind, training, test, metadata))
    }

    /// Train one rule, test it alongside an unseen one.
    pub fn rule_transfer(&mut self, params: &TransferParams) -> Result<Condition, StimulusError> {
        params.validate()?;
        let kind = ConditionKind::RuleTransfer;
        let len = params.sequence_length;
        let n_test = params.n_control + params.n_transfer;
        let (training_set, test_set) = self.pool.training_test_sets(
            params.n_training,
            n_test,
            len,
            kind.label(),
            &params.trained.name(),
        )?;

        let training = examples(&training_set, params.n_training, len, params.trained)?;
        let mut test: Vec<SequenceExample> = chunks(test_set.symbols(), n_test, len)?
            .into_iter()
            .enumerate()
            .map(|(i, input)| {
                let (rule, test_type) = if i < params.n_control {
                    (params.trained, TestType::Control)
                } else {
                    (params.transfer, TestType::Transfer)
                };
                SequenceExample::new(input, rule).with_metadata(ExampleMetadata {
                    test_type: Some(test_type),
                    ..ExampleMetadata::default()
                })
            })
            .collect();
        test.shuffle(&mut self.order_rng);

        let mut metadata = self.metadata(kind, params.trained.name(), params.n_training, n_test, len);
        metadata.n_control = Some(params.n_control);
        metadata.n_transfer = Some(params.n_transfer);
        metadata.novelty = Some(self.novelty(&training_set, &test_set));
        Ok(finish(kind, training, test, metadata))
    }

    /// The plain shape over familiar letters.
    ///
    /// Training and test come from one familiar set split in order, so they
    /// may share letters.
    pub fn familiar_control(&mut self, params: &PlainParams) -> Result<Condition, StimulusError> {
        params.validate()?;
        let kind = ConditionKind::FamiliarControl;
        let rule = Transformation::RotateLeft(1);
        let len = params.sequence_length;
        let set = self
            .pool
            .familiar_set(params.n_training + params.n_test, len, kind.label());

        let mut all = chunks(set.symbols(), params.n_training + params.n_test, len)?
            .into_iter()
            .map(|input| SequenceExample::new(input, rule));
        let training: Vec<_> = all.by_ref().take(params.n_training).collect();
        let test: Vec<_> = all.collect();

        let mut metadata = self.metadata(kind, rule.name(), params.n_training, params.n_test, len);
        metadata.symbol_type = set.metadata().symbol_type.clone();
        Ok(finish(kind, training, test, metadata))
    }

    fn metadata(
        &self,
        kind: ConditionKind,
        transformation: String,
        n_training: usize,
        n_test: usize,
        sequence_length: usize,
    ) -> ConditionMetadata {
        ConditionMetadata {
            experiment: kind.label().to_string(),
            seed: self.seed,
            transformation,
            rules: BTreeMap::new(),
            n_training,
            n_test,
            sequence_length,
            test_lengths: Vec::new(),
            n_per_rule: None,
            n_control: None,
            n_transfer: None,
            symbol_type: None,
            novelty: None,
        }
    }

    fn novelty(&self, training: &SymbolSet, test: &SymbolSet) -> vacuum_symbols::NoveltyReport {
        let mut all = training.symbols().to_vec();
        all.extend_from_slice(test.symbols());
        self.pool.novelty_report(&all)
    }
}

fn finish(
    kind: ConditionKind,
    training: Vec<SequenceExample>,
    test: Vec<SequenceExample>,
    metadata: ConditionMetadata,
) -> Condition {
    tracing::info!(
        condition = kind.label(),
        training = training.len(),
        test = test.len(),
        "built condition"
    );
    Condition {
        kind,
        training,
        test,
        metadata,
    }
}

fn examples(
    set: &SymbolSet,
    n: usize,
    len: usize,
    rule: Transformation,
) -> Result<Vec<SequenceExample>, StimulusError> {
    Ok(chunks(set.symbols(), n, len)?
        .into_iter()
        .map(|input| SequenceExample::new(input, rule))
        .collect())
}

/// Split the first `n * len` symbols into `n` consecutive chunks.
fn chunks(symbols: &[Symbol], n: usize, len: usize) -> Result<Vec<Vec<Symbol>>, StimulusError> {
    let required = n * len;
    if symbols.len() < required {
        return Err(SymbolError::InsufficientSymbols {
            required,
            available: symbols.len(),
        }
        .into());
    }
    Ok(symbols[..required].chunks(len).map(<[Symbol]>::to_vec).collect())
}
