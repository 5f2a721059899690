//! vacuum CLI: build conditions, drive models through them, test the results.
//!
//! Configuration comes from the environment (see [`vacuum::config`]); the
//! flags here only pick what to run and override the seed and output
//! directory. Models are driven one at a time, condition by condition.

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use vacuum::config::{ConfigError, HarnessConfig};
use vacuum::models::{ProviderKind, available_providers, build_model};
use vacuum_provider::Model;
use vacuum_run::{
    Alternative, BreakdownKey, ResultStore, Runner, breakdown, compare_models, compare_to_chance,
};
use vacuum_score::{ResponseParser, ScoreMode};
use vacuum_stimuli::{ConditionKind, StimulusError, StimulusGenerator};

/// Symbolic rule-induction probes for language models
///
/// Examples:
///   vacuum generate                          # write every condition spec
///   vacuum run -p anthropic -c ambiguous     # one model, one condition
///   vacuum analyze data/results/raw/*.json   # binomial test per result
#[derive(Parser, Debug)]
#[command(name = "vacuum")]
#[command(version)]
#[command(about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Override RANDOM_SEED
    #[arg(long, global = true)]
    seed: Option<u64>,

    /// Override RESULTS_DIR
    #[arg(long, global = true, value_name = "DIR")]
    results_dir: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Build conditions and write their specifications, without calling any model
    Generate {
        /// Conditions to build; all when omitted
        #[arg(short, long = "condition", value_parser = parse_condition)]
        conditions: Vec<ConditionKind>,
    },

    /// Build conditions, run every selected model through them and save results
    Run {
        /// Providers to drive; every provider with a key set when omitted
        #[arg(short, long = "provider", value_parser = parse_provider)]
        providers: Vec<ProviderKind>,

        /// Conditions to run; all when omitted
        #[arg(short, long = "condition", value_parser = parse_condition)]
        conditions: Vec<ConditionKind>,

        /// Give positional partial credit instead of exact-match only
        #[arg(long)]
        partial: bool,
    },

    /// Test saved results against chance
    Analyze {
        /// Result files
        #[arg(required = true, value_name = "FILES")]
        files: Vec<PathBuf>,

        /// Alternative hypothesis: greater, less or two-sided
        #[arg(long, default_value = "greater", value_parser = parse_alternative)]
        alternative: Alternative,

        /// Also compare the first two files with Fisher's exact test
        #[arg(long)]
        compare: bool,

        /// Break accuracy down by test-type, length or rule
        #[arg(long, value_parser = parse_breakdown)]
        by: Option<BreakdownKey>,
    },
}

fn parse_condition(s: &str) -> Result<ConditionKind, StimulusError> {
    s.parse()
}

fn parse_provider(s: &str) -> Result<ProviderKind, ConfigError> {
    s.parse()
}

fn parse_alternative(s: &str) -> Result<Alternative, String> {
    match s {
        "greater" => Ok(Alternative::Greater),
        "less" => Ok(Alternative::Less),
        "two-sided" => Ok(Alternative::TwoSided),
        other => Err(format!("expected greater, less or two-sided, got '{other}'")),
    }
}

fn parse_breakdown(s: &str) -> Result<BreakdownKey, String> {
    match s {
        "test-type" => Ok(BreakdownKey::TestType),
        "length" => Ok(BreakdownKey::Length),
        "rule" => Ok(BreakdownKey::Rule),
        other => Err(format!("expected test-type, length or rule, got '{other}'")),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    let mut config = HarnessConfig::from_env().context("loading configuration")?;
    if let Some(seed) = cli.seed {
        config.experiment.seed = seed;
    }
    if let Some(dir) = cli.results_dir {
        config.results_dir = dir;
    }
    config.validate().context("checking configuration")?;

    match cli.command {
        Command::Generate { conditions } => generate(&config, &selected(conditions)).await,
        Command::Run {
            providers,
            conditions,
            partial,
        } => run(&config, providers, &selected(conditions), partial).await,
        Command::Analyze {
            files,
            alternative,
            compare,
            by,
        } => analyze(&config, &files, alternative, compare, by).await,
    }
}

fn selected(conditions: Vec<ConditionKind>) -> Vec<ConditionKind> {
    if conditions.is_empty() {
        ConditionKind::ALL.to_vec()
    } else {
        conditions
    }
}

async fn generate(config: &HarnessConfig, conditions: &[ConditionKind]) -> Result<()> {
    let store = ResultStore::new(&config.results_dir);
    for &kind in conditions {
        let condition = match StimulusGenerator::build_fresh(kind, &config.experiment) {
            Ok(condition) => condition,
            Err(err) => {
                println!("{}: cannot build condition: {err}", kind.label());
                continue;
            }
        };
        let path = store.save_condition(&condition).await?;
        println!(
            "{}: {} training, {} test -> {}",
            condition.label(),
            condition.training.len(),
            condition.test.len(),
            path.display()
        );
    }
    Ok(())
}

async fn run(
    config: &HarnessConfig,
    providers: Vec<ProviderKind>,
    conditions: &[ConditionKind],
    partial: bool,
) -> Result<()> {
    let providers = if providers.is_empty() {
        available_providers(config)
    } else {
        providers
    };
    if providers.is_empty() {
        bail!("no provider selected and no API key set");
    }
    let models = providers
        .into_iter()
        .map(|kind| build_model(kind, config))
        .collect::<Result<Vec<Box<dyn Model>>, _>>()?;

    let store = ResultStore::new(&config.results_dir);
    let mode = if partial { ScoreMode::Partial } else { ScoreMode::Strict };
    let runner = Runner::new(ResponseParser::new(config.experiment.pool.clone())).with_mode(mode);

    for &kind in conditions {
        let condition = match StimulusGenerator::build_fresh(kind, &config.experiment) {
            Ok(condition) => condition,
            Err(err) => {
                tracing::error!(experiment = kind.label(), error = %err, "condition build failed");
                println!("{}: cannot build condition: {err}", kind.label());
                continue;
            }
        };
        store.save_condition(&condition).await?;

        for model in &models {
            let result = runner.run(model.as_ref(), &condition).await;
            let path = store.save_result(&result).await?;
            let p_value = compare_to_chance(&result, Alternative::Greater, config.alpha)
                .map(|c| format!("p={:.4}", c.p_value))
                .unwrap_or_else(|_| "p=n/a".into());
            println!("{} {p_value} -> {}", result.summary(), path.display());
        }
    }
    Ok(())
}

async fn analyze(
    config: &HarnessConfig,
    files: &[PathBuf],
    alternative: Alternative,
    compare: bool,
    by: Option<BreakdownKey>,
) -> Result<()> {
    let store = ResultStore::new(&config.results_dir);
    let mut results = Vec::with_capacity(files.len());
    for file in files {
        let result = store
            .load_result(file)
            .await
            .with_context(|| format!("reading {}", file.display()))?;

        let comparison = compare_to_chance(&result, alternative, config.alpha)?;
        println!(
            "{}: p={:.4} h={:.2} ({:?}){}",
            result.summary(),
            comparison.p_value,
            comparison.cohens_h,
            comparison.effect,
            if comparison.significant { " significant" } else { "" }
        );
        if let Some(key) = by {
            for (group, tally) in breakdown(&result, key) {
                println!(
                    "  {group}: {}/{} ({:.1}%)",
                    tally.correct,
                    tally.total,
                    tally.accuracy() * 100.0
                );
            }
        }
        results.push(result);
    }

    if compare {
        let [first, second, ..] = results.as_slice() else {
            bail!("--compare needs two result files");
        };
        let comparison = compare_models(first, second, config.alpha)?;
        println!(
            "{} vs {}: Fisher p={:.4}{}",
            comparison.first,
            comparison.second,
            comparison.p_value,
            if comparison.significant { " significant" } else { "" }
        );
    }
    Ok(())
}
