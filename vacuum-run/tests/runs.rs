use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use vacuum_provider::{Completion, CompletionMetadata, Model, UsageStats};
use vacuum_run::{
    Alternative, BreakdownKey, ResultStore, Runner, StoreError, breakdown, compare_models,
    compare_to_chance,
};
use vacuum_score::{ParseOutcome, ResponseParser, ScoreMode};
use vacuum_stimuli::{Condition, ConditionKind, ExperimentConfig, StimulusGenerator, TestType};
use vacuum_symbols::join_symbols;

// -- Scripted model: one queued reply per request, `None` fails the request --

struct ScriptedModel {
    name: String,
    replies: Mutex<VecDeque<Option<String>>>,
    prompts: Mutex<Vec<String>>,
    total: AtomicU64,
    failed: AtomicU64,
}

impl ScriptedModel {
    fn new(name: &str, replies: Vec<Option<String>>) -> Self {
        Self {
            name: name.into(),
            replies: Mutex::new(replies.into()),
            prompts: Mutex::new(Vec::new()),
            total: AtomicU64::new(0),
            failed: AtomicU64::new(0),
        }
    }
}

#[async_trait]
impl Model for ScriptedModel {
    fn name(&self) -> &str {
        &self.name
    }

    async fn complete(&self, prompt: &str) -> Completion {
        self.total.fetch_add(1, Ordering::SeqCst);
        self.prompts.lock().unwrap().push(prompt.to_string());
        let reply = self
            .replies
            .lock()
            .unwrap()
            .pop_front()
            .expect("ScriptedModel: no more replies queued");
        let metadata = CompletionMetadata {
            attempts: 1,
            ..CompletionMetadata::default()
        };
        match reply {
            Some(text) => Completion::ok(text, metadata),
            None => {
                self.failed.fetch_add(1, Ordering::SeqCst);
                Completion::failed("all 3 attempts failed, last error: rate limited", metadata)
            }
        }
    }

    fn stats(&self) -> UsageStats {
        let total = self.total.load(Ordering::SeqCst);
        let failed = self.failed.load(Ordering::SeqCst);
        UsageStats {
            model_name: self.name.clone(),
            total_requests: total,
            failed_requests: failed,
            success_rate: if total == 0 { 0.0 } else { (total - failed) as f64 / total as f64 },
            total_tokens: 0,
        }
    }
}

fn condition(kind: ConditionKind) -> Condition {
    StimulusGenerator::build_fresh(kind, &ExperimentConfig::default()).unwrap()
}

fn correct_reply(condition: &Condition, index: usize) -> String {
    join_symbols(&condition.test[index].output_sequence)
}

fn echo_reply(condition: &Condition, index: usize) -> String {
    join_symbols(&condition.test[index].input_sequence)
}

#[tokio::test]
async fn failures_are_scored_wrong_and_the_run_continues() {
    let plain = condition(ConditionKind::Plain);
    let replies: Vec<Option<String>> = (0..plain.test.len())
        .map(|i| match i % 4 {
            0 => None,
            1 => Some(echo_reply(&plain, i)),
            _ => Some(format!("The answer is: {}", correct_reply(&plain, i))),
        })
        .collect();
    let model = ScriptedModel::new("scripted", replies);

    let result = Runner::default().run(&model, &plain).await;

    assert_eq!(result.n_total, 20);
    assert_eq!(result.responses.len(), 20);
    assert_eq!(result.n_correct, 10);
    assert!((result.accuracy - 0.5).abs() < 1e-12);
    assert_eq!(result.failed_items(), 5);
    assert_eq!(result.experiment_type, "1_sequential");
    assert_eq!(result.model_name, "scripted");

    for (i, record) in result.responses.iter().enumerate() {
        assert_eq!(record.item_number, i + 1);
        assert_eq!(record.expected_output, plain.test[i].output_sequence);
        if i % 4 == 0 {
            assert!(!record.correct);
            assert_eq!(record.score, 0.0);
            assert!(record.model_output_raw.is_empty());
            assert!(record.error.as_deref().unwrap().contains("attempts failed"));
        }
    }

    assert_eq!(result.metadata.n_training_examples, 20);
    assert_eq!(result.metadata.sequence_length, 3);
    assert_eq!(result.metadata.seed, 42);
    assert!((result.metadata.chance_level - 1.0 / 6.0).abs() < 1e-12);
    assert_eq!(result.metadata.model_stats.total_requests, 20);
    assert_eq!(result.metadata.model_stats.failed_requests, 5);
}

#[tokio::test]
async fn prompts_hold_every_training_example_and_the_test_input() {
    let minimal = condition(ConditionKind::Minimal);
    let replies = (0..minimal.test.len())
        .map(|i| Some(correct_reply(&minimal, i)))
        .collect();
    let model = ScriptedModel::new("scripted", replies);

    let result = Runner::default().run(&model, &minimal).await;
    assert_eq!(result.n_correct, minimal.test.len());

    let prompts = model.prompts.lock().unwrap();
    assert_eq!(prompts.len(), minimal.test.len());
    for (prompt, item) in prompts.iter().zip(&minimal.test) {
        let lines: Vec<&str> = prompt.lines().collect();
        assert_eq!(lines.len(), minimal.training.len() + 2);
        assert_eq!(lines[0], minimal.training[0].to_string());
        assert_eq!(lines[lines.len() - 2], "");
        assert_eq!(
            lines[lines.len() - 1],
            format!("{} →", join_symbols(&item.input_sequence))
        );
    }
}

#[tokio::test]
async fn partial_mode_gives_positional_credit() {
    let plain = condition(ConditionKind::Plain);
    let item = &plain.test[0];
    let mut almost = item.output_sequence.clone();
    almost[2] = item.input_sequence[1];
    let mut replies = vec![Some(join_symbols(&almost))];
    replies.extend((1..plain.test.len()).map(|i| Some(correct_reply(&plain, i))));
    let model = ScriptedModel::new("scripted", replies);

    let result = Runner::new(ResponseParser::default())
        .with_mode(ScoreMode::Partial)
        .run(&model, &plain)
        .await;

    let first = &result.responses[0];
    assert!(!first.correct);
    assert!((first.score - 2.0 / 3.0).abs() < 1e-9);
    assert_eq!(first.parse_outcome, ParseOutcome::Complete);
    assert_eq!(result.n_correct, 19);
    assert_eq!(result.metadata.score_mode, ScoreMode::Partial);
}

#[tokio::test]
async fn an_empty_test_set_has_zero_accuracy() {
    let mut plain = condition(ConditionKind::Plain);
    plain.test.clear();
    let model = ScriptedModel::new("scripted", vec![]);

    let result = Runner::default().run(&model, &plain).await;

    assert_eq!(result.n_total, 0);
    assert_eq!(result.accuracy, 0.0);
    assert!(result.responses.is_empty());
}

#[tokio::test]
async fn results_and_conditions_round_trip_through_the_store() {
    let dir = tempfile::tempdir().unwrap();
    let store = ResultStore::new(dir.path());
    let ambiguous = condition(ConditionKind::Ambiguous);
    let replies = (0..ambiguous.test.len())
        .map(|i| Some(correct_reply(&ambiguous, i)))
        .collect();
    let model = ScriptedModel::new("models/scripted-1", replies);
    let result = Runner::default().run(&model, &ambiguous).await;

    let path = store.save_result(&result).await.unwrap();
    assert!(path.starts_with(store.raw_dir()));
    let file_name = path.file_name().unwrap().to_str().unwrap();
    assert!(file_name.starts_with("1c_ambiguity_models_scripted-1_"), "{file_name}");
    assert!(file_name.ends_with(".json"));

    let loaded = store.load_result(&path).await.unwrap();
    assert_eq!(loaded, result);

    let raw: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    let first = &raw["responses"][0];
    for field in [
        "item_number",
        "input",
        "expected_output",
        "model_output_raw",
        "model_output_parsed",
        "correct",
        "score",
        "metadata",
        "model_metadata",
    ] {
        assert!(first.get(field).is_some(), "missing {field}");
    }
    assert!(first["metadata"]["marker"].is_string());

    assert_eq!(store.list_results(Some("1c_ambiguity")).await.unwrap(), vec![path]);
    assert!(store.list_results(Some("1_sequential")).await.unwrap().is_empty());

    let spec_path = store.save_condition(&ambiguous).await.unwrap();
    assert_eq!(
        spec_path,
        store.experiments_dir().join("1c_ambiguity_examples.json")
    );
    let stored = store.load_condition("1c_ambiguity").await.unwrap();
    assert_eq!(stored.training, ambiguous.training);
    assert_eq!(stored.test, ambiguous.test);
    assert_eq!(stored.metadata, ambiguous.metadata);
}

#[tokio::test]
async fn listing_an_empty_store_is_not_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let store = ResultStore::new(dir.path().join("never-written"));
    assert!(store.list_results(None).await.unwrap().is_empty());
    let err = store.load_condition("1_sequential").await.unwrap_err();
    assert!(matches!(err, StoreError::NotFound(_)));
}

#[tokio::test]
async fn transfer_breakdown_uses_stored_item_tags() {
    let transfer = condition(ConditionKind::RuleTransfer);
    let replies = transfer
        .test
        .iter()
        .enumerate()
        .map(|(i, item)| match item.metadata.test_type {
            Some(TestType::Control) => Some(correct_reply(&transfer, i)),
            _ => Some(echo_reply(&transfer, i)),
        })
        .collect();
    let model = ScriptedModel::new("scripted", replies);
    let result = Runner::default().run(&model, &transfer).await;

    let by_type = breakdown(&result, BreakdownKey::TestType);
    assert_eq!(by_type["control"].correct, 10);
    assert_eq!(by_type["control"].total, 10);
    assert_eq!(by_type["transfer"].correct, 0);
    assert_eq!(by_type["transfer"].total, 10);
    assert_eq!(by_type["transfer"].accuracy(), 0.0);

    let by_length = breakdown(&result, BreakdownKey::Length);
    assert_eq!(by_length.len(), 1);
    assert_eq!(by_length["3"].total, 20);

    let comparison = compare_to_chance(&result, Alternative::Greater, 0.05).unwrap();
    assert_eq!(comparison.n_correct, 10);
    assert!(comparison.significant, "p = {}", comparison.p_value);
}

#[tokio::test]
async fn scaling_breakdown_groups_by_length() {
    let scaling = condition(ConditionKind::LengthScaling);
    let replies = (0..scaling.test.len())
        .map(|i| Some(correct_reply(&scaling, i)))
        .collect();
    let model = ScriptedModel::new("scripted", replies);
    let result = Runner::default().run(&model, &scaling).await;

    let by_length = breakdown(&result, BreakdownKey::Length);
    assert_eq!(by_length["3"].total, 6);
    assert_eq!(by_length["4"].total, 7);
    assert_eq!(by_length["5"].total, 7);
    assert!(by_length.values().all(|t| t.accuracy() == 1.0));
}

#[tokio::test]
async fn two_models_are_compared_with_fisher() {
    let ambiguous = condition(ConditionKind::Ambiguous);
    let n = ambiguous.test.len();
    let strong = ScriptedModel::new(
        "strong",
        (0..n).map(|i| Some(correct_reply(&ambiguous, i))).collect(),
    );
    let weak = ScriptedModel::new(
        "weak",
        (0..n).map(|i| Some(echo_reply(&ambiguous, i))).collect(),
    );
    let runner = Runner::default();
    let strong = runner.run(&strong, &ambiguous).await;
    let weak = runner.run(&weak, &ambiguous).await;

    let comparison = compare_models(&strong, &weak, 0.05).unwrap();
    assert_eq!(comparison.table, [[20, 0], [0, 20]]);
    assert!(comparison.significant);
    assert!(comparison.cohens_h > 0.0);
}
