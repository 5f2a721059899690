//! Filesystem persistence of results and condition specifications.
//!
//! ```text
//! root/
//!   raw/
//!     <experiment>_<model>_<YYYYmmdd_HHMMSS>.json
//!   experiments/
//!     <experiment>_examples.json
//! ```

use crate::error::StoreError;
use crate::record::ExperimentResult;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use vacuum_stimuli::{Condition, ConditionMetadata, SequenceExample};

const RAW_DIR: &str = "raw";
const EXPERIMENTS_DIR: &str = "experiments";

/// A condition specification read back from disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredCondition {
    /// Training examples.
    pub training: Vec<SequenceExample>,
    /// Test items, in presentation order.
    pub test: Vec<SequenceExample>,
    /// Bookkeeping.
    pub metadata: ConditionMetadata,
}

/// Pretty-JSON record store rooted at a results directory.
///
/// Directories are created lazily on first write.
#[derive(Debug, Clone)]
pub struct ResultStore {
    root: PathBuf,
}

impl ResultStore {
    /// A store rooted at `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The results directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Where result records go.
    pub fn raw_dir(&self) -> PathBuf {
        self.root.join(RAW_DIR)
    }

    /// Where condition specifications go.
    pub fn experiments_dir(&self) -> PathBuf {
        self.root.join(EXPERIMENTS_DIR)
    }

    /// Write `result` under `raw/` and return its path.
    pub async fn save_result(&self, result: &ExperimentResult) -> Result<PathBuf, StoreError> {
        let path = self.raw_dir().join(result_file_name(result));
        write_json(&path, result).await?;
        tracing::info!(path = %path.display(), model = %result.model_name, "result saved");
        Ok(path)
    }

    /// Read a result record.
    pub async fn load_result(&self, path: &Path) -> Result<ExperimentResult, StoreError> {
        read_json(path).await
    }

    /// Result files under `raw/`, sorted by name, optionally only those of
    /// one experiment.
    pub async fn list_results(&self, experiment: Option<&str>) -> Result<Vec<PathBuf>, StoreError> {
        let dir = self.raw_dir();
        let mut entries = match tokio::fs::read_dir(&dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(vec![]),
            Err(e) => return Err(StoreError::io(&dir, e)),
        };

        let prefix = experiment.map(|e| format!("{}_", sanitize(e)));
        let mut paths = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| StoreError::io(&dir, e))?
        {
            let Some(name) = entry.file_name().to_str().map(str::to_owned) else {
                continue;
            };
            if !name.ends_with(".json") {
                continue;
            }
            if let Some(prefix) = &prefix {
                if !name.starts_with(prefix.as_str()) {
                    continue;
                }
            }
            paths.push(entry.path());
        }
        paths.sort();
        Ok(paths)
    }

    /// Write the `{training, test, metadata}` record of `condition` under
    /// `experiments/` and return its path. An earlier record for the same
    /// experiment is replaced.
    pub async fn save_condition(&self, condition: &Condition) -> Result<PathBuf, StoreError> {
        let path = self.condition_path(condition.label());
        write_json(&path, &condition.spec()).await?;
        tracing::debug!(path = %path.display(), experiment = condition.label(), "condition saved");
        Ok(path)
    }

    /// Read the condition record of `experiment`.
    pub async fn load_condition(&self, experiment: &str) -> Result<StoredCondition, StoreError> {
        read_json(&self.condition_path(experiment)).await
    }

    fn condition_path(&self, experiment: &str) -> PathBuf {
        self.experiments_dir()
            .join(format!("{}_examples.json", sanitize(experiment)))
    }
}

/// `<experiment>_<model>_<YYYYmmdd_HHMMSS>.json`, with anything outside
/// `[A-Za-z0-9._-]` in the names replaced by `_`.
pub fn result_file_name(result: &ExperimentResult) -> String {
    format!(
        "{}_{}_{}.json",
        sanitize(&result.experiment_type),
        sanitize(&result.model_name),
        result.timestamp.format("%Y%m%d_%H%M%S")
    )
}

fn sanitize(name: &str) -> String {
    name.chars()
        .map(|ch| match ch {
            'a'..='z' | 'A'..='Z' | '0'..='9' | '-' | '_' | '.' => ch,
            _ => '_',
        })
        .collect()
}

async fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<(), StoreError> {
    if let Some(dir) = path.parent() {
        tokio::fs::create_dir_all(dir)
            .await
            .map_err(|e| StoreError::io(dir, e))?;
    }
    let contents = serde_json::to_string_pretty(value)?;
    tokio::fs::write(path, contents)
        .await
        .map_err(|e| StoreError::io(path, e))
}

async fn read_json<T: for<'de> Deserialize<'de>>(path: &Path) -> Result<T, StoreError> {
    let contents = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| StoreError::io(path, e))?;
    Ok(serde_json::from_str(&contents)?)
}
