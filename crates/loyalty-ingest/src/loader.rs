//! Batch loading into a [`RewardBook`].

use std::path::Path;

use loyalty_registry::{RewardBook, UpsertOutcome};
use loyalty_types::{Result, RewardError};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::row::parse_row;

/// What to do with a batch that contains a bad row.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BatchPolicy {
    /// Stop at the first bad row and leave the store unchanged
    #[default]
    Atomic,
    /// Record bad rows in the report and keep going
    SkipInvalid,
}

/// Loader settings.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IngestConfig {
    pub batch_policy: BatchPolicy,
    /// Skip the first line of every batch
    pub has_header: bool,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            batch_policy: BatchPolicy::Atomic,
            has_header: true,
        }
    }
}

/// A row that was not applied.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct RowRejection {
    pub line: usize,
    pub reason: String,
}

impl RowRejection {
    fn new(line: usize, error: RewardError) -> Self {
        let reason = match error {
            RewardError::MalformedRecord { reason, .. } => reason,
            other => other.to_string(),
        };
        Self { line, reason }
    }

    pub fn into_error(self) -> RewardError {
        RewardError::MalformedRecord {
            line: self.line,
            reason: self.reason,
        }
    }
}

/// Outcome of a batch.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct IngestReport {
    /// Rows that changed the store
    pub applied: usize,
    pub inserted: usize,
    pub terminated: usize,
    pub rejected: Vec<RowRejection>,
}

/// Reads CSV batches into a reward book.
#[derive(Clone, Debug, Default)]
pub struct ContractLoader {
    config: IngestConfig,
}

impl ContractLoader {
    pub fn new(config: IngestConfig) -> Self {
        Self { config }
    }

    pub fn with_policy(batch_policy: BatchPolicy) -> Self {
        Self::new(IngestConfig {
            batch_policy,
            ..IngestConfig::default()
        })
    }

    pub fn config(&self) -> &IngestConfig {
        &self.config
    }

    /// Load a batch from CSV text.
    ///
    /// Rows are applied to a staged copy of the contract store, which
    /// replaces the book's store once the batch is done. Under
    /// [`BatchPolicy::Atomic`] the first bad row is returned as
    /// [`RewardError::MalformedRecord`] and the book is not touched.
    pub fn load_str(&self, book: &mut RewardBook, text: &str) -> Result<IngestReport> {
        let mut staged = book.contracts().clone();
        let mut report = IngestReport::default();

        for (idx, raw) in text.lines().enumerate() {
            if idx == 0 && self.config.has_header {
                continue;
            }
            if raw.trim().is_empty() {
                continue;
            }
            let line = idx + 1;

            let outcome = parse_row(line, raw, book.partners()).and_then(|record| staged.upsert(record));
            match outcome {
                Ok(UpsertOutcome::Inserted) => {
                    report.applied += 1;
                    report.inserted += 1;
                }
                Ok(UpsertOutcome::Terminated) => {
                    report.applied += 1;
                    report.terminated += 1;
                }
                Err(err) => {
                    let rejection = RowRejection::new(line, err);
                    warn!(line, reason = %rejection.reason, "Rejected contract row");
                    match self.config.batch_policy {
                        BatchPolicy::Atomic => return Err(rejection.into_error()),
                        BatchPolicy::SkipInvalid => report.rejected.push(rejection),
                    }
                }
            }
        }

        book.replace_contracts(staged);
        info!(
            applied = report.applied,
            inserted = report.inserted,
            terminated = report.terminated,
            rejected = report.rejected.len(),
            "Contract batch loaded"
        );
        Ok(report)
    }

    /// Load a batch from a CSV file.
    pub fn load_path(&self, book: &mut RewardBook, path: impl AsRef<Path>) -> Result<IngestReport> {
        let path = path.as_ref();
        debug!(path = %path.display(), "Reading contract file");
        let text = std::fs::read_to_string(path).map_err(|e| RewardError::Io {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        self.load_str(book, &text)
    }
}
