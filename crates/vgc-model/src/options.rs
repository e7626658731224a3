//! Configuration options for pipeline processing.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Failure policy for raw table loading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoadMode {
    /// Exploration: a table that fails to load is reported and skipped.
    Discovery,
    /// Preprocessing: any table that fails to load aborts the run.
    #[default]
    Build,
}

impl LoadMode {
    pub fn is_fatal(self) -> bool {
        matches!(self, LoadMode::Build)
    }
}

/// What the merger does when a registry has several rows for one key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DuplicateKeyPolicy {
    /// Fail the merge, naming the registry and the first duplicated key.
    Reject,
    /// Join only the first registry row for each key.
    #[default]
    FirstMatch,
    /// Join every matching row; chart rows are multiplied.
    FanOut,
}

impl DuplicateKeyPolicy {
    pub fn as_str(self) -> &'static str {
        match self {
            DuplicateKeyPolicy::Reject => "reject",
            DuplicateKeyPolicy::FirstMatch => "first-match",
            DuplicateKeyPolicy::FanOut => "fan-out",
        }
    }
}

impl fmt::Display for DuplicateKeyPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Options controlling a pipeline run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProcessingOptions {
    /// Failure policy for the loader.
    pub load_mode: LoadMode,
    /// Registry duplicate-key handling for every join stage.
    pub duplicate_keys: DuplicateKeyPolicy,
}

impl ProcessingOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_load_mode(mut self, mode: LoadMode) -> Self {
        self.load_mode = mode;
        self
    }

    pub fn with_duplicate_keys(mut self, policy: DuplicateKeyPolicy) -> Self {
        self.duplicate_keys = policy;
        self
    }
}
