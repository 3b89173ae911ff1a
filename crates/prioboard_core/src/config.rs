//! Board configuration: snapshot slot and priority bucket layout.
//!
//! # Responsibility
//! - Hold the settings that are configuration rather than board data.
//! - Validate caller-supplied overrides before they reach the renderer.
//!
//! # Invariants
//! - `buckets` lists each assignable `Column` at most once.
//! - `Column::Unassigned` is never a configured bucket.

use crate::model::board::Column;
use serde::Deserialize;
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Default durable slot the board snapshot is written to.
pub const DEFAULT_STORAGE_KEY: &str = "priorityBoardState";

/// One priority-matrix column as shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct BucketConfig {
    pub column: Column,
    pub title: String,
}

impl BucketConfig {
    pub fn new(column: Column, title: impl Into<String>) -> Self {
        Self {
            column,
            title: title.into(),
        }
    }
}

/// Board-wide settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct BoardConfig {
    /// Snapshot slot key in durable storage.
    pub storage_key: String,
    /// Matrix columns in display order.
    pub buckets: Vec<BucketConfig>,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            buckets: vec![
                BucketConfig::new(Column::TodayNotLazy, "Today (Not Lazy)"),
                BucketConfig::new(Column::TodayLazy, "Today (Lazy)"),
                BucketConfig::new(Column::TomorrowNotLazy, "Tomorrow (Not Lazy)"),
                BucketConfig::new(Column::TomorrowLazy, "Tomorrow (Lazy)"),
                BucketConfig::new(Column::SpecificDate, "Specific Date"),
            ],
        }
    }
}

impl BoardConfig {
    /// Parses a JSON override; omitted fields keep their defaults.
    pub fn from_json_str(raw: &str) -> Result<Self, ConfigError> {
        let config: Self =
            serde_json::from_str(raw).map_err(|err| ConfigError::Parse(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validates configuration invariants.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.storage_key.trim().is_empty() {
            return Err(ConfigError::EmptyStorageKey);
        }
        let mut seen = HashSet::new();
        for bucket in &self.buckets {
            if !bucket.column.is_assigned() {
                return Err(ConfigError::UnassignedBucket);
            }
            if !seen.insert(bucket.column) {
                return Err(ConfigError::DuplicateBucket(bucket.column));
            }
        }
        Ok(())
    }

    /// Title configured for `column`, falling back to its wire value.
    pub fn bucket_title(&self, column: Column) -> &str {
        self.buckets
            .iter()
            .find(|bucket| bucket.column == column)
            .map_or(column.as_str(), |bucket| bucket.title.as_str())
    }
}

/// Configuration errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Raw configuration is not valid JSON for `BoardConfig`.
    Parse(String),
    EmptyStorageKey,
    /// `none` was listed as a matrix column.
    UnassignedBucket,
    DuplicateBucket(Column),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Parse(message) => write!(f, "invalid board config: {message}"),
            Self::EmptyStorageKey => write!(f, "storage key must not be blank"),
            Self::UnassignedBucket => write!(f, "`none` cannot be a matrix column"),
            Self::DuplicateBucket(column) => write!(f, "bucket listed twice: {column}"),
        }
    }
}

impl Error for ConfigError {}
