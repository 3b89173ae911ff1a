//! Board domain model.
//!
//! # Responsibility
//! - Define topics, subtopics, priority columns and recycle-bin entries.
//! - Provide serial-number derivation and snapshot validation helpers.
//!
//! # Invariants
//! - `id` values are unique across live topics, live subtopics and
//!   recycle-bin payloads.
//! - `Column::Unassigned` subtopics never appear in the priority matrix.
//! - Recycled subtopics keep their original `parent_id`, even when that
//!   parent is later deleted too.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable identifier for topics, subtopics and recycle-bin entries.
pub type EntityId = Uuid;
/// Topic identifier.
pub type TopicId = EntityId;
/// Subtopic identifier.
pub type SubtopicId = EntityId;

/// Priority bucket a subtopic is assigned to.
///
/// Wire values are kebab-case (`today-not-lazy`), `none` means unassigned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Column {
    /// Not placed into any bucket.
    #[default]
    #[serde(rename = "none")]
    Unassigned,
    TodayNotLazy,
    TodayLazy,
    TomorrowNotLazy,
    TomorrowLazy,
    SpecificDate,
}

impl Column {
    /// All assignable buckets in default display order.
    pub const BUCKETS: [Column; 5] = [
        Column::TodayNotLazy,
        Column::TodayLazy,
        Column::TomorrowNotLazy,
        Column::TomorrowLazy,
        Column::SpecificDate,
    ];

    /// Returns stable wire value.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Unassigned => "none",
            Self::TodayNotLazy => "today-not-lazy",
            Self::TodayLazy => "today-lazy",
            Self::TomorrowNotLazy => "tomorrow-not-lazy",
            Self::TomorrowLazy => "tomorrow-lazy",
            Self::SpecificDate => "specific-date",
        }
    }

    /// Parses a wire value, case-insensitive and trimmed.
    pub fn parse(value: &str) -> Option<Self> {
        let normalized = value.trim().to_ascii_lowercase();
        if normalized == Self::Unassigned.as_str() {
            return Some(Self::Unassigned);
        }
        Self::BUCKETS
            .into_iter()
            .find(|column| column.as_str() == normalized)
    }

    /// Returns whether this column is a real bucket.
    pub fn is_assigned(self) -> bool {
        self != Self::Unassigned
    }
}

impl Display for Column {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Task-like leaf item owned by exactly one topic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subtopic {
    pub id: SubtopicId,
    pub text: String,
    #[serde(default)]
    pub column: Column,
}

impl Subtopic {
    /// Creates a subtopic with a generated stable ID.
    pub fn new(text: impl Into<String>, column: Column) -> Self {
        Self {
            id: Uuid::new_v4(),
            text: text.into(),
            column,
        }
    }
}

/// Top-level organizational unit; owns its subtopics exclusively.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Topic {
    pub id: TopicId,
    pub text: String,
    #[serde(default)]
    pub subtopics: Vec<Subtopic>,
}

impl Topic {
    /// Creates an empty topic with a generated stable ID.
    pub fn new(text: impl Into<String>) -> Self {
        Self::with_id(Uuid::new_v4(), text)
    }

    /// Creates an empty topic with a caller-provided ID.
    ///
    /// Used when an orphaned subtopic is promoted and keeps its identity.
    pub fn with_id(id: TopicId, text: impl Into<String>) -> Self {
        Self {
            id,
            text: text.into(),
            subtopics: Vec::new(),
        }
    }
}

/// Subtopic payload held by the recycle bin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecycledSubtopic {
    pub id: SubtopicId,
    pub text: String,
    #[serde(default)]
    pub column: Column,
    /// Owning topic at delete time; may dangle after that topic is deleted.
    pub parent_id: TopicId,
}

impl RecycledSubtopic {
    pub fn from_subtopic(subtopic: Subtopic, parent_id: TopicId) -> Self {
        Self {
            id: subtopic.id,
            text: subtopic.text,
            column: subtopic.column,
            parent_id,
        }
    }

    pub fn into_subtopic(self) -> Subtopic {
        Subtopic {
            id: self.id,
            text: self.text,
            column: self.column,
        }
    }
}

/// Soft-deleted topic or subtopic, tagged on the wire by `type`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum RecycleBinEntry {
    /// Whole topic, subtopics travel with it.
    Topic(Topic),
    Subtopic(RecycledSubtopic),
}

impl RecycleBinEntry {
    /// Entry ID; equals the ID of the recycled payload.
    pub fn id(&self) -> EntityId {
        match self {
            Self::Topic(topic) => topic.id,
            Self::Subtopic(subtopic) => subtopic.id,
        }
    }

    pub fn text(&self) -> &str {
        match self {
            Self::Topic(topic) => topic.text.as_str(),
            Self::Subtopic(subtopic) => subtopic.text.as_str(),
        }
    }

    /// User-facing label, e.g. `Topic: Groceries`.
    pub fn label(&self) -> String {
        match self {
            Self::Topic(topic) => format!("Topic: {}", topic.text),
            Self::Subtopic(subtopic) => format!("Subtopic: {}", subtopic.text),
        }
    }
}

/// Whole board snapshot: live outline plus recycle bin.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Board {
    #[serde(default)]
    pub topics: Vec<Topic>,
    #[serde(default)]
    pub recycle_bin: Vec<RecycleBinEntry>,
}

impl Board {
    /// Returns whether the board holds no live or recycled entities.
    pub fn is_empty(&self) -> bool {
        self.topics.is_empty() && self.recycle_bin.is_empty()
    }

    /// Validates snapshot-level invariants.
    ///
    /// # Errors
    /// - `DuplicateId` when any entity ID appears more than once across
    ///   topics, subtopics and recycle-bin payloads.
    pub fn validate(&self) -> Result<(), BoardValidationError> {
        let mut seen = HashSet::new();
        let mut claim = |id: EntityId| {
            if seen.insert(id) {
                Ok(())
            } else {
                Err(BoardValidationError::DuplicateId(id))
            }
        };

        for topic in &self.topics {
            claim(topic.id)?;
            for subtopic in &topic.subtopics {
                claim(subtopic.id)?;
            }
        }
        for entry in &self.recycle_bin {
            claim(entry.id())?;
            if let RecycleBinEntry::Topic(topic) = entry {
                for subtopic in &topic.subtopics {
                    claim(subtopic.id)?;
                }
            }
        }
        Ok(())
    }
}

/// Snapshot invariant violations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BoardValidationError {
    DuplicateId(EntityId),
}

impl Display for BoardValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DuplicateId(id) => write!(f, "entity id appears more than once: {id}"),
        }
    }
}

impl Error for BoardValidationError {}

/// 1-based serial number for the topic at `index`.
pub fn topic_serial(index: usize) -> usize {
    index + 1
}

/// Serial label `<topic>.<subtopic>` for zero-based positions.
pub fn subtopic_serial(topic_index: usize, subtopic_index: usize) -> String {
    format!("{}.{}", topic_serial(topic_index), subtopic_index + 1)
}
