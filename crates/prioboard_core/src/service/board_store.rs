//! Entity store for the topic/subtopic tree and recycle bin.
//!
//! # Responsibility
//! - Own the live topic sequence and the recycle bin.
//! - Enforce text, position and reference rules for every mutation.
//!
//! # Invariants
//! - Topic order is the only source of serial numbers.
//! - Deleted entities live in exactly one place: the recycle bin.
//! - A topic travels into the bin together with all of its subtopics.
//! - Every mutation either applies fully or returns an error untouched.

use crate::model::board::{
    Board, Column, EntityId, RecycleBinEntry, RecycledSubtopic, Subtopic, SubtopicId, Topic,
    TopicId,
};
use log::warn;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Result type used by entity store operations.
pub type BoardResult<T> = Result<T, BoardError>;

/// Errors from entity store operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BoardError {
    /// Required text is blank after trim.
    EmptyText,
    /// Topic does not exist in the live outline.
    TopicNotFound(TopicId),
    /// Subtopic does not exist under any live topic (or under the given one).
    SubtopicNotFound(SubtopicId),
    /// ID does not resolve to any live topic or subtopic.
    EntityNotFound(EntityId),
    /// Recycle-bin entry does not exist.
    EntryNotFound(EntityId),
    /// 1-based serial position outside `[1, max]`.
    PositionOutOfRange { position: i64, max: usize },
    /// Zero-based sequence index outside `[0, len)`.
    IndexOutOfRange { index: usize, len: usize },
}

impl Display for BoardError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyText => write!(f, "text must not be blank"),
            Self::TopicNotFound(id) => write!(f, "topic not found: {id}"),
            Self::SubtopicNotFound(id) => write!(f, "subtopic not found: {id}"),
            Self::EntityNotFound(id) => write!(f, "topic or subtopic not found: {id}"),
            Self::EntryNotFound(id) => write!(f, "recycle bin entry not found: {id}"),
            Self::PositionOutOfRange { position, max } => {
                write!(f, "position {position} is outside 1..={max}")
            }
            Self::IndexOutOfRange { index, len } => {
                write!(f, "index {index} is outside a sequence of length {len}")
            }
        }
    }
}

impl Error for BoardError {}

/// Result of a successful restore.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RestoreOutcome {
    /// Entry went back to where it belongs.
    Restored,
    /// Subtopic parent was gone; the subtopic became this new topic.
    PromotedOrphan(TopicId),
}

/// Owned board state plus its mutation API.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BoardStore {
    board: Board,
}

impl BoardStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Wraps a previously loaded board.
    pub fn from_board(board: Board) -> Self {
        Self { board }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn into_board(self) -> Board {
        self.board
    }

    pub fn topics(&self) -> &[Topic] {
        &self.board.topics
    }

    pub fn recycle_bin(&self) -> &[RecycleBinEntry] {
        &self.board.recycle_bin
    }

    pub fn topic(&self, topic_id: TopicId) -> Option<&Topic> {
        self.board.topics.iter().find(|topic| topic.id == topic_id)
    }

    /// Zero-based index of a live topic.
    pub fn topic_position(&self, topic_id: TopicId) -> Option<usize> {
        self.board
            .topics
            .iter()
            .position(|topic| topic.id == topic_id)
    }

    /// Finds a live subtopic together with its owning topic.
    pub fn find_subtopic(&self, subtopic_id: SubtopicId) -> Option<(&Topic, &Subtopic)> {
        self.board.topics.iter().find_map(|topic| {
            topic
                .subtopics
                .iter()
                .find(|subtopic| subtopic.id == subtopic_id)
                .map(|subtopic| (topic, subtopic))
        })
    }

    /// Appends a new empty topic to the end of the outline.
    ///
    /// # Errors
    /// - `EmptyText` when `text` is blank after trim.
    pub fn add_topic(&mut self, text: impl Into<String>) -> BoardResult<TopicId> {
        let text = normalize_required_text(text.into())?;
        let topic = Topic::new(text);
        let topic_id = topic.id;
        self.board.topics.push(topic);
        Ok(topic_id)
    }

    /// Appends a new subtopic to one topic.
    ///
    /// # Errors
    /// - `TopicNotFound` when `topic_id` is not a live topic.
    /// - `EmptyText` when `text` is blank after trim.
    pub fn add_subtopic(
        &mut self,
        topic_id: TopicId,
        text: impl Into<String>,
        column: Column,
    ) -> BoardResult<SubtopicId> {
        let topic = self.topic_mut(topic_id)?;
        let text = normalize_required_text(text.into())?;
        let subtopic = Subtopic::new(text, column);
        let subtopic_id = subtopic.id;
        topic.subtopics.push(subtopic);
        Ok(subtopic_id)
    }

    /// Moves one topic, with all its subtopics, into the recycle bin.
    pub fn delete_topic(&mut self, topic_id: TopicId) -> BoardResult<()> {
        let index = self
            .topic_position(topic_id)
            .ok_or(BoardError::TopicNotFound(topic_id))?;
        let topic = self.board.topics.remove(index);
        self.board.recycle_bin.push(RecycleBinEntry::Topic(topic));
        Ok(())
    }

    /// Moves one subtopic into the recycle bin, remembering its parent.
    pub fn delete_subtopic(
        &mut self,
        topic_id: TopicId,
        subtopic_id: SubtopicId,
    ) -> BoardResult<()> {
        let topic = self.topic_mut(topic_id)?;
        let index = topic
            .subtopics
            .iter()
            .position(|subtopic| subtopic.id == subtopic_id)
            .ok_or(BoardError::SubtopicNotFound(subtopic_id))?;
        let subtopic = topic.subtopics.remove(index);
        self.board
            .recycle_bin
            .push(RecycleBinEntry::Subtopic(RecycledSubtopic::from_subtopic(
                subtopic, topic_id,
            )));
        Ok(())
    }

    /// Restores one recycle-bin entry into the live outline.
    ///
    /// Topics are appended to the end of the outline. Subtopics go back to
    /// the end of their original parent; when that parent no longer exists
    /// the subtopic is promoted to a new empty topic that keeps its ID and
    /// text, and `PromotedOrphan` is returned.
    pub fn restore(&mut self, entry_id: EntityId) -> BoardResult<RestoreOutcome> {
        let index = self
            .board
            .recycle_bin
            .iter()
            .position(|entry| entry.id() == entry_id)
            .ok_or(BoardError::EntryNotFound(entry_id))?;

        match self.board.recycle_bin.remove(index) {
            RecycleBinEntry::Topic(topic) => {
                self.board.topics.push(topic);
                Ok(RestoreOutcome::Restored)
            }
            RecycleBinEntry::Subtopic(recycled) => {
                let parent_id = recycled.parent_id;
                if let Some(parent) = self
                    .board
                    .topics
                    .iter_mut()
                    .find(|topic| topic.id == parent_id)
                {
                    parent.subtopics.push(recycled.into_subtopic());
                    return Ok(RestoreOutcome::Restored);
                }

                warn!(
                    "event=restore_orphan module=store status=promoted entry_id={} parent_id={}",
                    entry_id, parent_id
                );
                let topic = Topic::with_id(recycled.id, recycled.text);
                let topic_id = topic.id;
                self.board.topics.push(topic);
                Ok(RestoreOutcome::PromotedOrphan(topic_id))
            }
        }
    }

    /// Replaces topic or subtopic text in place.
    ///
    /// Text is trimmed; an empty result is accepted.
    pub fn update_text(&mut self, entity_id: EntityId, text: impl Into<String>) -> BoardResult<()> {
        let text = text.into().trim().to_string();
        for topic in &mut self.board.topics {
            if topic.id == entity_id {
                topic.text = text;
                return Ok(());
            }
            if let Some(subtopic) = topic
                .subtopics
                .iter_mut()
                .find(|subtopic| subtopic.id == entity_id)
            {
                subtopic.text = text;
                return Ok(());
            }
        }
        Err(BoardError::EntityNotFound(entity_id))
    }

    /// Moves the topic at `from` so it ends up at index `to`.
    pub fn move_topic(&mut self, from: usize, to: usize) -> BoardResult<()> {
        move_within(&mut self.board.topics, from, to)
    }

    /// Moves a subtopic within its parent so it ends up at index `to`.
    pub fn move_subtopic(&mut self, parent_id: TopicId, from: usize, to: usize) -> BoardResult<()> {
        let topic = self.topic_mut(parent_id)?;
        move_within(&mut topic.subtopics, from, to)
    }

    /// Moves a topic to a 1-based serial position.
    ///
    /// # Errors
    /// - `TopicNotFound` when `topic_id` is not a live topic.
    /// - `PositionOutOfRange` when `position` is outside `[1, topic_count]`.
    pub fn set_topic_position(&mut self, topic_id: TopicId, position: i64) -> BoardResult<()> {
        let from = self
            .topic_position(topic_id)
            .ok_or(BoardError::TopicNotFound(topic_id))?;
        let max = self.board.topics.len();
        if position < 1 || position as u64 > max as u64 {
            return Err(BoardError::PositionOutOfRange { position, max });
        }
        self.move_topic(from, (position - 1) as usize)
    }

    /// Reassigns one subtopic to a bucket (or unassigns it).
    pub fn set_subtopic_column(&mut self, subtopic_id: SubtopicId, column: Column) -> BoardResult<()> {
        let subtopic = self
            .board
            .topics
            .iter_mut()
            .flat_map(|topic| topic.subtopics.iter_mut())
            .find(|subtopic| subtopic.id == subtopic_id)
            .ok_or(BoardError::SubtopicNotFound(subtopic_id))?;
        subtopic.column = column;
        Ok(())
    }

    /// Re-sorts topics by user-entered serial values.
    ///
    /// Topics missing from `serials` keep their current serial (position + 1)
    /// as key, the value their untouched serial field shows. The sort is
    /// stable, so equal keys keep their relative order.
    pub fn sort_topics_by_serial(&mut self, serials: &[(TopicId, i64)]) {
        let mut keyed = std::mem::take(&mut self.board.topics)
            .into_iter()
            .enumerate()
            .map(|(index, topic)| {
                let key = serials
                    .iter()
                    .find(|(id, _)| *id == topic.id)
                    .map_or(index as i64 + 1, |(_, serial)| *serial);
                (key, topic)
            })
            .collect::<Vec<_>>();
        keyed.sort_by_key(|(key, _)| *key);
        self.board.topics = keyed.into_iter().map(|(_, topic)| topic).collect();
    }

    /// Same as `sort_topics_by_serial`, from the raw text of serial fields.
    ///
    /// Each value is read like an integer prefix (`"3rd"` is 3); text with
    /// no leading integer counts as 0.
    pub fn sort_topics_by_serial_input(&mut self, inputs: &[(TopicId, &str)]) {
        let serials = inputs
            .iter()
            .map(|(topic_id, raw)| (*topic_id, parse_serial_prefix(raw)))
            .collect::<Vec<_>>();
        self.sort_topics_by_serial(&serials);
    }

    fn topic_mut(&mut self, topic_id: TopicId) -> BoardResult<&mut Topic> {
        self.board
            .topics
            .iter_mut()
            .find(|topic| topic.id == topic_id)
            .ok_or(BoardError::TopicNotFound(topic_id))
    }
}

fn move_within<T>(items: &mut Vec<T>, from: usize, to: usize) -> BoardResult<()> {
    let len = items.len();
    if from >= len {
        return Err(BoardError::IndexOutOfRange { index: from, len });
    }
    if to >= len {
        return Err(BoardError::IndexOutOfRange { index: to, len });
    }
    let item = items.remove(from);
    items.insert(to, item);
    Ok(())
}

fn parse_serial_prefix(raw: &str) -> i64 {
    let trimmed = raw.trim_start();
    let (negative, digits) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };
    let end = digits
        .find(|ch: char| !ch.is_ascii_digit())
        .unwrap_or(digits.len());
    match digits[..end].parse::<i64>() {
        Ok(value) if negative => -value,
        Ok(value) => value,
        Err(_) => 0,
    }
}

fn normalize_required_text(value: String) -> BoardResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(BoardError::EmptyText);
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::{parse_serial_prefix, BoardError, BoardStore, RestoreOutcome};
    use crate::model::board::{Column, RecycleBinEntry};

    #[test]
    fn add_topic_rejects_blank_text() {
        let mut store = BoardStore::new();
        assert_eq!(store.add_topic("   "), Err(BoardError::EmptyText));
        assert!(store.topics().is_empty());
    }

    #[test]
    fn add_topic_trims_and_appends() {
        let mut store = BoardStore::new();
        let first = store.add_topic(" Work ").unwrap();
        let second = store.add_topic("Home").unwrap();
        assert_eq!(store.topic_position(first), Some(0));
        assert_eq!(store.topic_position(second), Some(1));
        assert_eq!(store.topics()[0].text, "Work");
    }

    #[test]
    fn add_subtopic_requires_existing_topic() {
        let mut store = BoardStore::new();
        let missing = uuid::Uuid::new_v4();
        let err = store
            .add_subtopic(missing, "Milk", Column::TodayLazy)
            .unwrap_err();
        assert_eq!(err, BoardError::TopicNotFound(missing));
    }

    #[test]
    fn move_within_rejects_out_of_range_and_keeps_order() {
        let mut store = BoardStore::new();
        let a = store.add_topic("A").unwrap();
        let b = store.add_topic("B").unwrap();

        let err = store.move_topic(0, 2).unwrap_err();
        assert_eq!(err, BoardError::IndexOutOfRange { index: 2, len: 2 });
        assert_eq!(store.topics()[0].id, a);
        assert_eq!(store.topics()[1].id, b);
    }

    #[test]
    fn update_text_accepts_empty_result() {
        let mut store = BoardStore::new();
        let topic_id = store.add_topic("Draft").unwrap();
        store.update_text(topic_id, "   ").unwrap();
        assert_eq!(store.topic(topic_id).unwrap().text, "");
    }

    #[test]
    fn restore_orphan_keeps_subtopic_id() {
        let mut store = BoardStore::new();
        let topic_id = store.add_topic("Parent").unwrap();
        let subtopic_id = store
            .add_subtopic(topic_id, "Child", Column::TomorrowLazy)
            .unwrap();
        store.delete_subtopic(topic_id, subtopic_id).unwrap();
        store.delete_topic(topic_id).unwrap();

        let outcome = store.restore(subtopic_id).unwrap();
        assert_eq!(outcome, RestoreOutcome::PromotedOrphan(subtopic_id));
        assert!(matches!(
            store.recycle_bin(),
            [RecycleBinEntry::Topic(topic)] if topic.id == topic_id
        ));
    }

    #[test]
    fn sort_topics_by_serial_is_stable() {
        let mut store = BoardStore::new();
        let a = store.add_topic("A").unwrap();
        let b = store.add_topic("B").unwrap();
        let c = store.add_topic("C").unwrap();

        // C typed as 1 ties with A's implicit 1; A stays first.
        store.sort_topics_by_serial(&[(c, 1)]);
        let order = store.topics().iter().map(|t| t.id).collect::<Vec<_>>();
        assert_eq!(order, vec![a, c, b]);
    }

    #[test]
    fn unparsable_serial_input_sorts_as_zero() {
        let mut store = BoardStore::new();
        let a = store.add_topic("A").unwrap();
        let b = store.add_topic("B").unwrap();
        let c = store.add_topic("C").unwrap();

        // A=2, B=0 (garbage), C=1 (leading integer of "1st").
        store.sort_topics_by_serial_input(&[(a, " 2 "), (b, "abc"), (c, "1st")]);
        let order = store.topics().iter().map(|t| t.id).collect::<Vec<_>>();
        assert_eq!(order, vec![b, c, a]);
    }

    #[test]
    fn serial_prefix_parsing_matches_integer_prefix_rules() {
        assert_eq!(parse_serial_prefix("42"), 42);
        assert_eq!(parse_serial_prefix("  -3x"), -3);
        assert_eq!(parse_serial_prefix("+7"), 7);
        assert_eq!(parse_serial_prefix(""), 0);
        assert_eq!(parse_serial_prefix("x1"), 0);
        assert_eq!(parse_serial_prefix("-"), 0);
    }
}
