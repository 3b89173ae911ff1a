//! Interaction controller: gestures in, mutations plus render and save out.
//!
//! # Responsibility
//! - Hold the single in-flight gesture slot (edit, drag or pending delete).
//! - Apply store mutations, then rebuild the view, then save the snapshot.
//!
//! # Invariants
//! - At most one gesture is in flight at any time.
//! - A failed operation leaves store, view and snapshot untouched.
//! - Snapshot save failures are logged and never surface to the caller.

use crate::config::{BoardConfig, ConfigError};
use crate::model::board::{Column, EntityId, SubtopicId, TopicId};
use crate::repo::snapshot_repo::SnapshotRepository;
use crate::service::board_store::{BoardError, BoardStore, RestoreOutcome};
use crate::service::persistence::BoardPersistence;
use crate::view::render::{render, BoardView};
use log::{debug, info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Result type used by controller operations.
pub type ControllerResult<T> = Result<T, ControllerError>;

/// Live topic or subtopic targeted by a gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityRef {
    Topic(TopicId),
    Subtopic {
        topic_id: TopicId,
        subtopic_id: SubtopicId,
    },
}

impl EntityRef {
    pub fn entity_id(&self) -> EntityId {
        match self {
            Self::Topic(topic_id) => *topic_id,
            Self::Subtopic { subtopic_id, .. } => *subtopic_id,
        }
    }
}

/// Element picked up by a drag gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragItem {
    /// Topic row in the outline.
    Topic(TopicId),
    /// Subtopic row in the outline.
    Subtopic {
        topic_id: TopicId,
        subtopic_id: SubtopicId,
    },
    /// Task card in the priority matrix.
    Card(SubtopicId),
}

/// Container a dragged element is released over.
///
/// `before` is the index, among siblings other than the dragged element,
/// to insert in front of; `None` appends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropTarget {
    TopicList { before: Option<usize> },
    SubtopicList {
        topic_id: TopicId,
        before: Option<usize>,
    },
    MatrixColumn(Column),
}

/// The single in-flight gesture slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Gesture {
    #[default]
    Idle,
    Editing(EntityRef),
    Dragging(DragItem),
    ConfirmingDelete(EntityRef),
}

/// Result of toggling edit mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditToggle {
    Started,
    Committed,
}

/// Non-fatal condition worth telling the user about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notice {
    /// Restored subtopic lost its parent and became this topic.
    OrphanPromoted { topic_id: TopicId },
}

impl Notice {
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::OrphanPromoted { .. } => {
                "The original topic no longer exists, so the subtopic was restored as a new topic."
            }
        }
    }
}

/// Errors from controller operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ControllerError {
    /// Store rejected the mutation.
    Board(BoardError),
    /// Serial-number input is not a whole number.
    InvalidPositionInput(String),
    /// Column value is not a known bucket.
    InvalidColumn(String),
    /// Bucket exists but is not a column of the active config.
    ColumnNotConfigured(Column),
    /// Board config failed validation at open.
    Config(ConfigError),
    /// Another gesture is already in flight.
    GestureInProgress(Gesture),
    /// Operation requires a gesture that is not in flight.
    NoGestureInFlight,
    /// Drop target does not accept the dragged element.
    DropRejected { item: DragItem, target: DropTarget },
}

impl ControllerError {
    /// Message suitable for an alert shown to the user.
    pub fn user_message(&self) -> String {
        match self {
            Self::Board(BoardError::EmptyText) => "Please enter a title.".to_string(),
            Self::Board(BoardError::PositionOutOfRange { max, .. }) => {
                format!("Please enter a serial number between 1 and {max}.")
            }
            Self::Board(err) => err.to_string(),
            Self::InvalidPositionInput(_) => "Please enter a whole number.".to_string(),
            Self::InvalidColumn(value) => format!("Unknown priority column `{value}`."),
            Self::ColumnNotConfigured(column) => {
                format!("Priority column `{column}` is not on this board.")
            }
            Self::Config(err) => err.to_string(),
            Self::GestureInProgress(_) => "Finish the current action first.".to_string(),
            Self::NoGestureInFlight => "Nothing to confirm.".to_string(),
            Self::DropRejected { .. } => "That item cannot be dropped there.".to_string(),
        }
    }
}

impl Display for ControllerError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Board(err) => write!(f, "{err}"),
            Self::InvalidPositionInput(value) => {
                write!(f, "serial number is not a whole number: `{value}`")
            }
            Self::InvalidColumn(value) => write!(f, "unknown priority column: `{value}`"),
            Self::ColumnNotConfigured(column) => {
                write!(f, "priority column not configured: `{column}`")
            }
            Self::Config(err) => write!(f, "{err}"),
            Self::GestureInProgress(gesture) => {
                write!(f, "another gesture is in flight: {gesture:?}")
            }
            Self::NoGestureInFlight => write!(f, "no matching gesture in flight"),
            Self::DropRejected { item, target } => {
                write!(f, "drop rejected: {item:?} onto {target:?}")
            }
        }
    }
}

impl Error for ControllerError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Board(err) => Some(err),
            Self::Config(err) => Some(err),
            _ => None,
        }
    }
}

impl From<BoardError> for ControllerError {
    fn from(value: BoardError) -> Self {
        Self::Board(value)
    }
}

/// Owns the board for one session and serializes gestures against it.
pub struct InteractionController<R: SnapshotRepository> {
    store: BoardStore,
    persistence: BoardPersistence<R>,
    config: BoardConfig,
    view: BoardView,
    gesture: Gesture,
    render_count: u64,
}

impl<R: SnapshotRepository> InteractionController<R> {
    /// Loads the persisted board (or an empty one) and renders it once.
    ///
    /// # Errors
    /// - `Config` when `config` fails `BoardConfig::validate`.
    pub fn open(repo: R, config: BoardConfig) -> ControllerResult<Self> {
        config.validate().map_err(ControllerError::Config)?;
        let persistence = BoardPersistence::new(repo, config.storage_key.clone());
        let store = BoardStore::from_board(persistence.load());
        let view = render(store.board(), &config);
        info!(
            "event=board_open module=controller status=ok topics={} recycled={}",
            store.topics().len(),
            store.recycle_bin().len()
        );
        Ok(Self {
            store,
            persistence,
            config,
            view,
            gesture: Gesture::Idle,
            render_count: 1,
        })
    }

    pub fn store(&self) -> &BoardStore {
        &self.store
    }

    /// Last rendered view.
    pub fn view(&self) -> &BoardView {
        &self.view
    }

    pub fn gesture(&self) -> Gesture {
        self.gesture
    }

    pub fn config(&self) -> &BoardConfig {
        &self.config
    }

    /// Number of render passes since `open`, including the initial one.
    pub fn render_count(&self) -> u64 {
        self.render_count
    }

    pub fn add_topic(&mut self, text: &str) -> ControllerResult<TopicId> {
        let topic_id = self.store.add_topic(text).map_err(|err| reject("add_topic", err))?;
        self.commit("add_topic");
        Ok(topic_id)
    }

    pub fn add_subtopic(
        &mut self,
        topic_id: TopicId,
        text: &str,
        column: Column,
    ) -> ControllerResult<SubtopicId> {
        self.ensure_column_configured(column)?;
        let subtopic_id = self
            .store
            .add_subtopic(topic_id, text, column)
            .map_err(|err| reject("add_subtopic", err))?;
        self.commit("add_subtopic");
        Ok(subtopic_id)
    }

    /// Double-activation on an item: starts editing it, or commits `text`
    /// when that same item is already being edited.
    pub fn toggle_edit(&mut self, target: EntityRef, text: &str) -> ControllerResult<EditToggle> {
        if self.gesture == Gesture::Editing(target) {
            self.commit_edit(text)?;
            return Ok(EditToggle::Committed);
        }
        self.begin_edit(target)?;
        Ok(EditToggle::Started)
    }

    pub fn begin_edit(&mut self, target: EntityRef) -> ControllerResult<()> {
        self.ensure_idle()?;
        self.ensure_exists(target)?;
        self.gesture = Gesture::Editing(target);
        Ok(())
    }

    /// Blur or Enter on the edited item: stores trimmed `text`.
    pub fn commit_edit(&mut self, text: &str) -> ControllerResult<()> {
        let Gesture::Editing(target) = self.gesture else {
            return Err(ControllerError::NoGestureInFlight);
        };
        self.gesture = Gesture::Idle;
        self.store
            .update_text(target.entity_id(), text)
            .map_err(|err| reject("update_text", err))?;
        self.commit("update_text");
        Ok(())
    }

    pub fn cancel_edit(&mut self) {
        if matches!(self.gesture, Gesture::Editing(_)) {
            self.gesture = Gesture::Idle;
        }
    }

    pub fn begin_drag(&mut self, item: DragItem) -> ControllerResult<()> {
        self.ensure_idle()?;
        match item {
            DragItem::Topic(topic_id) => self.ensure_exists(EntityRef::Topic(topic_id))?,
            DragItem::Subtopic {
                topic_id,
                subtopic_id,
            } => self.ensure_exists(EntityRef::Subtopic {
                topic_id,
                subtopic_id,
            })?,
            DragItem::Card(subtopic_id) => {
                if self.store.find_subtopic(subtopic_id).is_none() {
                    return Err(BoardError::SubtopicNotFound(subtopic_id).into());
                }
            }
        }
        self.gesture = Gesture::Dragging(item);
        Ok(())
    }

    /// Releases the dragged element over `target`.
    ///
    /// Topics reorder within the outline, subtopics within their own
    /// parent, and subtopics or cards dropped on a matrix column change
    /// bucket. Every other combination is rejected. The drag slot is
    /// cleared either way.
    pub fn drop_on(&mut self, target: DropTarget) -> ControllerResult<()> {
        let Gesture::Dragging(item) = self.gesture else {
            return Err(ControllerError::NoGestureInFlight);
        };
        self.gesture = Gesture::Idle;

        match (item, target) {
            (DragItem::Topic(topic_id), DropTarget::TopicList { before }) => {
                let from = self
                    .store
                    .topic_position(topic_id)
                    .ok_or(BoardError::TopicNotFound(topic_id))?;
                let to = before.unwrap_or(self.store.topics().len() - 1);
                self.store
                    .move_topic(from, to)
                    .map_err(|err| reject("move_topic", err))?;
                self.commit("move_topic");
            }
            (
                DragItem::Subtopic {
                    topic_id,
                    subtopic_id,
                },
                DropTarget::SubtopicList {
                    topic_id: target_topic_id,
                    before,
                },
            ) if topic_id == target_topic_id => {
                let topic = self
                    .store
                    .topic(topic_id)
                    .ok_or(BoardError::TopicNotFound(topic_id))?;
                let from = topic
                    .subtopics
                    .iter()
                    .position(|subtopic| subtopic.id == subtopic_id)
                    .ok_or(BoardError::SubtopicNotFound(subtopic_id))?;
                let to = before.unwrap_or(topic.subtopics.len() - 1);
                self.store
                    .move_subtopic(topic_id, from, to)
                    .map_err(|err| reject("move_subtopic", err))?;
                self.commit("move_subtopic");
            }
            (
                DragItem::Subtopic { subtopic_id, .. } | DragItem::Card(subtopic_id),
                DropTarget::MatrixColumn(column),
            ) => {
                self.ensure_column_configured(column)?;
                self.store
                    .set_subtopic_column(subtopic_id, column)
                    .map_err(|err| reject("set_column", err))?;
                self.commit("set_column");
            }
            (item, target) => {
                debug!("event=drop module=controller status=rejected reason=incompatible_target");
                return Err(ControllerError::DropRejected { item, target });
            }
        }
        Ok(())
    }

    pub fn cancel_drag(&mut self) {
        if matches!(self.gesture, Gesture::Dragging(_)) {
            self.gesture = Gesture::Idle;
        }
    }

    /// Asks for delete confirmation; nothing changes until confirmed.
    pub fn request_delete(&mut self, target: EntityRef) -> ControllerResult<()> {
        self.ensure_idle()?;
        self.ensure_exists(target)?;
        self.gesture = Gesture::ConfirmingDelete(target);
        Ok(())
    }

    /// Moves the pending delete target into the recycle bin.
    pub fn confirm_delete(&mut self) -> ControllerResult<()> {
        let Gesture::ConfirmingDelete(target) = self.gesture else {
            return Err(ControllerError::NoGestureInFlight);
        };
        self.gesture = Gesture::Idle;
        let result = match target {
            EntityRef::Topic(topic_id) => self.store.delete_topic(topic_id),
            EntityRef::Subtopic {
                topic_id,
                subtopic_id,
            } => self.store.delete_subtopic(topic_id, subtopic_id),
        };
        result.map_err(|err| reject("delete", err))?;
        self.commit("delete");
        Ok(())
    }

    pub fn cancel_delete(&mut self) {
        if matches!(self.gesture, Gesture::ConfirmingDelete(_)) {
            self.gesture = Gesture::Idle;
        }
    }

    /// Applies a serial number typed into a topic's serial field.
    ///
    /// # Errors
    /// - `InvalidPositionInput` when `input` is not a whole number.
    /// - `Board(PositionOutOfRange)` when it is outside `[1, topic_count]`.
    pub fn submit_serial_number(&mut self, topic_id: TopicId, input: &str) -> ControllerResult<()> {
        let position = input.trim().parse::<i64>().map_err(|_| {
            debug!("event=set_position module=controller status=rejected reason=not_numeric");
            ControllerError::InvalidPositionInput(input.to_string())
        })?;
        self.store
            .set_topic_position(topic_id, position)
            .map_err(|err| reject("set_position", err))?;
        self.commit("set_position");
        Ok(())
    }

    /// Re-sorts the outline by several edited serial fields at once.
    pub fn sort_topics_by_serial(&mut self, serials: &[(TopicId, i64)]) {
        self.store.sort_topics_by_serial(serials);
        self.commit("sort_topics");
    }

    /// Enter in a serial field: re-sorts by the raw text of edited fields.
    ///
    /// Unparsable text sorts as 0; this never fails.
    pub fn sort_topics_by_serial_input(&mut self, inputs: &[(TopicId, &str)]) {
        self.store.sort_topics_by_serial_input(inputs);
        self.commit("sort_topics");
    }

    /// Reassigns a subtopic's bucket.
    ///
    /// # Errors
    /// - `ColumnNotConfigured` when `column` is a bucket the active config
    ///   does not show; `Column::Unassigned` is always accepted.
    pub fn set_column(&mut self, subtopic_id: SubtopicId, column: Column) -> ControllerResult<()> {
        self.ensure_column_configured(column)?;
        self.store
            .set_subtopic_column(subtopic_id, column)
            .map_err(|err| reject("set_column", err))?;
        self.commit("set_column");
        Ok(())
    }

    /// Same as `set_column`, from a dropdown's raw wire value.
    pub fn set_column_value(&mut self, subtopic_id: SubtopicId, value: &str) -> ControllerResult<()> {
        let column =
            Column::parse(value).ok_or_else(|| ControllerError::InvalidColumn(value.to_string()))?;
        self.set_column(subtopic_id, column)
    }

    /// Restores one recycle-bin entry; reports orphan promotion as a notice.
    pub fn restore(&mut self, entry_id: EntityId) -> ControllerResult<Option<Notice>> {
        let outcome = self
            .store
            .restore(entry_id)
            .map_err(|err| reject("restore", err))?;
        self.commit("restore");
        Ok(match outcome {
            RestoreOutcome::Restored => None,
            RestoreOutcome::PromotedOrphan(topic_id) => Some(Notice::OrphanPromoted { topic_id }),
        })
    }

    fn ensure_column_configured(&self, column: Column) -> ControllerResult<()> {
        if column.is_assigned() && !self.config.buckets.iter().any(|b| b.column == column) {
            return Err(ControllerError::ColumnNotConfigured(column));
        }
        Ok(())
    }

    fn ensure_idle(&self) -> ControllerResult<()> {
        match self.gesture {
            Gesture::Idle => Ok(()),
            other => Err(ControllerError::GestureInProgress(other)),
        }
    }

    fn ensure_exists(&self, target: EntityRef) -> ControllerResult<()> {
        match target {
            EntityRef::Topic(topic_id) => {
                if self.store.topic(topic_id).is_none() {
                    return Err(BoardError::TopicNotFound(topic_id).into());
                }
            }
            EntityRef::Subtopic {
                topic_id,
                subtopic_id,
            } => {
                let topic = self
                    .store
                    .topic(topic_id)
                    .ok_or(BoardError::TopicNotFound(topic_id))?;
                if !topic.subtopics.iter().any(|subtopic| subtopic.id == subtopic_id) {
                    return Err(BoardError::SubtopicNotFound(subtopic_id).into());
                }
            }
        }
        Ok(())
    }

    fn commit(&mut self, action: &'static str) {
        self.view = render(self.store.board(), &self.config);
        self.render_count += 1;
        if let Err(err) = self.persistence.save(self.store.board()) {
            warn!(
                "event=snapshot_save module=controller status=error action={} error={}",
                action, err
            );
        }
        info!(
            "event=board_mutation module=controller status=ok action={} topics={} recycled={}",
            action,
            self.store.topics().len(),
            self.store.recycle_bin().len()
        );
    }
}

fn reject(action: &'static str, err: BoardError) -> ControllerError {
    debug!(
        "event=board_mutation module=controller status=rejected action={} error={}",
        action, err
    );
    ControllerError::Board(err)
}
