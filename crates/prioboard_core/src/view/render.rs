//! Board view model and renderer.
//!
//! # Invariants
//! - Matrix columns follow `BoardConfig::buckets` order.
//! - Unassigned subtopics only appear in the outline.
//! - Cards inside a column follow outline order.

use crate::config::BoardConfig;
use crate::model::board::{
    subtopic_serial, topic_serial, Board, Column, EntityId, SubtopicId, TopicId,
};
use std::fmt::{Display, Formatter};

/// Affordance a presentation layer can bind to a control.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewAction {
    AddSubtopic { topic_id: TopicId },
    Restore { entry_id: EntityId },
}

/// Fully rebuilt view of the board.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BoardView {
    pub outline: Vec<TopicRow>,
    pub matrix: Vec<MatrixColumnView>,
    pub recycle_bin: Vec<RecycleRow>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopicRow {
    pub id: TopicId,
    pub serial: usize,
    pub text: String,
    pub subtopics: Vec<SubtopicRow>,
    pub add_subtopic: ViewAction,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubtopicRow {
    pub id: SubtopicId,
    /// `<topic serial>.<subtopic serial>`.
    pub serial: String,
    pub text: String,
    pub column: Column,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatrixColumnView {
    pub column: Column,
    pub title: String,
    pub cards: Vec<TaskCard>,
}

/// One subtopic shown in the priority matrix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskCard {
    pub subtopic_id: SubtopicId,
    pub topic_id: TopicId,
    pub text: String,
    /// `From: <topic text>`.
    pub origin: String,
    /// `<topic text> (<serial>)`.
    pub path: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecycleRow {
    pub entry_id: EntityId,
    /// `Topic: <text>` or `Subtopic: <text>`.
    pub label: String,
    pub restore: ViewAction,
}

impl BoardView {
    /// Cards of one matrix column; empty for unknown or unassigned columns.
    pub fn cards_in(&self, column: Column) -> &[TaskCard] {
        self.matrix
            .iter()
            .find(|view| view.column == column)
            .map(|view| view.cards.as_slice())
            .unwrap_or(&[])
    }

    /// Returns whether any matrix column shows this subtopic.
    pub fn matrix_contains(&self, subtopic_id: SubtopicId) -> bool {
        self.matrix
            .iter()
            .flat_map(|view| view.cards.iter())
            .any(|card| card.subtopic_id == subtopic_id)
    }
}

/// Projects the board into outline, matrix and recycle-bin regions.
pub fn render(board: &Board, config: &BoardConfig) -> BoardView {
    let outline = board
        .topics
        .iter()
        .enumerate()
        .map(|(topic_index, topic)| TopicRow {
            id: topic.id,
            serial: topic_serial(topic_index),
            text: topic.text.clone(),
            subtopics: topic
                .subtopics
                .iter()
                .enumerate()
                .map(|(subtopic_index, subtopic)| SubtopicRow {
                    id: subtopic.id,
                    serial: subtopic_serial(topic_index, subtopic_index),
                    text: subtopic.text.clone(),
                    column: subtopic.column,
                })
                .collect(),
            add_subtopic: ViewAction::AddSubtopic { topic_id: topic.id },
        })
        .collect::<Vec<_>>();

    let matrix = config
        .buckets
        .iter()
        .filter(|bucket| bucket.column.is_assigned())
        .map(|bucket| {
            let column = bucket.column;
            MatrixColumnView {
                column,
                title: bucket.title.clone(),
                cards: outline
                    .iter()
                    .flat_map(move |row| {
                        row.subtopics
                            .iter()
                            .filter(move |subtopic| subtopic.column == column)
                            .map(move |subtopic| TaskCard {
                                subtopic_id: subtopic.id,
                                topic_id: row.id,
                                text: subtopic.text.clone(),
                                origin: format!("From: {}", row.text),
                                path: format!("{} ({})", row.text, subtopic.serial),
                            })
                    })
                    .collect(),
            }
        })
        .collect();

    let recycle_bin = board
        .recycle_bin
        .iter()
        .map(|entry| RecycleRow {
            entry_id: entry.id(),
            label: entry.label(),
            restore: ViewAction::Restore {
                entry_id: entry.id(),
            },
        })
        .collect();

    BoardView {
        outline,
        matrix,
        recycle_bin,
    }
}

impl Display for BoardView {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "== Topics ==")?;
        if self.outline.is_empty() {
            writeln!(f, "  (none)")?;
        }
        for row in &self.outline {
            writeln!(f, "{}. {}", row.serial, row.text)?;
            for subtopic in &row.subtopics {
                writeln!(
                    f,
                    "    {} {} [{}]",
                    subtopic.serial, subtopic.text, subtopic.column
                )?;
            }
        }

        writeln!(f, "== Priority matrix ==")?;
        for column in &self.matrix {
            writeln!(f, "[{}]", column.title)?;
            for card in &column.cards {
                writeln!(f, "  - {} ({})", card.text, card.origin)?;
            }
        }

        writeln!(f, "== Recycle bin ==")?;
        if self.recycle_bin.is_empty() {
            writeln!(f, "  (empty)")?;
        }
        for row in &self.recycle_bin {
            writeln!(f, "  {}", row.label)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::render;
    use crate::config::{BoardConfig, BucketConfig};
    use crate::model::board::{Board, Column, Subtopic, Topic};

    #[test]
    fn unassigned_subtopics_stay_out_of_matrix() {
        let mut topic = Topic::new("Chores");
        let idle = Subtopic::new("Someday", Column::Unassigned);
        topic.subtopics.push(idle.clone());
        let board = Board {
            topics: vec![topic],
            recycle_bin: Vec::new(),
        };

        let view = render(&board, &BoardConfig::default());
        assert_eq!(view.outline[0].subtopics[0].serial, "1.1");
        assert!(!view.matrix_contains(idle.id));
    }

    #[test]
    fn matrix_follows_config_order() {
        let config = BoardConfig {
            buckets: vec![
                BucketConfig::new(Column::SpecificDate, "Later"),
                BucketConfig::new(Column::TodayLazy, "Now"),
            ],
            ..BoardConfig::default()
        };
        let view = render(&Board::default(), &config);
        let titles = view.matrix.iter().map(|c| c.title.as_str()).collect::<Vec<_>>();
        assert_eq!(titles, vec!["Later", "Now"]);
        assert!(view.cards_in(Column::TodayNotLazy).is_empty());
    }

    #[test]
    fn text_rendering_lists_all_regions() {
        let mut topic = Topic::new("Groceries");
        topic
            .subtopics
            .push(Subtopic::new("Milk", Column::TodayNotLazy));
        let board = Board {
            topics: vec![topic],
            recycle_bin: Vec::new(),
        };
        let text = render(&board, &BoardConfig::default()).to_string();
        assert!(text.contains("1. Groceries"));
        assert!(text.contains("1.1 Milk [today-not-lazy]"));
        assert!(text.contains("- Milk (From: Groceries)"));
        assert!(text.contains("(empty)"));
    }
}
