use prioboard_core::{
    render, subtopic_serial, BoardConfig, BoardError, BoardStore, Column, RecycleBinEntry,
    RestoreOutcome,
};
use std::collections::HashSet;

fn store_with_topics(names: &[&str]) -> BoardStore {
    let mut store = BoardStore::new();
    for name in names {
        store.add_topic(*name).unwrap();
    }
    store
}

#[test]
fn serials_follow_position_after_deletions() {
    let mut store = store_with_topics(&["A", "B", "C"]);
    let b = store.topics()[1].id;
    let c = store.topics()[2].id;
    store.add_subtopic(c, "c1", Column::Unassigned).unwrap();
    let c2 = store.add_subtopic(c, "c2", Column::TodayLazy).unwrap();
    store.add_subtopic(c, "c3", Column::TodayLazy).unwrap();

    store.delete_topic(b).unwrap();
    store.delete_subtopic(c, c2).unwrap();

    let view = render(store.board(), &BoardConfig::default());
    let serials = view.outline.iter().map(|row| row.serial).collect::<Vec<_>>();
    assert_eq!(serials, vec![1, 2]);
    let c_row = &view.outline[1];
    assert_eq!(c_row.text, "C");
    let sub_serials = c_row
        .subtopics
        .iter()
        .map(|row| row.serial.clone())
        .collect::<Vec<_>>();
    assert_eq!(sub_serials, vec![subtopic_serial(1, 0), subtopic_serial(1, 1)]);
    assert_eq!(sub_serials, vec!["2.1", "2.2"]);
}

#[test]
fn delete_topic_moves_whole_subtree_into_bin() {
    let mut store = store_with_topics(&["Groceries"]);
    let topic_id = store.topics()[0].id;
    let milk = store
        .add_subtopic(topic_id, "Milk", Column::TodayNotLazy)
        .unwrap();
    let bread = store
        .add_subtopic(topic_id, "Bread", Column::TomorrowLazy)
        .unwrap();

    store.delete_topic(topic_id).unwrap();

    assert!(store.topics().is_empty());
    assert!(store.find_subtopic(milk).is_none());
    let view = render(store.board(), &BoardConfig::default());
    assert!(!view.matrix_contains(milk));
    assert!(!view.matrix_contains(bread));
    match store.recycle_bin() {
        [RecycleBinEntry::Topic(topic)] => {
            assert_eq!(topic.id, topic_id);
            assert_eq!(topic.subtopics.len(), 2);
        }
        other => panic!("unexpected recycle bin: {other:?}"),
    }
}

#[test]
fn restore_subtopic_returns_to_existing_parent() {
    let mut store = store_with_topics(&["First", "Second"]);
    let second = store.topics()[1].id;
    let keep = store.add_subtopic(second, "keep", Column::Unassigned).unwrap();
    let gone = store.add_subtopic(second, "gone", Column::SpecificDate).unwrap();

    store.delete_subtopic(second, gone).unwrap();
    let outcome = store.restore(gone).unwrap();

    assert_eq!(outcome, RestoreOutcome::Restored);
    let topic = store.topic(second).unwrap();
    let ids = topic.subtopics.iter().map(|s| s.id).collect::<Vec<_>>();
    assert_eq!(ids, vec![keep, gone]);
    assert_eq!(topic.subtopics[1].column, Column::SpecificDate);
    assert!(store.recycle_bin().is_empty());
    assert!(store.topic(store.topics()[0].id).unwrap().subtopics.is_empty());
}

#[test]
fn restore_orphan_promotes_exactly_one_empty_topic() {
    let mut store = store_with_topics(&["Parent", "Other"]);
    let parent = store.topics()[0].id;
    let orphan = store
        .add_subtopic(parent, "Call plumber", Column::TodayLazy)
        .unwrap();
    store.delete_subtopic(parent, orphan).unwrap();
    store.delete_topic(parent).unwrap();
    let before = store.topics().len();

    let outcome = store.restore(orphan).unwrap();

    assert!(matches!(outcome, RestoreOutcome::PromotedOrphan(_)));
    assert_eq!(store.topics().len(), before + 1);
    let promoted = store.topics().last().unwrap();
    assert_eq!(promoted.text, "Call plumber");
    assert!(promoted.subtopics.is_empty());
    // Parent topic stays in the bin.
    assert_eq!(store.recycle_bin().len(), 1);
}

#[test]
fn restore_unknown_entry_is_rejected() {
    let mut store = store_with_topics(&["A"]);
    let unknown = uuid::Uuid::new_v4();
    assert_eq!(store.restore(unknown), Err(BoardError::EntryNotFound(unknown)));
}

#[test]
fn moves_are_pure_permutations() {
    let mut store = store_with_topics(&["A", "B", "C", "D"]);
    let before = store.topics().iter().map(|t| t.id).collect::<HashSet<_>>();

    store.move_topic(0, 3).unwrap();
    store.move_topic(2, 0).unwrap();

    let after = store.topics().iter().map(|t| t.id).collect::<HashSet<_>>();
    assert_eq!(before, after);
    let names = store
        .topics()
        .iter()
        .map(|t| t.text.as_str())
        .collect::<Vec<_>>();
    assert_eq!(names, vec!["D", "B", "C", "A"]);

    let parent = store.topics()[0].id;
    for name in ["x", "y", "z"] {
        store.add_subtopic(parent, name, Column::Unassigned).unwrap();
    }
    store.move_subtopic(parent, 2, 0).unwrap();
    let subs = store
        .topic(parent)
        .unwrap()
        .subtopics
        .iter()
        .map(|s| s.text.as_str())
        .collect::<Vec<_>>();
    assert_eq!(subs, vec!["z", "x", "y"]);
}

#[test]
fn set_topic_position_validates_range() {
    let mut store = store_with_topics(&["A", "B"]);
    let a = store.topics()[0].id;

    assert_eq!(
        store.set_topic_position(a, 99),
        Err(BoardError::PositionOutOfRange { position: 99, max: 2 })
    );
    assert_eq!(
        store.set_topic_position(a, 0),
        Err(BoardError::PositionOutOfRange { position: 0, max: 2 })
    );
    assert_eq!(store.topics()[0].id, a);

    store.set_topic_position(a, 2).unwrap();
    assert_eq!(store.topics()[1].id, a);
}

#[test]
fn set_subtopic_column_reassigns_bucket() {
    let mut store = store_with_topics(&["A"]);
    let topic_id = store.topics()[0].id;
    let sub = store.add_subtopic(topic_id, "s", Column::Unassigned).unwrap();

    store.set_subtopic_column(sub, Column::TomorrowNotLazy).unwrap();
    let (_, subtopic) = store.find_subtopic(sub).unwrap();
    assert_eq!(subtopic.column, Column::TomorrowNotLazy);

    let missing = uuid::Uuid::new_v4();
    assert_eq!(
        store.set_subtopic_column(missing, Column::TodayLazy),
        Err(BoardError::SubtopicNotFound(missing))
    );
}

#[test]
fn update_text_trims_topics_and_subtopics() {
    let mut store = store_with_topics(&["A"]);
    let topic_id = store.topics()[0].id;
    let sub = store.add_subtopic(topic_id, "s", Column::Unassigned).unwrap();

    store.update_text(topic_id, "  Renamed  ").unwrap();
    store.update_text(sub, " sub ").unwrap();

    assert_eq!(store.topic(topic_id).unwrap().text, "Renamed");
    assert_eq!(store.find_subtopic(sub).unwrap().1.text, "sub");
    let missing = uuid::Uuid::new_v4();
    assert_eq!(
        store.update_text(missing, "x"),
        Err(BoardError::EntityNotFound(missing))
    );
}
