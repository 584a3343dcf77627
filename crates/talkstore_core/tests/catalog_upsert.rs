use talkstore_core::{EntityKind, RepoError, TalkStore, ValidationError};

#[test]
fn insert_speaker_is_idempotent_by_name() {
    let store = TalkStore::open_in_memory().unwrap();

    let first = store.insert_speaker("Speaker A").unwrap();
    let second = store.insert_speaker("Speaker A").unwrap();

    assert_eq!(first, second);
    assert_eq!(first.speaker_id, 1);
    assert_eq!(store.get_all_speakers().unwrap(), vec![first]);
}

#[test]
fn insert_topic_is_idempotent_by_name() {
    let store = TalkStore::open_in_memory().unwrap();

    let first = store.insert_topic("activism").unwrap();
    let other = store.insert_topic("science").unwrap();
    let again = store.insert_topic("activism").unwrap();

    assert_eq!(first.topic_id, again.topic_id);
    assert_ne!(first.topic_id, other.topic_id);
    assert_eq!(store.get_all_topics().unwrap().len(), 2);
}

#[test]
fn lookups_return_none_for_unknown_rows() {
    let store = TalkStore::open_in_memory().unwrap();
    store.insert_speaker("Speaker A").unwrap();

    assert_eq!(store.get_speaker_by_id(42).unwrap(), None);
    assert_eq!(store.get_speaker_by_name("Nobody").unwrap(), None);
    assert_eq!(store.get_topic_by_id(1).unwrap(), None);
    assert_eq!(store.get_topic_by_name("activism").unwrap(), None);
}

#[test]
fn lookups_by_name_and_id_agree() {
    let store = TalkStore::open_in_memory().unwrap();
    let topic = store.insert_topic("design").unwrap();

    assert_eq!(store.get_topic_by_name("design").unwrap(), Some(topic.clone()));
    assert_eq!(store.get_topic_by_id(topic.topic_id).unwrap(), Some(topic));
}

#[test]
fn names_are_matched_exactly() {
    let store = TalkStore::open_in_memory().unwrap();
    let lower = store.insert_speaker("speaker a").unwrap();
    let upper = store.insert_speaker("Speaker A").unwrap();

    assert_ne!(lower.speaker_id, upper.speaker_id);
}

#[test]
fn lists_are_in_insertion_order() {
    let store = TalkStore::open_in_memory().unwrap();
    for name in ["zeta", "alpha", "mu"] {
        store.insert_topic(name).unwrap();
    }

    let names: Vec<String> = store
        .get_all_topics()
        .unwrap()
        .into_iter()
        .map(|topic| topic.name)
        .collect();
    assert_eq!(names, vec!["zeta", "alpha", "mu"]);
}

#[test]
fn blank_names_are_rejected() {
    let store = TalkStore::open_in_memory().unwrap();

    match store.insert_speaker("   ") {
        Err(RepoError::Validation(ValidationError::BlankName(EntityKind::Speaker))) => {}
        other => panic!("unexpected result: {other:?}"),
    }
    match store.insert_topic("") {
        Err(RepoError::Validation(ValidationError::BlankName(EntityKind::Topic))) => {}
        other => panic!("unexpected result: {other:?}"),
    }
    assert!(store.get_all_speakers().unwrap().is_empty());
}

#[test]
fn deleting_unknown_speaker_or_topic_reports_not_found() {
    let store = TalkStore::open_in_memory().unwrap();
    store.insert_speaker("Speaker A").unwrap();

    match store.delete_speaker(99) {
        Err(RepoError::NotFound { entity, id }) => {
            assert_eq!(entity, EntityKind::Speaker);
            assert_eq!(id, 99);
        }
        other => panic!("unexpected result: {other:?}"),
    }
    assert!(matches!(
        store.delete_topic(7),
        Err(RepoError::NotFound {
            entity: EntityKind::Topic,
            id: 7
        })
    ));
    assert_eq!(store.get_all_speakers().unwrap().len(), 1);
}

#[test]
fn ids_are_not_reused_after_delete() {
    let store = TalkStore::open_in_memory().unwrap();
    let first = store.insert_speaker("Speaker A").unwrap();
    store.delete_speaker(first.speaker_id).unwrap();

    let second = store.insert_speaker("Speaker A").unwrap();
    assert!(second.speaker_id > first.speaker_id);
}
