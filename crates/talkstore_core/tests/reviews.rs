use chrono::NaiveDate;
use talkstore_core::{EntityKind, NewSpeech, RepoError, Speech, TalkStore};

fn insert_speech(store: &TalkStore, title: &str) -> Speech {
    store
        .insert_speech(&NewSpeech::new(
            title,
            1070,
            1_811_102,
            NaiveDate::from_ymd_opt(2016, 5, 19).unwrap(),
            "activism",
            "Speaker A",
        ))
        .unwrap()
}

#[test]
fn review_lifecycle_follows_its_speech() {
    let store = TalkStore::open_in_memory().unwrap();
    let speech = insert_speech(&store, "Title A");

    let review = store.insert_review("Great talk", speech.speech_id).unwrap();
    assert_eq!(review.review_id, 1);
    assert_eq!(review.speech_id, 1);
    assert_eq!(review.speech_title, "Title A");
    assert_eq!(review.content, "Great talk");

    assert_eq!(store.get_reviews_by_speech(1).unwrap(), vec![review.clone()]);
    assert_eq!(store.get_review_by_id(1).unwrap(), Some(review));

    store.delete_speech(1).unwrap();
    assert_eq!(store.get_review_by_id(1).unwrap(), None);
    assert!(store.get_all_reviews().unwrap().is_empty());
}

#[test]
fn review_for_unknown_speech_is_an_integrity_violation() {
    let store = TalkStore::open_in_memory().unwrap();
    let speech = insert_speech(&store, "Title A");

    match store.insert_review("Orphan", 404) {
        Err(RepoError::IntegrityViolation { entity, id }) => {
            assert_eq!(entity, EntityKind::Speech);
            assert_eq!(id, 404);
        }
        other => panic!("unexpected result: {other:?}"),
    }

    assert!(store.get_all_reviews().unwrap().is_empty());
    assert!(store.get_reviews_by_speech(speech.speech_id).unwrap().is_empty());
    assert!(store.get_reviews_by_speech(404).unwrap().is_empty());
}

#[test]
fn reviews_are_listed_per_speech_in_insertion_order() {
    let store = TalkStore::open_in_memory().unwrap();
    let first = insert_speech(&store, "First");
    let second = insert_speech(&store, "Second");

    let r1 = store.insert_review("one", first.speech_id).unwrap();
    let r2 = store.insert_review("two", second.speech_id).unwrap();
    let r3 = store.insert_review("three", first.speech_id).unwrap();

    assert_eq!(
        store.get_reviews_by_speech(first.speech_id).unwrap(),
        vec![r1.clone(), r3.clone()]
    );
    assert_eq!(store.get_all_reviews().unwrap(), vec![r1, r2, r3]);
}

#[test]
fn delete_review_removes_only_that_review() {
    let store = TalkStore::open_in_memory().unwrap();
    let speech = insert_speech(&store, "Title A");
    let kept = store.insert_review("kept", speech.speech_id).unwrap();
    let gone = store.insert_review("gone", speech.speech_id).unwrap();

    store.delete_review(gone.review_id).unwrap();

    assert_eq!(store.get_all_reviews().unwrap(), vec![kept]);
    assert!(store.get_speech_by_id(speech.speech_id).unwrap().is_some());
    assert!(matches!(
        store.delete_review(gone.review_id),
        Err(RepoError::NotFound {
            entity: EntityKind::Review,
            ..
        })
    ));
}

#[test]
fn review_serializes_with_speech_title() {
    let store = TalkStore::open_in_memory().unwrap();
    let speech = insert_speech(&store, "Title A");
    let review = store.insert_review("Great talk", speech.speech_id).unwrap();

    assert_eq!(
        serde_json::to_value(&review).unwrap(),
        serde_json::json!({
            "review_id": 1,
            "content": "Great talk",
            "speech_id": 1,
            "speech_title": "Title A"
        })
    );
}
