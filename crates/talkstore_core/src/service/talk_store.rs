//! The talk catalog store.
//!
//! # Responsibility
//! - Own the SQLite connections for one catalog and expose every catalog
//!   operation as a single atomic unit of work.
//! - Compose the repositories inside transactions so cascades and
//!   upserts never become visible half-applied.
//!
//! # Invariants
//! - All writes go through one writer connection, each in an `IMMEDIATE`
//!   transaction that either commits fully or rolls back on drop.
//! - File stores serve reads from pooled read-only connections (WAL), so
//!   reads never wait on other reads. In-memory stores read through the
//!   writer connection.
//! - A `TalkStore` is built once at the application root and shared by
//!   reference; it is `Send + Sync`.

use crate::db::{open_db, open_db_in_memory, open_db_read_only, DbResult};
use crate::model::catalog::{Speaker, SpeakerId, Topic, TopicId};
use crate::model::review::{Review, ReviewId};
use crate::model::speech::{NewSpeech, Speech, SpeechId};
use crate::repo::catalog_repo::{CatalogRepository, SqliteCatalogRepository};
use crate::repo::review_repo::{ReviewFilter, ReviewRepository, SqliteReviewRepository};
use crate::repo::speech_repo::{SpeechFilter, SpeechRepository, SqliteSpeechRepository};
use crate::repo::{RepoError, RepoResult};
use log::{debug, warn};
use rusqlite::{Connection, Transaction, TransactionBehavior};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Instant;

const MAX_IDLE_READERS: usize = 4;

/// Shared handle to one talk catalog.
pub struct TalkStore {
    writer: Mutex<Connection>,
    /// `None` for in-memory stores.
    path: Option<PathBuf>,
    idle_readers: Mutex<Vec<Connection>>,
}

impl TalkStore {
    /// Opens the catalog at `path`, creating file and schema when missing.
    ///
    /// # Errors
    /// - Returns [`crate::db::DbError`] when the store cannot be opened or
    ///   created, or was written by a newer schema version.
    pub fn open(path: impl AsRef<Path>) -> DbResult<Self> {
        let path = path.as_ref();
        let writer = open_db(path)?;
        // `:memory:` and memory URIs give every connection its own database.
        let path = writer
            .path()
            .filter(|file| !file.is_empty())
            .map(|_| path.to_path_buf());
        Ok(Self {
            writer: Mutex::new(writer),
            path,
            idle_readers: Mutex::new(Vec::new()),
        })
    }

    /// Opens a private in-memory catalog.
    pub fn open_in_memory() -> DbResult<Self> {
        let writer = open_db_in_memory()?;
        Ok(Self {
            writer: Mutex::new(writer),
            path: None,
            idle_readers: Mutex::new(Vec::new()),
        })
    }

    /// Location of the backing file, `None` for in-memory stores.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Returns the speaker named `name`, creating it when missing.
    pub fn insert_speaker(&self, name: &str) -> RepoResult<Speaker> {
        self.write("insert_speaker", |tx| {
            SqliteCatalogRepository::new(tx).upsert_speaker(name)
        })
    }

    pub fn get_speaker_by_id(&self, id: SpeakerId) -> RepoResult<Option<Speaker>> {
        self.read(|conn| SqliteCatalogRepository::new(conn).get_speaker(id))
    }

    pub fn get_speaker_by_name(&self, name: &str) -> RepoResult<Option<Speaker>> {
        self.read(|conn| SqliteCatalogRepository::new(conn).find_speaker(name))
    }

    /// All speakers in insertion order.
    pub fn get_all_speakers(&self) -> RepoResult<Vec<Speaker>> {
        self.read(|conn| SqliteCatalogRepository::new(conn).list_speakers())
    }

    /// Deletes a speaker, its speeches, and their reviews.
    ///
    /// Returns [`RepoError::NotFound`] and changes nothing when `id` is unknown.
    pub fn delete_speaker(&self, id: SpeakerId) -> RepoResult<()> {
        self.write("delete_speaker", |tx| {
            SqliteCatalogRepository::new(tx).delete_speaker(id)
        })
    }

    /// Returns the topic named `name`, creating it when missing.
    pub fn insert_topic(&self, name: &str) -> RepoResult<Topic> {
        self.write("insert_topic", |tx| {
            SqliteCatalogRepository::new(tx).upsert_topic(name)
        })
    }

    pub fn get_topic_by_id(&self, id: TopicId) -> RepoResult<Option<Topic>> {
        self.read(|conn| SqliteCatalogRepository::new(conn).get_topic(id))
    }

    pub fn get_topic_by_name(&self, name: &str) -> RepoResult<Option<Topic>> {
        self.read(|conn| SqliteCatalogRepository::new(conn).find_topic(name))
    }

    /// All topics in insertion order.
    pub fn get_all_topics(&self) -> RepoResult<Vec<Topic>> {
        self.read(|conn| SqliteCatalogRepository::new(conn).list_topics())
    }

    /// Deletes a topic, its speeches, and their reviews.
    ///
    /// Returns [`RepoError::NotFound`] and changes nothing when `id` is unknown.
    pub fn delete_topic(&self, id: TopicId) -> RepoResult<()> {
        self.write("delete_topic", |tx| {
            SqliteCatalogRepository::new(tx).delete_topic(id)
        })
    }

    /// Inserts a speech, creating its topic and speaker by name if needed.
    ///
    /// Returns the joined record as stored. Topic/speaker creation and the
    /// speech row commit together or not at all.
    pub fn insert_speech(&self, speech: &NewSpeech) -> RepoResult<Speech> {
        self.write("insert_speech", |tx| {
            speech.validate()?;

            let catalog = SqliteCatalogRepository::new(tx);
            let topic = catalog.upsert_topic(&speech.topic)?;
            let speaker = catalog.upsert_speaker(&speech.speaker)?;

            let speeches = SqliteSpeechRepository::new(tx);
            let speech_id = speeches.create_speech(speech, topic.topic_id, speaker.speaker_id)?;
            speeches.get_speech(speech_id)?.ok_or_else(|| {
                RepoError::InvalidData(format!("speech {speech_id} missing after insert"))
            })
        })
    }

    pub fn get_speech_by_id(&self, id: SpeechId) -> RepoResult<Option<Speech>> {
        self.read(|conn| SqliteSpeechRepository::new(conn).get_speech(id))
    }

    /// All speeches in insertion order.
    pub fn get_all_speeches(&self) -> RepoResult<Vec<Speech>> {
        self.read(|conn| SqliteSpeechRepository::new(conn).list_speeches(SpeechFilter::All))
    }

    /// Speeches given by one speaker; empty when the speaker is unknown.
    pub fn get_speeches_by_speaker(&self, speaker_id: SpeakerId) -> RepoResult<Vec<Speech>> {
        self.read(|conn| {
            SqliteSpeechRepository::new(conn).list_speeches(SpeechFilter::BySpeaker(speaker_id))
        })
    }

    /// Speeches filed under one topic; empty when the topic is unknown.
    pub fn get_speeches_by_topic(&self, topic_id: TopicId) -> RepoResult<Vec<Speech>> {
        self.read(|conn| {
            SqliteSpeechRepository::new(conn).list_speeches(SpeechFilter::ByTopic(topic_id))
        })
    }

    /// Deletes a speech and its reviews.
    ///
    /// Returns [`RepoError::NotFound`] and changes nothing when `id` is unknown.
    pub fn delete_speech(&self, id: SpeechId) -> RepoResult<()> {
        self.write("delete_speech", |tx| {
            SqliteSpeechRepository::new(tx).delete_speech(id)
        })
    }

    /// Adds a review to an existing speech.
    ///
    /// # Errors
    /// - [`RepoError::IntegrityViolation`] when `speech_id` does not exist;
    ///   nothing is written in that case.
    pub fn insert_review(&self, content: &str, speech_id: SpeechId) -> RepoResult<Review> {
        self.write("insert_review", |tx| {
            let reviews = SqliteReviewRepository::new(tx);
            let review_id = reviews.create_review(content, speech_id)?;
            reviews.get_review(review_id)?.ok_or_else(|| {
                RepoError::InvalidData(format!("review {review_id} missing after insert"))
            })
        })
    }

    pub fn get_review_by_id(&self, id: ReviewId) -> RepoResult<Option<Review>> {
        self.read(|conn| SqliteReviewRepository::new(conn).get_review(id))
    }

    /// All reviews in insertion order.
    pub fn get_all_reviews(&self) -> RepoResult<Vec<Review>> {
        self.read(|conn| SqliteReviewRepository::new(conn).list_reviews(ReviewFilter::All))
    }

    /// Reviews of one speech; empty when the speech is unknown.
    pub fn get_reviews_by_speech(&self, speech_id: SpeechId) -> RepoResult<Vec<Review>> {
        self.read(|conn| {
            SqliteReviewRepository::new(conn).list_reviews(ReviewFilter::BySpeech(speech_id))
        })
    }

    /// Deletes one review.
    ///
    /// Returns [`RepoError::NotFound`] when `id` is unknown.
    pub fn delete_review(&self, id: ReviewId) -> RepoResult<()> {
        self.write("delete_review", |tx| {
            SqliteReviewRepository::new(tx).delete_review(id)
        })
    }

    fn write<T>(
        &self,
        op: &'static str,
        work: impl FnOnce(&Transaction<'_>) -> RepoResult<T>,
    ) -> RepoResult<T> {
        let started_at = Instant::now();
        let mut conn = self.lock_writer();
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

        // Dropping `tx` on the error path rolls the whole operation back.
        let result = work(&tx).and_then(|value| {
            tx.commit()?;
            Ok(value)
        });

        match &result {
            Ok(_) => debug!(
                "event=store_write module=store status=ok op={} duration_ms={}",
                op,
                started_at.elapsed().as_millis()
            ),
            Err(err) => warn!(
                "event=store_write module=store status=error op={} duration_ms={} error={}",
                op,
                started_at.elapsed().as_millis(),
                err
            ),
        }
        result
    }

    fn read<T>(&self, work: impl FnOnce(&Connection) -> RepoResult<T>) -> RepoResult<T> {
        let Some(path) = self.path.as_deref() else {
            let conn = self.lock_writer();
            return work(&conn);
        };

        let reader = match self.take_idle_reader() {
            Some(conn) => conn,
            None => open_db_read_only(path)?,
        };
        let result = work(&reader);
        self.return_reader(reader);
        result
    }

    fn lock_writer(&self) -> MutexGuard<'_, Connection> {
        // A panic mid-operation leaves at most an uncommitted transaction,
        // which SQLite rolls back; the connection itself stays usable.
        self.writer.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn take_idle_reader(&self) -> Option<Connection> {
        self.idle_readers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop()
    }

    fn return_reader(&self, reader: Connection) {
        let mut idle = self
            .idle_readers
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if idle.len() < MAX_IDLE_READERS {
            idle.push(reader);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::TalkStore;

    fn assert_send_sync<T: Send + Sync>() {}

    #[test]
    fn talk_store_is_shareable_across_threads() {
        assert_send_sync::<TalkStore>();
    }

    #[test]
    fn in_memory_store_has_no_path() {
        let store = TalkStore::open_in_memory().expect("in-memory store should open");
        assert!(store.path().is_none());
    }
}
