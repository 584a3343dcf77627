//! Speech repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Insert speeches against already-resolved topic/speaker ids.
//! - Serve joined speech reads (speech + topic name + speaker name).
//! - Delete a speech together with its reviews.
//!
//! # Invariants
//! - Every read is an inner join, so a returned speech always has a topic
//!   and a speaker.
//! - Lists are ordered by `speech_id ASC` (insertion order).

use crate::model::catalog::{EntityKind, SpeakerId, TopicId};
use crate::model::speech::{NewSpeech, Speech, SpeechId, DATE_FORMAT};
use crate::repo::{RepoError, RepoResult};
use chrono::NaiveDate;
use rusqlite::{params, Connection, Row};

const SPEECH_SELECT_SQL: &str = "SELECT
    speech.speech_id AS speech_id,
    speech.title AS title,
    speech.duration AS duration,
    speech.views AS views,
    speech.date AS date,
    topic.topic_id AS topic_id,
    topic.topic AS topic,
    speaker.speaker_id AS speaker_id,
    speaker.speaker AS speaker
FROM speech
JOIN topic ON topic.topic_id = speech.topic_id
JOIN speaker ON speaker.speaker_id = speech.speaker_id";

/// Which speeches a list query returns.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SpeechFilter {
    #[default]
    All,
    BySpeaker(SpeakerId),
    ByTopic(TopicId),
}

/// Repository interface for speeches.
pub trait SpeechRepository {
    /// Inserts a speech row. The topic and speaker must already exist and
    /// `speech` must already be validated.
    fn create_speech(
        &self,
        speech: &NewSpeech,
        topic_id: TopicId,
        speaker_id: SpeakerId,
    ) -> RepoResult<SpeechId>;
    fn get_speech(&self, id: SpeechId) -> RepoResult<Option<Speech>>;
    fn list_speeches(&self, filter: SpeechFilter) -> RepoResult<Vec<Speech>>;
    fn speech_exists(&self, id: SpeechId) -> RepoResult<bool>;
    /// Deletes a speech and its reviews.
    fn delete_speech(&self, id: SpeechId) -> RepoResult<()>;
}

/// SQLite-backed speech repository.
pub struct SqliteSpeechRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteSpeechRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl SpeechRepository for SqliteSpeechRepository<'_> {
    fn create_speech(
        &self,
        speech: &NewSpeech,
        topic_id: TopicId,
        speaker_id: SpeakerId,
    ) -> RepoResult<SpeechId> {
        if !row_exists(
            self.conn,
            "SELECT EXISTS(SELECT 1 FROM topic WHERE topic_id = ?1);",
            topic_id,
        )? {
            return Err(RepoError::IntegrityViolation {
                entity: EntityKind::Topic,
                id: topic_id,
            });
        }
        if !row_exists(
            self.conn,
            "SELECT EXISTS(SELECT 1 FROM speaker WHERE speaker_id = ?1);",
            speaker_id,
        )? {
            return Err(RepoError::IntegrityViolation {
                entity: EntityKind::Speaker,
                id: speaker_id,
            });
        }

        self.conn.execute(
            "INSERT INTO speech (
                title,
                duration,
                views,
                date,
                topic_id,
                speaker_id
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6);",
            params![
                speech.title.as_str(),
                speech.duration,
                speech.views,
                speech.date.format(DATE_FORMAT).to_string(),
                topic_id,
                speaker_id,
            ],
        )?;

        Ok(self.conn.last_insert_rowid())
    }

    fn get_speech(&self, id: SpeechId) -> RepoResult<Option<Speech>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{SPEECH_SELECT_SQL} WHERE speech.speech_id = ?1;"))?;

        let mut rows = stmt.query([id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_speech_row(row)?));
        }

        Ok(None)
    }

    fn list_speeches(&self, filter: SpeechFilter) -> RepoResult<Vec<Speech>> {
        let (condition, bind) = match filter {
            SpeechFilter::All => ("1 = 1", None),
            SpeechFilter::BySpeaker(id) => ("speech.speaker_id = ?1", Some(id)),
            SpeechFilter::ByTopic(id) => ("speech.topic_id = ?1", Some(id)),
        };

        let mut stmt = self.conn.prepare(&format!(
            "{SPEECH_SELECT_SQL} WHERE {condition} ORDER BY speech.speech_id ASC;"
        ))?;
        let mut rows = match bind {
            Some(id) => stmt.query([id])?,
            None => stmt.query([])?,
        };

        let mut speeches = Vec::new();
        while let Some(row) = rows.next()? {
            speeches.push(parse_speech_row(row)?);
        }

        Ok(speeches)
    }

    fn speech_exists(&self, id: SpeechId) -> RepoResult<bool> {
        row_exists(
            self.conn,
            "SELECT EXISTS(SELECT 1 FROM speech WHERE speech_id = ?1);",
            id,
        )
    }

    fn delete_speech(&self, id: SpeechId) -> RepoResult<()> {
        if !self.speech_exists(id)? {
            return Err(RepoError::NotFound {
                entity: EntityKind::Speech,
                id,
            });
        }

        self.conn
            .execute("DELETE FROM review WHERE speech_id = ?1;", [id])?;
        self.conn
            .execute("DELETE FROM speech WHERE speech_id = ?1;", [id])?;
        Ok(())
    }
}

pub(crate) fn row_exists(conn: &Connection, sql: &str, id: i64) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(sql, [id], |row| row.get(0))?;
    Ok(exists == 1)
}

fn parse_speech_row(row: &Row<'_>) -> RepoResult<Speech> {
    let date_text: String = row.get("date")?;
    let date = NaiveDate::parse_from_str(&date_text, DATE_FORMAT).map_err(|_| {
        RepoError::InvalidData(format!("invalid date value `{date_text}` in speech.date"))
    })?;

    Ok(Speech {
        speech_id: row.get("speech_id")?,
        title: row.get("title")?,
        duration: row.get("duration")?,
        views: row.get("views")?,
        date,
        topic_id: row.get("topic_id")?,
        topic_name: row.get("topic")?,
        speaker_id: row.get("speaker_id")?,
        speaker_name: row.get("speaker")?,
    })
}
