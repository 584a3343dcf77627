//! Review repository contracts and SQLite implementation.
//!
//! # Invariants
//! - A review is only written when its speech exists; otherwise the insert
//!   fails with `RepoError::IntegrityViolation` and nothing is written.
//! - Reads join the speech to expose `speech_title`.
//! - Lists are ordered by `review_id ASC`.

use crate::model::catalog::EntityKind;
use crate::model::review::{Review, ReviewId};
use crate::model::speech::SpeechId;
use crate::repo::speech_repo::row_exists;
use crate::repo::{RepoError, RepoResult};
use rusqlite::{params, Connection, Row};

const REVIEW_SELECT_SQL: &str = "SELECT
    review.review_id AS review_id,
    review.content AS content,
    speech.speech_id AS speech_id,
    speech.title AS speech_title
FROM review
JOIN speech ON speech.speech_id = review.speech_id";

/// Which reviews a list query returns.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ReviewFilter {
    #[default]
    All,
    BySpeech(SpeechId),
}

/// Repository interface for reviews.
pub trait ReviewRepository {
    fn create_review(&self, content: &str, speech_id: SpeechId) -> RepoResult<ReviewId>;
    fn get_review(&self, id: ReviewId) -> RepoResult<Option<Review>>;
    fn list_reviews(&self, filter: ReviewFilter) -> RepoResult<Vec<Review>>;
    fn delete_review(&self, id: ReviewId) -> RepoResult<()>;
}

/// SQLite-backed review repository.
pub struct SqliteReviewRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteReviewRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl ReviewRepository for SqliteReviewRepository<'_> {
    fn create_review(&self, content: &str, speech_id: SpeechId) -> RepoResult<ReviewId> {
        if !row_exists(
            self.conn,
            "SELECT EXISTS(SELECT 1 FROM speech WHERE speech_id = ?1);",
            speech_id,
        )? {
            return Err(RepoError::IntegrityViolation {
                entity: EntityKind::Speech,
                id: speech_id,
            });
        }

        self.conn.execute(
            "INSERT INTO review (content, speech_id) VALUES (?1, ?2);",
            params![content, speech_id],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    fn get_review(&self, id: ReviewId) -> RepoResult<Option<Review>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{REVIEW_SELECT_SQL} WHERE review.review_id = ?1;"))?;

        let mut rows = stmt.query([id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_review_row(row)?));
        }

        Ok(None)
    }

    fn list_reviews(&self, filter: ReviewFilter) -> RepoResult<Vec<Review>> {
        let mut reviews = Vec::new();
        match filter {
            ReviewFilter::All => {
                let mut stmt = self
                    .conn
                    .prepare(&format!("{REVIEW_SELECT_SQL} ORDER BY review.review_id ASC;"))?;
                let mut rows = stmt.query([])?;
                while let Some(row) = rows.next()? {
                    reviews.push(parse_review_row(row)?);
                }
            }
            ReviewFilter::BySpeech(speech_id) => {
                let mut stmt = self.conn.prepare(&format!(
                    "{REVIEW_SELECT_SQL}
                     WHERE review.speech_id = ?1
                     ORDER BY review.review_id ASC;"
                ))?;
                let mut rows = stmt.query([speech_id])?;
                while let Some(row) = rows.next()? {
                    reviews.push(parse_review_row(row)?);
                }
            }
        }

        Ok(reviews)
    }

    fn delete_review(&self, id: ReviewId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM review WHERE review_id = ?1;", [id])?;

        if changed == 0 {
            return Err(RepoError::NotFound {
                entity: EntityKind::Review,
                id,
            });
        }

        Ok(())
    }
}

fn parse_review_row(row: &Row<'_>) -> RepoResult<Review> {
    Ok(Review {
        review_id: row.get("review_id")?,
        content: row.get("content")?,
        speech_id: row.get("speech_id")?,
        speech_title: row.get("speech_title")?,
    })
}
