//! Speaker/topic repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Upsert-by-name, lookups, and cascading deletes for the two name tables.
//!
//! # Invariants
//! - Names are unique per table; upserting an existing name returns the
//!   stored row unchanged.
//! - Deleting a speaker or topic first removes the reviews of its speeches,
//!   then the speeches, then the row itself.
//!
//! Speakers and topics share one table shape, so both run through the same
//! private helpers parameterized by a `NameTable` descriptor.

use crate::model::catalog::{EntityKind, Speaker, SpeakerId, Topic, TopicId};
use crate::model::validation::validate_name;
use crate::repo::{RepoError, RepoResult};
use rusqlite::{Connection, OptionalExtension, Row};

/// Repository interface for speakers and topics.
pub trait CatalogRepository {
    fn upsert_speaker(&self, name: &str) -> RepoResult<Speaker>;
    fn get_speaker(&self, id: SpeakerId) -> RepoResult<Option<Speaker>>;
    fn find_speaker(&self, name: &str) -> RepoResult<Option<Speaker>>;
    fn list_speakers(&self) -> RepoResult<Vec<Speaker>>;
    fn delete_speaker(&self, id: SpeakerId) -> RepoResult<()>;

    fn upsert_topic(&self, name: &str) -> RepoResult<Topic>;
    fn get_topic(&self, id: TopicId) -> RepoResult<Option<Topic>>;
    fn find_topic(&self, name: &str) -> RepoResult<Option<Topic>>;
    fn list_topics(&self) -> RepoResult<Vec<Topic>>;
    fn delete_topic(&self, id: TopicId) -> RepoResult<()>;
}

/// SQLite-backed speaker/topic repository.
pub struct SqliteCatalogRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteCatalogRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

struct NameTable {
    kind: EntityKind,
    table: &'static str,
    id_column: &'static str,
    name_column: &'static str,
}

const SPEAKERS: NameTable = NameTable {
    kind: EntityKind::Speaker,
    table: "speaker",
    id_column: "speaker_id",
    name_column: "speaker",
};

const TOPICS: NameTable = NameTable {
    kind: EntityKind::Topic,
    table: "topic",
    id_column: "topic_id",
    name_column: "topic",
};

impl CatalogRepository for SqliteCatalogRepository<'_> {
    fn upsert_speaker(&self, name: &str) -> RepoResult<Speaker> {
        let (speaker_id, name) = upsert_named(self.conn, &SPEAKERS, name)?;
        Ok(Speaker { speaker_id, name })
    }

    fn get_speaker(&self, id: SpeakerId) -> RepoResult<Option<Speaker>> {
        Ok(get_named(self.conn, &SPEAKERS, id)?
            .map(|(speaker_id, name)| Speaker { speaker_id, name }))
    }

    fn find_speaker(&self, name: &str) -> RepoResult<Option<Speaker>> {
        Ok(find_named(self.conn, &SPEAKERS, name)?
            .map(|(speaker_id, name)| Speaker { speaker_id, name }))
    }

    fn list_speakers(&self) -> RepoResult<Vec<Speaker>> {
        Ok(list_named(self.conn, &SPEAKERS)?
            .into_iter()
            .map(|(speaker_id, name)| Speaker { speaker_id, name })
            .collect())
    }

    fn delete_speaker(&self, id: SpeakerId) -> RepoResult<()> {
        delete_named(self.conn, &SPEAKERS, id)
    }

    fn upsert_topic(&self, name: &str) -> RepoResult<Topic> {
        let (topic_id, name) = upsert_named(self.conn, &TOPICS, name)?;
        Ok(Topic { topic_id, name })
    }

    fn get_topic(&self, id: TopicId) -> RepoResult<Option<Topic>> {
        Ok(get_named(self.conn, &TOPICS, id)?.map(|(topic_id, name)| Topic { topic_id, name }))
    }

    fn find_topic(&self, name: &str) -> RepoResult<Option<Topic>> {
        Ok(find_named(self.conn, &TOPICS, name)?.map(|(topic_id, name)| Topic { topic_id, name }))
    }

    fn list_topics(&self) -> RepoResult<Vec<Topic>> {
        Ok(list_named(self.conn, &TOPICS)?
            .into_iter()
            .map(|(topic_id, name)| Topic { topic_id, name })
            .collect())
    }

    fn delete_topic(&self, id: TopicId) -> RepoResult<()> {
        delete_named(self.conn, &TOPICS, id)
    }
}

fn map_named_row(row: &Row<'_>) -> rusqlite::Result<(i64, String)> {
    Ok((row.get(0)?, row.get(1)?))
}

fn upsert_named(conn: &Connection, table: &NameTable, name: &str) -> RepoResult<(i64, String)> {
    validate_name(table.kind, name)?;

    if let Some(existing) = find_named(conn, table, name)? {
        return Ok(existing);
    }

    conn.execute(
        &format!(
            "INSERT INTO {} ({}) VALUES (?1);",
            table.table, table.name_column
        ),
        [name],
    )?;
    Ok((conn.last_insert_rowid(), name.to_string()))
}

fn get_named(conn: &Connection, table: &NameTable, id: i64) -> RepoResult<Option<(i64, String)>> {
    let row = conn
        .query_row(
            &format!(
                "SELECT {id}, {name} FROM {table} WHERE {id} = ?1;",
                id = table.id_column,
                name = table.name_column,
                table = table.table
            ),
            [id],
            map_named_row,
        )
        .optional()?;
    Ok(row)
}

fn find_named(
    conn: &Connection,
    table: &NameTable,
    name: &str,
) -> RepoResult<Option<(i64, String)>> {
    let row = conn
        .query_row(
            &format!(
                "SELECT {id}, {name} FROM {table} WHERE {name} = ?1;",
                id = table.id_column,
                name = table.name_column,
                table = table.table
            ),
            [name],
            map_named_row,
        )
        .optional()?;
    Ok(row)
}

fn list_named(conn: &Connection, table: &NameTable) -> RepoResult<Vec<(i64, String)>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {id}, {name} FROM {table} ORDER BY {id} ASC;",
        id = table.id_column,
        name = table.name_column,
        table = table.table
    ))?;

    let rows = stmt.query_map([], map_named_row)?;
    let mut items = Vec::new();
    for row in rows {
        items.push(row?);
    }
    Ok(items)
}

fn delete_named(conn: &Connection, table: &NameTable, id: i64) -> RepoResult<()> {
    if get_named(conn, table, id)?.is_none() {
        return Err(RepoError::NotFound {
            entity: table.kind,
            id,
        });
    }

    // speech.<fk> uses the same column name as the parent's primary key.
    conn.execute(
        &format!(
            "DELETE FROM review
             WHERE speech_id IN (SELECT speech_id FROM speech WHERE {fk} = ?1);",
            fk = table.id_column
        ),
        [id],
    )?;
    conn.execute(
        &format!("DELETE FROM speech WHERE {fk} = ?1;", fk = table.id_column),
        [id],
    )?;
    conn.execute(
        &format!(
            "DELETE FROM {table} WHERE {id_column} = ?1;",
            table = table.table,
            id_column = table.id_column
        ),
        [id],
    )?;

    Ok(())
}
