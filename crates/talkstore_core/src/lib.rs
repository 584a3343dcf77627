//! Storage core for the recorded-talk catalog.
//! This crate owns every catalog invariant: upsert-by-name, referential
//! integrity, cascading deletes, and joined reads.

pub mod db;
pub mod import;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use db::{DbError, DbResult};
pub use import::csv_import::{
    import_speeches_csv, import_speeches_csv_path, ImportError, ImportReport, RejectedRow,
};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::catalog::{EntityKind, Speaker, SpeakerId, Topic, TopicId};
pub use model::review::{
    validate_review_content, Review, ReviewContentError, ReviewId, MAX_REVIEW_CONTENT_CHARS,
};
pub use model::speech::{NewSpeech, Speech, SpeechId};
pub use model::validation::ValidationError;
pub use repo::{RepoError, RepoResult};
pub use service::talk_store::TalkStore;

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
