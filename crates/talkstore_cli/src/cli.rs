//! Command-line surface and configuration resolution.
//!
//! Every setting comes from a flag, then its environment variable, then a
//! built-in default.

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

pub const DEFAULT_DB_PATH: &str = "tedtalks.sqlite";

#[derive(Debug, Parser)]
#[command(
    name = "talkstore",
    version = talkstore_core::core_version(),
    about = "Browse and maintain the recorded-talk catalog"
)]
pub struct Cli {
    #[command(flatten)]
    pub config: StoreConfig,

    #[command(subcommand)]
    pub command: Command,
}

/// Settings shared by every subcommand.
#[derive(Debug, Clone, Args)]
pub struct StoreConfig {
    /// Path to the catalog database; created on first use
    #[arg(long = "db", env = "TALKSTORE_DB", default_value = DEFAULT_DB_PATH, global = true)]
    pub db_path: PathBuf,

    /// trace|debug|info|warn|error (defaults by build mode)
    #[arg(long, env = "TALKSTORE_LOG_LEVEL", global = true)]
    pub log_level: Option<String>,

    /// Absolute directory for rolling log files; stderr when unset or `-`
    #[arg(long, env = "TALKSTORE_LOG_DIR", global = true)]
    pub log_dir: Option<String>,
}

impl StoreConfig {
    pub fn effective_log_level(&self) -> &str {
        self.log_level
            .as_deref()
            .unwrap_or(talkstore_core::default_log_level())
    }
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List speeches, optionally for one speaker or topic
    Speeches {
        #[arg(long, conflicts_with = "topic")]
        speaker: Option<i64>,
        #[arg(long)]
        topic: Option<i64>,
    },
    /// Show one speech with its reviews
    Speech { id: i64 },
    /// List speakers
    Speakers,
    /// Show one speaker with their speeches
    Speaker { id: i64 },
    /// List topics
    Topics,
    /// Show one topic with its speeches
    Topic { id: i64 },
    /// List reviews
    Reviews,
    /// Show one review
    Review { id: i64 },
    /// Add a speech, creating its topic and speaker if needed
    AddSpeech(AddSpeechArgs),
    /// Add a speaker (returns the existing one for a known name)
    AddSpeaker { name: String },
    /// Add a topic (returns the existing one for a known name)
    AddTopic { name: String },
    /// Add a review to a speech
    AddReview { speech_id: i64, content: String },
    /// Delete a record; speakers, topics, and speeches cascade
    Delete { kind: RecordKind, id: i64 },
    /// Import speeches from a CSV file with a header row
    Import { path: PathBuf },
}

#[derive(Debug, Clone, Args)]
pub struct AddSpeechArgs {
    #[arg(long)]
    pub title: String,
    /// Length in seconds
    #[arg(long)]
    pub duration: i64,
    #[arg(long)]
    pub views: i64,
    /// YYYY-MM-DD
    #[arg(long, value_parser = parse_date)]
    pub date: NaiveDate,
    #[arg(long)]
    pub topic: String,
    #[arg(long)]
    pub speaker: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum RecordKind {
    Speech,
    Speaker,
    Topic,
    Review,
}

fn parse_date(value: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|_| format!("invalid date `{value}`, expected YYYY-MM-DD"))
}

#[cfg(test)]
mod tests {
    use super::{Cli, Command, RecordKind, DEFAULT_DB_PATH};
    use clap::Parser;
    use std::path::Path;

    #[test]
    fn parses_add_speech_with_global_db_flag() {
        let cli = Cli::try_parse_from([
            "talkstore",
            "add-speech",
            "--title",
            "Title A",
            "--duration",
            "1070",
            "--views",
            "1811102",
            "--date",
            "2016-05-19",
            "--topic",
            "activism",
            "--speaker",
            "Speaker A",
            "--db",
            "/tmp/catalog.sqlite",
        ])
        .expect("add-speech arguments should parse");

        assert_eq!(cli.config.db_path, Path::new("/tmp/catalog.sqlite"));
        match cli.command {
            Command::AddSpeech(args) => {
                assert_eq!(args.title, "Title A");
                assert_eq!(args.date.to_string(), "2016-05-19");
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn rejects_malformed_date() {
        let result = Cli::try_parse_from([
            "talkstore",
            "add-speech",
            "--title",
            "t",
            "--duration",
            "1",
            "--views",
            "1",
            "--date",
            "19/05/2016",
            "--topic",
            "t",
            "--speaker",
            "s",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn parses_delete_kind_and_default_db() {
        let cli = Cli::try_parse_from(["talkstore", "delete", "speaker", "3"])
            .expect("delete arguments should parse");
        match cli.command {
            Command::Delete { kind, id } => {
                assert_eq!(kind, RecordKind::Speaker);
                assert_eq!(id, 3);
            }
            other => panic!("unexpected command: {other:?}"),
        }
        if std::env::var_os("TALKSTORE_DB").is_none() {
            assert_eq!(cli.config.db_path, Path::new(DEFAULT_DB_PATH));
        }
    }

    #[test]
    fn speaker_and_topic_filters_conflict() {
        let result = Cli::try_parse_from(["talkstore", "speeches", "--speaker", "1", "--topic", "2"]);
        assert!(result.is_err());
    }
}
