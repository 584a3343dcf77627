//! CSV speech import.
//!
//! # Responsibility
//! - Read speech records (`title, duration, views, date, topic, speaker`)
//!   from CSV with a header row and insert each through the store.
//!
//! # Invariants
//! - Each row is its own store transaction; one bad row never rolls back
//!   rows imported before it.
//! - Malformed rows are reported with their 1-based line number and skipped.
//! - Unreadable input, a missing required column, or a storage failure
//!   aborts the import.

use crate::model::speech::{NewSpeech, Speech, DATE_FORMAT};
use crate::repo::RepoError;
use crate::service::talk_store::TalkStore;
use chrono::NaiveDate;
use csv::{ReaderBuilder, StringRecord, Trim};
use log::{error, info};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Columns every import file must carry. Order is free, extras are ignored.
pub const REQUIRED_COLUMNS: [&str; 6] = ["title", "duration", "views", "date", "topic", "speaker"];

/// Outcome of one import run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ImportReport {
    /// Speeches as stored, in file order.
    pub inserted: Vec<Speech>,
    pub rejected: Vec<RejectedRow>,
}

/// A row that was skipped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RejectedRow {
    pub line: u64,
    pub reason: String,
}

#[derive(Debug)]
pub enum ImportError {
    Open { path: PathBuf, source: std::io::Error },
    Csv(csv::Error),
    MissingColumn(&'static str),
    Store(RepoError),
}

impl Display for ImportError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Open { path, source } => {
                write!(f, "cannot open import file `{}`: {source}", path.display())
            }
            Self::Csv(err) => write!(f, "{err}"),
            Self::MissingColumn(column) => write!(f, "import header lacks column `{column}`"),
            Self::Store(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ImportError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Open { source, .. } => Some(source),
            Self::Csv(err) => Some(err),
            Self::MissingColumn(_) => None,
            Self::Store(err) => Some(err),
        }
    }
}

impl From<csv::Error> for ImportError {
    fn from(value: csv::Error) -> Self {
        Self::Csv(value)
    }
}

#[derive(Debug, Deserialize)]
struct SpeechRow {
    title: String,
    duration: String,
    views: String,
    date: String,
    topic: String,
    speaker: String,
}

/// Imports speeches from a CSV file on disk.
pub fn import_speeches_csv_path(
    store: &TalkStore,
    path: impl AsRef<Path>,
) -> Result<ImportReport, ImportError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| ImportError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    import_speeches_csv(store, file)
}

/// Imports speeches from any CSV source, calling `insert_speech` per row.
pub fn import_speeches_csv<R: Read>(
    store: &TalkStore,
    source: R,
) -> Result<ImportReport, ImportError> {
    let started_at = Instant::now();
    info!("event=csv_import module=import status=start");

    let result = import_rows(store, source);
    match &result {
        Ok(report) => info!(
            "event=csv_import module=import status=ok inserted={} rejected={} duration_ms={}",
            report.inserted.len(),
            report.rejected.len(),
            started_at.elapsed().as_millis()
        ),
        Err(err) => error!(
            "event=csv_import module=import status=error duration_ms={} error={}",
            started_at.elapsed().as_millis(),
            err
        ),
    }
    result
}

fn import_rows<R: Read>(store: &TalkStore, source: R) -> Result<ImportReport, ImportError> {
    let mut reader = ReaderBuilder::new().trim(Trim::All).from_reader(source);
    let headers = reader.headers()?.clone();
    for column in REQUIRED_COLUMNS {
        if !headers.iter().any(|header| header == column) {
            return Err(ImportError::MissingColumn(column));
        }
    }

    let mut report = ImportReport::default();
    for record in reader.records() {
        let record = match record {
            Ok(record) => record,
            Err(err) if err.is_io_error() => return Err(err.into()),
            Err(err) => {
                let line = err.position().map_or(0, |position| position.line());
                report.rejected.push(RejectedRow {
                    line,
                    reason: err.to_string(),
                });
                continue;
            }
        };

        let line = record.position().map_or(0, |position| position.line());
        let new_speech = match parse_record(&record, &headers) {
            Ok(new_speech) => new_speech,
            Err(reason) => {
                report.rejected.push(RejectedRow { line, reason });
                continue;
            }
        };

        match store.insert_speech(&new_speech) {
            Ok(speech) => report.inserted.push(speech),
            Err(RepoError::Validation(err)) => report.rejected.push(RejectedRow {
                line,
                reason: err.to_string(),
            }),
            Err(err) => return Err(ImportError::Store(err)),
        }
    }

    Ok(report)
}

fn parse_record(record: &StringRecord, headers: &StringRecord) -> Result<NewSpeech, String> {
    let row: SpeechRow = record
        .deserialize(Some(headers))
        .map_err(|err| err.to_string())?;

    let duration = row
        .duration
        .parse::<i64>()
        .map_err(|_| format!("invalid duration `{}`", row.duration))?;
    let views = row
        .views
        .parse::<i64>()
        .map_err(|_| format!("invalid views `{}`", row.views))?;
    let date = NaiveDate::parse_from_str(&row.date, DATE_FORMAT)
        .map_err(|_| format!("invalid date `{}`, expected YYYY-MM-DD", row.date))?;

    Ok(NewSpeech::new(
        row.title,
        duration,
        views,
        date,
        row.topic,
        row.speaker,
    ))
}

#[cfg(test)]
mod tests {
    use super::parse_record;
    use chrono::NaiveDate;
    use csv::StringRecord;

    fn headers() -> StringRecord {
        StringRecord::from(vec![
            "title", "duration", "views", "date", "topic", "speaker", "url",
        ])
    }

    #[test]
    fn parse_record_maps_columns_by_header_name() {
        let record = StringRecord::from(vec![
            "Title A",
            "1070",
            "1811102",
            "2016-05-19",
            "activism",
            "Speaker A",
            "https://example.com/talk",
        ]);

        let speech = parse_record(&record, &headers()).expect("row should parse");
        assert_eq!(speech.title, "Title A");
        assert_eq!(speech.duration, 1070);
        assert_eq!(speech.views, 1_811_102);
        assert_eq!(speech.date, NaiveDate::from_ymd_opt(2016, 5, 19).expect("valid date"));
        assert_eq!(speech.topic, "activism");
        assert_eq!(speech.speaker, "Speaker A");
    }

    #[test]
    fn parse_record_explains_bad_numbers_and_dates() {
        let record = StringRecord::from(vec![
            "Title", "ten", "1", "2016-05-19", "t", "s", "",
        ]);
        let reason = parse_record(&record, &headers()).expect_err("duration must be numeric");
        assert!(reason.contains("duration"));

        let record = StringRecord::from(vec!["Title", "1", "1", "19/05/2016", "t", "s", ""]);
        let reason = parse_record(&record, &headers()).expect_err("date must be ISO");
        assert!(reason.contains("YYYY-MM-DD"));
    }
}
