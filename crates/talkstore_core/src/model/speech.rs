//! Speech read model and insert input.
//!
//! # Invariants
//! - A `Speech` always carries both the foreign ids and the resolved topic
//!   and speaker names.
//! - `duration` is whole seconds; `duration` and `views` are never negative.

use super::catalog::{EntityKind, SpeakerId, TopicId};
use super::validation::{validate_name, ValidationError};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

pub type SpeechId = i64;

/// Speech joined with its topic and speaker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Speech {
    pub speech_id: SpeechId,
    pub title: String,
    /// Length in seconds.
    pub duration: i64,
    pub views: i64,
    /// Serialized as `YYYY-MM-DD`.
    pub date: NaiveDate,
    pub topic_id: TopicId,
    #[serde(rename = "topic")]
    pub topic_name: String,
    pub speaker_id: SpeakerId,
    #[serde(rename = "speaker")]
    pub speaker_name: String,
}

/// Input for `insert_speech`.
///
/// Topic and speaker are given by name; the store resolves or creates them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewSpeech {
    pub title: String,
    pub duration: i64,
    pub views: i64,
    pub date: NaiveDate,
    pub topic: String,
    pub speaker: String,
}

impl NewSpeech {
    pub fn new(
        title: impl Into<String>,
        duration: i64,
        views: i64,
        date: NaiveDate,
        topic: impl Into<String>,
        speaker: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            duration,
            views,
            date,
            topic: topic.into(),
            speaker: speaker.into(),
        }
    }

    /// Checks the input before any row is written.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.title.trim().is_empty() {
            return Err(ValidationError::BlankTitle);
        }
        if self.duration < 0 {
            return Err(ValidationError::NegativeDuration(self.duration));
        }
        if self.views < 0 {
            return Err(ValidationError::NegativeViews(self.views));
        }
        validate_name(EntityKind::Topic, &self.topic)?;
        validate_name(EntityKind::Speaker, &self.speaker)?;
        Ok(())
    }
}

/// Storage text format for speech dates.
pub(crate) const DATE_FORMAT: &str = "%Y-%m-%d";

#[cfg(test)]
mod tests {
    use super::NewSpeech;
    use crate::model::catalog::EntityKind;
    use crate::model::validation::ValidationError;
    use chrono::NaiveDate;

    fn sample() -> NewSpeech {
        NewSpeech::new(
            "Title A",
            1070,
            1_811_102,
            NaiveDate::from_ymd_opt(2016, 5, 19).expect("valid date"),
            "activism",
            "Speaker A",
        )
    }

    #[test]
    fn validate_accepts_well_formed_input() {
        assert!(sample().validate().is_ok());
    }

    #[test]
    fn validate_reports_first_failing_field() {
        let mut speech = sample();
        speech.views = -1;
        assert_eq!(speech.validate(), Err(ValidationError::NegativeViews(-1)));

        let mut speech = sample();
        speech.speaker = String::new();
        assert_eq!(
            speech.validate(),
            Err(ValidationError::BlankName(EntityKind::Speaker))
        );
    }
}
