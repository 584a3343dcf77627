//! Speakers, topics, and entity kinds.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

pub type SpeakerId = i64;
pub type TopicId = i64;

/// Kind of catalog entity, used to label errors and log events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Speaker,
    Topic,
    Speech,
    Review,
}

impl EntityKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Speaker => "speaker",
            Self::Topic => "topic",
            Self::Speech => "speech",
            Self::Review => "review",
        }
    }
}

impl Display for EntityKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A person who gave one or more speeches. Names are unique.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Speaker {
    pub speaker_id: SpeakerId,
    /// Serialized as `speaker` to match the catalog JSON shape.
    #[serde(rename = "speaker")]
    pub name: String,
}

/// A subject area speeches are filed under. Names are unique.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Topic {
    pub topic_id: TopicId,
    /// Serialized as `topic` to match the catalog JSON shape.
    #[serde(rename = "topic")]
    pub name: String,
}
