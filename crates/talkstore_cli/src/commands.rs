//! Subcommand handlers.
//!
//! Handlers only call `TalkStore` operations and shape their results as
//! JSON. Absent records become "`<entity> not found`" errors, the way the REST
//! adapter maps them to 404.

use crate::cli::{AddSpeechArgs, Command, RecordKind};
use anyhow::{anyhow, bail, Context, Result};
use log::info;
use serde::Serialize;
use talkstore_core::{
    import_speeches_csv_path, validate_review_content, EntityKind, NewSpeech, RepoError, Review,
    Speaker, Speech, TalkStore, Topic,
};

/// Speech detail: the joined speech plus its reviews.
#[derive(Debug, Serialize)]
struct SpeechDetail {
    #[serde(flatten)]
    speech: Speech,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    reviews: Vec<Review>,
}

#[derive(Debug, Serialize)]
struct SpeakerDetail {
    #[serde(flatten)]
    speaker: Speaker,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    speeches: Vec<Speech>,
}

#[derive(Debug, Serialize)]
struct TopicDetail {
    #[serde(flatten)]
    topic: Topic,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    speeches: Vec<Speech>,
}

#[derive(Debug, Serialize)]
struct Message {
    message: String,
}

pub fn run(store: &TalkStore, command: Command) -> Result<()> {
    match command {
        Command::Speeches { speaker, topic } => {
            let speeches = match (speaker, topic) {
                (Some(speaker_id), _) => store.get_speeches_by_speaker(speaker_id)?,
                (None, Some(topic_id)) => store.get_speeches_by_topic(topic_id)?,
                (None, None) => store.get_all_speeches()?,
            };
            emit(&speeches)
        }
        Command::Speech { id } => {
            let speech = store
                .get_speech_by_id(id)?
                .ok_or_else(|| anyhow!("speech not found"))?;
            let reviews = store.get_reviews_by_speech(id)?;
            emit(&SpeechDetail { speech, reviews })
        }
        Command::Speakers => emit(&store.get_all_speakers()?),
        Command::Speaker { id } => {
            let speaker = store
                .get_speaker_by_id(id)?
                .ok_or_else(|| anyhow!("speaker not found"))?;
            let speeches = store.get_speeches_by_speaker(id)?;
            emit(&SpeakerDetail { speaker, speeches })
        }
        Command::Topics => emit(&store.get_all_topics()?),
        Command::Topic { id } => {
            let topic = store
                .get_topic_by_id(id)?
                .ok_or_else(|| anyhow!("topic not found"))?;
            let speeches = store.get_speeches_by_topic(id)?;
            emit(&TopicDetail { topic, speeches })
        }
        Command::Reviews => emit(&store.get_all_reviews()?),
        Command::Review { id } => {
            let review = store
                .get_review_by_id(id)?
                .ok_or_else(|| anyhow!("review not found"))?;
            emit(&review)
        }
        Command::AddSpeech(args) => emit(&store.insert_speech(&new_speech(args))?),
        Command::AddSpeaker { name } => emit(&store.insert_speaker(&name)?),
        Command::AddTopic { name } => emit(&store.insert_topic(&name)?),
        Command::AddReview { speech_id, content } => {
            let content = validate_review_content(&content)?;
            let review = store
                .insert_review(content, speech_id)
                .context("cannot add review")?;
            emit(&review)
        }
        Command::Delete { kind, id } => {
            delete(store, kind, id)?;
            emit(&Message {
                message: format!("{} deleted successfully", entity_kind(kind)),
            })
        }
        Command::Import { path } => {
            let report = import_speeches_csv_path(store, &path)
                .with_context(|| format!("import of `{}` failed", path.display()))?;
            info!(
                "event=cli_import module=cli status=ok inserted={} rejected={}",
                report.inserted.len(),
                report.rejected.len()
            );
            emit(&report)
        }
    }
}

fn new_speech(args: AddSpeechArgs) -> NewSpeech {
    NewSpeech::new(
        args.title,
        args.duration,
        args.views,
        args.date,
        args.topic,
        args.speaker,
    )
}

fn delete(store: &TalkStore, kind: RecordKind, id: i64) -> Result<()> {
    let result = match kind {
        RecordKind::Speech => store.delete_speech(id),
        RecordKind::Speaker => store.delete_speaker(id),
        RecordKind::Topic => store.delete_topic(id),
        RecordKind::Review => store.delete_review(id),
    };
    match result {
        Err(RepoError::NotFound { entity, .. }) => bail!("{entity} not found"),
        other => Ok(other?),
    }
}

fn entity_kind(kind: RecordKind) -> EntityKind {
    match kind {
        RecordKind::Speech => EntityKind::Speech,
        RecordKind::Speaker => EntityKind::Speaker,
        RecordKind::Topic => EntityKind::Topic,
        RecordKind::Review => EntityKind::Review,
    }
}

fn emit<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
