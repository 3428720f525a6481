use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;

use super::{get_json, http_client, LookupError};

/// Part of speech -> definitions, both in the order the source gave them.
pub type Definitions = Vec<(String, Vec<String>)>;

#[async_trait]
pub trait Dictionary: Send + Sync {
    /// An unknown word is `Ok` with an empty list or `Err(NoMatch)`; callers treat both as a miss.
    async fn define(&self, word: &str) -> Result<Definitions, LookupError>;
}

#[derive(Clone)]
pub struct DictionaryApiClient {
    client: reqwest::Client,
    base_url: String,
}

#[derive(Deserialize)]
struct Entry {
    #[serde(default)]
    meanings: Vec<Meaning>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Meaning {
    part_of_speech: String,
    #[serde(default)]
    definitions: Vec<Definition>,
}

#[derive(Deserialize)]
struct Definition {
    definition: String,
}

impl DictionaryApiClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            client: http_client(timeout),
            base_url: base_url.into(),
        }
    }
}

#[async_trait]
impl Dictionary for DictionaryApiClient {
    async fn define(&self, word: &str) -> Result<Definitions, LookupError> {
        let word = word.trim();
        if word.is_empty() {
            return Err(LookupError::NoMatch);
        }
        let url = format!("{}/{}", self.base_url.trim_end_matches('/'), urlencoding::encode(word));
        let entries: Vec<Entry> = get_json(self.client.get(url)).await?;
        Ok(group_by_part_of_speech(entries))
    }
}

// The API repeats a part of speech across entries; fold them together keeping first-seen order.
fn group_by_part_of_speech(entries: Vec<Entry>) -> Definitions {
    let mut grouped: Definitions = Vec::new();
    for meaning in entries.into_iter().flat_map(|e| e.meanings) {
        let definitions = meaning.definitions.into_iter().map(|d| d.definition);
        match grouped.iter_mut().find(|(pos, _)| *pos == meaning.part_of_speech) {
            Some((_, existing)) => existing.extend(definitions),
            None => grouped.push((meaning.part_of_speech, definitions.collect())),
        }
    }
    grouped.retain(|(_, defs)| !defs.is_empty());
    grouped
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn groups_meanings_in_first_seen_order() {
        let entries: Vec<Entry> = serde_json::from_value(json!([
            {"meanings": [
                {"partOfSpeech": "adjective", "definitions": [{"definition": "present everywhere"}]},
                {"partOfSpeech": "noun", "definitions": [{"definition": "a thing"}]}
            ]},
            {"meanings": [
                {"partOfSpeech": "adjective", "definitions": [{"definition": "widespread"}]},
                {"partOfSpeech": "verb", "definitions": []}
            ]}
        ]))
        .unwrap();

        let grouped = group_by_part_of_speech(entries);
        assert_eq!(
            grouped,
            vec![
                ("adjective".to_string(), vec!["present everywhere".to_string(), "widespread".to_string()]),
                ("noun".to_string(), vec!["a thing".to_string()]),
            ]
        );
    }
}
