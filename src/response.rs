//! Response bodies returned by the API.

use crate::client::decode;
use crate::error::Result;
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Result of `ad-generation`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AdGeneration {
    /// Generated ad or product description.
    pub generated_text: String,
}

/// Receipt returned by any endpoint in async mode.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AsyncJob {
    /// URL to poll with [`crate::Client::async_result`].
    pub url: String,
}

/// Outcome of an async job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AsyncResult {
    /// When the job was submitted.
    pub created_on: DateTime<Utc>,
    /// When the job finished.
    #[serde(default)]
    pub finished_on: Option<DateTime<Utc>>,
    /// Body of the original request.
    #[serde(default)]
    pub request_body: String,
    /// Status the original endpoint answered with.
    pub http_code: u16,
    /// Error detail when `http_code` is not 200.
    #[serde(default)]
    pub error_detail: String,
    /// Response body of the original endpoint, as a JSON string.
    #[serde(default)]
    pub content: String,
}

impl AsyncResult {
    /// Whether the original endpoint succeeded.
    pub fn is_success(&self) -> bool {
        self.http_code == 200
    }

    /// Decode `content` as the original endpoint's response type.
    pub fn decode_content<T: DeserializeOwned>(&self) -> Result<T> {
        decode(self.content.as_bytes())
    }
}

/// A transcribed segment.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    /// Segment index.
    pub id: u32,
    /// Start, in seconds.
    pub start: f64,
    /// End, in seconds.
    pub end: f64,
    /// Transcribed text.
    pub text: String,
}

/// A transcribed word.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AsrWord {
    /// Word index.
    pub id: u32,
    /// Start, in seconds.
    pub start: f64,
    /// End, in seconds.
    pub end: f64,
    /// The word.
    pub text: String,
    /// Confidence.
    pub prob: f64,
}

/// Result of `asr`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Asr {
    /// Full transcription.
    pub text: String,
    /// Duration of the file, in seconds.
    pub duration: u32,
    /// Detected or requested language.
    pub language: String,
    /// Timed segments.
    #[serde(default)]
    pub segments: Vec<Segment>,
    /// Timed words.
    #[serde(default)]
    pub words: Vec<AsrWord>,
}

/// Result of `chatbot`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Chatbot {
    /// The model's answer.
    pub response: String,
    /// The conversation including the new exchange.
    pub history: Vec<crate::request::Exchange>,
}

/// Result of `classification`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    /// Labels, best first.
    pub labels: Vec<String>,
    /// Score of each label.
    pub scores: Vec<f64>,
}

/// Result of `batch-classification`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BatchClassification {
    /// One score per input text.
    pub scores: Vec<f64>,
}

/// Result of `code-generation`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CodeGeneration {
    /// Generated source code.
    pub generated_code: String,
}

/// Part-of-speech tag for a word.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Word {
    /// The word.
    pub text: String,
    /// Its tag.
    pub tag: String,
}

/// Dependency arc between two words.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DependencyArc {
    /// Index of the first word.
    pub start: u32,
    /// Index of the last word.
    pub end: u32,
    /// Dependency label.
    pub label: String,
    /// Text of the dependent.
    pub text: String,
    /// `"left"` or `"right"`.
    pub dir: String,
}

/// Result of `dependencies`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Dependencies {
    /// Tagged words.
    pub words: Vec<Word>,
    /// Arcs between them.
    pub arcs: Vec<DependencyArc>,
}

/// Result of `embeddings`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Embeddings {
    /// One vector per sentence.
    pub embeddings: Vec<Vec<f64>>,
}

/// A named entity.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entity {
    /// Start offset in the text.
    pub start: u32,
    /// End offset in the text.
    pub end: u32,
    /// Entity type, e.g. `PERSON`.
    #[serde(rename = "type")]
    pub kind: String,
    /// Entity text.
    pub text: String,
}

/// Result of `entities`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entities {
    /// Entities found.
    pub entities: Vec<Entity>,
}

/// Result of `generation`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Generation {
    /// Generated text.
    pub generated_text: String,
    /// Tokens produced.
    #[serde(default)]
    pub nb_generated_tokens: u32,
    /// Tokens in the prompt.
    #[serde(default)]
    pub nb_input_tokens: u32,
}

/// Result of `batch-generation`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BatchGeneration {
    /// One generation per prompt.
    pub generations: Vec<Generation>,
}

/// Result of `gs-correction`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GsCorrection {
    /// Corrected text.
    pub correction: String,
}

/// Result of `image-generation`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ImageGeneration {
    /// URL of the generated image.
    pub url: String,
}

/// Result of `intent-classification`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IntentClassification {
    /// Detected intent.
    pub intent: String,
}

/// Result of `kw-kp-extraction`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct KwKpExtraction {
    /// Extracted keywords and keyphrases.
    pub keywords_and_keyphrases: Vec<String>,
}

/// Result of `langdetection`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LangDetection {
    /// Language code to probability, most likely first.
    pub languages: Vec<HashMap<String, f64>>,
}

/// Result of `paraphrasing`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Paraphrasing {
    /// Paraphrased text.
    pub paraphrased_text: String,
}

/// Result of `question`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Question {
    /// The answer.
    pub answer: String,
    /// Confidence.
    #[serde(default)]
    pub score: f64,
    /// Start offset of the answer in the context.
    #[serde(default)]
    pub start: u32,
    /// End offset of the answer in the context.
    #[serde(default)]
    pub end: u32,
}

/// A label with its score.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoredLabel {
    /// Label.
    pub label: String,
    /// Score.
    pub score: f64,
}

/// One hit of a semantic search.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    /// Similarity score.
    pub score: f64,
    /// Matching text.
    pub text: String,
}

/// Result of `semantic-search`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SemanticSearch {
    /// Hits, best first.
    pub search_results: Vec<SearchResult>,
}

/// Result of `semantic-similarity`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SemanticSimilarity {
    /// Similarity between 0 and 1.
    pub score: f64,
}

/// Dependencies of one sentence.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SentenceDependency {
    /// The sentence.
    pub sentence: String,
    /// Its dependencies.
    pub dependencies: Dependencies,
}

/// Result of `sentence-dependencies`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SentenceDependencies {
    /// One entry per sentence.
    pub sentence_dependencies: Vec<SentenceDependency>,
}

/// Result of `sentiment`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Sentiment {
    /// Sentiment labels with scores.
    pub scored_labels: Vec<ScoredLabel>,
}

/// Result of `speech-synthesis`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SpeechSynthesis {
    /// URL of the generated audio.
    pub url: String,
}

/// Result of `summarization`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Summarization {
    /// Summary.
    pub summary_text: String,
}

/// Result of `batch-summarization`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BatchSummarization {
    /// One summary per input text.
    pub summary_texts: Vec<String>,
}

/// A token with its lemma and position.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Token {
    /// Token text.
    pub text: String,
    /// Lemma.
    pub lemma: String,
    /// Start offset.
    pub start: u32,
    /// End offset.
    pub end: u32,
    /// Position in the text.
    pub index: u32,
    /// Whether whitespace follows.
    pub ws_after: bool,
}

/// Result of `tokens`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Tokens {
    /// Tokens in order.
    pub tokens: Vec<Token>,
}

/// Result of `translation`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Translation {
    /// Translated text.
    pub translation_text: String,
}

/// Result of `batch-translation`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BatchTranslation {
    /// One translation per input text.
    pub translation_texts: Vec<String>,
}

/// Result of `versions`: library name to version.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Versions {
    /// Versions of the libraries behind the model, e.g. `spacy`.
    pub libraries: HashMap<String, serde_json::Value>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entity_type_field() {
        let entities: Entities = serde_json::from_str(
            r#"{"entities":[{"start":0,"end":8,"type":"PERSON","text":"John Doe"}]}"#,
        )
        .unwrap();
        assert_eq!(
            entities,
            Entities {
                entities: vec![Entity {
                    start: 0,
                    end: 8,
                    kind: "PERSON".to_string(),
                    text: "John Doe".to_string(),
                }],
            }
        );
    }

    #[test]
    fn test_async_result_decode_content() {
        let result: AsyncResult = serde_json::from_str(
            r#"{
                "created_on": "2022-11-18T16:31:39.419Z",
                "finished_on": "2022-11-18T16:31:43.120Z",
                "request_body": "{\"text\":\"long text\"}",
                "http_code": 200,
                "error_detail": "",
                "content": "{\"summary_text\":\"short text\"}"
            }"#,
        )
        .unwrap();

        assert!(result.is_success());
        assert!(result.finished_on.is_some());
        let summary: Summarization = result.decode_content().unwrap();
        assert_eq!(summary.summary_text, "short text");
    }

    #[test]
    fn test_versions_keeps_unknown_libraries() {
        let versions: Versions =
            serde_json::from_str(r#"{"spacy":"3.7.2","transformers":"4.36.0"}"#).unwrap();
        assert_eq!(versions.libraries["spacy"], "3.7.2");
        assert_eq!(versions.libraries.len(), 2);
    }
}
