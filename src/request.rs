//! Request parameters for every endpoint.
//!
//! Each struct serializes to the flat JSON object the endpoint expects.
//! Optional fields are left out of the body when unset so the API applies
//! its own defaults.

use serde::{Deserialize, Serialize};

/// Parameters for `ad-generation`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AdGenerationParams {
    /// Keywords the ad should be built around.
    pub keywords: Vec<String>,
}

/// Parameters for `asr`. Provide either `url` or `encoded_file`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AsrParams {
    /// URL of the audio or video file.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Base64 encoded file content.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub encoded_file: Option<String>,
    /// Language spoken in the file, detected when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub input_language: Option<String>,
}

impl AsrParams {
    /// Transcribe the file at `url`.
    pub fn from_url(url: impl Into<String>) -> Self {
        Self {
            url: Some(url.into()),
            ..Default::default()
        }
    }

    /// Transcribe a base64 encoded file.
    pub fn from_encoded_file(encoded_file: impl Into<String>) -> Self {
        Self {
            encoded_file: Some(encoded_file.into()),
            ..Default::default()
        }
    }
}

/// One input/response pair of a conversation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Exchange {
    /// What the user said.
    pub input: String,
    /// What the model answered.
    pub response: String,
}

/// Parameters for `chatbot`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChatbotParams {
    /// The new user input.
    pub input: String,
    /// Previous exchanges, oldest first.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub history: Option<Vec<Exchange>>,
    /// Background given to the model.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
}

impl ChatbotParams {
    /// Start a conversation with `input`.
    pub fn new(input: impl Into<String>) -> Self {
        Self {
            input: input.into(),
            ..Default::default()
        }
    }

    /// Continue a conversation.
    #[must_use]
    pub fn with_history(mut self, history: Vec<Exchange>) -> Self {
        self.history = Some(history);
        self
    }

    /// Set the conversation context.
    #[must_use]
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }
}

/// Parameters for `classification`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClassificationParams {
    /// Text to classify.
    pub text: String,
    /// Candidate labels. Required by zero-shot models.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub labels: Option<Vec<String>>,
    /// Whether several labels may apply at once.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub multi_class: Option<bool>,
}

impl ClassificationParams {
    /// Classify `text`.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Default::default()
        }
    }

    /// Candidate labels.
    #[must_use]
    pub fn with_labels<I, S>(mut self, labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.labels = Some(labels.into_iter().map(Into::into).collect());
        self
    }

    /// Allow several labels.
    #[must_use]
    pub fn multi_class(mut self, multi_class: bool) -> Self {
        self.multi_class = Some(multi_class);
        self
    }
}

/// Parameters for `batch-classification`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BatchClassificationParams {
    /// Texts to classify.
    pub texts: Vec<String>,
    /// Candidate labels shared by all texts.
    pub labels: Vec<String>,
}

/// Parameters for `code-generation`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CodeGenerationParams {
    /// What the code should do.
    pub instruction: String,
}

/// Parameters shared by endpoints that only take a block of text:
/// `dependencies`, `gs-correction`, `image-generation`,
/// `intent-classification`, `kw-kp-extraction`, `langdetection`,
/// `paraphrasing`, `sentence-dependencies`, `sentiment` and `tokens`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TextParams {
    /// Input text.
    pub text: String,
}

impl TextParams {
    /// Wrap `text`.
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

impl From<&str> for TextParams {
    fn from(text: &str) -> Self {
        Self::new(text)
    }
}

impl From<String> for TextParams {
    fn from(text: String) -> Self {
        Self { text }
    }
}

/// Parameters for `entities`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EntitiesParams {
    /// Text to extract entities from.
    pub text: String,
    /// Entity to look for, used by generative models.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub searched_entity: Option<String>,
}

impl EntitiesParams {
    /// Extract entities from `text`.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            searched_entity: None,
        }
    }

    /// Look for a specific entity.
    #[must_use]
    pub fn searched_entity(mut self, entity: impl Into<String>) -> Self {
        self.searched_entity = Some(entity.into());
        self
    }
}

/// Parameters for `embeddings`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EmbeddingsParams {
    /// Sentences to embed.
    pub sentences: Vec<String>,
}

/// Parameters for `generation`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GenerationParams {
    /// Prompt.
    pub text: String,
    /// Maximum number of tokens to generate.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_length: Option<u32>,
    /// Whether `max_length` excludes the input.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub length_no_input: Option<bool>,
    /// Stop generating after this sequence.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_sequence: Option<String>,
    /// Strip the prompt from the output.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remove_input: Option<bool>,
    /// Beam search width.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub num_beams: Option<u32>,
    /// Number of independent sequences to return.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub num_return_sequences: Option<u32>,
    /// Top-k sampling.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_k: Option<u32>,
    /// Nucleus sampling.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f64>,
    /// Sampling temperature.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    /// Penalty applied to repeated tokens.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repetition_penalty: Option<f64>,
    /// Words the model must not produce.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bad_words: Option<Vec<String>>,
    /// Strip `end_sequence` from the output.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remove_end_sequence: Option<bool>,
    /// Send the prompt without the model's chat template. Experimental.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub no_chat_prompt: Option<bool>,
}

impl GenerationParams {
    /// Generate from `text` with the model's defaults.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Default::default()
        }
    }

    /// Limit the generated length.
    #[must_use]
    pub fn max_length(mut self, max_length: u32) -> Self {
        self.max_length = Some(max_length);
        self
    }

    /// Set the sampling temperature.
    #[must_use]
    pub fn temperature(mut self, temperature: f64) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// Stop at `end_sequence`.
    #[must_use]
    pub fn end_sequence(mut self, end_sequence: impl Into<String>) -> Self {
        self.end_sequence = Some(end_sequence.into());
        self
    }
}

/// Parameters for `batch-generation`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BatchGenerationParams {
    /// Prompts.
    pub texts: Vec<String>,
}

/// Parameters for `question`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QuestionParams {
    /// The question.
    pub question: String,
    /// Text holding the answer. Generative models can answer without it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
}

/// Parameters for `semantic-search`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SemanticSearchParams {
    /// Query.
    pub text: String,
    /// How many results to return.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub num_results: Option<u32>,
}

/// Parameters for `semantic-similarity`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SemanticSimilarityParams {
    /// The two sentences to compare.
    pub sentences: [String; 2],
}

impl SemanticSimilarityParams {
    /// Compare `a` and `b`.
    pub fn new(a: impl Into<String>, b: impl Into<String>) -> Self {
        Self {
            sentences: [a.into(), b.into()],
        }
    }
}

/// Parameters for `speech-synthesis`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SpeechSynthesisParams {
    /// Text to read.
    pub text: String,
    /// Voice to use.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub voice: Option<String>,
}

/// Parameters for `summarization`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SummarizationParams {
    /// Text to summarize.
    pub text: String,
    /// `"small"` or `"large"`, for models that support it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
}

/// Parameters for `batch-summarization`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BatchSummarizationParams {
    /// Texts to summarize.
    pub texts: Vec<String>,
    /// `"small"` or `"large"`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
}

/// Parameters for `translation`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TranslationParams {
    /// Text to translate.
    pub text: String,
    /// Source language, detected when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    /// Target language.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
}

impl TranslationParams {
    /// Translate `text` into `target`, detecting the source language.
    pub fn new(text: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            source: None,
            target: Some(target.into()),
        }
    }

    /// Set the source language.
    #[must_use]
    pub fn source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }
}

/// Parameters for `batch-translation`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BatchTranslationParams {
    /// Texts to translate.
    pub texts: Vec<String>,
    /// Source language of each text.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sources: Option<Vec<String>>,
    /// Target language of each text.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub targets: Option<Vec<String>>,
}
