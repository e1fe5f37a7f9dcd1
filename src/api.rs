//! Endpoint methods.
//!
//! One method per API endpoint. They differ only in path and types; all of
//! them dispatch through [`Client::call`], [`Client::get`] or
//! [`Client::call_streaming`] with the client's [`crate::CallOptions`].

use crate::client::{Client, decode};
use crate::error::Result;
use crate::request::{
    AdGenerationParams, AsrParams, BatchClassificationParams, BatchGenerationParams,
    BatchSummarizationParams, BatchTranslationParams, ChatbotParams, ClassificationParams,
    CodeGenerationParams, EmbeddingsParams, EntitiesParams, GenerationParams, QuestionParams,
    SemanticSearchParams, SemanticSimilarityParams, SpeechSynthesisParams, SummarizationParams,
    TextParams, TranslationParams,
};
use crate::response::{
    AdGeneration, Asr, AsyncResult, BatchClassification, BatchGeneration, BatchSummarization,
    BatchTranslation, Chatbot, Classification, CodeGeneration, Dependencies, Embeddings, Entities,
    Generation, GsCorrection, ImageGeneration, IntentClassification, KwKpExtraction,
    LangDetection, Paraphrasing, Question, SemanticSearch, SemanticSimilarity,
    SentenceDependencies, Sentiment, SpeechSynthesis, Summarization, Tokens, Translation,
    Versions,
};
use crate::stream::ResponseStream;
use reqwest::Method;
use tracing::debug;

impl Client {
    /// Generate a product description or an ad from keywords.
    pub async fn ad_generation(&self, params: &AdGenerationParams) -> Result<AdGeneration> {
        self.call("ad-generation", params).await
    }

    /// Transcribe an audio or video file.
    pub async fn asr(&self, params: &AsrParams) -> Result<Asr> {
        self.call("asr", params).await
    }

    /// Fetch the outcome of an async job from the URL returned in async mode.
    ///
    /// Returns `Ok(None)` while the job is still running.
    pub async fn async_result(&self, url: &str) -> Result<Option<AsyncResult>> {
        let transport = self.transport()?;
        let body = self
            .execute(transport, Method::GET, url.to_string(), None, self.options())
            .await?;

        if body.iter().all(u8::is_ascii_whitespace) {
            debug!(url, "Async job still running");
            return Ok(None);
        }
        decode(&body).map(Some)
    }

    /// Answer as a conversational agent.
    pub async fn chatbot(&self, params: &ChatbotParams) -> Result<Chatbot> {
        self.call("chatbot", params).await
    }

    /// Answer as a conversational agent, streaming the response text.
    pub async fn streaming_chatbot(&self, params: &ChatbotParams) -> Result<ResponseStream> {
        self.call_streaming("chatbot", params).await
    }

    /// Apply scored labels to a block of text.
    pub async fn classification(&self, params: &ClassificationParams) -> Result<Classification> {
        self.call("classification", params).await
    }

    /// Classify several blocks of text at once.
    pub async fn batch_classification(
        &self,
        params: &BatchClassificationParams,
    ) -> Result<BatchClassification> {
        self.call("batch-classification", params).await
    }

    /// Generate source code from an instruction.
    pub async fn code_generation(&self, params: &CodeGenerationParams) -> Result<CodeGeneration> {
        self.call("code-generation", params).await
    }

    /// Part-of-speech tags and dependency arcs.
    pub async fn dependencies(&self, params: &TextParams) -> Result<Dependencies> {
        self.call("dependencies", params).await
    }

    /// Extract named entities.
    pub async fn entities(&self, params: &EntitiesParams) -> Result<Entities> {
        self.call("entities", params).await
    }

    /// Compute sentence embeddings.
    pub async fn embeddings(&self, params: &EmbeddingsParams) -> Result<Embeddings> {
        self.call("embeddings", params).await
    }

    /// Generate text from a prompt.
    pub async fn generation(&self, params: &GenerationParams) -> Result<Generation> {
        self.call("generation", params).await
    }

    /// Generate text from a prompt, streaming tokens as they are produced.
    pub async fn streaming_generation(&self, params: &GenerationParams) -> Result<ResponseStream> {
        self.call_streaming("generation", params).await
    }

    /// Generate text for several prompts.
    pub async fn batch_generation(&self, params: &BatchGenerationParams) -> Result<BatchGeneration> {
        self.call("batch-generation", params).await
    }

    /// Correct grammar and spelling.
    pub async fn gs_correction(&self, params: &TextParams) -> Result<GsCorrection> {
        self.call("gs-correction", params).await
    }

    /// Generate an image from a text instruction.
    pub async fn image_generation(&self, params: &TextParams) -> Result<ImageGeneration> {
        self.call("image-generation", params).await
    }

    /// Detect the intent behind a block of text.
    pub async fn intent_classification(&self, params: &TextParams) -> Result<IntentClassification> {
        self.call("intent-classification", params).await
    }

    /// Extract keywords and keyphrases.
    pub async fn kw_kp_extraction(&self, params: &TextParams) -> Result<KwKpExtraction> {
        self.call("kw-kp-extraction", params).await
    }

    /// Detect the languages of a block of text.
    pub async fn lang_detection(&self, params: &TextParams) -> Result<LangDetection> {
        self.call("langdetection", params).await
    }

    /// Rephrase a block of text.
    pub async fn paraphrasing(&self, params: &TextParams) -> Result<Paraphrasing> {
        self.call("paraphrasing", params).await
    }

    /// Answer a question, optionally from a context.
    pub async fn question(&self, params: &QuestionParams) -> Result<Question> {
        self.call("question", params).await
    }

    /// Search the custom dataset attached to the model.
    pub async fn semantic_search(&self, params: &SemanticSearchParams) -> Result<SemanticSearch> {
        self.call("semantic-search", params).await
    }

    /// Score how close two sentences are in meaning.
    pub async fn semantic_similarity(
        &self,
        params: &SemanticSimilarityParams,
    ) -> Result<SemanticSimilarity> {
        self.call("semantic-similarity", params).await
    }

    /// Dependencies for each sentence of a block of text.
    pub async fn sentence_dependencies(&self, params: &TextParams) -> Result<SentenceDependencies> {
        self.call("sentence-dependencies", params).await
    }

    /// Sentiment and emotion labels.
    pub async fn sentiment(&self, params: &TextParams) -> Result<Sentiment> {
        self.call("sentiment", params).await
    }

    /// Read a text aloud.
    pub async fn speech_synthesis(&self, params: &SpeechSynthesisParams) -> Result<SpeechSynthesis> {
        self.call("speech-synthesis", params).await
    }

    /// Summarize a block of text.
    pub async fn summarization(&self, params: &SummarizationParams) -> Result<Summarization> {
        self.call("summarization", params).await
    }

    /// Summarize several blocks of text.
    pub async fn batch_summarization(
        &self,
        params: &BatchSummarizationParams,
    ) -> Result<BatchSummarization> {
        self.call("batch-summarization", params).await
    }

    /// Tokenize and lemmatize.
    pub async fn tokens(&self, params: &TextParams) -> Result<Tokens> {
        self.call("tokens", params).await
    }

    /// Translate a block of text.
    pub async fn translation(&self, params: &TranslationParams) -> Result<Translation> {
        self.call("translation", params).await
    }

    /// Translate several blocks of text.
    pub async fn batch_translation(
        &self,
        params: &BatchTranslationParams,
    ) -> Result<BatchTranslation> {
        self.call("batch-translation", params).await
    }

    /// Versions of the libraries behind the model.
    pub async fn versions(&self) -> Result<Versions> {
        self.get("versions").await
    }
}
