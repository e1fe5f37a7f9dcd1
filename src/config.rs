//! Client configuration and root URL resolution.
//!
//! A [`ClientConfig`] can be built in code, loaded from a JSON file, read
//! from `NLPCLOUD_*` environment variables, or assembled from command-line
//! arguments. The root URL every request is sent under is derived from it
//! once, when the client is built.

use crate::error::{NlpCloudError, Result};
use clap::ArgAction;
use clap::builder::BoolishValueParser;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

/// Default API root, without trailing slash.
pub const DEFAULT_BASE_URL: &str = "https://api.nlpcloud.io/v1";

/// Language codes that select the default (English) model variant.
const DEFAULT_LANGUAGES: [&str; 2] = ["en", "eng_Latn"];

/// Global command-line arguments of the `nlpcloud` binary.
#[derive(clap::Args, Debug, Clone, Default)]
pub struct Args {
    /// Model to send requests to (e.g. en_core_web_lg, finetuned-llama-3-70b)
    #[arg(short, long, env = "NLPCLOUD_MODEL", global = true)]
    pub model: Option<String>,

    /// API token
    #[arg(short, long, env = "NLPCLOUD_TOKEN", hide_env_values = true, global = true)]
    pub token: Option<String>,

    /// Run the model on GPU
    #[arg(
        long,
        env = "NLPCLOUD_GPU",
        global = true,
        action = ArgAction::SetTrue,
        value_parser = BoolishValueParser::new()
    )]
    pub gpu: bool,

    /// Language code for multilingual add-on (e.g. fra_Latn)
    #[arg(short, long, env = "NLPCLOUD_LANG", global = true)]
    pub lang: Option<String>,

    /// Use asynchronous mode: calls return a job URL to poll
    #[arg(
        long = "async",
        env = "NLPCLOUD_ASYNC",
        global = true,
        action = ArgAction::SetTrue,
        value_parser = BoolishValueParser::new()
    )]
    pub async_mode: bool,

    /// Override the API root URL
    #[arg(long, env = "NLPCLOUD_BASE_URL", global = true)]
    pub base_url: Option<String>,

    /// Request timeout in seconds
    #[arg(long, env = "NLPCLOUD_TIMEOUT", global = true)]
    pub timeout: Option<u64>,

    /// Path to a client configuration file (JSON)
    #[arg(short, long, env = "NLPCLOUD_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(
        short,
        long,
        env = "NLPCLOUD_VERBOSE",
        global = true,
        action = ArgAction::SetTrue,
        value_parser = BoolishValueParser::new()
    )]
    pub verbose: bool,

    /// Output logs as JSON
    #[arg(
        long,
        env = "NLPCLOUD_JSON_LOGS",
        global = true,
        action = ArgAction::SetTrue,
        value_parser = BoolishValueParser::new()
    )]
    pub json_logs: bool,
}

/// Connection settings for one client.
#[derive(Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ClientConfig {
    /// Identifier of the remote model.
    #[serde(default)]
    pub model: String,

    /// API token, sent as `Authorization: Token <token>`.
    #[serde(default)]
    pub token: String,

    /// Route requests to the GPU variant of the model.
    #[serde(default)]
    pub gpu: bool,

    /// Language segment for the multilingual add-on.
    #[serde(default)]
    pub language: Option<String>,

    /// Use the asynchronous API.
    #[serde(default, rename = "async")]
    pub async_mode: bool,

    /// API root the path segments are appended to.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Timeout applied by the HTTP transport to every request.
    #[serde(with = "humantime_serde", default = "default_timeout")]
    pub timeout: Duration,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_timeout() -> Duration {
    Duration::from_secs(120)
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("model", &self.model)
            .field("token", &"<redacted>")
            .field("gpu", &self.gpu)
            .field("language", &self.language)
            .field("async_mode", &self.async_mode)
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl ClientConfig {
    /// Create a configuration for `model` authenticated with `token`.
    pub fn new(model: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            token: token.into(),
            gpu: false,
            language: None,
            async_mode: false,
            base_url: default_base_url(),
            timeout: default_timeout(),
        }
    }

    /// Select the GPU variant of the model.
    #[must_use]
    pub fn gpu(mut self, gpu: bool) -> Self {
        self.gpu = gpu;
        self
    }

    /// Set the language segment.
    #[must_use]
    pub fn language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    /// Switch to the asynchronous API.
    #[must_use]
    pub fn async_mode(mut self, async_mode: bool) -> Self {
        self.async_mode = async_mode;
        self
    }

    /// Override the API root.
    #[must_use]
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Set the transport timeout.
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// The language segment to put in the URL, if any.
    ///
    /// Empty values and the English codes are addressed by the model
    /// identifier alone and produce no segment.
    pub fn effective_language(&self) -> Option<&str> {
        self.language
            .as_deref()
            .filter(|lang| !lang.is_empty() && !DEFAULT_LANGUAGES.contains(lang))
    }

    /// Resolve the root URL: `<base>/[gpu/][async/][<lang>/]<model>`.
    pub fn root_url(&self) -> String {
        let mut url = self.base_url.trim_end_matches('/').to_string();
        url.push('/');
        if self.gpu {
            url.push_str("gpu/");
        }
        if self.async_mode {
            url.push_str("async/");
        }
        if let Some(lang) = self.effective_language() {
            url.push_str(lang);
            url.push('/');
        }
        url.push_str(&self.model);
        url
    }

    /// Load configuration from a JSON file.
    pub fn from_file(path: &PathBuf) -> Result<Self> {
        let config = Self::read_file(path)?;
        config.validate()?;
        Ok(config)
    }

    fn read_file(path: &PathBuf) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| NlpCloudError::ConfigFileRead {
            path: path.clone(),
            source: e,
        })?;

        serde_json::from_str(&content).map_err(NlpCloudError::ConfigParse)
    }

    /// Load configuration from `NLPCLOUD_*` environment variables.
    pub fn from_env() -> Result<Self> {
        let model = std::env::var("NLPCLOUD_MODEL").unwrap_or_default();
        let token = std::env::var("NLPCLOUD_TOKEN").unwrap_or_default();

        let mut config = Self::new(model, token)
            .gpu(env_flag("NLPCLOUD_GPU"))
            .async_mode(env_flag("NLPCLOUD_ASYNC"));
        config.language = std::env::var("NLPCLOUD_LANG").ok();
        if let Ok(base_url) = std::env::var("NLPCLOUD_BASE_URL") {
            config.base_url = base_url;
        }
        if let Ok(timeout) = std::env::var("NLPCLOUD_TIMEOUT") {
            config.timeout = humantime_serde::parse(&timeout).map_err(|e| {
                NlpCloudError::InvalidConfig(format!("NLPCLOUD_TIMEOUT: {e}"))
            })?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Create configuration from CLI arguments.
    pub fn from_args(args: &Args) -> Result<Self> {
        let config = Self::merge_args(args)?;
        config.validate()?;
        Ok(config)
    }

    /// Create configuration for polling async job URLs.
    ///
    /// Job URLs already name the model, so only the connection settings
    /// are checked.
    pub fn from_args_for_polling(args: &Args) -> Result<Self> {
        let config = Self::merge_args(args)?;
        config.validate_connection()?;
        Ok(config)
    }

    fn merge_args(args: &Args) -> Result<Self> {
        // A file may omit fields the CLI supplies, so it is validated only after merging
        let mut config = if let Some(config_path) = &args.config {
            Self::read_file(config_path)?
        } else {
            Self::new(String::new(), String::new())
        };

        // Override with CLI args
        if let Some(model) = &args.model {
            config.model = model.clone();
        }
        if let Some(token) = &args.token {
            config.token = token.clone();
        }
        if args.gpu {
            config.gpu = true;
        }
        if args.async_mode {
            config.async_mode = true;
        }
        if let Some(lang) = &args.lang {
            config.language = Some(lang.clone());
        }
        if let Some(base_url) = &args.base_url {
            config.base_url = base_url.clone();
        }
        if let Some(timeout) = args.timeout {
            config.timeout = Duration::from_secs(timeout);
        }

        Ok(config)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.model.is_empty() {
            return Err(NlpCloudError::InvalidConfig(
                "model cannot be empty".to_string(),
            ));
        }
        self.validate_connection()
    }

    /// Validate everything but the model: token, base URL and timeout.
    pub fn validate_connection(&self) -> Result<()> {
        if self.token.is_empty() {
            return Err(NlpCloudError::InvalidConfig(
                "token cannot be empty".to_string(),
            ));
        }
        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(NlpCloudError::InvalidConfig(format!(
                "base URL must be http(s), got '{}'",
                self.base_url
            )));
        }
        if self.timeout.is_zero() {
            return Err(NlpCloudError::InvalidConfig(
                "timeout must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}

fn env_flag(name: &str) -> bool {
    std::env::var(name).is_ok_and(|v| {
        matches!(
            v.trim().to_ascii_lowercase().as_str(),
            "1" | "true" | "yes" | "on"
        )
    })
}

/// Serde support for durations written as `"30s"`, `"500ms"` or bare seconds.
mod humantime_serde {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        if duration.subsec_millis() == 0 {
            serializer.serialize_str(&format!("{}s", duration.as_secs()))
        } else {
            serializer.serialize_str(&format!("{}ms", duration.as_millis()))
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        parse(&s).map_err(serde::de::Error::custom)
    }

    pub fn parse(s: &str) -> Result<Duration, std::num::ParseIntError> {
        let s = s.trim();
        // "ms" must be checked before "s"
        if let Some(ms) = s.strip_suffix("ms") {
            ms.trim().parse::<u64>().map(Duration::from_millis)
        } else if let Some(secs) = s.strip_suffix('s') {
            secs.trim().parse::<u64>().map(Duration::from_secs)
        } else {
            s.parse::<u64>().map(Duration::from_secs)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn base(model: &str) -> ClientConfig {
        ClientConfig::new(model, "token")
    }

    #[test]
    fn test_root_url_plain() {
        assert_eq!(
            base("en_core_web_lg").root_url(),
            "https://api.nlpcloud.io/v1/en_core_web_lg"
        );
    }

    #[test]
    fn test_root_url_default_languages_are_omitted() {
        for lang in ["", "en", "eng_Latn"] {
            let config = base("bart-large-cnn").language(lang);
            assert_eq!(
                config.root_url(),
                "https://api.nlpcloud.io/v1/bart-large-cnn",
                "language {lang:?} should not produce a segment"
            );
        }
    }

    #[test]
    fn test_root_url_language_precedes_model() {
        let config = base("bart-large-cnn").language("fra_Latn");
        assert_eq!(
            config.root_url(),
            "https://api.nlpcloud.io/v1/fra_Latn/bart-large-cnn"
        );
    }

    #[test]
    fn test_root_url_segment_order() {
        let cases = [
            (false, false, None, "https://api.nlpcloud.io/v1/m"),
            (true, false, None, "https://api.nlpcloud.io/v1/gpu/m"),
            (false, true, None, "https://api.nlpcloud.io/v1/async/m"),
            (true, true, None, "https://api.nlpcloud.io/v1/gpu/async/m"),
            (true, false, Some("de"), "https://api.nlpcloud.io/v1/gpu/de/m"),
            (false, true, Some("de"), "https://api.nlpcloud.io/v1/async/de/m"),
            (true, true, Some("jpn_Jpan"), "https://api.nlpcloud.io/v1/gpu/async/jpn_Jpan/m"),
            (true, true, Some("en"), "https://api.nlpcloud.io/v1/gpu/async/m"),
        ];

        for (gpu, async_mode, lang, expected) in cases {
            let mut config = base("m").gpu(gpu).async_mode(async_mode);
            config.language = lang.map(str::to_string);
            let url = config.root_url();
            assert_eq!(url, expected);
            assert!(url.matches("gpu/").count() <= 1);
            assert!(url.matches("async/").count() <= 1);
        }
    }

    #[test]
    fn test_root_url_base_override_trailing_slash() {
        let config = base("m").base_url("http://127.0.0.1:8080/v1/");
        assert_eq!(config.root_url(), "http://127.0.0.1:8080/v1/m");
    }

    #[test]
    fn test_root_url_empty_model_is_not_rejected() {
        let config = base("").gpu(true).async_mode(true).language("fr");
        assert_eq!(config.root_url(), "https://api.nlpcloud.io/v1/gpu/async/fr/");
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_debug_redacts_token() {
        let rendered = format!("{:?}", ClientConfig::new("m", "super-secret"));
        assert!(!rendered.contains("super-secret"));
        assert!(rendered.contains("<redacted>"));
    }

    #[test]
    fn test_validate() {
        assert!(base("m").validate().is_ok());
        assert!(ClientConfig::new("m", "").validate().is_err());
        assert!(base("m").base_url("ftp://example.com").validate().is_err());
        assert!(base("m").timeout(Duration::ZERO).validate().is_err());
    }

    #[test]
    fn test_from_file_with_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"model": "finetuned-llama-3-70b", "token": "abc", "gpu": true, "async": true, "timeout": "45s"}}"#
        )
        .unwrap();

        let config = ClientConfig::from_file(&file.path().to_path_buf()).unwrap();
        assert_eq!(config.model, "finetuned-llama-3-70b");
        assert!(config.gpu);
        assert!(config.async_mode);
        assert_eq!(config.language, None);
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.timeout, Duration::from_secs(45));
    }

    #[test]
    fn test_from_file_missing() {
        let err = ClientConfig::from_file(&PathBuf::from("/nonexistent/nlpcloud.json")).unwrap_err();
        assert!(matches!(err, NlpCloudError::ConfigFileRead { .. }));
    }

    #[test]
    fn test_from_args_overrides_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"model": "from-file", "token": "file-token"}}"#).unwrap();

        let args = Args {
            model: Some("from-cli".to_string()),
            lang: Some("fra_Latn".to_string()),
            timeout: Some(5),
            config: Some(file.path().to_path_buf()),
            ..Default::default()
        };

        let config = ClientConfig::from_args(&args).unwrap();
        assert_eq!(config.model, "from-cli");
        assert_eq!(config.token, "file-token");
        assert_eq!(config.language.as_deref(), Some("fra_Latn"));
        assert_eq!(config.timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_from_args_requires_token() {
        let args = Args {
            model: Some("m".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            ClientConfig::from_args(&args),
            Err(NlpCloudError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_from_args_for_polling_needs_no_model() {
        let args = Args {
            token: Some("abc".to_string()),
            ..Default::default()
        };
        let config = ClientConfig::from_args_for_polling(&args).unwrap();
        assert!(config.model.is_empty());
        assert_eq!(config.token, "abc");

        assert!(ClientConfig::from_args(&args).is_err());
        assert!(matches!(
            ClientConfig::from_args_for_polling(&Args::default()),
            Err(NlpCloudError::InvalidConfig(_))
        ));
    }

    #[derive(clap::Parser, Debug)]
    struct Cli {
        #[command(flatten)]
        args: Args,
    }

    #[test]
    fn test_flags_accept_the_same_env_values_as_from_env() {
        use clap::Parser;

        // SAFETY: no other test reads or writes NLPCLOUD_GPU or NLPCLOUD_ASYNC
        unsafe {
            std::env::set_var("NLPCLOUD_GPU", "1");
            std::env::set_var("NLPCLOUD_ASYNC", "yes");
        }
        let parsed = Cli::try_parse_from(["nlpcloud"]);
        let gpu = env_flag("NLPCLOUD_GPU");
        let async_mode = env_flag("NLPCLOUD_ASYNC");
        unsafe {
            std::env::set_var("NLPCLOUD_ASYNC", "off");
        }
        let off = Cli::try_parse_from(["nlpcloud"]);
        unsafe {
            std::env::remove_var("NLPCLOUD_GPU");
            std::env::remove_var("NLPCLOUD_ASYNC");
        }

        let args = parsed.unwrap().args;
        assert!(args.gpu && gpu);
        assert!(args.async_mode && async_mode);
        assert!(!off.unwrap().args.async_mode);

        let flag = Cli::try_parse_from(["nlpcloud", "--gpu", "-v"]).unwrap().args;
        assert!(flag.gpu);
        assert!(flag.verbose);
    }

    #[test]
    fn test_duration_parsing() {
        assert_eq!(humantime_serde::parse("30s").unwrap(), Duration::from_secs(30));
        assert_eq!(humantime_serde::parse("250ms").unwrap(), Duration::from_millis(250));
        assert_eq!(humantime_serde::parse("12").unwrap(), Duration::from_secs(12));
        assert!(humantime_serde::parse("soon").is_err());
    }

    #[test]
    fn test_config_serializes_timeout_as_string() {
        let json = serde_json::to_value(base("m").timeout(Duration::from_millis(1500))).unwrap();
        assert_eq!(json["timeout"], "1500ms");
        assert_eq!(json["async"], false);
    }
}
