//! NLP Cloud CLI - call the API from the command line.
//!
//! Run `nlpcloud --help` for usage information.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use console::style;
use nlpcloud::{
    Args, AsyncJob, ChatbotParams, ClassificationParams, Client, ClientConfig, EntitiesParams,
    GenerationParams, ResponseStream, SummarizationParams, TextParams, TranslationParams,
};
use serde::Serialize;
use tokio::io::{AsyncWriteExt, stdout};
use tracing::{Level, debug, error, info};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser, Debug)]
#[command(
    name = "nlpcloud",
    version,
    about = "Command-line client for the NLP Cloud API",
    after_help = "EXAMPLES:\n    \
        nlpcloud -m en_core_web_lg entities \"John Doe works for Microsoft in Seattle.\"\n    \
        nlpcloud -m finetuned-llama-3-70b --gpu generation --stream \"Write a haiku about Rust\"\n    \
        nlpcloud -m bart-large-cnn --async summarization \"$(cat article.txt)\"\n    \
        nlpcloud async-result https://api.nlpcloud.io/v1/get-async-result/21718218-42e8-4be9-a67f-b7e18e03b436"
)]
struct Cli {
    #[command(flatten)]
    args: Args,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Extract named entities
    Entities {
        /// Input text
        text: String,
        /// Entity to look for (generative models)
        #[arg(long)]
        searched_entity: Option<String>,
    },
    /// Classify a block of text
    Classification {
        /// Input text
        text: String,
        /// Candidate labels, comma separated
        #[arg(long, value_delimiter = ',')]
        labels: Vec<String>,
        /// Allow several labels to apply
        #[arg(long)]
        multi_class: bool,
    },
    /// Generate text from a prompt
    Generation {
        /// Prompt
        text: String,
        /// Maximum number of generated tokens
        #[arg(long)]
        max_length: Option<u32>,
        /// Print tokens as they are generated
        #[arg(long)]
        stream: bool,
    },
    /// Talk to a conversational model
    Chatbot {
        /// User input
        input: String,
        /// Conversation context
        #[arg(long)]
        context: Option<String>,
        /// Print the answer as it is generated
        #[arg(long)]
        stream: bool,
    },
    /// Summarize a block of text
    Summarization {
        /// Input text
        text: String,
        /// "small" or "large"
        #[arg(long)]
        size: Option<String>,
    },
    /// Translate a block of text
    Translation {
        /// Input text
        text: String,
        /// Target language (e.g. fra_Latn)
        #[arg(long)]
        target: String,
        /// Source language, detected when absent
        #[arg(long)]
        source: Option<String>,
    },
    /// Sentiment analysis
    Sentiment {
        /// Input text
        text: String,
    },
    /// Show the versions of the libraries behind the model
    Versions,
    /// Fetch the result of an async job
    AsyncResult {
        /// URL returned when the job was submitted
        url: String,
    },
    /// POST a raw JSON body to any endpoint
    Call {
        /// Endpoint path, e.g. "kw-kp-extraction"
        endpoint: String,
        /// JSON parameters
        json: String,
        /// Stream the response body
        #[arg(long)]
        stream: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    setup_logging(&cli.args);

    // async-result only needs the token; the model is part of the job URL
    let loaded = if matches!(cli.command, Command::AsyncResult { .. }) {
        ClientConfig::from_args_for_polling(&cli.args)
    } else {
        ClientConfig::from_args(&cli.args)
    };

    let config = match loaded {
        Ok(c) => c,
        Err(e) => {
            error!("Configuration error: {}", e);
            eprintln!("{} {}", style("Error:").red().bold(), e);
            std::process::exit(1);
        }
    };

    let client = Client::new(config)?;
    debug!(root_url = client.root_url(), "Client ready");

    if let Err(e) = run(&client, cli.command).await {
        error!("Request failed: {:#}", e);
        eprintln!("{} {:#}", style("Error:").red().bold(), e);
        std::process::exit(1);
    }

    Ok(())
}

async fn run(client: &Client, command: Command) -> Result<()> {
    let async_mode = client.config().async_mode;

    match command {
        Command::Entities {
            text,
            searched_entity,
        } => {
            let mut params = EntitiesParams::new(text);
            params.searched_entity = searched_entity;
            if async_mode {
                return submit(client, "entities", &params).await;
            }
            print_json(&client.entities(&params).await?)
        }
        Command::Classification {
            text,
            labels,
            multi_class,
        } => {
            let mut params = ClassificationParams::new(text);
            if !labels.is_empty() {
                params = params.with_labels(labels);
            }
            if multi_class {
                params = params.multi_class(true);
            }
            if async_mode {
                return submit(client, "classification", &params).await;
            }
            print_json(&client.classification(&params).await?)
        }
        Command::Generation {
            text,
            max_length,
            stream,
        } => {
            let mut params = GenerationParams::new(text);
            params.max_length = max_length;
            if stream {
                copy_stream(client.streaming_generation(&params).await?).await
            } else if async_mode {
                submit(client, "generation", &params).await
            } else {
                print_json(&client.generation(&params).await?)
            }
        }
        Command::Chatbot {
            input,
            context,
            stream,
        } => {
            let mut params = ChatbotParams::new(input);
            params.context = context;
            if stream {
                copy_stream(client.streaming_chatbot(&params).await?).await
            } else if async_mode {
                submit(client, "chatbot", &params).await
            } else {
                print_json(&client.chatbot(&params).await?)
            }
        }
        Command::Summarization { text, size } => {
            let params = SummarizationParams { text, size };
            if async_mode {
                return submit(client, "summarization", &params).await;
            }
            print_json(&client.summarization(&params).await?)
        }
        Command::Translation {
            text,
            target,
            source,
        } => {
            let mut params = TranslationParams::new(text, target);
            params.source = source;
            if async_mode {
                return submit(client, "translation", &params).await;
            }
            print_json(&client.translation(&params).await?)
        }
        Command::Sentiment { text } => {
            let params = TextParams::new(text);
            if async_mode {
                return submit(client, "sentiment", &params).await;
            }
            print_json(&client.sentiment(&params).await?)
        }
        Command::Versions => print_json(&client.versions().await?),
        Command::AsyncResult { url } => match client.async_result(&url).await? {
            Some(result) => print_json(&result),
            None => {
                info!(url = %url, "Job still running");
                eprintln!("{} job is still running", style("…").yellow().bold());
                Ok(())
            }
        },
        Command::Call {
            endpoint,
            json,
            stream,
        } => {
            let params: serde_json::Value =
                serde_json::from_str(&json).context("parameters must be valid JSON")?;
            if stream {
                copy_stream(client.call_streaming(&endpoint, &params).await?).await
            } else {
                let response: serde_json::Value = client.call(&endpoint, &params).await?;
                print_json(&response)
            }
        }
    }
}

/// Submit an async job and print its receipt.
async fn submit<P: Serialize + Sync>(client: &Client, endpoint: &str, params: &P) -> Result<()> {
    let job: AsyncJob = client.call(endpoint, params).await?;
    info!(endpoint, url = %job.url, "Async job submitted");
    print_json(&job)
}

async fn copy_stream(mut stream: ResponseStream) -> Result<()> {
    let mut out = stdout();
    while let Some(chunk) = stream.next_chunk().await? {
        out.write_all(&chunk).await?;
        out.flush().await?;
    }
    out.write_all(b"\n").await?;
    Ok(())
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn setup_logging(args: &Args) {
    let level = if args.verbose { Level::DEBUG } else { Level::WARN };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("nlpcloud={level}")));

    if args.json_logs {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_thread_ids(false)
                    .with_writer(std::io::stderr)
                    .compact(),
            )
            .init();
    }
}
