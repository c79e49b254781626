use clap::{Parser, Subcommand};
use faqx_api::{RestApi, EMPTY_QUERY_WARNING};
use faqx_core::{Error, DEFAULT_EMBEDDING_DIM};
use faqx_providers::{
    OpenAiClient, OpenAiConfig, RetryConfig, DEFAULT_BASE_URL, DEFAULT_CHAT_MODEL,
    DEFAULT_EMBEDDING_MODEL,
};
use faqx_similarity::{
    AnswerComposer, FaqAssistant, FaqMatcher, MatchOptions, DEFAULT_MIN_TEXT_SIMILARITY,
    DEFAULT_THRESHOLD,
};
use faqx_storage::{load_knowledge_base, StorageConfig};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

/// Answers product questions from a curated FAQ catalog
#[derive(Parser, Debug)]
#[command(name = "faqx")]
#[command(about = "Product FAQ matching engine", long_about = None)]
struct Args {
    /// CSV catalog with product_id, product_name, question, answer columns
    #[arg(long, env = "FAQX_CATALOG", default_value = "qa_data.csv", global = true)]
    catalog: PathBuf,

    /// Index artifact (Annoy or native faqx format), one vector per catalog row
    #[arg(long, env = "FAQX_INDEX", default_value = "qa_embeddings.ann", global = true)]
    index: PathBuf,

    /// Embedding width
    #[arg(long, default_value_t = DEFAULT_EMBEDDING_DIM, global = true)]
    dim: usize,

    /// Largest Euclidean distance a match may have
    #[arg(long, default_value_t = DEFAULT_THRESHOLD, global = true)]
    threshold: f64,

    /// Smallest lexical similarity a match may have
    #[arg(long, default_value_t = DEFAULT_MIN_TEXT_SIMILARITY, global = true)]
    min_text_similarity: f32,

    /// Base URL of the OpenAI-compatible API
    #[arg(long, env = "OPENAI_BASE_URL", default_value = DEFAULT_BASE_URL, global = true)]
    base_url: String,

    /// API key sent as a bearer token
    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true, global = true)]
    api_key: Option<String>,

    #[arg(long, default_value = DEFAULT_EMBEDDING_MODEL, global = true)]
    embedding_model: String,

    #[arg(long, default_value = DEFAULT_CHAT_MODEL, global = true)]
    chat_model: String,

    /// Retries for transient collaborator failures
    #[arg(long, default_value_t = 2, global = true)]
    max_retries: u32,

    /// Per-request collaborator timeout
    #[arg(long, default_value_t = 30, global = true)]
    timeout_secs: u64,

    /// Log level
    #[arg(long, default_value = "info", global = true)]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Serve the REST API
    Serve {
        /// HTTP API port
        #[arg(long, default_value_t = 8080)]
        port: u16,
    },
    /// Answer one question and exit
    Ask {
        #[arg(long)]
        product: String,
        query: String,
    },
    /// List the products in the catalog
    Products,
    /// List the questions known for a product
    Questions {
        #[arg(long)]
        product: String,
    },
}

fn build_assistant(args: &Args) -> anyhow::Result<FaqAssistant> {
    let storage = StorageConfig::new(&args.catalog, &args.index).with_dim(args.dim);
    let knowledge = load_knowledge_base(&storage)?;

    let mut config = OpenAiConfig::default()
        .with_base_url(&args.base_url)
        .with_timeout(Duration::from_secs(args.timeout_secs))
        .with_retry(RetryConfig::default().with_max_retries(args.max_retries));
    if let Some(key) = &args.api_key {
        config = config.with_api_key(key);
    }
    config.embedding_model = args.embedding_model.clone();
    config.chat_model = args.chat_model.clone();
    let client = Arc::new(OpenAiClient::new(config)?);

    let options = MatchOptions::default()
        .with_threshold(args.threshold)
        .with_min_text_similarity(args.min_text_similarity);
    let matcher = FaqMatcher::new(knowledge, client.clone()).with_options(options)?;

    Ok(FaqAssistant::new(matcher, AnswerComposer::new(client)))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let log_level = match args.log_level.as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("Starting faqx v{}", env!("CARGO_PKG_VERSION"));
    let assistant = Arc::new(build_assistant(&args)?);

    match args.command {
        Command::Serve { port } => serve(assistant, port).await,
        Command::Ask { product, query } => {
            match assistant.answer(&query, &product).await {
                Ok(answer) => {
                    println!("{}", answer.text);
                    if let Some(question) = answer.matched_question {
                        info!("Matched question: {:?}", question);
                    }
                }
                Err(Error::EmptyQuery) => println!("{}", EMPTY_QUERY_WARNING),
                Err(e) => return Err(e.into()),
            }
            Ok(())
        }
        Command::Products => {
            for (product_id, name) in assistant.products() {
                println!("{}\t{}", product_id, name);
            }
            Ok(())
        }
        Command::Questions { product } => match assistant.questions(&product) {
            Some(questions) => {
                for question in questions {
                    println!("{}", question);
                }
                Ok(())
            }
            None => anyhow::bail!("unknown product {:?}", product),
        },
    }
}

async fn serve(assistant: Arc<FaqAssistant>, port: u16) -> anyhow::Result<()> {
    info!("Starting HTTP server on port {}", port);
    let http_handle = RestApi::spawn(assistant, port);

    info!("HTTP API: http://localhost:{}/", port);

    tokio::select! {
        _ = tokio::signal::ctrl_c() => {
            info!("Shutdown signal received");
        }
        joined = tokio::task::spawn_blocking(move || http_handle.join()) => {
            match joined? {
                Ok(Ok(())) => info!("HTTP server stopped"),
                Ok(Err(e)) => {
                    return Err(anyhow::Error::new(e)
                        .context(format!("HTTP server on port {} failed", port)));
                }
                Err(_) => anyhow::bail!("HTTP server thread panicked"),
            }
        }
    }

    info!("Shutting down...");
    Ok(())
}
