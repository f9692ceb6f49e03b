//! bookworm-reader - drive the learning store from the command line
//!
//! Loads a user and a book collection from JSON files, applies the
//! requested selections, optionally asks the assistant, and prints the
//! final snapshot as JSON on stdout. Logs go to stderr.
//!
//! # Usage
//!
//! ```sh
//! bookworm-reader --user user.json --books books.json \
//!     --select-book 0 --select-chapter 1 --complete
//!
//! BOOKWORM_API_KEY=... bookworm-reader --user user.json --ask "Explain chapter one"
//! ```

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use bookworm_reader::{
    drive, AssistantAction, BookAction, EffectRunner, GenAiArgs, GenAiClient, LearnAction,
    LearningStore, NetworkError, ReduceError, UserAction,
};
use clap::Parser;
use thiserror::Error;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

/// Learning-app state driver
#[derive(Parser, Debug)]
#[command(name = "bookworm-reader")]
#[command(about = "Load learning content, apply actions and print the resulting state")]
struct Args {
    /// User JSON file (userId, userName, userLives, userInterests)
    #[arg(long, short)]
    user: Option<PathBuf>,

    /// Book collection JSON file (array of books)
    #[arg(long, short)]
    books: Option<PathBuf>,

    /// Add an interest to the loaded user (repeatable)
    #[arg(long = "interest")]
    interests: Vec<String>,

    /// Index of the book to select
    #[arg(long)]
    select_book: Option<usize>,

    /// Index of the chapter to select in the current book
    #[arg(long)]
    select_chapter: Option<usize>,

    /// Mark the current chapter as completed
    #[arg(long)]
    complete: bool,

    /// Prompt for the assistant
    #[arg(long)]
    ask: Option<String>,

    #[command(flatten)]
    genai: GenAiArgs,

    /// Log filter directive (tracing EnvFilter syntax)
    #[arg(long, env = "BOOKWORM_LOG", default_value = "info")]
    log_filter: String,
}

#[derive(Debug, Error)]
enum CliError {
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{} is not a JSON array of books: {source}", path.display())]
    Books {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("action rejected: {0}")]
    Reduce(#[from] ReduceError),

    #[error("assistant unavailable: {0}")]
    Client(#[from] NetworkError),

    #[error("failed to encode state: {0}")]
    Output(#[from] serde_json::Error),
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&args.log_filter))
        .with_writer(std::io::stderr)
        .init();

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Args) -> Result<(), CliError> {
    let mut store = LearningStore::default();

    if let Some(path) = &args.user {
        let json = read(path)?;
        store.dispatch(LearnAction::Loading)?;
        store.dispatch(LearnAction::FetchMockData(json))?;
    }

    if let Some(path) = &args.books {
        let json = read(path)?;
        let items: Vec<serde_json::Value> =
            serde_json::from_str(&json).map_err(|source| CliError::Books {
                path: path.clone(),
                source,
            })?;
        let items = items.iter().map(|item| item.to_string()).collect();
        store.dispatch(BookAction::FetchBooks(items))?;
    }

    for interest in args.interests {
        store.dispatch(UserAction::SelectInterest(interest))?;
    }
    if let Some(index) = args.select_book {
        store.dispatch(BookAction::SelectBook(index))?;
    }
    if let Some(index) = args.select_chapter {
        store.dispatch(BookAction::SelectChapter(index))?;
    }
    if args.complete {
        store.dispatch(BookAction::CompleteChapter)?;
    }

    if let Some(prompt) = args.ask {
        let client = GenAiClient::new(args.genai.into())?;
        ask(&mut store, client, prompt).await?;
    }

    let state = store.state();
    println!("{}", serde_json::to_string_pretty(&state.view())?);
    Ok(())
}

/// Dispatch `Ask` and run effects until the assistant settles.
async fn ask(
    store: &mut LearningStore,
    client: GenAiClient,
    prompt: String,
) -> Result<(), CliError> {
    let (action_tx, mut action_rx) = mpsc::unbounded_channel();
    let mut runner = EffectRunner::new(client, action_tx);

    let result = store.dispatch(AssistantAction::Ask(prompt))?;
    if !result.has_effects() {
        tracing::warn!("Blank prompt, nothing to ask");
        return Ok(());
    }
    for effect in result.effects {
        runner.handle(effect);
    }

    let shutdown = CancellationToken::new();
    let settled = shutdown.clone();
    let mut watcher = store.subscribe();
    let watch = tokio::spawn(async move {
        while let Some(snapshot) = watcher.changed().await {
            if !snapshot.is_loading {
                break;
            }
        }
        settled.cancel();
    });

    drive(store, &mut runner, &mut action_rx, shutdown).await;
    watch.abort();
    Ok(())
}

fn read(path: &Path) -> Result<String, CliError> {
    std::fs::read_to_string(path).map_err(|source| CliError::Read {
        path: path.to_path_buf(),
        source,
    })
}
