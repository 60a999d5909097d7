use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::Mutex;

use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt::writer::BoxMakeWriter, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use vocab_quiz::data::JsonBookStore;
use vocab_quiz::{App, Config, Launch, QuizError, QuizMode, WordPoolProvider};

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// TOML config file (defaults to ./vocab-quiz.toml when present)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Directory holding the <id>.json word books
    #[arg(short, long)]
    books: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start a quiz on a book right away
    Quiz {
        #[arg(long)]
        book: String,
        /// mixed, en-native, native-en, audio or spelling
        #[arg(short, long, default_value_t = QuizMode::Mixed)]
        mode: QuizMode,
    },
    /// Run through a book's flashcards
    Learn {
        #[arg(long)]
        book: String,
        /// Include words already marked as learned
        #[arg(long)]
        all: bool,
    },
    /// List the available books
    Books,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    if let Err(e) = run(args).await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run(args: Args) -> Result<(), QuizError> {
    let mut config = Config::load(args.config.as_deref())?;
    if let Some(books) = args.books {
        config.books_dir = books;
    }
    init_tracing(&config)?;

    let launch = match args.command {
        Some(Command::Books) => return list_books(&config),
        Some(Command::Quiz { book, mode }) => Launch::Quiz { book_id: book, mode },
        Some(Command::Learn { book, all }) => Launch::Learn {
            book_id: book,
            include_learned: all,
        },
        None => Launch::Select,
    };

    tracing::info!(books_dir = %config.books_dir.display(), "Starting");
    let mut app = App::from_config(&config);
    app.launch(launch);
    vocab_quiz::run(app).await
}

fn list_books(config: &Config) -> Result<(), QuizError> {
    let store = JsonBookStore::new(&config.books_dir);
    let books = store.books()?;
    if books.is_empty() {
        println!("No books in {}", config.books_dir.display());
        return Ok(());
    }

    for book in books {
        println!(
            "{:<20} {:<30} {:>4} words  {:>4} learned",
            book.id, book.name, book.word_count, book.learned_count
        );
    }
    Ok(())
}

/// The TUI owns stdout, so logs go to the configured file or nowhere.
fn init_tracing(config: &Config) -> Result<(), QuizError> {
    let writer = match &config.log_file {
        Some(path) => {
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            BoxMakeWriter::new(Mutex::new(file))
        }
        None => BoxMakeWriter::new(std::io::sink),
    };

    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("vocab_quiz=info")),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(writer)
                .with_ansi(false),
        )
        .init();
    Ok(())
}
