//! Bookshelf CLI
//!
//! Command-line view over a Bookshelf library.

use clap::{Parser, Subcommand, ValueEnum};
use bookshelf::{BookRecord, Config, FileStore, Intent, Library, NewBook, Outcome, SearchField};
use tracing_subscriber::{fmt, EnvFilter};

/// Bookshelf CLI
#[derive(Parser, Debug)]
#[command(name = "bookshelf-cli")]
#[command(about = "Manage a small library catalog")]
#[command(version)]
struct Args {
    /// Data directory
    #[arg(short, long, default_value = "./bookshelf_data")]
    data_dir: String,

    /// Storage slot holding the catalog
    #[arg(short, long, default_value = "library_catalog")]
    slot: String,

    /// Skip fsync on writes
    #[arg(long)]
    no_sync: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Register a book
    Add {
        #[arg(long)]
        isbn: String,

        #[arg(long)]
        title: String,

        #[arg(long)]
        author: String,

        #[arg(long)]
        year: i32,
    },

    /// Remove a book
    Remove {
        /// ISBN of the book to remove
        isbn: String,
    },

    /// Lend or return a book
    Toggle {
        /// ISBN of the book
        isbn: String,
    },

    /// Show one book
    Get {
        /// ISBN of the book
        isbn: String,
    },

    /// Search books
    Search {
        /// Field to match against
        #[arg(short, long, value_enum, default_value = "title")]
        by: SearchBy,

        /// Search term (case-insensitive for title and author)
        term: String,
    },

    /// List every book
    List,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum SearchBy {
    Id,
    Title,
    Author,
}

impl From<SearchBy> for SearchField {
    fn from(by: SearchBy) -> Self {
        match by {
            SearchBy::Id => SearchField::Id,
            SearchBy::Title => SearchField::Title,
            SearchBy::Author => SearchField::Author,
        }
    }
}

impl From<Commands> for Intent {
    fn from(command: Commands) -> Self {
        match command {
            Commands::Add { isbn, title, author, year } => {
                Intent::Add(NewBook::new(isbn, title, author, year))
            }
            Commands::Remove { isbn } => Intent::Remove { isbn },
            Commands::Toggle { isbn } => Intent::Toggle { isbn },
            Commands::Get { isbn } => Intent::Get { isbn },
            Commands::Search { by, term } => Intent::Search { field: by.into(), term },
            Commands::List => Intent::ListAll,
        }
    }
}

fn main() {
    // Initialize tracing/logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn,bookshelf=info"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let config = Config::builder()
        .data_dir(&args.data_dir)
        .slot_name(&args.slot)
        .sync_writes(!args.no_sync)
        .build();

    let store = match FileStore::from_config(&config) {
        Ok(store) => store,
        Err(e) => {
            tracing::error!("Failed to open storage: {}", e);
            std::process::exit(1);
        }
    };

    let mut library = match Library::open(store, config) {
        Ok(library) => library,
        Err(e) => {
            tracing::error!("Failed to open catalog: {}", e);
            std::process::exit(1);
        }
    };

    if let Some(e) = &library.load_report().rejected {
        eprintln!("Warning: stored catalog was unreadable and has been set aside ({})", e);
    }

    match library.execute(args.command.into()) {
        Ok(outcome) => render(outcome),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}

fn render(outcome: Outcome) {
    let verb = match &outcome {
        Outcome::Added(_) => Some("Added"),
        Outcome::Removed(_) => Some("Removed"),
        Outcome::Toggled(_) => Some("Updated"),
        Outcome::Records(_) | Outcome::Record(_) => None,
    };

    let records = outcome.into_records();
    if records.is_empty() {
        println!("No books found.");
        return;
    }

    for record in &records {
        match verb {
            Some(verb) => println!("{}: {}", verb, render_line(record)),
            None => println!("{}", render_line(record)),
        }
    }
}

fn render_line(record: &BookRecord) -> String {
    let status = if record.available { "Available" } else { "On loan" };
    format!(
        "{} | {} | {} | {} | {}",
        record.isbn, record.title, record.author, record.year, status
    )
}
