use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Base address of the article service
    #[arg(
        long,
        env = "ARTICLES_ENDPOINT",
        default_value = "http://localhost:5000"
    )]
    pub endpoint: String,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Fetch and print the article list
    List,
    /// Create a new article
    Add {
        #[arg(value_name = "TITLE")]
        title: String,
    },
    /// Mark an article done
    Done {
        #[arg(value_name = "ID")]
        id: String,
    },
    /// Undo an article's done mark
    Undo {
        #[arg(value_name = "ID")]
        id: String,
    },
    /// Delete an article
    Delete {
        #[arg(value_name = "ID")]
        id: String,
    },
    /// Launch TUI interface
    Tui,
}
