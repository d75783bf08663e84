use clap::{Parser, Subcommand, ValueEnum};
use rentstore::commands::search::SearchField;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "rentstore", version)]
#[command(about = "Rental records and unpopular-inventory reports for a game store", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Directory holding the store's tables (default: $RENTSTORE_DATA_DIR or the OS data dir)
    #[arg(short, long, global = true, value_name = "DIR")]
    pub data_dir: Option<PathBuf>,

    /// Verbose output (debug logging on stderr)
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum SearchBy {
    Platform,
    Genre,
    Title,
}

impl From<SearchBy> for SearchField {
    fn from(by: SearchBy) -> Self {
        match by {
            SearchBy::Platform => SearchField::Platform,
            SearchBy::Genre => SearchField::Genre,
            SearchBy::Title => SearchField::Title,
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Rent a game copy to a subscriber
    Rent {
        /// ID of the game copy
        copy_id: String,

        /// ID of the renting member
        renter_id: String,

        /// Rental date (YYYY-MM-DD), today if omitted
        #[arg(long, value_name = "DATE")]
        on: Option<String>,
    },

    /// Return a rented game copy
    Return {
        /// ID of the game copy
        copy_id: String,

        /// Return date (YYYY-MM-DD), today if omitted
        #[arg(long, value_name = "DATE")]
        on: Option<String>,
    },

    /// Remove a game copy from the catalog
    Prune {
        /// ID of the game copy
        copy_id: String,

        /// Also delete the copy's rental history
        #[arg(long)]
        history: bool,
    },

    /// Search the catalog
    #[command(alias = "s")]
    Search {
        /// Search term, matched case-insensitively
        term: String,

        /// Column to search
        #[arg(short, long, value_enum, default_value = "title")]
        by: SearchBy,
    },

    /// Show a game copy and its rental history
    Show {
        /// ID of the game copy
        copy_id: String,
    },

    /// Record a customer rating for a game copy
    Feedback {
        /// ID of the game copy
        copy_id: String,

        /// Rating from 1 to 5
        rating: u8,

        /// Optional comment
        #[arg(default_value = "")]
        comment: String,
    },

    /// Store averages and the games flagged as unpopular
    Report {
        /// Reference date for recency (YYYY-MM-DD), today if omitted
        #[arg(long, value_name = "DATE")]
        on: Option<String>,
    },
}
