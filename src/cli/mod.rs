//! CLI module for dagbok.

pub mod commands;
pub mod output;

pub use output::Output;

use clap::{Parser, Subcommand};

/// Dagbok - Voice Journal Transcription and RAG
///
/// A CLI voice journal: transcribe audio entries and ask questions over them.
/// The name "Dagbok" comes from the Norwegian word for "diary."
#[derive(Parser, Debug)]
#[command(name = "dagbok")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Ingest an audio recording as a new journal entry
    Ingest {
        /// Path to the local audio file
        file: String,
    },

    /// Rebuild the similarity index from all stored entries
    Rebuild,

    /// Ask a question answered from your journal history
    Ask {
        /// The question to ask
        question: String,

        /// LLM model to use for answer generation
        #[arg(short, long)]
        model: Option<String>,

        /// Number of nearest entries to retrieve
        #[arg(short = 'k', long)]
        top_k: Option<usize>,
    },

    /// Start an interactive question loop
    Chat {
        /// LLM model to use
        #[arg(short, long)]
        model: Option<String>,
    },

    /// List stored journal entries
    List,

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Show configuration file path
    Path,
}
