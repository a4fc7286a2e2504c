//! Dagbok - Voice Journal Transcription and RAG
//!
//! A CLI voice journal: record audio entries, have them transcribed, and ask
//! natural-language questions answered from your accumulated transcripts.
//!
//! The name "Dagbok" comes from the Norwegian word for "diary."
//!
//! # Overview
//!
//! Dagbok allows you to:
//! - Ingest audio journal entries and transcribe them via an external service
//! - Build a similarity index over all transcripts
//! - Ask questions and get grounded answers from your journal history
//!
//! # Architecture
//!
//! The library is organized into several modules:
//!
//! - `config` - Configuration management
//! - `object_store` - Audio object upload abstraction
//! - `transcription` - Transcription service interface and job polling
//! - `store` - Durable transcript storage
//! - `embedding` - Embedding generation
//! - `index` - Flat L2 similarity index and build/persist/load
//! - `completion` - Chat completion abstraction
//! - `rag` - Retrieval engine for question answering
//! - `orchestrator` - Ingestion pipeline coordination
//!
//! # Example
//!
//! ```rust,no_run
//! use dagbok::config::Settings;
//! use dagbok::orchestrator::Orchestrator;
//! use tokio_util::sync::CancellationToken;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let settings = Settings::load()?;
//!     let orchestrator = Orchestrator::new(&settings)?;
//!
//!     let entry = orchestrator
//!         .ingest("morning_note.wav".as_ref(), &CancellationToken::new())
//!         .await?;
//!     println!("Stored entry {}", entry.entry_id);
//!
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod completion;
pub mod config;
pub mod embedding;
pub mod error;
pub mod index;
pub mod object_store;
pub mod openai;
pub mod orchestrator;
pub mod rag;
pub mod store;
pub mod transcription;

pub use error::{DagbokError, ErrorKind, Result};
