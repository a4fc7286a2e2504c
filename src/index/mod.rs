//! Similarity index over the transcript corpus.
//!
//! The index is always rebuilt from the full corpus: every entry with a
//! non-empty transcription is embedded, in scan order, into a flat L2 index.
//! Position `i` in the index, the document list, and the raw vector matrix
//! always refer to the same entry; the three are persisted and loaded as one
//! atomic artifact set.

mod builder;
mod flat;

pub use builder::{IndexBuilder, VectorIndex};
pub use flat::FlatIndex;
