pub mod index;
pub mod persist;
pub mod query;
pub mod spell;
pub mod tokenizer;

pub use index::{DocId, DocMeta, IndexBuilder, Posting, SearchIndex, SharedIndex, TeaserSource, TermId};
pub use query::{QueryEngine, QueryOutcome, SearchHit};

use thiserror::Error;

/// Errors raised by index persistence. Everything else in this crate is
/// infallible by construction: tokenization and querying degrade to empty
/// results instead of failing.
#[derive(Debug, Error)]
pub enum IndexError {
    #[error("index destination {0} already exists (pass force to overwrite)")]
    DestinationExists(String),

    #[error("unsupported index format version {found} (expected {expected})")]
    VersionMismatch { found: u32, expected: u32 },

    #[error("index io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("index encoding error: {0}")]
    Encoding(#[from] bincode::Error),

    #[error("index meta error: {0}")]
    Meta(#[from] serde_json::Error),
}
