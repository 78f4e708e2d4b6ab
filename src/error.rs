//! Error types for kmerdict.
//!
//! Load-time failures (malformed dump records, duplicates, unreadable
//! sources) abort the operation that hit them; a lookup miss is an ordinary
//! outcome callers handle, not a fault.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

use crate::sequence::{Seq17, KMER_LEN};

/// Errors that can occur in kmerdict operations.
#[derive(Debug, Error)]
pub enum KmerDictError {
    /// Dump stream violated the alternating header/sequence structure.
    #[error("malformed record in '{source_name}' at line {line}: {details}")]
    MalformedRecord {
        source_name: String,
        line: u64,
        details: String,
    },

    /// A header at end of stream had no sequence line after it.
    #[error("truncated record in '{source_name}': header '>{count}' has no sequence line")]
    TruncatedRecord { source_name: String, count: u64 },

    /// Sequence failed length or alphabet validation.
    #[error(transparent)]
    Sequence(#[from] SequenceError),

    /// The same sequence resolved to an already-occupied store path.
    #[error("duplicate entry for sequence {seq} in '{source_name}'")]
    DuplicateEntry { seq: Seq17, source_name: String },

    /// Neither the sequence nor its reverse complement is stored.
    #[error("sequence {seq} not found on either strand")]
    NotFound { seq: Seq17 },

    /// The input file could not be opened.
    #[error("cannot open '{path}': {source}")]
    SourceUnavailable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// An alignment record carried no `KS:i:` score tag.
    #[error("no KS:i: score tag in record from '{source_name}' at line {line}")]
    MissingScoreTag { source_name: String, line: u64 },

    /// I/O failure while reading or writing.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Failed to serialize JSON output.
    #[error("failed to serialize JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Error for a sequence that is not a valid 17-mer.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SequenceError {
    /// Wrong number of bases.
    #[error("sequence must be exactly {KMER_LEN} bases, got {len}")]
    InvalidLength { len: usize },

    /// A byte outside the {A, C, G, T} alphabet.
    #[error("invalid base 0x{base:02x} at position {position}")]
    InvalidBase { base: u8, position: usize },
}

/// Error for inserting a sequence the store already holds.
///
/// Raised by [`KmerStore::insert`](crate::store::KmerStore::insert); the
/// bulk loader attaches the source stream's identity and surfaces it as
/// [`KmerDictError::DuplicateEntry`].
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("duplicate entry for sequence {seq}")]
pub struct DuplicateSeq {
    /// The sequence that was already stored.
    pub seq: Seq17,
}
