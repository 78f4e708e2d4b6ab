//! An in-memory count store for 17-base DNA k-mers.
//!
//! Loads `>COUNT`/`SEQUENCE` dump files produced by an external k-mer
//! counting tool into a three-level partitioned map (6/6/5 base prefixes)
//! and answers strand-aware count queries: a k-mer and its reverse
//! complement are treated as the same physical sequence read from either
//! strand.
//!
//! The store is load-once, query-many: created empty, filled by one or
//! more bulk loads that reject duplicates outright, then queried an
//! arbitrary number of times. It is single-threaded by design.
//!
//! # Example
//!
//! ```rust
//! use std::io::Cursor;
//! use kmerdict::{KmerStore, Seq17};
//!
//! let dump = ">5\nAAAAAAAAAAAAAAAAA\n>3\nGATTACAGATTACAGAT\n";
//!
//! let mut store = KmerStore::new();
//! let report = store.populate_reader(Cursor::new(dump), "example")?;
//! assert_eq!(report.entries_read, 2);
//!
//! // Forward hit.
//! let seq: Seq17 = "GATTACAGATTACAGAT".parse()?;
//! assert_eq!(store.lookup_canonical(&seq)?, 3);
//!
//! // Reverse-complement hit: only the forward strand is stored.
//! let rc = seq.reverse_complement();
//! assert_eq!(store.lookup_canonical(&rc)?, 3);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod cli;
pub mod dump;
pub mod error;
pub mod histogram;
pub mod progress;
pub mod sequence;
pub mod store;

pub use dump::{DumpReader, LoadReport};
pub use error::{DuplicateSeq, KmerDictError, SequenceError};
pub use progress::{ClearProgress, ProgressSchedule};
pub use sequence::{Base, Seq17, KMER_LEN};
pub use store::KmerStore;
