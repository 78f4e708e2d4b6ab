//! Bulk loading from k-mer dump streams.
//!
//! The dump format is two lines per record, strictly alternating:
//!
//! ```text
//! >COUNT
//! SEQUENCE
//! ```
//!
//! where `COUNT` is a non-negative integer and `SEQUENCE` is a 17-base
//! k-mer. The format carries no resynchronization marks, so parsing fails
//! fast on the first structural violation rather than attempting to skip a
//! record.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::time::{Duration, Instant};

use serde::Serialize;
use tracing::info;

use crate::error::KmerDictError;
use crate::sequence::Seq17;
use crate::store::KmerStore;

/// Summary of one completed bulk load.
#[derive(Debug, Clone, Serialize)]
pub struct LoadReport {
    /// Identity of the stream the records came from.
    pub source: String,
    /// Records read by this call.
    pub entries_read: u64,
    /// Entries in the store after this call, across all loads so far.
    pub total_entries: u64,
    /// Wall-clock time spent reading and inserting.
    pub elapsed: Duration,
    /// Estimated store footprint after this call, in bytes.
    pub estimated_bytes: usize,
}

/// Record-at-a-time reader for the dump format.
pub struct DumpReader<R> {
    reader: R,
    source: String,
    line: u64,
}

impl<R: BufRead> DumpReader<R> {
    /// Wraps `reader`, tagging errors with `source`.
    pub fn new(reader: R, source: impl Into<String>) -> Self {
        Self {
            reader,
            source: source.into(),
            line: 0,
        }
    }

    fn read_line(&mut self) -> Result<Option<String>, KmerDictError> {
        let mut line = String::new();
        if self.reader.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        self.line += 1;
        while line.ends_with('\n') || line.ends_with('\r') {
            line.pop();
        }
        Ok(Some(line))
    }

    fn malformed(&self, details: String) -> KmerDictError {
        KmerDictError::MalformedRecord {
            source_name: self.source.clone(),
            line: self.line,
            details,
        }
    }

    /// Reads the next `(count, sequence)` record, or `None` at end of
    /// stream.
    ///
    /// # Errors
    ///
    /// [`KmerDictError::MalformedRecord`] if the header does not start with
    /// `>`, the count is not a non-negative integer, or the sequence line
    /// is not a valid 17-mer; [`KmerDictError::TruncatedRecord`] if the
    /// stream ends between a header and its sequence line.
    pub fn next_record(&mut self) -> Result<Option<(u64, Seq17)>, KmerDictError> {
        let Some(header) = self.read_line()? else {
            return Ok(None);
        };
        let Some(count_text) = header.strip_prefix('>') else {
            return Err(self.malformed(format!("expected a '>' header, got {header:?}")));
        };
        let count: u64 = count_text
            .parse()
            .map_err(|_| self.malformed(format!("count {count_text:?} is not a non-negative integer")))?;

        let Some(seq_line) = self.read_line()? else {
            return Err(KmerDictError::TruncatedRecord {
                source_name: self.source.clone(),
                count,
            });
        };
        let seq: Seq17 = seq_line
            .parse()
            .map_err(|err| self.malformed(format!("bad sequence {seq_line:?}: {err}")))?;

        Ok(Some((count, seq)))
    }
}

impl<R: BufRead> Iterator for DumpReader<R> {
    type Item = Result<(u64, Seq17), KmerDictError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_record().transpose()
    }
}

impl KmerStore {
    /// Reads every record from `reader` into the store.
    ///
    /// Fails fast on the first malformed record or duplicate; records
    /// inserted before the failure stay in the store. Repeated calls
    /// accumulate, and the duplicate check spans all prior loads.
    ///
    /// # Errors
    ///
    /// Any [`DumpReader`] parse error, or
    /// [`KmerDictError::DuplicateEntry`] naming the offending sequence and
    /// `source`.
    pub fn populate_reader<R: BufRead>(
        &mut self,
        reader: R,
        source: &str,
    ) -> Result<LoadReport, KmerDictError> {
        let started = Instant::now();
        info!(source, "loading k-mer counts");

        let mut dump = DumpReader::new(reader, source);
        let mut entries_read = 0u64;
        while let Some((count, seq)) = dump.next_record()? {
            self.insert(seq, count)
                .map_err(|err| KmerDictError::DuplicateEntry {
                    seq: err.seq,
                    source_name: source.to_string(),
                })?;
            entries_read += 1;
        }

        let report = LoadReport {
            source: source.to_string(),
            entries_read,
            total_entries: self.len(),
            elapsed: started.elapsed(),
            estimated_bytes: self.estimate_size(),
        };
        info!(
            source,
            entries = report.entries_read,
            total = report.total_entries,
            elapsed = ?report.elapsed,
            estimated_bytes = report.estimated_bytes,
            "load complete"
        );
        Ok(report)
    }

    /// Opens `path` and loads it via
    /// [`populate_reader`](KmerStore::populate_reader).
    ///
    /// # Errors
    ///
    /// [`KmerDictError::SourceUnavailable`] if the file cannot be opened
    /// (before any insertion), otherwise as `populate_reader`.
    pub fn populate_path<P: AsRef<Path>>(&mut self, path: P) -> Result<LoadReport, KmerDictError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| KmerDictError::SourceUnavailable {
            path: path.to_path_buf(),
            source,
        })?;
        let source = path.display().to_string();
        self.populate_reader(BufReader::new(file), &source)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn reads_alternating_records() {
        let data = ">5\nAAAAAAAAAAAAAAAAA\n>3\nTTTTTTTTTTTTTTTTT\n";
        let mut reader = DumpReader::new(Cursor::new(data), "test");

        let (count, seq) = reader.next_record().unwrap().unwrap();
        assert_eq!(count, 5);
        assert_eq!(seq.as_str(), "AAAAAAAAAAAAAAAAA");

        let (count, seq) = reader.next_record().unwrap().unwrap();
        assert_eq!(count, 3);
        assert_eq!(seq.as_str(), "TTTTTTTTTTTTTTTTT");

        assert!(reader.next_record().unwrap().is_none());
    }

    #[test]
    fn tolerates_missing_trailing_newline() {
        let data = ">5\nAAAAAAAAAAAAAAAAA";
        let mut reader = DumpReader::new(Cursor::new(data), "test");
        let (count, _) = reader.next_record().unwrap().unwrap();
        assert_eq!(count, 5);
        assert!(reader.next_record().unwrap().is_none());
    }

    #[test]
    fn rejects_header_without_marker() {
        let data = "5\nAAAAAAAAAAAAAAAAA\n";
        let mut reader = DumpReader::new(Cursor::new(data), "test");
        let err = reader.next_record().unwrap_err();
        assert!(matches!(
            err,
            KmerDictError::MalformedRecord { line: 1, .. }
        ));
    }

    #[test]
    fn rejects_non_numeric_count() {
        let data = ">five\nAAAAAAAAAAAAAAAAA\n";
        let mut reader = DumpReader::new(Cursor::new(data), "test");
        assert!(matches!(
            reader.next_record().unwrap_err(),
            KmerDictError::MalformedRecord { .. }
        ));
    }

    #[test]
    fn rejects_negative_count() {
        let data = ">-2\nAAAAAAAAAAAAAAAAA\n";
        let mut reader = DumpReader::new(Cursor::new(data), "test");
        assert!(matches!(
            reader.next_record().unwrap_err(),
            KmerDictError::MalformedRecord { .. }
        ));
    }

    #[test]
    fn rejects_trailing_header_without_sequence() {
        let data = ">5\nAAAAAAAAAAAAAAAAA\n>3\n";
        let mut reader = DumpReader::new(Cursor::new(data), "test");
        reader.next_record().unwrap().unwrap();
        let err = reader.next_record().unwrap_err();
        assert!(matches!(
            err,
            KmerDictError::TruncatedRecord { count: 3, .. }
        ));
    }

    #[test]
    fn rejects_invalid_sequence_line() {
        let data = ">5\nAAAAAAAANAAAAAAAA\n";
        let mut reader = DumpReader::new(Cursor::new(data), "test");
        let err = reader.next_record().unwrap_err();
        assert!(matches!(
            err,
            KmerDictError::MalformedRecord { line: 2, .. }
        ));
    }

    #[test]
    fn iterator_yields_all_records() {
        let data = ">1\nAAAAAAAAAAAAAAAAA\n>2\nCCCCCCCCCCCCCCCCC\n";
        let reader = DumpReader::new(Cursor::new(data), "test");
        let records: Result<Vec<_>, _> = reader.collect();
        let records = records.unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].0, 1);
        assert_eq!(records[1].0, 2);
    }

    #[test]
    fn populate_reader_loads_and_reports() {
        let data = ">5\nAAAAAAAAAAAAAAAAA\n>3\nTTTTTTTTTTTTTTTTT\n";
        let mut store = KmerStore::new();
        let report = store.populate_reader(Cursor::new(data), "stream").unwrap();

        assert_eq!(report.entries_read, 2);
        assert_eq!(report.total_entries, 2);
        assert_eq!(report.source, "stream");
        assert!(report.estimated_bytes > 0);
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn populate_reader_duplicate_names_source() {
        let data = ">5\nAAAAAAAAAAAAAAAAA\n>9\nAAAAAAAAAAAAAAAAA\n";
        let mut store = KmerStore::new();
        let err = store.populate_reader(Cursor::new(data), "dup.fa").unwrap_err();
        match err {
            KmerDictError::DuplicateEntry { seq, source_name } => {
                assert_eq!(seq.as_str(), "AAAAAAAAAAAAAAAAA");
                assert_eq!(source_name, "dup.fa");
            }
            other => panic!("expected DuplicateEntry, got {other:?}"),
        }
        // The first record stayed; the failing one changed nothing.
        assert_eq!(store.len(), 1);
        let seq: Seq17 = "AAAAAAAAAAAAAAAAA".parse().unwrap();
        assert_eq!(store.get(&seq), Some(5));
    }

    #[test]
    fn populate_path_missing_file_is_source_unavailable() {
        let mut store = KmerStore::new();
        let err = store.populate_path("/no/such/dump.fa").unwrap_err();
        assert!(matches!(err, KmerDictError::SourceUnavailable { .. }));
        assert!(store.is_empty());
    }
}
