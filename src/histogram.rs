//! Alignment-score histograms.
//!
//! Companion utility to the count store: scans SAM-like alignment records
//! for an embedded `KS:i:` score tag and tallies how often each score
//! occurs. Shares no data structures with [`KmerStore`](crate::KmerStore).

use std::collections::BTreeMap;
use std::io::{BufRead, Write};

use tracing::info;

use crate::error::KmerDictError;

/// Maps score -> number of records with that score.
///
/// `BTreeMap` keeps iteration sorted ascending by score, which is the
/// order the CSV output wants.
pub type ScoreHistogram = BTreeMap<i64, u64>;

/// Tag preceding the score value in each alignment record.
const SCORE_TAG: &str = "KS:i:";

/// Tallies score frequencies from SAM-like records.
///
/// Header lines beginning with `@` are skipped. Every other line must
/// carry a `KS:i:` tag followed by an integer; the value after the last
/// occurrence of the tag wins.
///
/// # Errors
///
/// [`KmerDictError::MissingScoreTag`] for a record without a parsable tag,
/// or an I/O error from the reader.
pub fn tally_scores<R: BufRead>(reader: R, source: &str) -> Result<ScoreHistogram, KmerDictError> {
    let mut histogram = ScoreHistogram::new();
    let mut line_no = 0u64;
    for line in reader.lines() {
        let line = line?;
        line_no += 1;
        if line.starts_with('@') {
            continue;
        }
        let score = parse_score(&line).ok_or(KmerDictError::MissingScoreTag {
            source_name: source.to_string(),
            line: line_no,
        })?;
        *histogram.entry(score).or_insert(0) += 1;
    }
    info!(
        source,
        records = histogram.values().sum::<u64>(),
        distinct_scores = histogram.len(),
        "score tally complete"
    );
    Ok(histogram)
}

/// Extracts the integer following the last `KS:i:` tag in a record.
fn parse_score(record: &str) -> Option<i64> {
    let (_, after) = record.rsplit_once(SCORE_TAG)?;
    after.split_whitespace().next()?.parse().ok()
}

/// Writes the histogram as `score, frequency` CSV rows, ascending by
/// score.
///
/// # Errors
///
/// Propagates write failures.
pub fn write_histogram<W: Write>(
    histogram: &ScoreHistogram,
    mut writer: W,
) -> Result<(), KmerDictError> {
    writeln!(writer, "score, frequency")?;
    for (score, frequency) in histogram {
        writeln!(writer, "{score},{frequency}")?;
    }
    Ok(())
}
