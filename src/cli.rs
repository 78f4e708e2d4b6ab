//! Command-line interface definition.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Query 17-mer counts from dump files and tally alignment-score
/// histograms.
#[derive(Parser, Debug)]
#[command(name = "kmerdict")]
#[command(version, about, long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Look up the count for a 17-base sequence across one or more dump files
    Query {
        /// Sequence to look up (17 bases, A/C/G/T)
        seq: String,

        /// Dump files to load before querying
        #[arg(required = true)]
        dumps: Vec<PathBuf>,

        /// Skip the reverse-complement check when the forward strand hits
        #[arg(short, long)]
        fast: bool,
    },

    /// Load dump files and report entry count and estimated footprint
    Stats {
        /// Dump files to load
        #[arg(required = true)]
        dumps: Vec<PathBuf>,

        /// Emit the report as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Tally alignment-score frequencies from a SAM file into a CSV histogram
    Histo {
        /// Alignment records carrying KS:i: score tags
        sam: PathBuf,

        /// Output path (default: <input stem>_histo.txt next to the input)
        output: Option<PathBuf>,
    },
}
