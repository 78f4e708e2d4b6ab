use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::process;

use clap::Parser;
use colored::Colorize;
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use kmerdict::cli::{Args, Command};
use kmerdict::{histogram, KmerDictError, KmerStore, Seq17};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    if let Err(e) = run(args) {
        eprintln!("{} {}", "error:".red().bold(), e);
        process::exit(1);
    }
}

fn run(args: Args) -> Result<(), KmerDictError> {
    match args.command {
        Command::Query { seq, dumps, fast } => query(&seq, &dumps, fast),
        Command::Stats { dumps, json } => stats(&dumps, json),
        Command::Histo { sam, output } => histo(&sam, output),
    }
}

fn load_all(dumps: &[PathBuf]) -> Result<KmerStore, KmerDictError> {
    let mut store = KmerStore::new();
    for dump in dumps {
        let report = store.populate_path(dump)?;
        eprintln!(
            "{} {} entries from {} in {:.2?} (~{} bytes in memory)",
            "loaded".green().bold(),
            report.entries_read,
            report.source.bold(),
            report.elapsed,
            report.estimated_bytes
        );
    }
    Ok(store)
}

fn query(seq: &str, dumps: &[PathBuf], fast: bool) -> Result<(), KmerDictError> {
    let seq: Seq17 = seq.parse()?;
    let store = load_all(dumps)?;

    let count = if fast {
        store
            .lookup_fast(&seq)
            .ok_or(KmerDictError::NotFound { seq })?
    } else {
        store.lookup_canonical(&seq)?
    };
    println!("{seq}\t{count}");
    Ok(())
}

#[derive(Serialize)]
struct StoreStats {
    entries: u64,
    estimated_bytes: usize,
}

fn stats(dumps: &[PathBuf], json: bool) -> Result<(), KmerDictError> {
    let store = load_all(dumps)?;
    let stats = StoreStats {
        entries: store.len(),
        estimated_bytes: store.estimate_size(),
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
    } else {
        println!("{}: {}", "entries".bold(), stats.entries);
        println!("{}: {} bytes", "estimated size".bold(), stats.estimated_bytes);
    }
    Ok(())
}

fn histo(sam: &Path, output: Option<PathBuf>) -> Result<(), KmerDictError> {
    let file = File::open(sam).map_err(|source| KmerDictError::SourceUnavailable {
        path: sam.to_path_buf(),
        source,
    })?;
    let source = sam.display().to_string();
    let histogram = histogram::tally_scores(BufReader::new(file), &source)?;

    let output = output.unwrap_or_else(|| default_histo_path(sam));
    let mut writer = BufWriter::new(File::create(&output)?);
    histogram::write_histogram(&histogram, &mut writer)?;
    writer.flush()?;

    eprintln!(
        "{} {}",
        "histogram written to".green().bold(),
        output.display()
    );
    Ok(())
}

/// `reads.sam` becomes `reads_histo.txt` next to the input.
fn default_histo_path(sam: &Path) -> PathBuf {
    let stem = sam
        .file_stem()
        .map_or_else(|| "scores".to_string(), |s| s.to_string_lossy().into_owned());
    sam.with_file_name(format!("{stem}_histo.txt"))
}
