//! Command-line dispatcher for the EDF to CFS converter.

use anyhow::{bail, Context, Result};
use cfs_convert::edf::{EdfFile, SignalMeta};
use cfs_convert::{
    degree_of_parallelism, run_jobs, ChannelSelection, ConversionReport, ConvertOptions,
};
use clap::Parser;
use std::fs;
use std::io::{self, IsTerminal, Write};
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Parser, Debug)]
#[command(
    name = "edf2cfs",
    version,
    about = "Convert EDF polysomnography recordings into Compressed Feature Set artifacts"
)]
struct Cli {
    /// EDF label of the C3 EEG channel
    #[arg(short = 'a', value_name = "LABEL")]
    c3: Option<String>,

    /// EDF label of the C4 EEG channel
    #[arg(short = 'b', value_name = "LABEL")]
    c4: Option<String>,

    /// EDF label of the left EOG channel
    #[arg(short = 'x', value_name = "LABEL")]
    el: Option<String>,

    /// EDF label of the right EOG channel
    #[arg(short = 'z', value_name = "LABEL")]
    er: Option<String>,

    /// Also convert every .edf file in this directory (non-recursive)
    #[arg(short = 'd', value_name = "DIR")]
    directory: Option<PathBuf>,

    /// Suppress per-file success messages
    #[arg(short = 'q')]
    quiet: bool,

    /// Overwrite existing .cfs outputs
    #[arg(short = 'o')]
    overwrite: bool,

    /// Write an HTML log next to the first input
    #[arg(short = 'l')]
    log: bool,

    /// EDF files to convert
    #[arg(value_name = "FILE")]
    files: Vec<PathBuf>,
}

fn main() {
    tracing_subscriber::fmt().with_target(false).init();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(error) => {
            let _ = error.print();
            std::process::exit(1);
        }
    };

    if let Err(error) = run(cli) {
        eprintln!("edf2cfs: {error:#}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let mut files = cli.files.clone();
    if let Some(directory) = &cli.directory {
        files.extend(scan_directory(directory)?);
    }
    if files.is_empty() {
        bail!("no input files; pass EDF paths or -d DIR");
    }

    let selection = resolve_selection(&cli, &files[0])?;
    let options = ConvertOptions {
        selection,
        overwrite: cli.overwrite,
    };

    let workers = degree_of_parallelism();
    info!(workers, files = files.len(), "starting conversion run");

    let mut report = ConversionReport::new();
    let summary = run_jobs(&files, &options, workers, |path, result| {
        report.record(path, result);
        match result {
            Ok(conversion) => {
                if !cli.quiet {
                    println!(
                        "{}: {} epochs -> {}",
                        path.display(),
                        conversion.epochs,
                        conversion.output.display()
                    );
                    for note in &conversion.notes {
                        println!("  {note}");
                    }
                }
            }
            Err(error) => {
                eprintln!("{}: [{}] {}", path.display(), error.code(), error);
            }
        }
    });

    if cli.log {
        let log_path = files[0].with_file_name("edf2cfs-log.html");
        report
            .write_html(&log_path)
            .with_context(|| format!("cannot write log {}", log_path.display()))?;
        if !cli.quiet {
            println!("log written to {}", log_path.display());
        }
    }

    println!("{} converted, {} failed", summary.converted, summary.failed);
    Ok(())
}

/// Non-recursive scan for `.edf` files, sorted for a deterministic
/// admission order.
fn scan_directory(directory: &Path) -> Result<Vec<PathBuf>> {
    let entries = fs::read_dir(directory)
        .with_context(|| format!("cannot read directory {}", directory.display()))?;

    let mut found = Vec::new();
    for entry in entries {
        let path = entry
            .with_context(|| format!("cannot read directory {}", directory.display()))?
            .path();
        let is_edf = path.is_file()
            && path
                .extension()
                .is_some_and(|ext| ext.eq_ignore_ascii_case("edf"));
        if is_edf {
            found.push(path);
        }
    }

    found.sort();
    Ok(found)
}

/// Complete the channel selection, prompting interactively for any
/// missing label from the first file's signal list.
fn resolve_selection(cli: &Cli, first: &Path) -> Result<ChannelSelection> {
    if let (Some(c3), Some(c4), Some(el), Some(er)) = (&cli.c3, &cli.c4, &cli.el, &cli.er) {
        return Ok(ChannelSelection {
            c3: c3.clone(),
            c4: c4.clone(),
            el: el.clone(),
            er: er.clone(),
        });
    }

    if !io::stdin().is_terminal() {
        bail!("channel labels missing (-a/-b/-x/-z) and stdin is not interactive");
    }

    let edf = EdfFile::open(first)
        .map_err(|error| anyhow::anyhow!("cannot open {}: {error}", first.display()))?;
    let signals = edf.signals();

    println!("Signals in {}:", first.display());
    for signal in signals {
        println!(
            "  [{}] {} ({} Hz, {})",
            signal.index,
            signal.label,
            signal.sample_rate(),
            signal.physical_unit
        );
    }

    Ok(ChannelSelection {
        c3: pick_label(cli.c3.as_deref(), "C3", signals)?,
        c4: pick_label(cli.c4.as_deref(), "C4", signals)?,
        el: pick_label(cli.el.as_deref(), "EL", signals)?,
        er: pick_label(cli.er.as_deref(), "ER", signals)?,
    })
}

fn pick_label(existing: Option<&str>, role: &str, signals: &[SignalMeta]) -> Result<String> {
    if let Some(label) = existing {
        return Ok(label.to_string());
    }

    loop {
        print!("Select signal index for {role}: ");
        io::stdout().flush()?;

        let mut line = String::new();
        if io::stdin().read_line(&mut line)? == 0 {
            bail!("stdin closed before {role} was chosen");
        }

        match line.trim().parse::<usize>() {
            Ok(index) if index < signals.len() => return Ok(signals[index].label.clone()),
            _ => eprintln!("enter an index between 0 and {}", signals.len() - 1),
        }
    }
}
