use crate::cli::{Commands, DiffArgs, LoadArgs};
use clap::Parser;
use pgdiff::{diff_databases, load_database, Result};
use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};
use tracing::instrument;
use tracing_subscriber::EnvFilter;

mod cli;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let cli = cli::Cli::parse();

    run(cli)?;

    Ok(())
}

#[instrument(skip_all)]
fn run(cli: cli::Cli) -> Result<()> {
    let output = match cli.command {
        Commands::Diff(diff_args) => {
            let (old, new) = open_dumps(&diff_args)?;
            do_diff(&diff_args, old, new)?
        }
        Commands::Inspect { dump, load_args } => do_inspect(&load_args, open_dump(&dump)?)?,
    };

    let mut stdout = io::stdout().lock();
    stdout.write_all(output.as_bytes())?;
    stdout.flush()?;

    Ok(())
}

/// Opens a dump for reading, `-` is stdin.
fn open_dump(path: &str) -> Result<Box<dyn BufRead>> {
    if path == "-" {
        return Ok(Box::new(io::stdin().lock()));
    }

    let file = File::open(path)?;
    Ok(Box::new(BufReader::new(file)))
}

/// Stdin can only be read once, so at most one of the dumps may come from it.
fn open_dumps(diff_args: &DiffArgs) -> Result<(Box<dyn BufRead>, Box<dyn BufRead>)> {
    if diff_args.old_dump == "-" && diff_args.new_dump == "-" {
        let message = "only one of the dumps can be read from stdin";
        return Err(io::Error::new(io::ErrorKind::InvalidInput, message).into());
    }

    Ok((open_dump(&diff_args.old_dump)?, open_dump(&diff_args.new_dump)?))
}

/// The old dump is loaded completely before the new one is read.
#[instrument(skip_all)]
fn do_diff(diff_args: &DiffArgs, old: impl BufRead, new: impl BufRead) -> Result<String> {
    let diff_options = diff_args.diff_options()?;
    let load_options = diff_args.load_args.load_options();

    let old = load_database(old, &load_options)?;
    let new = load_database(new, &load_options)?;

    Ok(diff_databases(&old, &new, &diff_options))
}

#[instrument(skip_all)]
fn do_inspect(load_args: &LoadArgs, dump: impl BufRead) -> Result<String> {
    let database = load_database(dump, &load_args.load_options())?;

    let mut json = serde_json::to_string_pretty(&database).map_err(io::Error::from)?;
    json.push('\n');
    Ok(json)
}
