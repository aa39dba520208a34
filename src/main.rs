mod tracing_setup;

use std::{process::ExitCode, sync::Arc};

use anyhow::{Context, Result};
use clap::Parser;
use tracing::error;

use snippet_extract::{
    adapters::filesystem::StdFileSystem,
    application::{ExtractionService, RunSummary},
    cli::Cli,
};
use tracing_setup::{JsonLogFormat, LogStream};

fn main() -> ExitCode {
    let cli = Cli::parse();
    let json_format = if cli.pretty {
        JsonLogFormat::Pretty
    } else {
        JsonLogFormat::Compact
    };
    // --summary-json keeps stdout a single JSON document
    let stream = if cli.summary_json {
        LogStream::Stderr
    } else {
        LogStream::Stdout
    };
    tracing_setup::init(cli.verbose, cli.log_json, json_format, stream);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("Command failed: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<()> {
    let config = cli.extractor_config()?;
    let service = ExtractionService::new(Arc::new(StdFileSystem::new()), &config)?;
    let summary = service.run(&cli.source_root)?;

    if cli.summary_json {
        let json =
            serde_json::to_string_pretty(&summary).context("Failed to serialize run summary")?;
        println!("{json}");
    } else {
        print_summary(&summary);
    }
    Ok(())
}

fn print_summary(summary: &RunSummary) {
    println!("Scanned {} source files", summary.files_scanned);
    println!("Found {} snippets", summary.snippets_found);
    println!(
        "Wrote {} fixture files to {}",
        summary.files_written,
        summary.output_dir.display()
    );
}
