use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;

use crate::config::ExtractorConfig;

/// Extracts code snippets from a test suite into grammar fixture files.
#[derive(Debug, Parser)]
#[command(name = "snippet-extract")]
#[command(about = "Extract test-suite code snippets into syntax test fixtures", version)]
pub struct Cli {
    #[arg(
        default_value = "../ferlium",
        help = "Root of the repository whose tests are scanned"
    )]
    pub source_root: PathBuf,

    #[arg(long, help = "YAML file overriding the default extraction settings")]
    pub config: Option<PathBuf>,

    #[arg(long, help = "Directory receiving the fixtures (cleared on every run)")]
    pub output: Option<PathBuf>,

    #[arg(long, help = "Grammar scope written into fixture headers")]
    pub grammar: Option<String>,

    #[arg(long, help = "Print the run summary as JSON")]
    pub summary_json: bool,

    #[arg(short, long, help = "Enable verbose logging")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON")]
    pub log_json: bool,

    #[arg(long, requires = "log_json", help = "Pretty-print JSON logs")]
    pub pretty: bool,
}

impl Cli {
    /// Loads the configuration file (or defaults) and applies flag overrides.
    pub fn extractor_config(&self) -> Result<ExtractorConfig> {
        let mut config = match &self.config {
            Some(path) => ExtractorConfig::from_path(path)?,
            None => ExtractorConfig::default(),
        };
        if let Some(output) = &self.output {
            config.output_dir = output.clone();
        }
        if let Some(grammar) = &self.grammar {
            config.grammar_scope = grammar.clone();
        }
        config.validate()?;
        Ok(config)
    }
}
