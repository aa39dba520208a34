use std::{fs, path::Path, path::PathBuf, str::FromStr};

use anyhow::{Context, Result, anyhow, ensure};
use serde::{Deserialize, Serialize};

use crate::extract::{CallSite, ShapeTable};

/// Settings for one extraction run. Every key is optional in the YAML file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ExtractorConfig {
    /// Directory below the source root that holds the test files.
    pub tests_subdir: PathBuf,
    /// Directory that receives the generated fixtures.
    pub output_dir: PathBuf,
    /// Grammar scope named in every fixture header.
    pub grammar_scope: String,
    pub source_suffix: String,
    pub fixture_extension: String,
    /// Line that flags the next `fn` as a test.
    pub test_marker: String,
    /// Macro whose block wraps literals that must be un-indented.
    pub block_macro: String,
    pub call_sites: Vec<CallSite>,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            tests_subdir: PathBuf::from("tests/language"),
            output_dir: PathBuf::from("tests/extracted"),
            grammar_scope: "source.ferlium".into(),
            source_suffix: ".rs".into(),
            fixture_extension: "fer".into(),
            test_marker: "#[test]".into(),
            block_macro: "indoc".into(),
            call_sites: CallSite::defaults(),
        }
    }
}

impl ExtractorConfig {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path_ref = path.as_ref();
        let raw = fs::read_to_string(path_ref)
            .with_context(|| format!("Failed to read config file at {}", path_ref.display()))?;
        Self::from_yaml_str(&raw)
            .with_context(|| format!("Invalid configuration in {}", path_ref.display()))
    }

    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        // An empty document deserializes to `null`; treat it as all defaults.
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Self = serde_yaml::from_str(yaml).context("Unable to parse config YAML")?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        ensure!(
            !self.tests_subdir.as_os_str().is_empty(),
            "tests_subdir must not be empty"
        );
        ensure!(
            !self.output_dir.as_os_str().is_empty(),
            "output_dir must not be empty"
        );
        ensure!(
            !self.grammar_scope.trim().is_empty(),
            "grammar_scope must not be empty"
        );
        ensure!(
            !self.source_suffix.is_empty(),
            "source_suffix must not be empty"
        );
        ensure!(
            !self.fixture_extension.is_empty() && !self.fixture_extension.starts_with('.'),
            "fixture_extension must be non-empty and given without a leading dot"
        );
        ensure!(
            !self.test_marker.trim().is_empty(),
            "test_marker must not be empty"
        );
        ensure!(
            !self.block_macro.trim().is_empty(),
            "block_macro must not be empty"
        );
        ensure!(
            !self.call_sites.is_empty(),
            "Configuration must contain at least one call site"
        );
        self.shape_table()?;
        Ok(())
    }

    pub fn shape_table(&self) -> Result<ShapeTable> {
        ShapeTable::build(&self.call_sites, &self.block_macro).map_err(|e| anyhow!(e))
    }
}

impl FromStr for ExtractorConfig {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_yaml_str(s)
    }
}
