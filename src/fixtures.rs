//! Fixture naming, rendering and writing.

use std::{
    collections::HashSet,
    path::{Path, PathBuf},
};

use indexmap::IndexMap;
use tracing::debug;

use crate::{
    core::{Error, Result, ports::FileSystem, snippet::Snippet},
    paths::{flatten_path, slash_path},
};

/// Naming and header settings for generated fixtures.
#[derive(Debug, Clone)]
pub struct FixtureLayout {
    pub grammar_scope: String,
    pub source_suffix: String,
    pub extension: String,
}

pub type GroupKey = (PathBuf, String);

/// Groups snippets by (source file, test name). Groups keep first-seen
/// order and each group keeps discovery order.
pub fn group_snippets(snippets: Vec<Snippet>) -> IndexMap<GroupKey, Vec<Snippet>> {
    let mut groups: IndexMap<GroupKey, Vec<Snippet>> = IndexMap::new();
    for snippet in snippets {
        groups
            .entry((snippet.source_file.clone(), snippet.test_name.clone()))
            .or_default()
            .push(snippet);
    }
    groups
}

impl FixtureLayout {
    /// `<flattened source>_<test>_<NNN>.<ext>`, `index` being 1-based.
    pub fn file_name(&self, source_file: &Path, test_name: &str, index: usize) -> String {
        format!(
            "{}_{test_name}_{index:03}.{}",
            flatten_path(source_file, &self.source_suffix),
            self.extension
        )
    }

    pub fn render(&self, snippet: &Snippet) -> String {
        format!(
            "// SYNTAX TEST \"{}\" \"Extracted from {}:{}:{}\"\n\n{}\n",
            self.grammar_scope,
            slash_path(&snippet.source_file),
            snippet.test_name,
            snippet.line,
            snippet.code
        )
    }

    /// Writes one fixture per snippet into `output_dir`, which must exist.
    /// Every name is checked for collisions before the first write.
    /// Returns the number of files written.
    pub fn write_all(
        &self,
        file_system: &dyn FileSystem,
        output_dir: &Path,
        snippets: Vec<Snippet>,
    ) -> Result<usize> {
        let mut seen = HashSet::new();
        let mut planned = Vec::new();
        for ((source_file, test_name), group) in group_snippets(snippets) {
            for (i, snippet) in group.into_iter().enumerate() {
                let name = self.file_name(&source_file, &test_name, i + 1);
                if !seen.insert(name.clone()) {
                    return Err(Error::NameCollision(name));
                }
                planned.push((name, snippet));
            }
        }

        for (name, snippet) in &planned {
            file_system.write(&output_dir.join(name), &self.render(snippet))?;
            debug!(file = %name, "Wrote fixture");
        }
        Ok(planned.len())
    }
}
