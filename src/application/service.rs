//! Extraction use case: enumerate, extract, attribute, write.

use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use serde::Serialize;
use tracing::{debug, error, info};

use crate::{
    config::ExtractorConfig,
    core::{
        error::{Error, Result},
        ports::FileSystem,
        snippet::Snippet,
    },
    extract::{ShapeTable, extract_fragments, resolver::enclosing_test_name},
    fixtures::FixtureLayout,
    paths::relative_to,
};

/// Totals reported at the end of a successful run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    pub files_scanned: usize,
    pub snippets_found: usize,
    pub files_written: usize,
    pub output_dir: PathBuf,
}

pub struct ExtractionService {
    file_system: Arc<dyn FileSystem>,
    shapes: ShapeTable,
    test_marker: String,
    source_suffix: String,
    tests_subdir: PathBuf,
    output_dir: PathBuf,
    layout: FixtureLayout,
}

impl ExtractionService {
    pub fn new(file_system: Arc<dyn FileSystem>, config: &ExtractorConfig) -> Result<Self> {
        Ok(Self {
            file_system,
            shapes: ShapeTable::build(&config.call_sites, &config.block_macro)?,
            test_marker: config.test_marker.clone(),
            source_suffix: config.source_suffix.clone(),
            tests_subdir: config.tests_subdir.clone(),
            output_dir: config.output_dir.clone(),
            layout: FixtureLayout {
                grammar_scope: config.grammar_scope.clone(),
                source_suffix: config.source_suffix.clone(),
                extension: config.fixture_extension.clone(),
            },
        })
    }

    /// Extracts every snippet below `source_root` and regenerates the
    /// output directory from scratch.
    ///
    /// The output directory is removed before anything is written, so a run
    /// that finds no snippets leaves no stale fixtures behind.
    pub fn run(&self, source_root: &Path) -> Result<RunSummary> {
        let tests_dir = source_root.join(&self.tests_subdir);
        if !self.file_system.is_dir(&tests_dir) {
            return Err(Error::MissingTestsDir {
                tests_dir,
                source_root: source_root.to_path_buf(),
            });
        }

        info!(tests_dir = %tests_dir.display(), "Extracting code snippets");
        let files = self
            .file_system
            .list_files(&tests_dir, &self.source_suffix);
        info!(count = files.len(), "Found source files");

        let mut snippets = Vec::new();
        for file in &files {
            match self.file_system.read_to_string(file) {
                Ok(content) => {
                    let relative = relative_to(file, &tests_dir);
                    let found = self.snippets_in(&content, &relative);
                    debug!(file = %relative.display(), snippets = found.len(), "Scanned file");
                    snippets.extend(found);
                }
                Err(e) => {
                    error!(file = %file.display(), error = %e, "Failed to read source file");
                }
            }
        }
        info!(total = snippets.len(), "Extracted snippets");

        self.file_system.remove_dir_all(&self.output_dir)?;
        if snippets.is_empty() {
            return Err(Error::NoSnippets {
                files_scanned: files.len(),
            });
        }
        self.file_system.create_dir_all(&self.output_dir)?;

        let snippets_found = snippets.len();
        let files_written = self
            .layout
            .write_all(self.file_system.as_ref(), &self.output_dir, snippets)?;
        info!(
            files_written,
            output_dir = %self.output_dir.display(),
            "Generated fixture files"
        );

        Ok(RunSummary {
            files_scanned: files.len(),
            snippets_found,
            files_written,
            output_dir: self.output_dir.clone(),
        })
    }

    /// Snippets of one file, attributed to their enclosing tests.
    pub fn snippets_in(&self, content: &str, source_file: &Path) -> Vec<Snippet> {
        extract_fragments(content, &self.shapes)
            .into_iter()
            .map(|fragment| Snippet {
                test_name: enclosing_test_name(content, fragment.offset, &self.test_marker)
                    .to_string(),
                code: fragment.code,
                line: fragment.line,
                source_file: source_file.to_path_buf(),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::filesystem::StdFileSystem;
    use std::{
        collections::BTreeMap,
        fs,
        sync::Mutex,
    };
    use tempfile::tempdir;

    fn config_for(output_dir: &Path) -> ExtractorConfig {
        ExtractorConfig {
            output_dir: output_dir.to_path_buf(),
            ..ExtractorConfig::default()
        }
    }

    fn write_source(root: &Path, relative: &str, content: &str) {
        let path = root.join("tests/language").join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    fn read_outputs(dir: &Path) -> BTreeMap<String, String> {
        fs::read_dir(dir)
            .unwrap()
            .map(|e| {
                let e = e.unwrap();
                (
                    e.file_name().to_string_lossy().into_owned(),
                    fs::read_to_string(e.path()).unwrap(),
                )
            })
            .collect()
    }

    fn service(output_dir: &Path) -> ExtractionService {
        ExtractionService::new(Arc::new(StdFileSystem::new()), &config_for(output_dir)).unwrap()
    }

    #[test]
    fn single_test_produces_one_fixture() {
        let temp = tempdir().unwrap();
        let root = temp.path().join("repo");
        let out = temp.path().join("out");
        write_source(
            &root,
            "basics/strings.rs",
            "use test_utils::*;\n\n#[test]\nfn t1() { run(\"a\\nb\"); }\n",
        );

        let summary = service(&out).run(&root).unwrap();
        assert_eq!(summary.files_scanned, 1);
        assert_eq!(summary.snippets_found, 1);
        assert_eq!(summary.files_written, 1);

        let outputs = read_outputs(&out);
        assert_eq!(
            outputs.get("basics_strings_t1_001.fer").map(String::as_str),
            Some(
                "// SYNTAX TEST \"source.ferlium\" \"Extracted from basics/strings.rs:t1:4\"\n\na\nb\n"
            )
        );
    }

    #[test]
    fn two_tests_produce_two_groups() {
        let temp = tempdir().unwrap();
        let root = temp.path().join("repo");
        let out = temp.path().join("out");
        write_source(
            &root,
            "math.rs",
            "#[test]\nfn add() {\n    run(\"1 + 2\");\n}\n\n#[test]\nfn sub() {\n    run(\"3 - 1\");\n}\n",
        );

        service(&out).run(&root).unwrap();
        let names: Vec<_> = read_outputs(&out).into_keys().collect();
        assert_eq!(names, vec!["math_add_001.fer", "math_sub_001.fer"]);
    }

    #[test]
    fn no_snippets_fails_and_removes_stale_output() {
        let temp = tempdir().unwrap();
        let root = temp.path().join("repo");
        let out = temp.path().join("out");
        write_source(&root, "empty.rs", "#[test]\nfn nothing() { assert!(true); }\n");
        fs::create_dir_all(&out).unwrap();
        fs::write(out.join("stale.fer"), "old").unwrap();

        let err = service(&out).run(&root).unwrap_err();
        assert!(matches!(err, Error::NoSnippets { files_scanned: 1 }));
        assert!(!out.exists());
    }

    #[test]
    fn missing_tests_dir_is_fatal() {
        let temp = tempdir().unwrap();
        let out = temp.path().join("out");
        let err = service(&out).run(&temp.path().join("nowhere")).unwrap_err();
        assert!(matches!(err, Error::MissingTestsDir { .. }));
        assert!(!out.exists());
    }

    #[test]
    fn runs_are_deterministic() {
        let temp = tempdir().unwrap();
        let root = temp.path().join("repo");
        let out = temp.path().join("out");
        write_source(&root, "b.rs", "#[test]\nfn x() { run(\"1\"); run(r\"2\"); }\n");
        write_source(
            &root,
            "a/c.rs",
            "#[test]\nfn y() {\n    run(indoc! {\"\n        let v = 1;\n    \"});\n}\n",
        );

        let service = service(&out);
        service.run(&root).unwrap();
        let first = read_outputs(&out);
        service.run(&root).unwrap();
        assert_eq!(first, read_outputs(&out));
        assert_eq!(first.len(), 3);
        assert!(first.contains_key("a_c_y_001.fer"));
        assert!(first.contains_key("b_x_002.fer"));
    }

    /// In-memory file system where some listed files cannot be read.
    #[derive(Default)]
    struct FakeFileSystem {
        files: BTreeMap<PathBuf, Option<String>>,
        written: Mutex<BTreeMap<PathBuf, String>>,
    }

    impl FileSystem for FakeFileSystem {
        fn list_files(&self, root: &Path, suffix: &str) -> Vec<PathBuf> {
            self.files
                .keys()
                .filter(|p| p.starts_with(root) && p.to_string_lossy().ends_with(suffix))
                .cloned()
                .collect()
        }

        fn read_to_string(&self, path: &Path) -> Result<String> {
            match self.files.get(path) {
                Some(Some(content)) => Ok(content.clone()),
                _ => Err(Error::FileSystem(format!("{}: permission denied", path.display()))),
            }
        }

        fn write(&self, path: &Path, content: &str) -> Result<()> {
            self.written
                .lock()
                .unwrap()
                .insert(path.to_path_buf(), content.to_string());
            Ok(())
        }

        fn is_dir(&self, _path: &Path) -> bool {
            true
        }

        fn create_dir_all(&self, _path: &Path) -> Result<()> {
            Ok(())
        }

        fn remove_dir_all(&self, _path: &Path) -> Result<()> {
            Ok(())
        }
    }

    #[test]
    fn unreadable_file_is_skipped() {
        let mut fake = FakeFileSystem::default();
        fake.files.insert(
            PathBuf::from("/repo/tests/language/broken.rs"),
            None,
        );
        fake.files.insert(
            PathBuf::from("/repo/tests/language/ok.rs"),
            Some("#[test]\nfn fine() { run(\"x\"); }\n".into()),
        );
        let fake = Arc::new(fake);

        let service = ExtractionService::new(
            fake.clone(),
            &config_for(Path::new("/out")),
        )
        .unwrap();
        let summary = service.run(Path::new("/repo")).unwrap();

        assert_eq!(summary.files_scanned, 2);
        assert_eq!(summary.files_written, 1);
        let written = fake.written.lock().unwrap();
        assert!(written.contains_key(Path::new("/out/ok_fine_001.fer")));
    }

    #[test]
    fn snippets_in_attributes_tests_and_lines() {
        let temp = tempdir().unwrap();
        let service = service(temp.path());
        let content = "run(\"top\");\n#[test]\nfn alpha() {\n    run(\"x\");\n}\n";
        let snippets = service.snippets_in(content, Path::new("f.rs"));
        let found: Vec<_> = snippets
            .iter()
            .map(|s| (s.code.as_str(), s.test_name.as_str(), s.line))
            .collect();
        assert_eq!(found, vec![("top", "unknown", 1), ("x", "alpha", 4)]);
    }
}
