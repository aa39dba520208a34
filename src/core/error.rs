use std::{fmt, path::PathBuf};

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug)]
pub enum Error {
    /// The tests directory under the source root does not exist.
    MissingTestsDir {
        tests_dir: PathBuf,
        source_root: PathBuf,
    },
    /// No snippet matched any call shape across all scanned files.
    NoSnippets { files_scanned: usize },
    /// Two snippets flattened to the same fixture file name.
    NameCollision(String),
    /// A configuration error occurred (bad call-site pattern, empty field).
    Config(String),
    /// An error occurred during file system operations.
    FileSystem(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::MissingTestsDir {
                tests_dir,
                source_root,
            } => write!(
                f,
                "Tests directory not found at {}\n  Make sure the source repository is at: {}\n  Or specify the path: snippet-extract /path/to/repository",
                tests_dir.display(),
                source_root.display()
            ),
            Error::NoSnippets { files_scanned } => write!(
                f,
                "No code snippets found in {files_scanned} source files; the test suite's call conventions may have changed"
            ),
            Error::NameCollision(name) => {
                write!(f, "Fixture file name produced twice in one run: {name}")
            }
            Error::Config(msg) => write!(f, "Configuration error: {msg}"),
            Error::FileSystem(msg) => write!(f, "File system error: {msg}"),
        }
    }
}

impl std::error::Error for Error {}
