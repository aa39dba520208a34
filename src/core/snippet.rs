use std::path::PathBuf;

/// Test name used when no marked function precedes a snippet.
pub const UNKNOWN_TEST: &str = "unknown";

/// A code fragment found by the extractor, before test attribution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fragment {
    /// Decoded, un-indented and trimmed literal content.
    pub code: String,
    /// 1-based line of the call site's first character.
    pub line: usize,
    /// Byte offset of the call site within the file.
    pub offset: usize,
}

/// A fragment attributed to its source file and enclosing test.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snippet {
    pub code: String,
    pub line: usize,
    pub test_name: String,
    /// Path relative to the tests directory.
    pub source_file: PathBuf,
}
