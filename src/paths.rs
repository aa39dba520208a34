use std::path::{Component, Path, PathBuf};

/// Returns `path` relative to `root`, or `path` unchanged when it is not below `root`.
pub fn relative_to(path: &Path, root: &Path) -> PathBuf {
    path.strip_prefix(root)
        .map(Path::to_path_buf)
        .unwrap_or_else(|_| path.to_path_buf())
}

fn normal_components(path: &Path) -> Vec<String> {
    path.components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect()
}

/// Renders a relative path with `/` separators on every platform.
pub fn slash_path(path: &Path) -> String {
    normal_components(path).join("/")
}

/// Flattens a relative path into a single file-name stem: separators become
/// `_` and a trailing `suffix` is removed.
pub fn flatten_path(path: &Path, suffix: &str) -> String {
    let joined = normal_components(path).join("_");
    match joined.strip_suffix(suffix) {
        Some(stem) => stem.to_string(),
        None => joined,
    }
}
