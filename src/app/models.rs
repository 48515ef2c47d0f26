use std::path::PathBuf;

/// Represents the final configuration after merging defaults and CLI args.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub output: PathBuf,
    pub root: PathBuf,
    /// Ordered, de-duplicated ignore patterns (defaults first).
    pub ignore: Vec<String>,
    /// Extensions without the leading dot. Empty means every file is listed.
    pub extensions: Vec<String>,
    /// `None` means unlimited.
    pub max_depth: Option<usize>,
    pub use_gitignore: bool,
}

/// A single child of a directory being listed.
#[derive(Debug)]
pub struct TreeEntry {
    pub path: PathBuf,
    pub name: String,
    pub is_dir: bool,
}
