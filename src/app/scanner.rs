use crate::app::models::{RuntimeConfig, TreeEntry};
use anyhow::{Context, Result};
use globset::{Glob, GlobSet, GlobSetBuilder};
use ignore::gitignore::Gitignore;
use std::cmp::Ordering;
use std::fs;
use std::path::Path;

const BRANCH: &str = "├── ";
const LAST_BRANCH: &str = "└── ";
const PIPE: &str = "│   ";
const BLANK: &str = "    ";

/// Hard stop for traversal, applied even when no max depth is configured.
pub const MAX_RECURSION_DEPTH: usize = 256;

/// Name-based ignore rules. Plain patterns match exactly or by prefix,
/// patterns containing `*` are compiled once into a glob set.
pub struct IgnoreMatcher {
    plain: Vec<String>,
    wildcard: GlobSet,
}

impl IgnoreMatcher {
    pub fn new(patterns: &[String]) -> Result<Self> {
        let mut plain = Vec::new();
        let mut builder = GlobSetBuilder::new();

        for pat in patterns {
            if pat.contains('*') {
                builder.add(compile_wildcard(pat)?);
            } else {
                plain.push(pat.clone());
            }
        }

        Ok(Self {
            plain,
            wildcard: builder.build()?,
        })
    }

    pub fn is_ignored(&self, name: &str) -> bool {
        self.plain.iter().any(|p| name.starts_with(p.as_str())) || self.wildcard.is_match(name)
    }
}

/// Only `*` is special; everything else in the pattern is literal. The
/// pattern may match anywhere inside a name.
fn compile_wildcard(pattern: &str) -> Result<Glob> {
    let mut glob = String::from("*");
    for (i, piece) in pattern.split('*').enumerate() {
        if i > 0 && !glob.ends_with('*') {
            glob.push('*');
        }
        glob.push_str(&globset::escape(piece));
    }
    if !glob.ends_with('*') {
        glob.push('*');
    }
    Glob::new(&glob).context(format!("Invalid ignore pattern: {}", pattern))
}

/// Directories first, then case-insensitive name, then raw name as a tie-breaker.
/// This is not locale collation: accented names sort after ASCII ones.
fn compare_entries(a: &TreeEntry, b: &TreeEntry) -> Ordering {
    b.is_dir
        .cmp(&a.is_dir)
        .then_with(|| a.name.to_lowercase().cmp(&b.name.to_lowercase()))
        .then_with(|| a.name.cmp(&b.name))
}

pub struct Scanner<'a> {
    config: &'a RuntimeConfig,
    ignore: IgnoreMatcher,
    gitignore: Option<Gitignore>,
}

impl<'a> Scanner<'a> {
    pub fn new(config: &'a RuntimeConfig) -> Result<Self> {
        let gitignore = if config.use_gitignore {
            load_gitignore(&config.root)
        } else {
            None
        };

        Ok(Self {
            config,
            ignore: IgnoreMatcher::new(&config.ignore)?,
            gitignore,
        })
    }

    /// Renders the tree below the configured root.
    pub fn scan(&self) -> String {
        self.build_tree(&self.config.root, "", 1)
    }

    /// Renders the listing of `dir`, whose children sit at `depth`.
    pub fn build_tree(&self, dir: &Path, prefix: &str, depth: usize) -> String {
        let mut output = String::new();

        if self.config.max_depth.is_some_and(|max| depth > max) {
            return output;
        }
        if depth > MAX_RECURSION_DEPTH {
            log::warn!(
                "⚠️ Stopping at {}: nesting deeper than {} levels",
                dir.display(),
                MAX_RECURSION_DEPTH
            );
            return output;
        }

        let mut entries = match self.read_entries(dir) {
            Ok(entries) => entries,
            Err(err) => {
                log::error!("Error reading directory {}: {:#}", dir.display(), err);
                return output;
            }
        };
        entries.sort_by(compare_entries);

        let count = entries.len();
        for (i, entry) in entries.iter().enumerate() {
            let is_last = i + 1 == count;

            output.push_str(prefix);
            output.push_str(if is_last { LAST_BRANCH } else { BRANCH });
            output.push_str(&entry.name);

            if entry.is_dir {
                output.push_str("/\n");
                let child_prefix = format!("{}{}", prefix, if is_last { BLANK } else { PIPE });
                output.push_str(&self.build_tree(&entry.path, &child_prefix, depth + 1));
            } else {
                output.push('\n');
            }
        }

        output
    }

    /// Reads the immediate children of `dir` that survive filtering, unsorted.
    fn read_entries(&self, dir: &Path) -> Result<Vec<TreeEntry>> {
        let reader = fs::read_dir(dir).context("Failed to list directory")?;
        let mut entries = Vec::new();

        for result in reader {
            let dir_entry = match result {
                Ok(dir_entry) => dir_entry,
                Err(err) => {
                    log::warn!("Error reading entry in {}: {}", dir.display(), err);
                    continue;
                }
            };
            // file_type() does not follow symlinks, so links are listed but never entered
            let is_dir = match dir_entry.file_type() {
                Ok(file_type) => file_type.is_dir(),
                Err(err) => {
                    log::warn!("Error reading {}: {}", dir_entry.path().display(), err);
                    continue;
                }
            };
            let entry = TreeEntry {
                path: dir_entry.path(),
                name: dir_entry.file_name().to_string_lossy().into_owned(),
                is_dir,
            };

            if self.keep(&entry) {
                entries.push(entry);
            }
        }

        Ok(entries)
    }

    fn keep(&self, entry: &TreeEntry) -> bool {
        if self.ignore.is_ignored(&entry.name) {
            return false;
        }
        if let Some(gitignore) = &self.gitignore {
            if gitignore.matched(&entry.path, entry.is_dir).is_ignore() {
                return false;
            }
        }
        entry.is_dir || self.has_included_extension(&entry.path)
    }

    fn has_included_extension(&self, path: &Path) -> bool {
        if self.config.extensions.is_empty() {
            return true;
        }
        path.extension()
            .map(|ext| ext.to_string_lossy())
            .is_some_and(|ext| self.config.extensions.iter().any(|e| *e == ext))
    }
}

fn load_gitignore(root: &Path) -> Option<Gitignore> {
    let path = root.join(".gitignore");
    if !path.is_file() {
        log::warn!("⚠️ --gitignore given but {} does not exist", path.display());
        return None;
    }

    let (gitignore, err) = Gitignore::new(&path);
    if let Some(err) = err {
        log::warn!("Some rules in {} were skipped: {}", path.display(), err);
    }
    Some(gitignore)
}
