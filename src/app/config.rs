use crate::app::cli::{retain_known_flags, Cli};
use crate::app::models::RuntimeConfig;
use anyhow::Result;
use clap::error::ErrorKind;
use clap::Parser;
use std::collections::HashSet;
use std::ffi::OsString;
use std::path::Path;

/// Names skipped on every run; `-i` extends this list.
pub const DEFAULT_IGNORES: &[&str] = &[
    // version control and editors
    ".git",
    ".svn",
    ".hg",
    ".idea",
    ".vscode",
    // build output
    "dist",
    "build",
    "target",
    "coverage",
    ".next",
    ".nuxt",
    // dependency caches
    "node_modules",
    "__pycache__",
    ".cache",
    // logs and environment
    "*.log",
    ".env",
    // OS metadata
    ".DS_Store",
    "Thumbs.db",
];

/// Outcome of argument parsing.
#[derive(Debug)]
pub enum Invocation {
    /// Help or version was requested; the error carries the text to print.
    Help(clap::Error),
    Run(RuntimeConfig),
}

fn merge_patterns(defaults: &[&str], cli_items: Vec<String>) -> Vec<String> {
    let mut combined: Vec<String> = defaults.iter().map(|s| s.to_string()).collect();
    combined.extend(cli_items);
    // Deduplicate while keeping order
    let mut seen = HashSet::new();
    combined.retain(|item| seen.insert(item.clone()));
    combined
}

fn normalize_extensions(raw: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    raw.into_iter()
        .map(|ext| ext.trim().trim_start_matches('.').to_string())
        .filter(|ext| !ext.is_empty())
        .filter(|ext| seen.insert(ext.clone()))
        .collect()
}

pub fn resolve_config(cli: Cli, cwd: &Path) -> RuntimeConfig {
    // Root: last positional > --path > cwd
    let root = cli
        .roots
        .into_iter()
        .last()
        .or(cli.path)
        .unwrap_or_else(|| cwd.to_path_buf());

    RuntimeConfig {
        output: cli.output,
        root,
        ignore: merge_patterns(DEFAULT_IGNORES, cli.ignore),
        extensions: normalize_extensions(cli.ext),
        max_depth: Some(cli.max_depth).filter(|&d| d > 0),
        use_gitignore: cli.gitignore,
    }
}

/// Parses the raw process arguments (binary name first) into an [`Invocation`].
pub fn resolve_invocation<I, T>(args: I, cwd: &Path) -> Result<Invocation>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    match Cli::try_parse_from(retain_known_flags(args)) {
        Ok(cli) => Ok(Invocation::Run(resolve_config(cli, cwd))),
        Err(err) if matches!(err.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            Ok(Invocation::Help(err))
        }
        Err(err) => Err(err.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn run_config(args: &[&str]) -> RuntimeConfig {
        match resolve_invocation(args.iter().copied(), Path::new("/work")).unwrap() {
            Invocation::Run(config) => config,
            Invocation::Help(_) => panic!("unexpected help for {:?}", args),
        }
    }

    #[test]
    fn test_defaults() {
        let config = run_config(&["bin"]);
        assert_eq!(config.root, PathBuf::from("/work"));
        assert_eq!(config.output, PathBuf::from("structure.md"));
        assert_eq!(config.max_depth, None);
        assert!(config.extensions.is_empty());
        assert!(!config.use_gitignore);
        assert_eq!(config.ignore.len(), DEFAULT_IGNORES.len());
    }

    #[test]
    fn test_help_signal() {
        for flag in ["-h", "--help", "-V"] {
            let invocation = resolve_invocation(["bin", flag], Path::new("/work")).unwrap();
            assert!(matches!(invocation, Invocation::Help(_)), "{}", flag);
        }
    }

    #[test]
    fn test_ignore_patterns_append_without_duplicates() {
        let config = run_config(&["bin", "-i", "docs", "--ignore", "*.tmp", "-i", ".git", "-i", "docs"]);
        let extra: Vec<_> = config.ignore[DEFAULT_IGNORES.len()..].to_vec();
        assert_eq!(extra, vec!["docs", "*.tmp"]);
        assert_eq!(config.ignore[0], ".git");
    }

    #[test]
    fn test_positional_overrides_path_flag() {
        let config = run_config(&["bin", "-p", "flagged", "first", "second"]);
        assert_eq!(config.root, PathBuf::from("second"));

        let config = run_config(&["bin", "--path", "flagged"]);
        assert_eq!(config.root, PathBuf::from("flagged"));
    }

    #[test]
    fn test_max_depth_values() {
        assert_eq!(run_config(&["bin", "-d", "2"]).max_depth, Some(2));
        assert_eq!(run_config(&["bin", "--max-depth", "0"]).max_depth, None);
        // Non-numeric input falls back to unlimited
        assert_eq!(run_config(&["bin", "-d", "deep"]).max_depth, None);
        assert_eq!(run_config(&["bin", "-d", "-1"]).max_depth, None);
    }

    #[test]
    fn test_unknown_flags_are_ignored() {
        let config = run_config(&["bin", "--fancy", "-z", "-o", "tree.md"]);
        assert_eq!(config.output, PathBuf::from("tree.md"));
        assert_eq!(config.root, PathBuf::from("/work"));
    }

    #[test]
    fn test_dashed_values_and_switch_values_do_not_error() {
        let config = run_config(&["bin", "--ignore", "-tmp", "-o", "-out.md", "--gitignore=yes"]);
        assert_eq!(config.ignore.last().map(String::as_str), Some("-tmp"));
        assert_eq!(config.output, PathBuf::from("-out.md"));
        assert!(config.use_gitignore);
    }

    #[test]
    fn test_extensions_are_normalized() {
        let config = run_config(&["bin", "-e", ".rs", "--ext", "md", "-e", "rs", "-e", "."]);
        assert_eq!(config.extensions, vec!["rs", "md"]);
    }
}
