// Declare modules
pub mod cli;
pub mod config;
pub mod formatter;
pub mod models;
pub mod scanner;

use anyhow::{bail, Context, Result};
use chrono::Local;
use std::env;
use std::ffi::OsString;
use std::fs;
use std::path::Path;

use self::config::{resolve_invocation, Invocation};
use self::formatter::OutputGenerator;
use self::models::RuntimeConfig;
use self::scanner::Scanner;

/// Initializes components and orchestrates data flow.
pub fn run<I, T>(args: I) -> Result<()>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    // 1. Parse Args
    let current_dir = env::current_dir().context("Failed to get current directory")?;
    let config = match resolve_invocation(args, &current_dir)? {
        Invocation::Help(message) => {
            message.print().context("Failed to print help")?;
            return Ok(());
        }
        Invocation::Run(config) => config,
    };

    // 2. Validate Root
    let metadata = fs::metadata(&config.root)
        .with_context(|| format!("Path does not exist: {}", config.root.display()))?;
    if !metadata.is_dir() {
        bail!("Path is not a directory: {}", config.root.display());
    }

    // 3. Scan & Format
    log::info!("📂 Scanning {}", config.root.display());
    let document = generate_document(&config)?;

    // 4. Write
    log::info!("📝 Writing {}", config.output.display());
    fs::write(&config.output, document)
        .with_context(|| format!("Failed to write {}", config.output.display()))?;

    println!("✅ Project structure saved to {}", config.output.display());
    Ok(())
}

/// Builds the full Markdown document for an already validated root.
pub fn generate_document(config: &RuntimeConfig) -> Result<String> {
    let scanner = Scanner::new(config)?;
    let tree = scanner.scan();

    if tree.is_empty() {
        log::warn!("⚠️ Nothing to list under {}", config.root.display());
    }

    let root_name = root_name(&config.root)?;
    Ok(OutputGenerator::format_document(&root_name, &tree, &Local::now()))
}

/// Last path component; paths like `.` or `..` are canonicalized first.
fn root_name(root: &Path) -> Result<String> {
    if let Some(name) = root.file_name() {
        return Ok(name.to_string_lossy().into_owned());
    }

    let resolved = fs::canonicalize(root)
        .with_context(|| format!("Failed to resolve {}", root.display()))?;
    Ok(resolved
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        // filesystem root has no name
        .unwrap_or_else(|| resolved.display().to_string()))
}
