use clap::{CommandFactory, Parser};
use std::convert::Infallible;
use std::ffi::OsString;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Render a directory tree as a Markdown document",
    args_override_self = true
)]
pub struct Cli {
    /// Root directory to scan (same as --path)
    #[arg(value_name = "DIR")]
    pub roots: Vec<PathBuf>,

    /// Output file path
    #[arg(
        long,
        short = 'o',
        value_name = "FILE",
        default_value = "structure.md",
        allow_hyphen_values = true
    )]
    pub output: PathBuf,

    /// Root directory to scan (defaults to the current directory)
    #[arg(long, short = 'p', value_name = "DIR", allow_hyphen_values = true)]
    pub path: Option<PathBuf>,

    /// Additional name pattern to ignore; '*' matches anything (repeatable)
    #[arg(long, short = 'i', value_name = "PATTERN", allow_hyphen_values = true)]
    pub ignore: Vec<String>,

    /// Maximum recursion depth; 0 means unlimited
    #[arg(
        long,
        short = 'd',
        value_name = "N",
        default_value = "0",
        allow_hyphen_values = true,
        value_parser = parse_max_depth
    )]
    pub max_depth: usize,

    /// Only list files with this extension, e.g. 'rs' or '.md' (repeatable)
    #[arg(long, short = 'e', value_name = "EXT", allow_hyphen_values = true)]
    pub ext: Vec<String>,

    /// Also skip entries matched by the root directory's .gitignore
    #[arg(long)]
    pub gitignore: bool,
}

/// Anything that is not a non-negative integer means "no limit".
fn parse_max_depth(raw: &str) -> Result<usize, Infallible> {
    Ok(raw.trim().parse().unwrap_or(0))
}

/// Drops flags the command does not declare, so that they are ignored rather
/// than rejected. The first element (the binary name) is always kept.
pub fn retain_known_flags<I, T>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    let mut command = Cli::command();
    command.build();

    // (takes_value) lookups by long name and short char
    let long_flag = |name: &str| {
        command
            .get_arguments()
            .find(|a| a.get_long() == Some(name))
            .map(|a| a.get_action().takes_values())
    };
    let short_flag = |c: char| {
        command
            .get_arguments()
            .find(|a| a.get_short() == Some(c))
            .map(|a| a.get_action().takes_values())
    };

    let mut args = args.into_iter().map(Into::into);
    let mut kept: Vec<OsString> = args.next().into_iter().collect();

    while let Some(arg) = args.next() {
        let text = arg.to_string_lossy().into_owned();

        if text == "--" {
            kept.push(arg);
            kept.extend(args.by_ref());
            break;
        }

        // (flag token without any inline value, takes_value, has inline value)
        let lookup = if let Some(long) = text.strip_prefix("--") {
            let (name, inline) = match long.split_once('=') {
                Some((name, _)) => (name, true),
                None => (long, false),
            };
            long_flag(name).map(|takes_value| (format!("--{}", name), takes_value, inline))
        } else if let Some(short) = text.strip_prefix('-').filter(|s| !s.is_empty()) {
            let mut chars = short.chars();
            let first = chars.next();
            let attached = chars.next().is_some();
            first.and_then(|c| {
                short_flag(c).map(|takes_value| (format!("-{}", c), takes_value, attached))
            })
        } else {
            kept.push(arg);
            continue;
        };

        match lookup {
            Some((_, true, true)) | Some((_, false, false)) => kept.push(arg),
            // switches never carry a value; keep the bare flag
            Some((bare, false, true)) => {
                log::debug!("Dropping value of '{}'", text);
                kept.push(bare.into());
            }
            Some((_, true, false)) => match args.next() {
                Some(value) => {
                    kept.push(arg);
                    kept.push(value);
                }
                None => log::debug!("Dropping '{}': no value follows", text),
            },
            None => log::debug!("Ignoring unknown flag '{}'", text),
        }
    }

    kept
}
