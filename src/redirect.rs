//! Output redirection: finding `>`-style markers in a line and opening their targets.
//!
//! Only one redirection is honoured per line. A stderr marker (`2>`, `2>>`) anywhere in
//! the line wins; stdout markers (`>`, `1>`, `>>`, `1>>`) are only looked for when there
//! is none. Everything after the marker, trimmed, is the target path.

use crate::error::ShellError;
use regex::Regex;
use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

static STDERR_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"2>>|2>").expect("stderr marker pattern is valid"));

// Alternation order decides between markers that start at the same position.
static STDOUT_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"1>>|>>|1>|>").expect("stdout marker pattern is valid"));

/// Where one of a command's output streams goes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum OutputTarget {
    /// The shell's own stream (the terminal).
    #[default]
    Inherit,
    /// A file, appended to or truncated first.
    File { path: PathBuf, append: bool },
}

/// A line split into the command part and its output targets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Redirections<'a> {
    pub command: &'a str,
    pub stdout: OutputTarget,
    pub stderr: OutputTarget,
}

/// Splits `line` at its redirection marker, if it has one.
///
/// Markers are found by plain text search, so a `>` inside quotes is still a marker.
pub fn split_redirections(line: &str) -> Redirections<'_> {
    if let Some(m) = STDERR_MARKER.find(line) {
        return Redirections {
            command: line[..m.start()].trim(),
            stdout: OutputTarget::Inherit,
            stderr: file_target(&line[m.end()..], m.as_str() == "2>>"),
        };
    }

    if let Some(m) = STDOUT_MARKER.find(line) {
        return Redirections {
            command: line[..m.start()].trim(),
            stdout: file_target(&line[m.end()..], matches!(m.as_str(), "1>>" | ">>")),
            stderr: OutputTarget::Inherit,
        };
    }

    Redirections {
        command: line,
        stdout: OutputTarget::Inherit,
        stderr: OutputTarget::Inherit,
    }
}

fn file_target(rest: &str, append: bool) -> OutputTarget {
    OutputTarget::File {
        path: PathBuf::from(rest.trim()),
        append,
    }
}

/// Opens a redirection target for writing, creating missing parent directories.
///
/// Relative paths are resolved against `cwd`. The file is truncated unless `append` is set.
pub fn open_target(path: &Path, append: bool, cwd: &Path) -> Result<File, ShellError> {
    let full = cwd.join(path);
    let redirect_err = |source: io::Error| ShellError::Redirect {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = full.parent() {
        fs::create_dir_all(parent).map_err(redirect_err)?;
    }

    OpenOptions::new()
        .create(true)
        .write(true)
        .append(append)
        .truncate(!append)
        .open(&full)
        .map_err(redirect_err)
}
