//! Where query text comes from.
//!
//! A single query is resolved in order: `--file`, then the positional
//! argument (read as a file when it names an existing `.txt`/`.query`
//! file), then piped stdin. Stdin is only read when it is not a terminal.

use std::fs;
use std::io::{self, IsTerminal, Read};
use std::path::{Path, PathBuf};

/// Extensions that mark a positional argument as a query file.
const QUERY_FILE_EXTENSIONS: [&str; 2] = ["txt", "query"];

/// Errors that can occur while collecting query text.
#[derive(Debug, thiserror::Error)]
pub enum InputError {
    /// Failed to read a query file.
    #[error("failed to read {path}: {source}")]
    FileFailed {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Failed to read from stdin.
    #[error("failed to read stdin: {0}")]
    StdinFailed(#[source] io::Error),

    /// Nothing on the command line and nothing piped.
    #[error("no query provided: pass one as an argument, with --file, or on stdin")]
    NoInput,
}

/// Abstraction over stdin so tests can simulate piping.
pub trait StdinReader {
    /// `true` when stdin is interactive.
    fn is_terminal(&self) -> bool;

    /// Reads all of stdin. Only called when `is_terminal()` is `false`.
    fn read_to_string(&self) -> io::Result<String>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct RealStdin;

impl StdinReader for RealStdin {
    fn is_terminal(&self) -> bool {
        io::stdin().is_terminal()
    }

    fn read_to_string(&self) -> io::Result<String> {
        let mut buffer = String::new();
        io::stdin().read_to_string(&mut buffer)?;
        Ok(buffer)
    }
}

/// Resolves the text of a single query.
///
/// File and stdin content is trimmed; a literal argument is used as given.
pub fn resolve_query(
    arg: Option<&str>,
    file: Option<&Path>,
    stdin: &dyn StdinReader,
) -> Result<String, InputError> {
    if let Some(path) = file {
        return read_file(path).map(|text| text.trim().to_string());
    }

    if let Some(arg) = arg {
        let path = Path::new(arg);
        if looks_like_query_file(path) && path.is_file() {
            tracing::debug!(path = %path.display(), "reading query from file argument");
            return read_file(path).map(|text| text.trim().to_string());
        }
        return Ok(arg.to_string());
    }

    read_piped(stdin)?
        .map(|text| text.trim().to_string())
        .ok_or(InputError::NoInput)
}

/// Reads batch input: the file at `path`, else piped stdin.
pub fn read_batch(path: Option<&Path>, stdin: &dyn StdinReader) -> Result<String, InputError> {
    match path {
        Some(path) => read_file(path),
        None => read_piped(stdin)?.ok_or(InputError::NoInput),
    }
}

fn looks_like_query_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| QUERY_FILE_EXTENSIONS.contains(&ext))
}

fn read_file(path: &Path) -> Result<String, InputError> {
    fs::read_to_string(path).map_err(|source| InputError::FileFailed {
        path: path.to_path_buf(),
        source,
    })
}

fn read_piped(stdin: &dyn StdinReader) -> Result<Option<String>, InputError> {
    if stdin.is_terminal() {
        return Ok(None);
    }
    stdin
        .read_to_string()
        .map(Some)
        .map_err(InputError::StdinFailed)
}
