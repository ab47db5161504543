//! Input source abstraction: file path or stdin pipe.
//!
//! Chat logs are not always valid UTF-8, so invalid sequences are replaced
//! rather than rejected. Offsets reported by the scanner refer to the decoded
//! text.

use std::fs::File;
use std::io::{self, IsTerminal, Read};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use log::debug;

/// Input source for the scanner.
#[derive(Debug)]
pub enum InputSource {
    File(PathBuf),
    Stdin,
}

impl InputSource {
    /// Pick the input source from the CLI argument.
    pub fn from_arg(input: Option<PathBuf>) -> Result<Self> {
        if is_stdin_input(input.as_deref()) {
            return Ok(InputSource::Stdin);
        }
        match input {
            Some(p) => Ok(InputSource::File(p)),
            None => anyhow::bail!("input file required (or pipe via stdin)"),
        }
    }

    /// Display name for diagnostics and the `tsv` output column.
    pub fn display_name(&self) -> String {
        match self {
            InputSource::File(path) => path.display().to_string(),
            InputSource::Stdin => "<stdin>".to_string(),
        }
    }

    /// Read the whole input.
    pub fn read_to_string(&self) -> Result<String> {
        let text = match self {
            InputSource::File(path) => {
                let file =
                    File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
                read_lossy(file).with_context(|| format!("failed to read {}", path.display()))?
            }
            InputSource::Stdin => read_lossy(io::stdin()).context("failed to read stdin")?,
        };
        debug!("input: read {} bytes from {}", text.len(), self.display_name());
        Ok(text)
    }
}

/// Read everything from `reader`, replacing invalid UTF-8.
fn read_lossy<R: Read>(mut reader: R) -> io::Result<String> {
    let mut buf = Vec::new();
    reader.read_to_end(&mut buf)?;
    match String::from_utf8(buf) {
        Ok(s) => Ok(s),
        Err(e) => Ok(String::from_utf8_lossy(e.as_bytes()).into_owned()),
    }
}

/// Detect whether the given CLI input argument represents stdin.
///
/// Returns `true` if input is `Some("-")`, or if input is `None` and stdin is not a terminal.
pub fn is_stdin_input(input: Option<&Path>) -> bool {
    match input {
        Some(p) => p.as_os_str() == "-",
        None => !io::stdin().is_terminal(),
    }
}
