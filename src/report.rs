//! Line-oriented scanning and output formatting for the `urlfind` binary.

use std::collections::HashSet;
use std::io::{self, Write};

use clap::ValueEnum;
use serde::Deserialize;

use crate::config::Config;
use crate::url::{Match, find_urls};

/// Output layout, one match per line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    /// The URL only.
    #[default]
    Plain,
    /// `line:start-end<TAB>url`
    Offsets,
    /// `source<TAB>line<TAB>start<TAB>end<TAB>url`
    Tsv,
}

/// A URL together with the 1-based line it was found on.
///
/// Offsets in `url` are relative to the line, not the whole input.
#[derive(Debug, Clone, Copy)]
pub struct LineMatch<'a> {
    pub line: usize,
    pub url: Match<'a>,
}

/// Scan `text` one line at a time.
pub fn scan_lines(text: &str) -> impl Iterator<Item = LineMatch<'_>> {
    text.lines().enumerate().flat_map(|(idx, line)| {
        find_urls(line)
            .into_iter()
            .map(move |url| LineMatch { line: idx + 1, url })
    })
}

/// Applies the filter/unique settings and writes formatted matches.
pub struct Reporter<'c> {
    config: &'c Config,
    seen: HashSet<String>,
}

impl<'c> Reporter<'c> {
    pub fn new(config: &'c Config) -> Self {
        Self {
            config,
            seen: HashSet::new(),
        }
    }

    fn accept(&mut self, value: &str) -> bool {
        if let Some(re) = &self.config.filter
            && !re.is_match(value)
        {
            return false;
        }
        !self.config.unique || self.seen.insert(value.to_owned())
    }

    fn format(&self, source: &str, m: &LineMatch<'_>) -> String {
        match self.config.format {
            Format::Plain => m.url.value().to_owned(),
            Format::Offsets => format!(
                "{}:{}-{}\t{}",
                m.line,
                m.url.start(),
                m.url.end(),
                m.url
            ),
            Format::Tsv => format!(
                "{source}\t{}\t{}\t{}\t{}",
                m.line,
                m.url.start(),
                m.url.end(),
                m.url
            ),
        }
    }

    /// Scan `text` and write every accepted match to `out`.
    ///
    /// Returns the number of lines written.
    pub fn report<W: Write>(&mut self, out: &mut W, source: &str, text: &str) -> io::Result<usize> {
        let mut written = 0;
        for m in scan_lines(text) {
            if !self.accept(m.url.value()) {
                continue;
            }
            writeln!(out, "{}", self.format(source, &m))?;
            written += 1;
        }
        Ok(written)
    }
}
