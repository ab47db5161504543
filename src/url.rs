//! URL extraction from noisy free text (chat logs, informal messages).
//!
//! The scanner does not parse a URI grammar. It anchors on every `://`,
//! walks backward to find the scheme and forward to find a likely end, then
//! discards candidates swallowed by an earlier match:
//!
//! 1. Locate every `://` anchor.
//! 2. Resolve each start against [`KNOWN_SCHEMES`], falling back to a run of
//!    protocol characters.
//! 3. Resolve each end: host up to the first space, `/` or `#`, then a
//!    bracket-balanced path scan bounded by the next anchor (or the one after
//!    that for a [nested host](crate::known::KNOWN_NESTED_HOSTS)).
//! 4. Drop candidates that start inside the previous accepted match.
//!
//! All offsets are byte offsets into the input. Every delimiter the scanner
//! looks at is ASCII, so resolved offsets always land on char boundaries.

use std::fmt;
use std::ops::Range;

use log::{Level, log_enabled, trace};

use crate::known::{KNOWN_SCHEMES, is_protocol_byte, nested_host_at};

const ANCHOR: &str = "://";

/// A URL found in the input text. Borrows the text it was found in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Match<'a> {
    text: &'a str,
    start: usize,
    end: usize,
}

impl<'a> Match<'a> {
    /// Byte offset of the first character of the URL.
    pub fn start(&self) -> usize {
        self.start
    }

    /// Byte offset one past the last character of the URL.
    pub fn end(&self) -> usize {
        self.end
    }

    /// Length of the URL in bytes.
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// Same as [`Match::len`].
    pub fn count(&self) -> usize {
        self.len()
    }

    /// Whether the match covers no bytes.
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Byte range of the URL in the input.
    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }

    /// The URL exactly as it appears in the input.
    pub fn value(&self) -> &'a str {
        &self.text[self.start..self.end]
    }
}

impl fmt::Display for Match<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.value())
    }
}

/// A candidate span around the anchor at `anchor`.
#[derive(Debug, Clone, Copy)]
struct Candidate {
    anchor: usize,
    start: usize,
    end: usize,
}

/// Outcome of resolving one anchor.
#[derive(Debug, Clone, Copy)]
enum Resolution {
    Accepted(Candidate),
    Rejected,
}

impl Resolution {
    fn start(&self) -> Option<usize> {
        match self {
            Resolution::Accepted(c) => Some(c.start),
            Resolution::Rejected => None,
        }
    }
}

/// Find every URL in `text`.
///
/// Matches are returned in input order and never overlap. Never fails: text
/// without a plausible URL yields an empty vector.
pub fn find_urls(text: &str) -> Vec<Match<'_>> {
    let anchors = anchor_offsets(text);
    if anchors.is_empty() {
        return Vec::new();
    }

    let mut resolutions: Vec<Resolution> = anchors
        .iter()
        .map(|&anchor| match resolve_start(text, anchor) {
            Some(start) => Resolution::Accepted(Candidate {
                anchor,
                start,
                end: anchor + ANCHOR.len(),
            }),
            None => Resolution::Rejected,
        })
        .collect();

    // End resolution bounds each candidate by the starts that follow it, so
    // snapshot them before any candidate is rewritten.
    let starts: Vec<Option<usize>> = resolutions.iter().map(Resolution::start).collect();

    for (i, slot) in resolutions.iter_mut().enumerate() {
        let Resolution::Accepted(candidate) = *slot else {
            continue;
        };
        *slot = match resolve_end(text, &candidate, &starts[i + 1..]) {
            Some(end) => Resolution::Accepted(Candidate { end, ..candidate }),
            None => {
                trace!("find_urls: rejected anchor at {}", candidate.anchor);
                Resolution::Rejected
            }
        };
    }

    let mut matches = Vec::new();
    let mut last_end = 0;
    for resolution in resolutions {
        let Resolution::Accepted(c) = resolution else {
            continue;
        };
        if c.start < last_end {
            trace!("find_urls: anchor at {} inside previous match", c.anchor);
            continue;
        }
        last_end = c.end;
        matches.push(Match {
            text,
            start: c.start,
            end: c.end,
        });
    }

    debug_assert!(
        matches.windows(2).all(|w| w[0].end <= w[1].start),
        "overlapping matches"
    );

    if log_enabled!(Level::Trace) {
        trace!(
            "find_urls: {} anchor(s), {} match(es), {} dot(s) outside matches",
            anchors.len(),
            matches.len(),
            uncovered_dots(text, &matches).len()
        );
    }

    matches
}

/// Byte offsets of every `://`, advancing one byte after each hit.
fn anchor_offsets(text: &str) -> Vec<usize> {
    let mut anchors = Vec::new();
    let mut from = 0;
    while let Some(pos) = text.get(from..).and_then(|rest| rest.find(ANCHOR)) {
        anchors.push(from + pos);
        from += pos + 1;
    }
    anchors
}

/// Walk backward from the anchor to the start of the scheme.
///
/// Returns `None` when nothing precedes the anchor.
fn resolve_start(text: &str, anchor: usize) -> Option<usize> {
    let before = text.get(..anchor)?;
    for scheme in KNOWN_SCHEMES {
        let Some(prefix) = scheme.strip_suffix(ANCHOR) else {
            continue;
        };
        if before.ends_with(prefix) {
            return Some(anchor - prefix.len());
        }
    }

    let bytes = before.as_bytes();
    let mut start = anchor;
    while start > 0 && is_protocol_byte(bytes[start - 1]) {
        start -= 1;
    }
    if start < anchor {
        return Some(start);
    }

    // No protocol characters: keep the single character before the anchor.
    before.char_indices().next_back().map(|(i, _)| i)
}

/// Walk forward from the anchor to the likely end of the URL.
///
/// `following` holds the starts of all later candidates. Returns `None` when
/// the candidate is rejected.
fn resolve_end(text: &str, candidate: &Candidate, following: &[Option<usize>]) -> Option<usize> {
    let bytes = text.as_bytes();
    let start = candidate.start;
    let dns_start = candidate.end;

    let terminator = bytes
        .get(dns_start..)?
        .iter()
        .position(|&b| matches!(b, b' ' | b'/' | b'#'))
        .map(|p| dns_start + p);
    let mut end = terminator.unwrap_or(bytes.len());

    // A scheme followed by a dotless token is not a URL.
    if !bytes.get(start..end)?.contains(&b'.') {
        return None;
    }

    if let Some(t) = terminator
        && bytes[t] != b' '
    {
        end = scan_path(bytes, start, end, max_end(bytes, dns_start, following))?;
    }

    while let Some(b'.' | b'!' | b'?') = bytes.get(start..end).and_then(|s| s.last().copied()) {
        end -= 1;
    }

    text.get(start..end).map(|_| end)
}

/// Upper bound for a path scan: the start of the next candidate, or of the
/// one after it when the host is known to embed URLs.
fn max_end(bytes: &[u8], dns_start: usize, following: &[Option<usize>]) -> usize {
    let skip = usize::from(nested_host_at(bytes, dns_start).is_some());
    following
        .get(skip)
        .copied()
        .flatten()
        .unwrap_or(bytes.len())
}

/// Scan a path or fragment from `from` up to `max_end`, tracking bracket depth.
fn scan_path(bytes: &[u8], start: usize, from: usize, max_end: usize) -> Option<usize> {
    let (mut parens, mut brackets, mut curlies) = (0i32, 0i32, 0i32);
    let mut saw_space = false;

    let mut i = from;
    while i < max_end {
        let b = *bytes.get(i)?;
        match b {
            b'(' => parens += 1,
            b'[' => brackets += 1,
            b'{' => curlies += 1,
            b')' => parens -= 1,
            b']' => brackets -= 1,
            b'}' => curlies -= 1,
            b' ' => saw_space = true,
            _ => {}
        }

        // Unmatched closer: surrounding punctuation.
        if parens < 0 || brackets < 0 || curlies < 0 {
            break;
        }
        if b == b' ' && parens == 0 && brackets == 0 && curlies == 0 {
            break;
        }
        // Sentence punctuation.
        if i + 2 <= max_end && matches!(b, b'.' | b'!' | b'?') && bytes.get(i + 1) == Some(&b' ') {
            break;
        }
        i += 1;
    }

    if i == max_end && saw_space && (parens > 0 || brackets > 0 || curlies > 0) {
        // Unclosed bracket: fall back to the first plain space.
        let space = bytes.get(start..max_end)?.iter().position(|&b| b == b' ')?;
        return Some(start + space);
    }
    Some(i)
}

/// Offsets of every `.` in `text` not covered by one of `matches`.
///
/// This is the candidate list for bare-domain detection (`www.example.com`,
/// `example.org`). Nothing promotes these offsets to matches yet.
/// `matches` must be sorted and non-overlapping, as returned by [`find_urls`].
pub fn uncovered_dots(text: &str, matches: &[Match<'_>]) -> Vec<usize> {
    let mut remaining = matches.iter().peekable();
    text.match_indices('.')
        .map(|(i, _)| i)
        .filter(|&i| {
            while remaining.next_if(|m| m.end <= i).is_some() {}
            !remaining.peek().is_some_and(|m| m.start <= i)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn values(text: &str) -> Vec<&str> {
        find_urls(text).iter().map(Match::value).collect()
    }

    #[test]
    fn basic_url() {
        assert_eq!(
            values("Visit https://example.invalid for details"),
            vec!["https://example.invalid"]
        );
    }

    #[test]
    fn offsets() {
        let urls = find_urls("Visit https://example.invalid for details");
        assert_eq!(urls.len(), 1);
        assert_eq!(urls[0].start(), 6);
        assert_eq!(urls[0].end(), 29);
        assert_eq!(urls[0].len(), 23);
        assert_eq!(urls[0].count(), 23);
        assert!(!urls[0].is_empty());
        assert_eq!(urls[0].range(), 6..29);
        assert_eq!(urls[0].to_string(), "https://example.invalid");
    }

    #[test]
    fn empty_text() {
        assert!(find_urls("").is_empty());
    }

    #[test]
    fn no_url() {
        assert!(find_urls("plain text").is_empty());
    }

    #[test]
    fn trailing_period_excluded() {
        assert_eq!(
            values("See https://example.invalid/page."),
            vec!["https://example.invalid/page"]
        );
    }

    #[test]
    fn trailing_exclamation_excluded() {
        assert_eq!(values("https://example.invalid!"), vec!["https://example.invalid"]);
    }

    #[test]
    fn trailing_question_excluded() {
        assert_eq!(values("https://example.invalid?"), vec!["https://example.invalid"]);
    }

    #[test]
    fn trailing_comma_kept() {
        // Only sentence terminators are stripped.
        assert_eq!(
            values("https://example.invalid/page, more"),
            vec!["https://example.invalid/page,"]
        );
    }

    #[test]
    fn sentence_period_inside_text() {
        assert_eq!(
            values("Read http://example.com/a. Then more."),
            vec!["http://example.com/a"]
        );
    }

    #[test]
    fn multiple_urls() {
        assert_eq!(
            values("https://a.invalid and https://b.invalid"),
            vec!["https://a.invalid", "https://b.invalid"]
        );
    }

    #[test]
    fn path_query_fragment() {
        assert_eq!(
            values("https://example.invalid/path?q=1&r=2#frag"),
            vec!["https://example.invalid/path?q=1&r=2#frag"]
        );
    }

    #[test]
    fn parenthesized_url() {
        assert_eq!(
            values("(https://example.invalid/wiki/Rust_(lang))"),
            vec!["https://example.invalid/wiki/Rust_(lang)"]
        );
    }

    #[test]
    fn unclosed_paren_falls_back_to_space() {
        assert_eq!(
            values("see http://example.com/a_(b c d"),
            vec!["http://example.com/a_(b"]
        );
    }

    #[test]
    fn japanese_text() {
        assert_eq!(
            values("参考: https://example.invalid を見て"),
            vec!["https://example.invalid"]
        );
    }

    #[test]
    fn dotless_host_rejected() {
        assert!(find_urls("see irc://server here").is_empty());
        assert!(find_urls("check http://localhost now").is_empty());
    }

    #[test]
    fn dot_check_runs_before_strip() {
        assert_eq!(values("visit http://localhost. now"), vec!["http://localhost"]);
        // The only dot was stripped, so the value alone is no longer a URL.
        assert!(find_urls("http://localhost").is_empty());
    }

    #[test]
    fn stripped_dot_after_bare_anchor() {
        assert_eq!(values("://://. "), vec!["/://"]);
        assert!(find_urls("/://").is_empty());
    }

    #[test]
    fn unmatched_closer_after_space_keeps_space() {
        let text = "://://web.archive.org/[ }";
        assert_eq!(values(text), vec!["/://web.archive.org/[ "]);
        // Alone, the open bracket is unbalanced and the value is cut at the space.
        assert_eq!(values("/://web.archive.org/[ "), vec!["/://web.archive.org/["]);
    }

    #[test]
    fn longer_scheme_not_cut() {
        assert_eq!(values("xhttps://a.com"), vec!["https://a.com"]);
        assert_eq!(
            values("co svn+ssh://host.org/repo"),
            vec!["svn+ssh://host.org/repo"]
        );
    }

    #[test]
    fn unknown_scheme_uses_protocol_run() {
        assert_eq!(
            values("clone git://github.com/x now"),
            vec!["git://github.com/x"]
        );
        assert_eq!(values("abc+def://x.org"), vec!["abc+def://x.org"]);
    }

    #[test]
    fn dash_not_a_protocol_char() {
        assert_eq!(values("my-proto://x.org"), vec!["proto://x.org"]);
    }

    #[test]
    fn anchor_without_scheme_keeps_preceding_char() {
        assert_eq!(values("x ://a.com"), vec![" ://a.com"]);
        assert_eq!(values("é://a.com"), vec!["é://a.com"]);
    }

    #[test]
    fn anchor_at_start_rejected() {
        assert!(find_urls("://a.com").is_empty());
    }

    #[test]
    fn back_to_back_duplicates() {
        let urls = find_urls("http://x.com/yhttp://x.com/y");
        assert_eq!(urls.len(), 2);
        assert_eq!(urls[0].value(), "http://x.com/y");
        assert_eq!(urls[1].value(), "http://x.com/y");
        assert_eq!(urls[0].end(), urls[1].start());
    }

    #[test]
    fn nested_host_spans_inner_url() {
        let text = "http://web.archive.org/web/*/http://example.com";
        assert_eq!(values(text), vec![text]);
    }

    #[test]
    fn lone_anchors() {
        assert!(find_urls(":// :// ://").is_empty());
        assert!(find_urls(":///").is_empty());
    }

    #[test]
    fn anchor_offsets_found() {
        assert_eq!(anchor_offsets("a://b c://d"), vec![1, 7]);
        assert!(anchor_offsets(":/").is_empty());
    }

    #[test]
    fn uncovered_dots_skip_matches() {
        let text = "a.b http://x.com c.d";
        let urls = find_urls(text);
        assert_eq!(uncovered_dots(text, &urls), vec![1, 18]);
    }

    #[test]
    fn uncovered_dots_without_matches() {
        assert_eq!(uncovered_dots("yoursubdomain.dyndns.com", &[]), vec![13, 20]);
    }
}
