//! Static lookup tables consulted by the scanner.

/// Recognized protocol prefixes, each ending in `://`.
///
/// Order matters: the first prefix that matches the text before an anchor wins.
pub static KNOWN_SCHEMES: &[&str] = &[
    "http://",
    "https://",
    "file://",
    "ftp://",
    "irc://",
    "ircs://",
    "svn://",
    "svn+ssh://",
];

/// Hosts whose URLs legitimately embed another full URL in their path
/// (e.g. `http://web.archive.org/web/*/http://example.com`).
pub static KNOWN_NESTED_HOSTS: &[&str] = &["web.archive.org"];

/// Top-level domain suffixes for bare-domain detection. Not consulted by
/// `find_urls` yet.
pub static KNOWN_TLDS: &[&str] = &[".net", ".org", ".com"];

/// Beginning-level domain prefixes and the scheme they imply. Not consulted
/// by `find_urls` yet.
pub static KNOWN_BLDS: &[(&str, &str)] = &[("www.", "http"), ("ftp.", "ftp"), ("irc.", "irc")];

/// Whether `b` may appear in a scheme that is not in [`KNOWN_SCHEMES`].
///
/// `.` and `-` are legal in real schemes but are left out: sentence fragments
/// ending in a colon produce too many false positives otherwise. Schemes like
/// `svn+ssh` go in the table instead.
pub fn is_protocol_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'+'
}

/// Returns the known nested host starting at `offset`, if any.
///
/// The host must be followed by at least one more byte.
pub fn nested_host_at(bytes: &[u8], offset: usize) -> Option<&'static str> {
    KNOWN_NESTED_HOSTS.iter().copied().find(|host| {
        offset + host.len() < bytes.len()
            && bytes[offset..offset + host.len()] == *host.as_bytes()
    })
}
