//! Find URLs in noisy free text.
//!
//! ```
//! let text = "<maxx> revert back to rotation (http://reltru.com/sandbox/play.html)";
//! let urls = urlfind::find_urls(text);
//! assert_eq!(urls.len(), 1);
//! assert_eq!(urls[0].value(), "http://reltru.com/sandbox/play.html");
//! ```

pub mod config;
pub mod input;
pub mod known;
pub mod report;
pub mod url;

pub use url::{Match, find_urls};
