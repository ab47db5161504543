#![no_main]

use libfuzzer_sys::fuzz_target;
use urlfind::find_urls;
use urlfind::url::uncovered_dots;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };

    // Must not panic.
    let urls = find_urls(text);

    // Ranges must be within bounds and on char boundaries.
    for m in &urls {
        assert!(m.start() <= m.end(), "inverted range {:?}", m.range());
        assert!(
            m.end() <= text.len(),
            "range {:?} out of bounds (len={})",
            m.range(),
            text.len(),
        );
        assert!(text.get(m.range()).is_some(), "range {:?} splits a char", m.range());
    }

    // Matches must be sorted and non-overlapping.
    for pair in urls.windows(2) {
        assert!(
            pair[0].end() <= pair[1].start(),
            "overlapping matches: {:?} and {:?}",
            pair[0].range(),
            pair[1].range(),
        );
    }

    // Deterministic.
    assert_eq!(urls, find_urls(text));

    for dot in uncovered_dots(text, &urls) {
        assert!(urls.iter().all(|m| !m.range().contains(&dot)));
    }
});
