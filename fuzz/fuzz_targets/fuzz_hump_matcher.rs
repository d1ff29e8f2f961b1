#![no_main]

use libfuzzer_sys::fuzz_target;
use rigel_complete::{MatchDegree, PrefixMatcher};

mod utils;

// Oracle: the matcher must never panic, the empty prefix matches everything,
// and an exact string always matches itself at the best degree.
fuzz_target!(|data: &[u8]| {
    let Some(text) = utils::truncate_utf8(data) else {
        return;
    };
    let Some((prefix, candidate)) = text.split_once('\n') else {
        return;
    };

    let matcher = PrefixMatcher::new(prefix);
    let _ = matcher.degree(candidate);

    assert!(PrefixMatcher::new("").degree(candidate).is_some());
    if !prefix.is_empty() {
        assert_eq!(matcher.degree(prefix), Some(MatchDegree::Exact));
    }
});
