#![no_main]

use libfuzzer_sys::fuzz_target;
use rigel_core::{TextRange, TextSize};
use rigel_edit::Document;

mod utils;

// Oracle: whatever edit sequence is applied, a readable marker never points
// outside document bounds and edits never panic.
fuzz_target!(|data: &[u8]| {
    let Some(text) = utils::truncate_utf8(data) else {
        return;
    };
    let mut parts = text.split('\n');
    let Some(initial) = parts.next() else {
        return;
    };

    let mut document = Document::new(initial);
    let mut markers = Vec::new();
    for offset in 0..=u32::from(document.len()).min(64) {
        if let Ok(handle) = document.track_offset(TextSize::new(offset), offset % 2 == 0) {
            markers.push(handle);
        }
    }

    for edit in parts.take(32) {
        let mut fields = edit.splitn(3, ';');
        let (Some(start), Some(end), Some(replacement)) =
            (fields.next(), fields.next(), fields.next())
        else {
            continue;
        };
        let (Ok(start), Ok(end)) = (start.parse::<u32>(), end.parse::<u32>()) else {
            continue;
        };
        if start > end {
            continue;
        }
        let range = TextRange::new(TextSize::new(start), TextSize::new(end));
        // Invalid ranges are rejected with errors, never panics.
        let _ = document.replace(range, replacement);

        for &handle in &markers {
            if let Some(pos) = document.read_offset(handle) {
                assert!(pos <= document.len(), "marker drifted out of bounds");
            }
        }
    }
});
