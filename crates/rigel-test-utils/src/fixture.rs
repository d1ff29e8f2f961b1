//! `<caret>`-marker text fixtures.

use rigel_core::{TextRange, TextSize};

const CARET: &str = "<caret>";

/// A source snippet with the caret marker stripped out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fixture {
    pub text: String,
    pub caret: TextSize,
}

impl Fixture {
    /// Panics when the marker is missing; fixtures are test-authored.
    pub fn parse(source: &str) -> Fixture {
        let caret = source
            .find(CARET)
            .unwrap_or_else(|| panic!("fixture has no {CARET} marker: {source:?}"));
        let mut text = String::with_capacity(source.len() - CARET.len());
        text.push_str(&source[..caret]);
        text.push_str(&source[caret + CARET.len()..]);
        Fixture {
            text,
            caret: TextSize::new(caret as u32),
        }
    }

    /// Span of the identifier characters immediately before the caret: the
    /// typed prefix an insertion replaces.
    pub fn prefix_range(&self) -> TextRange {
        let caret = usize::from(self.caret);
        let start = self.text[..caret]
            .rfind(|c: char| !c.is_ascii_alphanumeric() && c != '_')
            .map(|i| i + 1)
            .unwrap_or(0);
        TextRange::new(TextSize::new(start as u32), self.caret)
    }

    pub fn prefix(&self) -> &str {
        let range = self.prefix_range();
        &self.text[usize::from(range.start())..usize::from(range.end())]
    }
}
