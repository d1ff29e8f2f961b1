//! A mutable text buffer with edit-adjusted offset markers.
//!
//! Markers are the backbone of the insertion engine: grammar-sensitive side
//! effects (auto-import, qualification) insert text earlier in the document
//! mid-insertion, and every position the engine still needs must survive
//! that. A marker either moves consistently with edits or reports itself
//! gone (`None`); it never silently points at the wrong place.

use rigel_core::{EditError, TextRange, TextSize};

/// Handle to a tracked offset. Valid for the lifetime of the document that
/// issued it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OffsetHandle(usize);

#[derive(Debug, Clone)]
struct Marker {
    pos: TextSize,
    /// An insertion exactly at the marker pushes it right when set, leaves
    /// it in place otherwise.
    moves_with_insert: bool,
    valid: bool,
}

#[derive(Debug, Clone)]
pub struct Document {
    text: String,
    read_only: bool,
    markers: Vec<Marker>,
}

impl Document {
    pub fn new(text: impl Into<String>) -> Document {
        Document {
            text: text.into(),
            read_only: false,
            markers: Vec::new(),
        }
    }

    pub fn new_read_only(text: impl Into<String>) -> Document {
        Document {
            read_only: true,
            ..Document::new(text)
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn len(&self) -> TextSize {
        TextSize::of(&self.text)
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Character starting at `offset`, if in bounds.
    pub fn char_at(&self, offset: TextSize) -> Option<char> {
        self.text.get(usize::from(offset)..)?.chars().next()
    }

    pub fn slice(&self, range: TextRange) -> &str {
        &self.text[usize::from(range.start())..usize::from(range.end())]
    }

    /// Start tracking `offset`. Fails on out-of-bounds or non-boundary
    /// offsets; a live document never hands out a lying handle.
    pub fn track_offset(
        &mut self,
        offset: TextSize,
        moves_with_insert: bool,
    ) -> Result<OffsetHandle, EditError> {
        self.check_offset(offset)?;
        self.markers.push(Marker {
            pos: offset,
            moves_with_insert,
            valid: true,
        });
        Ok(OffsetHandle(self.markers.len() - 1))
    }

    /// Current position of a tracked offset, `None` once an edit swallowed it.
    pub fn read_offset(&self, handle: OffsetHandle) -> Option<TextSize> {
        let marker = self.markers.get(handle.0)?;
        marker.valid.then_some(marker.pos)
    }

    pub fn insert(&mut self, offset: TextSize, text: &str) -> Result<(), EditError> {
        self.replace(TextRange::empty(offset), text)
    }

    pub fn replace(&mut self, range: TextRange, replacement: &str) -> Result<(), EditError> {
        if self.read_only {
            return Err(EditError::ReadOnly);
        }
        self.check_offset(range.start())?;
        self.check_offset(range.end())?;

        let start = usize::from(range.start());
        let end = usize::from(range.end());
        self.text.replace_range(start..end, replacement);

        let inserted = TextSize::of(replacement);
        for marker in &mut self.markers {
            if !marker.valid {
                continue;
            }
            marker.adjust(range, inserted);
        }
        Ok(())
    }

    fn check_offset(&self, offset: TextSize) -> Result<(), EditError> {
        if offset > self.len() {
            return Err(EditError::RangeOutOfBounds {
                range: TextRange::empty(offset),
                text_len: self.len(),
            });
        }
        if !self.text.is_char_boundary(usize::from(offset)) {
            return Err(EditError::InvalidUtf8Boundary { offset });
        }
        Ok(())
    }
}

impl Marker {
    fn adjust(&mut self, edited: TextRange, inserted: TextSize) {
        if self.pos < edited.start() {
            return;
        }
        if edited.is_empty() {
            // Pure insertion at or before the marker.
            if self.pos > edited.start() || (self.pos == edited.start() && self.moves_with_insert)
            {
                self.pos += inserted;
            }
            return;
        }
        if self.pos == edited.start() {
            return;
        }
        if self.pos < edited.end() {
            // Strictly inside the replaced span: the position no longer
            // exists.
            self.valid = false;
            return;
        }
        // At or after the end of the replaced span: shift by the delta.
        self.pos = self.pos - edited.len() + inserted;
    }
}
