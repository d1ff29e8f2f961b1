//! Named, session-scoped offsets.
//!
//! A map lives for exactly one insertion: created when the insertion starts,
//! discarded when it completes, never shared between candidates.

use rigel_core::{EditError, TextSize};

use crate::document::{Document, OffsetHandle};

/// Symbolic name for a tracked document position. Equality is by name; the
/// move-with-insert flag rides along so `track` sites stay uniform.
#[derive(Debug, Clone, Copy)]
pub struct OffsetKey {
    name: &'static str,
    moves_with_insert: bool,
}

impl OffsetKey {
    pub const fn new(name: &'static str, moves_with_insert: bool) -> OffsetKey {
        OffsetKey {
            name,
            moves_with_insert,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl PartialEq for OffsetKey {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for OffsetKey {}

/// Start of the replaced prefix span; fixed so text inserted at the start
/// lands after it.
pub const START: OffsetKey = OffsetKey::new("start", false);
/// End of the identifier being completed.
pub const IDENTIFIER_END: OffsetKey = OffsetKey::new("identifierEnd", true);
/// Running end of everything inserted so far; the tail token goes here.
pub const TAIL: OffsetKey = OffsetKey::new("tail", true);
pub const LPAREN: OffsetKey = OffsetKey::new("lparen", true);
pub const RPAREN: OffsetKey = OffsetKey::new("rparen", true);
pub const ARG_LIST_END: OffsetKey = OffsetKey::new("argListEnd", true);

#[derive(Debug, Default)]
pub struct OffsetMap {
    entries: Vec<(OffsetKey, OffsetHandle)>,
}

impl OffsetMap {
    pub fn new() -> OffsetMap {
        OffsetMap::default()
    }

    /// Track `offset` under `key`, replacing any previous position for it.
    pub fn track(
        &mut self,
        document: &mut Document,
        key: OffsetKey,
        offset: TextSize,
    ) -> Result<(), EditError> {
        let handle = document.track_offset(offset, key.moves_with_insert)?;
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = handle,
            None => self.entries.push((key, handle)),
        }
        Ok(())
    }

    /// Current position for `key`; `None` when never tracked or invalidated
    /// by a later edit.
    pub fn get(&self, document: &Document, key: OffsetKey) -> Option<TextSize> {
        let (_, handle) = self.entries.iter().find(|(k, _)| *k == key)?;
        document.read_offset(*handle)
    }

    pub fn remove(&mut self, key: OffsetKey) {
        self.entries.retain(|(k, _)| *k != key);
    }

    pub fn contains(&self, key: OffsetKey) -> bool {
        self.entries.iter().any(|(k, _)| *k == key)
    }
}
