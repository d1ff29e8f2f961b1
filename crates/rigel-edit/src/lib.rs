//! Offset-tracked insertion for chosen completion candidates.
//!
//! `rigel-complete` decides what to offer and in which order; this crate
//! mutates the live document when a candidate is accepted. Insertion always
//! runs on the thread that owns document mutation, synchronously and
//! non-reentrantly, and once started runs to completion or to an explicit
//! literal-text fallback.

mod document;
mod insert;
mod offset_map;

pub use document::{Document, OffsetHandle};
pub use insert::{InsertError, InsertOutcome, InsertionContext, InsertionEngine};
pub use offset_map::{OffsetKey, OffsetMap, ARG_LIST_END, IDENTIFIER_END, LPAREN, RPAREN, START, TAIL};
