//! Turns the session's resolution snapshot into normalized candidates.
//!
//! Pure transform: no document access, no mutation of the snapshot. Symbols
//! that went stale between resolution and generation are dropped here rather
//! than surfaced with a dangling reference.

use std::collections::hash_map::Entry;
use std::collections::{HashMap, HashSet};

use rigel_core::{Cancelled, CancellationToken};
use rigel_semantics::{CursorContext, SemanticDb, SymbolId, SymbolKind};
use tracing::trace;

use crate::candidate::Candidate;

pub fn generate(
    db: &dyn SemanticDb,
    cx: &CursorContext,
    snapshot: &[SymbolId],
    cancel: &CancellationToken,
) -> Result<Vec<Candidate>, Cancelled> {
    let mut out: Vec<Candidate> = Vec::with_capacity(snapshot.len());
    let mut seen: HashSet<String> = HashSet::new();
    // Method overloads collapse into one row: group key -> (index into `out`,
    // collected parameter counts).
    let mut overload_groups: HashMap<(String, String), (usize, Vec<usize>)> = HashMap::new();

    for &id in snapshot {
        cancel.check()?;
        let Some(symbol) = db.symbol(id) else {
            trace!(?id, "symbol went stale between resolution and generation");
            continue;
        };

        let identity = symbol.identity_key();
        if !seen.insert(identity) {
            continue;
        }

        if symbol.kind == SymbolKind::Method {
            let group_key = (
                symbol
                    .owner
                    .as_ref()
                    .map(|o| o.as_str().to_string())
                    .unwrap_or_default(),
                symbol.name.as_str().to_string(),
            );
            match overload_groups.entry(group_key) {
                Entry::Occupied(mut entry) => {
                    entry.get_mut().1.push(symbol.params.len());
                    continue;
                }
                Entry::Vacant(entry) => {
                    entry.insert((out.len(), vec![symbol.params.len()]));
                }
            }
        }

        out.push(Candidate::for_symbol(id, &symbol));
    }

    // Apply the merge decorator to groups that actually had overloads.
    for (index, counts) in overload_groups.into_values() {
        if counts.len() > 1 {
            let merged = out[index].clone().merged_overloads(counts);
            out[index] = merged;
        }
    }

    for &keyword in &cx.probable_keywords {
        out.push(Candidate::for_keyword(keyword));
    }

    Ok(out)
}
