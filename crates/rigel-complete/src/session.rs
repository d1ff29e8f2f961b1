//! One completion session: snapshot → generate → filter → synthesize →
//! filter again → rank.
//!
//! The session runs single-threaded on a cancellable worker. Every stage
//! polls the token at per-item granularity and a cancellation discards all
//! partial results; callers simply drop the session.

use once_cell::unsync::OnceCell;
use rigel_core::{Cancelled, CancellationToken};
use rigel_semantics::{CursorContext, ExpectedType, SemanticDb, SymbolId};
use tracing::debug;

use crate::config::CompletionConfig;
use crate::filters::{filter_chain, run_chain, FilterCx};
use crate::matcher::PrefixMatcher;
use crate::weigher::{rank, ScoredCandidate};
use crate::{generator, synthesis};

pub struct CompletionSession<'a> {
    db: &'a dyn SemanticDb,
    cx: CursorContext,
    config: CompletionConfig,
    cancel: CancellationToken,
    matcher: PrefixMatcher,
    /// Immutable snapshot of the resolution results, taken at session start.
    snapshot: Vec<SymbolId>,
    /// Expected types are expensive; computed at most once per session.
    expected: OnceCell<Vec<ExpectedType>>,
}

impl<'a> CompletionSession<'a> {
    pub fn new(
        db: &'a dyn SemanticDb,
        cx: CursorContext,
        config: CompletionConfig,
        cancel: CancellationToken,
    ) -> Self {
        let snapshot = db.resolve_at(&cx);
        let matcher = PrefixMatcher::new(cx.prefix.clone());
        debug!(symbols = snapshot.len(), prefix = %cx.prefix, "completion session started");
        Self {
            db,
            cx,
            config,
            cancel,
            matcher,
            snapshot,
            expected: OnceCell::new(),
        }
    }

    pub fn cursor(&self) -> &CursorContext {
        &self.cx
    }

    pub fn config(&self) -> &CompletionConfig {
        &self.config
    }

    pub fn expected_types(&self) -> &[ExpectedType] {
        self.expected
            .get_or_init(|| self.db.expected_types(&self.cx))
    }

    /// The ranked candidate list. Deterministic for a fixed snapshot.
    pub fn generate(&self) -> Result<Vec<ScoredCandidate>, Cancelled> {
        let fx = FilterCx {
            db: self.db,
            cx: &self.cx,
            config: &self.config,
            matcher: &self.matcher,
        };
        let chain = filter_chain();

        let raw = generator::generate(self.db, &self.cx, &self.snapshot, &self.cancel)?;
        debug!(generated = raw.len(), "generated raw candidates");

        let mut kept = run_chain(&chain, raw, &fx, &self.cancel)?;
        debug!(kept = kept.len(), "after filter chain");

        let expected = self.expected_types();
        let synthesized = synthesis::synthesize(&kept, expected, &fx, &self.cancel)?;
        if !synthesized.is_empty() {
            debug!(synthesized = synthesized.len(), "synthesized candidates");
            // Synthesized candidates re-enter the chain: a chain resolving to
            // an inaccessible member must drop here, not at render time.
            let surviving = run_chain(&chain, synthesized, &fx, &self.cancel)?;
            kept.extend(surviving);
        }

        rank(kept, expected, &fx, &self.cancel)
    }
}
