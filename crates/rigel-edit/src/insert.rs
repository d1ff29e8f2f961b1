//! Applies a chosen candidate to the live document.
//!
//! One insertion is a fixed sequence: track offsets, replace the typed
//! prefix, insert the candidate (recursively for qualifier chains), scaffold
//! call parentheses, resolve imports, place the tail token. Grammar-sensitive
//! side effects (an auto-import landing near the top of the file) shift text
//! mid-insertion, so every position the engine revisits lives in a tracked
//! marker, and every enhancement step re-validates its markers before acting.
//! A lost marker degrades that step to nothing; it never corrupts the edit.

use rigel_complete::{Candidate, CompletionConfig};
use rigel_core::{EditError, TextRange, TextSize, TypeName};
use rigel_semantics::{
    ExpectedFit, ExpectedType, ImportPlan, ImportPlanner, SemanticDb, TailKind,
};
use thiserror::Error;
use tracing::{debug, trace};

use crate::document::{Document, OffsetHandle};
use crate::offset_map::{self, OffsetMap};

#[derive(Debug, Error)]
pub enum InsertError {
    #[error(transparent)]
    Edit(#[from] EditError),
    #[error("offset marker `{0}` became invalid")]
    LostOffset(&'static str),
}

/// Mutable state threaded through one insertion. Owned exclusively for its
/// duration; a second insertion cannot start while one is in progress (the
/// `&mut Document` borrow enforces it).
pub struct InsertionContext<'a> {
    document: &'a mut Document,
    offsets: OffsetMap,
    /// Character that triggered the insertion, when acceptance was typed.
    trigger: Option<char>,
}

impl<'a> InsertionContext<'a> {
    /// `prefix_range` spans the typed prefix the insertion replaces.
    pub fn new(
        document: &'a mut Document,
        prefix_range: TextRange,
        trigger: Option<char>,
    ) -> Result<InsertionContext<'a>, InsertError> {
        let mut offsets = OffsetMap::new();
        offsets.track(document, offset_map::START, prefix_range.start())?;
        offsets.track(document, offset_map::IDENTIFIER_END, prefix_range.end())?;
        offsets.track(document, offset_map::TAIL, prefix_range.end())?;
        scan_argument_list(document, &mut offsets, prefix_range.end())?;
        Ok(InsertionContext {
            document,
            offsets,
            trigger,
        })
    }

    pub fn document(&self) -> &Document {
        self.document
    }

    pub fn offsets(&self) -> &OffsetMap {
        &self.offsets
    }

    pub fn trigger(&self) -> Option<char> {
        self.trigger
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InsertOutcome {
    /// Where the caret belongs after the insertion.
    pub caret: TextSize,
    /// Span of the inserted completion text (imports excluded).
    pub inserted: TextRange,
    /// Types imported as a side effect, in insertion order.
    pub imports: Vec<TypeName>,
    /// True when an enhancement step lost its markers and the insertion
    /// degraded to literal text.
    pub fell_back: bool,
}

struct WorkState {
    caret_inside: Option<OffsetHandle>,
    imports: Vec<TypeName>,
    fell_back: bool,
    /// Set when the insertion landed in front of an existing argument list;
    /// the statement's tail already exists somewhere past it.
    suppress_tail: bool,
}

pub struct InsertionEngine<'a> {
    db: &'a dyn SemanticDb,
    imports: &'a dyn ImportPlanner,
    config: &'a CompletionConfig,
    expected: &'a [ExpectedType],
}

impl<'a> InsertionEngine<'a> {
    pub fn new(
        db: &'a dyn SemanticDb,
        imports: &'a dyn ImportPlanner,
        config: &'a CompletionConfig,
        expected: &'a [ExpectedType],
    ) -> InsertionEngine<'a> {
        InsertionEngine {
            db,
            imports,
            config,
            expected,
        }
    }

    /// Applies `candidate` at the context's prefix span.
    ///
    /// Only document-mutation failures on the base text abort; enhancement
    /// failures degrade to a literal insertion with `fell_back` set.
    pub fn apply(
        &self,
        candidate: &Candidate,
        icx: &mut InsertionContext<'_>,
    ) -> Result<InsertOutcome, InsertError> {
        let start = icx
            .offsets
            .get(icx.document, offset_map::START)
            .ok_or(InsertError::LostOffset("start"))?;
        let identifier_end = icx
            .offsets
            .get(icx.document, offset_map::IDENTIFIER_END)
            .ok_or(InsertError::LostOffset("identifierEnd"))?;

        // A candidate whose symbol went stale since generation inserts as
        // plain text: no scaffolding, no import, no tail.
        let stale = candidate
            .symbol_id()
            .is_some_and(|id| self.db.symbol(id).is_none());

        icx.document
            .replace(TextRange::new(start, identifier_end), "")?;

        let mut state = WorkState {
            caret_inside: None,
            imports: Vec::new(),
            fell_back: stale,
            suppress_tail: false,
        };

        if stale {
            trace!(
                candidate = candidate.primary_string(),
                "stale symbol; inserting literal text"
            );
            icx.document.insert(start, candidate.primary_string())?;
        } else {
            self.insert_candidate(candidate, icx.document, start, icx.trigger, &mut state)?;
            if !state.suppress_tail {
                if let Err(err) = self.apply_tail(candidate, icx) {
                    trace!(error = %err, "tail step lost its marker; skipping");
                    state.fell_back = true;
                }
            }
        }

        let tail = icx
            .offsets
            .get(icx.document, offset_map::TAIL)
            .ok_or(InsertError::LostOffset("tail"))?;
        // Re-read the start marker: an auto-import above the insertion has
        // shifted everything since the first read.
        let start = icx
            .offsets
            .get(icx.document, offset_map::START)
            .ok_or(InsertError::LostOffset("start"))?;
        let caret = state
            .caret_inside
            .and_then(|handle| icx.document.read_offset(handle))
            .unwrap_or(tail);

        debug!(
            candidate = candidate.primary_string(),
            fell_back = state.fell_back,
            "insertion applied"
        );
        Ok(InsertOutcome {
            caret,
            inserted: TextRange::new(start, tail),
            imports: state.imports,
            fell_back: state.fell_back,
        })
    }

    /// Inserts one candidate at `at`, returning the end of what it wrote.
    /// Recursive for qualifier chains.
    fn insert_candidate(
        &self,
        candidate: &Candidate,
        document: &mut Document,
        at: TextSize,
        trigger: Option<char>,
        state: &mut WorkState,
    ) -> Result<TextSize, InsertError> {
        if let Some(qualifier) = candidate.qualifier() {
            // Positions before the recursion survive it via markers: the
            // qualifier's own insertion may add imports earlier in the
            // document.
            let start_marker = document.track_offset(at, false)?;
            let mut end = self.insert_candidate(qualifier, document, at, None, state)?;
            let q_start = document
                .read_offset(start_marker)
                .ok_or(InsertError::LostOffset("chain-start"))?;

            let qualifier_text = document
                .slice(TextRange::new(q_start, end))
                .to_string();
            if needs_grouping(&qualifier_text) {
                document.insert(q_start, "(")?;
                document.insert(end + TextSize::new(1), ")")?;
                end += TextSize::new(2);
            }

            document.insert(end, ".")?;
            let member_at = end + TextSize::new(1);
            let member_text = candidate.local_string().to_string();
            document.insert(member_at, &member_text)?;
            let member_end = member_at + TextSize::of(&member_text);
            self.scaffold_call(candidate, document, member_end, trigger, state)
        } else {
            let text = candidate.primary_string().to_string();
            document.insert(at, &text)?;
            let mut end = at + TextSize::of(&text);
            end = self.scaffold_call(candidate, document, end, trigger, state)?;
            match self.apply_import(candidate, document, at, end, state) {
                Ok(end) => Ok(end),
                Err(err) => {
                    trace!(error = %err, "import step failed; keeping short reference");
                    state.fell_back = true;
                    Ok(end)
                }
            }
        }
    }

    /// Parenthesis/argument scaffolding for call-shaped candidates.
    fn scaffold_call(
        &self,
        candidate: &Candidate,
        document: &mut Document,
        end: TextSize,
        trigger: Option<char>,
        state: &mut WorkState,
    ) -> Result<TextSize, InsertError> {
        let Some(counts) = self.call_param_counts(candidate) else {
            return Ok(end);
        };
        let max_params = counts.iter().copied().max().unwrap_or(0);
        let has_params = max_params > 0;

        // Parens already present in the document (the user completed in
        // front of an existing argument list): reuse them.
        if document.char_at(end) == Some('(') {
            if has_params && !candidate.no_arg_entry() {
                let inside = end + TextSize::new(1);
                state.caret_inside = Some(document.track_offset(inside, false)?);
            }
            state.suppress_tail = true;
            return Ok(end);
        }

        let mut text = String::new();
        if self.config.space_before_call_parens {
            text.push(' ');
        }
        text.push('(');
        let caret_rel = TextSize::of(&text);
        if has_params {
            if self.config.space_within_call_parens {
                text.push(' ');
            }
            let commas = max_params.min(self.config.max_placeholder_args).saturating_sub(1);
            for _ in 0..commas {
                text.push(',');
            }
            if self.config.space_within_call_parens {
                text.push(' ');
            }
        }
        let insert_rparen = if trigger == Some('(') && !has_params {
            self.config.pair_bracket_on_lparen
        } else {
            true
        };
        if insert_rparen {
            text.push(')');
        }

        document.insert(end, &text)?;
        if has_params && !candidate.no_arg_entry() {
            let inside = end + caret_rel;
            state.caret_inside = Some(document.track_offset(inside, false)?);
        }
        Ok(end + TextSize::of(&text))
    }

    /// Parameter counts when the candidate is call-shaped, else `None`.
    fn call_param_counts(&self, candidate: &Candidate) -> Option<Vec<usize>> {
        if let Some(counts) = candidate.merged_param_counts() {
            return Some(counts.to_vec());
        }
        let symbol = self.db.symbol(candidate.symbol_id()?)?;
        symbol
            .kind
            .is_callable()
            .then(|| vec![symbol.params.len()])
    }

    /// Import/qualification. Advises through the planner and performs the
    /// edit itself so tracked offsets stay consistent; returns the adjusted
    /// end of the inserted span.
    fn apply_import(
        &self,
        candidate: &Candidate,
        document: &mut Document,
        start: TextSize,
        end: TextSize,
        state: &mut WorkState,
    ) -> Result<TextSize, InsertError> {
        let Some(spec) = candidate.import() else {
            return Ok(end);
        };
        let short = spec.qualified.short_name().to_string();
        let inserted = document.slice(TextRange::new(start, end));
        let Some(rel) = inserted.find(&short) else {
            return Ok(end);
        };
        let name_start = start + TextSize::new(rel as u32);
        let name_range = TextRange::new(name_start, name_start + TextSize::of(&short));

        let rewrite_qualified = |document: &mut Document| -> Result<TextSize, InsertError> {
            document.replace(name_range, spec.qualified.as_str())?;
            Ok(end + TextSize::of(spec.qualified.as_str()) - TextSize::of(&short))
        };

        if !spec.should_import {
            return rewrite_qualified(document);
        }

        match self.imports.plan(&spec.qualified, document.text()) {
            ImportPlan::AlreadyVisible => Ok(end),
            ImportPlan::UseQualifiedName => rewrite_qualified(document),
            ImportPlan::AddImport { offset, text } => {
                if offset > start {
                    // An import landing inside or after the insertion would
                    // corrupt it; keep the qualified form instead.
                    return rewrite_qualified(document);
                }
                document.insert(offset, &text)?;
                state.imports.push(spec.qualified.clone());
                Ok(end + TextSize::of(&text))
            }
        }
    }

    /// Tail token of the matched expectation, unless the trigger character
    /// already supplied an equivalent terminator.
    fn apply_tail(
        &self,
        candidate: &Candidate,
        icx: &mut InsertionContext<'_>,
    ) -> Result<(), InsertError> {
        let Some(kind) = self.tail_for(candidate) else {
            return Ok(());
        };
        if icx.trigger.is_some_and(|c| kind.matches_char(c)) {
            return Ok(());
        }
        let Some(text) = kind.text() else {
            return Ok(());
        };
        let tail = icx
            .offsets
            .get(icx.document, offset_map::TAIL)
            .ok_or(InsertError::LostOffset("tail"))?;
        // The document may already carry the terminator (completing in the
        // middle of an existing statement).
        if icx.document.char_at(tail) == text.chars().next() {
            return Ok(());
        }
        icx.document.insert(tail, text)?;
        Ok(())
    }

    /// Tail of the best-fitting expectation, with the candidate's override
    /// taking precedence.
    fn tail_for(&self, candidate: &Candidate) -> Option<TailKind> {
        if let Some(kind) = candidate.tail_override() {
            return Some(kind);
        }
        let ty = candidate.declared_type()?;
        let mut best: Option<(ExpectedFit, TailKind)> = None;
        for expectation in self.expected {
            let fit = expectation.fit(self.db.as_hierarchy(), ty);
            if fit == ExpectedFit::Mismatch {
                continue;
            }
            match best {
                Some((existing, _)) if existing <= fit => {}
                _ => best = Some((fit, expectation.tail)),
            }
        }
        best.map(|(_, tail)| tail)
    }
}

/// When the identifier being completed already has an argument list, record
/// its parenthesis offsets so they stay readable across the edits to come.
fn scan_argument_list(
    document: &mut Document,
    offsets: &mut OffsetMap,
    after: TextSize,
) -> Result<(), InsertError> {
    if document.char_at(after) != Some('(') {
        return Ok(());
    }
    offsets.track(document, offset_map::LPAREN, after)?;

    let mut rparen = None;
    let mut depth = 0u32;
    for (i, c) in document.text()[usize::from(after)..].char_indices() {
        match c {
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                if depth == 0 {
                    rparen = Some(after + TextSize::new(i as u32));
                    break;
                }
            }
            _ => {}
        }
    }
    if let Some(rparen) = rparen {
        offsets.track(document, offset_map::RPAREN, rparen)?;
        offsets.track(document, offset_map::ARG_LIST_END, rparen + TextSize::new(1))?;
    }
    Ok(())
}

/// Whether qualifier text reads back as a compound expression that needs
/// grouping before a `.` can follow it: any operator or space at bracket
/// depth zero.
fn needs_grouping(text: &str) -> bool {
    let mut depth = 0i32;
    for c in text.chars() {
        match c {
            '(' | '[' => depth += 1,
            ')' | ']' => depth -= 1,
            ' ' | '+' | '-' | '*' | '/' | '%' | '?' | ':' | '&' | '|' | '^' | '=' | '!' | '<'
            | '>' | ',' if depth == 0 => return true,
            _ => {}
        }
    }
    false
}
