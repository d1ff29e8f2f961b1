//! Applicability predicates, applied as a short-circuiting AND in a fixed
//! order: cheap syntactic checks first, semantic ones last.

use rigel_core::{Cancelled, CancellationToken};
use rigel_semantics::{
    well_known, CtorStatement, CursorContext, Keyword, PositionKind, SemanticDb, SymbolKind,
};
use tracing::trace;

use crate::candidate::Candidate;
use crate::config::CompletionConfig;
use crate::matcher::PrefixMatcher;

pub struct FilterCx<'a> {
    pub db: &'a dyn SemanticDb,
    pub cx: &'a CursorContext,
    pub config: &'a CompletionConfig,
    pub matcher: &'a PrefixMatcher,
}

pub trait CandidateFilter {
    fn name(&self) -> &'static str;
    fn accepts(&self, candidate: &Candidate, fx: &FilterCx<'_>) -> bool;
}

/// The chain, in evaluation order. The order is part of the contract: prefix
/// and package checks are string-only, static/accessibility need symbol
/// records, the constructor and recursion checks read flow data.
pub fn filter_chain() -> Vec<Box<dyn CandidateFilter>> {
    vec![
        Box::new(PrefixFilter),
        Box::new(ExcludedPackageFilter),
        Box::new(StaticContextFilter),
        Box::new(AccessibilityFilter),
        Box::new(UninitializedFieldFilter),
        Box::new(RecursionFilter),
    ]
}

pub fn run_chain(
    chain: &[Box<dyn CandidateFilter>],
    candidates: Vec<Candidate>,
    fx: &FilterCx<'_>,
    cancel: &CancellationToken,
) -> Result<Vec<Candidate>, Cancelled> {
    let mut kept = Vec::with_capacity(candidates.len());
    'next: for candidate in candidates {
        cancel.check()?;
        for filter in chain {
            if !filter.accepts(&candidate, fx) {
                trace!(
                    filter = filter.name(),
                    candidate = candidate.primary_string(),
                    "filtered"
                );
                continue 'next;
            }
        }
        kept.push(candidate);
    }
    Ok(kept)
}

/// Candidate must match the typed prefix on some lookup string.
struct PrefixFilter;

impl CandidateFilter for PrefixFilter {
    fn name(&self) -> &'static str {
        "prefix"
    }

    fn accepts(&self, candidate: &Candidate, fx: &FilterCx<'_>) -> bool {
        fx.matcher.best_degree(candidate.lookup_strings()).is_some()
    }
}

/// Config-driven exclusion of whole packages by qualified-name prefix.
struct ExcludedPackageFilter;

impl CandidateFilter for ExcludedPackageFilter {
    fn name(&self) -> &'static str {
        "excluded-package"
    }

    fn accepts(&self, candidate: &Candidate, fx: &FilterCx<'_>) -> bool {
        match candidate.import() {
            Some(import) => !fx.config.is_package_excluded(import.qualified.as_str()),
            None => true,
        }
    }
}

/// Instance members and `this` are illegal in a static context, unless an
/// explicit qualifier supplies the instance.
struct StaticContextFilter;

impl CandidateFilter for StaticContextFilter {
    fn name(&self) -> &'static str {
        "static-context"
    }

    fn accepts(&self, candidate: &Candidate, fx: &FilterCx<'_>) -> bool {
        if !fx.cx.static_context || fx.cx.call_qualifier.is_some() {
            return true;
        }
        if candidate.keyword() == Some(Keyword::This) {
            return false;
        }
        let Some(id) = candidate.symbol_id() else {
            return true;
        };
        let Some(symbol) = fx.db.symbol(id) else {
            return false;
        };
        if symbol.owner.is_none() || symbol.is_static {
            return true;
        }
        !matches!(symbol.kind, SymbolKind::Field | SymbolKind::Method)
    }
}

/// Visibility from the cursor's lexical scope, with the anonymous-subclass
/// relaxation: a protected/package member of the base being subclassed is
/// reachable once the anonymous body is materialized.
struct AccessibilityFilter;

impl CandidateFilter for AccessibilityFilter {
    fn name(&self) -> &'static str {
        "accessibility"
    }

    fn accepts(&self, candidate: &Candidate, fx: &FilterCx<'_>) -> bool {
        let Some(id) = candidate.symbol_id() else {
            return true;
        };
        if fx.db.is_accessible(id, fx.cx) {
            return true;
        }
        let Some(symbol) = fx.db.symbol(id) else {
            return false;
        };
        let (Some(base), Some(owner)) = (&fx.cx.anonymous_subclass_of, &symbol.owner) else {
            return false;
        };
        use rigel_semantics::Visibility;
        matches!(
            symbol.visibility,
            Visibility::Protected | Visibility::Package
        ) && rigel_semantics::types::is_class_subtype(fx.db.as_hierarchy(), base, owner)
    }
}

/// Constructor bodies: a field read before it is definitely assigned is not
/// offered. The left-hand side of the assignment being typed is a write, not
/// a read, and a delegating `this(...)` call assigns everything.
struct UninitializedFieldFilter;

impl CandidateFilter for UninitializedFieldFilter {
    fn name(&self) -> &'static str {
        "uninitialized-field"
    }

    fn accepts(&self, candidate: &Candidate, fx: &FilterCx<'_>) -> bool {
        let Some(flow) = &fx.cx.constructor_flow else {
            return true;
        };
        let Some(id) = candidate.symbol_id() else {
            return true;
        };
        let Some(symbol) = fx.db.symbol(id) else {
            return false;
        };
        if symbol.kind != SymbolKind::Field
            || symbol.is_static
            || symbol.owner.as_ref() != fx.cx.containing_class.as_ref()
        {
            return true;
        }
        if flow.assignment_target.as_ref() == Some(&symbol.name) {
            return true;
        }
        for statement in &flow.before_cursor {
            match statement {
                CtorStatement::AssignField(name) if name == &symbol.name => return true,
                CtorStatement::DelegateCall => return true,
                _ => {}
            }
        }
        false
    }
}

/// How a candidate relates to the declaration whose body is being completed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelfReference {
    None,
    /// Same reference as the implicit qualifier: true self-recursion.
    Recursion,
    /// Syntactically different qualifier denoting the same object: an
    /// overload delegation.
    Delegation,
}

/// Distinguishes recursion from overload delegation by comparing the call's
/// qualifier against the enclosing declaration's implicit qualifier.
pub fn classify_self_reference(candidate: &Candidate, fx: &FilterCx<'_>) -> SelfReference {
    let (Some(id), Some(enclosing)) = (candidate.symbol_id(), fx.cx.enclosing.as_ref()) else {
        return SelfReference::None;
    };
    if id != enclosing.symbol {
        return SelfReference::None;
    }

    let implicit_text = enclosing
        .implicit_qualifier
        .as_ref()
        .map(|q| q.text.as_str())
        .unwrap_or("");
    let (call_text, call_ref) = match &fx.cx.call_qualifier {
        Some(q) => (q.text.as_str(), q.refers_to),
        None => (implicit_text, enclosing.implicit_qualifier.as_ref().and_then(|q| q.refers_to)),
    };

    if call_text == implicit_text {
        return SelfReference::Recursion;
    }
    let implicit_ref = enclosing
        .implicit_qualifier
        .as_ref()
        .and_then(|q| q.refers_to);
    match (call_ref, implicit_ref) {
        (Some(a), Some(b)) if a == b => SelfReference::Delegation,
        _ => SelfReference::None,
    }
}

/// The enclosing declaration is excluded from its own direct `return` value
/// or initializer, unless the call is an overload delegation.
struct RecursionFilter;

impl CandidateFilter for RecursionFilter {
    fn name(&self) -> &'static str {
        "recursion"
    }

    fn accepts(&self, candidate: &Candidate, fx: &FilterCx<'_>) -> bool {
        if !matches!(
            fx.cx.position,
            PositionKind::ReturnValue | PositionKind::Initializer
        ) {
            return true;
        }
        classify_self_reference(candidate, fx) != SelfReference::Recursion
    }
}

/// Qualifier chains through object-identity members are noise unless an
/// interface contract requires the member. Used by the synthesizer before
/// chains are built, kept here with the other applicability policy.
pub fn chain_member_is_useful(
    member_name: &str,
    member_id: rigel_semantics::SymbolId,
    fx: &FilterCx<'_>,
) -> bool {
    if !well_known::is_object_identity_member(member_name) {
        return true;
    }
    fx.db.required_by_interface(member_id, fx.cx)
}
