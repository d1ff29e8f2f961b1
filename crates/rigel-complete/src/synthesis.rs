//! Derives compound candidates from bases that miss the expected type.
//!
//! The catalogue is fixed and one-shot: conversions apply to raw candidates
//! only and never chain through each other, so re-deriving over a synthesized
//! result is a no-op. A conversion that turns out not to be type-safe emits
//! nothing; synthesis never fails a session.

use std::collections::HashSet;

use rigel_core::{Cancelled, CancellationToken, TypeName};
use rigel_semantics::{
    types, well_known, ExpectedType, SemanticDb, SymbolKind, Ty,
};
use tracing::trace;

use crate::candidate::{Candidate, CollectorBuilder, EmptyArraySource};
use crate::filters::{chain_member_is_useful, FilterCx};

/// Expands the candidate set with qualifier chains, casts, array/collection
/// conversions, first-element accessors, and collector transforms.
///
/// Returned candidates have not passed the filter chain yet; the session
/// re-runs them through it.
pub fn synthesize(
    bases: &[Candidate],
    expected: &[ExpectedType],
    fx: &FilterCx<'_>,
    cancel: &CancellationToken,
) -> Result<Vec<Candidate>, Cancelled> {
    if expected.is_empty() {
        return Ok(Vec::new());
    }

    let mut out = Vec::new();
    let mut seen: HashSet<String> = HashSet::new();

    for base in bases {
        cancel.check()?;
        // One-shot: never derive from an already synthesized candidate.
        if base.is_synthesized() {
            continue;
        }
        let Some(base_ty) = base.declared_type().cloned() else {
            continue;
        };

        for expectation in expected {
            if expectation.accepts(fx.db.as_hierarchy(), &base_ty) {
                continue;
            }
            let before = out.len();
            chain_through_members(base, &base_ty, expectation, fx, cancel, &mut out, &mut seen)?;
            cast_to_narrowed(base, &base_ty, expectation, fx, &mut out, &mut seen);
            array_to_list(base, &base_ty, expectation, fx, &mut out, &mut seen);
            collection_to_array(base, &base_ty, expectation, fx, &mut out, &mut seen);
            first_element(base, &base_ty, expectation, fx, &mut out, &mut seen);
            collect_stream(base, &base_ty, expectation, fx, &mut out, &mut seen);
            if out.len() > before {
                trace!(
                    base = base.primary_string(),
                    derived = out.len() - before,
                    "synthesized conversions"
                );
            }
        }
    }

    Ok(out)
}

fn push_unique(out: &mut Vec<Candidate>, seen: &mut HashSet<String>, candidate: Candidate) {
    if seen.insert(candidate.identity_key()) {
        out.push(candidate);
    }
}

/// `base.member` when a member's type satisfies the expectation.
fn chain_through_members(
    base: &Candidate,
    base_ty: &Ty,
    expectation: &ExpectedType,
    fx: &FilterCx<'_>,
    cancel: &CancellationToken,
    out: &mut Vec<Candidate>,
    seen: &mut HashSet<String>,
) -> Result<(), Cancelled> {
    if !matches!(base_ty, Ty::Class { .. }) {
        return Ok(());
    }
    for member_id in fx.db.members_of(base_ty) {
        cancel.check()?;
        let Some(member) = fx.db.symbol(member_id) else {
            continue;
        };
        if !matches!(member.kind, SymbolKind::Field | SymbolKind::Method) {
            continue;
        }
        // Chains with arguments are not completable in one step.
        if member.kind == SymbolKind::Method && !member.params.is_empty() {
            continue;
        }
        if !chain_member_is_useful(member.name.as_str(), member_id, fx) {
            continue;
        }
        // Re-applying the method being completed (`sb.toString()` inside its
        // own `toString`) is only noise.
        if fx
            .cx
            .enclosing
            .as_ref()
            .is_some_and(|enclosing| enclosing.symbol == member_id)
        {
            continue;
        }
        let Some(member_ty) = member.reference_type() else {
            continue;
        };
        if !expectation.accepts(fx.db.as_hierarchy(), &member_ty) {
            continue;
        }
        let chained = Candidate::for_symbol(member_id, &member).qualified_by(base.clone());
        push_unique(out, seen, chained);
    }
    Ok(())
}

/// `(Narrowed) base` when dataflow proved a strict refinement that fits.
fn cast_to_narrowed(
    base: &Candidate,
    base_ty: &Ty,
    expectation: &ExpectedType,
    fx: &FilterCx<'_>,
    out: &mut Vec<Candidate>,
    seen: &mut HashSet<String>,
) {
    let Some(id) = base.symbol_id() else {
        return;
    };
    let Some(narrowed) = fx.db.narrowed_type(id, fx.cx) else {
        return;
    };
    // Only a strict, non-redundant refinement of the static type is worth a
    // cast.
    if &narrowed == base_ty || !types::is_assignable(fx.db.as_hierarchy(), &narrowed, base_ty) {
        return;
    }
    if !expectation.accepts(fx.db.as_hierarchy(), &narrowed) {
        return;
    }
    push_unique(out, seen, base.clone().cast_to(narrowed));
}

/// `Arrays.asList(base)` when an iterable of the component type is expected.
fn array_to_list(
    base: &Candidate,
    base_ty: &Ty,
    expectation: &ExpectedType,
    fx: &FilterCx<'_>,
    out: &mut Vec<Candidate>,
    seen: &mut HashSet<String>,
) {
    let Some(component) = base_ty.array_component() else {
        return;
    };
    let Some(element) = types::iterable_element(fx.db.as_hierarchy(), &expectation.ty) else {
        return;
    };
    if !component.is_reference()
        || !types::is_assignable(fx.db.as_hierarchy(), component, &element)
    {
        return;
    }
    let candidate = base.clone().as_list(component.clone());
    if candidate
        .declared_type()
        .is_some_and(|ty| expectation.accepts(fx.db.as_hierarchy(), ty))
    {
        push_unique(out, seen, candidate);
    }
}

/// `base.toArray(…)` when an array of the element type is expected, with a
/// discovered zero-length constant preferred over a fresh `new T[0]`.
fn collection_to_array(
    base: &Candidate,
    base_ty: &Ty,
    expectation: &ExpectedType,
    fx: &FilterCx<'_>,
    out: &mut Vec<Candidate>,
    seen: &mut HashSet<String>,
) {
    let Some(element) = types::iterable_element(fx.db.as_hierarchy(), base_ty) else {
        return;
    };
    let Some(component) = expectation.ty.array_component() else {
        return;
    };
    if !types::is_assignable(fx.db.as_hierarchy(), &element, component) {
        return;
    }
    let empty = match fx.db.empty_array_constant(component, fx.cx) {
        Some(constant) => EmptyArraySource::Constant(constant),
        None => EmptyArraySource::NewArray(component.clone()),
    };
    push_unique(out, seen, base.clone().to_array(component.clone(), empty));
}

/// `base[0]` for an array variable known to hold exactly one element.
fn first_element(
    base: &Candidate,
    base_ty: &Ty,
    expectation: &ExpectedType,
    fx: &FilterCx<'_>,
    out: &mut Vec<Candidate>,
    seen: &mut HashSet<String>,
) {
    let Some(component) = base_ty.array_component() else {
        return;
    };
    let Some(id) = base.symbol_id() else {
        return;
    };
    if fx.db.known_array_length(id, fx.cx) != Some(1) {
        return;
    }
    if !expectation.accepts(fx.db.as_hierarchy(), component) {
        return;
    }
    push_unique(out, seen, base.clone().first_element());
}

/// `base.collect(Collectors.…)` for stream-shaped receivers when a terminal
/// container (or joined string) is expected.
fn collect_stream(
    base: &Candidate,
    base_ty: &Ty,
    expectation: &ExpectedType,
    fx: &FilterCx<'_>,
    out: &mut Vec<Candidate>,
    seen: &mut HashSet<String>,
) {
    let Some(element) = types::stream_element(fx.db.as_hierarchy(), base_ty) else {
        return;
    };
    let h = fx.db.as_hierarchy();

    let named = match expectation.ty.class_name().map(TypeName::as_str) {
        Some(well_known::LIST) => Some((
            CollectorBuilder::ToList,
            Ty::generic(well_known::LIST, vec![element.clone()]),
        )),
        Some(well_known::SET) => Some((
            CollectorBuilder::ToSet,
            Ty::generic(well_known::SET, vec![element.clone()]),
        )),
        Some(well_known::STRING) if element == Ty::string() => {
            Some((CollectorBuilder::Joining, Ty::string()))
        }
        _ => None,
    };

    let (builder, result) = match named {
        Some(named) => named,
        None => {
            // No named builder: fall back to collecting into the expected
            // concrete container, when it is one.
            let Some(name) = expectation.ty.class_name() else {
                return;
            };
            if !types::is_class_subtype(h, name, &TypeName::new(well_known::COLLECTION)) {
                return;
            }
            (
                CollectorBuilder::ToCollection(Ty::class(name.as_str())),
                expectation.ty.clone(),
            )
        }
    };

    if !expectation.accepts(h, &result) {
        return;
    }
    push_unique(out, seen, base.clone().collect(builder, result));
}
