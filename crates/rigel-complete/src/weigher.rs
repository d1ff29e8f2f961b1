//! The relevance weigher chain.
//!
//! Heuristics here are categorical, so candidates sort by a lexicographic
//! tuple of independent verdicts instead of a weighted sum: an earlier
//! weigher's verdict dominates everything after it, and the list below *is*
//! the ranking semantics. Ties preserve generator order via stable sort.

use std::cmp::Ordering;

use rigel_core::{Cancelled, CancellationToken};
use rigel_semantics::{
    well_known, CompletionMode, ExpectedFit, ExpectedType, SymbolKind, Ty,
};
use tracing::debug;

use crate::candidate::Candidate;
use crate::filters::{classify_self_reference, FilterCx, SelfReference};
use crate::matcher::MatchDegree;

/// Accessibility/deprecation bucket; earlier is better.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum AccessBucket {
    Normal,
    Deprecated,
    Inaccessible,
}

/// Expected-type bucket; earlier is better. `ExactExcluded` holds candidates
/// that are exactly the expected type but demoted by policy (abstract classes
/// with too many unimplemented members, raw `Object`/`String` defaults); they
/// stay in the list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ExpectedBucket {
    Exact,
    Default,
    ExactExcluded,
    Assignable,
    Unrelated,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum RecursionBucket {
    Normal,
    Delegation,
    SelfRecursion,
}

/// Precomputed verdicts for one candidate, one field per weigher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelevanceKey {
    pub access: AccessBucket,
    pub expected: ExpectedBucket,
    pub recursion: RecursionBucket,
    /// Lexical kind preference; meaningful in basic mode only.
    pub kind: u8,
    pub match_quality: u8,
    /// Word-suffix overlap with the expectation's suggested names; higher is
    /// better.
    pub name_similarity: u32,
    /// Historical usage rank; `None` is "no opinion" and never affects the
    /// comparison.
    pub usage: Option<u32>,
    pub param_count: usize,
    pub name_words: usize,
    pub name_len: usize,
}

/// One entry of the chain. The struct exists so the chain is auditable by
/// name in logs and tests, not just a list of closures.
pub struct Weigher {
    pub name: &'static str,
    compare: fn(&RelevanceKey, &RelevanceKey) -> Ordering,
}

impl Weigher {
    pub fn compare(&self, a: &RelevanceKey, b: &RelevanceKey) -> Ordering {
        (self.compare)(a, b)
    }
}

/// The fixed chain, in dominance order.
pub fn weighers() -> &'static [Weigher] {
    static CHAIN: [Weigher; 8] = [
        Weigher {
            name: "accessibility",
            compare: |a, b| a.access.cmp(&b.access),
        },
        Weigher {
            name: "expected-type",
            compare: |a, b| a.expected.cmp(&b.expected),
        },
        Weigher {
            name: "recursion",
            compare: |a, b| a.recursion.cmp(&b.recursion),
        },
        Weigher {
            name: "kind",
            compare: |a, b| a.kind.cmp(&b.kind),
        },
        Weigher {
            name: "match-quality",
            compare: |a, b| a.match_quality.cmp(&b.match_quality),
        },
        Weigher {
            name: "name-similarity",
            compare: |a, b| b.name_similarity.cmp(&a.name_similarity),
        },
        Weigher {
            name: "usage",
            compare: |a, b| match (a.usage, b.usage) {
                (Some(a), Some(b)) => b.cmp(&a),
                _ => Ordering::Equal,
            },
        },
        Weigher {
            name: "brevity",
            compare: |a, b| {
                a.param_count
                    .cmp(&b.param_count)
                    .then(a.name_words.cmp(&b.name_words))
                    .then(a.name_len.cmp(&b.name_len))
            },
        },
    ];
    &CHAIN
}

pub fn compare_keys(a: &RelevanceKey, b: &RelevanceKey) -> Ordering {
    for weigher in weighers() {
        let ordering = weigher.compare(a, b);
        if ordering != Ordering::Equal {
            return ordering;
        }
    }
    Ordering::Equal
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScoredCandidate {
    pub candidate: Candidate,
    pub key: RelevanceKey,
}

/// Computes every candidate's key (polling cancellation per candidate) and
/// stable-sorts by the chain.
pub fn rank(
    candidates: Vec<Candidate>,
    expected: &[ExpectedType],
    fx: &FilterCx<'_>,
    cancel: &CancellationToken,
) -> Result<Vec<ScoredCandidate>, Cancelled> {
    let mut scored = Vec::with_capacity(candidates.len());
    for candidate in candidates {
        cancel.check()?;
        let key = relevance_key(&candidate, expected, fx);
        scored.push(ScoredCandidate { candidate, key });
    }
    scored.sort_by(|a, b| compare_keys(&a.key, &b.key));
    debug!(candidates = scored.len(), "ranked candidate set");
    Ok(scored)
}

pub fn relevance_key(
    candidate: &Candidate,
    expected: &[ExpectedType],
    fx: &FilterCx<'_>,
) -> RelevanceKey {
    let symbol = candidate.symbol_id().and_then(|id| fx.db.symbol(id));

    let access = match (candidate.symbol_id(), &symbol) {
        (Some(id), Some(_)) if !fx.db.is_accessible(id, fx.cx) => AccessBucket::Inaccessible,
        (Some(id), Some(_)) if fx.db.is_deprecated(id) => AccessBucket::Deprecated,
        _ => AccessBucket::Normal,
    };

    let recursion = match classify_self_reference(candidate, fx) {
        SelfReference::None => RecursionBucket::Normal,
        SelfReference::Delegation => RecursionBucket::Delegation,
        SelfReference::Recursion => RecursionBucket::SelfRecursion,
    };

    let plain_name = symbol
        .as_ref()
        .map(|s| s.name.as_str().to_string())
        .unwrap_or_else(|| candidate.primary_string().to_string());

    let param_count = candidate
        .merged_param_counts()
        .and_then(|counts| counts.first().copied())
        .or_else(|| {
            symbol
                .as_ref()
                .filter(|s| s.kind.is_callable())
                .map(|s| s.params.len())
        })
        .unwrap_or(0);

    RelevanceKey {
        access,
        expected: expected_bucket(candidate, symbol.as_ref(), expected, fx),
        recursion,
        kind: kind_rank(candidate, symbol.as_ref(), fx),
        match_quality: candidate
            .lookup_strings()
            .filter_map(|s| fx.matcher.degree(s))
            .min()
            .map(|degree| degree as u8)
            .unwrap_or(MatchDegree::Hump as u8 + 1),
        name_similarity: name_similarity(&plain_name, fx.matcher.prefix(), expected),
        usage: candidate
            .symbol_id()
            .and_then(|id| fx.db.usage_rank(id, fx.cx)),
        param_count,
        name_words: split_words(&plain_name).len(),
        name_len: plain_name.len(),
    }
}

fn expected_bucket(
    candidate: &Candidate,
    symbol: Option<&rigel_semantics::Symbol>,
    expected: &[ExpectedType],
    fx: &FilterCx<'_>,
) -> ExpectedBucket {
    if expected.is_empty() {
        return ExpectedBucket::Assignable;
    }
    let Some(ty) = candidate.declared_type() else {
        return ExpectedBucket::Unrelated;
    };
    let mut best = ExpectedBucket::Unrelated;
    for expectation in expected {
        let bucket = match expectation.fit(fx.db.as_hierarchy(), ty) {
            ExpectedFit::Exact => {
                if policy_excluded(candidate, symbol, expectation, ty, fx) {
                    ExpectedBucket::ExactExcluded
                } else {
                    ExpectedBucket::Exact
                }
            }
            ExpectedFit::Default => ExpectedBucket::Default,
            ExpectedFit::Assignable => ExpectedBucket::Assignable,
            ExpectedFit::Mismatch => ExpectedBucket::Unrelated,
        };
        best = best.min(bucket);
    }
    best
}

/// Exactly-expected candidates demoted by policy rather than dropped.
fn policy_excluded(
    _candidate: &Candidate,
    symbol: Option<&rigel_semantics::Symbol>,
    expectation: &ExpectedType,
    ty: &Ty,
    fx: &FilterCx<'_>,
) -> bool {
    if let Some(symbol) = symbol {
        if symbol.kind == SymbolKind::Class && symbol.is_abstract {
            if let Some(class) = &symbol.qualified_name {
                if fx.db.unimplemented_member_count(class)
                    > fx.config.max_abstract_unimplemented
                {
                    return true;
                }
            }
        }
    }
    // `Object`/`String` slots the inference only defaulted to are usually a
    // sign the real intent is narrower.
    if expectation.default_ty != expectation.ty {
        if let Some(name) = ty.class_name() {
            if matches!(name.as_str(), well_known::OBJECT | well_known::STRING) {
                return true;
            }
        }
    }
    false
}

fn kind_rank(
    candidate: &Candidate,
    symbol: Option<&rigel_semantics::Symbol>,
    fx: &FilterCx<'_>,
) -> u8 {
    if fx.cx.mode == CompletionMode::Smart {
        return 0;
    }
    if let Some(keyword) = candidate.keyword() {
        return if keyword.is_flow() { 1 } else { 4 };
    }
    let Some(symbol) = symbol else {
        return 2;
    };
    match symbol.kind {
        SymbolKind::LocalVariable | SymbolKind::Parameter => 0,
        SymbolKind::Field
        | SymbolKind::EnumConstant
        | SymbolKind::Method
        | SymbolKind::Constructor => 2,
        SymbolKind::AnnotationMember => 3,
        SymbolKind::Class => 5,
    }
}

/// Word-suffix overlap between a candidate name and the expectation's
/// suggested names, digits truncated, as in the reference heuristic: the
/// trailing words are what users align (`inputStream` vs `stream`).
fn name_similarity(name: &str, prefix: &str, expected: &[ExpectedType]) -> u32 {
    if expected.is_empty() {
        return 0;
    }
    if !prefix.is_empty() && name == prefix {
        return u32::MAX;
    }
    let name_words = split_words(&trunc_digits(name));
    let mut best = 0u32;
    for expectation in expected {
        for suggested in &expectation.suggested_names {
            for variant in [suggested.as_str().to_string(), trunc_digits(suggested.as_str())] {
                let expected_words = split_words(&variant);
                best = best.max(suffix_overlap(&name_words, &expected_words));
            }
        }
    }
    best
}

fn suffix_overlap(name_words: &[String], expected_words: &[String]) -> u32 {
    let mut overlap = 0;
    for (a, b) in name_words.iter().rev().zip(expected_words.iter().rev()) {
        if a.eq_ignore_ascii_case(b) {
            overlap += 1;
        } else {
            break;
        }
    }
    overlap
}

fn trunc_digits(name: &str) -> String {
    name.trim_end_matches(|c: char| c.is_ascii_digit()).to_string()
}

/// Splits a camel-case or snake-case identifier into lowercase words.
pub fn split_words(name: &str) -> Vec<String> {
    let mut words: Vec<String> = Vec::new();
    let mut current = String::new();
    let mut prev_upper = false;
    for c in name.chars() {
        if c == '_' || c == '$' {
            if !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
            prev_upper = false;
            continue;
        }
        if c.is_ascii_uppercase() && !prev_upper && !current.is_empty() {
            words.push(std::mem::take(&mut current));
        }
        prev_upper = c.is_ascii_uppercase();
        current.push(c.to_ascii_lowercase());
    }
    if !current.is_empty() {
        words.push(current);
    }
    words
}
