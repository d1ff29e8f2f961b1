//! Expected-type constraints inferred for the cursor position.

use rigel_core::Name;

use crate::types::{self, Ty, TypeHierarchy};

/// How strictly a candidate type must relate to the expectation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpectedKind {
    /// Only the exact type fits (e.g. a condition must be `boolean`).
    Exact,
    /// The slot accepts the type or any subtype (ordinary value positions).
    Subtype,
    /// The slot accepts the type or any supertype (e.g. a thrown exception
    /// caught by a broader clause).
    Supertype,
}

/// Syntax that must textually follow a value of this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TailKind {
    None,
    /// Position gives no signal; insert nothing.
    Unknown,
    Semicolon,
    Comma,
    Space,
    /// Closing parenthesis of a condition.
    RParen,
    CaseColon,
}

impl TailKind {
    /// Text the insertion engine appends, when any.
    pub fn text(self) -> Option<&'static str> {
        match self {
            TailKind::None | TailKind::Unknown => None,
            TailKind::Semicolon => Some(";"),
            TailKind::Comma => Some(", "),
            TailKind::Space => Some(" "),
            TailKind::RParen => Some(")"),
            TailKind::CaseColon => Some(":"),
        }
    }

    /// Whether a typed trigger character already supplies this tail.
    pub fn matches_char(self, c: char) -> bool {
        match self {
            TailKind::Semicolon => c == ';',
            TailKind::Comma => c == ',',
            TailKind::Space => c == ' ',
            TailKind::RParen => c == ')',
            TailKind::CaseColon => c == ':',
            TailKind::None | TailKind::Unknown => false,
        }
    }
}

/// How a candidate type fits one expectation. Order is meaningful: earlier
/// variants are better.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ExpectedFit {
    Exact,
    /// Assignable to the narrower default type the inference prefers.
    Default,
    Assignable,
    Mismatch,
}

/// One expected-type constraint. Wildcards are eliminated on construction so
/// downstream matching never sees bounds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpectedType {
    pub ty: Ty,
    pub kind: ExpectedKind,
    /// Narrower preferred type, used for ranking only, never for filtering.
    pub default_ty: Ty,
    pub tail: TailKind,
    /// Names the inference suggests for this slot (parameter names, field
    /// names); feeds the name-similarity weigher.
    pub suggested_names: Vec<Name>,
}

impl ExpectedType {
    pub fn new(ty: Ty, kind: ExpectedKind, tail: TailKind) -> ExpectedType {
        let ty = types::eliminate_wildcards(ty);
        ExpectedType {
            default_ty: ty.clone(),
            ty,
            kind,
            tail,
            suggested_names: Vec::new(),
        }
    }

    pub fn with_default(mut self, default_ty: Ty) -> ExpectedType {
        self.default_ty = types::eliminate_wildcards(default_ty);
        self
    }

    pub fn with_suggested_names<I, N>(mut self, names: I) -> ExpectedType
    where
        I: IntoIterator<Item = N>,
        N: Into<Name>,
    {
        self.suggested_names = names.into_iter().map(Into::into).collect();
        self
    }

    /// Classify how `ty` fits this expectation.
    pub fn fit(&self, h: &dyn TypeHierarchy, ty: &Ty) -> ExpectedFit {
        let ty = types::eliminate_wildcards(ty.clone());
        if ty == self.ty {
            return ExpectedFit::Exact;
        }
        let assignable = match self.kind {
            ExpectedKind::Exact => false,
            ExpectedKind::Subtype => types::is_assignable(h, &ty, &self.ty),
            ExpectedKind::Supertype => types::is_assignable(h, &self.ty, &ty),
        };
        if !assignable {
            return ExpectedFit::Mismatch;
        }
        if self.default_ty != self.ty && types::is_assignable(h, &ty, &self.default_ty) {
            return ExpectedFit::Default;
        }
        ExpectedFit::Assignable
    }

    pub fn accepts(&self, h: &dyn TypeHierarchy, ty: &Ty) -> bool {
        self.fit(h, ty) != ExpectedFit::Mismatch
    }
}

/// Best fit of `ty` across a whole expectation set.
///
/// The empty set constrains nothing: everything fits exactly as well as
/// everything else, reported as `Assignable` so ranking falls through to the
/// remaining weighers.
pub fn best_fit(expected: &[ExpectedType], h: &dyn TypeHierarchy, ty: &Ty) -> ExpectedFit {
    if expected.is_empty() {
        return ExpectedFit::Assignable;
    }
    expected
        .iter()
        .map(|e| e.fit(h, ty))
        .min()
        .unwrap_or(ExpectedFit::Mismatch)
}
