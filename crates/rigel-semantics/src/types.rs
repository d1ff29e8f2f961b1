//! The semantic type model the engine compares candidates against.
//!
//! Types arrive from the external inference collaborator already resolved;
//! the engine only ever asks "does this fit that" style questions, so the
//! model is a value tree with no interning and no back-references.

use std::fmt;

use rigel_core::TypeName;

use crate::well_known;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveTy {
    Boolean,
    Byte,
    Short,
    Int,
    Long,
    Char,
    Float,
    Double,
    Void,
}

impl PrimitiveTy {
    pub fn keyword(self) -> &'static str {
        match self {
            PrimitiveTy::Boolean => "boolean",
            PrimitiveTy::Byte => "byte",
            PrimitiveTy::Short => "short",
            PrimitiveTy::Int => "int",
            PrimitiveTy::Long => "long",
            PrimitiveTy::Char => "char",
            PrimitiveTy::Float => "float",
            PrimitiveTy::Double => "double",
            PrimitiveTy::Void => "void",
        }
    }

    /// Widening primitive conversion, reflexive.
    pub fn widens_to(self, target: PrimitiveTy) -> bool {
        use PrimitiveTy::*;
        if self == target {
            return true;
        }
        match self {
            Byte => matches!(target, Short | Int | Long | Float | Double),
            Short => matches!(target, Int | Long | Float | Double),
            Char => matches!(target, Int | Long | Float | Double),
            Int => matches!(target, Long | Float | Double),
            Long => matches!(target, Float | Double),
            Float => matches!(target, Double),
            Boolean | Double | Void => false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WildcardKind {
    Unbounded,
    Extends,
    Super,
}

/// A resolved semantic type.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Ty {
    Primitive(PrimitiveTy),
    Class {
        name: TypeName,
        args: Vec<Ty>,
    },
    Array(Box<Ty>),
    Wildcard {
        kind: WildcardKind,
        bound: Option<Box<Ty>>,
    },
    /// The type of the `null` literal.
    Null,
    /// Inference failed upstream; never matches anything.
    Error,
}

impl Ty {
    pub fn class(name: impl Into<TypeName>) -> Ty {
        Ty::Class {
            name: name.into(),
            args: Vec::new(),
        }
    }

    pub fn generic(name: impl Into<TypeName>, args: Vec<Ty>) -> Ty {
        Ty::Class {
            name: name.into(),
            args,
        }
    }

    pub fn array(component: Ty) -> Ty {
        Ty::Array(Box::new(component))
    }

    pub fn object() -> Ty {
        Ty::class(well_known::OBJECT)
    }

    pub fn string() -> Ty {
        Ty::class(well_known::STRING)
    }

    pub fn boolean() -> Ty {
        Ty::Primitive(PrimitiveTy::Boolean)
    }

    pub fn int() -> Ty {
        Ty::Primitive(PrimitiveTy::Int)
    }

    pub fn class_name(&self) -> Option<&TypeName> {
        match self {
            Ty::Class { name, .. } => Some(name),
            _ => None,
        }
    }

    pub fn array_component(&self) -> Option<&Ty> {
        match self {
            Ty::Array(component) => Some(component),
            _ => None,
        }
    }

    pub fn is_reference(&self) -> bool {
        matches!(self, Ty::Class { .. } | Ty::Array(_) | Ty::Null)
    }

    pub fn is_void(&self) -> bool {
        matches!(self, Ty::Primitive(PrimitiveTy::Void))
    }

    /// Source-level rendering with short class names, e.g. `List<String>`.
    ///
    /// Used when composing insertion text; qualification is decided later by
    /// the import step, not here.
    pub fn render_short(&self) -> String {
        let mut out = String::new();
        self.render(&mut out, false);
        out
    }

    /// Fully qualified rendering, e.g. `java.util.List<java.lang.String>`.
    pub fn render_qualified(&self) -> String {
        let mut out = String::new();
        self.render(&mut out, true);
        out
    }

    fn render(&self, out: &mut String, qualified: bool) {
        match self {
            Ty::Primitive(p) => out.push_str(p.keyword()),
            Ty::Class { name, args } => {
                out.push_str(if qualified {
                    name.as_str()
                } else {
                    name.short_name()
                });
                if !args.is_empty() {
                    out.push('<');
                    for (i, arg) in args.iter().enumerate() {
                        if i > 0 {
                            out.push_str(", ");
                        }
                        arg.render(out, qualified);
                    }
                    out.push('>');
                }
            }
            Ty::Array(component) => {
                component.render(out, qualified);
                out.push_str("[]");
            }
            Ty::Wildcard { kind, bound } => {
                out.push('?');
                if let Some(bound) = bound {
                    out.push_str(match kind {
                        WildcardKind::Extends => " extends ",
                        WildcardKind::Super => " super ",
                        WildcardKind::Unbounded => " ",
                    });
                    bound.render(out, qualified);
                }
            }
            Ty::Null => out.push_str("null"),
            Ty::Error => out.push_str("<error>"),
        }
    }
}

impl fmt::Display for Ty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render_short())
    }
}

/// Class-hierarchy queries answered by the resolution collaborator.
pub trait TypeHierarchy {
    /// Direct supertypes (extends + implements) of a class, by qualified name.
    fn direct_supertypes(&self, class: &TypeName) -> Vec<TypeName>;
}

/// Reflexive, transitive nominal subtyping over qualified names.
pub fn is_class_subtype(h: &dyn TypeHierarchy, sub: &TypeName, sup: &TypeName) -> bool {
    if sub == sup || sup.as_str() == well_known::OBJECT {
        return true;
    }
    let mut queue = vec![sub.clone()];
    let mut seen = Vec::new();
    while let Some(current) = queue.pop() {
        if seen.contains(&current) {
            continue;
        }
        for parent in h.direct_supertypes(&current) {
            if &parent == sup {
                return true;
            }
            queue.push(parent);
        }
        seen.push(current);
    }
    false
}

/// Assignability of `from` into a slot of type `to`.
///
/// Generic arguments compare loosely: raw source types fit any instantiation
/// and `Object`/wildcard targets accept anything, matching how the engine's
/// upstream inference erases what it cannot prove.
pub fn is_assignable(h: &dyn TypeHierarchy, from: &Ty, to: &Ty) -> bool {
    let from = eliminate_wildcards(from.clone());
    let to = eliminate_wildcards(to.clone());
    assignable_rec(h, &from, &to)
}

fn assignable_rec(h: &dyn TypeHierarchy, from: &Ty, to: &Ty) -> bool {
    if from == to {
        return true;
    }
    match (from, to) {
        (Ty::Error, _) | (_, Ty::Error) => false,
        (Ty::Null, to) => to.is_reference(),
        (Ty::Primitive(a), Ty::Primitive(b)) => a.widens_to(*b),
        (Ty::Array(a), Ty::Array(b)) => match (a.as_ref(), b.as_ref()) {
            (Ty::Primitive(pa), Ty::Primitive(pb)) => pa == pb,
            (a, b) => a.is_reference() && b.is_reference() && assignable_rec(h, a, b),
        },
        (Ty::Array(_), Ty::Class { name, .. }) => name.as_str() == well_known::OBJECT,
        (
            Ty::Class {
                name: from_name,
                args: from_args,
            },
            Ty::Class {
                name: to_name,
                args: to_args,
            },
        ) => {
            if !is_class_subtype(h, from_name, to_name) {
                return false;
            }
            if to_args.is_empty() || from_args.is_empty() {
                // Raw on either side: erasure accepts.
                return true;
            }
            if from_name == to_name && from_args.len() == to_args.len() {
                return from_args
                    .iter()
                    .zip(to_args)
                    .all(|(f, t)| arg_compatible(h, f, t));
            }
            // Subtype with generics: trust the nominal relation.
            true
        }
        _ => false,
    }
}

fn arg_compatible(h: &dyn TypeHierarchy, from: &Ty, to: &Ty) -> bool {
    if from == to {
        return true;
    }
    match to {
        Ty::Class { name, args } if name.as_str() == well_known::OBJECT && args.is_empty() => true,
        _ => assignable_rec(h, from, to),
    }
}

/// Replace wildcard bounds with their usable type, recursively in type
/// arguments but only one level deep inside arrays.
pub fn eliminate_wildcards(ty: Ty) -> Ty {
    eliminate_inner(ty, true)
}

fn eliminate_inner(ty: Ty, in_type_args: bool) -> Ty {
    match ty {
        Ty::Wildcard { kind, bound } => match (kind, bound) {
            (WildcardKind::Extends, Some(bound)) => eliminate_inner(*bound, in_type_args),
            _ => Ty::object(),
        },
        Ty::Class { name, args } if in_type_args => Ty::Class {
            name,
            args: args
                .into_iter()
                .map(|arg| eliminate_inner(arg, true))
                .collect(),
        },
        Ty::Array(component) => Ty::Array(Box::new(eliminate_inner(*component, false))),
        other => other,
    }
}

/// Element type of an iterable-shaped class type, `Object` for raw ones.
pub fn iterable_element(h: &dyn TypeHierarchy, ty: &Ty) -> Option<Ty> {
    let Ty::Class { name, args } = ty else {
        return None;
    };
    if !is_class_subtype(h, name, &TypeName::new(well_known::ITERABLE)) {
        return None;
    }
    Some(args.first().cloned().unwrap_or_else(Ty::object))
}

/// Element type of a stream-shaped class type.
pub fn stream_element(h: &dyn TypeHierarchy, ty: &Ty) -> Option<Ty> {
    let Ty::Class { name, args } = ty else {
        return None;
    };
    if !is_class_subtype(h, name, &TypeName::new(well_known::STREAM)) {
        return None;
    }
    Some(args.first().cloned().unwrap_or_else(Ty::object))
}
