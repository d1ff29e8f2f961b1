//! Borrowed symbol references and their snapshot records.

use rigel_core::{Name, TypeName};

use crate::types::Ty;

/// Reference into the resolution collaborator's model. Rigel never owns the
/// symbol behind it; `SemanticDb::symbol` returning `None` means the symbol
/// went stale since resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SymbolId(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SymbolKind {
    LocalVariable,
    Parameter,
    Field,
    EnumConstant,
    Method,
    Constructor,
    Class,
    /// Member usable only inside annotation values.
    AnnotationMember,
}

impl SymbolKind {
    pub fn is_variable(self) -> bool {
        matches!(
            self,
            SymbolKind::LocalVariable | SymbolKind::Parameter | SymbolKind::Field
        )
    }

    pub fn is_callable(self) -> bool {
        matches!(self, SymbolKind::Method | SymbolKind::Constructor)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Visibility {
    Public,
    Protected,
    Package,
    Private,
}

/// Snapshot record for one resolved symbol.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Symbol {
    pub name: Name,
    pub kind: SymbolKind,
    /// Declared type for variables, return type for callables, `None` for
    /// classes (their type is themselves).
    pub ty: Option<Ty>,
    /// Containing class, when the symbol is a member.
    pub owner: Option<TypeName>,
    pub visibility: Visibility,
    pub is_static: bool,
    pub is_deprecated: bool,
    pub is_abstract: bool,
    /// Formal parameter types for callables.
    pub params: Vec<Ty>,
    /// Qualified name for classes and importable static members.
    pub qualified_name: Option<TypeName>,
}

impl Symbol {
    fn base(name: impl Into<Name>, kind: SymbolKind) -> Symbol {
        Symbol {
            name: name.into(),
            kind,
            ty: None,
            owner: None,
            visibility: Visibility::Public,
            is_static: false,
            is_deprecated: false,
            is_abstract: false,
            params: Vec::new(),
            qualified_name: None,
        }
    }

    pub fn local(name: impl Into<Name>, ty: Ty) -> Symbol {
        Symbol {
            ty: Some(ty),
            ..Self::base(name, SymbolKind::LocalVariable)
        }
    }

    pub fn param(name: impl Into<Name>, ty: Ty) -> Symbol {
        Symbol {
            ty: Some(ty),
            ..Self::base(name, SymbolKind::Parameter)
        }
    }

    pub fn field(name: impl Into<Name>, ty: Ty, owner: impl Into<TypeName>) -> Symbol {
        Symbol {
            ty: Some(ty),
            owner: Some(owner.into()),
            ..Self::base(name, SymbolKind::Field)
        }
    }

    pub fn method(
        name: impl Into<Name>,
        ret: Ty,
        params: Vec<Ty>,
        owner: impl Into<TypeName>,
    ) -> Symbol {
        Symbol {
            ty: Some(ret),
            params,
            owner: Some(owner.into()),
            ..Self::base(name, SymbolKind::Method)
        }
    }

    pub fn class(qualified: impl Into<TypeName>) -> Symbol {
        let qualified = qualified.into();
        Symbol {
            qualified_name: Some(qualified.clone()),
            ..Self::base(qualified.short_name(), SymbolKind::Class)
        }
    }

    pub fn with_visibility(mut self, visibility: Visibility) -> Symbol {
        self.visibility = visibility;
        self
    }

    pub fn with_static(mut self) -> Symbol {
        self.is_static = true;
        self
    }

    pub fn with_deprecated(mut self) -> Symbol {
        self.is_deprecated = true;
        self
    }

    pub fn with_abstract(mut self) -> Symbol {
        self.is_abstract = true;
        self
    }

    /// The type a reference to this symbol evaluates to, if it has one.
    pub fn reference_type(&self) -> Option<Ty> {
        match self.kind {
            SymbolKind::Class => self
                .qualified_name
                .as_ref()
                .map(|name| Ty::class(name.as_str())),
            _ => self.ty.clone(),
        }
    }

    /// Stable identity for dedup: qualified name when present, otherwise
    /// owner-scoped name plus arity (overloads collapse later, not here).
    pub fn identity_key(&self) -> String {
        if let Some(qualified) = &self.qualified_name {
            return qualified.as_str().to_string();
        }
        let owner = self.owner.as_ref().map(TypeName::as_str).unwrap_or("");
        format!("{owner}#{}/{}:{:?}", self.name, self.params.len(), self.kind)
    }
}
