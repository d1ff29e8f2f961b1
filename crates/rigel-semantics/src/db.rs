//! The query surface Rigel reads its collaborators through.

use rigel_core::TypeName;

use crate::context::CursorContext;
use crate::expected::ExpectedType;
use crate::symbol::{Symbol, SymbolId, Visibility};
use crate::types::{self, Ty, TypeHierarchy};

/// Scope/visibility-aware resolution, type inference, and the scoring
/// oracles, bundled behind one trait. Hosts implement the required queries;
/// the optional oracles default to "no data".
pub trait SemanticDb: TypeHierarchy {
    /// Snapshot record for a symbol; `None` once the symbol went stale.
    fn symbol(&self, id: SymbolId) -> Option<Symbol>;

    /// Symbols visible at the cursor, in resolution order. Called once per
    /// session; the result is the session's immutable snapshot.
    fn resolve_at(&self, cx: &CursorContext) -> Vec<SymbolId>;

    /// Expected types for the cursor position. Expensive; the session caches
    /// the answer.
    fn expected_types(&self, cx: &CursorContext) -> Vec<ExpectedType>;

    /// Members reachable through a value of type `ty` (fields, methods).
    fn members_of(&self, ty: &Ty) -> Vec<SymbolId>;

    /// Whether the symbol may be referenced from the cursor's lexical scope.
    ///
    /// The default applies ordinary visibility rules; hosts with richer
    /// scope models override it.
    fn is_accessible(&self, id: SymbolId, cx: &CursorContext) -> bool {
        match self.symbol(id) {
            Some(symbol) => default_accessibility(self.as_hierarchy(), &symbol, cx),
            None => false,
        }
    }

    fn is_deprecated(&self, id: SymbolId) -> bool {
        self.symbol(id).is_some_and(|s| s.is_deprecated)
    }

    /// Historical usage rank, higher = used more. `None` means the oracle
    /// has no data and must not affect ordering.
    fn usage_rank(&self, _id: SymbolId, _cx: &CursorContext) -> Option<u32> {
        None
    }

    /// Dataflow-narrowed type of a variable at the cursor, when analysis
    /// proved one more specific than the declaration.
    fn narrowed_type(&self, _id: SymbolId, _cx: &CursorContext) -> Option<Ty> {
        None
    }

    /// Declared length of an array variable when the initializer makes it
    /// statically known (`new T[1]`, a one-element literal).
    fn known_array_length(&self, _id: SymbolId, _cx: &CursorContext) -> Option<usize> {
        None
    }

    /// An accessible zero-length array constant of the given component type
    /// (e.g. `Constants.EMPTY_STRING_ARRAY`), rendered as reference text.
    fn empty_array_constant(&self, _component: &Ty, _cx: &CursorContext) -> Option<String> {
        None
    }

    /// Whether an interface the cursor's class implements declares this
    /// member abstract (object-identity chains become legitimate then).
    fn required_by_interface(&self, _id: SymbolId, _cx: &CursorContext) -> bool {
        false
    }

    /// Abstract members a concrete use of `class` would have to implement.
    fn unimplemented_member_count(&self, _class: &TypeName) -> usize {
        0
    }

    fn as_hierarchy(&self) -> &dyn TypeHierarchy;
}

/// Ordinary visibility rules, from the perspective of `cx`.
pub fn default_accessibility(h: &dyn TypeHierarchy, symbol: &Symbol, cx: &CursorContext) -> bool {
    let Some(owner) = &symbol.owner else {
        // Locals, parameters, top-level classes: in scope means visible.
        return true;
    };
    match symbol.visibility {
        Visibility::Public => true,
        Visibility::Private => cx.containing_class.as_ref() == Some(owner),
        Visibility::Package => same_package(owner, cx),
        Visibility::Protected => {
            same_package(owner, cx)
                || cx
                    .containing_class
                    .as_ref()
                    .is_some_and(|class| types::is_class_subtype(h, class, owner))
        }
    }
}

fn same_package(owner: &TypeName, cx: &CursorContext) -> bool {
    match &cx.package {
        Some(package) => owner.package() == package.as_str(),
        None => owner.package().is_empty(),
    }
}
