//! In-memory `SemanticDb` with a builder API for scenario setup.

use std::cell::Cell;
use std::collections::HashMap;

use rigel_core::TypeName;
use rigel_semantics::{
    types, CursorContext, ExpectedType, SemanticDb, Symbol, SymbolId, Ty, TypeHierarchy,
    Visibility,
};

use crate::ty_parse::parse_ty;

#[derive(Debug, Clone, Default)]
struct SymbolMeta {
    in_scope: bool,
    valid: bool,
    narrowed: Option<Ty>,
    array_length: Option<usize>,
    usage: Option<u32>,
    required_by_interface: bool,
}

#[derive(Debug, Default)]
pub struct ModelBuilder {
    symbols: Vec<(Symbol, SymbolMeta)>,
    supertypes: HashMap<TypeName, Vec<TypeName>>,
    unimplemented: HashMap<TypeName, usize>,
    empty_array_constants: Vec<(Ty, String)>,
    expected: Vec<ExpectedType>,
}

impl ModelBuilder {
    pub fn new() -> ModelBuilder {
        ModelBuilder::default()
    }

    fn push(&mut self, symbol: Symbol, in_scope: bool) -> SymbolId {
        self.symbols.push((
            symbol,
            SymbolMeta {
                in_scope,
                valid: true,
                ..SymbolMeta::default()
            },
        ));
        SymbolId(self.symbols.len() as u32 - 1)
    }

    pub fn local(&mut self, name: &str, ty: &str) -> SymbolId {
        self.push(Symbol::local(name, parse_ty(ty)), true)
    }

    pub fn param(&mut self, name: &str, ty: &str) -> SymbolId {
        self.push(Symbol::param(name, parse_ty(ty)), true)
    }

    pub fn class(&mut self, qualified: &str, supers: &[&str]) -> SymbolId {
        self.supertypes.insert(
            TypeName::new(qualified),
            supers.iter().map(|s| TypeName::new(s)).collect(),
        );
        self.push(Symbol::class(qualified), true)
    }

    pub fn abstract_class(
        &mut self,
        qualified: &str,
        supers: &[&str],
        unimplemented: usize,
    ) -> SymbolId {
        let id = self.class(qualified, supers);
        self.symbols[id.0 as usize].0.is_abstract = true;
        self.unimplemented
            .insert(TypeName::new(qualified), unimplemented);
        id
    }

    pub fn field(&mut self, owner: &str, name: &str, ty: &str) -> SymbolId {
        self.push(Symbol::field(name, parse_ty(ty), owner), true)
    }

    pub fn static_field(&mut self, owner: &str, name: &str, ty: &str) -> SymbolId {
        let id = self.field(owner, name, ty);
        self.symbols[id.0 as usize].0.is_static = true;
        id
    }

    pub fn method(&mut self, owner: &str, name: &str, ret: &str, params: &[&str]) -> SymbolId {
        let params = params.iter().map(|p| parse_ty(p)).collect();
        self.push(Symbol::method(name, parse_ty(ret), params, owner), true)
    }

    pub fn static_method(
        &mut self,
        owner: &str,
        name: &str,
        ret: &str,
        params: &[&str],
    ) -> SymbolId {
        let id = self.method(owner, name, ret, params);
        self.symbols[id.0 as usize].0.is_static = true;
        id
    }

    /// Registers the collection/stream hierarchy tests lean on, without
    /// adding class symbols to the scope.
    pub fn jdk_collections(&mut self) {
        for (sub, sups) in [
            ("java.util.ArrayList", vec!["java.util.List"]),
            ("java.util.List", vec!["java.util.Collection"]),
            ("java.util.Set", vec!["java.util.Collection"]),
            ("java.util.HashSet", vec!["java.util.Set"]),
            ("java.util.Collection", vec!["java.lang.Iterable"]),
            ("java.util.stream.Stream", vec![]),
        ] {
            self.supertypes.insert(
                TypeName::new(sub),
                sups.into_iter().map(TypeName::new).collect(),
            );
        }
    }

    pub fn set_visibility(&mut self, id: SymbolId, visibility: Visibility) {
        self.symbols[id.0 as usize].0.visibility = visibility;
    }

    pub fn deprecate(&mut self, id: SymbolId) {
        self.symbols[id.0 as usize].0.is_deprecated = true;
    }

    pub fn invalidate(&mut self, id: SymbolId) {
        self.symbols[id.0 as usize].1.valid = false;
    }

    pub fn out_of_scope(&mut self, id: SymbolId) {
        self.symbols[id.0 as usize].1.in_scope = false;
    }

    pub fn narrow(&mut self, id: SymbolId, ty: &str) {
        self.symbols[id.0 as usize].1.narrowed = Some(parse_ty(ty));
    }

    pub fn array_length(&mut self, id: SymbolId, length: usize) {
        self.symbols[id.0 as usize].1.array_length = Some(length);
    }

    pub fn usage(&mut self, id: SymbolId, rank: u32) {
        self.symbols[id.0 as usize].1.usage = Some(rank);
    }

    pub fn require_interface(&mut self, id: SymbolId) {
        self.symbols[id.0 as usize].1.required_by_interface = true;
    }

    pub fn empty_array_constant(&mut self, component: &str, text: &str) {
        self.empty_array_constants
            .push((parse_ty(component), text.to_string()));
    }

    pub fn expect(&mut self, expected: ExpectedType) {
        self.expected.push(expected);
    }

    pub fn build(self) -> TestDb {
        TestDb {
            symbols: self.symbols,
            supertypes: self.supertypes,
            unimplemented: self.unimplemented,
            empty_array_constants: self.empty_array_constants,
            expected: self.expected,
            expected_queries: Cell::new(0),
        }
    }
}

#[derive(Debug)]
pub struct TestDb {
    symbols: Vec<(Symbol, SymbolMeta)>,
    supertypes: HashMap<TypeName, Vec<TypeName>>,
    unimplemented: HashMap<TypeName, usize>,
    empty_array_constants: Vec<(Ty, String)>,
    expected: Vec<ExpectedType>,
    expected_queries: Cell<usize>,
}

impl TestDb {
    /// Every symbol id ever registered, live or stale, in registration order.
    pub fn all_symbols(&self) -> Vec<SymbolId> {
        (0..self.symbols.len() as u32).map(SymbolId).collect()
    }

    /// How many times `expected_types` ran; the session must cache.
    pub fn expected_queries(&self) -> usize {
        self.expected_queries.get()
    }

    fn meta(&self, id: SymbolId) -> Option<&SymbolMeta> {
        self.symbols.get(id.0 as usize).map(|(_, meta)| meta)
    }
}

impl TypeHierarchy for TestDb {
    fn direct_supertypes(&self, class: &TypeName) -> Vec<TypeName> {
        self.supertypes.get(class).cloned().unwrap_or_default()
    }
}

impl SemanticDb for TestDb {
    fn symbol(&self, id: SymbolId) -> Option<Symbol> {
        let (symbol, meta) = self.symbols.get(id.0 as usize)?;
        meta.valid.then(|| symbol.clone())
    }

    fn resolve_at(&self, _cx: &CursorContext) -> Vec<SymbolId> {
        self.symbols
            .iter()
            .enumerate()
            .filter(|(_, (_, meta))| meta.in_scope)
            .map(|(i, _)| SymbolId(i as u32))
            .collect()
    }

    fn expected_types(&self, _cx: &CursorContext) -> Vec<ExpectedType> {
        self.expected_queries.set(self.expected_queries.get() + 1);
        self.expected.clone()
    }

    fn members_of(&self, ty: &Ty) -> Vec<SymbolId> {
        let Some(name) = ty.class_name() else {
            return Vec::new();
        };
        self.symbols
            .iter()
            .enumerate()
            .filter(|(_, (symbol, meta))| {
                meta.valid
                    && symbol.owner.as_ref().is_some_and(|owner| {
                        types::is_class_subtype(self, name, owner)
                    })
            })
            .map(|(i, _)| SymbolId(i as u32))
            .collect()
    }

    fn usage_rank(&self, id: SymbolId, _cx: &CursorContext) -> Option<u32> {
        self.meta(id)?.usage
    }

    fn narrowed_type(&self, id: SymbolId, _cx: &CursorContext) -> Option<Ty> {
        self.meta(id)?.narrowed.clone()
    }

    fn known_array_length(&self, id: SymbolId, _cx: &CursorContext) -> Option<usize> {
        self.meta(id)?.array_length
    }

    fn empty_array_constant(&self, component: &Ty, _cx: &CursorContext) -> Option<String> {
        self.empty_array_constants
            .iter()
            .find(|(ty, _)| ty == component)
            .map(|(_, text)| text.clone())
    }

    fn required_by_interface(&self, id: SymbolId, _cx: &CursorContext) -> bool {
        self.meta(id).is_some_and(|meta| meta.required_by_interface)
    }

    fn unimplemented_member_count(&self, class: &TypeName) -> usize {
        self.unimplemented.get(class).copied().unwrap_or(0)
    }

    fn as_hierarchy(&self) -> &dyn TypeHierarchy {
        self
    }
}
