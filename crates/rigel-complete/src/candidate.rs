//! The unit of completion: a base object plus an ordered decorator list.
//!
//! Derived behavior (casts, qualifier chains, conversions) composes as data
//! records rather than wrapper objects; the insertion engine interprets the
//! decorator list, and each decorator is testable on its own.

use rigel_core::TypeName;
use rigel_semantics::{well_known, Keyword, Symbol, SymbolId, TailKind, Ty};

/// What a candidate ultimately refers to. Symbols are borrowed references
/// into the session snapshot; the candidate never owns their lifetime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CandidateObject {
    Symbol(SymbolId),
    Keyword(Keyword),
}

/// Where the zero-length array argument of a `toArray` conversion comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EmptyArraySource {
    /// An accessible zero-length constant, rendered as reference text.
    Constant(String),
    /// A fresh `new T[0]` literal.
    NewArray(Ty),
}

impl EmptyArraySource {
    pub fn render(&self) -> String {
        match self {
            EmptyArraySource::Constant(text) => text.clone(),
            EmptyArraySource::NewArray(component) => {
                format!("new {}[0]", component.render_short())
            }
        }
    }
}

/// Which terminal reducer a collector conversion applies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CollectorBuilder {
    ToList,
    ToSet,
    Joining,
    /// Fallback when no named builder matches the expected container.
    ToCollection(Ty),
}

impl CollectorBuilder {
    pub fn render(&self) -> String {
        match self {
            CollectorBuilder::ToList => "Collectors.toList()".to_string(),
            CollectorBuilder::ToSet => "Collectors.toSet()".to_string(),
            CollectorBuilder::Joining => "Collectors.joining()".to_string(),
            CollectorBuilder::ToCollection(container) => {
                format!("Collectors.toCollection({}::new)", container.render_short())
            }
        }
    }
}

/// One wrapping transformation on a base candidate. Ordered: decorators apply
/// outside-in as listed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decorator {
    /// `(Target) base`
    Cast { target: Ty },
    /// `qualifier.base`; the qualifier is itself a candidate and inserts
    /// recursively.
    QualifiedBy { qualifier: Box<Candidate> },
    /// `Arrays.asList(base)`
    AsList,
    /// `base.toArray(empty)`
    ToArray { empty: EmptyArraySource },
    /// `base[0]`
    FirstElement,
    /// `base.collect(Collectors.…)`
    Collect { builder: CollectorBuilder },
    /// Overloads collapsed into one row; counts are sorted ascending.
    MergedOverloads { param_counts: Vec<usize> },
}

impl Decorator {
    /// Short tag for identity keys and logs.
    fn tag(&self) -> String {
        match self {
            Decorator::Cast { target } => format!("cast<{}>", target.render_qualified()),
            Decorator::QualifiedBy { qualifier } => {
                format!("qual<{}>", qualifier.identity_key())
            }
            Decorator::AsList => "aslist".to_string(),
            Decorator::ToArray { .. } => "toarray".to_string(),
            Decorator::FirstElement => "first".to_string(),
            Decorator::Collect { builder } => format!("collect<{}>", builder.render()),
            Decorator::MergedOverloads { .. } => "merged".to_string(),
        }
    }
}

/// Import requirement attached to a candidate (`IsImportable` capability).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportSpec {
    pub qualified: TypeName,
    /// `true`: register for shortening/import; `false`: keep the reference
    /// fully qualified.
    pub should_import: bool,
}

/// One potential completion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    object: CandidateObject,
    primary_string: String,
    alternate_strings: Vec<String>,
    /// `HasDeclaredType` capability: the type a reference to this candidate
    /// evaluates to, after all decorators.
    declared_type: Option<Ty>,
    decorators: Vec<Decorator>,
    import: Option<ImportSpec>,
    /// Overrides the expectation's tail for this candidate (keywords mostly).
    tail_override: Option<TailKind>,
    /// Call-shaped candidate that needs no caret inside its parentheses.
    no_arg_entry: bool,
    /// Identity of the base symbol for dedup, stable across decoration.
    base_identity: String,
}

impl Candidate {
    pub fn for_symbol(id: SymbolId, symbol: &Symbol) -> Candidate {
        let mut alternates = Vec::new();
        if let Some(qualified) = &symbol.qualified_name {
            alternates.push(qualified.as_str().to_string());
        }
        let import = symbol.qualified_name.as_ref().map(|qualified| ImportSpec {
            qualified: qualified.clone(),
            should_import: true,
        });
        Candidate {
            object: CandidateObject::Symbol(id),
            primary_string: symbol.name.as_str().to_string(),
            alternate_strings: alternates,
            declared_type: symbol.reference_type(),
            decorators: Vec::new(),
            import,
            tail_override: None,
            no_arg_entry: symbol.kind.is_callable() && symbol.params.is_empty(),
            base_identity: symbol.identity_key(),
        }
    }

    pub fn for_keyword(keyword: Keyword) -> Candidate {
        Candidate {
            object: CandidateObject::Keyword(keyword),
            primary_string: keyword.text().to_string(),
            alternate_strings: Vec::new(),
            declared_type: keyword.literal_type(),
            decorators: Vec::new(),
            import: None,
            tail_override: match keyword {
                Keyword::Return => Some(TailKind::Space),
                Keyword::Else | Keyword::Finally => Some(TailKind::Space),
                _ => None,
            },
            no_arg_entry: false,
            base_identity: format!("kw:{}", keyword.text()),
        }
    }

    pub fn object(&self) -> &CandidateObject {
        &self.object
    }

    pub fn symbol_id(&self) -> Option<SymbolId> {
        match self.object {
            CandidateObject::Symbol(id) => Some(id),
            CandidateObject::Keyword(_) => None,
        }
    }

    pub fn keyword(&self) -> Option<Keyword> {
        match self.object {
            CandidateObject::Keyword(keyword) => Some(keyword),
            CandidateObject::Symbol(_) => None,
        }
    }

    /// Text the candidate matches and, for simple candidates, inserts.
    pub fn primary_string(&self) -> &str {
        &self.primary_string
    }

    pub fn alternate_strings(&self) -> &[String] {
        &self.alternate_strings
    }

    /// All strings the prefix matcher may test.
    pub fn lookup_strings(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.primary_string.as_str())
            .chain(self.alternate_strings.iter().map(String::as_str))
    }

    pub fn declared_type(&self) -> Option<&Ty> {
        self.declared_type.as_ref()
    }

    pub fn decorators(&self) -> &[Decorator] {
        &self.decorators
    }

    pub fn is_synthesized(&self) -> bool {
        self.decorators
            .iter()
            .any(|d| !matches!(d, Decorator::MergedOverloads { .. }))
    }

    pub fn import(&self) -> Option<&ImportSpec> {
        self.import.as_ref()
    }

    pub fn tail_override(&self) -> Option<TailKind> {
        self.tail_override
    }

    pub fn no_arg_entry(&self) -> bool {
        self.no_arg_entry
    }

    /// Identity of the underlying base symbol; identical for every decoration
    /// of the same base.
    pub fn base_identity(&self) -> &str {
        &self.base_identity
    }

    /// Full identity including decoration, for candidate-set dedup.
    pub fn identity_key(&self) -> String {
        let mut key = self.base_identity.clone();
        for decorator in &self.decorators {
            key.push('|');
            key.push_str(&decorator.tag());
        }
        key
    }

    /// Formal parameter counts a call to this candidate may take, from the
    /// merge decorator when present.
    pub fn merged_param_counts(&self) -> Option<&[usize]> {
        self.decorators.iter().find_map(|d| match d {
            Decorator::MergedOverloads { param_counts } => Some(param_counts.as_slice()),
            _ => None,
        })
    }

    pub fn qualifier(&self) -> Option<&Candidate> {
        self.decorators.iter().find_map(|d| match d {
            Decorator::QualifiedBy { qualifier } => Some(qualifier.as_ref()),
            _ => None,
        })
    }

    /// Insert text without the qualifier-chain prefix: the member part of
    /// `qualifier.member`, or the whole primary string for plain candidates.
    pub fn local_string(&self) -> &str {
        match self.qualifier() {
            Some(qualifier) => self
                .primary_string
                .strip_prefix(qualifier.primary_string())
                .and_then(|rest| rest.strip_prefix('.'))
                .unwrap_or(&self.primary_string),
            None => &self.primary_string,
        }
    }

    // Decoration constructors. Each recomputes the primary string and the
    // declared type; the synthesizer supplies result types it has already
    // verified.

    pub fn cast_to(mut self, target: Ty) -> Candidate {
        self.primary_string = format!("({}) {}", target.render_short(), self.primary_string);
        self.declared_type = Some(target.clone());
        self.import = target.class_name().map(|name| ImportSpec {
            qualified: name.clone(),
            should_import: true,
        });
        self.decorators.push(Decorator::Cast { target });
        self
    }

    /// Turn `self` (a member candidate) into `qualifier.self`.
    pub fn qualified_by(mut self, qualifier: Candidate) -> Candidate {
        self.primary_string = format!("{}.{}", qualifier.primary_string, self.primary_string);
        self.alternate_strings = vec![self.object_short_string()];
        self.decorators.push(Decorator::QualifiedBy {
            qualifier: Box::new(qualifier),
        });
        self
    }

    pub fn as_list(mut self, element: Ty) -> Candidate {
        self.primary_string = format!("Arrays.asList({})", self.primary_string);
        self.declared_type = Some(Ty::generic(well_known::LIST, vec![element]));
        self.import = Some(ImportSpec {
            qualified: TypeName::new(well_known::ARRAYS),
            should_import: true,
        });
        self.no_arg_entry = true;
        self.decorators.push(Decorator::AsList);
        self
    }

    pub fn to_array(mut self, component: Ty, empty: EmptyArraySource) -> Candidate {
        self.primary_string = format!("{}.toArray({})", self.primary_string, empty.render());
        self.declared_type = Some(Ty::array(component));
        self.no_arg_entry = true;
        self.decorators.push(Decorator::ToArray { empty });
        self
    }

    pub fn first_element(mut self) -> Candidate {
        let component = self
            .declared_type
            .as_ref()
            .and_then(Ty::array_component)
            .cloned();
        self.primary_string = format!("{}[0]", self.primary_string);
        self.declared_type = component;
        self.decorators.push(Decorator::FirstElement);
        self
    }

    pub fn collect(mut self, builder: CollectorBuilder, result: Ty) -> Candidate {
        self.primary_string = format!("{}.collect({})", self.primary_string, builder.render());
        self.declared_type = Some(result);
        self.import = Some(ImportSpec {
            qualified: TypeName::new(well_known::COLLECTORS),
            should_import: true,
        });
        self.no_arg_entry = true;
        self.decorators.push(Decorator::Collect { builder });
        self
    }

    pub fn merged_overloads(mut self, mut param_counts: Vec<usize>) -> Candidate {
        param_counts.sort_unstable();
        param_counts.dedup();
        self.no_arg_entry = param_counts == [0];
        self.decorators
            .push(Decorator::MergedOverloads { param_counts });
        self
    }

    /// The undecorated lookup string of the object itself (member name for
    /// chains).
    fn object_short_string(&self) -> String {
        match &self.object {
            CandidateObject::Symbol(_) => self
                .primary_string
                .rsplit('.')
                .next()
                .unwrap_or(&self.primary_string)
                .to_string(),
            CandidateObject::Keyword(keyword) => keyword.text().to_string(),
        }
    }
}
