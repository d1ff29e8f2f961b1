//! Cursor context: everything the external parser tells the engine about the
//! position being completed.

use rigel_core::{Name, TypeName};

use crate::symbol::SymbolId;
use crate::types::Ty;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompletionMode {
    /// Lexical completion: rank by symbol kind before type compatibility.
    Basic,
    /// Type-driven completion: rank by expected-type compatibility.
    Smart,
}

/// Syntactic role of the cursor position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PositionKind {
    Statement,
    ReturnValue,
    /// Initializer of the enclosing variable declaration.
    Initializer,
    /// Right-hand side of an assignment.
    AssignmentRhs,
    ArgumentList,
    Condition,
    AnnotationValue,
    TypeReference,
}

/// Keywords the grammar considers plausible at the cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Keyword {
    Return,
    Else,
    Finally,
    True,
    False,
    Null,
    This,
}

impl Keyword {
    pub fn text(self) -> &'static str {
        match self {
            Keyword::Return => "return",
            Keyword::Else => "else",
            Keyword::Finally => "finally",
            Keyword::True => "true",
            Keyword::False => "false",
            Keyword::Null => "null",
            Keyword::This => "this",
        }
    }

    /// Literal keywords evaluate to a value and carry a type; flow keywords
    /// do not.
    pub fn literal_type(self) -> Option<Ty> {
        match self {
            Keyword::True | Keyword::False => Some(Ty::boolean()),
            Keyword::Null => Some(Ty::Null),
            _ => None,
        }
    }

    pub fn is_flow(self) -> bool {
        matches!(self, Keyword::Return | Keyword::Else | Keyword::Finally)
    }
}

/// Identity of the runtime object a qualifier expression refers to, as far as
/// dataflow can tell. Two qualifiers with the same `ReceiverId` denote the
/// same object even when written differently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ReceiverId(pub u32);

/// A qualifier expression as the parser saw it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QualifierExpr {
    pub text: String,
    pub ty: Option<Ty>,
    pub refers_to: Option<ReceiverId>,
}

impl QualifierExpr {
    pub fn this() -> QualifierExpr {
        QualifierExpr {
            text: "this".to_string(),
            ty: None,
            refers_to: Some(ReceiverId(0)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnclosingKind {
    Method,
    Constructor,
    /// A variable whose initializer contains the cursor.
    Variable,
}

/// The declaration whose body/initializer contains the cursor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnclosingDecl {
    pub symbol: SymbolId,
    pub kind: EnclosingKind,
    /// The qualifier an unqualified reference inside this declaration
    /// implicitly uses (`this` for instance methods).
    pub implicit_qualifier: Option<QualifierExpr>,
}

/// Abstract shape of a constructor statement, for the definite-assignment
/// filter. The parser supplies only what the filter reads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CtorStatement {
    AssignField(Name),
    /// `this(...)` delegating call; assigns every field as of that point.
    DelegateCall,
    Other,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConstructorFlow {
    /// Statements lexically before the cursor, in order.
    pub before_cursor: Vec<CtorStatement>,
    /// When the cursor sits in `this.<field> = <caret-side>` position, the
    /// field being assigned: its own left-hand read is not a "read".
    pub assignment_target: Option<Name>,
}

/// Immutable description of the completion position, built by the host from
/// its syntax tree and handed to the session at start.
#[derive(Debug, Clone)]
pub struct CursorContext {
    /// Package of the file being edited.
    pub package: Option<Name>,
    /// Class whose body lexically contains the cursor.
    pub containing_class: Option<TypeName>,
    /// Set when the cursor is inside an anonymous subclass body: protected
    /// and package members of this base become reachable once the subclass
    /// is materialized.
    pub anonymous_subclass_of: Option<TypeName>,
    pub static_context: bool,
    pub mode: CompletionMode,
    pub position: PositionKind,
    /// Prefix the user has typed so far.
    pub prefix: String,
    pub enclosing: Option<EnclosingDecl>,
    /// Present only when the cursor is inside a constructor body.
    pub constructor_flow: Option<ConstructorFlow>,
    /// Qualifier of the call/reference being completed, if any.
    pub call_qualifier: Option<QualifierExpr>,
    pub probable_keywords: Vec<Keyword>,
}

impl Default for CursorContext {
    fn default() -> Self {
        CursorContext {
            package: None,
            containing_class: None,
            anonymous_subclass_of: None,
            static_context: false,
            mode: CompletionMode::Basic,
            position: PositionKind::Statement,
            prefix: String::new(),
            enclosing: None,
            constructor_flow: None,
            call_qualifier: None,
            probable_keywords: Vec::new(),
        }
    }
}

impl CursorContext {
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    pub fn smart(mut self) -> Self {
        self.mode = CompletionMode::Smart;
        self
    }
}
