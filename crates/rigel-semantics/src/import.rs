//! Reference-shortening/import collaborator.

use rigel_core::{TextSize, TypeName};

/// What the import collaborator decided for one reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImportPlan {
    /// The short name already resolves to this type here; nothing to do.
    AlreadyVisible,
    /// Insert `text` (typically an import statement plus newline) at
    /// `offset`, then the short name resolves.
    AddImport { offset: TextSize, text: String },
    /// The short name is taken by something else; the reference must stay
    /// fully qualified.
    UseQualifiedName,
}

/// Decides how a freshly inserted type reference becomes resolvable. The
/// planner only advises; the insertion engine performs the edit so tracked
/// offsets stay consistent.
pub trait ImportPlanner {
    fn plan(&self, qualified: &TypeName, document_text: &str) -> ImportPlan;
}

/// Planner for hosts without import support: every reference stays qualified.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoImports;

impl ImportPlanner for NoImports {
    fn plan(&self, _qualified: &TypeName, _document_text: &str) -> ImportPlan {
        ImportPlan::UseQualifiedName
    }
}
