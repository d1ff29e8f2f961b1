//! Import planner double: one `import x.y.Z;` line at the top of the file.

use rigel_core::{TextSize, TypeName};
use rigel_semantics::{ImportPlan, ImportPlanner};

/// Plans a top-of-file import unless one is already present, or refuses when
/// the short name is marked as taken.
#[derive(Debug, Default)]
pub struct TestImports {
    taken_short_names: Vec<String>,
}

impl TestImports {
    pub fn new() -> TestImports {
        TestImports::default()
    }

    /// Marks a short name as resolving to something else, forcing qualified
    /// references.
    pub fn take_short_name(mut self, name: &str) -> TestImports {
        self.taken_short_names.push(name.to_string());
        self
    }
}

impl ImportPlanner for TestImports {
    fn plan(&self, qualified: &TypeName, document_text: &str) -> ImportPlan {
        if self
            .taken_short_names
            .iter()
            .any(|taken| taken == qualified.short_name())
        {
            return ImportPlan::UseQualifiedName;
        }
        let line = format!("import {qualified};\n");
        if document_text.contains(&line) {
            return ImportPlan::AlreadyVisible;
        }
        ImportPlan::AddImport {
            offset: TextSize::new(0),
            text: line,
        }
    }
}
