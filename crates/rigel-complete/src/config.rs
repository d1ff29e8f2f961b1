use serde::{Deserialize, Serialize};

/// User-facing completion configuration.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct CompletionConfig {
    /// Packages whose classes never appear in results, matched by
    /// fully-qualified prefix.
    #[serde(default)]
    pub excluded_packages: Vec<String>,
    /// Cap on placeholder commas scaffolded for call arguments.
    #[serde(default = "default_max_placeholder_args")]
    pub max_placeholder_args: usize,
    /// Abstract classes with more unimplemented members than this are demoted
    /// out of the exact-match bucket even when exactly expected.
    #[serde(default = "default_max_abstract_unimplemented")]
    pub max_abstract_unimplemented: usize,
    #[serde(default)]
    pub space_before_call_parens: bool,
    #[serde(default)]
    pub space_within_call_parens: bool,
    #[serde(default = "default_true")]
    pub space_after_cast: bool,
    /// Whether a `(` trigger still auto-closes the pair for parameterless
    /// calls.
    #[serde(default = "default_true")]
    pub pair_bracket_on_lparen: bool,
}

fn default_max_placeholder_args() -> usize {
    4
}

fn default_max_abstract_unimplemented() -> usize {
    2
}

fn default_true() -> bool {
    true
}

impl Default for CompletionConfig {
    fn default() -> Self {
        Self {
            excluded_packages: Vec::new(),
            max_placeholder_args: default_max_placeholder_args(),
            max_abstract_unimplemented: default_max_abstract_unimplemented(),
            space_before_call_parens: false,
            space_within_call_parens: false,
            space_after_cast: default_true(),
            pair_bracket_on_lparen: default_true(),
        }
    }
}

impl CompletionConfig {
    pub fn is_package_excluded(&self, qualified_name: &str) -> bool {
        self.excluded_packages.iter().any(|excluded| {
            qualified_name == excluded
                || qualified_name
                    .strip_prefix(excluded.as_str())
                    .is_some_and(|rest| rest.starts_with('.'))
        })
    }
}
