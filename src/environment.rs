//! Names a query may reference without binding them itself.
//!
//! The lowering pass never looks at process state to decide whether an
//! identifier exists. Callers hand it an [`Environment`] instead.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Built-in names accepted in every query.
pub const DEFAULT_BUILTINS: &[&str] = &[
    "True", "False", "None", "abs", "all", "any", "len", "max", "min", "sum",
];

/// Host globals the emitted expressions are evaluated with.
pub const DEFAULT_GLOBALS: &[&str] = &["np", "awkward", "uproot", "logging"];

/// Allow-list of identifiers that resolve outside any lambda.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Environment {
    pub builtins: BTreeSet<String>,
    pub globals: BTreeSet<String>,
}

impl Default for Environment {
    fn default() -> Self {
        Environment {
            builtins: DEFAULT_BUILTINS.iter().map(|s| s.to_string()).collect(),
            globals: DEFAULT_GLOBALS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl Environment {
    /// An environment that resolves nothing.
    pub fn empty() -> Self {
        Environment {
            builtins: BTreeSet::new(),
            globals: BTreeSet::new(),
        }
    }

    pub fn with_global(mut self, name: impl Into<String>) -> Self {
        self.globals.insert(name.into());
        self
    }

    pub fn with_builtin(mut self, name: impl Into<String>) -> Self {
        self.builtins.insert(name.into());
        self
    }

    pub fn is_builtin(&self, name: &str) -> bool {
        self.builtins.contains(name)
    }

    pub fn is_global(&self, name: &str) -> bool {
        self.globals.contains(name)
    }
}
