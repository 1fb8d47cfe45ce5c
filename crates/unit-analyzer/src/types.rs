use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// String literal assigned to a name that looks like a file path
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HardcodedLiteral {
    /// Assignment target
    pub target: String,

    /// Literal value without quotes
    pub value: String,

    /// Line within the unit (1-indexed)
    pub line: usize,
}

/// Symbol bound in a unit, with the top-level statement that bound it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScopeEntry {
    pub symbol: String,
    pub statement: usize,
}

/// Symbol facts derived from one unit's source
///
/// All name sets exclude the configured built-in allowlist.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymbolFacts {
    /// Unit index this belongs to
    pub index: usize,

    /// Imported module names as written (`pandas`, `sklearn.model_selection`)
    pub imports: Vec<String>,

    /// Names bound by import declarations
    pub imported_names: BTreeSet<String>,

    /// Top-level function and class definitions
    pub function_names: BTreeSet<String>,

    /// Every name the unit binds: imports, definitions and assignment targets
    pub defined_names: BTreeSet<String>,

    /// Every name read anywhere in the unit
    pub used_names: BTreeSet<String>,

    /// Names read before the unit itself binds them
    pub external_references: BTreeSet<String>,

    pub hardcoded_literals: Vec<HardcodedLiteral>,

    pub has_hardcoded_paths: bool,

    /// Bindings in the order they happened
    pub scope: Vec<ScopeEntry>,
}

impl SymbolFacts {
    /// Facts for a blank, non-code or unparsable unit
    pub fn empty(index: usize) -> Self {
        Self {
            index,
            ..Self::default()
        }
    }

    /// Nothing was derived from the unit
    pub fn is_empty(&self) -> bool {
        self.imports.is_empty()
            && self.defined_names.is_empty()
            && self.used_names.is_empty()
            && self.external_references.is_empty()
    }

    /// Names bound by statements, i.e. neither imported nor a top-level definition
    pub fn variable_names(&self) -> BTreeSet<String> {
        self.defined_names
            .iter()
            .filter(|name| {
                !self.imported_names.contains(*name) && !self.function_names.contains(*name)
            })
            .cloned()
            .collect()
    }

    /// The unit only brings names into scope through imports
    pub fn is_import_only(&self) -> bool {
        !self.imports.is_empty() && self.function_names.is_empty() && self.variable_names().is_empty()
    }

    pub fn defines_functions(&self) -> bool {
        !self.function_names.is_empty()
    }

    /// Top-level statement that first bound `symbol`
    pub fn defined_at(&self, symbol: &str) -> Option<usize> {
        self.scope
            .iter()
            .find(|entry| entry.symbol == symbol)
            .map(|entry| entry.statement)
    }
}
