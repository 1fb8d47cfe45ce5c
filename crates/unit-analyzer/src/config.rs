use crate::error::{AnalyzerError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Global names that never count as definitions or dependencies
const DEFAULT_BUILTINS: &[&str] = &[
    // Constants
    "True",
    "False",
    "None",
    "Ellipsis",
    "NotImplemented",
    "__name__",
    "__file__",
    // Functions
    "abs",
    "all",
    "any",
    "bool",
    "bytes",
    "callable",
    "chr",
    "dict",
    "dir",
    "divmod",
    "enumerate",
    "eval",
    "exec",
    "filter",
    "float",
    "format",
    "frozenset",
    "getattr",
    "globals",
    "hasattr",
    "hash",
    "help",
    "hex",
    "id",
    "input",
    "int",
    "isinstance",
    "issubclass",
    "iter",
    "len",
    "list",
    "locals",
    "map",
    "max",
    "min",
    "next",
    "object",
    "open",
    "ord",
    "pow",
    "print",
    "range",
    "repr",
    "reversed",
    "round",
    "set",
    "setattr",
    "slice",
    "sorted",
    "str",
    "sum",
    "super",
    "tuple",
    "type",
    "vars",
    "zip",
    // Exceptions commonly raised in notebooks
    "Exception",
    "ValueError",
    "TypeError",
    "KeyError",
    "IndexError",
    "RuntimeError",
    "FileNotFoundError",
    // Notebook display helper
    "display",
    // Ubiquitous data-analysis aliases
    "np",
    "pd",
];

const DEFAULT_DATA_FILE_EXTENSIONS: &[&str] = &[
    "csv", "tsv", "pkl", "pickle", "parquet", "feather", "json", "xlsx", "xls", "h5", "hdf5",
    "npy", "npz", "txt",
];

/// Configuration for per-unit symbol analysis
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyzerConfig {
    /// Names filtered out of defined, used and external symbol sets
    pub builtins: BTreeSet<String>,

    /// Extensions (without dot) that mark a string literal as a data file path
    pub data_file_extensions: Vec<String>,

    /// Blank IPython line magics / shell escapes before parsing and skip cell magics
    pub strip_magics: bool,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            builtins: DEFAULT_BUILTINS.iter().map(|s| (*s).to_string()).collect(),
            data_file_extensions: DEFAULT_DATA_FILE_EXTENSIONS
                .iter()
                .map(|s| (*s).to_string())
                .collect(),
            strip_magics: true,
        }
    }
}

impl AnalyzerConfig {
    /// Builder: add extra allowlisted names
    #[must_use]
    pub fn with_builtins<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.builtins.extend(names.into_iter().map(Into::into));
        self
    }

    pub fn is_builtin(&self, name: &str) -> bool {
        self.builtins.contains(name)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        for ext in &self.data_file_extensions {
            if ext.is_empty() || !ext.chars().all(|c| c.is_ascii_alphanumeric()) {
                return Err(AnalyzerError::invalid_config(format!(
                    "data file extension must be non-empty and alphanumeric, got {ext:?}"
                )));
            }
        }
        Ok(())
    }
}
