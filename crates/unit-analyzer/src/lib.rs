//! # nb2prod Unit Analyzer
//!
//! Symbol analysis of single notebook units on top of tree-sitter-python.
//!
//! ## Philosophy
//!
//! Each unit is analyzed in isolation and the analysis never fails:
//! - Units that are blank, not code, cell magics or syntactically broken yield empty facts
//! - Reads and binds are tracked in statement order, so `x = x + 1` reads an external `x`
//! - Function, class, lambda and comprehension bodies only contribute their free names
//! - Built-in names and the `np` / `pd` aliases never count as symbols
//!
//! ## Architecture
//!
//! ```text
//! CodeUnit
//!     │
//!     ├──> Magic stripping (%%cell → empty, %line / !shell → blank line)
//!     │
//!     ├──> Tree-sitter Parsing → AST (errors → empty facts)
//!     │
//!     ├──> Scope seeding
//!     │    ├─> Import bindings (module level and compound statements)
//!     │    └─> Top-level function / class definitions
//!     │
//!     └──> Statement walk
//!          ├─> Ordered Read / Bind events per statement
//!          ├─> Running scope stack → external references
//!          └─> String literals that look like paths → hardcoded literals
//! ```
//!
//! ## Example
//!
//! ```rust
//! use nb2prod_protocol::CodeUnit;
//! use nb2prod_unit_analyzer::{AnalyzerConfig, UnitAnalyzer};
//!
//! let mut analyzer = UnitAnalyzer::new(AnalyzerConfig::default()).unwrap();
//! let facts = analyzer.analyze(&CodeUnit::code(3, "model = fit(df)"));
//!
//! assert!(facts.defined_names.contains("model"));
//! assert!(facts.external_references.contains("df"));
//! ```

mod access;
mod ast_analyzer;
mod batch;
mod config;
mod error;
mod literals;
mod magics;
mod scope;
mod types;

pub use ast_analyzer::UnitAnalyzer;
pub use batch::analyze_units;
pub use config::AnalyzerConfig;
pub use error::{AnalyzerError, Result};
pub use magics::magic_lines;
pub use types::{HardcodedLiteral, ScopeEntry, SymbolFacts};
