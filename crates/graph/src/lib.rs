//! # nb2prod Graph
//!
//! Cross-unit dependency resolution over notebook units.
//!
//! ## Architecture
//!
//! ```text
//! SymbolFacts[]
//!     │
//!     ├──> Resolver (per unit, in index order)
//!     │      ├─ Scan earlier units nearest-first
//!     │      ├─ Scan later units in order (execution-order violations)
//!     │      └─ Keep the rest as unattributed
//!     │
//!     └──> Dependency Graph (petgraph)
//!            ├─ Nodes: units
//!            └─ Edges: consumer -> supplier with shared symbols
//! ```

mod builder;
mod error;
mod graph;
mod resolver;
mod types;

pub use builder::GraphBuilder;
pub use error::{GraphError, Result};
pub use graph::DependencyGraph;
pub use resolver::resolve_dependencies;
pub use types::{ResolvedUnit, UnitNode};
