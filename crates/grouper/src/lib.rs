//! # nb2prod Grouper
//!
//! Turns analysed notebook units into function candidates.
//!
//! ## Architecture
//!
//! ```text
//! SymbolFacts[] + DependencyGraph + NotebookStats
//!     │
//!     ├──> Educational gate (markdown ratio, tutorial variable reuse, coverage)
//!     │
//!     ├──> Seeding: one group per unit, categorised by rule table
//!     │
//!     ├──> Sequential merge (fold over adjacent groups)
//!     │
//!     └──> Per merged group
//!            ├─ Signature: parameters, returns, suggested name
//!            └─ Quality gates → candidate or rejected group
//! ```

mod config;
mod educational;
mod error;
mod grouper;
mod merge;
mod quality;
pub mod rules;
pub mod signature;

pub use config::{EducationalThresholds, GrouperConfig};
pub use educational::{educational_signals, is_educational};
pub use error::{GrouperError, Result};
pub use grouper::{CohesionGrouper, GroupingOutcome};
pub use signature::{synthesize, Signature};
