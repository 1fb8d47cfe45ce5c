//! # Notebook Pipeline
//!
//! End-to-end analysis of a Jupyter notebook: load, analyze each code unit,
//! resolve dependencies, group into function candidates and explain the result.
//!
//! ## Architecture
//!
//! ```text
//! .ipynb ──> Notebook (units + stats)
//!              │
//!              ├─> analyze_units ──> SymbolFacts per code unit
//!              │
//!              ├─> GraphBuilder ──> DependencyGraph
//!              │
//!              ├─> CohesionGrouper ──> candidates / rejected groups
//!              │
//!              └─> NotebookAnalysis
//!                    ├─ cell reports
//!                    ├─ issues
//!                    └─ no-candidate reasons
//! ```
//!
//! ## Example
//!
//! ```no_run
//! use nb2prod_pipeline::{Notebook, NotebookPipeline, PipelineConfig};
//! use std::path::Path;
//!
//! # fn main() -> nb2prod_pipeline::Result<()> {
//! let notebook = Notebook::from_path(Path::new("analysis.ipynb"))?;
//! let pipeline = NotebookPipeline::new(PipelineConfig::default())?;
//! let analysis = pipeline.run_notebook(&notebook)?;
//! println!("{} candidates", analysis.candidates.len());
//! # Ok(())
//! # }
//! ```

pub mod codegen;
mod config;
mod error;
mod explain;
mod issues;
mod notebook;
mod pipeline;

pub use codegen::{render_function, render_module};
pub use config::PipelineConfig;
pub use error::{PipelineError, Result};
pub use notebook::Notebook;
pub use pipeline::NotebookPipeline;
