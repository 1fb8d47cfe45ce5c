use crate::error::{PipelineError, Result};
use nb2prod_protocol::{CodeUnit, NotebookStats, UnitKind};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Notebook split into indexed units
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notebook {
    pub path: Option<PathBuf>,
    pub units: Vec<CodeUnit>,
    pub stats: NotebookStats,
}

#[derive(Deserialize)]
struct RawNotebook {
    cells: Vec<RawCell>,
    #[serde(default)]
    nbformat: Option<u32>,
}

#[derive(Deserialize)]
struct RawCell {
    cell_type: String,
    #[serde(default)]
    source: CellSource,
}

/// nbformat stores `source` either as one string or as a list of lines
#[derive(Deserialize)]
#[serde(untagged)]
enum CellSource {
    Text(String),
    Lines(Vec<String>),
}

impl Default for CellSource {
    fn default() -> Self {
        Self::Text(String::new())
    }
}

impl CellSource {
    fn into_text(self) -> String {
        match self {
            Self::Text(text) => text,
            Self::Lines(lines) => lines.concat(),
        }
    }
}

impl Notebook {
    /// Read an `.ipynb` file
    pub fn from_path(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(PipelineError::NotebookNotFound(path.to_path_buf()));
        }
        let text = std::fs::read_to_string(path)?;
        let mut notebook = Self::parse(&text, &path.display().to_string())?;
        notebook.path = Some(path.to_path_buf());
        Ok(notebook)
    }

    /// Parse notebook JSON held in memory
    pub fn from_json_str(text: &str) -> Result<Self> {
        Self::parse(text, "<memory>")
    }

    fn parse(text: &str, origin: &str) -> Result<Self> {
        let raw: RawNotebook = serde_json::from_str(text)
            .map_err(|e| PipelineError::invalid_notebook(origin, e.to_string()))?;

        if let Some(version) = raw.nbformat {
            if version < 4 {
                return Err(PipelineError::invalid_notebook(
                    origin,
                    format!("nbformat {version} is not supported, expected 4"),
                ));
            }
        }

        let units: Vec<CodeUnit> = raw
            .cells
            .into_iter()
            .enumerate()
            .map(|(index, cell)| {
                CodeUnit::new(
                    index,
                    UnitKind::from_cell_type(&cell.cell_type),
                    cell.source.into_text(),
                )
            })
            .collect();
        let stats = NotebookStats::from_units(&units);

        log::debug!(
            "Loaded {origin}: {} units ({} code, {} markdown)",
            stats.total_units,
            stats.code_units,
            stats.markdown_units
        );

        Ok(Self {
            path: None,
            units,
            stats,
        })
    }

    /// Code units with non-blank source, in order
    pub fn analyzable_units(&self) -> impl Iterator<Item = &CodeUnit> {
        self.units.iter().filter(|unit| unit.is_analyzable())
    }
}
