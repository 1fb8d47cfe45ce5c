use thiserror::Error;

pub type Result<T> = std::result::Result<T, GraphError>;

#[derive(Error, Debug)]
pub enum GraphError {
    #[error("Unit not found: {0}")]
    UnitNotFound(usize),

    #[error("Duplicate unit index: {0}")]
    DuplicateUnit(usize),
}
