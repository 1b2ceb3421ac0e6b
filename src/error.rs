use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Failures raised while building a grid.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GridError {
    #[error("grid size must be positive, got {size}")]
    InvalidDimension { size: usize },
    #[error("grid size {size} is too large")]
    TooLarge { size: usize },
    #[error("pattern row {row} has {len} cells, expected {expected}")]
    NotSquare { row: usize, len: usize, expected: usize },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("unknown option `{0}`")]
    UnknownFlag(String),
    #[error("option `{0}` needs a value")]
    MissingValue(String),
    #[error("invalid value `{value}` for `{flag}`")]
    InvalidValue { flag: String, value: String },
}

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Grid(#[from] GridError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("terminal i/o: {0}")]
    Io(#[from] std::io::Error),
}
