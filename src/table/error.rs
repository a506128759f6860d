use thiserror::Error;

#[derive(Debug, Error)]
pub enum TableError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("missing value for {0}")]
    MissingValue(&'static str),
    #[error("invalid number for {field}: {value:?}")]
    InvalidNumber { field: &'static str, value: String },
    #[error("unexpected extra value: {0:?}")]
    ExtraValue(String),
    #[error("line {line}: expected {expected} columns, found {found}")]
    ColumnCount {
        line: usize,
        expected: usize,
        found: usize,
    },
    #[error("table has no header line")]
    MissingHeader,
}
