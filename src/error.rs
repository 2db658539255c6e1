use thiserror::Error;

/// Column permutation validation failures.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PermutationError {
    #[error("permutation is empty")]
    Empty,

    #[error("permutation element '{value}' is not an integer")]
    NonInteger { value: String },

    #[error("permutation min element is {min}, expected 0")]
    MinNotZero { min: usize },

    #[error("permutation max element is {max}, expected {expected} (columns - 1)")]
    MaxMismatch { max: usize, expected: usize },

    #[error("permutation length {len} differs from {columns} columns in table")]
    LengthMismatch { len: usize, columns: usize },

    #[error("permutation element {value} appears more than once")]
    Duplicate { value: usize },
}

#[derive(Error, Debug)]
pub enum PortfolioError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("workbook error: {0}")]
    Workbook(#[from] calamine::Error),

    #[error("unsupported input '{path}': expected a directory of CSV sheets or a workbook file")]
    UnsupportedInput { path: String },

    /// Table missing from the input source.
    #[error("table '{name}' not found in source, available: [{available:?}]")]
    MissingTable { name: String, available: Vec<String> },

    #[error("table '{table}' has no column '{column}'")]
    MissingColumn { table: String, column: String },

    #[error("table '{table}' row {row}: cannot parse date '{value}'")]
    DateParse {
        table: String,
        row: usize,
        value: String,
    },

    #[error("table '{table}' row {row}: cannot parse {column} value '{value}'")]
    ValueParse {
        table: String,
        row: usize,
        column: String,
        value: String,
    },

    #[error("invalid parameter '{name}' = '{value}': {reason}")]
    InvalidParameter {
        name: String,
        value: String,
        reason: String,
    },

    #[error("invalid column permutation: {0}")]
    Permutation(#[from] PermutationError),

    /// Rows must be sorted by date before day boundaries are detected.
    #[error("rows are not sorted by date at position {position}")]
    Unsorted { position: usize },

    #[error("window index {window_idx} at position {position} breaks the contiguous 0-based sequence")]
    NonContiguousWindows { position: usize, window_idx: usize },

    #[error("row position {position} out of range for table of {len} rows")]
    IndexOutOfRange { position: usize, len: usize },
}

pub type Result<T> = std::result::Result<T, PortfolioError>;
