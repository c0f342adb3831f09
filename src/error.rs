use thiserror::Error;

#[derive(Error, Debug)]
pub enum LatticeError {
    #[error("Invalid Argument: {0}")]
    InvalidArgument(String),

    #[error("Invalid Layout: row lengths sum to {actual}, declared key count is {expected}")]
    InvalidLayout { expected: usize, actual: usize },

    #[error(
        "Out Of Range: board {board}, key {key} (boards: {num_boards}, keys per board: {board_size})"
    )]
    OutOfRange {
        board: u8,
        key: u8,
        num_boards: u8,
        board_size: usize,
    },

    #[error("IO Error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV Error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON Parsing Error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration Error: {0}")]
    Config(String),

    #[error("Lock Poisoned: {0}")]
    Poisoned(String),
}

pub type LatticeResult<T> = Result<T, LatticeError>;
