use thiserror::Error;

/// Invalid construction parameters for one of the sketches.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigurationError {
    #[error("size must be > 0")]
    InvalidSize,
    #[error("num_hashes must be > 0")]
    InvalidNumHashes,
    #[error("precision must be in the range [{min}, {max}], got {precision}")]
    PrecisionOutOfRange { precision: u8, min: u8, max: u8 },
    #[error("probability must be in the range (0, 1), got {0}")]
    InvalidProbability(f64),
    #[error("num_items must be > 0")]
    InvalidNumItems,
    #[error("epsilon must be in the range (0, 1), got {0}")]
    InvalidError(f64),
}

/// Rejected collaborator input. Never produced by the sketches themselves.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidInputError {
    #[error("input is empty or whitespace")]
    Empty,
}
