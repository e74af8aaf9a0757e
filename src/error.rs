use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TapeError {
    /// The image is smaller than the 32 byte header.
    #[error("k7 image too short: {len} bytes, at least {min} needed")]
    InputTooShort { len: usize, min: usize },
    /// The fixed allocation formula did not leave room for the whole signal.
    /// This is a bug in the formula, not in the input.
    #[error("tape buffer capacity exceeded ({capacity} values)")]
    CapacityExceeded { capacity: usize },
    #[error("malformed tape signal at value {position}: {reason}")]
    Malformed { position: usize, reason: &'static str },
}

pub type Result<T> = std::result::Result<T, TapeError>;
