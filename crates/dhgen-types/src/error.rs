/// Big-number arithmetic and prime-generation errors.
#[derive(Debug, thiserror::Error)]
pub enum BignumError {
    #[error("big number: division by zero")]
    DivisionByZero,
    #[error("big number: base {0} outside the supported range 2-16")]
    InvalidBase(u32),
    #[error("big number: entropy source failed")]
    EntropyFailure,
    #[error("prime construction: candidate budget exhausted")]
    ConstructionExhausted,
}

/// Prime cache and proof log errors.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("file {0} not found")]
    FileNotFound(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("number error: {0}")]
    Number(#[from] BignumError),
}

/// Errors surfaced by the prime constructor, which touches both the
/// arithmetic core and the file repositories.
#[derive(Debug, thiserror::Error)]
pub enum GenError {
    #[error("number error: {0}")]
    Number(#[from] BignumError),
    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

/// Encoding utility errors.
#[derive(Debug, thiserror::Error)]
pub enum UtilError {
    #[error("invalid base64 input")]
    InvalidBase64,
}
