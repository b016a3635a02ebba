use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConversionError {
    #[error("Unknown unit: {0}")]
    UnknownUnit(String),

    #[error("Cannot convert between weight and volume units")]
    DimensionMismatch { from: String, to: String },

    #[error("Amount must be a finite, non-negative number (got {0})")]
    InvalidAmount(f64),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{0} is required")]
    MissingField(&'static str),

    #[error("{field} must be between {min} and {max}")]
    OutOfRange {
        field: &'static str,
        min: u32,
        max: u32,
    },

    #[error("Ingredient {index}: {reason}")]
    InvalidIngredient { index: usize, reason: String },

    #[error("{field} is too large. Maximum size is {max_bytes} bytes")]
    TooLarge {
        field: &'static str,
        max_bytes: usize,
    },
}

/// Errors reported by the hosted backend or the transport reaching it.
#[derive(Error, Debug)]
pub enum BackendError {
    #[error("Backend request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Non-success response. The body is kept verbatim for display.
    #[error("Backend returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Not authenticated")]
    Unauthenticated,

    #[error("{kind} not found: {id}")]
    NotFound { kind: &'static str, id: String },

    #[error("Invalid backend document: {0}")]
    Decode(#[from] serde_json::Error),
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Conversion(#[from] ConversionError),

    #[error(transparent)]
    Backend(#[from] BackendError),

    #[error("Only the owner can change this {0}")]
    Forbidden(&'static str),
}

impl AppError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, AppError::Backend(BackendError::NotFound { .. }))
    }
}

pub type AppResult<T> = Result<T, AppError>;
