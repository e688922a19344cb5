//! Domain error types.
//!
//! These errors represent invariant violations when building domain values
//! from externally-owned data. They are distinct from request and IO errors.

/// Domain-level errors for validation and data consistency.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DomainError {
    /// Two stops of one route share the same passage position
    #[error("duplicate position {0} in route")]
    DuplicatePosition(u32),

    /// Positions start at 1
    #[error("invalid position {0}: positions start at 1")]
    InvalidPosition(u32),

    /// Direction label not recognised
    #[error("unknown route direction: {0}")]
    UnknownDirection(String),
}
