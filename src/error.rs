use thiserror::Error;

/// The primary error type for the `rationale` crate.
#[derive(Debug, Error)]
pub enum ExprError {
    /// An operator was applied to value variants it does not support.
    #[error("type error: {0}")]
    Type(String),
    /// Division with a zero divisor.
    #[error("division by zero")]
    DivisionByZero,
    /// A lookup key had no matching table entry.
    #[error("key not found: {0}")]
    KeyNotFound(String),
    /// The conditional grammar was violated (for example a non-boolean
    /// condition). Most violations are unrepresentable in the typed
    /// builder chain and never reach this variant.
    #[error("builder state error: {0}")]
    BuilderState(String),
    /// A malformed operand list (for example an empty lookup table).
    #[error("argument error: {0}")]
    Argument(String),
    /// Reconstruction input was malformed: duplicate ids, missing or
    /// multiple roots, dangling parents, cycles, or child-index gaps.
    #[error("integrity error: {0}")]
    Integrity(String),
    /// An error surfaced by a persistence collaborator, propagated
    /// unchanged as the source.
    #[error("storage error: {0}")]
    Storage(#[source] Box<dyn std::error::Error + Send + Sync>),
}
