use thiserror::Error;

/// Failures raised by the formula engine.
///
/// Everything here is caught at the evaluator boundary and rendered as an
/// `#ERROR: <message>` cell value; nothing escapes to the caller as a fault.
/// Out-of-grid reads are deliberately not errors; they resolve to empty
/// strings during argument resolution.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A reference token does not decode to a valid row/column, or a
    /// translated reference left the encodable A1..Z range.
    #[error("Invalid cell reference: {0}")]
    InvalidAddress(String),

    /// Formula text is not a single recognizable `NAME(ARGS)` call.
    #[error("Invalid formula format")]
    MalformedFormula,

    /// The parsed function name has no entry in the function registry.
    #[error("Unknown function: {0}")]
    UnknownFunction(String),
}

pub type DomainResult<T> = Result<T, DomainError>;
