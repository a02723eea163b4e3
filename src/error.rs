use std::fmt;

/// Crate-wide result alias, following the convention of returning a
/// concrete error enum rather than boxed/dynamic errors.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors produced by the storage engine.
///
/// Expected/validation-level conditions (bad action arguments, empty
/// undo stacks, out-of-range positions) are never represented here —
/// the reducer treats those as no-ops per the error handling design.
/// Only internal invariant violations reach this type, plus the
/// handful of conversion failures the read surface can hit.
#[derive(Debug, PartialEq)]
pub enum Error {
    /// A red-black tree invariant (coloring or aggregate) was found to
    /// be broken. Carries a human-readable description of which one.
    Invariant(String),
    /// An aggregate recorded on a node did not match the recomputed
    /// value from its children during validation.
    AggregateMismatch(String),
    /// A byte or char offset fell outside the bounds of the buffer or
    /// line it was checked against.
    OutOfBounds(String),
    /// A numeric conversion between position types failed.
    FailConversion(String),
    /// UTF-8 decoding of document bytes failed.
    DecodeFail(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Invariant(s) => write!(f, "invariant violated: {}", s),
            Error::AggregateMismatch(s) => write!(f, "aggregate mismatch: {}", s),
            Error::OutOfBounds(s) => write!(f, "out of bounds: {}", s),
            Error::FailConversion(s) => write!(f, "conversion failed: {}", s),
            Error::DecodeFail(s) => write!(f, "decode failed: {}", s),
        }
    }
}

impl std::error::Error for Error {}
