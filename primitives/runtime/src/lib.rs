#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::unwrap_used)]

//! Runtime support for wrapgen-generated code.
//!
//! Generated wrapper files reference this crate by name for the conversion
//! error type shared by every `import`/`export` pair and by the service
//! client wrappers. Nothing in the compiler itself depends on this crate;
//! it ships alongside the generated output.

use thiserror::Error;

/// Error produced by generated `import`/`export` conversion functions and
/// wrapped service calls.
#[derive(Debug, Error)]
pub enum ConvertError {
    /// A field value could not be converted between representations.
    #[error("invalid field value: {0}")]
    InvalidValue(String),
    /// A wrapped RPC call failed; carries the transport's status text.
    #[error("rpc failed: {0}")]
    Rpc(String),
    /// Generic message-based error.
    #[error("{0}")]
    Message(String),
}

impl ConvertError {
    /// Build a [`ConvertError::InvalidValue`] from anything displayable.
    pub fn invalid<T: std::fmt::Display>(value: T) -> Self {
        ConvertError::InvalidValue(value.to_string())
    }

    /// Build a [`ConvertError::Rpc`] from anything displayable. Generated
    /// service wrappers use this to fold transport status types into the
    /// conversion error without a dependency on the transport crate.
    pub fn rpc<T: std::fmt::Display>(status: T) -> Self { ConvertError::Rpc(status.to_string()) }
}

impl From<String> for ConvertError {
    fn from(msg: String) -> Self { ConvertError::Message(msg) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ConvertError::invalid("bad uuid literal");
        assert_eq!(err.to_string(), "invalid field value: bad uuid literal");

        let err = ConvertError::rpc("status: NotFound");
        assert_eq!(err.to_string(), "rpc failed: status: NotFound");
    }
}
