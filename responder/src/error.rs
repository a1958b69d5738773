//! Error taxonomy shared by every stage of request handling.
//!
//! Component errors keep their own `thiserror` enums; [`ErrorClass`] groups
//! them into the three failure categories that end up in logs.

use std::fmt;

/// Broad failure category of a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    /// Bad or missing client input
    MalformedRequest,
    /// Transport error or non-2xx status from an external API
    UpstreamFailure,
    /// External API answered with an unexpected body
    DecodeFailure,
}

impl ErrorClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorClass::MalformedRequest => "malformed_request",
            ErrorClass::UpstreamFailure => "upstream_failure",
            ErrorClass::DecodeFailure => "decode_failure",
        }
    }
}

impl fmt::Display for ErrorClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Implemented by errors that can be mapped to an [`ErrorClass`].
pub trait Classify {
    fn class(&self) -> ErrorClass;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_class_display() {
        assert_eq!(ErrorClass::MalformedRequest.to_string(), "malformed_request");
        assert_eq!(ErrorClass::UpstreamFailure.to_string(), "upstream_failure");
        assert_eq!(ErrorClass::DecodeFailure.to_string(), "decode_failure");
    }
}
