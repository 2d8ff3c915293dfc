//! Outcome taxonomy for lead verification
//!
//! Every failure a verification run can produce — local validation, the voice
//! provider, or the downstream lead receiver — is mapped onto exactly one of
//! these variants before it reaches the caller. The display text is the wire
//! text: callers receive `{"outcome": "<text>"}` with `status_code()` as the
//! HTTP status.

use thiserror::Error;

/// Common result type for callcheck operations
pub type Result<T> = std::result::Result<T, Error>;

/// Closed set of caller-visible verification outcomes
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Request is missing the destination number or the authorization token
    #[error("Please provide valid input.")]
    InvalidInput,

    /// Unclassified server-side failure
    #[error("Internal server error!")]
    Internal,

    /// No route matches the request path
    #[error("Page not found")]
    RouteNotFound,

    /// Request body could not be deserialized
    #[error("JSON request could not be parsed")]
    MalformedBody,

    /// Voice provider rejected the lead (dial failure, undelivered call,
    /// or answering-machine pickup)
    #[error("Lead Failed - AMD")]
    LeadFailed,

    /// Downstream lead receiver did not accept the lead
    #[error("Lead Failed - Client")]
    LeadFailedClient,
}

impl Error {
    /// Numeric class returned to the caller as the HTTP status
    pub fn status_code(&self) -> u16 {
        match self {
            Error::InvalidInput => 400,
            Error::Internal => 500,
            Error::RouteNotFound => 404,
            Error::MalformedBody => 400,
            Error::LeadFailed => 400,
            Error::LeadFailedClient => 400,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(Error::InvalidInput.status_code(), 400);
        assert_eq!(Error::Internal.status_code(), 500);
        assert_eq!(Error::RouteNotFound.status_code(), 404);
        assert_eq!(Error::MalformedBody.status_code(), 400);
        assert_eq!(Error::LeadFailed.status_code(), 400);
        assert_eq!(Error::LeadFailedClient.status_code(), 400);
    }

    #[test]
    fn test_wire_text() {
        assert_eq!(Error::InvalidInput.to_string(), "Please provide valid input.");
        assert_eq!(Error::LeadFailed.to_string(), "Lead Failed - AMD");
        assert_eq!(Error::LeadFailedClient.to_string(), "Lead Failed - Client");
    }
}
