//! Error types

use thiserror::Error;

/// Errors raised while preparing or dispatching a commit
///
/// None of these cross the `commit` boundary; they are rendered into
/// callback messages or traced out-of-band.
#[derive(Debug, Error)]
pub enum Error {
    /// POST/PUT commit dispatched without a body
    #[error("missing body")]
    MissingBody,
    /// Expired-token response received but the callback exposes no token store
    #[error("token refresh unsupported: callback has no token store")]
    RefreshUnsupported,
    /// Refresh call succeeded but its payload carried no access token
    #[error("refresh response missing accessToken")]
    RefreshPayload,
    /// The request could not be constructed; nothing was sent
    #[error("request not sent: {0}")]
    Request(String),
    /// The request was sent but no response arrived
    #[error("no response: {0}")]
    NoResponse(String),
    /// A response body could not be read or decoded
    #[error("decode error: {0}")]
    Decode(String),
    /// Client build error
    #[error("client build error: {0}")]
    Build(String),
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() || err.is_connect() {
            Error::NoResponse(err.to_string())
        } else if err.is_builder() {
            Error::Request(err.to_string())
        } else if err.is_decode() || err.is_body() {
            Error::Decode(err.to_string())
        } else {
            Error::NoResponse(err.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_body_display() {
        assert_eq!(format!("{}", Error::MissingBody), "missing body");
    }

    #[test]
    fn refresh_unsupported_display() {
        assert_eq!(
            format!("{}", Error::RefreshUnsupported),
            "token refresh unsupported: callback has no token store"
        );
    }

    #[test]
    fn request_display() {
        let error = Error::Request("invalid url".to_string());
        assert_eq!(format!("{}", error), "request not sent: invalid url");
    }

    #[test]
    fn no_response_display() {
        let error = Error::NoResponse("connection refused".to_string());
        assert_eq!(format!("{}", error), "no response: connection refused");
    }

    #[test]
    fn decode_display() {
        let error = Error::Decode("invalid JSON".to_string());
        assert_eq!(format!("{}", error), "decode error: invalid JSON");
    }

    #[test]
    fn build_display() {
        let error = Error::Build("bad proxy".to_string());
        assert_eq!(format!("{}", error), "client build error: bad proxy");
    }
}
