//! Driver error types.

use std::io;

/// Result type for driver operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised by the driver.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Invalid arguments: unknown tunable, unsupported format or direction,
    /// bad channel selection, malformed connection string.
    #[error("configuration error: {0}")]
    Config(String),

    /// TCP connect failure during stream activation. Carries the target
    /// address so retrying callers know what they were dialing.
    #[error("connection to {addr} failed: {source}")]
    Connection {
        addr: String,
        source: io::Error,
    },

    /// Wire contract violation: a command frame that could not be sent in
    /// full, or an exact-size receive that could not be filled. Fatal to
    /// the stream session; recover by deactivating and reactivating.
    #[error("protocol error: {0}")]
    Protocol(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connection_error_names_target() {
        let err = Error::Connection {
            addr: "192.168.1.100:1001".to_string(),
            source: io::Error::new(io::ErrorKind::ConnectionRefused, "refused"),
        };
        assert!(err.to_string().contains("192.168.1.100:1001"));
    }

    #[test]
    fn test_connection_error_source() {
        let err = Error::Connection {
            addr: "10.0.0.1:1001".to_string(),
            source: io::Error::new(io::ErrorKind::TimedOut, "timed out"),
        };
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_protocol_error_display() {
        let err = Error::Protocol("incomplete frame".to_string());
        assert_eq!(err.to_string(), "protocol error: incomplete frame");
    }
}
