//! Error types for the L2 dump layer.
//!
//! Enumerators return the [`ChannelError`] reported by the reply stream
//! unchanged. The bridge domain ID listing is the one exception: it hands
//! back what it collected before the failure inside a [`PartialDump`].

use thiserror::Error;
use vpp_binapi::{CaptureError, ChannelError};

/// A dump that stopped on a channel error, with everything folded so far.
#[derive(Debug, Error)]
#[error("dump interrupted after {received} records: {source}")]
pub struct PartialDump<T> {
    /// Result accumulated before the failure; may be incomplete.
    pub partial: T,
    /// Number of detail records received before the failure.
    pub received: usize,
    /// The error reported by the reply stream.
    #[source]
    pub source: ChannelError,
}

impl<T> PartialDump<T> {
    /// Drops the partial result and keeps the channel error.
    pub fn discard(self) -> ChannelError {
        self.source
    }

    pub fn into_parts(self) -> (T, ChannelError) {
        (self.partial, self.source)
    }
}

/// Result type alias for configuration and CLI operations.
pub type Result<T> = std::result::Result<T, L2DumpError>;

/// Errors outside the dump path itself.
#[derive(Debug, Error)]
pub enum L2DumpError {
    /// Configuration could not be parsed or failed validation.
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Report serialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A reply stream failed.
    #[error(transparent)]
    Channel(#[from] ChannelError),

    /// A replay capture could not be loaded.
    #[error(transparent)]
    Capture(#[from] CaptureError),
}

impl<T> From<PartialDump<T>> for L2DumpError {
    fn from(err: PartialDump<T>) -> Self {
        L2DumpError::Channel(err.source)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::error::Error as _;

    #[test]
    fn test_partial_dump_keeps_source() {
        let err = PartialDump {
            partial: vec![0u32, 4],
            received: 1,
            source: ChannelError::Disconnected,
        };
        assert_eq!(
            err.to_string(),
            "dump interrupted after 1 records: channel disconnected"
        );
        assert!(err.source().is_some());

        let (ids, source) = err.into_parts();
        assert_eq!(ids, vec![0, 4]);
        assert_eq!(source, ChannelError::Disconnected);
    }

    #[test]
    fn test_partial_dump_into_outer_error() {
        let err = PartialDump {
            partial: (),
            received: 0,
            source: ChannelError::retval("bridge_domain_dump", -3),
        };
        let outer: L2DumpError = err.into();
        assert_eq!(outer.to_string(), "bridge_domain_dump returned -3");
    }
}
