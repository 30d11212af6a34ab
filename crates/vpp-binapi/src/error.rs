//! Channel error types.
//!
//! Every failure a request/reply channel can report while a dump is being
//! drained. Callers of the dump layer do not distinguish between these; they
//! are logged once and propagated unchanged.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for channel operations.
pub type ChannelResult<T> = Result<T, ChannelError>;

/// Errors reported by a [`MultiRequestContext`](crate::MultiRequestContext).
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ChannelError {
    /// The dataplane rejected the request with a nonzero return value.
    #[error("{message} returned {retval}")]
    Retval {
        /// Name of the request message.
        message: String,
        /// Raw return value.
        retval: i32,
    },

    /// A reply could not be decoded.
    #[error("failed to decode {message}: {reason}")]
    Decode {
        /// Name of the reply message.
        message: String,
        /// Decoder error text.
        reason: String,
    },

    /// The channel delivered a reply of a different kind than requested.
    #[error("unexpected reply: expected {expected}, received {received}")]
    UnexpectedReply {
        /// Expected reply message name.
        expected: String,
        /// Received reply message name.
        received: String,
    },

    /// No reply arrived within the transport's timeout.
    #[error("timed out waiting for reply to {message}")]
    ReplyTimeout {
        /// Name of the request message.
        message: String,
    },

    /// The connection to the dataplane is gone.
    #[error("channel disconnected")]
    Disconnected,
}

impl ChannelError {
    /// Creates a return value error.
    pub fn retval(message: impl Into<String>, retval: i32) -> Self {
        Self::Retval {
            message: message.into(),
            retval,
        }
    }

    /// Creates a decode error.
    pub fn decode(message: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Decode {
            message: message.into(),
            reason: reason.into(),
        }
    }

    /// Creates an unexpected reply error.
    pub fn unexpected_reply(expected: impl Into<String>, received: impl Into<String>) -> Self {
        Self::UnexpectedReply {
            expected: expected.into(),
            received: received.into(),
        }
    }
}
