//! Request/reply channel contract.
//!
//! A [`VppChannel`] accepts a multi-reply request and hands back a
//! [`MultiRequestContext`] that yields detail records until the dataplane
//! signals the end of the stream. The context is forward-only and single use.

use serde::{Deserialize, Serialize};

use crate::error::ChannelResult;
use crate::l2::{
    BridgeDomainDetails, BridgeDomainDump, L2FibTableDetails, L2FibTableDump, L2XconnectDetails,
    L2XconnectDump,
};

/// A dataplane API message.
pub trait Message {
    /// Message name as registered with the dataplane.
    const NAME: &'static str;
}

/// A detail message that can be pulled out of a [`DetailRecord`].
pub trait MultiReplyMessage: Message + Sized {
    /// Extracts the typed message, failing if the record is of another kind.
    fn from_record(record: DetailRecord) -> ChannelResult<Self>;
}

/// The dump kinds this channel understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DumpKind {
    BridgeDomain,
    L2Fib,
    L2Xconnect,
}

impl DumpKind {
    /// Name of the request message for this kind.
    pub fn request_name(&self) -> &'static str {
        match self {
            DumpKind::BridgeDomain => BridgeDomainDump::NAME,
            DumpKind::L2Fib => L2FibTableDump::NAME,
            DumpKind::L2Xconnect => L2XconnectDump::NAME,
        }
    }
}

/// A multi-reply dump request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "request", rename_all = "snake_case")]
pub enum DumpRequest {
    BridgeDomain(BridgeDomainDump),
    L2Fib(L2FibTableDump),
    L2Xconnect(L2XconnectDump),
}

impl DumpRequest {
    pub fn kind(&self) -> DumpKind {
        match self {
            DumpRequest::BridgeDomain(_) => DumpKind::BridgeDomain,
            DumpRequest::L2Fib(_) => DumpKind::L2Fib,
            DumpRequest::L2Xconnect(_) => DumpKind::L2Xconnect,
        }
    }

    pub fn name(&self) -> &'static str {
        self.kind().request_name()
    }

    /// Bridge domain filter carried by the request, if the kind has one.
    pub fn bd_id(&self) -> Option<u32> {
        match self {
            DumpRequest::BridgeDomain(req) => Some(req.bd_id),
            DumpRequest::L2Fib(req) => Some(req.bd_id),
            DumpRequest::L2Xconnect(_) => None,
        }
    }
}

impl From<BridgeDomainDump> for DumpRequest {
    fn from(req: BridgeDomainDump) -> Self {
        DumpRequest::BridgeDomain(req)
    }
}

impl From<L2FibTableDump> for DumpRequest {
    fn from(req: L2FibTableDump) -> Self {
        DumpRequest::L2Fib(req)
    }
}

impl From<L2XconnectDump> for DumpRequest {
    fn from(req: L2XconnectDump) -> Self {
        DumpRequest::L2Xconnect(req)
    }
}

/// One element of a dump reply stream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "record", rename_all = "snake_case")]
pub enum DetailRecord {
    BridgeDomain(BridgeDomainDetails),
    L2Fib(L2FibTableDetails),
    L2Xconnect(L2XconnectDetails),
}

impl DetailRecord {
    pub fn kind(&self) -> DumpKind {
        match self {
            DetailRecord::BridgeDomain(_) => DumpKind::BridgeDomain,
            DetailRecord::L2Fib(_) => DumpKind::L2Fib,
            DetailRecord::L2Xconnect(_) => DumpKind::L2Xconnect,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            DetailRecord::BridgeDomain(_) => BridgeDomainDetails::NAME,
            DetailRecord::L2Fib(_) => L2FibTableDetails::NAME,
            DetailRecord::L2Xconnect(_) => L2XconnectDetails::NAME,
        }
    }

    /// Bridge domain the record belongs to, if the kind has one.
    pub fn bd_id(&self) -> Option<u32> {
        match self {
            DetailRecord::BridgeDomain(details) => Some(details.bd_id),
            DetailRecord::L2Fib(details) => Some(details.bd_id),
            DetailRecord::L2Xconnect(_) => None,
        }
    }
}

impl From<BridgeDomainDetails> for DetailRecord {
    fn from(details: BridgeDomainDetails) -> Self {
        DetailRecord::BridgeDomain(details)
    }
}

impl From<L2FibTableDetails> for DetailRecord {
    fn from(details: L2FibTableDetails) -> Self {
        DetailRecord::L2Fib(details)
    }
}

impl From<L2XconnectDetails> for DetailRecord {
    fn from(details: L2XconnectDetails) -> Self {
        DetailRecord::L2Xconnect(details)
    }
}

/// An outstanding multi-reply request.
pub trait MultiRequestContext {
    /// Receives the next detail record.
    ///
    /// Returns `Ok(None)` once the dataplane has signalled the end of the
    /// stream. Blocks until a reply, the end marker or an error arrives; any
    /// timeout belongs to the implementation.
    fn receive_reply(&mut self) -> ChannelResult<Option<DetailRecord>>;
}

/// A request/reply channel to the dataplane.
///
/// Takes `&self` so several request contexts may be outstanding at once when
/// the implementation supports it.
pub trait VppChannel {
    /// Sends a multi-reply request and returns its reply context.
    fn send_multi_request(&self, request: DumpRequest) -> Box<dyn MultiRequestContext + '_>;
}
