//! L2 dump messages and the request/reply channel contract for the VPP
//! dataplane.
//!
//! This crate describes the part of the dataplane API the L2 dump layer
//! consumes:
//!
//! - [`l2`]: raw `*_dump` requests and `*_details` replies
//! - [`channel`]: the [`VppChannel`] / [`MultiRequestContext`] contract
//! - [`error`]: [`ChannelError`], the failures a reply stream can report
//! - [`replay`]: [`ReplayChannel`], a deterministic channel serving a
//!   captured session
//!
//! Binary encoding of the messages and the connection to the dataplane
//! belong to the transport implementing [`VppChannel`].

pub mod channel;
pub mod error;
pub mod l2;
pub mod replay;

pub use channel::{
    DetailRecord, DumpKind, DumpRequest, Message, MultiReplyMessage, MultiRequestContext,
    VppChannel,
};
pub use error::{ChannelError, ChannelResult};
pub use l2::{
    BridgeDomainDetails, BridgeDomainDump, BridgeDomainSwIf, L2FibTableDetails, L2FibTableDump,
    L2XconnectDetails, L2XconnectDump, ALL_BRIDGE_DOMAINS, BD_TAG_LEN,
};
pub use replay::{CaptureError, ReplayCapture, ReplayChannel, ReplayStep};
