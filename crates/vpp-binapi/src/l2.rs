//! L2 dump request and detail messages.
//!
//! Field layout follows the dataplane's `l2` API: flags are raw `u8`
//! values, the bridge domain tag is a fixed, null padded byte array, and the
//! FIB MAC is six raw octets. Interpreting these values is left to the
//! caller.

use serde::{Deserialize, Serialize};

use crate::channel::{DetailRecord, Message, MultiReplyMessage};
use crate::error::{ChannelError, ChannelResult};

/// Bridge domain filter value meaning "every bridge domain".
pub const ALL_BRIDGE_DOMAINS: u32 = u32::MAX;

/// Maximum length of a bridge domain tag on the wire.
pub const BD_TAG_LEN: usize = 64;

/// Requests details of one bridge domain, or all of them with
/// [`ALL_BRIDGE_DOMAINS`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BridgeDomainDump {
    pub bd_id: u32,
}

impl BridgeDomainDump {
    pub const fn all() -> Self {
        Self {
            bd_id: ALL_BRIDGE_DOMAINS,
        }
    }
}

impl Message for BridgeDomainDump {
    const NAME: &'static str = "bridge_domain_dump";
}

/// A bridge domain member as carried inside [`BridgeDomainDetails`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BridgeDomainSwIf {
    #[serde(default)]
    pub context: u32,
    pub sw_if_index: u32,
    /// Split horizon group.
    #[serde(default)]
    pub shg: u8,
}

/// One bridge domain in a [`BridgeDomainDump`] reply stream.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BridgeDomainDetails {
    pub bd_id: u32,
    pub flood: u8,
    pub uu_flood: u8,
    pub forward: u8,
    pub learn: u8,
    pub arp_term: u8,
    pub mac_age: u8,
    pub bd_tag: Vec<u8>,
    pub bvi_sw_if_index: u32,
    pub n_sw_ifs: u32,
    pub sw_if_details: Vec<BridgeDomainSwIf>,
}

impl BridgeDomainDetails {
    /// Builds a details message with `tag` null padded to [`BD_TAG_LEN`].
    pub fn with_tag(bd_id: u32, tag: &str) -> Self {
        let mut bd_tag = tag.as_bytes().to_vec();
        bd_tag.resize(BD_TAG_LEN.max(bd_tag.len()), 0);
        Self {
            bd_id,
            bd_tag,
            ..Default::default()
        }
    }
}

impl Message for BridgeDomainDetails {
    const NAME: &'static str = "bridge_domain_details";
}

impl MultiReplyMessage for BridgeDomainDetails {
    fn from_record(record: DetailRecord) -> ChannelResult<Self> {
        match record {
            DetailRecord::BridgeDomain(details) => Ok(details),
            other => Err(ChannelError::unexpected_reply(Self::NAME, other.name())),
        }
    }
}

/// Requests the L2 FIB of one bridge domain, or of all of them with
/// [`ALL_BRIDGE_DOMAINS`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct L2FibTableDump {
    pub bd_id: u32,
}

impl L2FibTableDump {
    pub const fn all() -> Self {
        Self {
            bd_id: ALL_BRIDGE_DOMAINS,
        }
    }
}

impl Message for L2FibTableDump {
    const NAME: &'static str = "l2_fib_table_dump";
}

/// One L2 FIB entry in an [`L2FibTableDump`] reply stream.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct L2FibTableDetails {
    pub bd_id: u32,
    pub mac: [u8; 6],
    pub sw_if_index: u32,
    pub static_mac: u8,
    pub filter_mac: u8,
    pub bvi_mac: u8,
}

impl Message for L2FibTableDetails {
    const NAME: &'static str = "l2_fib_table_details";
}

impl MultiReplyMessage for L2FibTableDetails {
    fn from_record(record: DetailRecord) -> ChannelResult<Self> {
        match record {
            DetailRecord::L2Fib(details) => Ok(details),
            other => Err(ChannelError::unexpected_reply(Self::NAME, other.name())),
        }
    }
}

/// Requests every L2 cross-connect.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct L2XconnectDump {}

impl Message for L2XconnectDump {
    const NAME: &'static str = "l2_xconnect_dump";
}

/// One cross-connect in an [`L2XconnectDump`] reply stream.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct L2XconnectDetails {
    pub rx_sw_if_index: u32,
    pub tx_sw_if_index: u32,
}

impl Message for L2XconnectDetails {
    const NAME: &'static str = "l2_xconnect_details";
}

impl MultiReplyMessage for L2XconnectDetails {
    fn from_record(record: DetailRecord) -> ChannelResult<Self> {
        match record {
            DetailRecord::L2Xconnect(details) => Ok(details),
            other => Err(ChannelError::unexpected_reply(Self::NAME, other.name())),
        }
    }
}
