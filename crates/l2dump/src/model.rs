//! Northbound L2 records built from dataplane detail messages.
//!
//! Raw `u8` flags are turned into `bool` here, once, when a detail message is
//! converted. Nothing past this module looks at the raw values.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use vpp_binapi::{BridgeDomainDetails, L2FibTableDetails, L2XconnectDetails};

/// ID of the implicit bridge domain every unassigned interface belongs to.
pub const DEFAULT_BRIDGE_DOMAIN: u32 = 0;

/// Bridge domains keyed by bridge domain ID.
pub type BridgeDomains = HashMap<u32, BridgeDomain>;

/// L2 FIB entries keyed by MAC address string.
pub type FibTable = HashMap<String, FibTableEntry>;

/// Cross-connects keyed by receive interface index.
pub type XConnectPairs = HashMap<u32, XConnectPair>;

/// A bridge domain as configured in the dataplane.
///
/// Only whether ARP termination is enabled is known; the termination table
/// itself cannot be read back from the dataplane.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BridgeDomain {
    pub name: String,
    pub flood: bool,
    pub unknown_unicast_flood: bool,
    pub forward: bool,
    pub learn: bool,
    pub arp_termination: bool,
    pub mac_age: u32,
    pub interfaces: Vec<BridgeDomainInterface>,
}

/// Reference to an interface attached to a bridge domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BridgeDomainInterface {
    pub sw_if_index: u32,
}

/// What the dataplane does with frames to a FIB entry's MAC.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum FibAction {
    #[default]
    Forward,
    Drop,
}

impl FibAction {
    /// Classifies a raw filter flag: nonzero drops, zero forwards.
    pub fn from_filter_flag(filter_mac: u8) -> Self {
        if filter_mac > 0 {
            FibAction::Drop
        } else {
            FibAction::Forward
        }
    }
}

/// An L2 FIB entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FibTableEntry {
    pub bridge_domain_idx: u32,
    pub outgoing_interface_sw_if_idx: u32,
    pub phys_address: String,
    pub action: FibAction,
    pub static_config: bool,
    pub bridged_virtual_interface: bool,
}

/// An L2 cross-connect from a receive to a transmit interface.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct XConnectPair {
    pub receive_interface_sw_if_idx: u32,
    pub transmit_interface_sw_if_idx: u32,
}

fn flag(value: u8) -> bool {
    value > 0
}

/// Decodes a bridge domain tag, dropping every null byte.
///
/// Invalid UTF-8 is replaced rather than rejected.
pub fn decode_tag(raw: &[u8]) -> String {
    let bytes: Vec<u8> = raw.iter().copied().filter(|b| *b != 0).collect();
    String::from_utf8_lossy(&bytes).into_owned()
}

/// Formats hardware address bytes as lowercase, colon separated hex.
pub fn format_mac(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|b| format!("{b:02x}"))
        .collect::<Vec<_>>()
        .join(":")
}

impl From<&BridgeDomainDetails> for BridgeDomain {
    fn from(details: &BridgeDomainDetails) -> Self {
        Self {
            name: decode_tag(&details.bd_tag),
            flood: flag(details.flood),
            unknown_unicast_flood: flag(details.uu_flood),
            forward: flag(details.forward),
            learn: flag(details.learn),
            arp_termination: flag(details.arp_term),
            mac_age: u32::from(details.mac_age),
            interfaces: details
                .sw_if_details
                .iter()
                .map(|sw_if| BridgeDomainInterface {
                    sw_if_index: sw_if.sw_if_index,
                })
                .collect(),
        }
    }
}

impl From<&L2FibTableDetails> for FibTableEntry {
    fn from(details: &L2FibTableDetails) -> Self {
        Self {
            bridge_domain_idx: details.bd_id,
            outgoing_interface_sw_if_idx: details.sw_if_index,
            phys_address: format_mac(&details.mac),
            action: FibAction::from_filter_flag(details.filter_mac),
            static_config: flag(details.static_mac),
            bridged_virtual_interface: flag(details.bvi_mac),
        }
    }
}

impl From<&L2XconnectDetails> for XConnectPair {
    fn from(details: &L2XconnectDetails) -> Self {
        Self {
            receive_interface_sw_if_idx: details.rx_sw_if_index,
            transmit_interface_sw_if_idx: details.tx_sw_if_index,
        }
    }
}
