//! L2 FIB dumps.
//!
//! Entries are keyed by their MAC address rendered as lowercase,
//! colon separated hex. Two records with the same MAC collapse into one
//! entry and the later record wins.

use std::collections::HashSet;

use tracing::{debug, instrument};
use vpp_binapi::{ChannelError, L2FibTableDetails, L2FibTableDump, VppChannel};

use crate::bridge_domain::dump_bridge_domain_ids;
use crate::error::PartialDump;
use crate::model::{format_mac, FibTable, FibTableEntry};
use crate::stream::{drain_all, ReplyStream};
use crate::timing::{StopWatchEntry, TimeLog};

/// FIB table key for a raw hardware address.
pub fn fib_key(mac: &[u8]) -> String {
    format_mac(mac)
}

fn dump_fib<C>(channel: &C, request: L2FibTableDump) -> Result<FibTable, ChannelError>
where
    C: VppChannel + ?Sized,
{
    let stream = ReplyStream::<L2FibTableDetails>::send(channel, request);
    drain_all(stream, FibTable::new(), |fibs, details| {
        let entry = FibTableEntry::from(&details);
        debug!(
            mac = %entry.phys_address,
            bd_id = details.bd_id,
            action = ?entry.action,
            "FIB entry"
        );
        fibs.insert(entry.phys_address.clone(), entry);
    })
}

/// Dumps the L2 FIB entries of every bridge domain, keyed by MAC.
///
/// A channel error discards everything collected.
#[instrument(skip_all)]
pub fn dump_fib_table_entries<C>(
    channel: &C,
    time_log: Option<&dyn StopWatchEntry>,
) -> Result<FibTable, ChannelError>
where
    C: VppChannel + ?Sized,
{
    let _time_log = TimeLog::start(time_log);

    let fibs = dump_fib(channel, L2FibTableDump::all())?;
    debug!(count = fibs.len(), "Dumped FIB table entries");
    Ok(fibs)
}

/// Dumps the L2 FIB entries of a single bridge domain, keyed by MAC.
#[instrument(skip(channel, time_log))]
pub fn dump_fib_table_entries_in<C>(
    channel: &C,
    bd_id: u32,
    time_log: Option<&dyn StopWatchEntry>,
) -> Result<FibTable, ChannelError>
where
    C: VppChannel + ?Sized,
{
    let _time_log = TimeLog::start(time_log);

    let fibs = dump_fib(channel, L2FibTableDump { bd_id })?;
    debug!(count = fibs.len(), "Dumped FIB table entries");
    Ok(fibs)
}

/// Collects the FIB entries of every bridge domain, one domain at a time.
///
/// Walks the bridge domain ID listing, the implicit default domain included,
/// and merges each domain's FIB into one table. A domain listed twice is
/// dumped once. The first failure aborts the lookup, an incomplete ID
/// listing included.
#[instrument(skip_all)]
pub fn lookup_fib_entries<C>(
    channel: &C,
    time_log: Option<&dyn StopWatchEntry>,
) -> Result<FibTable, ChannelError>
where
    C: VppChannel + ?Sized,
{
    let _time_log = TimeLog::start(time_log);

    let bd_ids = dump_bridge_domain_ids(channel, None).map_err(PartialDump::discard)?;

    let mut seen = HashSet::with_capacity(bd_ids.len());
    let mut fibs = FibTable::new();
    for bd_id in bd_ids {
        if !seen.insert(bd_id) {
            continue;
        }
        fibs.extend(dump_fib(channel, L2FibTableDump { bd_id })?);
    }

    debug!(count = fibs.len(), "Looked up FIB entries");
    Ok(fibs)
}
