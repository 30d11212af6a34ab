//! l2dump - reads live L2 forwarding state from the VPP dataplane
//!
//! Dumps bridge domains, L2 FIB entries and cross-connects over a
//! [`VppChannel`](vpp_binapi::VppChannel) and turns the detail records into
//! northbound records the agent can compare against its desired state.
//!
//! Every dump sends one request, drains the reply stream until the
//! dataplane signals its end, and returns a fresh snapshot. A channel error
//! is logged once and returned unchanged; nothing is retried. The bridge
//! domain ID listing returns what it collected together with the error,
//! every other dump returns only the error.
//!
//! Calls are blocking and run on the calling thread. Each takes an optional
//! [`StopWatchEntry`] that receives the call's duration exactly once.

mod bridge_domain;
mod config;
mod error;
mod fib;
mod model;
mod report;
mod stream;
mod timing;
mod xconnect;

pub use bridge_domain::{dump_bridge_domain_ids, dump_bridge_domains};
pub use config::{DumpConfig, DumpTable, L2DumpConfig, LoggingConfig, DEFAULT_CONFIG_PATH};
pub use error::{L2DumpError, PartialDump, Result};
pub use fib::{dump_fib_table_entries, dump_fib_table_entries_in, fib_key, lookup_fib_entries};
pub use model::{
    decode_tag, format_mac, BridgeDomain, BridgeDomainInterface, BridgeDomains, FibAction,
    FibTable, FibTableEntry, XConnectPair, XConnectPairs, DEFAULT_BRIDGE_DOMAIN,
};
pub use report::{collect_report, DumpReport, TableError};
pub use stream::{drain, drain_all, ReplyStream};
pub use timing::{DumpTimer, StopWatchEntry, TimeLog, TimerStats};
pub use xconnect::dump_xconnect_pairs;
