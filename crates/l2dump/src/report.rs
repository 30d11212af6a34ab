//! Runs the configured dumps and gathers their results into one report.

use std::collections::BTreeMap;

use serde::Serialize;
use tracing::{info, warn};
use vpp_binapi::VppChannel;

use crate::bridge_domain::{dump_bridge_domain_ids, dump_bridge_domains};
use crate::config::{DumpConfig, DumpTable};
use crate::fib::dump_fib_table_entries;
use crate::model::{BridgeDomain, FibTableEntry, XConnectPair};
use crate::timing::{DumpTimer, StopWatchEntry, TimerStats};
use crate::xconnect::dump_xconnect_pairs;

/// A table whose dump failed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableError {
    pub table: DumpTable,
    pub error: String,
}

/// Results of one l2dump run, ordered by key.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DumpReport {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bridge_domain_ids: Option<Vec<u32>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub bridge_domains: Option<BTreeMap<u32, BridgeDomain>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub fib: Option<BTreeMap<String, FibTableEntry>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub xconnect: Option<BTreeMap<u32, XConnectPair>>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<TableError>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub timing: Option<TimerStats>,
}

impl DumpReport {
    pub fn is_complete(&self) -> bool {
        self.errors.is_empty()
    }

    fn fail(&mut self, table: DumpTable, error: impl ToString) {
        self.errors.push(TableError {
            table,
            error: error.to_string(),
        });
    }
}

/// Dumps every table named in `config` over `channel`.
///
/// A failed table is recorded in [`DumpReport::errors`] and the remaining
/// tables are still dumped. The ID listing keeps its partial result.
pub fn collect_report<C>(channel: &C, config: &DumpConfig) -> DumpReport
where
    C: VppChannel + ?Sized,
{
    let timer = config.timing.then(|| DumpTimer::new("l2dump"));
    let time_log = timer.as_ref().map(|t| t as &dyn StopWatchEntry);

    let mut report = DumpReport::default();

    for table in &config.tables {
        match table {
            DumpTable::BridgeDomains if config.bridge_domain_ids_only => {
                match dump_bridge_domain_ids(channel, time_log) {
                    Ok(ids) => report.bridge_domain_ids = Some(ids),
                    Err(err) => {
                        warn!(received = err.received, "Bridge domain ID listing is incomplete");
                        report.fail(*table, &err.source);
                        report.bridge_domain_ids = Some(err.partial);
                    }
                }
            }
            DumpTable::BridgeDomains => match dump_bridge_domains(channel, time_log) {
                Ok(bds) => report.bridge_domains = Some(bds.into_iter().collect()),
                Err(err) => report.fail(*table, err),
            },
            DumpTable::Fib => match dump_fib_table_entries(channel, time_log) {
                Ok(fibs) => report.fib = Some(fibs.into_iter().collect()),
                Err(err) => report.fail(*table, err),
            },
            DumpTable::Xconnect => match dump_xconnect_pairs(channel, time_log) {
                Ok(pairs) => report.xconnect = Some(pairs.into_iter().collect()),
                Err(err) => report.fail(*table, err),
            },
        }
    }

    report.timing = timer.map(|t| t.stats());
    info!(
        tables = config.tables.len(),
        failed = report.errors.len(),
        "L2 dump finished"
    );
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use vpp_binapi::{
        BridgeDomainDetails, ChannelError, DumpKind, L2XconnectDetails, ReplayCapture,
        ReplayChannel,
    };

    fn capture() -> ReplayCapture {
        ReplayCapture::new()
            .with_reply(BridgeDomainDetails::with_tag(2, "two"))
            .with_reply(L2XconnectDetails {
                rx_sw_if_index: 1,
                tx_sw_if_index: 2,
            })
    }

    #[test]
    fn test_report_all_tables() {
        let channel = ReplayChannel::new(capture());
        let report = collect_report(&channel, &DumpConfig::default());

        assert!(report.is_complete());
        assert_eq!(report.bridge_domains.as_ref().map(|b| b.len()), Some(1));
        assert_eq!(report.fib.as_ref().map(|f| f.len()), Some(0));
        assert_eq!(report.xconnect.as_ref().map(|x| x.len()), Some(1));
        assert!(report.bridge_domain_ids.is_none());
        assert_eq!(report.timing.map(|t| t.calls), Some(3));
    }

    #[test]
    fn test_report_ids_only_keeps_partial() {
        let capture = capture().with_error(DumpKind::BridgeDomain, ChannelError::Disconnected);
        let channel = ReplayChannel::new(capture);
        let config = DumpConfig {
            tables: vec![DumpTable::BridgeDomains],
            timing: false,
            bridge_domain_ids_only: true,
        };

        let report = collect_report(&channel, &config);
        assert!(!report.is_complete());
        assert_eq!(report.bridge_domain_ids, Some(vec![0, 2]));
        assert_eq!(
            report.errors,
            vec![TableError {
                table: DumpTable::BridgeDomains,
                error: "channel disconnected".to_string(),
            }]
        );
        assert!(report.timing.is_none());
    }

    #[test]
    fn test_report_continues_after_failed_table() {
        let capture = capture().with_error(DumpKind::L2Fib, ChannelError::Disconnected);
        let channel = ReplayChannel::new(capture);
        let report = collect_report(&channel, &DumpConfig::default());

        assert_eq!(report.errors.len(), 1);
        assert_eq!(report.errors[0].table, DumpTable::Fib);
        assert!(report.fib.is_none());
        assert!(report.xconnect.is_some());
    }

    #[test]
    fn test_report_json_shape() {
        let channel = ReplayChannel::new(capture());
        let config = DumpConfig {
            tables: vec![DumpTable::Xconnect],
            timing: false,
            bridge_domain_ids_only: false,
        };

        let json = serde_json::to_value(collect_report(&channel, &config)).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "xconnect": {
                    "1": {
                        "receive_interface_sw_if_idx": 1,
                        "transmit_interface_sw_if_idx": 2
                    }
                }
            })
        );
    }
}
