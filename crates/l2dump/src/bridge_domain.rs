//! Bridge domain dumps.

use tracing::{debug, instrument, warn};
use vpp_binapi::{BridgeDomainDetails, BridgeDomainDump, ChannelError, VppChannel};

use crate::error::PartialDump;
use crate::model::{BridgeDomain, BridgeDomains, DEFAULT_BRIDGE_DOMAIN};
use crate::stream::{drain, drain_all, ReplyStream};
use crate::timing::{StopWatchEntry, TimeLog};

/// Lists the IDs of all configured bridge domains.
///
/// The first element is always [`DEFAULT_BRIDGE_DOMAIN`], followed by every
/// ID in the order the dataplane reported them. On a channel error the IDs
/// collected so far are returned inside the [`PartialDump`]; treat them as
/// possibly incomplete.
#[instrument(skip_all)]
pub fn dump_bridge_domain_ids<C>(
    channel: &C,
    time_log: Option<&dyn StopWatchEntry>,
) -> Result<Vec<u32>, PartialDump<Vec<u32>>>
where
    C: VppChannel + ?Sized,
{
    let _time_log = TimeLog::start(time_log);

    let stream = ReplyStream::<BridgeDomainDetails>::send(channel, BridgeDomainDump::all());
    let ids = drain(stream, vec![DEFAULT_BRIDGE_DOMAIN], |ids, details| {
        ids.push(details.bd_id)
    })?;

    debug!(count = ids.len(), "Dumped bridge domain IDs");
    Ok(ids)
}

/// Dumps all bridge domains with their member interfaces, keyed by ID.
///
/// Members carry only their interface index. The contents of the ARP
/// termination table are not available from the dataplane, only whether
/// termination is enabled. A channel error discards everything collected.
#[instrument(skip_all)]
pub fn dump_bridge_domains<C>(
    channel: &C,
    time_log: Option<&dyn StopWatchEntry>,
) -> Result<BridgeDomains, ChannelError>
where
    C: VppChannel + ?Sized,
{
    let _time_log = TimeLog::start(time_log);

    let stream = ReplyStream::<BridgeDomainDetails>::send(channel, BridgeDomainDump::all());
    let bds = drain_all(stream, BridgeDomains::new(), |bds, details| {
        warn!(
            tag = ?details.bd_tag,
            learn = details.learn,
            forward = details.forward,
            flood = details.flood,
            arp_term = details.arp_term,
            uu_flood = details.uu_flood,
            mac_age = details.mac_age,
            "Bridge domain details"
        );
        warn!(
            bd_id = details.bd_id,
            n_sw_ifs = details.n_sw_ifs,
            sw_ifs = ?details.sw_if_details,
            bvi_sw_if_index = details.bvi_sw_if_index,
            "Bridge domain interfaces"
        );

        bds.insert(details.bd_id, BridgeDomain::from(&details));
    })?;

    debug!(count = bds.len(), "Dumped bridge domains");
    Ok(bds)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::BridgeDomainInterface;
    use crate::timing::MockStopWatchEntry;
    use pretty_assertions::assert_eq;
    use vpp_binapi::{BridgeDomainSwIf, DumpKind, ReplayCapture, ReplayChannel};

    fn details(bd_id: u32, flood: u8, learn: u8, members: &[u32]) -> BridgeDomainDetails {
        let mut details = BridgeDomainDetails::with_tag(bd_id, &format!("bd{bd_id}"));
        details.flood = flood;
        details.learn = learn;
        details.n_sw_ifs = members.len() as u32;
        details.sw_if_details = members
            .iter()
            .map(|idx| BridgeDomainSwIf {
                sw_if_index: *idx,
                ..Default::default()
            })
            .collect();
        details
    }

    fn timed_once() -> MockStopWatchEntry {
        let mut mock = MockStopWatchEntry::new();
        mock.expect_log_time_entry().times(1).return_const(());
        mock
    }

    #[test]
    fn test_ids_empty_stream_has_default_only() {
        let channel = ReplayChannel::new(ReplayCapture::new());
        let ids = dump_bridge_domain_ids(&channel, None).unwrap();
        assert_eq!(ids, vec![0]);
    }

    #[test]
    fn test_ids_in_stream_order() {
        let capture = ReplayCapture::new()
            .with_reply(details(2, 0, 0, &[]))
            .with_reply(details(7, 0, 0, &[]));
        let channel = ReplayChannel::new(capture);

        let ids = dump_bridge_domain_ids(&channel, None).unwrap();
        assert_eq!(ids, vec![0, 2, 7]);
        assert_eq!(channel.requests_sent(DumpKind::BridgeDomain), 1);
    }

    #[test]
    fn test_ids_keep_reported_zero() {
        let capture = ReplayCapture::new().with_reply(details(0, 0, 0, &[]));
        let channel = ReplayChannel::new(capture);

        let ids = dump_bridge_domain_ids(&channel, None).unwrap();
        assert_eq!(ids, vec![0, 0]);
    }

    #[test]
    fn test_ids_partial_on_error() {
        let capture = ReplayCapture::new()
            .with_reply(details(3, 0, 0, &[]))
            .with_reply(details(4, 0, 0, &[]))
            .with_error(DumpKind::BridgeDomain, ChannelError::Disconnected);
        let channel = ReplayChannel::new(capture);
        let timer = timed_once();

        let err = dump_bridge_domain_ids(&channel, Some(&timer)).unwrap_err();
        assert_eq!(err.partial, vec![0, 3, 4]);
        assert_eq!(err.received, 2);
        assert_eq!(err.source, ChannelError::Disconnected);
    }

    #[test]
    fn test_ids_error_before_any_record() {
        let capture = ReplayCapture::new().with_error(
            DumpKind::BridgeDomain,
            ChannelError::retval("bridge_domain_dump", -1),
        );
        let channel = ReplayChannel::new(capture);

        let err = dump_bridge_domain_ids(&channel, None).unwrap_err();
        assert_eq!(err.partial, vec![0]);
    }

    #[test]
    fn test_bridge_domains_detail() {
        let capture = ReplayCapture::new()
            .with_reply(details(5, 1, 0, &[3]))
            .with_reply(details(9, 0, 1, &[]));
        let channel = ReplayChannel::new(capture);
        let timer = timed_once();

        let bds = dump_bridge_domains(&channel, Some(&timer)).unwrap();
        assert_eq!(bds.len(), 2);
        assert!(!bds.contains_key(&0));

        let bd5 = &bds[&5];
        assert_eq!(bd5.name, "bd5");
        assert!(bd5.flood);
        assert!(!bd5.learn);
        assert_eq!(bd5.interfaces, vec![BridgeDomainInterface { sw_if_index: 3 }]);

        let bd9 = &bds[&9];
        assert!(!bd9.flood);
        assert!(bd9.learn);
        assert!(bd9.interfaces.is_empty());
    }

    #[test]
    fn test_bridge_domains_empty_stream() {
        let channel = ReplayChannel::new(ReplayCapture::new());
        let bds = dump_bridge_domains(&channel, None).unwrap();
        assert!(bds.is_empty());
    }

    #[test]
    fn test_bridge_domains_last_record_wins() {
        let capture = ReplayCapture::new()
            .with_reply(details(5, 1, 1, &[1, 2]))
            .with_reply(details(5, 0, 0, &[7]));
        let channel = ReplayChannel::new(capture);

        let bds = dump_bridge_domains(&channel, None).unwrap();
        assert_eq!(bds.len(), 1);
        assert!(!bds[&5].flood);
        assert_eq!(bds[&5].interfaces, vec![BridgeDomainInterface { sw_if_index: 7 }]);
    }

    #[test]
    fn test_bridge_domains_discard_on_error() {
        let capture = ReplayCapture::new()
            .with_reply(details(5, 1, 0, &[3]))
            .with_error(
                DumpKind::BridgeDomain,
                ChannelError::decode("bridge_domain_details", "truncated"),
            );
        let channel = ReplayChannel::new(capture);
        let timer = timed_once();

        let err = dump_bridge_domains(&channel, Some(&timer)).unwrap_err();
        assert_eq!(
            err,
            ChannelError::decode("bridge_domain_details", "truncated")
        );
    }
}
