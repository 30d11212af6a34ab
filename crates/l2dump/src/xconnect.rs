//! L2 cross-connect dumps.

use tracing::{debug, instrument};
use vpp_binapi::{ChannelError, L2XconnectDetails, L2XconnectDump, VppChannel};

use crate::model::{XConnectPair, XConnectPairs};
use crate::stream::{drain_all, ReplyStream};
use crate::timing::{StopWatchEntry, TimeLog};

/// Dumps all cross-connects, keyed by receive interface index.
///
/// A later record for the same receive interface replaces the earlier one.
/// A channel error discards everything collected.
#[instrument(skip_all)]
pub fn dump_xconnect_pairs<C>(
    channel: &C,
    time_log: Option<&dyn StopWatchEntry>,
) -> Result<XConnectPairs, ChannelError>
where
    C: VppChannel + ?Sized,
{
    let _time_log = TimeLog::start(time_log);

    let stream = ReplyStream::<L2XconnectDetails>::send(channel, L2XconnectDump {});
    let pairs = drain_all(stream, XConnectPairs::new(), |pairs, details| {
        pairs.insert(details.rx_sw_if_index, XConnectPair::from(&details));
    })?;

    debug!(count = pairs.len(), "Dumped cross-connect pairs");
    Ok(pairs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timing::MockStopWatchEntry;
    use pretty_assertions::assert_eq;
    use vpp_binapi::{DumpKind, ReplayCapture, ReplayChannel};

    fn xc(rx: u32, tx: u32) -> L2XconnectDetails {
        L2XconnectDetails {
            rx_sw_if_index: rx,
            tx_sw_if_index: tx,
        }
    }

    #[test]
    fn test_pairs_keyed_by_rx() {
        let capture = ReplayCapture::new().with_reply(xc(1, 2)).with_reply(xc(2, 1));
        let channel = ReplayChannel::new(capture);

        let pairs = dump_xconnect_pairs(&channel, None).unwrap();
        assert_eq!(pairs.len(), 2);
        assert_eq!(
            pairs[&1],
            XConnectPair {
                receive_interface_sw_if_idx: 1,
                transmit_interface_sw_if_idx: 2,
            }
        );
        assert_eq!(pairs[&2].transmit_interface_sw_if_idx, 1);
    }

    #[test]
    fn test_later_record_replaces() {
        let capture = ReplayCapture::new().with_reply(xc(1, 2)).with_reply(xc(1, 5));
        let channel = ReplayChannel::new(capture);

        let pairs = dump_xconnect_pairs(&channel, None).unwrap();
        assert_eq!(pairs.len(), 1);
        assert_eq!(pairs[&1].transmit_interface_sw_if_idx, 5);
    }

    #[test]
    fn test_empty_stream() {
        let channel = ReplayChannel::new(ReplayCapture::new());
        let mut timer = MockStopWatchEntry::new();
        timer.expect_log_time_entry().times(1).return_const(());

        let pairs = dump_xconnect_pairs(&channel, Some(&timer)).unwrap();
        assert!(pairs.is_empty());
    }

    #[test]
    fn test_discard_on_error() {
        let capture = ReplayCapture::new()
            .with_reply(xc(1, 2))
            .with_error(DumpKind::L2Xconnect, ChannelError::Disconnected);
        let channel = ReplayChannel::new(capture);
        let mut timer = MockStopWatchEntry::new();
        timer.expect_log_time_entry().times(1).return_const(());

        let err = dump_xconnect_pairs(&channel, Some(&timer)).unwrap_err();
        assert_eq!(err, ChannelError::Disconnected);
    }
}
