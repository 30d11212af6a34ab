//! Typed reply streams and the shared drain loop.
//!
//! [`ReplyStream`] sends one multi-reply request and yields its detail
//! messages as an iterator of `Result<M, ChannelError>`. It is forward-only
//! and fused: after the end of the stream or the first error it yields
//! nothing more.
//!
//! [`drain`] folds a stream into an accumulator. On failure it returns the
//! accumulator together with the error, so each caller picks its own policy
//! for partial results.

use std::marker::PhantomData;

use tracing::{debug, error};
use vpp_binapi::{
    ChannelError, ChannelResult, DumpRequest, MultiReplyMessage, MultiRequestContext, VppChannel,
};

use crate::error::PartialDump;

/// Reply stream of a single outstanding multi-reply request.
pub struct ReplyStream<'a, M> {
    ctx: Box<dyn MultiRequestContext + 'a>,
    request: &'static str,
    finished: bool,
    _reply: PhantomData<fn() -> M>,
}

impl<'a, M: MultiReplyMessage> ReplyStream<'a, M> {
    /// Sends `request` over `channel` and wraps its reply context.
    pub fn send<C>(channel: &'a C, request: impl Into<DumpRequest>) -> Self
    where
        C: VppChannel + ?Sized,
    {
        let request = request.into();
        let name = request.name();
        debug!(request = name, bd_id = ?request.bd_id(), "Sending multi-request");
        Self {
            ctx: channel.send_multi_request(request),
            request: name,
            finished: false,
            _reply: PhantomData,
        }
    }

    /// Name of the request this stream answers.
    pub fn request(&self) -> &'static str {
        self.request
    }

    /// Receives the next detail message, `Ok(None)` at the end of the stream.
    pub fn receive(&mut self) -> ChannelResult<Option<M>> {
        if self.finished {
            return Ok(None);
        }
        let result = match self.ctx.receive_reply() {
            Ok(Some(record)) => M::from_record(record).map(Some),
            Ok(None) => Ok(None),
            Err(err) => Err(err),
        };
        if !matches!(result, Ok(Some(_))) {
            self.finished = true;
        }
        result
    }
}

impl<M: MultiReplyMessage> Iterator for ReplyStream<'_, M> {
    type Item = ChannelResult<M>;

    fn next(&mut self) -> Option<Self::Item> {
        self.receive().transpose()
    }
}

/// Folds every message of `stream` into `acc` until the end of the stream.
///
/// The first channel error stops the loop; it is logged once here and
/// returned with the accumulator as it stood at that point.
pub fn drain<M, A, F>(
    stream: ReplyStream<'_, M>,
    mut acc: A,
    mut fold: F,
) -> Result<A, PartialDump<A>>
where
    M: MultiReplyMessage,
    F: FnMut(&mut A, M),
{
    let request = stream.request();
    let mut received = 0usize;

    for reply in stream {
        match reply {
            Ok(msg) => {
                fold(&mut acc, msg);
                received += 1;
            }
            Err(err) => {
                error!(request, received, error = %err, "Dump aborted");
                return Err(PartialDump {
                    partial: acc,
                    received,
                    source: err,
                });
            }
        }
    }

    debug!(request, received, "Dump complete");
    Ok(acc)
}

/// Drains `stream` and discards the partial result on failure.
pub fn drain_all<M, A, F>(stream: ReplyStream<'_, M>, acc: A, fold: F) -> Result<A, ChannelError>
where
    M: MultiReplyMessage,
    F: FnMut(&mut A, M),
{
    drain(stream, acc, fold).map_err(PartialDump::discard)
}
