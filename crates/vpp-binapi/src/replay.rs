//! Deterministic in-process channel that replays a captured dump session.
//!
//! A [`ReplayCapture`] holds, per dump kind, the ordered steps the dataplane
//! answered with: detail records and, optionally, an error that cuts the
//! stream short. [`ReplayChannel`] serves every request from the capture, so
//! the same request always sees the same stream.

use std::fs;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::channel::{DetailRecord, DumpKind, DumpRequest, MultiRequestContext, VppChannel};
use crate::error::{ChannelError, ChannelResult};
use crate::l2::ALL_BRIDGE_DOMAINS;

/// Errors loading a capture file.
#[derive(Debug, Error)]
pub enum CaptureError {
    #[error("failed to read capture {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse capture {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

/// One scripted step of a reply stream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReplayStep {
    Reply(DetailRecord),
    Error(ChannelError),
}

/// Captured reply streams, one per dump kind.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReplayCapture {
    pub bridge_domains: Vec<ReplayStep>,
    pub l2_fib: Vec<ReplayStep>,
    pub l2_xconnect: Vec<ReplayStep>,
}

impl ReplayCapture {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads a capture from a JSON file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, CaptureError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| CaptureError::Io {
            path: path.display().to_string(),
            source,
        })?;
        serde_json::from_str(&content).map_err(|source| CaptureError::Parse {
            path: path.display().to_string(),
            source,
        })
    }

    /// Appends a record to the stream of its own kind.
    pub fn with_reply(mut self, record: impl Into<DetailRecord>) -> Self {
        let record = record.into();
        self.steps_mut(record.kind()).push(ReplayStep::Reply(record));
        self
    }

    /// Appends a failure to the stream of `kind`.
    pub fn with_error(mut self, kind: DumpKind, error: ChannelError) -> Self {
        self.steps_mut(kind).push(ReplayStep::Error(error));
        self
    }

    pub fn steps(&self, kind: DumpKind) -> &[ReplayStep] {
        match kind {
            DumpKind::BridgeDomain => &self.bridge_domains,
            DumpKind::L2Fib => &self.l2_fib,
            DumpKind::L2Xconnect => &self.l2_xconnect,
        }
    }

    fn steps_mut(&mut self, kind: DumpKind) -> &mut Vec<ReplayStep> {
        match kind {
            DumpKind::BridgeDomain => &mut self.bridge_domains,
            DumpKind::L2Fib => &mut self.l2_fib,
            DumpKind::L2Xconnect => &mut self.l2_xconnect,
        }
    }
}

/// A [`VppChannel`] answering from a [`ReplayCapture`].
#[derive(Debug, Default)]
pub struct ReplayChannel {
    capture: ReplayCapture,
    bridge_domain_requests: AtomicUsize,
    l2_fib_requests: AtomicUsize,
    l2_xconnect_requests: AtomicUsize,
}

impl ReplayChannel {
    pub fn new(capture: ReplayCapture) -> Self {
        Self {
            capture,
            ..Default::default()
        }
    }

    pub fn capture(&self) -> &ReplayCapture {
        &self.capture
    }

    /// Number of requests of `kind` sent so far.
    pub fn requests_sent(&self, kind: DumpKind) -> usize {
        self.counter(kind).load(Ordering::Relaxed)
    }

    fn counter(&self, kind: DumpKind) -> &AtomicUsize {
        match kind {
            DumpKind::BridgeDomain => &self.bridge_domain_requests,
            DumpKind::L2Fib => &self.l2_fib_requests,
            DumpKind::L2Xconnect => &self.l2_xconnect_requests,
        }
    }
}

impl VppChannel for ReplayChannel {
    fn send_multi_request(&self, request: DumpRequest) -> Box<dyn MultiRequestContext + '_> {
        let kind = request.kind();
        self.counter(kind).fetch_add(1, Ordering::Relaxed);

        let filter = request.bd_id().filter(|id| *id != ALL_BRIDGE_DOMAINS);
        let steps: Vec<ReplayStep> = self
            .capture
            .steps(kind)
            .iter()
            .filter(|step| match (step, filter) {
                (ReplayStep::Reply(record), Some(bd_id)) => record.bd_id() == Some(bd_id),
                _ => true,
            })
            .cloned()
            .collect();

        debug!(
            request = request.name(),
            bd_id = ?request.bd_id(),
            steps = steps.len(),
            "Replaying multi-request"
        );

        Box::new(ReplayContext {
            steps: steps.into_iter(),
            finished: false,
        })
    }
}

/// Reply context of a single replayed request.
struct ReplayContext {
    steps: std::vec::IntoIter<ReplayStep>,
    finished: bool,
}

impl MultiRequestContext for ReplayContext {
    fn receive_reply(&mut self) -> ChannelResult<Option<DetailRecord>> {
        if self.finished {
            return Ok(None);
        }
        match self.steps.next() {
            Some(ReplayStep::Reply(record)) => {
                debug!(record = record.name(), "Replayed reply");
                Ok(Some(record))
            }
            Some(ReplayStep::Error(err)) => {
                self.finished = true;
                Err(err)
            }
            None => {
                self.finished = true;
                Ok(None)
            }
        }
    }
}
