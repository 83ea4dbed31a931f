//! Log record structure and its completion signal

use super::meta::Meta;
use super::severity::Severity;
use super::timestamp::TimestampFormat;
use chrono::{DateTime, Utc};
use crossbeam_channel::{bounded, Receiver, RecvTimeoutError, Sender, TryRecvError};
use serde::Serialize;
use std::time::Duration;

const BASE36_DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// One log event in transit through the dispatcher
///
/// Records come from a [`RecordPool`](super::pool::RecordPool) and go back to
/// it after delivery, so string buffers are cleared rather than reallocated.
#[derive(Debug, Default, Serialize)]
pub struct Record {
    #[serde(rename = "type")]
    pub severity: Severity,
    pub time: String,
    pub code: String,
    pub description: String,
    #[serde(rename = "metadata", skip_serializing_if = "Option::is_none")]
    pub meta: Option<Meta>,
    #[serde(skip)]
    done: Option<Sender<()>>,
}

impl Record {
    /// Fill a zeroed record for a new emission
    ///
    /// Empty metadata is stored as `None`.
    pub fn populate(
        &mut self,
        severity: Severity,
        now: &DateTime<Utc>,
        timestamp_format: &TimestampFormat,
        description: &str,
        meta: &Meta,
    ) {
        self.severity = severity;
        self.time = timestamp_format.format(now);
        self.code.clear();
        push_code(&mut self.code, now.timestamp_nanos_opt().unwrap_or_default() as u64);
        self.description.clear();
        self.description.push_str(description);
        self.meta = if meta.is_empty() {
            None
        } else {
            Some(meta.clone())
        };
    }

    /// Arm the one-shot completion signal and return its waiting side
    pub fn attach_completion(&mut self) -> Completion {
        let (sender, receiver) = bounded(0);
        self.done = Some(sender);
        Completion { receiver }
    }

    /// True while a caller is waiting on this record's completion
    pub fn awaits_completion(&self) -> bool {
        self.done.is_some()
    }

    /// Close the completion signal; later calls are no-ops
    pub fn complete(&mut self) {
        drop(self.done.take());
    }

    /// Clear every field, including the completion signal
    ///
    /// String capacity is kept for the next emission.
    pub fn reset(&mut self) {
        self.severity = Severity::NONE;
        self.time.clear();
        self.code.clear();
        self.description.clear();
        self.meta = None;
        self.done = None;
    }

    pub(crate) fn is_zeroed(&self) -> bool {
        self.severity.is_empty()
            && self.time.is_empty()
            && self.code.is_empty()
            && self.description.is_empty()
            && self.meta.is_none()
            && self.done.is_none()
    }
}

/// Waiting side of a record's completion signal
///
/// The signal fires once the dispatcher has attempted every matching sink.
#[derive(Debug)]
pub struct Completion {
    receiver: Receiver<()>,
}

impl Completion {
    /// Block until the record has been delivered
    pub fn wait(&self) {
        // only ever closed, never sent on
        let _ = self.receiver.recv();
    }

    /// Block up to `timeout`; true if delivery completed in time
    pub fn wait_timeout(&self, timeout: Duration) -> bool {
        matches!(
            self.receiver.recv_timeout(timeout),
            Err(RecvTimeoutError::Disconnected)
        )
    }

    pub fn is_complete(&self) -> bool {
        matches!(self.receiver.try_recv(), Err(TryRecvError::Disconnected))
    }
}

/// Lowercase base-36 rendering of an emission timestamp in nanoseconds
pub fn generate_code(nanos: u64) -> String {
    let mut code = String::with_capacity(13);
    push_code(&mut code, nanos);
    code
}

fn push_code(out: &mut String, mut nanos: u64) {
    let mut digits = [0u8; 13];
    let mut len = 0;
    loop {
        digits[len] = BASE36_DIGITS[(nanos % 36) as usize];
        len += 1;
        nanos /= 36;
        if nanos == 0 {
            break;
        }
    }
    out.extend(digits[..len].iter().rev().map(|&d| d as char));
}
