//! The set of active sinks, owned by the dispatcher worker
//!
//! Nothing here is synchronized: the registry lives on the worker's stack and
//! every mutation reaches it as a message through the worker loop.

use super::error::LogrError;
use super::metrics::DispatchMetrics;
use super::record::Record;
use super::sink::{SinkConfig, SinkId, SinkWriter};
use std::collections::HashMap;
use std::io::{self, Write};
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

struct RegisteredSink {
    config: Arc<SinkConfig>,
    writer: SinkWriter,
}

#[derive(Default)]
pub(crate) struct SinkRegistry {
    sinks: HashMap<SinkId, RegisteredSink>,
}

impl SinkRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a sink; an already present identity is overwritten
    pub fn insert(&mut self, config: Arc<SinkConfig>, writer: SinkWriter) {
        self.sinks
            .insert(SinkId::of(&config), RegisteredSink { config, writer });
    }

    /// Remove a sink; absent identities are ignored
    pub fn remove(&mut self, config: &Arc<SinkConfig>) -> bool {
        self.sinks.remove(&SinkId::of(config)).is_some()
    }

    pub fn len(&self) -> usize {
        self.sinks.len()
    }

    /// Write `record` to every sink whose filter it matches
    ///
    /// A failing sink never stops delivery to the others; its error is
    /// returned so the caller can report it. Formatter and writer panics are
    /// isolated per sink. When a caller waits on the record, every sink it
    /// was written to is also flushed.
    pub fn dispatch(&mut self, record: &Record, metrics: &DispatchMetrics) -> Vec<LogrError> {
        let mut failures = Vec::new();
        let durable = record.awaits_completion();

        for sink in self.sinks.values_mut() {
            let outcome = panic::catch_unwind(AssertUnwindSafe(|| -> io::Result<bool> {
                let Some(bytes) = sink.config.render(record) else {
                    return Ok(false);
                };
                sink.writer.write_all(&bytes)?;
                if durable {
                    sink.writer.flush()?;
                }
                Ok(true)
            }));

            match outcome {
                Ok(Ok(false)) => {}
                Ok(Ok(true)) => {
                    metrics.record_write();
                }
                Ok(Err(e)) => {
                    metrics.record_write_failure();
                    failures.push(LogrError::write_failed(e));
                }
                Err(payload) => {
                    metrics.record_write_failure();
                    failures.push(LogrError::sink_panicked(&*payload));
                }
            }
        }

        failures
    }

    /// Flush every writer, reporting failures on stderr
    pub fn flush(&mut self) {
        for (id, sink) in self.sinks.iter_mut() {
            let outcome = panic::catch_unwind(AssertUnwindSafe(|| sink.writer.flush()));
            match outcome {
                Ok(Ok(())) => {}
                Ok(Err(e)) => {
                    eprintln!("[LOGR ERROR] Sink {:?} flush failed: {}", id, e);
                }
                Err(payload) => {
                    eprintln!(
                        "[LOGR ERROR] Sink {:?} panicked during flush: {}",
                        id,
                        LogrError::sink_panicked(&*payload)
                    );
                }
            }
        }
    }
}
