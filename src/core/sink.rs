//! Sink configuration and registration handles
//!
//! A sink is a writer paired with a [`SinkConfig`] (filter plus formatter).
//! Sinks are keyed by the identity of their shared config, never by value,
//! so two sinks with identical settings stay independently removable.

use super::error::{LogrError, Result};
use super::output_format::{format_default, OutputFormat};
use super::record::Record;
use super::severity::Severity;
use crossbeam_channel::{bounded, Sender};
use std::fmt;
use std::io::Write;
use std::sync::Arc;

/// Renders a record into the bytes handed to a sink's writer
pub type Formatter = Arc<dyn Fn(&Record) -> Vec<u8> + Send + Sync>;

/// Destination of formatted records, used sequentially by the dispatcher
pub type SinkWriter = Box<dyn Write + Send>;

/// Filter and formatter of one registered sink
pub struct SinkConfig {
    pub(crate) formatter: Formatter,
    pub(crate) filter: Severity,
}

impl SinkConfig {
    pub fn filter(&self) -> Severity {
        self.filter
    }

    /// Format `record` if it passes this sink's filter
    pub fn render(&self, record: &Record) -> Option<Vec<u8>> {
        if record.severity.matches(self.filter) {
            Some((self.formatter)(record))
        } else {
            None
        }
    }
}

impl fmt::Debug for SinkConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SinkConfig")
            .field("filter", &self.filter)
            .finish_non_exhaustive()
    }
}

/// Identity of a registered sink
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SinkId(usize);

impl SinkId {
    pub(crate) fn of(config: &Arc<SinkConfig>) -> Self {
        SinkId(Arc::as_ptr(config) as usize)
    }
}

/// Builder for a sink's filter and formatter
///
/// Defaults to [`format_default`] and [`Severity::ALL`].
///
/// # Example
///
/// ```
/// use logr::{OutputFormat, Severity, SinkOptions};
///
/// let options = SinkOptions::new()
///     .output_format(OutputFormat::Json)
///     .filter(Severity::MONITOR);
/// assert_eq!(options.build().filter(), Severity::MONITOR);
/// ```
#[derive(Clone)]
pub struct SinkOptions {
    formatter: Formatter,
    filter: Severity,
}

impl SinkOptions {
    pub fn new() -> Self {
        Self {
            formatter: Arc::new(format_default),
            filter: Severity::ALL,
        }
    }

    /// Use a custom formatter
    #[must_use]
    pub fn formatter<F>(mut self, formatter: F) -> Self
    where
        F: Fn(&Record) -> Vec<u8> + Send + Sync + 'static,
    {
        self.formatter = Arc::new(formatter);
        self
    }

    /// Use one of the bundled formatters
    #[must_use]
    pub fn output_format(mut self, format: OutputFormat) -> Self {
        self.formatter = format.formatter();
        self
    }

    #[must_use]
    pub fn filter(mut self, filter: Severity) -> Self {
        self.filter = filter;
        self
    }

    /// Set the filter from a label such as `"warning"` or `"verbose"`
    pub fn filter_label(self, label: &str) -> Result<Self> {
        Ok(self.filter(Severity::from_label(label)?))
    }

    /// Set the filter from short codes such as `"PEW"`
    #[must_use]
    pub fn filter_codes(self, codes: &str) -> Self {
        self.filter(Severity::from_codes(codes))
    }

    pub fn build(self) -> SinkConfig {
        SinkConfig {
            formatter: self.formatter,
            filter: self.filter,
        }
    }
}

impl Default for SinkOptions {
    fn default() -> Self {
        Self::new()
    }
}

/// Removal message for the dispatcher worker
///
/// The worker drops `ack` once the sink is out of the registry.
pub(crate) struct RemoveSink {
    pub(crate) config: Arc<SinkConfig>,
    pub(crate) ack: Sender<()>,
}

/// Handle returned when a sink is registered; [`stop`](SinkHandle::stop) removes it
///
/// Dropping the handle leaves the sink registered.
#[derive(Debug)]
pub struct SinkHandle {
    config: Arc<SinkConfig>,
    remove: Sender<RemoveSink>,
}

impl SinkHandle {
    pub(crate) fn new(config: Arc<SinkConfig>, remove: Sender<RemoveSink>) -> Self {
        Self { config, remove }
    }

    pub fn id(&self) -> SinkId {
        SinkId::of(&self.config)
    }

    pub fn filter(&self) -> Severity {
        self.config.filter
    }

    /// Remove the sink; records processed afterwards never reach it
    ///
    /// Returns once the sink is out of the registry. The dispatcher serves
    /// removals and records without priority, so records emitted just before
    /// `stop` may be skipped; call [`Logger::flush`](crate::Logger::flush)
    /// first when they must reach this sink.
    pub fn stop(self) -> Result<()> {
        let (ack, done) = bounded::<()>(0);
        self.remove
            .send(RemoveSink {
                config: self.config,
                ack,
            })
            .map_err(|_| LogrError::DispatcherStopped)?;
        // closed, never sent on
        let _ = done.recv();
        Ok(())
    }
}
