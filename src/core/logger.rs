//! Logger handle: a shared dispatcher paired with a metadata snapshot

use super::dispatcher::{Dispatcher, DispatcherConfig};
use super::error::Result;
use super::meta::{Meta, MetaValue};
use super::metrics::DispatchMetrics;
use super::severity::Severity;
use super::sink::{SinkHandle, SinkOptions, SinkWriter};
use super::timestamp::TimestampFormat;
use std::fmt::{self, Write as _};
use std::io;
use std::sync::Arc;
use std::time::Duration;

/// Cheap, clonable entry point for emitting records
///
/// Handles derived with [`with`](Logger::with) share the dispatcher and carry
/// their own metadata; the parent's metadata is never touched.
///
/// # Example
///
/// ```
/// use logr::{meta, Logger, Severity, SinkOptions};
/// use logr::sinks::SharedBuffer;
///
/// let buffer = SharedBuffer::new();
/// let logger = Logger::builder()
///     .sink(buffer.clone(), SinkOptions::new().filter(Severity::ALL))
///     .build()
///     .unwrap();
///
/// let request = logger.with(meta("request", "r-17"));
/// request.info("accepted");
/// logger.flush().unwrap();
///
/// assert!(buffer.contents().contains("accepted | request=r-17"));
/// ```
#[derive(Clone)]
pub struct Logger {
    dispatcher: Arc<Dispatcher>,
    meta: Meta,
}

impl Logger {
    /// Logger with default settings and no sinks
    pub fn new() -> Result<Self> {
        LogrBuilder::new().build()
    }

    #[must_use]
    pub fn builder() -> LogrBuilder {
        LogrBuilder::new()
    }

    /// Wrap an already running dispatcher
    pub fn from_dispatcher(dispatcher: Arc<Dispatcher>) -> Self {
        Self {
            dispatcher,
            meta: Meta::new(),
        }
    }

    /// Derive a handle whose metadata is this handle's merged with `extra`
    ///
    /// Keys in `extra` win on conflict.
    #[must_use]
    pub fn with(&self, extra: Meta) -> Logger {
        Logger {
            dispatcher: Arc::clone(&self.dispatcher),
            meta: self.meta.merge(&extra),
        }
    }

    /// Derive a handle with one extra metadata field
    #[must_use]
    pub fn with_field<K, V>(&self, key: K, value: V) -> Logger
    where
        K: Into<String>,
        V: Into<MetaValue>,
    {
        Logger {
            dispatcher: Arc::clone(&self.dispatcher),
            meta: self.meta.with(key, value),
        }
    }

    pub fn meta(&self) -> &Meta {
        &self.meta
    }

    /// Emit a record and return its code
    ///
    /// With `wait` the call returns only after every matching sink has been
    /// attempted.
    pub fn try_log(&self, severity: Severity, message: &str, wait: bool) -> Result<String> {
        let mut record = self.dispatcher.prepare(severity, message, &self.meta);
        let code = record.code.clone();
        let completion = wait.then(|| record.attach_completion());

        self.dispatcher.enqueue(record)?;

        if let Some(completion) = completion {
            completion.wait();
        }
        Ok(code)
    }

    /// Emit without waiting for delivery
    ///
    /// Returns the record's code, or an empty code if the dispatcher has
    /// stopped.
    pub fn log(&self, severity: Severity, message: impl AsRef<str>) -> String {
        self.emit(severity, message.as_ref(), false)
    }

    /// Emit and wait until every matching sink has been attempted
    pub fn log_sync(&self, severity: Severity, message: impl AsRef<str>) -> String {
        self.emit(severity, message.as_ref(), true)
    }

    fn emit(&self, severity: Severity, message: &str, wait: bool) -> String {
        match self.try_log(severity, message, wait) {
            Ok(code) => code,
            Err(e) => {
                eprintln!("[LOGR ERROR] failed to enqueue {} record: {}", severity.word(), e);
                String::new()
            }
        }
    }

    /// Emit at panic severity, wait for delivery, then panic
    ///
    /// The panic payload is the record's code as a `String`.
    pub fn panic(&self, message: impl AsRef<str>) -> ! {
        let message = message.as_ref();
        match self.try_log(Severity::PANIC, message, true) {
            Ok(code) => std::panic::panic_any(code),
            Err(e) => panic!("{} ({})", message, e),
        }
    }

    pub fn error(&self, message: impl AsRef<str>) -> String {
        self.log(Severity::ERROR, message)
    }

    pub fn warn(&self, message: impl AsRef<str>) -> String {
        self.log(Severity::WARNING, message)
    }

    pub fn info(&self, message: impl AsRef<str>) -> String {
        self.log(Severity::INFO, message)
    }

    pub fn debug(&self, message: impl AsRef<str>) -> String {
        self.log(Severity::DEBUG, message)
    }

    pub fn success(&self, message: impl AsRef<str>) -> String {
        self.log(Severity::SUCCESS, message)
    }

    /// Register a sink on the shared dispatcher
    pub fn add_sink<W>(&self, writer: W, options: SinkOptions) -> Result<SinkHandle>
    where
        W: io::Write + Send + 'static,
    {
        self.dispatcher.add_sink(Box::new(writer), options)
    }

    /// Block until the record queue is observed empty
    pub fn drain(&self) {
        self.dispatcher.drain();
    }

    /// Block until every earlier record is written and sinks are flushed
    pub fn flush(&self) -> Result<()> {
        self.dispatcher.flush()
    }

    pub fn set_capacity(&self, capacity: usize) -> Result<()> {
        self.dispatcher.set_capacity(capacity)
    }

    pub fn metrics(&self) -> &DispatchMetrics {
        self.dispatcher.metrics()
    }

    pub fn dispatcher(&self) -> &Arc<Dispatcher> {
        &self.dispatcher
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger")
            .field("meta", &self.meta)
            .field("capacity", &self.dispatcher.capacity())
            .finish()
    }
}

/// Render arguments separated by single spaces, trimmed
///
/// ```
/// assert_eq!(logr::join_args(&[&"user", &42, &true]), "user 42 true");
/// ```
pub fn join_args(args: &[&dyn fmt::Display]) -> String {
    let mut out = String::new();
    for (i, arg) in args.iter().enumerate() {
        if i > 0 {
            out.push(' ');
        }
        let _ = write!(out, "{}", arg);
    }
    out.trim().to_string()
}

/// Builder for [`Logger`]
pub struct LogrBuilder {
    config: DispatcherConfig,
    meta: Meta,
    sinks: Vec<(SinkWriter, SinkOptions)>,
}

impl LogrBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self {
            config: DispatcherConfig::default(),
            meta: Meta::new(),
            sinks: Vec::new(),
        }
    }

    /// Record queue capacity (default 10 000)
    #[must_use]
    pub fn capacity(mut self, capacity: usize) -> Self {
        self.config.capacity = capacity;
        self
    }

    #[must_use]
    pub fn timestamp_format(mut self, format: TimestampFormat) -> Self {
        self.config.timestamp_format = format;
        self
    }

    /// Name of the dispatcher worker thread
    #[must_use]
    pub fn thread_name(mut self, name: impl Into<String>) -> Self {
        self.config.thread_name = name.into();
        self
    }

    /// Base metadata carried by every record of the built logger
    #[must_use]
    pub fn meta(mut self, meta: Meta) -> Self {
        self.meta = meta;
        self
    }

    /// How long dropping the last handle waits for pending records
    #[must_use]
    pub fn shutdown_timeout(mut self, timeout: Duration) -> Self {
        self.config.shutdown_timeout = timeout;
        self
    }

    /// Register a sink as soon as the dispatcher starts
    #[must_use]
    pub fn sink<W>(mut self, writer: W, options: SinkOptions) -> Self
    where
        W: io::Write + Send + 'static,
    {
        self.sinks.push((Box::new(writer), options));
        self
    }

    /// Start the dispatcher and register the queued sinks
    ///
    /// A zero capacity is rejected by the dispatcher.
    pub fn build(self) -> Result<Logger> {
        let dispatcher = Dispatcher::start(self.config)?;
        for (writer, options) in self.sinks {
            // registered for the dispatcher's lifetime
            let _handle = dispatcher.add_sink(writer, options)?;
        }

        Ok(Logger {
            dispatcher: Arc::new(dispatcher),
            meta: self.meta,
        })
    }
}

impl Default for LogrBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for LogrBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LogrBuilder")
            .field("config", &self.config)
            .field("meta", &self.meta)
            .field("sinks", &self.sinks.len())
            .finish()
    }
}
