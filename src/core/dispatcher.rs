//! The dispatcher: one worker that owns the sink registry and delivers records
//!
//! Producers never touch the registry. Adding a sink, removing a sink and
//! delivering a record are all messages consumed by the same worker loop,
//! which selects among its three inbound channels without priority. The
//! registry therefore needs no lock; only the channels synchronize.

use super::error::{LogrError, Result};
use super::meta::Meta;
use super::metrics::DispatchMetrics;
use super::pool::RecordPool;
use super::record::Record;
use super::registry::SinkRegistry;
use super::severity::Severity;
use super::sink::{RemoveSink, SinkConfig, SinkHandle, SinkOptions, SinkWriter};
use super::timestamp::TimestampFormat;
use chrono::Utc;
use crossbeam_channel::{bounded, select, Receiver, SendError, Sender};
use parking_lot::RwLock;
use std::collections::VecDeque;
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

/// Default record queue capacity
pub const DEFAULT_CAPACITY: usize = 10_000;

/// Default shutdown timeout for dispatcher cleanup (5 seconds)
///
/// Used when the dispatcher is dropped without explicit shutdown.
pub const DEFAULT_SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(5);

/// Polling period of [`Dispatcher::drain`]
const DRAIN_POLL_INTERVAL: Duration = Duration::from_millis(1);

/// Dispatcher settings
#[derive(Debug, Clone)]
pub struct DispatcherConfig {
    pub capacity: usize,
    pub timestamp_format: TimestampFormat,
    pub thread_name: String,
    pub shutdown_timeout: Duration,
}

impl Default for DispatcherConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            timestamp_format: TimestampFormat::default(),
            thread_name: "logr-dispatcher".to_string(),
            shutdown_timeout: DEFAULT_SHUTDOWN_TIMEOUT,
        }
    }
}

/// Items travelling through the record queue
enum Envelope {
    Deliver(Box<Record>),
    /// Acknowledged by dropping the sender once every earlier record is written
    Barrier(Sender<()>),
}

/// Registration message; the worker drops `ack` once the sink is live
struct AddSink {
    config: Arc<SinkConfig>,
    writer: SinkWriter,
    ack: Sender<()>,
}

/// State shared between producers and the worker
struct Shared {
    pool: RecordPool,
    metrics: DispatchMetrics,
    timestamp_format: TimestampFormat,
}

/// The current record queue and the worker bound to it
struct Queue {
    sender: Option<Sender<Envelope>>,
    worker: Option<JoinHandle<SinkRegistry>>,
    capacity: usize,
    add_receiver: Option<Receiver<AddSink>>,
    remove_receiver: Option<Receiver<RemoveSink>>,
}

/// Serializes all sink registration and record delivery on one worker thread
///
/// # Example
///
/// ```
/// use logr::{Dispatcher, DispatcherConfig, Severity, SinkOptions};
/// use logr::sinks::SharedBuffer;
///
/// let dispatcher = Dispatcher::start(DispatcherConfig::default()).unwrap();
/// let buffer = SharedBuffer::new();
/// let handle = dispatcher
///     .add_sink(Box::new(buffer.clone()), SinkOptions::new().filter(Severity::ALL))
///     .unwrap();
///
/// let mut record = dispatcher.acquire();
/// record.description.push_str("hello");
/// record.severity = Severity::INFO;
/// dispatcher.enqueue(record).unwrap();
/// dispatcher.flush().unwrap();
///
/// assert!(buffer.contents().contains("hello"));
/// handle.stop().unwrap();
/// ```
pub struct Dispatcher {
    shared: Arc<Shared>,
    queue: RwLock<Queue>,
    add_sender: Sender<AddSink>,
    remove_sender: Sender<RemoveSink>,
    thread_name: String,
    shutdown_timeout: Duration,
}

impl Dispatcher {
    /// Start a dispatcher worker with the given settings
    pub fn start(config: DispatcherConfig) -> Result<Self> {
        if config.capacity == 0 {
            return Err(LogrError::config(
                "Dispatcher",
                "queue capacity must be greater than zero",
            ));
        }

        // rendezvous channels: a registration message is held by the caller
        // until the worker is free to take it
        let (add_sender, add_receiver) = bounded(0);
        let (remove_sender, remove_receiver) = bounded(0);

        let shared = Arc::new(Shared {
            pool: RecordPool::new(),
            metrics: DispatchMetrics::new(),
            timestamp_format: config.timestamp_format,
        });

        let mut queue = Queue {
            sender: None,
            worker: None,
            capacity: config.capacity,
            add_receiver: Some(add_receiver),
            remove_receiver: Some(remove_receiver),
        };

        Self::spawn_worker(
            &mut queue,
            &shared,
            &config.thread_name,
            config.capacity,
            SinkRegistry::new(),
        )?;

        Ok(Self {
            shared,
            queue: RwLock::new(queue),
            add_sender,
            remove_sender,
            thread_name: config.thread_name,
            shutdown_timeout: config.shutdown_timeout,
        })
    }

    fn spawn_worker(
        queue: &mut Queue,
        shared: &Arc<Shared>,
        thread_name: &str,
        capacity: usize,
        registry: SinkRegistry,
    ) -> Result<()> {
        let (add, remove) = match (&queue.add_receiver, &queue.remove_receiver) {
            (Some(add), Some(remove)) => (add.clone(), remove.clone()),
            _ => return Err(LogrError::DispatcherStopped),
        };
        let (sender, records) = bounded(capacity);

        let worker = Worker {
            registry,
            shared: Arc::clone(shared),
        };
        let inbox = Inbox {
            records,
            add,
            remove,
        };
        let handle = thread::Builder::new()
            .name(thread_name.to_string())
            .spawn(move || worker.run(inbox))?;

        queue.sender = Some(sender);
        queue.worker = Some(handle);
        queue.capacity = capacity;
        Ok(())
    }

    /// Register `writer` with the filter and formatter from `options`
    ///
    /// Returns once the sink is in the registry, so every record enqueued
    /// afterwards is matched against it.
    pub fn add_sink(&self, writer: SinkWriter, options: SinkOptions) -> Result<SinkHandle> {
        let config = Arc::new(options.build());
        let (ack, done) = bounded::<()>(0);
        self.add_sender
            .send(AddSink {
                config: Arc::clone(&config),
                writer,
                ack,
            })
            .map_err(|_| LogrError::DispatcherStopped)?;
        // closed, never sent on
        let _ = done.recv();
        Ok(SinkHandle::new(config, self.remove_sender.clone()))
    }

    /// Take a zeroed record from the pool
    pub fn acquire(&self) -> Box<Record> {
        self.shared.pool.acquire()
    }

    /// Return an unsent record to the pool
    pub fn release(&self, record: Box<Record>) {
        self.shared.pool.release(record);
    }

    /// Populate a pooled record with the current time and the given content
    pub fn prepare(&self, severity: Severity, description: &str, meta: &Meta) -> Box<Record> {
        let mut record = self.acquire();
        record.populate(
            severity,
            &Utc::now(),
            &self.shared.timestamp_format,
            description,
            meta,
        );
        record
    }

    /// Hand a record to the worker, blocking while the queue is full
    ///
    /// After shutdown the record is recycled and `DispatcherStopped` returned.
    pub fn enqueue(&self, record: Box<Record>) -> Result<()> {
        let queue = self.queue.read();
        let Some(sender) = queue.sender.as_ref() else {
            drop(queue);
            self.shared.pool.release(record);
            return Err(LogrError::DispatcherStopped);
        };

        match sender.send(Envelope::Deliver(record)) {
            Ok(()) => {
                self.shared.metrics.record_enqueued();
                Ok(())
            }
            Err(SendError(envelope)) => {
                drop(queue);
                if let Envelope::Deliver(record) = envelope {
                    self.shared.pool.release(record);
                }
                Err(LogrError::DispatcherStopped)
            }
        }
    }

    /// Records waiting in the queue
    pub fn queue_len(&self) -> usize {
        self.queue.read().sender.as_ref().map_or(0, |s| s.len())
    }

    pub fn capacity(&self) -> usize {
        self.queue.read().capacity
    }

    pub fn timestamp_format(&self) -> &TimestampFormat {
        &self.shared.timestamp_format
    }

    /// Block until the queue is observed empty, polling every millisecond
    ///
    /// The last dequeued record may still be in the middle of its sink
    /// writes when this returns; use [`flush`](Self::flush) for a hard
    /// barrier.
    pub fn drain(&self) {
        while self.queue_len() > 0 {
            thread::sleep(DRAIN_POLL_INTERVAL);
        }
    }

    /// Block until every record enqueued before this call has been written
    /// and every sink writer flushed
    pub fn flush(&self) -> Result<()> {
        let (ack, done) = bounded::<()>(0);
        {
            let queue = self.queue.read();
            let sender = queue.sender.as_ref().ok_or(LogrError::DispatcherStopped)?;
            sender
                .send(Envelope::Barrier(ack))
                .map_err(|_| LogrError::DispatcherStopped)?;
        }
        // the worker drops the ack sender instead of sending on it
        let _ = done.recv();
        Ok(())
    }

    /// Replace the record queue with a new one of `capacity`
    ///
    /// The old queue stops accepting records and is drained by its worker,
    /// whose registry is handed to a new worker bound to the new queue.
    /// Producers enqueueing meanwhile block until the swap completes.
    pub fn set_capacity(&self, capacity: usize) -> Result<()> {
        if capacity == 0 {
            return Err(LogrError::config(
                "Dispatcher",
                "queue capacity must be greater than zero",
            ));
        }

        let mut queue = self.queue.write();
        let registry = Self::stop_worker(&mut queue)?;
        Self::spawn_worker(&mut queue, &self.shared, &self.thread_name, capacity, registry)?;
        self.shared.metrics.record_queue_swap();
        Ok(())
    }

    fn stop_worker(queue: &mut Queue) -> Result<SinkRegistry> {
        drop(queue.sender.take());
        let handle = queue.worker.take().ok_or(LogrError::DispatcherStopped)?;
        handle.join().map_err(|payload| match LogrError::sink_panicked(&*payload) {
            LogrError::SinkPanicked { message } => LogrError::WorkerPanicked(message),
            other => other,
        })
    }

    pub fn metrics(&self) -> &DispatchMetrics {
        &self.shared.metrics
    }

    pub fn pool_stats(&self) -> super::pool::PoolStats {
        self.shared.pool.stats()
    }

    pub fn is_running(&self) -> bool {
        self.queue.read().sender.is_some()
    }

    /// Stop accepting records, let the worker drain the queue and join it
    ///
    /// Returns `true` if the worker finished within `timeout`. Later sink
    /// registrations and enqueues fail with `DispatcherStopped`.
    pub fn shutdown(&self, timeout: Duration) -> bool {
        let handle = {
            let mut queue = self.queue.write();
            drop(queue.sender.take());
            queue.add_receiver = None;
            queue.remove_receiver = None;
            queue.worker.take()
        };

        let Some(handle) = handle else {
            return true;
        };

        let start = Instant::now();
        loop {
            if handle.is_finished() {
                if let Err(e) = handle.join() {
                    eprintln!("[LOGR ERROR] Dispatcher worker panicked during shutdown: {:?}", e);
                    return false;
                }
                return true;
            }

            if start.elapsed() >= timeout {
                eprintln!(
                    "[LOGR WARNING] Dispatcher worker did not finish within {:?}. \
                     Some records may be lost.",
                    timeout
                );
                return false;
            }

            thread::sleep(Duration::from_millis(10));
        }
    }
}

impl Drop for Dispatcher {
    fn drop(&mut self) {
        self.shutdown(self.shutdown_timeout);

        let failures = self.shared.metrics.write_failures();
        if failures > 0 {
            eprintln!(
                "[LOGR WARNING] Dispatcher shutting down after {} failed sink writes (failure rate: {:.2}%)",
                failures,
                self.shared.metrics.failure_rate()
            );
        }
    }
}

/// Channels served by one worker
struct Inbox {
    records: Receiver<Envelope>,
    add: Receiver<AddSink>,
    remove: Receiver<RemoveSink>,
}

/// The single consumer of a record queue
struct Worker {
    registry: SinkRegistry,
    shared: Arc<Shared>,
}

impl Worker {
    /// Serve messages until the record queue is closed and empty
    fn run(mut self, inbox: Inbox) -> SinkRegistry {
        loop {
            select! {
                recv(inbox.add) -> msg => {
                    if let Ok(AddSink { config, writer, ack }) = msg {
                        self.registry.insert(config, writer);
                        self.shared.metrics.set_sinks(self.registry.len());
                        drop(ack);
                    }
                }
                recv(inbox.remove) -> msg => {
                    if let Ok(RemoveSink { config, ack }) = msg {
                        self.registry.remove(&config);
                        self.shared.metrics.set_sinks(self.registry.len());
                        drop(ack);
                    }
                }
                recv(inbox.records) -> msg => match msg {
                    Ok(Envelope::Deliver(record)) => self.deliver(record),
                    Ok(Envelope::Barrier(ack)) => {
                        self.registry.flush();
                        self.shared.metrics.record_barrier();
                        drop(ack);
                    }
                    Err(_) => break,
                },
            }
        }
        self.registry
    }

    /// Deliver a record, then any failure reports it caused
    ///
    /// Failure reports are Error-severity records dispatched like any other,
    /// so a failing sink that accepts errors hears about its own failure.
    fn deliver(&mut self, record: Box<Record>) {
        let mut pending = VecDeque::from([record]);

        while let Some(mut record) = pending.pop_front() {
            let failures = self.registry.dispatch(&record, &self.shared.metrics);
            for failure in failures {
                pending.push_back(self.failure_record(&failure));
            }

            record.complete();
            self.shared.metrics.record_delivered();
            self.shared.pool.release(record);
        }
    }

    fn failure_record(&self, failure: &LogrError) -> Box<Record> {
        let mut record = self.shared.pool.acquire();
        record.populate(
            Severity::ERROR,
            &Utc::now(),
            &self.shared.timestamp_format,
            &failure.to_string(),
            &Meta::new(),
        );
        record
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sinks::SharedBuffer;
    use std::io;

    struct FailingWriter;

    impl io::Write for FailingWriter {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::Other, "sink unavailable"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn dispatcher() -> Dispatcher {
        Dispatcher::start(DispatcherConfig::default()).expect("dispatcher starts")
    }

    fn send(dispatcher: &Dispatcher, severity: Severity, text: &str) {
        let record = dispatcher.prepare(severity, text, &Meta::new());
        dispatcher.enqueue(record).expect("enqueue");
    }

    #[test]
    fn test_zero_capacity_rejected() {
        let config = DispatcherConfig {
            capacity: 0,
            ..DispatcherConfig::default()
        };
        assert!(matches!(
            Dispatcher::start(config),
            Err(LogrError::InvalidConfiguration { .. })
        ));
    }

    #[test]
    fn test_add_then_stop_sink() {
        let dispatcher = dispatcher();
        let buffer = SharedBuffer::new();
        let handle = dispatcher
            .add_sink(Box::new(buffer.clone()), SinkOptions::new())
            .unwrap();
        assert_eq!(dispatcher.metrics().sinks(), 1);

        send(&dispatcher, Severity::INFO, "first");
        dispatcher.flush().unwrap();
        assert_eq!(buffer.take().lines().count(), 1);

        handle.stop().unwrap();
        send(&dispatcher, Severity::INFO, "second");
        dispatcher.flush().unwrap();
        assert!(buffer.is_empty());
        assert_eq!(dispatcher.metrics().sinks(), 0);
    }

    #[test]
    fn test_sinks_gauge_settled_when_calls_return() {
        let dispatcher = dispatcher();
        for expected in 1..=3 {
            let handle = dispatcher
                .add_sink(Box::new(SharedBuffer::new()), SinkOptions::new())
                .unwrap();
            assert_eq!(dispatcher.metrics().sinks(), 1);
            handle.stop().unwrap();
            assert_eq!(dispatcher.metrics().sinks(), 0, "cycle {}", expected);
        }
    }

    #[test]
    fn test_flush_before_stop_delivers_earlier_records() {
        let dispatcher = dispatcher();
        let buffer = SharedBuffer::new();
        let handle = dispatcher
            .add_sink(Box::new(buffer.clone()), SinkOptions::new())
            .unwrap();

        for i in 0..20 {
            send(&dispatcher, Severity::INFO, &format!("queued {}", i));
        }
        dispatcher.flush().unwrap();
        handle.stop().unwrap();

        assert_eq!(buffer.contents().lines().count(), 20);
    }

    #[test]
    fn test_completion_signalled_after_delivery() {
        let dispatcher = dispatcher();
        let buffer = SharedBuffer::new();
        dispatcher
            .add_sink(Box::new(buffer.clone()), SinkOptions::new())
            .unwrap();

        let mut record = dispatcher.prepare(Severity::PANIC, "fatal", &Meta::new());
        let completion = record.attach_completion();
        dispatcher.enqueue(record).unwrap();

        completion.wait();
        assert!(buffer.contents().contains("fatal"));
    }

    #[test]
    fn test_write_failure_is_self_reported() {
        let dispatcher = dispatcher();
        let errors = SharedBuffer::new();
        dispatcher
            .add_sink(Box::new(FailingWriter), SinkOptions::new().filter(Severity::INFO))
            .unwrap();
        dispatcher
            .add_sink(Box::new(errors.clone()), SinkOptions::new().filter(Severity::CRITICAL))
            .unwrap();

        send(&dispatcher, Severity::INFO, "lost line");
        dispatcher.flush().unwrap();

        let report = errors.contents();
        assert!(report.contains("| E | failed to write message to sink: sink unavailable"));
        assert_eq!(dispatcher.metrics().write_failures(), 1);
        assert_eq!(dispatcher.metrics().delivered(), 2);
    }

    #[test]
    fn test_drain_reaches_zero() {
        let dispatcher = dispatcher();
        dispatcher
            .add_sink(Box::new(SharedBuffer::new()), SinkOptions::new())
            .unwrap();
        for i in 0..100 {
            send(&dispatcher, Severity::DEBUG, &format!("line {}", i));
        }
        dispatcher.drain();
        assert_eq!(dispatcher.queue_len(), 0);
    }

    #[test]
    fn test_set_capacity_keeps_sinks() {
        let dispatcher = dispatcher();
        let buffer = SharedBuffer::new();
        dispatcher
            .add_sink(Box::new(buffer.clone()), SinkOptions::new())
            .unwrap();

        send(&dispatcher, Severity::INFO, "before swap");
        dispatcher.set_capacity(4).unwrap();
        assert_eq!(dispatcher.capacity(), 4);
        send(&dispatcher, Severity::INFO, "after swap");
        dispatcher.flush().unwrap();

        let contents = buffer.contents();
        assert!(contents.contains("before swap"));
        assert!(contents.contains("after swap"));
        assert_eq!(dispatcher.metrics().queue_swaps(), 1);
        assert!(dispatcher.set_capacity(0).is_err());
    }

    #[test]
    fn test_shutdown_delivers_pending_then_rejects() {
        let dispatcher = dispatcher();
        let buffer = SharedBuffer::new();
        dispatcher
            .add_sink(Box::new(buffer.clone()), SinkOptions::new())
            .unwrap();
        for i in 0..10 {
            send(&dispatcher, Severity::INFO, &format!("pending {}", i));
        }

        assert!(dispatcher.shutdown(Duration::from_secs(5)));
        assert_eq!(buffer.contents().lines().count(), 10);
        assert!(!dispatcher.is_running());

        let record = dispatcher.prepare(Severity::INFO, "too late", &Meta::new());
        assert!(matches!(dispatcher.enqueue(record), Err(LogrError::DispatcherStopped)));
        assert!(dispatcher.flush().is_err());
        assert!(dispatcher
            .add_sink(Box::new(SharedBuffer::new()), SinkOptions::new())
            .is_err());
    }

    #[test]
    fn test_records_return_to_pool() {
        let dispatcher = dispatcher();
        for _ in 0..5 {
            send(&dispatcher, Severity::INFO, "recycled");
            dispatcher.flush().unwrap();
        }
        let stats = dispatcher.pool_stats();
        assert_eq!(stats.allocations + stats.reuses, 5);
        assert!(stats.reuses >= 4);
    }
}
