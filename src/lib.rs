//! # logr
//!
//! An in-process log distribution engine. Producers on any thread hand
//! records to a single dispatcher worker, which owns the registered sinks and
//! writes each record to every sink whose severity filter accepts it.
//!
//! ## Features
//!
//! - **Bitmask severities**: a sink filter is a set of levels; labels such as
//!   `"warning"` select a level and everything more severe
//! - **Lock-free registry**: sinks are added and removed by message, on the
//!   same worker that delivers records
//! - **Pooled records**: records are recycled rather than reallocated
//! - **Copy-on-write metadata**: derived handles carry their own fields
//! - **Guaranteed fatal delivery**: panic-severity records reach every sink
//!   before the caller panics
//!
//! ## Example
//!
//! ```
//! use logr::prelude::*;
//! use logr::sinks::SharedBuffer;
//!
//! let buffer = SharedBuffer::new();
//! let logger = Logger::builder()
//!     .sink(buffer.clone(), SinkOptions::new().filter_label("info").unwrap())
//!     .build()
//!     .unwrap();
//!
//! logger.info("Server started");
//! logger.debug("not accepted by an info filter");
//! logger.flush().unwrap();
//!
//! assert!(buffer.contents().contains("| I | Server started"));
//! assert!(!buffer.contents().contains("not accepted"));
//! ```

pub mod core;
pub mod macros;
pub mod sinks;

pub mod prelude {
    pub use crate::core::{
        meta, Completion, DispatchMetrics, Dispatcher, DispatcherConfig, Logger, LogrBuilder,
        LogrError, Meta, MetaValue, OutputFormat, Record, Result, Severity, SinkHandle,
        SinkOptions, TimestampFormat,
    };
    pub use crate::sinks::{ConsoleSink, FileSink};
}

pub use crate::core::global;
pub use crate::core::{
    format_default, format_json, format_logfmt, format_with_colours, generate_code, join_args,
    meta, Completion, DispatchMetrics, Dispatcher, DispatcherConfig, Formatter, Logger,
    LogrBuilder, LogrError, Meta, MetaValue, OutputFormat, PoolStats, Record, RecordPool, Result,
    Severity, SinkConfig, SinkHandle, SinkId, SinkOptions, SinkWriter, TimestampFormat,
    DEFAULT_CAPACITY, DEFAULT_SHUTDOWN_TIMEOUT,
};
