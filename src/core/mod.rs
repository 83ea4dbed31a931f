//! Core engine types

pub mod dispatcher;
pub mod error;
pub mod global;
pub mod logger;
pub mod meta;
pub mod metrics;
pub mod output_format;
pub mod pool;
pub mod record;
pub(crate) mod registry;
pub mod severity;
pub mod sink;
pub mod timestamp;

pub use dispatcher::{
    Dispatcher, DispatcherConfig, DEFAULT_CAPACITY, DEFAULT_SHUTDOWN_TIMEOUT,
};
pub use error::{LogrError, Result};
pub use logger::{join_args, Logger, LogrBuilder};
pub use meta::{meta, Meta, MetaValue};
pub use metrics::DispatchMetrics;
pub use output_format::{
    format_default, format_json, format_logfmt, format_with_colours, OutputFormat,
};
pub use pool::{PoolStats, RecordPool};
pub use record::{generate_code, Completion, Record};
pub use severity::Severity;
pub use sink::{Formatter, SinkConfig, SinkHandle, SinkId, SinkOptions, SinkWriter};
pub use timestamp::TimestampFormat;
