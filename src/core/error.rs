//! Error types for the logr engine

pub type Result<T> = std::result::Result<T, LogrError>;

#[derive(Debug, thiserror::Error)]
pub enum LogrError {
    /// Severity label outside the fixed vocabulary
    #[error(
        "logr label `{label}` not found in supported types \
         (none, panic, error, warning, info, success, debug, critical, monitor, verbose, all)"
    )]
    UnsupportedLabel { label: String },

    /// Invalid configuration with details
    #[error("Invalid configuration for {component}: {message}")]
    InvalidConfiguration { component: String, message: String },

    /// A sink's writer rejected a formatted record
    #[error("failed to write message to sink: {message}")]
    WriteFailed {
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// A sink's formatter or writer panicked
    #[error("sink panicked while handling a record: {message}")]
    SinkPanicked { message: String },

    /// Generic IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The record queue is closed
    #[error("Dispatcher already stopped")]
    DispatcherStopped,

    /// The dispatcher worker thread panicked
    #[error("Dispatcher worker panicked: {0}")]
    WorkerPanicked(String),
}

impl LogrError {
    /// Create an unsupported label error
    pub fn unsupported_label(label: impl Into<String>) -> Self {
        LogrError::UnsupportedLabel {
            label: label.into(),
        }
    }

    /// Create an invalid configuration error
    pub fn config(component: impl Into<String>, message: impl Into<String>) -> Self {
        LogrError::InvalidConfiguration {
            component: component.into(),
            message: message.into(),
        }
    }

    /// Create a sink write error
    pub fn write_failed(source: std::io::Error) -> Self {
        LogrError::WriteFailed {
            message: source.to_string(),
            source,
        }
    }

    /// Create a sink panic error from a `catch_unwind` payload
    pub fn sink_panicked(payload: &(dyn std::any::Any + Send)) -> Self {
        let message = if let Some(s) = payload.downcast_ref::<&str>() {
            s.to_string()
        } else if let Some(s) = payload.downcast_ref::<String>() {
            s.clone()
        } else {
            "Unknown panic".to_string()
        };
        LogrError::SinkPanicked { message }
    }
}
