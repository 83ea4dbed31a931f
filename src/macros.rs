//! Logging macros for ergonomic record formatting.
//!
//! Every macro takes the logger first and accepts two argument forms:
//!
//! - `info!(logger, "fmt {}", arg)` formats like `format!`
//! - `info!(logger; a, b, c)` joins displayable values with single spaces
//!
//! All of them evaluate to the emitted record's code, except [`fatal!`]
//! which panics after the record is delivered.
//!
//! # Examples
//!
//! ```
//! use logr::prelude::*;
//! use logr::info;
//!
//! let logger = Logger::new().unwrap();
//!
//! // Format substitution
//! let port = 8080;
//! info!(logger, "Server listening on port {}", port);
//!
//! // Joined arguments
//! let code = info!(logger; "listening on", port);
//! assert!(!code.is_empty());
//! ```

/// Emit a record at an explicit severity.
///
/// # Examples
///
/// ```
/// # use logr::prelude::*;
/// # let logger = Logger::new().unwrap();
/// use logr::log;
/// log!(logger, Severity::INFO, "Simple message");
/// log!(logger, Severity::ERROR, "Error code: {}", 500);
/// log!(logger, Severity::DEBUG; "joined", 1, 2);
/// ```
#[macro_export]
macro_rules! log {
    ($logger:expr, $severity:expr; $($arg:expr),+ $(,)?) => {
        $logger.log(
            $severity,
            $crate::join_args(&[$(&$arg as &dyn ::std::fmt::Display),+]),
        )
    };
    ($logger:expr, $severity:expr, $($arg:tt)+) => {
        $logger.log($severity, format!($($arg)+))
    };
}

/// Emit an error record.
///
/// ```
/// # use logr::prelude::*;
/// # let logger = Logger::new().unwrap();
/// use logr::error;
/// error!(logger, "Connection refused");
/// error!(logger; "status", 503);
/// ```
#[macro_export]
macro_rules! error {
    ($logger:expr; $($arg:expr),+ $(,)?) => {
        $crate::log!($logger, $crate::Severity::ERROR; $($arg),+)
    };
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::Severity::ERROR, $($arg)+)
    };
}

/// Emit a warning record.
#[macro_export]
macro_rules! warn {
    ($logger:expr; $($arg:expr),+ $(,)?) => {
        $crate::log!($logger, $crate::Severity::WARNING; $($arg),+)
    };
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::Severity::WARNING, $($arg)+)
    };
}

/// Emit an info record.
#[macro_export]
macro_rules! info {
    ($logger:expr; $($arg:expr),+ $(,)?) => {
        $crate::log!($logger, $crate::Severity::INFO; $($arg),+)
    };
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::Severity::INFO, $($arg)+)
    };
}

/// Emit a debug record.
#[macro_export]
macro_rules! debug {
    ($logger:expr; $($arg:expr),+ $(,)?) => {
        $crate::log!($logger, $crate::Severity::DEBUG; $($arg),+)
    };
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::Severity::DEBUG, $($arg)+)
    };
}

/// Emit a success record.
#[macro_export]
macro_rules! success {
    ($logger:expr; $($arg:expr),+ $(,)?) => {
        $crate::log!($logger, $crate::Severity::SUCCESS; $($arg),+)
    };
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::Severity::SUCCESS, $($arg)+)
    };
}

/// Emit a panic record, wait until every sink has seen it, then panic with
/// the record's code as payload.
///
/// ```should_panic
/// # use logr::prelude::*;
/// # let logger = Logger::new().unwrap();
/// use logr::fatal;
/// fatal!(logger, "Invariant broken: {}", "queue lost");
/// ```
#[macro_export]
macro_rules! fatal {
    ($logger:expr; $($arg:expr),+ $(,)?) => {
        $logger.panic($crate::join_args(&[$(&$arg as &dyn ::std::fmt::Display),+]))
    };
    ($logger:expr, $($arg:tt)+) => {
        $logger.panic(format!($($arg)+))
    };
}
