//! Process-wide default logger
//!
//! Nothing inside the engine reads this slot. Applications install a logger
//! explicitly at startup and may swap it (tests do); libraries should prefer
//! taking a [`Logger`] as a parameter.

use super::logger::Logger;
use parking_lot::RwLock;

static DEFAULT: RwLock<Option<Logger>> = parking_lot::const_rwlock(None);

/// Install `logger` as the default, returning the previous one
pub fn set_default(logger: Logger) -> Option<Logger> {
    DEFAULT.write().replace(logger)
}

/// A clone of the installed default, if any
pub fn default_logger() -> Option<Logger> {
    DEFAULT.read().clone()
}

/// Remove and return the installed default
///
/// Dropping the returned handle (if it is the last one) shuts its
/// dispatcher down.
pub fn take_default() -> Option<Logger> {
    DEFAULT.write().take()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::meta::meta;

    // single test: the slot is shared by every test in the binary
    #[test]
    fn test_install_swap_and_take() {
        take_default();

        let first = Logger::builder().meta(meta("slot", "first")).build().unwrap();
        let second = Logger::builder().meta(meta("slot", "second")).build().unwrap();

        assert!(set_default(first).is_none());
        let current = default_logger().expect("installed");
        assert_eq!(current.meta().get("slot").map(|v| v.to_string()), Some("first".into()));

        let previous = set_default(second).expect("previous logger returned");
        assert_eq!(previous.meta().get("slot").map(|v| v.to_string()), Some("first".into()));

        let taken = take_default().expect("installed");
        assert_eq!(taken.meta().get("slot").map(|v| v.to_string()), Some("second".into()));
        assert!(default_logger().is_none());
    }
}
