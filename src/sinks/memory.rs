//! In-memory sink writer

use parking_lot::Mutex;
use std::io;
use std::sync::Arc;

/// Clonable in-memory writer; every clone appends to the same buffer
///
/// Useful for capturing output in tests and for handing formatted records to
/// code that polls for them.
///
/// # Example
///
/// ```
/// use logr::sinks::SharedBuffer;
/// use std::io::Write;
///
/// let buffer = SharedBuffer::new();
/// let mut writer = buffer.clone();
/// writer.write_all(b"hello").unwrap();
/// assert_eq!(buffer.contents(), "hello");
/// ```
#[derive(Debug, Clone, Default)]
pub struct SharedBuffer {
    bytes: Arc<Mutex<Vec<u8>>>,
}

impl SharedBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything written so far, lossily decoded as UTF-8
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.bytes.lock()).into_owned()
    }

    /// Drain and return everything written so far
    pub fn take(&self) -> String {
        let bytes = std::mem::take(&mut *self.bytes.lock());
        String::from_utf8_lossy(&bytes).into_owned()
    }

    pub fn len(&self) -> usize {
        self.bytes.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.lock().is_empty()
    }
}

impl io::Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.bytes.lock().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_clones_share_storage() {
        let buffer = SharedBuffer::new();
        let mut a = buffer.clone();
        let mut b = buffer.clone();
        a.write_all(b"one ").unwrap();
        b.write_all(b"two").unwrap();

        assert_eq!(buffer.contents(), "one two");
        assert_eq!(buffer.len(), 7);
    }

    #[test]
    fn test_take_empties() {
        let mut buffer = SharedBuffer::new();
        buffer.write_all(b"line\n").unwrap();

        assert_eq!(buffer.take(), "line\n");
        assert!(buffer.is_empty());
        assert_eq!(buffer.take(), "");
    }
}
