//! Sink writer implementations
//!
//! Any `std::io::Write + Send` value can be registered as a sink; these are
//! the bundled ones.

pub mod console;
pub mod file;
pub mod memory;

pub use console::ConsoleSink;
pub use file::FileSink;
pub use memory::SharedBuffer;
