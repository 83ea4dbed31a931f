//! Basic logr usage example
//!
//! Demonstrates console sinks, severity filters and metadata handles.
//!
//! Run with: cargo run --example basic_usage

use logr::prelude::*;
use logr::{info, warn};

fn main() -> Result<()> {
    println!("=== logr - Basic Usage Example ===\n");

    // Create a logger with a coloured console sink accepting everything
    let logger = Logger::builder()
        .sink(
            ConsoleSink::stdout(),
            SinkOptions::new()
                .output_format(OutputFormat::Coloured)
                .filter(Severity::ALL),
        )
        .build()?;

    // Log messages at different levels
    println!("1. Logging at different levels:");
    logger.debug("This is a debug message");
    logger.info("This is an info message");
    logger.success("This is a success message");
    logger.warn("This is a warning message");
    logger.error("This is an error message");
    logger.flush()?;

    // A second sink that only accepts warnings and worse
    println!("\n2. A stderr sink filtered by label \"warning\":");
    let monitor = logger.add_sink(
        ConsoleSink::stderr(),
        SinkOptions::new().filter_label("warning")?,
    )?;
    logger.info("Info reaches stdout only");
    logger.warn("Warning reaches both sinks");
    logger.flush()?;
    monitor.stop()?;

    // Derived handles carry metadata without touching the parent
    println!("\n3. Metadata handles:");
    let request = logger.with(meta("request_id", "r-42")).with_field("user", 7);
    let code = info!(request, "Handling {} items", 3);
    warn!(logger; "parent handle has no metadata, previous code was", code);
    logger.flush()?;

    println!("\n=== Example completed successfully! ===");

    Ok(())
}
