//! File logging example
//!
//! Demonstrates file sinks with text, JSON and logfmt output.
//!
//! Run with: cargo run --example file_logging

use logr::prelude::*;

fn main() -> Result<()> {
    println!("=== logr - File Logging Example ===\n");

    let logger = Logger::builder()
        .timestamp_format(TimestampFormat::Iso8601)
        .meta(meta("application", "file_logging"))
        .build()?;

    // Text file with every record
    println!("1. Plain text file (app.log):");
    logger.add_sink(FileSink::new("app.log")?, SinkOptions::new())?;

    // JSON lines with errors only
    println!("2. JSON file for critical records (errors.json):");
    logger.add_sink(
        FileSink::new("errors.json")?,
        SinkOptions::new()
            .output_format(OutputFormat::Json)
            .filter(Severity::CRITICAL),
    )?;

    // Logfmt with short-code filter: warnings and info only
    println!("3. Logfmt file for W and I records (events.logfmt):");
    logger.add_sink(
        FileSink::new("events.logfmt")?,
        SinkOptions::new()
            .output_format(OutputFormat::Logfmt)
            .filter_codes("WI"),
    )?;

    for i in 0..10 {
        logger.info(format!("Processing item {}", i));
    }
    logger.warn("Cache nearly full");
    logger.with_field("attempt", 3).error("Upstream timed out");
    logger.debug("Only in app.log");

    // Barrier: every record above is written and the files are flushed
    logger.flush()?;

    println!("\n=== Example completed successfully! ===");
    println!("Check app.log, errors.json and events.logfmt");

    Ok(())
}
