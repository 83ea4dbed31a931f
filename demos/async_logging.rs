//! Concurrent logging example
//!
//! Demonstrates many producer threads sharing one dispatcher, queue
//! reconfiguration and the fatal path.
//!
//! Run with: cargo run --example async_logging

use logr::prelude::*;
use std::panic::{self, AssertUnwindSafe};
use std::thread;
use std::time::Duration;

fn main() -> Result<()> {
    println!("=== logr - Concurrent Logging Example ===\n");

    let logger = Logger::builder()
        .capacity(1000)
        .thread_name("demo-dispatcher")
        .sink(ConsoleSink::stdout(), SinkOptions::new().filter_label("info")?)
        .sink(FileSink::new("async_test.log")?, SinkOptions::new())
        .build()?;

    println!("1. Queued logging:");
    for i in 0..100 {
        logger.debug(format!("Message #{}", i));
    }
    logger.drain();
    println!("   Logged 100 messages, queue depth now {}", logger.dispatcher().queue_len());

    println!("\n2. Multi-threaded logging:");
    let mut handles = vec![];
    for thread_id in 0..5 {
        let logger = logger.with_field("thread", thread_id);
        let handle = thread::spawn(move || {
            for i in 0..20 {
                logger.info(format!("Thread {} - Message {}", thread_id, i));
                thread::sleep(Duration::from_millis(10));
            }
        });
        handles.push(handle);
    }

    // Shrink the queue while producers are running
    logger.set_capacity(8)?;

    for handle in handles {
        if handle.join().is_err() {
            eprintln!("producer thread panicked");
        }
    }
    logger.flush()?;
    println!("   5 threads logged 20 messages each");

    println!("\n3. Fatal path (caught):");
    let result = panic::catch_unwind(AssertUnwindSafe(|| {
        logger.panic("Unrecoverable state");
    }));
    if let Err(payload) = result {
        if let Some(code) = payload.downcast_ref::<String>() {
            println!("   Panicked after delivering record {}", code);
        }
    }

    let metrics = logger.metrics();
    println!(
        "\n   enqueued={} delivered={} writes={} failures={}",
        metrics.enqueued(),
        metrics.delivered(),
        metrics.writes(),
        metrics.write_failures()
    );

    println!("\n=== Example completed successfully! ===");
    println!("Check 'async_test.log' for file output");

    Ok(())
}
