//! Basic logger usage example
//!
//! Demonstrates console logging, level changes and component handles.
//!
//! Run with: cargo run --example basic_usage

use factory_diagnostics::prelude::*;
use factory_diagnostics::{info, warn};
use serde_json::json;
use std::sync::Arc;

fn main() -> Result<()> {
    println!("=== Factory Diagnostics - Basic Usage Example ===\n");

    // One logger for the whole process, handed to every subsystem
    let logger = Arc::new(Logger::new(LoggerConfig::for_mode(BuildMode::detect())));

    println!("1. Logging at different levels:");
    logger.debug("Sensor", "This is a debug message");
    logger.info("Batch", "This is an info message");
    logger.warn("Reactor", "This is a warning message");
    logger.error("Pump", "This is an error message");
    logger.critical("Reactor", "This is a critical message");

    println!("\n2. Logging with a higher threshold:");
    logger.set_level(LogLevel::Warn);
    println!("   Threshold set to WARN - debug and info won't show:");
    logger.debug("Sensor", "Debug message (hidden)");
    logger.info("Batch", "Info message (hidden)");
    logger.warn("Reactor", "Warning message (visible)");

    println!("\n3. Structured data and error details:");
    logger.set_level(LogLevel::Info);
    logger.info_with("Inventory", "Stock level updated", json!({"sku": "BOLT-M8", "count": 1200}));
    logger.error_with(
        "Supplier",
        "Delivery rejected",
        Some(json!({"supplier": "Acme Metals", "order": 4411})),
        Some(ErrorInfo::new("certificate missing")),
    );

    println!("\n4. Component handles and macros:");
    let reactor = logger.component("Reactor-3");
    reactor.info("Coolant loop nominal");
    info!(logger, "Batch", "Batch {} finished in {}s", 17, 42);
    warn!(logger, "Batch", "Batch {} yield below target", 18);

    println!("\n5. Querying the retained window:");
    let stats = logger.get_stats();
    println!("   total={} by_level={:?}", stats.total, stats.by_level);
    let errors = logger.get_logs(Some(&LogFilter::new().min_level(LogLevel::Error)));
    println!("   {} entries at ERROR or above", errors.len());

    println!("\n=== Example completed successfully! ===");

    Ok(())
}
