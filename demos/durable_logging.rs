//! Durable logging example
//!
//! Demonstrates a file-backed slot that survives restarts, a background
//! writer and compressed exports.
//!
//! Run with: cargo run --example durable_logging

use factory_diagnostics::prelude::*;

fn main() -> Result<()> {
    println!("=== Factory Diagnostics - Durable Logging Example ===\n");

    let dir = std::env::temp_dir().join("factory-diagnostics-demo");

    println!("1. First run writes through a background slot:");
    {
        let slot = BackgroundSlot::new(FileSlot::new(&dir, "factory-dashboard-logs")?);
        let logger = Logger::builder().max_persisted(5).durable_slot(slot).build();

        logger.info("Shift", "Morning shift started");
        logger.warn("Line-4", "Conveyor speed below target");
        logger.error("Line-4", "Conveyor stopped");
        logger.flush()?;
    }

    println!("\n2. Second run picks up where the first left off:");
    let logger = Logger::builder()
        .console_enabled(false)
        .durable_slot(FileSlot::new(&dir, "factory-dashboard-logs")?)
        .build();
    for entry in logger.get_logs(None) {
        println!("   restored: {} [{}] {}", entry.level, entry.component, entry.message);
    }

    println!("\n3. Exporting the window:");
    let plain = logger.export_to_file(&dir, false)?;
    let compressed = logger.export_to_file(&dir, true)?;
    println!("   {}", plain.display());
    println!("   {}", compressed.display());

    logger.clear_logs();
    println!("\n=== Example completed successfully! ===");

    Ok(())
}
