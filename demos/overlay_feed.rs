//! Overlay feed example
//!
//! Demonstrates the live overlay: a host thread subscribes and renders
//! entries while the overlay is toggled on and off.
//!
//! Run with: cargo run --example overlay_feed

use factory_diagnostics::prelude::*;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

fn main() -> Result<()> {
    println!("=== Factory Diagnostics - Overlay Feed Example ===\n");

    let logger = Arc::new(
        Logger::builder()
            .threshold(LogLevel::Debug)
            .console_enabled(false)
            .overlay_capacity(10)
            .build(),
    );

    // The host owns rendering; here it just prints what arrives
    let feed = logger.subscribe_overlay(64);
    let renderer = thread::spawn(move || {
        while let Ok(entry) = feed.recv_timeout(Duration::from_millis(200)) {
            println!("   overlay | {} [{}] {}", entry.level, entry.component, entry.message);
        }
    });

    println!("1. Overlay hidden, nothing is streamed:");
    logger.info("Sensor", "Warm-up reading");

    println!("\n2. Overlay shown:");
    logger.enable_overlay();
    for i in 0..5 {
        logger.debug("Sensor", format!("Pressure sample {}", i));
    }
    logger.warn("Reactor", "Temperature high");

    thread::sleep(Duration::from_millis(50));
    logger.disable_overlay();
    logger.info("Sensor", "Not streamed");

    let _ = renderer.join();

    println!("\n3. Buffered overlay entries:");
    for entry in logger.drain_overlay() {
        println!("   {}", entry.message);
    }
    println!("   retained window holds {} entries", logger.get_stats().total);

    println!("\n=== Example completed successfully! ===");

    Ok(())
}
