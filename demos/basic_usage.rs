//! Basic worker pool usage example
//!
//! Demonstrates running a batch through a pool, handling outcomes, and
//! reading the run summary.
//!
//! Run with: RUST_LOG=debug cargo run --example basic_usage

use batch_worker_pool::prelude::*;
use std::thread;
use std::time::Duration;

fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    println!("=== Batch Worker Pool - Basic Usage Example ===\n");

    let words = vec!["alpha", "beta", "", "delta", "epsilon", "", "eta", "theta"];

    // Create a pool with 4 worker threads
    let config = WorkerPoolConfig::new(4).with_thread_name_prefix("words");
    let pool = WorkerPool::with_config(config)?;
    println!("1. Created worker pool with {} workers", pool.num_workers());

    println!("\n2. Running {} items:", words.len());
    let mut lengths = Vec::new();
    let summary = pool.start(
        words,
        |word: &&str| {
            thread::sleep(Duration::from_millis(20));
            if word.is_empty() {
                Err("empty word".to_string())
            } else {
                Ok(())
            }
        },
        |outcome: Outcome<&str, String>| -> std::result::Result<(), String> {
            match outcome.processor_error() {
                None => {
                    println!("  item {} ok: {}", outcome.id(), outcome.payload());
                    lengths.push(outcome.payload().len());
                }
                Some(err) => println!("  item {} failed: {}", outcome.id(), err),
            }
            Ok(())
        },
    )?;

    println!("\n3. Run statistics:");
    println!("   Items submitted: {}", summary.items_submitted);
    println!("   Items succeeded: {}", summary.items_succeeded());
    println!("   Items failed: {}", summary.items_failed);
    println!("   Total length of good words: {}", lengths.iter().sum::<usize>());

    println!("\n4. Per-worker statistics:");
    for stat in &summary.workers {
        println!(
            "   Worker {}: {} processed, {} failed",
            stat.worker_id, stat.items_processed, stat.items_failed
        );
    }

    println!("\n5. Summary as JSON:\n{}", summary.to_json()?);

    // A pool runs once
    let again = pool.start(Vec::<&str>::new(), |_: &&str| Ok::<(), String>(()), |_| {
        Ok::<(), String>(())
    });
    if let Err(e) = again {
        println!("\n6. Second start rejected: {}", e);
    }

    println!("\n=== Example completed successfully! ===");

    Ok(())
}
