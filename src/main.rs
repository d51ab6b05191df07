//! Vanity npub Miner CLI
//!
//! Usage:
//!   npub_vanity -t npub10hac                 # Exhaustive scan for the prefix
//!   npub_vanity -t npub10hac -u -L 32        # With the heuristic pre-filter
//!   npub_vanity -S -n 1                      # Fresh mnemonic, stop at first match

use std::process;
use std::time::Duration;

use clap::Parser;

use npub_vanity::crypto::seed;
use npub_vanity::worker::PoolEvent;
use npub_vanity::{Config, VanityResult, WorkerPool};

fn main() {
    let config = Config::parse();

    // Validate configuration
    if let Err(e) = config.validate() {
        eprintln!("Configuration error: {}", e);
        process::exit(1);
    }

    // Resolve the seed phrase; generation failures abort before any worker
    // starts.
    let mnemonic = if config.generate {
        match seed::generate_mnemonic() {
            Ok(m) => m.to_string(),
            Err(e) => {
                eprintln!("Configuration error: mnemonic generation failed: {}", e);
                process::exit(1);
            }
        }
    } else {
        config.mnemonic.clone()
    };

    if config.generate || config.verbose {
        println!("{}", mnemonic);
    }

    let seed_bytes = match seed::seed_from_mnemonic(&mnemonic) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Configuration error: invalid mnemonic: {}", e);
            process::exit(1);
        }
    };

    let target = config.search_target();

    // Print startup info
    println!("Vanity npub Miner");
    println!("=================");
    println!("Target:  {}", target.prefix());
    println!(
        "Filter:  {}",
        match target.filter() {
            Some(f) => format!(
                "scalar length >= {}, x starts {:02x}{:02x}",
                f.min_scalar_len, f.x_prefix[0], f.x_prefix[1]
            ),
            None => "disabled (exhaustive)".into(),
        }
    );
    println!("Workers: {}", config.worker_count());
    println!("Offset:  {}", config.offset);
    println!();

    // Create worker pool
    let pool = WorkerPool::new(
        config.worker_count(),
        config.offset,
        seed_bytes,
        target,
    );

    // Set up ctrl-c handler
    let stop_flag = pool.stop_flag_clone();
    ctrlc_handler(stop_flag);

    println!("Searching... (Press Ctrl+C to stop)\n");

    let mut found = 0;
    let report_interval = Duration::from_secs(config.report_interval);

    loop {
        match pool.next_event(report_interval) {
            PoolEvent::Match(result) => {
                found += 1;
                print_result(&result, found);

                if config.count > 0 && found >= config.count {
                    println!("\nTarget reached! Found {} match(es).", found);
                    pool.stop();
                    break;
                }
            }
            PoolEvent::Tick => {
                print_progress(&pool);
            }
            PoolEvent::Exhausted => {
                // Workers also drain after a stop; report which one it was.
                if pool.is_stopped() {
                    println!("\nStopped by user.");
                } else {
                    println!("\nSearch space exhausted.");
                }
                break;
            }
        }

        // Check if we should stop (ctrl-c was pressed)
        if pool.is_stopped() {
            println!("\nStopped by user.");
            break;
        }
    }

    // Print final stats
    println!("\n--- Final Statistics ---");
    println!("Scalars derived:      {}", format_number(pool.total_scalars()));
    println!("Candidates evaluated: {}", format_number(pool.total_evaluated()));
    println!("Matches found:        {}", pool.total_matches());
    println!("Time elapsed:         {:.2}s", pool.elapsed().as_secs_f64());
    println!(
        "Average speed:        {}/s",
        format_number(pool.scalars_per_second() as u64)
    );

    pool.join();
}

fn print_result(result: &VanityResult, index: usize) {
    println!("=== Match #{} ===", index);
    println!("npub:       {}", result.encoded);
    println!("Worker:     {}", result.worker_id);
    println!("Index:      {}", result.index);
    println!("X (trunc):  {}", result.x_hex_prefix);
    println!("Scalar len: {}", result.scalar_len);
    println!();
}

fn print_progress(pool: &WorkerPool) {
    let scalars = pool.total_scalars();
    let rate = pool.scalars_per_second();
    let elapsed = pool.elapsed().as_secs();

    println!(
        "[{:>4}s] Derived {} scalars ({}/s)",
        elapsed,
        format_number(scalars),
        format_number(rate as u64)
    );
}

fn format_number(n: u64) -> String {
    if n >= 1_000_000_000 {
        format!("{:.2}B", n as f64 / 1_000_000_000.0)
    } else if n >= 1_000_000 {
        format!("{:.2}M", n as f64 / 1_000_000.0)
    } else if n >= 1_000 {
        format!("{:.2}K", n as f64 / 1_000.0)
    } else {
        n.to_string()
    }
}

fn ctrlc_handler(stop_flag: std::sync::Arc<std::sync::atomic::AtomicBool>) {
    ctrlc::set_handler(move || {
        stop_flag.store(true, std::sync::atomic::Ordering::Relaxed);
    })
    .expect("Error setting Ctrl-C handler");
}
