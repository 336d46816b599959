//! Loyalty Engine CLI
//!
//! A batch driver that seeds a loyalty programme from JSON, streams a CSV
//! of purchase transactions through the engine, and outputs final customer
//! point states.
//!
//! # Usage
//!
//! ```bash
//! cargo run -- seed.json transactions.csv > customers.csv
//! ```
//!
//! # Environment Variables
//!
//! - `RUST_LOG`: Set to `debug` or `warn` to control logging verbosity

use loyalty_engine::{LoyaltyEngine, LoyaltyError, LoyaltyStore, Result, Seed};
use std::env;
use std::fs::File;
use std::io::{self, BufReader};
use std::process;

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run() -> Result<()> {
    let args: Vec<String> = env::args().collect();
    if args.len() < 3 {
        return Err(LoyaltyError::MissingArguments);
    }

    let store = LoyaltyStore::new();
    let seed_file = File::open(&args[1])?;
    Seed::from_reader(BufReader::new(seed_file))?.apply(&store)?;

    let engine = LoyaltyEngine::new(store);
    let transactions = File::open(&args[2])?;
    engine.process_csv(BufReader::new(transactions))?;

    let stdout = io::stdout();
    let handle = stdout.lock();
    engine.write_output(handle)?;

    Ok(())
}
