// src/main.rs
use clap::Parser;
use mini_kvstore_v2::Store;
use std::io::{self, Write};

/// Interactive REPL over a mini-kvstore-v2 data directory.
#[derive(Parser, Debug)]
struct Args {
    /// Data directory holding segment files.
    #[arg(short = 'd', long, default_value = "db")]
    data_dir: String,

    /// Segment size threshold in bytes.
    #[arg(short = 's', long, default_value_t = 16 * 1024 * 1024)]
    segment_size: u64,
}

fn main() {
    env_logger::init();
    let args = Args::parse();

    let kv = Store::open(&args.data_dir, args.segment_size).expect("failed to open db");

    println!("mini-kvstore-v2 (type help for instructions)");

    loop {
        print!("> ");
        io::stdout().flush().unwrap();
        let mut input = String::new();
        if io::stdin().read_line(&mut input).is_err() {
            continue;
        }
        if input.is_empty() {
            break; // EOF on stdin
        }

        let mut parts = input.trim().splitn(3, ' ');
        let cmd = match parts.next() {
            Some(c) => c,
            None => continue,
        };

        match cmd {
            "set" => {
                let key = match parts.next() {
                    Some(k) => k,
                    None => {
                        println!("Usage: set <key> <value>");
                        continue;
                    },
                };
                let value = match parts.next() {
                    Some(v) => v,
                    None => {
                        println!("Usage: set <key> <value>");
                        continue;
                    },
                };
                match kv.put(key, value.as_bytes()) {
                    Ok(()) => println!("OK"),
                    Err(e) => println!("Error: {}", e),
                }
            },

            "get" => {
                let key = match parts.next() {
                    Some(k) => k,
                    None => {
                        println!("Usage: get <key>");
                        continue;
                    },
                };

                match kv.get(key) {
                    Ok(v) => println!("{}", String::from_utf8_lossy(&v)),
                    Err(mini_kvstore_v2::StoreError::NotFound) => println!("Key not found"),
                    Err(e) => println!("Error: {}", e),
                }
            },

            "list" => {
                let keys = kv.debug_keys();
                if keys.is_empty() {
                    println!("No keys");
                } else {
                    for key in keys {
                        println!("  {}", String::from_utf8_lossy(&key));
                    }
                }
            },

            "compact" => {
                // Compaction runs in the background once enough segments
                // pile up; there is nothing to force synchronously here.
                println!("Compaction runs automatically once segment count crosses the threshold");
            },

            "stats" => {
                println!("{}", kv.stats());
            },

            "help" => print_help(),
            "quit" | "exit" => break,

            other => println!("Unknown command: '{}'", other),
        }
    }

    if let Err(e) = kv.close() {
        eprintln!("error closing db: {}", e);
    }
}

fn print_help() {
    println!("Available commands:");
    println!("  set <key> <value>");
    println!("  get <key>");
    println!("  list");
    println!("  compact");
    println!("  stats");
    println!("  help");
    println!("  quit / exit");
}
