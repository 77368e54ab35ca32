//! # CLI — demonstration binary
//!
//! A trivial host program for the storage engine: open a database under
//! `SPRUCE_BASE_PATH` (or the documented default), run a line-oriented
//! command loop against it over stdin, and print results to stdout. Not
//! part of the core contract — no stable exit-code behavior is promised.
//!
//! ## Commands
//!
//! ```text
//! PUT key value   Insert or update a key
//! GET key         Look up a key (prints its value, or "(nil)")
//! DEL key         Delete a key (writes a tombstone)
//! STATS           Print engine debug info
//! EXIT / QUIT     Shut down
//! ```

use std::io::{self, BufRead, Write};

use config::Config;
use engine::{Database, Options};

fn main() -> entry::Result<()> {
    let cfg = Config::from_env();
    let _log_guard = cfg.init_logging();

    let mut db = Database::open(Options {
        base_path: cfg.base_path.clone().into(),
        flush_threshold: engine::DEFAULT_FLUSH_THRESHOLD,
    })?;

    println!(
        "spruce_db started (base_path={}, seq={})",
        cfg.base_path,
        db.seq()
    );
    println!("Commands: PUT key value | GET key | DEL key | STATS | EXIT");
    print!("> ");
    io::stdout().flush().ok();

    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let line = match line {
            Ok(l) => l,
            Err(_) => break,
        };
        let mut parts = line.split_whitespace();

        match parts.next().map(|s| s.to_ascii_uppercase()) {
            Some(cmd) if cmd == "PUT" => {
                let key = parts.next().map(str::to_string);
                let value: Vec<&str> = parts.collect();
                match (key, value.is_empty()) {
                    (Some(key), false) => match db.put(key, value.join(" ").into_bytes()) {
                        Ok(()) => println!("OK"),
                        Err(e) => println!("ERR {e}"),
                    },
                    _ => println!("ERR usage: PUT key value"),
                }
            }
            Some(cmd) if cmd == "GET" => match parts.next() {
                Some(key) => match db.get(key) {
                    Ok(Some(value)) => println!("{}", String::from_utf8_lossy(&value)),
                    Ok(None) => println!("(nil)"),
                    Err(e) => println!("ERR {e}"),
                },
                None => println!("ERR usage: GET key"),
            },
            Some(cmd) if cmd == "DEL" => match parts.next().map(str::to_string) {
                Some(key) => match db.delete(key) {
                    Ok(()) => println!("OK"),
                    Err(e) => println!("ERR {e}"),
                },
                None => println!("ERR usage: DEL key"),
            },
            Some(cmd) if cmd == "STATS" => println!("{db:?}"),
            Some(cmd) if cmd == "EXIT" || cmd == "QUIT" => {
                println!("bye");
                break;
            }
            Some(other) => println!("unknown command: {other}"),
            None => {}
        }

        print!("> ");
        io::stdout().flush().ok();
    }

    db.close();
    Ok(())
}
