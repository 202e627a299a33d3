//! sdb Server
//!
//! JSON-RPC server that evaluates debugger expressions against a machine snapshot.
//! Communicates via stdin/stdout for easy subprocess management.
//!
//! Usage: `sdb-server [SNAPSHOT.json]`

use std::io::{self, BufRead, Write};
use anyhow::{Context, Result};
use tracing::{info, error, debug};
use sdb_core::protocol::RpcMessage;
use sdb_core::{Request, Response, Snapshot};

mod handler;

fn main() -> Result<()> {
    // Initialize logging to stderr (stdout is for JSON-RPC)
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .init();

    info!("sdb-server starting...");

    let snapshot = match std::env::args().nth(1) {
        Some(path) => Snapshot::from_file(&path)
            .with_context(|| format!("Failed to load initial snapshot from {}", path))?,
        None => Snapshot::default(),
    };
    info!(
        "Loaded snapshot: {} registers, {} memory regions, {} words",
        snapshot.registers.len(),
        snapshot.memory.len(),
        snapshot.config.word_width
    );

    let stdin = io::stdin();
    let mut stdout = io::stdout();

    let mut handler = handler::Handler::new(snapshot);

    for line in stdin.lock().lines() {
        let line = match line {
            Ok(l) => l,
            Err(e) => {
                error!("Failed to read line: {}", e);
                continue;
            }
        };

        if line.trim().is_empty() {
            continue;
        }

        debug!("Received: {}", line);

        // Parse JSON-RPC request
        let response = match serde_json::from_str::<RpcMessage<Request>>(&line) {
            Ok(msg) => {
                let result = handler.handle(&msg.content);
                RpcMessage::new(msg.id.unwrap_or(0), result)
            }
            Err(e) => RpcMessage::new(0, Response::error(format!("Parse error: {}", e))),
        };

        // Send response
        let response_json = serde_json::to_string(&response)?;
        debug!("Sending: {}", response_json);
        writeln!(stdout, "{}", response_json)?;
        stdout.flush()?;

        if handler.is_shutdown() {
            break;
        }
    }

    info!("sdb-server shutting down");
    Ok(())
}
