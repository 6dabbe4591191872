#![forbid(unsafe_code)]

use crate::{JsonRpcRequest, McpServer, json_rpc_error};
use serde_json::Value;
use std::io::{BufRead, BufReader, Write};

/// Serves newline-delimited JSON-RPC over stdio. One request per line, one
/// response per line, flushed immediately. EOF or a blank line ends the
/// session cleanly.
pub(crate) fn run_stdio(server: &mut McpServer) -> Result<(), Box<dyn std::error::Error>> {
    let stdin = std::io::stdin();
    let mut reader = BufReader::new(stdin.lock());
    let mut stdout = std::io::stdout().lock();

    loop {
        let mut line = String::new();
        let read = reader.read_line(&mut line)?;
        if read == 0 {
            break;
        }
        let raw = line.trim();
        if raw.is_empty() {
            break;
        }

        let response = handle_line(server, raw);
        writeln!(stdout, "{}", serde_json::to_string(&response)?)?;
        stdout.flush()?;
    }

    Ok(())
}

fn handle_line(server: &mut McpServer, raw: &str) -> Value {
    let request: JsonRpcRequest = match serde_json::from_str(raw) {
        Ok(request) => request,
        // A malformed frame never has a usable id; report it against null
        // and keep the session alive.
        Err(err) => return json_rpc_error(None, -32700, &format!("Parse error: {err}")),
    };
    server.handle(request)
}
