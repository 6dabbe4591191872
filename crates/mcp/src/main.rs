#![forbid(unsafe_code)]

mod engine;
mod entry;
mod server;
mod support;
mod tools;

pub(crate) use support::*;

use sg_storage::SqliteStore;
use std::path::PathBuf;

const MCP_VERSION: &str = "2024-11-05";
const SERVER_NAME: &str = "story-goal-mcp";
const SERVER_VERSION: &str = env!("CARGO_PKG_VERSION");

const DEFAULT_STORAGE_DIR: &str = "story_goals";

pub(crate) struct McpServer {
    store: SqliteStore,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = std::env::args().skip(1).collect();

    if args.iter().any(|a| a == "-h" || a == "--help") {
        print!("{}", usage());
        return Ok(());
    }
    if args.iter().any(|a| a == "-V" || a == "--version") {
        println!("sg_mcp {SERVER_VERSION}");
        return Ok(());
    }

    let storage_dir = storage_dir_from(&args)?;
    let store = SqliteStore::open(&storage_dir)?;
    let mut server = McpServer::new(store);
    entry::run_stdio(&mut server)
}

/// Resolves the storage directory: `--storage-dir DIR` wins, then the
/// `STORY_GOAL_STORAGE_DIR` environment variable, then `./story_goals`.
fn storage_dir_from(args: &[String]) -> Result<PathBuf, Box<dyn std::error::Error>> {
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        if arg == "--storage-dir" {
            let Some(dir) = iter.next() else {
                return Err("--storage-dir requires a directory argument".into());
            };
            return Ok(PathBuf::from(dir));
        }
    }
    if let Ok(dir) = std::env::var("STORY_GOAL_STORAGE_DIR") {
        if !dir.trim().is_empty() {
            return Ok(PathBuf::from(dir));
        }
    }
    Ok(PathBuf::from(DEFAULT_STORAGE_DIR))
}

fn usage() -> &'static str {
    "sg_mcp — story-goal MCP server (stdio, newline-delimited JSON-RPC)\n\n\
USAGE:\n\
  sg_mcp [--storage-dir DIR]\n\
\n\
FLAGS:\n\
  --storage-dir DIR   Where the SQLite database lives (default: ./story_goals,\n\
                      or the STORY_GOAL_STORAGE_DIR environment variable)\n\
  -h, --help          Print this help and exit\n\
  -V, --version       Print version and exit\n"
}
