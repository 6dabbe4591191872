#![forbid(unsafe_code)]

use sg_storage::StoreError;

/// Failure of a single tool invocation. Every variant is reported to the
/// client as a JSON-RPC `-32603` internal error; the variants exist so call
/// sites and tests can tell the failure modes apart.
#[derive(Debug)]
pub(crate) enum ToolError {
    UnknownTool(String),
    MissingArgument(&'static str),
    Store(StoreError),
}

impl std::fmt::Display for ToolError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ToolError::UnknownTool(name) => write!(f, "Unknown tool: {name}"),
            ToolError::MissingArgument(key) => write!(f, "missing required argument: {key}"),
            ToolError::Store(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for ToolError {}

impl From<StoreError> for ToolError {
    fn from(err: StoreError) -> Self {
        ToolError::Store(err)
    }
}
