#![forbid(unsafe_code)]

mod definitions;
mod dispatch;
mod goals;
mod stories;
mod workspace;

pub(crate) use definitions::tool_definitions;
pub(crate) use dispatch::dispatch_tool;
