#![forbid(unsafe_code)]

mod args;
mod error;
mod ids;
mod jsonrpc;
mod time;

pub(crate) use args::*;
pub(crate) use error::*;
pub(crate) use ids::*;
pub(crate) use jsonrpc::*;
pub(crate) use time::*;
