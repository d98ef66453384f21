//! gworks — builtin tool adapters for an LLM orchestration host.
//!
//! Every adapter is a stateless leaf: one call in, one ordered list of
//! [`types::ResultMessage`]s out. The host injects file storage through
//! [`host::FileStore`] and renders failures through [`tools::ToolError`].
//!
//! See `DESIGN.md` for the full module ledger.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod config;
pub mod host;
pub mod logging;
pub mod types;

pub mod tools;
