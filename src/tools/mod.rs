//! Builtin tool adapters.
//!
//! Each tool implements [`Tool`]: it validates its parameters into a typed
//! argument struct, does at most one outbound call or file write, and returns
//! an ordered list of [`ResultMessage`]s. Failures are typed [`ToolError`]s;
//! [`invoke_to_messages`] turns them into the single text message the host
//! expects, so no fault ever reaches the host.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use crate::host::FileStoreError;
use crate::types::ResultMessage;

pub mod document_writer;
pub mod faster_whisper;
pub mod file_uploader;
pub mod file_writer;
pub mod parameters;
pub mod registry;

use parameters::{I18nText, ParameterDescriptor, ToolParameters};

/// Failure of a tool invocation, rendered by [`ToolError::into_message`].
#[derive(Debug, Error)]
pub enum ToolError {
    /// Caller-supplied parameters were missing or malformed. The text is
    /// shown to the user as-is.
    #[error("{0}")]
    InvalidInput(String),
    /// The host file store or the remote service failed.
    #[error("Failed to process file: {0}")]
    Upstream(String),
    /// A local filesystem write failed.
    #[error("Failed to write file: {0}")]
    Filesystem(String),
    /// No tool is registered under the requested name.
    #[error("Unknown tool: {0}")]
    UnknownTool(String),
}

impl ToolError {
    /// Render this error as the single text message returned to the host.
    pub fn into_message(self) -> ResultMessage {
        ResultMessage::text(self.to_string())
    }
}

impl From<FileStoreError> for ToolError {
    fn from(err: FileStoreError) -> Self {
        Self::Upstream(err.to_string())
    }
}

/// JSON Schema definition for a tool the LLM can call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolDefinition {
    /// Tool name (must match registry registration).
    pub name: String,
    /// Description shown to the LLM.
    pub description: String,
    /// JSON Schema object for the LLM-filled parameters.
    pub input_schema: serde_json::Value,
}

/// A single-operation adapter invoked by the host.
///
/// Implementations hold no mutable state and must be `Send + Sync` so the
/// host can invoke them concurrently.
#[async_trait]
pub trait Tool: Send + Sync {
    /// Stable tool name used for registration and dispatch.
    fn name(&self) -> &'static str;

    /// Localized one-line description of what the tool does.
    fn description(&self) -> I18nText;

    /// Ordered list of accepted parameters. Pure; no side effects.
    fn describe_parameters(&self) -> Vec<ParameterDescriptor>;

    /// Run the tool once.
    ///
    /// # Errors
    ///
    /// Returns [`ToolError`] for invalid input, upstream, or filesystem
    /// failures. Use [`invoke_to_messages`] to render it for the host.
    async fn invoke(&self, params: &ToolParameters) -> Result<Vec<ResultMessage>, ToolError>;

    /// LLM-facing definition built from [`Tool::describe_parameters`].
    fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: self.name().to_owned(),
            description: self.description().en_us,
            input_schema: parameters::llm_input_schema(&self.describe_parameters()),
        }
    }
}

/// Invoke `tool` and fold any [`ToolError`] into a single text message.
pub async fn invoke_to_messages(tool: &dyn Tool, params: &ToolParameters) -> Vec<ResultMessage> {
    match tool.invoke(params).await {
        Ok(messages) => messages,
        Err(e) => {
            warn!(tool = tool.name(), error = %e, "tool invocation failed");
            vec![e.into_message()]
        }
    }
}
