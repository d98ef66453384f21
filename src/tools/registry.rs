//! Name-indexed set of tools the host can list and invoke.

use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::config::Config;
use crate::host::FileStore;
use crate::types::ResultMessage;

use super::document_writer::DocumentWriterTool;
use super::faster_whisper::FasterWhisperTool;
use super::file_uploader::FileUploaderTool;
use super::file_writer::FileWriterTool;
use super::parameters::{ParameterDescriptor, ToolParameters};
use super::{invoke_to_messages, Tool, ToolDefinition, ToolError};

/// Registry of tools keyed by [`Tool::name`].
///
/// Built once at startup and shared read-only; lookups never lock.
#[derive(Default)]
pub struct ToolRegistry {
    tools: BTreeMap<&'static str, Arc<dyn Tool>>,
}

impl std::fmt::Debug for ToolRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolRegistry")
            .field("tools", &self.names())
            .finish()
    }
}

impl ToolRegistry {
    /// Empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding every builtin tool, wired to `files` and `config`.
    pub fn with_builtin(files: Arc<dyn FileStore>, config: &Config) -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(FasterWhisperTool::new(
            Arc::clone(&files),
            config.transcription.clone(),
        )));
        registry.register(Arc::new(FileUploaderTool::new(files)));
        registry.register(Arc::new(FileWriterTool::new(config.writer.clone())));
        registry.register(Arc::new(DocumentWriterTool));
        info!(count = registry.count(), "builtin tools registered");
        registry
    }

    /// Add `tool`, replacing any tool already registered under its name.
    pub fn register(&mut self, tool: Arc<dyn Tool>) {
        let name = tool.name();
        if self.tools.insert(name, tool).is_some() {
            warn!(tool = name, "replacing previously registered tool");
        }
    }

    /// Look up a tool by name.
    pub fn get(&self, name: &str) -> Option<Arc<dyn Tool>> {
        self.tools.get(name).cloned()
    }

    /// Registered tool names, sorted.
    pub fn names(&self) -> Vec<&'static str> {
        self.tools.keys().copied().collect()
    }

    /// Number of registered tools.
    pub fn count(&self) -> usize {
        self.tools.len()
    }

    /// LLM-facing definitions for every tool, sorted by name.
    pub fn definitions(&self) -> Vec<ToolDefinition> {
        self.tools.values().map(|t| t.definition()).collect()
    }

    /// Parameter descriptors for `name`, if registered.
    pub fn describe(&self, name: &str) -> Option<Vec<ParameterDescriptor>> {
        self.tools.get(name).map(|t| t.describe_parameters())
    }

    /// Invoke `name` and render every failure, including an unknown name,
    /// as a single text message.
    pub async fn invoke(&self, name: &str, params: &ToolParameters) -> Vec<ResultMessage> {
        match self.tools.get(name) {
            Some(tool) => {
                debug!(tool = name, "invoking tool");
                invoke_to_messages(tool.as_ref(), params).await
            }
            None => {
                warn!(tool = name, "invocation of unknown tool");
                vec![ToolError::UnknownTool(name.to_owned()).into_message()]
            }
        }
    }
}
