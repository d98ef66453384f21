//! Configuration loading and validation.
//!
//! The host may hand the tools a `gworks.toml`; every field has a default so
//! an empty file (or [`Config::default`]) is a valid configuration. Values
//! supplied per invocation always win over these defaults.

use std::path::{Path, PathBuf};

use serde::Deserialize;

/// Top-level tool configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Speech-to-text adapter defaults.
    #[serde(default)]
    pub transcription: TranscriptionConfig,

    /// File writer defaults.
    #[serde(default)]
    pub writer: WriterConfig,
}

/// Defaults for the transcription adapter.
#[derive(Debug, Clone, Deserialize)]
pub struct TranscriptionConfig {
    /// Base URL of the OpenAI-compatible transcription server.
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Model identifier sent with every request.
    #[serde(default = "default_model")]
    pub model: String,

    /// Follow a JSON result with a plain-text message holding its `text` field.
    #[serde(default = "default_emit_text_message")]
    pub emit_text_message: bool,
}

impl Default for TranscriptionConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            model: default_model(),
            emit_text_message: default_emit_text_message(),
        }
    }
}

/// How the file writer hands content back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WriterMode {
    /// Write to `output_dir` and confirm with a text message.
    #[default]
    Persist,
    /// Return the content as a blob message; nothing touches the disk.
    Blob,
}

/// Defaults for the file writer adapter.
#[derive(Debug, Clone, Deserialize)]
pub struct WriterConfig {
    /// Directory persisted files land in. Created on demand.
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// Persist to disk or return a blob.
    #[serde(default)]
    pub mode: WriterMode,
}

impl Default for WriterConfig {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
            mode: WriterMode::default(),
        }
    }
}

// Default value functions for serde

fn default_endpoint() -> String {
    "http://faster-whisper-server:8000".to_owned()
}
fn default_model() -> String {
    "Systran/faster-whisper-large-v3".to_owned()
}
fn default_emit_text_message() -> bool {
    true
}
fn default_output_dir() -> PathBuf {
    PathBuf::from("output")
}

impl Config {
    /// Check values serde cannot check on its own.
    ///
    /// # Errors
    ///
    /// Returns an error if the transcription endpoint is not an absolute
    /// http(s) URL or the output directory is empty.
    pub fn validate(&self) -> anyhow::Result<()> {
        let endpoint = url::Url::parse(&self.transcription.endpoint).map_err(|e| {
            anyhow::anyhow!(
                "invalid transcription endpoint {:?}: {e}",
                self.transcription.endpoint
            )
        })?;
        if !matches!(endpoint.scheme(), "http" | "https") {
            anyhow::bail!(
                "transcription endpoint must use http or https, got {:?}",
                endpoint.scheme()
            );
        }
        if self.writer.output_dir.as_os_str().is_empty() {
            anyhow::bail!("writer output_dir must not be empty");
        }
        Ok(())
    }
}

/// Parse and validate a configuration from TOML text.
///
/// # Errors
///
/// Returns an error if the text is not valid TOML or fails validation.
pub fn parse_config(contents: &str) -> anyhow::Result<Config> {
    let config: Config =
        toml::from_str(contents).map_err(|e| anyhow::anyhow!("failed to parse config: {e}"))?;
    config.validate()?;
    Ok(config)
}

/// Load the configuration from a TOML file.
///
/// # Errors
///
/// Returns an error if the file cannot be read, parsed, or validated.
pub fn load_config(path: &Path) -> anyhow::Result<Config> {
    let contents = std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("failed to read config at {}: {e}", path.display()))?;
    parse_config(&contents)
        .map_err(|e| anyhow::anyhow!("invalid config at {}: {e}", path.display()))
}
