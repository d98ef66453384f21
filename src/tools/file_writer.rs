//! Write caller-supplied content to a file.
//!
//! Content is literal UTF-8 text or base64-encoded binary. In
//! [`WriterMode::Persist`] the bytes land in the configured output directory
//! under a sanitized name; in [`WriterMode::Blob`] they come back as a blob
//! message and nothing touches the disk.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info, warn};

use crate::config::{WriterConfig, WriterMode};
use crate::types::{ResultMessage, SaveAs};

use super::parameters::{
    I18nText, ParameterDescriptor, ParameterForm, ParameterOption, ParameterType,
    ParameterValue, ToolParameters,
};
use super::{Tool, ToolError};

/// How `content` is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ContentType {
    /// Literal text, stored as UTF-8.
    #[default]
    Text,
    /// Base64-encoded bytes, stored decoded.
    Binary,
}

impl ContentType {
    /// Parse the wire name.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "text" => Some(Self::Text),
            "binary" => Some(Self::Binary),
            _ => None,
        }
    }

    /// Wire name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Binary => "binary",
        }
    }

    /// MIME type of the produced bytes.
    pub fn mime_type(self) -> &'static str {
        match self {
            Self::Text => "text/plain",
            Self::Binary => "application/octet-stream",
        }
    }

    /// Turn raw `content` into the bytes to store.
    ///
    /// # Errors
    ///
    /// Returns [`ToolError::InvalidInput`] if binary content is not valid
    /// base64.
    pub fn decode(self, content: &str) -> Result<Vec<u8>, ToolError> {
        match self {
            Self::Text => Ok(content.as_bytes().to_vec()),
            Self::Binary => {
                let compact: String = content
                    .chars()
                    .filter(|c| !c.is_ascii_whitespace())
                    .collect();
                STANDARD.decode(compact.as_bytes()).map_err(|_| {
                    ToolError::InvalidInput("Invalid base64 encoded binary content".to_owned())
                })
            }
        }
    }
}

/// Reduce a caller-supplied filename to its final path component.
///
/// Both `/` and `\` count as separators. Returns `None` when nothing usable
/// is left (`""`, `"dir/"`, `".."`).
pub fn sanitize_filename(name: &str) -> Option<String> {
    let normalized = name.replace('\\', "/");
    let base = normalized.rsplit('/').next().unwrap_or_default().trim();
    if base.is_empty() || base == "." || base == ".." || base.contains('\0') {
        return None;
    }
    Some(base.to_owned())
}

/// Destination path for `name` inside `output_dir`.
///
/// # Errors
///
/// Returns [`ToolError::InvalidInput`] if `name` sanitizes to nothing.
pub fn resolve_target(output_dir: &Path, name: &str) -> Result<PathBuf, ToolError> {
    let sanitized = sanitize_filename(name).ok_or_else(invalid_filename)?;
    Ok(output_dir.join(sanitized))
}

fn invalid_filename() -> ToolError {
    ToolError::InvalidInput("Invalid filename".to_owned())
}

/// Validated arguments for one write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteArgs {
    /// Bytes to store, already decoded.
    pub bytes: Vec<u8>,
    /// How the content was interpreted.
    pub content_type: ContentType,
    /// Sanitized file name, if one was supplied.
    pub filename: Option<String>,
}

impl WriteArgs {
    /// Read and validate `params`. A filename is mandatory in persist mode.
    ///
    /// # Errors
    ///
    /// Returns [`ToolError::InvalidInput`] for missing content, an unknown
    /// content type, a bad filename, or undecodable base64.
    pub fn from_parameters(params: &ToolParameters, mode: WriterMode) -> Result<Self, ToolError> {
        let content = params
            .str("content")
            .ok_or_else(|| ToolError::InvalidInput("No content provided".to_owned()))?;

        let type_name = params.str_or("content_type", ContentType::default().as_str());
        let content_type = ContentType::parse(type_name).ok_or_else(|| {
            ToolError::InvalidInput(format!("Unsupported content type: {type_name}"))
        })?;

        let filename = match (params.get("filename"), mode) {
            (Some(ParameterValue::String(name)), _) if !name.trim().is_empty() => {
                Some(sanitize_filename(name).ok_or_else(invalid_filename)?)
            }
            (Some(ParameterValue::String(_)), WriterMode::Blob) => None,
            (_, WriterMode::Blob) if params.is_absent("filename") => None,
            _ => return Err(invalid_filename()),
        };

        Ok(Self {
            bytes: content_type.decode(content)?,
            content_type,
            filename,
        })
    }
}

/// The `file_writer` tool.
#[derive(Debug, Clone)]
pub struct FileWriterTool {
    config: WriterConfig,
}

impl FileWriterTool {
    /// Create the tool with the given output settings.
    pub fn new(config: WriterConfig) -> Self {
        Self { config }
    }

    /// Write `bytes` to `output_dir/name`, creating the directory if needed.
    ///
    /// Bytes go to a hidden `.<name>.partial` sibling first and are renamed
    /// into place; a failed write never leaves a truncated `name` behind.
    async fn persist(&self, name: &str, bytes: &[u8]) -> Result<PathBuf, ToolError> {
        let dir = &self.config.output_dir;
        tokio::fs::create_dir_all(dir).await.map_err(|e| {
            ToolError::Filesystem(format!("failed to create {}: {e}", dir.display()))
        })?;

        let path = resolve_target(dir, name)?;
        let partial = partial_path(&path);

        if let Err(e) = write_file(&partial, bytes).await {
            discard_partial(&partial).await;
            return Err(e);
        }
        if let Err(e) = tokio::fs::rename(&partial, &path).await {
            discard_partial(&partial).await;
            return Err(ToolError::Filesystem(format!(
                "failed to move {} into place: {e}",
                path.display()
            )));
        }

        Ok(path)
    }
}

fn partial_path(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    path.with_file_name(format!(".{name}.partial"))
}

async fn write_file(path: &Path, bytes: &[u8]) -> Result<(), ToolError> {
    let mut file = tokio::fs::File::create(path).await.map_err(|e| {
        ToolError::Filesystem(format!("failed to create {}: {e}", path.display()))
    })?;
    file.write_all(bytes)
        .await
        .map_err(|e| ToolError::Filesystem(format!("failed to write {}: {e}", path.display())))?;
    file.flush()
        .await
        .map_err(|e| ToolError::Filesystem(format!("failed to flush {}: {e}", path.display())))
}

async fn discard_partial(path: &Path) {
    if let Err(e) = tokio::fs::remove_file(path).await {
        if e.kind() != std::io::ErrorKind::NotFound {
            warn!(path = %path.display(), error = %e, "failed to remove partial file");
        }
    }
}

#[async_trait]
impl Tool for FileWriterTool {
    fn name(&self) -> &'static str {
        "file_writer"
    }

    fn description(&self) -> I18nText {
        I18nText::new(
            "Write text or base64-encoded binary content to a file.",
            "テキストまたはbase64エンコードされたバイナリをファイルに書き込みます。",
        )
    }

    fn describe_parameters(&self) -> Vec<ParameterDescriptor> {
        let filename = ParameterDescriptor::new(
            "filename",
            ParameterType::String,
            ParameterForm::Llm,
            I18nText::new("File Name", "ファイル名"),
            I18nText::new(
                "Name of the file to write, including extension.",
                "書き込むファイル名（拡張子を含む）。",
            ),
        );
        let filename = match self.config.mode {
            WriterMode::Persist => filename.required(),
            WriterMode::Blob => filename,
        };

        vec![
            ParameterDescriptor::new(
                "content_type",
                ParameterType::Select,
                ParameterForm::Form,
                I18nText::new("Content Type", "コンテンツタイプ"),
                I18nText::new(
                    "Type of the content (text or binary)",
                    "コンテンツの種類（テキストまたはバイナリ）",
                ),
            )
            .required()
            .default_value(ContentType::Text.as_str())
            .options(vec![
                ParameterOption::new("text", "Text", "テキスト"),
                ParameterOption::new("binary", "Binary", "バイナリ"),
            ]),
            ParameterDescriptor::new(
                "content",
                ParameterType::String,
                ParameterForm::Llm,
                I18nText::new("Content", "内容"),
                I18nText::new(
                    "The content to write to the file. Base64 for binary content.",
                    "ファイルに書き込む内容。バイナリの場合はbase64。",
                ),
            )
            .required(),
            filename,
        ]
    }

    async fn invoke(&self, params: &ToolParameters) -> Result<Vec<ResultMessage>, ToolError> {
        let args = WriteArgs::from_parameters(params, self.config.mode)?;

        match (self.config.mode, args.filename) {
            (WriterMode::Persist, Some(name)) => {
                let path = self.persist(&name, &args.bytes).await?;
                info!(
                    path = %path.display(),
                    bytes = args.bytes.len(),
                    content_type = args.content_type.as_str(),
                    "file written"
                );
                Ok(vec![ResultMessage::text(format!(
                    "File written successfully: {name}"
                ))])
            }
            (WriterMode::Persist, None) => Err(invalid_filename()),
            (WriterMode::Blob, filename) => {
                let save_as = filename.map_or(SaveAs::CustomSlot, SaveAs::Named);
                debug!(save_as = save_as.key(), bytes = args.bytes.len(), "content prepared");
                Ok(vec![
                    ResultMessage::text("Successfully prepared content"),
                    ResultMessage::blob(args.bytes, args.content_type.mime_type(), save_as),
                ])
            }
        }
    }
}
