//! Re-emit a host-stored file as a downloadable blob.
//!
//! The blob's MIME type and extension come from the file's declared coarse
//! type, not from its contents.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use crate::host::{FileHandle, FileStore, FileType};
use crate::types::{ResultMessage, SaveAs};

use super::parameters::{
    I18nText, ParameterDescriptor, ParameterForm, ParameterType, ToolParameters,
};
use super::{Tool, ToolError};

const DEFAULT_FILE_NAME: &str = "file";

/// Canonical `(mime type, extension)` for a declared file type.
pub fn mime_and_extension(file_type: FileType) -> (&'static str, &'static str) {
    match file_type {
        FileType::Audio => ("audio/mpeg", ".mp3"),
        FileType::Video => ("video/mp4", ".mp4"),
        FileType::Image => ("image/jpeg", ".jpg"),
        FileType::Application | FileType::Document | FileType::Custom => {
            ("application/octet-stream", ".bin")
        }
    }
}

/// Validated arguments for one upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadArgs {
    /// File to re-emit.
    pub file: FileHandle,
    /// Base name without extension.
    pub file_name: String,
}

impl UploadArgs {
    /// Read and validate `params`.
    ///
    /// # Errors
    ///
    /// Returns [`ToolError::InvalidInput`] if `file` is missing.
    pub fn from_parameters(params: &ToolParameters) -> Result<Self, ToolError> {
        let file = params
            .file("file")
            .ok_or_else(|| ToolError::InvalidInput("No file provided".to_owned()))?;
        Ok(Self {
            file: file.clone(),
            file_name: params.str_or("file_name", DEFAULT_FILE_NAME).to_owned(),
        })
    }

    /// Name the blob is saved as: base name plus canonical extension.
    pub fn save_as(&self) -> String {
        let (_, extension) = mime_and_extension(self.file.file_type);
        format!("{}{extension}", self.file_name)
    }
}

/// The `file_uploader` tool.
pub struct FileUploaderTool {
    files: Arc<dyn FileStore>,
}

impl std::fmt::Debug for FileUploaderTool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileUploaderTool").finish_non_exhaustive()
    }
}

impl FileUploaderTool {
    /// Create the tool over a host file store.
    pub fn new(files: Arc<dyn FileStore>) -> Self {
        Self { files }
    }
}

#[async_trait]
impl Tool for FileUploaderTool {
    fn name(&self) -> &'static str {
        "file_uploader"
    }

    fn description(&self) -> I18nText {
        I18nText::new(
            "Return a stored file as a downloadable file.",
            "保存済みのファイルをダウンロード可能なファイルとして返します。",
        )
    }

    fn describe_parameters(&self) -> Vec<ParameterDescriptor> {
        vec![
            ParameterDescriptor::new(
                "file",
                ParameterType::File,
                ParameterForm::Form,
                I18nText::new("File", "ファイル"),
                I18nText::new(
                    "The file to be uploaded (audio, video, or other binary files).",
                    "アップロードするファイル（音声、動画、その他のバイナリファイル）。",
                ),
            )
            .required(),
            ParameterDescriptor::new(
                "file_name",
                ParameterType::String,
                ParameterForm::Llm,
                I18nText::new("File Name", "ファイル名"),
                I18nText::new(
                    "The name of the file (without extension).",
                    "ファイル名（拡張子なし）。",
                ),
            )
            .required()
            .default_value(DEFAULT_FILE_NAME),
        ]
    }

    async fn invoke(&self, params: &ToolParameters) -> Result<Vec<ResultMessage>, ToolError> {
        let args = UploadArgs::from_parameters(params)?;
        let bytes = self.files.download(&args.file).await?;
        let (mime_type, _) = mime_and_extension(args.file.file_type);
        let save_as = args.save_as();

        debug!(file_id = %args.file.id, save_as = %save_as, bytes = bytes.len(), "re-emitting file");

        Ok(vec![
            ResultMessage::text("Successfully processed file"),
            ResultMessage::blob(bytes, mime_type, SaveAs::Named(save_as)),
        ])
    }
}
