//! Wrap generated text in a typed document blob (`.txt`, `.json`, `.md`).

use async_trait::async_trait;
use tracing::debug;

use crate::types::{ResultMessage, SaveAs};

use super::parameters::{
    I18nText, ParameterDescriptor, ParameterForm, ParameterOption, ParameterType, ToolParameters,
};
use super::{Tool, ToolError};

const DEFAULT_FILE_NAME: &str = "file";

/// Document flavour, which fixes MIME type and extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DocumentType {
    /// Plain text.
    #[default]
    Text,
    /// JSON document.
    Json,
    /// Markdown document.
    Markdown,
}

impl DocumentType {
    /// Parse the wire name; unknown names fall back to [`DocumentType::Text`].
    pub fn parse_or_default(value: &str) -> Self {
        match value {
            "json" => Self::Json,
            "markdown" => Self::Markdown,
            _ => Self::Text,
        }
    }

    /// `(mime type, extension)`.
    pub fn mime_and_extension(self) -> (&'static str, &'static str) {
        match self {
            Self::Text => ("text/plain", ".txt"),
            Self::Json => ("application/json", ".json"),
            Self::Markdown => ("text/markdown", ".md"),
        }
    }
}

/// Validated arguments for one document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentArgs {
    /// Document body.
    pub content: String,
    /// Document flavour.
    pub file_type: DocumentType,
    /// Base name without extension.
    pub file_name: String,
}

impl DocumentArgs {
    /// Read and validate `params`.
    ///
    /// # Errors
    ///
    /// Returns [`ToolError::InvalidInput`] if `content` is missing or empty.
    pub fn from_parameters(params: &ToolParameters) -> Result<Self, ToolError> {
        let content = params
            .str("content")
            .filter(|c| !c.is_empty())
            .ok_or_else(|| ToolError::InvalidInput("No content provided".to_owned()))?;
        Ok(Self {
            content: content.to_owned(),
            file_type: DocumentType::parse_or_default(params.str_or("file_type", "text")),
            file_name: params.str_or("file_name", DEFAULT_FILE_NAME).to_owned(),
        })
    }
}

/// The `document_writer` tool.
#[derive(Debug, Clone, Copy, Default)]
pub struct DocumentWriterTool;

#[async_trait]
impl Tool for DocumentWriterTool {
    fn name(&self) -> &'static str {
        "document_writer"
    }

    fn description(&self) -> I18nText {
        I18nText::new(
            "Return text content as a text, JSON, or Markdown file.",
            "テキストをテキスト・JSON・Markdownファイルとして返します。",
        )
    }

    fn describe_parameters(&self) -> Vec<ParameterDescriptor> {
        vec![
            ParameterDescriptor::new(
                "content",
                ParameterType::String,
                ParameterForm::Llm,
                I18nText::new("Content", "内容"),
                I18nText::new("The content to write to the file.", "ファイルに書き込む内容。"),
            )
            .required(),
            ParameterDescriptor::new(
                "file_type",
                ParameterType::Select,
                ParameterForm::Llm,
                I18nText::new("File Type", "ファイル形式"),
                I18nText::new("The type of file to create.", "作成するファイルの形式。"),
            )
            .required()
            .default_value("text")
            .options(vec![
                ParameterOption::new("text", "Text", "テキスト"),
                ParameterOption::new("json", "JSON", "JSON"),
                ParameterOption::new("markdown", "Markdown", "Markdown"),
            ]),
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
        let args = DocumentArgs::from_parameters(params)?;
        let (mime_type, extension) = args.file_type.mime_and_extension();
        let save_as = format!("{}{extension}", args.file_name);

        debug!(save_as = %save_as, bytes = args.content.len(), "document prepared");

        Ok(vec![
            ResultMessage::text("Successfully prepared content"),
            ResultMessage::blob(args.content.into_bytes(), mime_type, SaveAs::Named(save_as)),
        ])
    }
}
