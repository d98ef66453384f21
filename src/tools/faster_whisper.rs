//! Speech-to-text through an OpenAI-compatible faster-whisper server.
//!
//! Uploads one audio file to `{endpoint}/v1/audio/transcriptions` as a
//! multipart form and relays the result: plain-text formats verbatim, JSON
//! formats as a JSON message (optionally followed by the bare transcript).

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use tracing::debug;
use url::Url;

use crate::config::TranscriptionConfig;
use crate::host::{FileHandle, FileStore, FileType};
use crate::types::ResultMessage;

use super::parameters::{
    I18nText, ParameterDescriptor, ParameterForm, ParameterOption, ParameterType, ToolParameters,
};
use super::{Tool, ToolError};

/// Path appended to the configured endpoint.
const TRANSCRIPTIONS_PATH: &str = "/v1/audio/transcriptions";

/// File name the audio part is uploaded under.
const AUDIO_PART_NAME: &str = "audio_file";

/// MIME type used when the host has none on record.
const FALLBACK_MIME_TYPE: &str = "application/octet-stream";

/// Error bodies longer than this are cut before they reach the user.
const MAX_ERROR_BODY_CHARS: usize = 256;

const DEFAULT_LANGUAGE: &str = "en";

/// Output format requested from the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseFormat {
    /// Bare transcript as plain text.
    Text,
    /// `{"text": ...}`.
    Json,
    /// JSON with segments, timings, and language.
    VerboseJson,
    /// SubRip subtitles (plain text).
    Srt,
    /// WebVTT subtitles (plain text).
    Vtt,
}

impl ResponseFormat {
    /// Parse the wire name.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "text" => Some(Self::Text),
            "json" => Some(Self::Json),
            "verbose_json" => Some(Self::VerboseJson),
            "srt" => Some(Self::Srt),
            "vtt" => Some(Self::Vtt),
            _ => None,
        }
    }

    /// Wire name sent in the `response_format` field.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Json => "json",
            Self::VerboseJson => "verbose_json",
            Self::Srt => "srt",
            Self::Vtt => "vtt",
        }
    }

    /// Whether the server answers with a non-JSON body in this format.
    pub fn is_plain_text(self) -> bool {
        match self {
            Self::Text | Self::Srt | Self::Vtt => true,
            Self::Json | Self::VerboseJson => false,
        }
    }
}

/// Validated arguments for one transcription call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranscriptionArgs {
    /// Audio file to transcribe.
    pub file: FileHandle,
    /// ISO-639-1 language hint.
    pub language: String,
    /// Model identifier.
    pub model: String,
    /// Requested output format.
    pub response_format: ResponseFormat,
    /// Server base URL.
    pub endpoint: String,
}

impl TranscriptionArgs {
    /// Read and validate `params`, filling gaps from `config`.
    ///
    /// # Errors
    ///
    /// Returns [`ToolError::InvalidInput`] if `audio_file` is missing or not
    /// audio, or `response_format` is not a known format.
    pub fn from_parameters(
        params: &ToolParameters,
        config: &TranscriptionConfig,
    ) -> Result<Self, ToolError> {
        let file = params
            .file("audio_file")
            .filter(|f| f.file_type == FileType::Audio)
            .ok_or_else(|| ToolError::InvalidInput("Not a valid audio file.".to_owned()))?;

        let format_name = params.str_or("response_format", ResponseFormat::Text.as_str());
        let response_format = ResponseFormat::parse(format_name).ok_or_else(|| {
            ToolError::InvalidInput(format!("Unsupported response format: {format_name}"))
        })?;

        Ok(Self {
            file: file.clone(),
            language: params.str_or("language", DEFAULT_LANGUAGE).to_owned(),
            model: params.str_or("model", &config.model).to_owned(),
            response_format,
            endpoint: params.str_or("endpoint", &config.endpoint).to_owned(),
        })
    }

    /// Plain form fields sent alongside the audio part, in wire order.
    pub fn form_fields(&self) -> Vec<(&'static str, String)> {
        vec![
            ("model", self.model.clone()),
            ("task", "transcribe".to_owned()),
            ("language", self.language.clone()),
            ("response_format", self.response_format.as_str().to_owned()),
            ("timestamp_granularities", "segment".to_owned()),
            ("prompt", String::new()),
            ("hotwords", String::new()),
            ("temperature", "0.0".to_owned()),
            ("stream", "false".to_owned()),
        ]
    }
}

/// Full transcription URL for a server base URL.
///
/// # Errors
///
/// Returns [`ToolError::Upstream`] if the result is not a valid URL.
pub fn transcriptions_url(endpoint: &str) -> Result<Url, ToolError> {
    let joined = format!("{}{TRANSCRIPTIONS_PATH}", endpoint.trim_end_matches('/'));
    Url::parse(&joined)
        .map_err(|e| ToolError::Upstream(format!("invalid endpoint {endpoint:?}: {e}")))
}

/// Turn a successful response body into result messages.
///
/// # Errors
///
/// Returns [`ToolError::Upstream`] if a JSON format body does not parse.
pub fn parse_transcription(
    format: ResponseFormat,
    body: String,
    emit_text_message: bool,
) -> Result<Vec<ResultMessage>, ToolError> {
    if format.is_plain_text() {
        return Ok(vec![ResultMessage::text(body)]);
    }

    let value: serde_json::Value = serde_json::from_str(&body)
        .map_err(|e| ToolError::Upstream(format!("invalid JSON response: {e}")))?;

    let transcript = value
        .get("text")
        .and_then(|t| t.as_str())
        .unwrap_or_default()
        .to_owned();

    let mut messages = vec![ResultMessage::json(value)];
    if emit_text_message {
        messages.push(ResultMessage::text(transcript));
    }
    Ok(messages)
}

fn truncate_error_body(body: &str) -> String {
    let collapsed = body.split_whitespace().collect::<Vec<_>>().join(" ");
    if collapsed.chars().count() > MAX_ERROR_BODY_CHARS {
        let shortened = collapsed
            .chars()
            .take(MAX_ERROR_BODY_CHARS)
            .collect::<String>();
        return format!("{shortened}...[truncated]");
    }
    collapsed
}

/// The `faster_whisper` tool.
pub struct FasterWhisperTool {
    files: Arc<dyn FileStore>,
    client: reqwest::Client,
    config: TranscriptionConfig,
}

impl std::fmt::Debug for FasterWhisperTool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FasterWhisperTool")
            .field("config", &self.config)
            .finish()
    }
}

impl FasterWhisperTool {
    /// Create the tool with a fresh HTTP client.
    pub fn new(files: Arc<dyn FileStore>, config: TranscriptionConfig) -> Self {
        Self::with_client(files, reqwest::Client::new(), config)
    }

    /// Create the tool around an existing HTTP client.
    pub fn with_client(
        files: Arc<dyn FileStore>,
        client: reqwest::Client,
        config: TranscriptionConfig,
    ) -> Self {
        Self {
            files,
            client,
            config,
        }
    }

    async fn transcribe(&self, args: &TranscriptionArgs) -> Result<Vec<ResultMessage>, ToolError> {
        let audio = self.files.download(&args.file).await?;
        let mime_type = self
            .files
            .mime_type(&args.file)
            .unwrap_or_else(|| FALLBACK_MIME_TYPE.to_owned());
        let url = transcriptions_url(&args.endpoint)?;

        let audio_len = audio.len();
        let part = Part::bytes(audio)
            .file_name(AUDIO_PART_NAME)
            .mime_str(&mime_type)
            .map_err(|e| ToolError::Upstream(format!("invalid audio MIME type: {e}")))?;
        let form = args
            .form_fields()
            .into_iter()
            .fold(Form::new().part("file", part), |form, (name, value)| {
                form.text(name, value)
            });

        debug!(
            url = %url,
            model = %args.model,
            language = %args.language,
            format = args.response_format.as_str(),
            bytes = audio_len,
            "submitting transcription"
        );

        let response = self
            .client
            .post(url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| ToolError::Upstream(format!("request failed: {e}")))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ToolError::Upstream(format!("failed to read response body: {e}")))?;

        if !status.is_success() {
            return Err(ToolError::Upstream(format!(
                "server returned {status}: {}",
                truncate_error_body(&body)
            )));
        }

        debug!(status = status.as_u16(), bytes = body.len(), "transcription received");

        parse_transcription(args.response_format, body, self.config.emit_text_message)
    }
}

#[async_trait]
impl Tool for FasterWhisperTool {
    fn name(&self) -> &'static str {
        "faster_whisper"
    }

    fn description(&self) -> I18nText {
        I18nText::new(
            "Transcribe an audio file with a faster-whisper server.",
            "faster-whisper サーバーでオーディオファイルを文字起こしします。",
        )
    }

    fn describe_parameters(&self) -> Vec<ParameterDescriptor> {
        vec![
            ParameterDescriptor::new(
                "audio_file",
                ParameterType::File,
                ParameterForm::Llm,
                I18nText::new("Audio File", "オーディオファイル"),
                I18nText::new(
                    "The audio file to be transcribed.",
                    "文字起こし対象のオーディオファイル。",
                ),
            )
            .required(),
            ParameterDescriptor::new(
                "language",
                ParameterType::String,
                ParameterForm::Llm,
                I18nText::new("Language", "言語"),
                I18nText::new(
                    "Language of the audio file (e.g., en, ja, fr).",
                    "オーディオファイルの言語（例：en, ja, fr）。",
                ),
            )
            .default_value(DEFAULT_LANGUAGE),
            ParameterDescriptor::new(
                "model",
                ParameterType::String,
                ParameterForm::Form,
                I18nText::new("Model", "モデル"),
                I18nText::new(
                    "Transcription model served by the endpoint.",
                    "エンドポイントが提供する文字起こしモデル。",
                ),
            )
            .default_value(&self.config.model),
            ParameterDescriptor::new(
                "response_format",
                ParameterType::Select,
                ParameterForm::Form,
                I18nText::new("Response Format", "レスポンス形式"),
                I18nText::new(
                    "Format of the transcription result.",
                    "文字起こし結果の形式。",
                ),
            )
            .default_value(ResponseFormat::Text.as_str())
            .options(vec![
                ParameterOption::new("text", "Text", "テキスト"),
                ParameterOption::new("json", "JSON", "JSON"),
                ParameterOption::new("verbose_json", "Verbose JSON", "詳細JSON"),
                ParameterOption::new("srt", "SRT", "SRT"),
                ParameterOption::new("vtt", "WebVTT", "WebVTT"),
            ]),
            ParameterDescriptor::new(
                "endpoint",
                ParameterType::String,
                ParameterForm::Form,
                I18nText::new("Endpoint", "エンドポイント"),
                I18nText::new(
                    "Base URL of the faster-whisper server.",
                    "faster-whisper サーバーのベースURL。",
                ),
            )
            .default_value(&self.config.endpoint),
        ]
    }

    async fn invoke(&self, params: &ToolParameters) -> Result<Vec<ResultMessage>, ToolError> {
        let args = TranscriptionArgs::from_parameters(params, &self.config)?;
        self.transcribe(&args).await
    }
}
