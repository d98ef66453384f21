//! Tests for `src/tools/file_writer.rs` — persisting and blob modes.

use std::path::PathBuf;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use tempfile::TempDir;

use gworks::config::{WriterConfig, WriterMode};
use gworks::tools::file_writer::FileWriterTool;
use gworks::tools::parameters::ToolParameters;
use gworks::tools::{invoke_to_messages, Tool};
use gworks::types::{ResultMessage, SaveAs};

fn persisting_tool() -> (TempDir, PathBuf, FileWriterTool) {
    let tmp = TempDir::new().expect("should create temp dir");
    let output_dir = tmp.path().join("output");
    let tool = FileWriterTool::new(WriterConfig {
        output_dir: output_dir.clone(),
        mode: WriterMode::Persist,
    });
    (tmp, output_dir, tool)
}

fn blob_tool() -> FileWriterTool {
    FileWriterTool::new(WriterConfig {
        output_dir: PathBuf::from("unused"),
        mode: WriterMode::Blob,
    })
}

// ── Persist mode ───────────────────────────────────────────────

#[tokio::test]
async fn text_content_is_written_and_confirmed() {
    let (_tmp, output_dir, tool) = persisting_tool();
    let params = ToolParameters::new()
        .with("content", "こんにちは\nworld")
        .with("filename", "greeting.txt");

    let messages = invoke_to_messages(&tool, &params).await;

    assert_eq!(
        messages,
        vec![ResultMessage::text("File written successfully: greeting.txt")]
    );
    let written = std::fs::read_to_string(output_dir.join("greeting.txt")).expect("file exists");
    assert_eq!(written, "こんにちは\nworld");
}

#[tokio::test]
async fn binary_content_round_trips_exactly() {
    let (_tmp, output_dir, tool) = persisting_tool();
    let original: Vec<u8> = (0..=255u8).rev().chain(0..=255u8).collect();
    let params = ToolParameters::new()
        .with("content", STANDARD.encode(&original))
        .with("content_type", "binary")
        .with("filename", "all-bytes.bin");

    let messages = invoke_to_messages(&tool, &params).await;

    assert_eq!(messages.len(), 1);
    let written = std::fs::read(output_dir.join("all-bytes.bin")).expect("file exists");
    assert_eq!(written, original);
}

#[tokio::test]
async fn traversal_filename_lands_inside_output_dir() {
    let (tmp, output_dir, tool) = persisting_tool();
    let params = ToolParameters::new()
        .with("content", "root:x:0:0")
        .with("filename", "../../etc/passwd");

    let messages = invoke_to_messages(&tool, &params).await;

    assert_eq!(
        messages,
        vec![ResultMessage::text("File written successfully: passwd")]
    );
    assert!(output_dir.join("passwd").is_file());
    assert!(!tmp.path().join("etc").exists());
}

#[tokio::test]
async fn existing_output_dir_is_reused() {
    let (_tmp, output_dir, tool) = persisting_tool();
    std::fs::create_dir_all(&output_dir).expect("pre-create");

    for name in ["a.txt", "b.txt"] {
        let params = ToolParameters::new()
            .with("content", name)
            .with("filename", name);
        let messages = invoke_to_messages(&tool, &params).await;
        assert_eq!(messages.len(), 1);
    }

    assert_eq!(std::fs::read_dir(&output_dir).expect("readable").count(), 2);
}

#[tokio::test]
async fn invalid_filenames_are_rejected() {
    let (_tmp, output_dir, tool) = persisting_tool();

    for name in ["", "   ", "..", "dir/"] {
        let params = ToolParameters::new()
            .with("content", "x")
            .with("filename", name);
        let messages = invoke_to_messages(&tool, &params).await;
        assert_eq!(messages, vec![ResultMessage::text("Invalid filename")], "name {name:?}");
    }

    let missing = ToolParameters::new().with("content", "x");
    let messages = invoke_to_messages(&tool, &missing).await;
    assert_eq!(messages, vec![ResultMessage::text("Invalid filename")]);

    assert!(!output_dir.exists(), "nothing should be written");
}

#[tokio::test]
async fn invalid_base64_is_reported() {
    let (_tmp, output_dir, tool) = persisting_tool();
    let params = ToolParameters::new()
        .with("content", "%%% not base64 %%%")
        .with("content_type", "binary")
        .with("filename", "x.bin");

    let messages = invoke_to_messages(&tool, &params).await;

    assert_eq!(
        messages,
        vec![ResultMessage::text("Invalid base64 encoded binary content")]
    );
    assert!(!output_dir.join("x.bin").exists());
}

#[tokio::test]
async fn missing_content_is_reported() {
    let (_tmp, _output_dir, tool) = persisting_tool();
    let params = ToolParameters::new().with("filename", "x.txt");

    let messages = invoke_to_messages(&tool, &params).await;

    assert_eq!(messages, vec![ResultMessage::text("No content provided")]);
}

#[tokio::test]
async fn unwritable_output_dir_is_a_write_failure() {
    let tmp = TempDir::new().expect("should create temp dir");
    let blocker = tmp.path().join("not-a-dir");
    std::fs::write(&blocker, b"file in the way").expect("seed blocker");
    let tool = FileWriterTool::new(WriterConfig {
        output_dir: blocker,
        mode: WriterMode::Persist,
    });
    let params = ToolParameters::new()
        .with("content", "x")
        .with("filename", "x.txt");

    let messages = invoke_to_messages(&tool, &params).await;

    assert_eq!(messages.len(), 1);
    let text = messages[0].as_text().expect("text message");
    assert!(text.starts_with("Failed to write file: "), "got: {text}");
}

#[tokio::test]
async fn failed_rename_leaves_no_partial_file() {
    let (_tmp, output_dir, tool) = persisting_tool();
    let occupied = output_dir.join("report.txt");
    std::fs::create_dir_all(occupied.join("inner")).expect("directory in the way");
    let params = ToolParameters::new()
        .with("content", "quarterly numbers")
        .with("filename", "report.txt");

    let messages = invoke_to_messages(&tool, &params).await;

    let text = messages[0].as_text().expect("text message");
    assert!(text.starts_with("Failed to write file: "), "got: {text}");
    let entries: Vec<String> = std::fs::read_dir(&output_dir)
        .expect("readable")
        .map(|e| e.expect("entry").file_name().to_string_lossy().into_owned())
        .collect();
    assert_eq!(entries, vec!["report.txt".to_owned()]);
    assert!(occupied.join("inner").is_dir());
}

#[tokio::test]
async fn successful_write_leaves_only_the_target() {
    let (_tmp, output_dir, tool) = persisting_tool();
    let params = ToolParameters::new()
        .with("content", "done")
        .with("filename", "notes.md");

    invoke_to_messages(&tool, &params).await;

    let entries: Vec<String> = std::fs::read_dir(&output_dir)
        .expect("readable")
        .map(|e| e.expect("entry").file_name().to_string_lossy().into_owned())
        .collect();
    assert_eq!(entries, vec!["notes.md".to_owned()]);
}

#[tokio::test]
async fn null_filename_is_rejected_when_persisting() {
    let (_tmp, _output_dir, tool) = persisting_tool();
    let params = ToolParameters::from_json(serde_json::json!({
        "content": "hi",
        "filename": null,
    }))
    .expect("host parameters decode");

    let messages = invoke_to_messages(&tool, &params).await;

    assert_eq!(messages, vec![ResultMessage::text("Invalid filename")]);
}

// ── Blob mode ──────────────────────────────────────────────────

#[tokio::test]
async fn blob_mode_null_filename_uses_custom_slot() {
    let params = ToolParameters::from_json(serde_json::json!({
        "content": "hi",
        "filename": null,
    }))
    .expect("host parameters decode");

    let messages = invoke_to_messages(&blob_tool(), &params).await;

    assert_eq!(
        messages,
        vec![
            ResultMessage::text("Successfully prepared content"),
            ResultMessage::blob(b"hi".to_vec(), "text/plain", SaveAs::CustomSlot),
        ]
    );
}

#[tokio::test]
async fn blob_mode_without_filename_uses_custom_slot() {
    let params = ToolParameters::new().with("content", "hello");

    let messages = invoke_to_messages(&blob_tool(), &params).await;

    assert_eq!(
        messages,
        vec![
            ResultMessage::text("Successfully prepared content"),
            ResultMessage::blob(b"hello".to_vec(), "text/plain", SaveAs::CustomSlot),
        ]
    );
}

#[tokio::test]
async fn blob_mode_binary_keeps_sanitized_name() {
    let original = vec![0u8, 159, 146, 150];
    let params = ToolParameters::new()
        .with("content", STANDARD.encode(&original))
        .with("content_type", "binary")
        .with("filename", "nested/dir/raw.bin");

    let messages = invoke_to_messages(&blob_tool(), &params).await;

    assert_eq!(
        messages[1],
        ResultMessage::blob(
            original,
            "application/octet-stream",
            SaveAs::Named("raw.bin".to_owned())
        )
    );
}

// ── Descriptors ────────────────────────────────────────────────

#[test]
fn filename_required_only_when_persisting() {
    let (_tmp, _output_dir, persisting) = persisting_tool();

    let persist_params = persisting.describe_parameters();
    let blob_params = blob_tool().describe_parameters();

    let names: Vec<&str> = persist_params.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["content_type", "content", "filename"]);
    assert_eq!(persist_params[0].default.as_deref(), Some("text"));
    assert!(persist_params[2].required);
    assert!(!blob_params[2].required);
}
