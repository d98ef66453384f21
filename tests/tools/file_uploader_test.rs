//! Tests for `src/tools/file_uploader.rs`.

use std::sync::Arc;

use gworks::host::{FileHandle, FileType, LocalFileStore};
use gworks::tools::file_uploader::FileUploaderTool;
use gworks::tools::parameters::ToolParameters;
use gworks::tools::{invoke_to_messages, Tool};
use gworks::types::{ResultMessage, SaveAs};

use crate::support::MemoryFileStore;

fn params_for(file_type: FileType, name: &str) -> ToolParameters {
    ToolParameters::new()
        .with("file", FileHandle::new("stored", file_type))
        .with("file_name", name)
}

#[tokio::test]
async fn missing_file_reports_no_file_provided() {
    let store = Arc::new(MemoryFileStore::default());
    let tool = FileUploaderTool::new(store.clone());

    let params = ToolParameters::new().with("file_name", "x");
    let messages = invoke_to_messages(&tool, &params).await;

    assert_eq!(messages, vec![ResultMessage::text("No file provided")]);
    assert_eq!(store.downloads(), 0);
}

#[tokio::test]
async fn audio_file_becomes_mp3_blob_after_confirmation() {
    let store = Arc::new(MemoryFileStore::default().with_file("stored", b"ID3audio"));
    let tool = FileUploaderTool::new(store);

    let messages = invoke_to_messages(&tool, &params_for(FileType::Audio, "meeting")).await;

    assert_eq!(
        messages,
        vec![
            ResultMessage::text("Successfully processed file"),
            ResultMessage::blob(
                b"ID3audio".to_vec(),
                "audio/mpeg",
                SaveAs::Named("meeting.mp3".to_owned())
            ),
        ]
    );
}

#[tokio::test]
async fn unclassified_types_fall_back_to_octet_stream() {
    let store = Arc::new(MemoryFileStore::default().with_file("stored", &[0xde, 0xad]));
    let tool = FileUploaderTool::new(store);

    let messages = invoke_to_messages(&tool, &params_for(FileType::Custom, "dump")).await;

    match &messages[1] {
        ResultMessage::Blob {
            mime_type, save_as, ..
        } => {
            assert_eq!(mime_type, "application/octet-stream");
            assert_eq!(save_as, &SaveAs::Named("dump.bin".to_owned()));
        }
        other => panic!("expected blob, got {other:?}"),
    }
}

#[tokio::test]
async fn undeclared_type_name_falls_back_to_octet_stream() {
    let store = Arc::new(MemoryFileStore::default().with_file("x", b"%PDF-1.7"));
    let tool = FileUploaderTool::new(store);
    let params = ToolParameters::from_json(serde_json::json!({
        "file": {"id": "x", "type": "pdf"},
        "file_name": "doc",
    }))
    .expect("host parameters decode");

    let messages = invoke_to_messages(&tool, &params).await;

    assert_eq!(
        messages,
        vec![
            ResultMessage::text("Successfully processed file"),
            ResultMessage::blob(
                b"%PDF-1.7".to_vec(),
                "application/octet-stream",
                SaveAs::Named("doc.bin".to_owned())
            ),
        ]
    );
}

#[tokio::test]
async fn repeated_uploads_are_byte_identical() {
    let store = Arc::new(MemoryFileStore::default().with_file("stored", b"\x00\x01video"));
    let tool = FileUploaderTool::new(store);
    let params = params_for(FileType::Video, "clip");

    let first = invoke_to_messages(&tool, &params).await;
    let second = invoke_to_messages(&tool, &params).await;

    assert_eq!(first, second);
    assert_eq!(first.len(), 2);
}

#[tokio::test]
async fn download_failure_is_reported_as_processing_failure() {
    let tool = FileUploaderTool::new(Arc::new(MemoryFileStore::default()));

    let messages = invoke_to_messages(&tool, &params_for(FileType::Image, "photo")).await;

    assert_eq!(
        messages,
        vec![ResultMessage::text(
            "Failed to process file: file not found: stored"
        )]
    );
}

#[tokio::test]
async fn local_store_serves_files_from_root() {
    let tmp = tempfile::tempdir().expect("temp dir");
    std::fs::write(tmp.path().join("stored"), b"jpeg-bytes").expect("seed file");
    let tool = FileUploaderTool::new(Arc::new(LocalFileStore::new(tmp.path())));

    let messages = invoke_to_messages(&tool, &params_for(FileType::Image, "photo")).await;

    assert_eq!(
        messages[1],
        ResultMessage::blob(
            b"jpeg-bytes".to_vec(),
            "image/jpeg",
            SaveAs::Named("photo.jpg".to_owned())
        )
    );
}

#[test]
fn file_is_a_form_parameter_and_name_is_llm_filled() {
    let tool = FileUploaderTool::new(Arc::new(MemoryFileStore::default()));
    let def = tool.definition();

    assert_eq!(def.name, "file_uploader");
    assert!(def.input_schema["properties"].get("file").is_none());
    assert!(def.input_schema["properties"].get("file_name").is_some());
}
