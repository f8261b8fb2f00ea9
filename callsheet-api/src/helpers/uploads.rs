//! Receives the `file` field of a multipart upload into a temporary file.

use crate::config::UploadConfig;
use crate::error::ApiError;
use actix_multipart::Multipart;
use extractors::FileFormat;
use futures::StreamExt;
use std::io::Write;
use tempfile::NamedTempFile;

pub const FILE_FIELD: &str = "file";

const ALLOWED_MIME_TYPES: &[&str] = &[
    "text/csv",
    "application/csv",
    "text/plain",
    "application/vnd.ms-excel",
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
    "application/octet-stream",
];

const WRONG_TYPE: &str = "Only CSV, XLSX, and XLS files are allowed!";

/// An accepted upload. The temporary file is removed when this is dropped.
#[derive(Debug)]
pub struct ReceivedUpload {
    pub file: NamedTempFile,
    pub original_name: String,
    pub format: FileFormat,
}

/// Both the extension and the declared content type must look like a list.
pub fn check_upload_type(filename: &str, mime: Option<&str>) -> Result<FileFormat, ApiError> {
    let format = std::path::Path::new(filename)
        .extension()
        .and_then(|ext| ext.to_str())
        .and_then(FileFormat::from_extension)
        .ok_or_else(|| ApiError::UnsupportedFormat(WRONG_TYPE.to_string()))?;

    match mime {
        Some(mime) if !ALLOWED_MIME_TYPES.contains(&mime) => {
            Err(ApiError::UnsupportedFormat(WRONG_TYPE.to_string()))
        }
        _ => Ok(format),
    }
}

const MIB: usize = 1024 * 1024;

/// Whole mebibytes read as "10 MB"; anything else is given in bytes.
fn describe_size(bytes: usize) -> String {
    if bytes >= MIB && bytes % MIB == 0 {
        format!("{} MB", bytes / MIB)
    } else {
        format!("{} bytes", bytes)
    }
}

pub async fn receive_upload(
    mut payload: Multipart,
    config: &UploadConfig,
) -> Result<ReceivedUpload, ApiError> {
    let mut received: Option<ReceivedUpload> = None;

    while let Some(item) = payload.next().await {
        let mut field =
            item.map_err(|e| ApiError::Validation(format!("Invalid multipart data: {}", e)))?;

        let is_file_field = field.name() == Some(FILE_FIELD);
        if !is_file_field || received.is_some() {
            while field.next().await.is_some() {}
            continue;
        }

        let original_name = field
            .content_disposition()
            .and_then(|cd| cd.get_filename())
            .map(|name| name.to_string())
            .unwrap_or_default();
        let mime = field.content_type().map(|m| m.essence_str().to_string());
        let format = check_upload_type(&original_name, mime.as_deref())?;

        let upload_dir = config.upload_dir();
        std::fs::create_dir_all(&upload_dir)
            .map_err(|e| ApiError::Internal(format!("Could not create upload directory: {}", e)))?;

        let mut file = tempfile::Builder::new()
            .prefix(&format!("{}-", chrono::Utc::now().timestamp_millis()))
            .suffix(&format!(".{}", format.extension()))
            .tempfile_in(&upload_dir)
            .map_err(|e| ApiError::Internal(format!("Could not store upload: {}", e)))?;

        let mut size = 0usize;
        while let Some(chunk) = field.next().await {
            let bytes =
                chunk.map_err(|e| ApiError::Validation(format!("Error reading file: {}", e)))?;
            size += bytes.len();
            if size > config.max_file_size_bytes {
                return Err(ApiError::Validation(format!(
                    "File is too large. Maximum size is {}",
                    describe_size(config.max_file_size_bytes)
                )));
            }
            file.write_all(&bytes)
                .map_err(|e| ApiError::Internal(format!("Could not store upload: {}", e)))?;
        }
        file.flush()
            .map_err(|e| ApiError::Internal(format!("Could not store upload: {}", e)))?;

        tracing::debug!(
            "Received upload {} ({} bytes) at {}",
            original_name,
            size,
            file.path().display()
        );

        received = Some(ReceivedUpload {
            file,
            original_name,
            format,
        });
    }

    received.ok_or_else(|| ApiError::Validation("Please upload a file".to_string()))
}
