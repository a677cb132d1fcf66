//! Streaming file upload with progress reporting.

use std::path::Path;

use bytes::Bytes;
use futures::{Stream, StreamExt};
use reqwest::multipart::Part;
use tokio::sync::mpsc::UnboundedSender;
use tokio_util::io::ReaderStream;

use staffhub_core::error::{AppError, ErrorKind};
use staffhub_core::result::AppResult;

/// Events emitted while an avatar upload is in flight.
///
/// `Progress` may arrive many times; consumers finalize only on `Done`
/// or on the operation returning an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadEvent {
    /// Share of the file sent so far, 0 to 100.
    Progress {
        /// Rounded percentage.
        percent: u8,
    },
    /// The portal accepted the upload.
    Done,
}

/// Percentage of `sent` over `total`, rounded, saturating at 100.
fn percent(sent: u64, total: u64) -> u8 {
    if total == 0 {
        return 100;
    }
    let ratio = (sent as f64 / total as f64) * 100.0;
    ratio.round().min(100.0) as u8
}

/// Best-effort MIME type from the file extension.
fn mime_for_path(path: &Path) -> &'static str {
    match path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_lowercase)
        .as_deref()
    {
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("png") => "image/png",
        Some("gif") => "image/gif",
        _ => "application/octet-stream",
    }
}

/// File name of the path, for the multipart part.
fn file_name(path: &Path) -> String {
    path.file_name()
        .and_then(|name| name.to_str())
        .unwrap_or("profile-image")
        .to_string()
}

/// Opens a file as a chunk stream that reports cumulative progress on
/// the channel as each chunk is read. Returns the stream and the total
/// file size. A dropped receiver does not abort the transfer.
async fn counted_stream(
    path: &Path,
    events: UnboundedSender<UploadEvent>,
) -> AppResult<(impl Stream<Item = std::io::Result<Bytes>> + use<>, u64)> {
    let file = tokio::fs::File::open(path).await.map_err(|e| {
        AppError::with_source(
            ErrorKind::Storage,
            format!("Failed to open file: {}", path.display()),
            e,
        )
    })?;
    let total = file
        .metadata()
        .await
        .map_err(|e| {
            AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to stat file: {}", path.display()),
                e,
            )
        })?
        .len();

    let mut sent: u64 = 0;
    let stream = ReaderStream::new(file).map(move |chunk| {
        if let Ok(bytes) = &chunk {
            sent += bytes.len() as u64;
            let _ = events.send(UploadEvent::Progress {
                percent: percent(sent, total),
            });
        }
        chunk
    });
    Ok((stream, total))
}

/// Loads a file into a plain multipart part (no progress reporting).
pub(crate) async fn file_part(path: &Path) -> AppResult<Part> {
    let data = tokio::fs::read(path).await.map_err(|e| {
        AppError::with_source(
            ErrorKind::Storage,
            format!("Failed to read file: {}", path.display()),
            e,
        )
    })?;
    let part = Part::bytes(data)
        .file_name(file_name(path))
        .mime_str(mime_for_path(path))
        .map_err(|e| AppError::with_source(ErrorKind::Internal, "Invalid MIME type", e))?;
    Ok(part)
}

/// Opens a file as a streaming multipart part that reports progress.
pub(crate) async fn counting_file_part(
    path: &Path,
    events: UnboundedSender<UploadEvent>,
) -> AppResult<Part> {
    let (stream, total) = counted_stream(path, events).await?;
    let part = Part::stream_with_length(reqwest::Body::wrap_stream(stream), total)
        .file_name(file_name(path))
        .mime_str(mime_for_path(path))
        .map_err(|e| AppError::with_source(ErrorKind::Internal, "Invalid MIME type", e))?;
    Ok(part)
}
