// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Loading image files from disk.

use parkdesk_domain::ImageUpload;
use std::path::Path;
use tracing::debug;

/// MIME type reported for files with an unrecognised extension.
///
/// Upload validation rejects it.
pub const UNKNOWN_MIME: &str = "application/octet-stream";

/// Guesses an image MIME type from a file extension.
#[must_use]
pub fn mime_for_path(path: &Path) -> &'static str {
    let extension: String = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();
    match extension.as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "webp" => "image/webp",
        _ => UNKNOWN_MIME,
    }
}

/// Reads an image file into an upload.
///
/// # Errors
///
/// Returns an error if the file cannot be read.
pub async fn read_image(path: &Path) -> std::io::Result<ImageUpload> {
    let bytes: Vec<u8> = tokio::fs::read(path).await?;
    let file_name: String = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    let mime: &str = mime_for_path(path);
    debug!(file = %path.display(), size = bytes.len(), mime, "Read image file");
    Ok(ImageUpload::new(&file_name, mime, bytes))
}
