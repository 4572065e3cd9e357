//! Reading user-selected files into the attachment wire format.
//!
//! Each file of a selection is read and encoded independently; a batch is
//! only ever handed back whole, once every encoding in it has finished.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use base64::Engine;
use futures_util::future::join_all;

use crate::types::Attachment;

/// Upper bound for a single staged file.
pub const DEFAULT_MAX_ATTACHMENT_BYTES: u64 = 20 * 1024 * 1024;

/// Reads and base64-encodes one file (blocking I/O kept off the runtime).
pub async fn encode_file(path: PathBuf, max_bytes: u64) -> Result<Attachment> {
    tokio::task::spawn_blocking(move || encode_file_sync(&path, max_bytes))
        .await
        .context("attachment encoding task failed")?
}

/// Encodes a whole selection batch.
///
/// The N encodings run independently and are joined here; callers see either
/// the complete batch or an error, never a partial one. Overlapping
/// selections each get their own join, so completions cannot be
/// misattributed across batches.
pub async fn encode_batch(paths: Vec<PathBuf>, max_bytes: u64) -> Result<Vec<Attachment>> {
    let encodings = join_all(
        paths
            .into_iter()
            .map(|path| encode_file(path, max_bytes)),
    )
    .await;
    encodings.into_iter().collect()
}

fn encode_file_sync(path: &Path, max_bytes: u64) -> Result<Attachment> {
    let metadata = std::fs::metadata(path)
        .with_context(|| format!("cannot read {}", path.display()))?;
    if metadata.len() > max_bytes {
        bail!(
            "{} is too large ({} bytes, max {max_bytes})",
            path.display(),
            metadata.len()
        );
    }

    let data = std::fs::read(path).with_context(|| format!("cannot read {}", path.display()))?;
    let content_type = sniff_content_type(path, &data);
    let filename = path
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or("attachment")
        .to_string();

    Ok(Attachment {
        filename,
        content_type,
        data: base64::engine::general_purpose::STANDARD.encode(&data),
    })
}

/// MIME type from content sniffing, falling back to the file extension.
fn sniff_content_type(path: &Path, data: &[u8]) -> String {
    if let Some(kind) = infer::get(data) {
        return kind.mime_type().to_string();
    }
    mime_type_for_extension(path)
        .unwrap_or("application/octet-stream")
        .to_string()
}

/// Extension table for formats `infer` cannot sniff (mostly text).
fn mime_type_for_extension(path: &Path) -> Option<&'static str> {
    let ext = path.extension().and_then(|e| e.to_str())?;

    match ext.to_ascii_lowercase().as_str() {
        "txt" | "log" => Some("text/plain"),
        "md" => Some("text/markdown"),
        "csv" => Some("text/csv"),
        "json" => Some("application/json"),
        "html" | "htm" => Some("text/html"),
        "xml" => Some("application/xml"),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use tempfile::TempDir;

    use super::*;

    fn write_file(dir: &TempDir, name: &str, bytes: &[u8]) -> PathBuf {
        let path = dir.path().join(name);
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(bytes).unwrap();
        path
    }

    #[test]
    fn test_encode_text_file_by_extension() {
        let dir = TempDir::new().unwrap();
        let path = write_file(&dir, "notes.txt", b"hello attachments");

        let attachment = encode_file_sync(&path, DEFAULT_MAX_ATTACHMENT_BYTES).unwrap();
        assert_eq!(attachment.filename, "notes.txt");
        assert_eq!(attachment.content_type, "text/plain");
        assert_eq!(
            base64::engine::general_purpose::STANDARD
                .decode(&attachment.data)
                .unwrap(),
            b"hello attachments"
        );
    }

    #[test]
    fn test_encode_sniffs_png_magic_bytes() {
        let dir = TempDir::new().unwrap();
        let png_header = [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0, 0, 0, 0];
        let path = write_file(&dir, "image.dat", &png_header);

        let attachment = encode_file_sync(&path, DEFAULT_MAX_ATTACHMENT_BYTES).unwrap();
        assert_eq!(attachment.content_type, "image/png");
    }

    #[test]
    fn test_unknown_extension_falls_back_to_octet_stream() {
        let dir = TempDir::new().unwrap();
        let path = write_file(&dir, "blob.xyz", b"????");

        let attachment = encode_file_sync(&path, DEFAULT_MAX_ATTACHMENT_BYTES).unwrap();
        assert_eq!(attachment.content_type, "application/octet-stream");
    }

    #[test]
    fn test_oversized_file_rejected_before_read() {
        let dir = TempDir::new().unwrap();
        let path = write_file(&dir, "big.txt", &[0u8; 64]);

        let err = encode_file_sync(&path, 16).unwrap_err();
        assert!(err.to_string().contains("too large"));
    }

    #[tokio::test]
    async fn test_encode_batch_returns_whole_batch() {
        let dir = TempDir::new().unwrap();
        let paths = vec![
            write_file(&dir, "a.txt", b"one"),
            write_file(&dir, "b.txt", b"two"),
            write_file(&dir, "c.txt", b"three"),
        ];

        let batch = encode_batch(paths, DEFAULT_MAX_ATTACHMENT_BYTES)
            .await
            .unwrap();
        assert_eq!(batch.len(), 3);
        assert_eq!(batch[0].filename, "a.txt");
        assert_eq!(batch[2].filename, "c.txt");
    }

    #[tokio::test]
    async fn test_encode_batch_fails_whole_on_missing_file() {
        let dir = TempDir::new().unwrap();
        let paths = vec![
            write_file(&dir, "a.txt", b"one"),
            dir.path().join("missing.txt"),
        ];

        assert!(
            encode_batch(paths, DEFAULT_MAX_ATTACHMENT_BYTES)
                .await
                .is_err()
        );
    }
}
