//! Input resolution: normalise a user-supplied path or URL to PDF bytes.
//!
//! The extractor parses from memory, so both local files and URL
//! downloads resolve to an owned byte buffer — nothing is written to
//! disk and there is no handle to release once this function returns.
//! The `%PDF` magic is validated before parsing so callers get a
//! meaningful error rather than a parser failure deep in `lopdf`.

use crate::error::ExtractionError;
use std::path::PathBuf;
use tracing::{debug, info};

/// Check if the input string looks like a URL.
pub fn is_url(input: &str) -> bool {
    input.starts_with("http://") || input.starts_with("https://")
}

/// Resolve the input string to in-memory PDF bytes.
///
/// If the input is a URL, download it with the given timeout. If it is a
/// local file, validate it exists and is readable.
pub async fn resolve_input(input: &str, timeout_secs: u64) -> Result<Vec<u8>, ExtractionError> {
    if is_url(input) {
        download_url(input, timeout_secs).await
    } else {
        read_local(input)
    }
}

/// Read a local file, validating existence, permissions, and PDF magic.
fn read_local(path_str: &str) -> Result<Vec<u8>, ExtractionError> {
    let path = PathBuf::from(path_str);

    let bytes = match std::fs::read(&path) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == std::io::ErrorKind::PermissionDenied => {
            return Err(ExtractionError::PermissionDenied { path });
        }
        Err(_) => {
            return Err(ExtractionError::FileNotFound { path });
        }
    };

    check_magic(&bytes, path_str)?;
    debug!("Resolved local document: {}", path.display());
    Ok(bytes)
}

/// Download a URL into memory and validate the PDF magic.
async fn download_url(url: &str, timeout_secs: u64) -> Result<Vec<u8>, ExtractionError> {
    info!("Downloading document from: {}", url);

    let client = reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(timeout_secs))
        .build()
        .map_err(|e| ExtractionError::DownloadFailed {
            url: url.to_string(),
            reason: e.to_string(),
        })?;

    let response = client.get(url).send().await.map_err(|e| {
        if e.is_timeout() {
            ExtractionError::DownloadTimeout {
                url: url.to_string(),
                secs: timeout_secs,
            }
        } else {
            ExtractionError::DownloadFailed {
                url: url.to_string(),
                reason: e.to_string(),
            }
        }
    })?;

    if !response.status().is_success() {
        return Err(ExtractionError::DownloadFailed {
            url: url.to_string(),
            reason: format!("HTTP {}", response.status()),
        });
    }

    let bytes = response
        .bytes()
        .await
        .map_err(|e| ExtractionError::DownloadFailed {
            url: url.to_string(),
            reason: e.to_string(),
        })?
        .to_vec();

    check_magic(&bytes, url)?;
    info!("Downloaded {} bytes", bytes.len());
    Ok(bytes)
}

fn check_magic(bytes: &[u8], source_name: &str) -> Result<(), ExtractionError> {
    if bytes.len() < 4 || &bytes[..4] != b"%PDF" {
        let mut magic = [0u8; 4];
        let n = bytes.len().min(4);
        magic[..n].copy_from_slice(&bytes[..n]);
        return Err(ExtractionError::NotAPdf {
            source_name: source_name.to_string(),
            magic,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_is_url() {
        assert!(is_url("https://example.com/doc.pdf"));
        assert!(is_url("http://example.com/doc.pdf"));
        assert!(!is_url("/tmp/doc.pdf"));
        assert!(!is_url("doc.pdf"));
        assert!(!is_url(""));
    }

    #[tokio::test]
    async fn missing_file_is_reported() {
        let err = resolve_input("/definitely/not/a/real/file.pdf", 5)
            .await
            .unwrap_err();
        assert!(matches!(err, ExtractionError::FileNotFound { .. }));
    }

    #[tokio::test]
    async fn non_pdf_magic_is_rejected() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        f.write_all(b"not a pdf at all").unwrap();

        let err = resolve_input(f.path().to_str().unwrap(), 5)
            .await
            .unwrap_err();
        match err {
            ExtractionError::NotAPdf { magic, .. } => assert_eq!(&magic, b"not "),
            other => panic!("expected NotAPdf, got {other:?}"),
        }
    }
}
