//! Artifact download responses.

use axum::{
    http::header,
    response::{IntoResponse, Response},
};
use bytes::Bytes;

use crate::render::engine::OutputFormat;

pub const DEFAULT_FILENAME: &str = "resume.pdf";

/// Compiled bytes served as a file attachment.
///
/// The bytes move straight into the response body; nothing is staged on disk, so
/// there is no temporary handle to release after the response is sent.
#[derive(Debug)]
pub struct ArtifactDownload {
    bytes: Bytes,
    filename: String,
    format: OutputFormat,
}

impl ArtifactDownload {
    pub fn new(bytes: Vec<u8>, filename: Option<&str>, format: OutputFormat) -> Self {
        Self {
            bytes: Bytes::from(bytes),
            filename: sanitize_filename(filename.unwrap_or_default()),
            format,
        }
    }

    pub fn filename(&self) -> &str {
        &self.filename
    }
}

impl IntoResponse for ArtifactDownload {
    fn into_response(self) -> Response {
        (
            [
                (header::CONTENT_TYPE, self.format.content_type().to_string()),
                (
                    header::CONTENT_DISPOSITION,
                    format!("attachment; filename=\"{}\"", self.filename),
                ),
            ],
            self.bytes,
        )
            .into_response()
    }
}

/// Keeps the last path component and drops characters that cannot appear in a
/// quoted ASCII header value. Blank results fall back to [`DEFAULT_FILENAME`].
fn sanitize_filename(name: &str) -> String {
    let base = name.rsplit(&['/', '\\'][..]).next().unwrap_or_default();
    let cleaned: String = base
        .chars()
        .filter(|c| c.is_ascii() && !c.is_ascii_control() && !matches!(*c, '"' | ';'))
        .collect();
    let cleaned = cleaned.trim();

    if cleaned.is_empty() || cleaned.chars().all(|c| c == '.') {
        DEFAULT_FILENAME.to_string()
    } else {
        cleaned.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_filename() {
        let download = ArtifactDownload::new(vec![1, 2, 3], None, OutputFormat::Pdf);
        assert_eq!(download.filename(), "resume.pdf");
    }

    #[test]
    fn test_sanitize_filename() {
        assert_eq!(sanitize_filename("cv.pdf"), "cv.pdf");
        assert_eq!(sanitize_filename("../../etc/passwd"), "passwd");
        assert_eq!(sanitize_filename("C:\\Users\\me\\cv.pdf"), "cv.pdf");
        assert_eq!(sanitize_filename("a\"b;c\r\n.pdf"), "abc.pdf");
        assert_eq!(sanitize_filename("résumé.pdf"), "rsum.pdf");
        assert_eq!(sanitize_filename("  "), DEFAULT_FILENAME);
        assert_eq!(sanitize_filename(".."), DEFAULT_FILENAME);
        assert_eq!(sanitize_filename("dir/"), DEFAULT_FILENAME);
    }

    #[test]
    fn test_download_response_headers() {
        let response =
            ArtifactDownload::new(b"%PDF".to_vec(), Some("jane.pdf"), OutputFormat::Pdf)
                .into_response();
        let headers = response.headers();
        assert_eq!(headers[header::CONTENT_TYPE], "application/pdf");
        assert_eq!(
            headers[header::CONTENT_DISPOSITION],
            "attachment; filename=\"jane.pdf\""
        );
    }
}
