//! Text extraction: the single point where uploaded document bytes become plain text.
//!
//! The PDF parser is CPU-bound and can panic on hostile input, so it always runs on the
//! blocking pool. Callers apply their own timeout.
use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use thiserror::Error;
use tokio::sync::Semaphore;
use tracing::debug;

#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("empty document")]
    Empty,

    #[error("unreadable PDF: {0}")]
    Pdf(String),

    #[error("PDF parser crashed")]
    Panicked,

    #[error("text extraction timed out after {0}s")]
    TimedOut(u64),

    #[error("PDF parser is shutting down")]
    Unavailable,
}

#[async_trait]
pub trait TextExtractor: Send + Sync {
    async fn extract_text(&self, bytes: Bytes) -> Result<String, ExtractionError>;
}

/// Default extractor backed by `pdf-extract`.
///
/// At most `max_concurrent_parses` parses hold a blocking thread at once. A permit travels
/// into the blocking task, so a parse abandoned by a caller's timeout keeps its slot until
/// it really finishes.
pub struct PdfTextExtractor {
    parse_slots: Arc<Semaphore>,
}

impl PdfTextExtractor {
    pub fn new(max_concurrent_parses: usize) -> Self {
        Self {
            parse_slots: Arc::new(Semaphore::new(max_concurrent_parses)),
        }
    }
}

#[async_trait]
impl TextExtractor for PdfTextExtractor {
    async fn extract_text(&self, bytes: Bytes) -> Result<String, ExtractionError> {
        if bytes.is_empty() {
            return Err(ExtractionError::Empty);
        }

        let permit = Arc::clone(&self.parse_slots)
            .acquire_owned()
            .await
            .map_err(|_| ExtractionError::Unavailable)?;

        let size = bytes.len();
        let text = tokio::task::spawn_blocking(move || {
            let _permit = permit;
            pdf_extract::extract_text_from_mem(&bytes)
        })
        .await
        .map_err(|_| ExtractionError::Panicked)?
        .map_err(|e| ExtractionError::Pdf(e.to_string()))?;

        debug!("Extracted {} chars from {} byte PDF", text.len(), size);
        Ok(clean_text(&text))
    }
}

/// Normalizes line endings and drops the NUL and form-feed characters pdf-extract
/// leaves between pages.
pub fn clean_text(text: &str) -> String {
    text.replace("\r\n", "\n")
        .chars()
        .filter(|c| !matches!(c, '\u{0}' | '\u{c}'))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_empty_bytes_rejected() {
        let err = PdfTextExtractor::new(1)
            .extract_text(Bytes::new())
            .await
            .unwrap_err();
        assert!(matches!(err, ExtractionError::Empty));
    }

    #[tokio::test]
    async fn test_garbage_bytes_fail_without_panicking() {
        let result = PdfTextExtractor::new(1)
            .extract_text(Bytes::from_static(b"definitely not a pdf"))
            .await;
        assert!(matches!(
            result,
            Err(ExtractionError::Pdf(_)) | Err(ExtractionError::Panicked)
        ));
    }

    #[tokio::test]
    async fn test_parses_wait_for_a_free_slot() {
        let extractor = PdfTextExtractor::new(1);
        let held = Arc::clone(&extractor.parse_slots)
            .acquire_owned()
            .await
            .unwrap();

        let blocked = tokio::time::timeout(
            Duration::from_millis(50),
            extractor.extract_text(Bytes::from_static(b"not a pdf")),
        )
        .await;
        assert!(blocked.is_err(), "parse ran without a free slot");

        drop(held);
        let result = extractor
            .extract_text(Bytes::from_static(b"not a pdf"))
            .await;
        assert!(result.is_err());
        assert_eq!(extractor.parse_slots.available_permits(), 1);
    }

    #[tokio::test]
    async fn test_closed_slots_report_unavailable() {
        let extractor = PdfTextExtractor::new(1);
        extractor.parse_slots.close();
        let err = extractor
            .extract_text(Bytes::from_static(b"%PDF-1.4"))
            .await
            .unwrap_err();
        assert!(matches!(err, ExtractionError::Unavailable));
    }

    #[test]
    fn test_clean_text() {
        assert_eq!(clean_text("Jane Doe\r\n\u{c}Pune\u{0}"), "Jane Doe\nPune");
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(
            ExtractionError::TimedOut(30).to_string(),
            "text extraction timed out after 30s"
        );
    }
}
