//! Batch orchestration: text extraction → attribute extraction → scoring, then one bias
//! pass over the whole batch.
//!
//! Text extraction runs concurrently, one task per document, each bounded by a timeout.
//! Results come back in upload order. A document that fails is reported in place and left
//! out of the bias pass; it never fails the batch.

use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use thiserror::Error;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::screening::bias::{aggregate_bias, BiasPolicy};
use crate::screening::extractor::AttributeExtractor;
use crate::screening::models::{
    BatchItem, FailedDocument, ScoredResult, ScreeningResponse, SelectionCriteria,
};
use crate::screening::scoring::ScoreCalculator;
use crate::text_extraction::{ExtractionError, TextExtractor};

const PDF_CONTENT_TYPE: &str = "application/pdf";

/// One file part of an upload.
#[derive(Debug, Clone)]
pub struct UploadedDocument {
    pub filename: String,
    pub content_type: Option<String>,
    pub bytes: Bytes,
}

impl UploadedDocument {
    fn looks_like_pdf(&self) -> bool {
        self.filename.to_ascii_lowercase().ends_with(".pdf")
            || self.content_type.as_deref() == Some(PDF_CONTENT_TYPE)
    }
}

#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("unsupported file type: only PDF resumes are accepted")]
    UnsupportedType,

    #[error(transparent)]
    Extraction(#[from] ExtractionError),
}

enum Job {
    Rejected(DocumentError),
    Running(JoinHandle<Result<String, ExtractionError>>),
}

pub struct ScreeningPipeline {
    text_extractor: Arc<dyn TextExtractor>,
    extractor: AttributeExtractor,
    scorer: ScoreCalculator,
    bias_policy: BiasPolicy,
    extraction_timeout: Duration,
}

impl ScreeningPipeline {
    pub fn new(
        text_extractor: Arc<dyn TextExtractor>,
        extractor: AttributeExtractor,
        scorer: ScoreCalculator,
        bias_policy: BiasPolicy,
        extraction_timeout: Duration,
    ) -> Self {
        Self {
            text_extractor,
            extractor,
            scorer,
            bias_policy,
            extraction_timeout,
        }
    }

    pub fn scorer(&self) -> &ScoreCalculator {
        &self.scorer
    }

    pub async fn screen_batch(
        &self,
        documents: Vec<UploadedDocument>,
        criteria: Option<&SelectionCriteria>,
    ) -> ScreeningResponse {
        let batch_id = Uuid::new_v4();
        let file_count = documents.len();

        if let Some(criteria) = criteria {
            // Accepted and validated, but scoring does not use it.
            debug!(
                %batch_id,
                role = %criteria.role,
                target_count = criteria.target_count,
                skills = criteria.required_skills.len(),
                "Selection criteria received"
            );
        }

        let jobs: Vec<(String, Job)> = documents
            .into_iter()
            .map(|doc| {
                let filename = doc.filename.clone();
                let job = if doc.looks_like_pdf() {
                    Job::Running(self.spawn_extraction(doc.bytes))
                } else {
                    Job::Rejected(DocumentError::UnsupportedType)
                };
                (filename, job)
            })
            .collect();

        let mut results = Vec::with_capacity(file_count);
        for (filename, job) in jobs {
            let text = match job {
                Job::Rejected(err) => Err(err),
                Job::Running(handle) => match handle.await {
                    Ok(extracted) => extracted.map_err(DocumentError::from),
                    Err(_) => Err(ExtractionError::Panicked.into()),
                },
            };

            let item = match text {
                Ok(text) => {
                    let info = self.extractor.extract(&text);
                    let score = self.scorer.score(&info);
                    debug!(%batch_id, %filename, score, ?info, "Candidate scored");
                    BatchItem::Scored(ScoredResult {
                        filename,
                        info,
                        score,
                    })
                }
                Err(err) => {
                    warn!(%batch_id, %filename, error = %err, "Document could not be screened");
                    BatchItem::Failed(FailedDocument {
                        filename,
                        error: err.to_string(),
                    })
                }
            };
            results.push(item);
        }

        let bias_report = aggregate_bias(
            results
                .iter()
                .filter_map(BatchItem::scored)
                .map(|scored| &scored.info),
            &self.bias_policy,
        );

        let failed = results.iter().filter(|r| r.scored().is_none()).count();
        info!(%batch_id, files = file_count, failed, "Batch screened");

        ScreeningResponse {
            results,
            bias_report,
        }
    }

    fn spawn_extraction(&self, bytes: Bytes) -> JoinHandle<Result<String, ExtractionError>> {
        let text_extractor = Arc::clone(&self.text_extractor);
        let timeout = self.extraction_timeout;
        tokio::spawn(async move {
            tokio::time::timeout(timeout, text_extractor.extract_text(bytes))
                .await
                .unwrap_or(Err(ExtractionError::TimedOut(timeout.as_secs())))
        })
    }
}
