//! Axum route handlers for the Screening API.

use axum::{
    extract::{Multipart, State},
    Json,
};
use tracing::debug;

use crate::errors::AppError;
use crate::screening::models::{ScreeningResponse, SelectionCriteria};
use crate::screening::pipeline::UploadedDocument;
use crate::screening::scoring::ScoreRule;
use crate::state::AppState;

const FILES_FIELD: &str = "files";
const CRITERIA_FIELD: &str = "criteria";

struct ResumeUpload {
    documents: Vec<UploadedDocument>,
    criteria: Option<SelectionCriteria>,
}

/// POST /upload-resume/
///
/// Multipart body: repeated `files` parts (PDF) and an optional `criteria` part holding
/// JSON selection criteria. Returns one result per file in upload order plus the
/// batch bias report.
pub async fn handle_upload_resume(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<ScreeningResponse>, AppError> {
    let upload = read_upload(&mut multipart).await?;

    if upload.documents.is_empty() {
        return Err(AppError::Validation(format!(
            "at least one resume is required in the '{FILES_FIELD}' field"
        )));
    }

    let response = state
        .pipeline
        .screen_batch(upload.documents, upload.criteria.as_ref())
        .await;

    Ok(Json(response))
}

/// GET /scoring-rules
///
/// Lists the bonus rules behind every score, so recruiters can see what is being rewarded.
pub async fn handle_scoring_rules(State(state): State<AppState>) -> Json<Vec<ScoreRule>> {
    Json(state.pipeline.scorer().rules().to_vec())
}

async fn read_upload(multipart: &mut Multipart) -> Result<ResumeUpload, AppError> {
    let mut documents = Vec::new();
    let mut criteria = None;

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some(FILES_FIELD) => {
                let filename = field.file_name().unwrap_or("unnamed").to_string();
                let content_type = field.content_type().map(str::to_string);
                let bytes = field.bytes().await?;
                documents.push(UploadedDocument {
                    filename,
                    content_type,
                    bytes,
                });
            }
            Some(CRITERIA_FIELD) => {
                let raw = field.text().await?;
                criteria = Some(parse_criteria(&raw)?);
            }
            other => debug!("Ignoring unexpected multipart field {:?}", other),
        }
    }

    Ok(ResumeUpload {
        documents,
        criteria,
    })
}

fn parse_criteria(raw: &str) -> Result<SelectionCriteria, AppError> {
    let criteria: SelectionCriteria = serde_json::from_str(raw)
        .map_err(|e| AppError::Validation(format!("criteria is not valid JSON: {e}")))?;
    criteria
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;
    Ok(criteria)
}
