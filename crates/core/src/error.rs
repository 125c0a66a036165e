use thiserror::Error;

#[derive(Debug, Error)]
pub enum RecordError {
    #[error("Malformed record JSON: {0}")]
    Json(#[from] serde_json::Error),
}
