use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Template render error: {0}")]
    Render(#[from] askama::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
