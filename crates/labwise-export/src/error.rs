use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("PDF generation error: {0}")]
    Pdf(String),
}
