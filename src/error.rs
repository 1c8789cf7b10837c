use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("No monthly metrics available: {0}")]
    NoMetrics(String),

    #[error("Workbook error for '{role}': {details}")]
    WorkbookError { role: String, details: String },

    #[error("Chart service error: {0}")]
    ChartService(String),

    #[error("PDF conversion error: {0}")]
    PdfConversion(String),

    #[error("Missing configuration: {0}")]
    MissingConfig(String),

    #[cfg(feature = "gemini")]
    #[error("Insight generation error: {0}")]
    InsightGeneration(String),

    #[error("HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ReportError>;
