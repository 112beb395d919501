use thiserror::Error;

#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("No sheet produced a valid statistics table")]
    NoValidData,

    #[error("Data parsing error: {0}")]
    ParseError(String),

    #[error("File I/O error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),
}
