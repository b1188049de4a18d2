use thiserror::Error;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("source read failed: {0}")]
    Parser(#[from] bizmeld_parser::ParserError),

    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("polars operation failed: {0}")]
    Polars(#[from] polars::error::PolarsError),

    #[error("data processing error: {0}")]
    Processing(String),

    #[error("column '{column}' value '{value}' is not numeric")]
    Coercion { column: String, value: String },
}

pub type Result<T> = std::result::Result<T, PipelineError>;
