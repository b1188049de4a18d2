use thiserror::Error;

#[derive(Debug, Error)]
pub enum ParserError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("records document is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("activity table could not be read: {0}")]
    Csv(#[from] csv::Error),

    #[error("report document could not be read: {0}")]
    Pdf(#[from] lopdf::Error),

    #[error("deck archive could not be opened: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("slide {slide} contains invalid XML: {message}")]
    SlideXml { slide: String, message: String },
}

impl ParserError {
    pub(crate) fn io(path: impl Into<String>, source: std::io::Error) -> Self {
        ParserError::Io {
            path: path.into(),
            source,
        }
    }
}
