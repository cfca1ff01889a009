use thiserror::Error;

use crate::pdf::PdfError;

/// Errors that abort a scraping run.
///
/// Per-image download and upload failures are not errors at this level; they
/// are recorded in [`crate::ImageOutcome`] and the run continues.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Scraper(#[from] flyer_scraper::ScraperError),

    #[error(transparent)]
    Storage(#[from] flyer_storage::StorageError),

    #[error(transparent)]
    Pdf(#[from] PdfError),

    #[error("failed to prepare local folder {path}: {source}")]
    LocalFolder {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("background task failed: {0}")]
    Task(String),
}
