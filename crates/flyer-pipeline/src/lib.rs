pub mod error;
pub mod pdf;
pub mod pipeline;
pub mod report;

pub use error::PipelineError;
pub use pdf::{assemble_pdf, collect_image_files, PdfArtifact, PdfError};
pub use pipeline::{s3_config, Pipeline, PipelineSettings, COMPLETION_MARKER};
pub use report::{ImageOutcome, ImageStatus, OfferReport, OfferStatus, PdfStatus, RunReport, RunSummary};
