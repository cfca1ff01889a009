//! Object storage for flyer images and PDFs.
//!
//! [`ObjectStore`] is the seam the pipeline is written against; [`S3Store`]
//! is the production implementation.

pub mod error;
pub mod s3;

use std::future::Future;
use std::path::Path;

pub use error::StorageError;
pub use s3::{S3Config, S3Store};

/// Content type used for downloaded flyer pages.
pub const IMAGE_CONTENT_TYPE: &str = "image/jpeg";
/// Content type used for assembled flyer PDFs.
pub const PDF_CONTENT_TYPE: &str = "application/pdf";

pub trait ObjectStore: Send + Sync {
    /// Returns `true` when at least one object key starts with `prefix`.
    fn prefix_exists(&self, prefix: &str)
        -> impl Future<Output = Result<bool, StorageError>> + Send;

    /// Uploads the file at `path` under `key`.
    fn put_file(
        &self,
        key: &str,
        path: &Path,
        content_type: &str,
    ) -> impl Future<Output = Result<(), StorageError>> + Send;

    /// Uploads an in-memory buffer under `key`.
    fn put_bytes(
        &self,
        key: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> impl Future<Output = Result<(), StorageError>> + Send;
}
