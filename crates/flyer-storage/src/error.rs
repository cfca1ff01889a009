use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    /// An S3 call failed: transport, credentials, or a service error response.
    #[error("S3 {operation} failed for s3://{bucket}/{key}: {message}")]
    Request {
        operation: &'static str,
        bucket: String,
        key: String,
        message: String,
    },

    #[error("failed to read {path} for upload: {reason}")]
    ReadFile { path: String, reason: String },
}
