use std::path::Path;
use std::time::Duration;

use reqwest::Client;
use tokio::io::AsyncWriteExt;

use crate::error::ScraperError;

/// HTTP client for offer listing pages, detail pages, and image downloads.
///
/// Requests are made once; there is no retry. Apart from
/// [`FlyerClient::fetch_page_body`], any non-2xx status is returned as
/// [`ScraperError::UnexpectedStatus`].
#[derive(Debug, Clone)]
pub struct FlyerClient {
    client: Client,
}

impl FlyerClient {
    /// Creates a client with the given per-request timeout and `User-Agent`.
    ///
    /// A `timeout_secs` of `0` disables the request timeout.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(timeout_secs: u64, user_agent: &str) -> Result<Self, ScraperError> {
        let mut builder = Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent);
        if timeout_secs > 0 {
            builder = builder.timeout(Duration::from_secs(timeout_secs));
        }
        Ok(Self {
            client: builder.build()?,
        })
    }

    /// Fetches `url` and returns the body as text.
    ///
    /// # Errors
    ///
    /// - [`ScraperError::UnexpectedStatus`] for any non-2xx response.
    /// - [`ScraperError::Http`] for network or body read failures.
    pub async fn fetch_html(&self, url: &str) -> Result<String, ScraperError> {
        let response = self.get_html(url).await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ScraperError::UnexpectedStatus {
                status: status.as_u16(),
                url: url.to_owned(),
            });
        }

        Ok(response.text().await?)
    }

    /// Fetches `url` and returns the body as text whatever the status.
    ///
    /// An expired offer page still answers, just with an error status and no
    /// flyer pages; that is logged and the body handed back.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::Http`] for network or body read failures.
    pub async fn fetch_page_body(&self, url: &str) -> Result<String, ScraperError> {
        let response = self.get_html(url).await?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(url, status = status.as_u16(), "offer page returned error status");
        }

        Ok(response.text().await?)
    }

    async fn get_html(&self, url: &str) -> Result<reqwest::Response, ScraperError> {
        Ok(self
            .client
            .get(url)
            .header(
                reqwest::header::ACCEPT,
                "text/html,application/xhtml+xml;q=0.9,*/*;q=0.8",
            )
            .send()
            .await?)
    }

    /// Streams the body of `url` into `dest`, chunk by chunk, and returns the
    /// number of bytes written.
    ///
    /// `dest` is created or truncated. If the stream fails midway the partial
    /// file is removed, so only complete downloads remain on disk.
    ///
    /// # Errors
    ///
    /// - [`ScraperError::UnexpectedStatus`] for any non-2xx response.
    /// - [`ScraperError::Http`] for network failures.
    /// - [`ScraperError::Io`] if `dest` cannot be created or written.
    pub async fn download_to_file(&self, url: &str, dest: &Path) -> Result<u64, ScraperError> {
        let mut response = self.client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ScraperError::UnexpectedStatus {
                status: status.as_u16(),
                url: url.to_owned(),
            });
        }

        let mut file = tokio::fs::File::create(dest)
            .await
            .map_err(|source| ScraperError::Io {
                path: dest.display().to_string(),
                source,
            })?;

        match copy_body(&mut response, &mut file, dest).await {
            Ok(written) => Ok(written),
            Err(e) => {
                drop(file);
                if let Err(rm) = tokio::fs::remove_file(dest).await {
                    tracing::debug!(path = %dest.display(), error = %rm, "failed to remove partial download");
                }
                Err(e)
            }
        }
    }
}

async fn copy_body(
    response: &mut reqwest::Response,
    file: &mut tokio::fs::File,
    dest: &Path,
) -> Result<u64, ScraperError> {
    let io_err = |source: std::io::Error| ScraperError::Io {
        path: dest.display().to_string(),
        source,
    };

    let mut written = 0u64;
    while let Some(chunk) = response.chunk().await? {
        file.write_all(&chunk).await.map_err(io_err)?;
        written += chunk.len() as u64;
    }
    file.flush().await.map_err(io_err)?;
    Ok(written)
}

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;
