use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScraperError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    #[error("invalid URL \"{url}\": {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("listing page {url} has no `.grid-container` element")]
    ListingContainerMissing { url: String },

    #[error("offer link #{index} on {url} is missing the `{attribute}` attribute")]
    MissingAttribute {
        url: String,
        index: usize,
        attribute: &'static str,
    },

    #[error("no numeric offer id in link \"{href}\"")]
    MissingOfferId { href: String },

    #[error("headless browser error: {0}")]
    Browser(String),

    #[error("I/O error writing {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}
