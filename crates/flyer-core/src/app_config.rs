use std::net::SocketAddr;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

/// How the region listing page is retrieved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListingMode {
    /// Render the page in headless Chromium before reading the DOM.
    Browser,
    /// Plain GET; only works when the listing is server-rendered.
    Http,
}

/// What the gatekeeper treats as "already processed".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipPolicy {
    /// Any object under the offer folder.
    FolderPresence,
    /// The `_COMPLETE` marker written after a fully successful upload.
    CompletionMarker,
}

#[derive(Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub bind_addr: SocketAddr,
    pub log_level: String,
    pub site_base_url: String,
    pub listing_mode: ListingMode,
    pub chrome_path: Option<PathBuf>,
    pub render_wait_secs: u64,
    pub request_timeout_secs: u64,
    pub user_agent: String,
    pub work_dir: PathBuf,
    pub s3_bucket: String,
    pub s3_region: String,
    pub s3_prefix: String,
    pub s3_endpoint_url: Option<String>,
    pub aws_access_key_id: Option<String>,
    pub aws_secret_access_key: Option<String>,
    pub skip_policy: SkipPolicy,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("bind_addr", &self.bind_addr)
            .field("log_level", &self.log_level)
            .field("site_base_url", &self.site_base_url)
            .field("listing_mode", &self.listing_mode)
            .field("chrome_path", &self.chrome_path)
            .field("render_wait_secs", &self.render_wait_secs)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("user_agent", &self.user_agent)
            .field("work_dir", &self.work_dir)
            .field("s3_bucket", &self.s3_bucket)
            .field("s3_region", &self.s3_region)
            .field("s3_prefix", &self.s3_prefix)
            .field("s3_endpoint_url", &self.s3_endpoint_url)
            .field("aws_access_key_id", &self.aws_access_key_id)
            .field(
                "aws_secret_access_key",
                &self.aws_secret_access_key.as_ref().map(|_| "[redacted]"),
            )
            .field("skip_policy", &self.skip_policy)
            .finish()
    }
}
