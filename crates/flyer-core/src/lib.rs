pub mod app_config;
pub mod config;
pub mod naming;
pub mod offer;

pub use app_config::{AppConfig, Environment, ListingMode, SkipPolicy};
pub use config::{load_app_config, load_app_config_from_env};
pub use naming::{dedupe_preserving_order, extract_offer_id, id_batch, shorten_title};
pub use offer::{pdf_file_name, Offer};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
