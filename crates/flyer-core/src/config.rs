use crate::app_config::{AppConfig, Environment, ListingMode, SkipPolicy};
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but cannot be parsed.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but cannot be parsed.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the process environment so it can be tested with a plain
/// `HashMap` lookup.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;
    use std::path::PathBuf;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    // Empty strings count as unset so `.env` templates with blank values work.
    let optional = |var: &str| -> Option<String> {
        lookup(var)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    };

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        or_default(var, default)
            .parse::<u64>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let env = parse_environment(&or_default("FLYER_ENV", "development"));

    let bind_addr = or_default("FLYER_BIND_ADDR", "0.0.0.0:5000")
        .parse::<SocketAddr>()
        .map_err(|e| invalid("FLYER_BIND_ADDR", e.to_string()))?;
    let log_level = or_default("FLYER_LOG_LEVEL", "info");

    let site_base_url = or_default("FLYER_SITE_BASE_URL", "https://d4donline.com")
        .trim_end_matches('/')
        .to_string();
    if !site_base_url.starts_with("http://") && !site_base_url.starts_with("https://") {
        return Err(invalid(
            "FLYER_SITE_BASE_URL",
            "must start with http:// or https://".to_string(),
        ));
    }

    let listing_mode = parse_listing_mode(&or_default("FLYER_LISTING_MODE", "browser"))
        .ok_or_else(|| invalid("FLYER_LISTING_MODE", "expected `browser` or `http`".into()))?;
    let chrome_path = optional("FLYER_CHROME_PATH").map(PathBuf::from);
    let render_wait_secs = parse_u64("FLYER_RENDER_WAIT_SECS", "5")?;
    let request_timeout_secs = parse_u64("FLYER_REQUEST_TIMEOUT_SECS", "0")?;
    let user_agent = or_default("FLYER_USER_AGENT", "flyerdb/0.1 (flyer-archiver)");
    let work_dir = PathBuf::from(or_default("FLYER_WORK_DIR", "."));

    let s3_bucket = or_default("FLYER_S3_BUCKET", "needsandwants");
    let s3_region = or_default("FLYER_S3_REGION", "ap-south-1");
    let s3_prefix = or_default("FLYER_S3_PREFIX", "advertisement-flyer")
        .trim_matches('/')
        .to_string();
    let s3_endpoint_url = optional("FLYER_S3_ENDPOINT_URL");
    let aws_access_key_id = optional("AWS_ACCESS_KEY_ID");
    let aws_secret_access_key = optional("AWS_SECRET_ACCESS_KEY");

    let skip_policy = parse_skip_policy(&or_default("FLYER_SKIP_POLICY", "folder"))
        .ok_or_else(|| invalid("FLYER_SKIP_POLICY", "expected `folder` or `marker`".into()))?;

    Ok(AppConfig {
        env,
        bind_addr,
        log_level,
        site_base_url,
        listing_mode,
        chrome_path,
        render_wait_secs,
        request_timeout_secs,
        user_agent,
        work_dir,
        s3_bucket,
        s3_region,
        s3_prefix,
        s3_endpoint_url,
        aws_access_key_id,
        aws_secret_access_key,
        skip_policy,
    })
}

/// Parse a string into an `Environment` variant.
///
/// Unrecognized values default to `Environment::Development`.
fn parse_environment(s: &str) -> Environment {
    match s {
        "production" => Environment::Production,
        "test" => Environment::Test,
        _ => Environment::Development,
    }
}

fn parse_listing_mode(s: &str) -> Option<ListingMode> {
    match s.trim().to_ascii_lowercase().as_str() {
        "browser" => Some(ListingMode::Browser),
        "http" => Some(ListingMode::Http),
        _ => None,
    }
}

fn parse_skip_policy(s: &str) -> Option<SkipPolicy> {
    match s.trim().to_ascii_lowercase().as_str() {
        "folder" => Some(SkipPolicy::FolderPresence),
        "marker" => Some(SkipPolicy::CompletionMarker),
        _ => None,
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
