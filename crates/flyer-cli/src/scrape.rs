//! `scrape` command: one region run against the configured site and bucket.

use flyer_core::AppConfig;
use flyer_pipeline::{s3_config, Pipeline};
use flyer_storage::S3Store;

/// Runs the region pipeline and prints the report to stdout.
///
/// # Errors
///
/// Returns an error if the HTTP client cannot be built or the run aborts.
/// Per-image failures only show up in the printed report.
pub(crate) async fn run_scrape(
    config: &AppConfig,
    country: &str,
    region: &str,
) -> anyhow::Result<()> {
    let store = S3Store::connect(s3_config(config)).await;
    let pipeline = Pipeline::from_app_config(config, store)?;

    let report = pipeline.run_region(country, region).await?;
    let summary = report.summary();
    println!("{}", serde_json::to_string_pretty(&report)?);

    if summary.images_failed > 0 {
        tracing::warn!(
            failed = summary.images_failed,
            "some images were not archived; see report"
        );
    }
    Ok(())
}
