use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Extension, Json,
};
use flyer_pipeline::RunReport;
use flyer_storage::ObjectStore;
use serde::{Deserialize, Serialize};

use super::{ApiError, AppState};
use crate::middleware::RequestId;

pub(super) const MISSING_PARAMS: &str = "Country and region are required parameters";
pub(super) const SCRAPE_SUCCEEDED: &str = "Scraping completed successfully";

#[derive(Debug, Deserialize)]
pub(super) struct ScrapeRequest {
    #[serde(default)]
    country: Option<String>,
    #[serde(default)]
    region: Option<String>,
}

#[derive(Debug, Serialize)]
pub(super) struct ScrapeResponse {
    message: &'static str,
    report: RunReport,
}

/// `POST /scrape_images`: runs the whole region before responding.
pub(super) async fn scrape_images<S: ObjectStore + 'static>(
    State(state): State<AppState<S>>,
    Extension(req_id): Extension<RequestId>,
    payload: Result<Json<ScrapeRequest>, JsonRejection>,
) -> Result<Json<ScrapeResponse>, ApiError> {
    let (country, region) = match payload {
        Ok(Json(body)) => required_params(body),
        Err(rejection) => {
            tracing::debug!(request_id = %req_id.0, error = %rejection, "rejected scrape body");
            None
        }
    }
    .ok_or_else(|| ApiError::new(StatusCode::BAD_REQUEST, MISSING_PARAMS))?;

    tracing::info!(request_id = %req_id.0, %country, %region, "scrape requested");

    match state.pipeline.run_region(&country, &region).await {
        Ok(report) => Ok(Json(ScrapeResponse {
            message: SCRAPE_SUCCEEDED,
            report,
        })),
        Err(e) => {
            tracing::error!(request_id = %req_id.0, %country, %region, error = %e, "scrape failed");
            Err(ApiError::new(StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))
        }
    }
}

fn required_params(body: ScrapeRequest) -> Option<(String, String)> {
    let country = body.country.filter(|c| !c.is_empty())?;
    let region = body.region.filter(|r| !r.is_empty())?;
    Some((country, region))
}
