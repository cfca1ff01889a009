use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::NaiveDate;
use flyer_core::{AppConfig, Offer, SkipPolicy};
use flyer_scraper::{extract_image_urls, BrowserSettings, FlyerClient, RegionLister};
use flyer_storage::{ObjectStore, S3Config, IMAGE_CONTENT_TYPE, PDF_CONTENT_TYPE};

use crate::error::PipelineError;
use crate::pdf::assemble_pdf;
use crate::report::{ImageOutcome, ImageStatus, OfferReport, PdfStatus, RunReport};

/// Empty object written under an offer folder once everything uploaded.
pub const COMPLETION_MARKER: &str = "_COMPLETE";

const MARKER_CONTENT_TYPE: &str = "text/plain";

#[derive(Debug, Clone)]
pub struct PipelineSettings {
    pub site_base_url: String,
    /// Top-level key prefix, without surrounding slashes.
    pub storage_prefix: String,
    /// Local root under which offer folders are mirrored.
    pub work_dir: PathBuf,
    pub skip_policy: SkipPolicy,
}

impl PipelineSettings {
    #[must_use]
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self {
            site_base_url: config.site_base_url.clone(),
            storage_prefix: config.s3_prefix.clone(),
            work_dir: config.work_dir.clone(),
            skip_policy: config.skip_policy,
        }
    }
}

#[must_use]
pub fn s3_config(config: &AppConfig) -> S3Config {
    S3Config {
        bucket: config.s3_bucket.clone(),
        region: config.s3_region.clone(),
        endpoint_url: config.s3_endpoint_url.clone(),
        access_key_id: config.aws_access_key_id.clone(),
        secret_access_key: config.aws_secret_access_key.clone(),
    }
}

/// Lists a region's offers and mirrors each new one into the object store.
///
/// Offers, and the images within an offer, are handled strictly one after
/// another.
#[derive(Debug)]
pub struct Pipeline<S> {
    client: FlyerClient,
    lister: RegionLister,
    store: S,
    settings: PipelineSettings,
}

impl<S: ObjectStore> Pipeline<S> {
    #[must_use]
    pub fn new(
        client: FlyerClient,
        lister: RegionLister,
        store: S,
        settings: PipelineSettings,
    ) -> Self {
        Self {
            client,
            lister,
            store,
            settings,
        }
    }

    /// Wires the HTTP client, listing strategy, and settings from `config`.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::Scraper`] if the HTTP client cannot be built.
    pub fn from_app_config(config: &AppConfig, store: S) -> Result<Self, PipelineError> {
        let client = FlyerClient::new(config.request_timeout_secs, &config.user_agent)?;
        let browser = BrowserSettings {
            chrome_path: config.chrome_path.clone(),
            render_wait: Duration::from_secs(config.render_wait_secs),
        };
        let lister = RegionLister::new(config.listing_mode, client.clone(), browser);
        Ok(Self::new(
            client,
            lister,
            store,
            PipelineSettings::from_app_config(config),
        ))
    }

    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }

    #[must_use]
    pub fn settings(&self) -> &PipelineSettings {
        &self.settings
    }

    /// Runs the whole region using today's local date for folder names.
    ///
    /// # Errors
    ///
    /// See [`Pipeline::run_region_on`].
    pub async fn run_region(&self, country: &str, region: &str) -> Result<RunReport, PipelineError> {
        let today = chrono::Local::now().date_naive();
        self.run_region_on(country, region, today).await
    }

    /// Runs the whole region with `date` stamped into every folder name.
    ///
    /// # Errors
    ///
    /// The run stops at the first listing, gatekeeper, detail-page network,
    /// local folder, or PDF assembly failure. A detail page answering with an
    /// error status is parsed as-is, which normally yields no images. Image
    /// transfer and PDF upload failures are recorded in the report instead.
    pub async fn run_region_on(
        &self,
        country: &str,
        region: &str,
        date: NaiveDate,
    ) -> Result<RunReport, PipelineError> {
        tracing::info!(country, region, %date, "starting region scrape");
        let offers = self
            .lister
            .list_offers(&self.settings.site_base_url, country, region)
            .await?;

        let mut reports = Vec::with_capacity(offers.len());
        for offer in &offers {
            reports.push(self.process_offer(offer, date).await?);
        }

        let report = RunReport {
            country: country.to_owned(),
            region: region.to_owned(),
            offers: reports,
        };
        let summary = report.summary();
        tracing::info!(
            country,
            region,
            offers = summary.offers_found,
            processed = summary.offers_processed,
            skipped = summary.offers_skipped,
            images_uploaded = summary.images_uploaded,
            images_failed = summary.images_failed,
            "region scrape finished"
        );
        Ok(report)
    }

    /// Handles a single offer: gatekeeper, detail page, images, PDF, marker.
    ///
    /// # Errors
    ///
    /// See [`Pipeline::run_region_on`].
    pub async fn process_offer(
        &self,
        offer: &Offer,
        date: NaiveDate,
    ) -> Result<OfferReport, PipelineError> {
        let folder = offer.folder(&self.settings.storage_prefix, date);

        if self.already_processed(&folder).await? {
            tracing::info!(unique_id = %offer.unique_id, %folder, "already in storage, skipping");
            return Ok(OfferReport::skipped(offer, folder));
        }

        let html = self.client.fetch_page_body(&offer.detail_url).await?;
        let image_urls = extract_image_urls(&html);
        tracing::info!(
            unique_id = %offer.unique_id,
            %folder,
            images = image_urls.len(),
            "processing offer"
        );

        let local_dir = self.settings.work_dir.join(&folder);
        tokio::fs::create_dir_all(&local_dir)
            .await
            .map_err(|source| PipelineError::LocalFolder {
                path: local_dir.display().to_string(),
                source,
            })?;

        let images = self.transfer_images(&image_urls, &folder, &local_dir).await;
        let pdf = self.publish_pdf(offer, &folder, &local_dir).await?;

        let mut report = OfferReport::processed(offer, folder, images, pdf);
        if self.settings.skip_policy == SkipPolicy::CompletionMarker && report.is_complete() {
            report.marker_written = self.write_marker(&report.folder).await;
        }
        Ok(report)
    }

    async fn already_processed(&self, folder: &str) -> Result<bool, PipelineError> {
        let lookup_prefix = match self.settings.skip_policy {
            // Trailing slash keeps `..._123` from matching `..._1234`.
            SkipPolicy::FolderPresence => format!("{folder}/"),
            SkipPolicy::CompletionMarker => format!("{folder}/{COMPLETION_MARKER}"),
        };
        Ok(self.store.prefix_exists(&lookup_prefix).await?)
    }

    async fn transfer_images(
        &self,
        urls: &[String],
        folder: &str,
        local_dir: &Path,
    ) -> Vec<ImageOutcome> {
        let mut outcomes = Vec::with_capacity(urls.len());
        for (i, url) in urls.iter().enumerate() {
            let index = i + 1;
            let name = format!("image_{index}.jpg");
            let key = format!("{folder}/{name}");
            let status = self.transfer_image(url, &key, &local_dir.join(&name)).await;
            outcomes.push(ImageOutcome {
                index,
                url: url.clone(),
                key,
                status,
            });
        }
        outcomes
    }

    async fn transfer_image(&self, url: &str, key: &str, local: &Path) -> ImageStatus {
        let bytes = match self.client.download_to_file(url, local).await {
            Ok(bytes) => bytes,
            Err(e) => {
                tracing::warn!(url, error = %e, "image download failed");
                return ImageStatus::DownloadFailed {
                    reason: e.to_string(),
                };
            }
        };

        match self.store.put_file(key, local, IMAGE_CONTENT_TYPE).await {
            Ok(()) => {
                tracing::debug!(key, bytes, "image uploaded");
                ImageStatus::Uploaded { bytes }
            }
            Err(e) => {
                tracing::warn!(key, error = %e, "image upload failed");
                ImageStatus::UploadFailed {
                    reason: e.to_string(),
                }
            }
        }
    }

    async fn publish_pdf(
        &self,
        offer: &Offer,
        folder: &str,
        local_dir: &Path,
    ) -> Result<PdfStatus, PipelineError> {
        let dir = local_dir.to_path_buf();
        let file_name = offer.pdf_file_name();
        let artifact = tokio::task::spawn_blocking(move || assemble_pdf(&dir, file_name))
            .await
            .map_err(|e| PipelineError::Task(e.to_string()))??;

        let Some(artifact) = artifact else {
            tracing::info!(folder, "no images to assemble, PDF not produced");
            return Ok(PdfStatus::NotProduced);
        };

        let key = format!("{folder}/{}", artifact.file_name);
        let pages = artifact.page_count;
        match self
            .store
            .put_bytes(&key, artifact.bytes, PDF_CONTENT_TYPE)
            .await
        {
            Ok(()) => {
                tracing::info!(%key, pages, "PDF uploaded");
                Ok(PdfStatus::Uploaded { key, pages })
            }
            Err(e) => {
                tracing::warn!(%key, error = %e, "PDF upload failed");
                Ok(PdfStatus::UploadFailed {
                    key,
                    reason: e.to_string(),
                })
            }
        }
    }

    async fn write_marker(&self, folder: &str) -> bool {
        let key = format!("{folder}/{COMPLETION_MARKER}");
        match self
            .store
            .put_bytes(&key, Vec::new(), MARKER_CONTENT_TYPE)
            .await
        {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(%key, error = %e, "failed to write completion marker");
                false
            }
        }
    }
}
