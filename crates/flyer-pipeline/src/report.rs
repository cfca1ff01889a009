//! Per-image, per-offer, and per-run results.

use flyer_core::Offer;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ImageStatus {
    Uploaded { bytes: u64 },
    DownloadFailed { reason: String },
    UploadFailed { reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImageOutcome {
    /// 1-based position in the deduplicated URL list.
    pub index: usize,
    pub url: String,
    pub key: String,
    #[serde(flatten)]
    pub status: ImageStatus,
}

impl ImageOutcome {
    #[must_use]
    pub fn is_uploaded(&self) -> bool {
        matches!(self.status, ImageStatus::Uploaded { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PdfStatus {
    /// No image files were present locally.
    NotProduced,
    Uploaded { key: String, pages: usize },
    UploadFailed { key: String, reason: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OfferStatus {
    /// The gatekeeper found the folder already in storage.
    Skipped,
    Processed,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OfferReport {
    pub unique_id: String,
    pub title: String,
    pub folder: String,
    pub status: OfferStatus,
    pub images: Vec<ImageOutcome>,
    pub pdf: PdfStatus,
    pub marker_written: bool,
}

impl OfferReport {
    #[must_use]
    pub fn skipped(offer: &Offer, folder: String) -> Self {
        Self {
            unique_id: offer.unique_id.clone(),
            title: offer.title.clone(),
            folder,
            status: OfferStatus::Skipped,
            images: Vec::new(),
            pdf: PdfStatus::NotProduced,
            marker_written: false,
        }
    }

    #[must_use]
    pub fn processed(
        offer: &Offer,
        folder: String,
        images: Vec<ImageOutcome>,
        pdf: PdfStatus,
    ) -> Self {
        Self {
            unique_id: offer.unique_id.clone(),
            title: offer.title.clone(),
            folder,
            status: OfferStatus::Processed,
            images,
            pdf,
            marker_written: false,
        }
    }

    /// Every image and the PDF made it to storage.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.status == OfferStatus::Processed
            && self.images.iter().all(ImageOutcome::is_uploaded)
            && matches!(self.pdf, PdfStatus::Uploaded { .. })
    }

    #[must_use]
    pub fn failed_images(&self) -> usize {
        self.images.iter().filter(|i| !i.is_uploaded()).count()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    pub offers_found: usize,
    pub offers_processed: usize,
    pub offers_skipped: usize,
    pub images_uploaded: usize,
    pub images_failed: usize,
    pub pdfs_uploaded: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunReport {
    pub country: String,
    pub region: String,
    pub offers: Vec<OfferReport>,
}

impl RunReport {
    #[must_use]
    pub fn summary(&self) -> RunSummary {
        let mut summary = RunSummary {
            offers_found: self.offers.len(),
            ..RunSummary::default()
        };
        for offer in &self.offers {
            match offer.status {
                OfferStatus::Skipped => summary.offers_skipped += 1,
                OfferStatus::Processed => summary.offers_processed += 1,
            }
            let failed = offer.failed_images();
            summary.images_failed += failed;
            summary.images_uploaded += offer.images.len() - failed;
            if matches!(offer.pdf, PdfStatus::Uploaded { .. }) {
                summary.pdfs_uploaded += 1;
            }
        }
        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn offer() -> Offer {
        Offer {
            title: "Fresh Picks".to_owned(),
            detail_url: "https://example.com/offers/42/fresh".to_owned(),
            unique_id: "42".to_owned(),
        }
    }

    fn outcome(index: usize, status: ImageStatus) -> ImageOutcome {
        ImageOutcome {
            index,
            url: format!("https://cdn.example/{index}.jpg"),
            key: format!("f/image_{index}.jpg"),
            status,
        }
    }

    #[test]
    fn image_outcome_serializes_flat_with_status_tag() {
        let json = serde_json::to_value(outcome(
            2,
            ImageStatus::DownloadFailed {
                reason: "timeout".to_owned(),
            },
        ))
        .unwrap();
        assert_eq!(json["index"], 2);
        assert_eq!(json["status"], "download_failed");
        assert_eq!(json["reason"], "timeout");
    }

    #[test]
    fn is_complete_requires_all_images_and_pdf() {
        let uploaded = vec![
            outcome(1, ImageStatus::Uploaded { bytes: 10 }),
            outcome(2, ImageStatus::Uploaded { bytes: 20 }),
        ];
        let pdf = PdfStatus::Uploaded {
            key: "f/Fresh_Pick_0.pdf".to_owned(),
            pages: 2,
        };

        let complete = OfferReport::processed(&offer(), "f".to_owned(), uploaded.clone(), pdf);
        assert!(complete.is_complete());

        let no_pdf =
            OfferReport::processed(&offer(), "f".to_owned(), uploaded, PdfStatus::NotProduced);
        assert!(!no_pdf.is_complete());

        assert!(!OfferReport::skipped(&offer(), "f".to_owned()).is_complete());
    }

    #[test]
    fn summary_counts_offers_images_and_pdfs() {
        let processed = OfferReport::processed(
            &offer(),
            "f".to_owned(),
            vec![
                outcome(1, ImageStatus::Uploaded { bytes: 1 }),
                outcome(
                    2,
                    ImageStatus::UploadFailed {
                        reason: "no credentials".to_owned(),
                    },
                ),
            ],
            PdfStatus::Uploaded {
                key: "f/x.pdf".to_owned(),
                pages: 1,
            },
        );
        let report = RunReport {
            country: "uk".to_owned(),
            region: "london".to_owned(),
            offers: vec![processed, OfferReport::skipped(&offer(), "g".to_owned())],
        };

        assert_eq!(
            report.summary(),
            RunSummary {
                offers_found: 2,
                offers_processed: 1,
                offers_skipped: 1,
                images_uploaded: 1,
                images_failed: 1,
                pdfs_uploaded: 1,
            }
        );
    }
}
