use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::naming::{id_batch, shorten_title};

/// One promotional flyer listed on a region's offers page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Offer {
    pub title: String,
    /// Absolute URL of the offer's detail page.
    pub detail_url: String,
    /// Numeric id taken from the detail URL path. Kept as the original digit
    /// string.
    pub unique_id: String,
}

impl Offer {
    #[must_use]
    pub fn short_title(&self) -> String {
        shorten_title(&self.title)
    }

    /// Storage folder for this offer: `<prefix>/<short_title>/<date>_<id>`.
    #[must_use]
    pub fn folder(&self, prefix: &str, date: NaiveDate) -> String {
        format!(
            "{prefix}/{}/{}_{}",
            self.short_title(),
            date.format("%Y-%m-%d"),
            self.unique_id
        )
    }

    /// PDF file name: `<short_title>_<id / 100>.pdf`.
    #[must_use]
    pub fn pdf_file_name(&self) -> String {
        pdf_file_name(&self.short_title(), &self.unique_id)
    }
}

/// Builds the PDF name from an already-shortened title and a raw id.
#[must_use]
pub fn pdf_file_name(short_title: &str, unique_id: &str) -> String {
    format!("{short_title}_{}.pdf", id_batch(unique_id))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Offer {
        Offer {
            title: "Big Weekly Savings Event Now".to_owned(),
            detail_url: "https://d4donline.com/en/uk/london/offers/12345/big-weekly".to_owned(),
            unique_id: "12345".to_owned(),
        }
    }

    #[test]
    fn folder_combines_prefix_title_date_and_id() {
        let date = NaiveDate::from_ymd_opt(2026, 3, 7).unwrap();
        assert_eq!(
            sample().folder("advertisement-flyer", date),
            "advertisement-flyer/Big_Weekly/2026-03-07_12345"
        );
    }

    #[test]
    fn pdf_file_name_uses_id_divided_by_100() {
        assert_eq!(sample().pdf_file_name(), "Big_Weekly_123.pdf");
    }

    #[test]
    fn offer_serializes_with_snake_case_fields() {
        let json = serde_json::to_value(sample()).unwrap();
        assert_eq!(json["unique_id"], "12345");
        assert_eq!(json["title"], "Big Weekly Savings Event Now");
    }
}
