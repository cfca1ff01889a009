//! Region listing page: URL construction and offer-link extraction.

use std::sync::LazyLock;

use flyer_core::{extract_offer_id, Offer};
use reqwest::Url;
use scraper::{Html, Selector};

use crate::error::ScraperError;

static CONTAINER_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(".grid-container").expect("valid container selector"));
static LINK_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("a").expect("valid link selector"));

/// Builds `<base>/en/<country>/<region>/offers`, percent-encoding the
/// caller-supplied segments.
///
/// # Errors
///
/// Returns [`ScraperError::InvalidUrl`] if `base_url` cannot be parsed or
/// cannot carry a path.
pub fn listing_url(base_url: &str, country: &str, region: &str) -> Result<String, ScraperError> {
    let invalid = |reason: &str| ScraperError::InvalidUrl {
        url: base_url.to_owned(),
        reason: reason.to_owned(),
    };

    let mut url = Url::parse(base_url).map_err(|e| invalid(&e.to_string()))?;
    url.path_segments_mut()
        .map_err(|()| invalid("URL cannot be a base"))?
        .pop_if_empty()
        .extend(["en", country, region, "offers"]);
    Ok(url.to_string())
}

/// Extracts every offer link inside the first `.grid-container` of a rendered
/// listing page, in document order.
///
/// Each link's `href` is resolved against `page_url`, and the offer id is the
/// first `/<digits>/` segment of the resolved URL.
///
/// # Errors
///
/// - [`ScraperError::InvalidUrl`] if `page_url` or a link `href` is not a valid URL.
/// - [`ScraperError::ListingContainerMissing`] when there is no container.
/// - [`ScraperError::MissingAttribute`] when a link lacks `title` or `href`.
/// - [`ScraperError::MissingOfferId`] when a link's URL contains no numeric id.
pub fn parse_listing(html: &str, page_url: &str) -> Result<Vec<Offer>, ScraperError> {
    let base = Url::parse(page_url).map_err(|e| ScraperError::InvalidUrl {
        url: page_url.to_owned(),
        reason: e.to_string(),
    })?;

    let document = Html::parse_document(html);
    let container = document.select(&CONTAINER_SELECTOR).next().ok_or_else(|| {
        ScraperError::ListingContainerMissing {
            url: page_url.to_owned(),
        }
    })?;

    container
        .select(&LINK_SELECTOR)
        .enumerate()
        .map(|(index, link)| {
            let attr = |attribute: &'static str| {
                link.value()
                    .attr(attribute)
                    .ok_or_else(|| ScraperError::MissingAttribute {
                        url: page_url.to_owned(),
                        index,
                        attribute,
                    })
            };

            let title = attr("title")?;
            let href = attr("href")?;
            let detail_url = base
                .join(href)
                .map_err(|e| ScraperError::InvalidUrl {
                    url: href.to_owned(),
                    reason: e.to_string(),
                })?
                .to_string();

            let unique_id =
                extract_offer_id(&detail_url).ok_or_else(|| ScraperError::MissingOfferId {
                    href: detail_url.clone(),
                })?;

            Ok(Offer {
                title: title.to_owned(),
                detail_url,
                unique_id,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = "https://d4donline.com/en/uk/london/offers";

    #[test]
    fn listing_url_formats_country_and_region() {
        assert_eq!(
            listing_url("https://d4donline.com", "uk", "london").unwrap(),
            "https://d4donline.com/en/uk/london/offers"
        );
    }

    #[test]
    fn listing_url_encodes_segments() {
        assert_eq!(
            listing_url("http://127.0.0.1:9000/", "uae", "abu dhabi").unwrap(),
            "http://127.0.0.1:9000/en/uae/abu%20dhabi/offers"
        );
    }

    #[test]
    fn listing_url_rejects_garbage_base() {
        assert!(matches!(
            listing_url("not a url", "uk", "london"),
            Err(ScraperError::InvalidUrl { .. })
        ));
    }

    #[test]
    fn parse_listing_extracts_offers_in_order() {
        let html = r#"
            <html><body>
              <div class="grid-container">
                <a title="Big Weekly Savings Event Now" href="/en/uk/london/offers/12345/big-weekly">x</a>
                <div><a title="Fresh Picks" href="https://d4donline.com/en/uk/london/offers/678/fresh">y</a></div>
              </div>
              <div class="grid-container"><a title="Ignored" href="/offers/999/x">z</a></div>
            </body></html>
        "#;

        let offers = parse_listing(html, PAGE).expect("listing should parse");
        assert_eq!(offers.len(), 2);
        assert_eq!(offers[0].title, "Big Weekly Savings Event Now");
        assert_eq!(
            offers[0].detail_url,
            "https://d4donline.com/en/uk/london/offers/12345/big-weekly"
        );
        assert_eq!(offers[0].unique_id, "12345");
        assert_eq!(offers[0].short_title(), "Big_Weekly");
        assert_eq!(offers[1].unique_id, "678");
    }

    #[test]
    fn parse_listing_with_empty_container_returns_no_offers() {
        let html = r#"<div class="grid-container"></div>"#;
        assert!(parse_listing(html, PAGE).unwrap().is_empty());
    }

    #[test]
    fn parse_listing_fails_without_container() {
        let html = "<div class=\"other\"><a title=\"t\" href=\"/1/\">x</a></div>";
        assert!(matches!(
            parse_listing(html, PAGE),
            Err(ScraperError::ListingContainerMissing { .. })
        ));
    }

    #[test]
    fn parse_listing_fails_on_missing_title() {
        let html = r#"<div class="grid-container"><a href="/offers/1/x">x</a></div>"#;
        let err = parse_listing(html, PAGE).unwrap_err();
        assert!(
            matches!(
                err,
                ScraperError::MissingAttribute {
                    attribute: "title",
                    index: 0,
                    ..
                }
            ),
            "got: {err:?}"
        );
    }

    #[test]
    fn parse_listing_fails_on_missing_offer_id() {
        let html = r#"<div class="grid-container"><a title="t" href="/offers/latest">x</a></div>"#;
        assert!(matches!(
            parse_listing(html, PAGE),
            Err(ScraperError::MissingOfferId { .. })
        ));
    }
}
