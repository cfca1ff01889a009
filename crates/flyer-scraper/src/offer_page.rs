//! Image extraction from an offer's detail page.

use std::sync::LazyLock;

use flyer_core::dedupe_preserving_order;
use scraper::{Html, Selector};

static PICTURE_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("picture.offer-page").expect("valid picture selector"));
static IMG_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("img").expect("valid img selector"));

/// Attribute read first for each page image.
const PRIMARY_SRC_ATTR: &str = "src";
/// Lazy-loaded pages keep the real URL here until scrolled into view.
const FALLBACK_SRC_ATTR: &str = "data-page-src";

/// Returns the flyer page image URLs from a detail page, deduplicated in
/// first-seen order.
///
/// For each `<picture class="offer-page">` the first nested `<img>` is used.
/// Its `src` is preferred, falling back to `data-page-src`. Pictures without
/// an `<img>`, or images with neither attribute, are skipped.
#[must_use]
pub fn extract_image_urls(html: &str) -> Vec<String> {
    let document = Html::parse_document(html);

    let urls = document
        .select(&PICTURE_SELECTOR)
        .enumerate()
        .filter_map(|(index, picture)| {
            let Some(img) = picture.select(&IMG_SELECTOR).next() else {
                tracing::debug!(index, "offer-page picture has no img; skipping");
                return None;
            };
            let src = img
                .value()
                .attr(PRIMARY_SRC_ATTR)
                .or_else(|| img.value().attr(FALLBACK_SRC_ATTR));
            if src.is_none() {
                tracing::debug!(index, "offer-page img has no image source; skipping");
            }
            src.map(str::to_owned)
        })
        .collect();

    dedupe_preserving_order(urls)
}
