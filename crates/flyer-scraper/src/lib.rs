pub mod browser;
pub mod client;
pub mod error;
pub mod listing;
pub mod offer_page;

pub use browser::{BrowserSettings, RegionLister};
pub use client::FlyerClient;
pub use error::ScraperError;
pub use listing::{listing_url, parse_listing};
pub use offer_page::extract_image_urls;
