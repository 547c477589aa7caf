//! Anchor discovery on scraped portal pages.
//!
//! Two-stage resolution: find the subordinate-organization listing link by
//! its visible text, then on the listing page find the `.csv` download link.
//! Relative hrefs are absolutized against the page's scheme+host prefix.

use crate::error::DiscoveryError;
use regex::Regex;
use scraper::{Html, Selector};
use std::sync::OnceLock;

/// Anchor-text phrases marking the listing-page link, in priority order.
/// The first phrase wins wherever both could match.
const LISTING_PHRASES: [&str; 2] = [
    "Перечень подведомственных",
    "Организации, находящиеся в ведении",
];

fn site_prefix_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^http(s)?://[a-z]+\.[a-z]+").expect("valid pattern"))
}

fn anchor_selector() -> &'static Selector {
    static SELECTOR: OnceLock<Selector> = OnceLock::new();
    SELECTOR.get_or_init(|| Selector::parse("a").expect("valid selector"))
}

/// Scheme+host prefix of a URL via the fixed anchored pattern.
///
/// Multi-label hosts truncate after the second label; callers that need the
/// real authority use `url::Url` instead.
pub fn site_prefix(url: &str) -> Result<String, DiscoveryError> {
    site_prefix_pattern()
        .find(url)
        .map(|m| m.as_str().to_string())
        .ok_or_else(|| DiscoveryError::MalformedUrl {
            url: url.to_string(),
        })
}

/// Absolutize an href against the page it was found on. The prefix is only
/// derived when the href is actually relative, so absolute hrefs resolve
/// even from pages whose URL defeats the prefix pattern.
fn absolutize(href: &str, page_url: &str) -> Result<String, DiscoveryError> {
    if href.starts_with("http") {
        Ok(href.to_string())
    } else {
        Ok(format!("{}{href}", site_prefix(page_url)?))
    }
}

/// Decode fetched markup: clean UTF-8 as-is, anything else as windows-1251
/// (the prevailing legacy encoding on these portals).
fn decode_markup(raw: &[u8]) -> String {
    let (text, _, had_errors) = encoding_rs::UTF_8.decode(raw);
    if !had_errors {
        return text.into_owned();
    }
    let (text, _, _) = encoding_rs::WINDOWS_1251.decode(raw);
    text.into_owned()
}

/// Find the listing-page link on a landing page by anchor text.
///
/// Scans all anchors for the first phrase before falling back to the
/// second. Fails when no anchor matches, which signals that the portal
/// changed its layout or wording.
pub fn find_listing_link(markup: &[u8], page_url: &str) -> Result<String, DiscoveryError> {
    let html = decode_markup(markup);
    let document = Html::parse_document(&html);

    for phrase in LISTING_PHRASES {
        for anchor in document.select(anchor_selector()) {
            let text: String = anchor.text().collect();
            if !text.contains(phrase) {
                continue;
            }
            if let Some(href) = anchor.value().attr("href") {
                return absolutize(href, page_url);
            }
        }
    }

    Err(DiscoveryError::ListingLinkNotFound {
        url: page_url.to_string(),
    })
}

/// Find the first `.csv` download link on a listing page.
pub fn find_csv_link(markup: &[u8], page_url: &str) -> Result<String, DiscoveryError> {
    let html = decode_markup(markup);
    let document = Html::parse_document(&html);

    for anchor in document.select(anchor_selector()) {
        if let Some(href) = anchor.value().attr("href") {
            if href.ends_with(".csv") {
                return absolutize(href, page_url);
            }
        }
    }

    Err(DiscoveryError::CsvLinkNotFound {
        url: page_url.to_string(),
    })
}
