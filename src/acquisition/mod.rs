//! Acquisition layer: HTTP fetches, link discovery on scraped pages, and
//! CSV column extraction.

pub mod http_client;
pub mod link_discovery;
pub mod tabular;
