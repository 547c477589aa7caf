//! Orgtree maps government open-data portals into an agency subordination
//! tree and renders it as an interactive chart.
//!
//! The pipeline runs strictly forward: fetch a portal's landing page, follow
//! the subordinate-organization listing link, download the CSV it points to,
//! extract the organization column, then flatten the assembled hierarchy
//! into an indexed graph, lay it out, and draw it.

pub mod acquisition;
pub mod cli;
pub mod config;
pub mod error;
pub mod harvest;
pub mod render;
pub mod tree;
