//! Core trait abstractions for the recipe scraper.
//!
//! These traits define the seams between the extraction engine and its
//! collaborators: per-site strategies, the browser automation backend, the
//! recipe store, and the optional proxy source.

pub mod browser;
pub mod proxy;
pub mod store;
pub mod strategy;
