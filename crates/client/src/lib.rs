//! Artworks API client: the paged data source behind `artview`.
//!
//! Implements [`artview_core::PageLoader`] over
//! `GET /api/v1/artworks?page=&limit=`. No retries, no caching.

mod artwork;
mod client;

pub use artwork::{ApiResponse, Artwork, Pagination};
pub use client::{ArtworkClient, ClientOptions, DEFAULT_API_BASE, DEFAULT_FIELDS};
