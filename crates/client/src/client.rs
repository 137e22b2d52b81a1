//! Artworks HTTP client.
//!
//! Blocking reqwest client (no Tokio runtime required). One request per
//! page; the caller decides which thread it runs on.

use std::time::Duration;

use artview_core::{FetchError, Page, PageLoader};

use crate::artwork::{ApiResponse, Artwork};

pub const DEFAULT_API_BASE: &str = "https://api.artic.edu";

/// Only the columns the table shows.
pub const DEFAULT_FIELDS: &str =
    "id,title,place_of_origin,artist_display,inscriptions,date_start,date_end";

#[derive(Debug, Clone)]
pub struct ClientOptions {
    pub api_base: String,
    /// Comma-separated `fields=` filter. `None` asks for full records.
    pub fields: Option<String>,
    pub timeout: Duration,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            fields: Some(DEFAULT_FIELDS.to_string()),
            timeout: Duration::from_secs(30),
        }
    }
}

/// Artworks API client (blocking).
#[derive(Clone)]
pub struct ArtworkClient {
    http: reqwest::blocking::Client,
    api_base: String,
    fields: Option<String>,
}

impl ArtworkClient {
    pub fn new(opts: ClientOptions) -> Result<Self, FetchError> {
        let http = reqwest::blocking::Client::builder()
            .user_agent(format!("artview/{}", env!("CARGO_PKG_VERSION")))
            .timeout(opts.timeout)
            .build()
            .map_err(|e| FetchError::Network(format!("failed to create HTTP client: {}", e)))?;

        Ok(Self {
            http,
            api_base: opts.api_base.trim_end_matches('/').to_string(),
            fields: opts.fields.filter(|f| !f.trim().is_empty()),
        })
    }

    pub fn api_base(&self) -> &str {
        &self.api_base
    }

    /// Fetch one page of artworks. `page` is 1-based.
    pub fn artworks(&self, page: usize, limit: usize) -> Result<ApiResponse, FetchError> {
        let url = format!("{}/api/v1/artworks", self.api_base);
        let mut query = vec![("page", page.to_string()), ("limit", limit.to_string())];
        if let Some(ref fields) = self.fields {
            query.push(("fields", fields.clone()));
        }

        log::debug!("GET {} page={} limit={}", url, page, limit);
        let response = self.http.get(&url)
            .query(&query)
            .send()
            .map_err(|e| FetchError::Network(e.to_string()))?;

        let status = response.status().as_u16();
        if !response.status().is_success() {
            let body = response.text().unwrap_or_default();
            return Err(FetchError::Http { status, body });
        }

        // Read the body first so transport failures and bad JSON stay distinct.
        let bytes = response.bytes().map_err(|e| FetchError::Network(e.to_string()))?;
        serde_json::from_slice(&bytes).map_err(|e| FetchError::Parse(e.to_string()))
    }
}

impl PageLoader<Artwork> for ArtworkClient {
    fn fetch_page(&self, page: usize, page_size: usize) -> Result<Page<Artwork>, FetchError> {
        let body = self.artworks(page, page_size)?;
        Ok(Page {
            records: body.data.unwrap_or_default(),
            total_count: body.pagination.total,
        })
    }
}
