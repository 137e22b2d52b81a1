//! Where pages come from: the artworks API, or a built-in demo set.

use std::sync::Arc;
use std::time::Duration;

use artview_client::{Artwork, ArtworkClient, ClientOptions};
use artview_config::Settings;
use artview_core::{PageLoader, VecLoader};
use clap::Args;

use crate::CliError;

/// Size of the `--offline` demo collection.
pub(crate) const DEMO_RECORDS: u64 = 250;

#[derive(Args, Debug, Clone)]
pub(crate) struct SourceArgs {
    /// API base URL (overrides settings.json)
    #[arg(long, env = "ARTVIEW_API_BASE", value_name = "URL")]
    pub api_base: Option<String>,

    /// Rows per page (overrides settings.json)
    #[arg(long, value_name = "N")]
    pub page_size: Option<usize>,

    /// Request timeout in seconds (overrides settings.json)
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Use a built-in demo collection instead of the network
    #[arg(long)]
    pub offline: bool,
}

pub(crate) struct Source {
    pub loader: Arc<dyn PageLoader<Artwork>>,
    pub page_size: usize,
    /// Shown in the title bar.
    pub label: String,
}

impl SourceArgs {
    /// Merge flags over settings and build the loader.
    pub fn resolve(&self) -> Result<Source, CliError> {
        let settings = Settings::load_or_default();

        let page_size = self.page_size.unwrap_or(settings.page_size);
        if page_size == 0 {
            return Err(CliError::args("--page-size must be at least 1"));
        }

        if self.offline {
            return Ok(Source {
                loader: Arc::new(VecLoader::new(demo_artworks())),
                page_size,
                label: "demo collection".to_string(),
            });
        }

        let api_base = self.api_base.clone().unwrap_or(settings.api_base.clone());
        let timeout = self
            .timeout
            .map(Duration::from_secs)
            .unwrap_or_else(|| settings.timeout());
        let client = ArtworkClient::new(ClientOptions {
            api_base,
            fields: settings.fields_filter().map(String::from),
            timeout,
        })
        .map_err(CliError::fetch)?;

        Ok(Source {
            label: client.api_base().to_string(),
            loader: Arc::new(client),
            page_size,
        })
    }
}

/// Deterministic stand-in records. The record at rank `r` has id `100_000 + r`.
pub(crate) fn demo_artworks() -> Vec<Artwork> {
    const ORIGINS: [&str; 5] = ["France", "Japan", "United States", "Netherlands", "Italy"];
    (1..=DEMO_RECORDS)
        .map(|rank| {
            let start = 1500 + ((rank * 37) % 480) as i64;
            Artwork {
                id: 100_000 + rank,
                title: Some(format!("Study No. {}", rank)),
                place_of_origin: Some(ORIGINS[(rank % 5) as usize].to_string()),
                artist_display: Some(format!("Workshop {}\nActive {}", (rank % 17) + 1, start)),
                inscriptions: (rank % 4 == 0).then(|| format!("Signed l.r.: {}", rank)),
                date_start: Some(start),
                date_end: Some(start + (rank % 6) as i64),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn demo_ids_follow_rank() {
        let all = demo_artworks();
        assert_eq!(all.len() as u64, DEMO_RECORDS);
        assert_eq!(all[0].id, 100_001);
        assert_eq!(all[12].id, 100_013);
    }
}
