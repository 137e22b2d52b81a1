use artview_core::{Record, RecordId};
use serde::{Deserialize, Serialize};

/// One artwork row. Everything but `id` may come back `null`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Artwork {
    pub id: u64,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub place_of_origin: Option<String>,
    #[serde(default)]
    pub artist_display: Option<String>,
    #[serde(default)]
    pub inscriptions: Option<String>,
    #[serde(default)]
    pub date_start: Option<i64>,
    #[serde(default)]
    pub date_end: Option<i64>,
}

impl Artwork {
    /// Inscriptions column text; blank or missing renders as "N/A".
    pub fn inscriptions_display(&self) -> &str {
        match self.inscriptions.as_deref() {
            Some(s) if !s.trim().is_empty() => s,
            _ => "N/A",
        }
    }

    /// Display cells in column order: title, origin, artist, inscriptions,
    /// start date, end date.
    pub fn cells(&self) -> [String; 6] {
        fn text(v: &Option<String>) -> String {
            v.clone().unwrap_or_default()
        }
        fn year(v: Option<i64>) -> String {
            v.map(|y| y.to_string()).unwrap_or_default()
        }
        [
            text(&self.title),
            text(&self.place_of_origin),
            text(&self.artist_display),
            self.inscriptions_display().to_string(),
            year(self.date_start),
            year(self.date_end),
        ]
    }

    pub const COLUMNS: [&'static str; 6] =
        ["Title", "Origin", "Artist", "Inscriptions", "Start Date", "End Date"];
}

impl Record for Artwork {
    fn id(&self) -> RecordId {
        RecordId(self.id)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Pagination {
    pub total: u64,
    #[serde(default)]
    pub limit: Option<u64>,
    #[serde(default)]
    pub offset: Option<u64>,
    #[serde(default)]
    pub total_pages: Option<u64>,
    #[serde(default)]
    pub current_page: Option<u64>,
}

/// Body of `GET /api/v1/artworks`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiResponse {
    /// Absent `data` is an empty page.
    #[serde(default)]
    pub data: Option<Vec<Artwork>>,
    pub pagination: Pagination,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nulls_and_missing_fields_decode() {
        let json = r#"{"id": 27992, "title": "A Sunday on La Grande Jatte", "inscriptions": null}"#;
        let art: Artwork = serde_json::from_str(json).unwrap();
        assert_eq!(art.id, 27992);
        assert_eq!(art.place_of_origin, None);
        assert_eq!(art.inscriptions_display(), "N/A");
        assert_eq!(art.cells()[4], "");
    }

    #[test]
    fn blank_inscriptions_render_na() {
        let art = Artwork {
            id: 1,
            title: None,
            place_of_origin: None,
            artist_display: None,
            inscriptions: Some("  ".into()),
            date_start: Some(1884),
            date_end: Some(1886),
        };
        assert_eq!(art.inscriptions_display(), "N/A");
        assert_eq!(art.cells()[4], "1884");
        assert_eq!(art.id(), RecordId(1));
    }

    #[test]
    fn missing_data_array() {
        let body: ApiResponse = serde_json::from_str(r#"{"pagination": {"total": 0}}"#).unwrap();
        assert!(body.data.is_none());
        assert_eq!(body.pagination.total, 0);
    }
}
