use serde::{Deserialize, Serialize};

const IMAGE_BASE: &str = "https://image.tmdb.org/t/p";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PosterSize {
    W185,
    W342,
    W500,
    Original,
}

impl PosterSize {
    pub fn as_str(self) -> &'static str {
        match self {
            PosterSize::W185 => "w185",
            PosterSize::W342 => "w342",
            PosterSize::W500 => "w500",
            PosterSize::Original => "original",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CatalogItem {
    #[serde(default)]
    pub adult: Option<bool>,
    pub id: i32,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub vote_average: f64,
}

impl CatalogItem {
    pub fn display_title(&self) -> &str {
        self.title.as_deref().unwrap_or("Untitled")
    }

    pub fn poster_url(&self, size: PosterSize) -> Option<String> {
        self.poster_path
            .as_deref()
            .map(|path| poster_url(path, size))
    }

    // The copy stored in favorites: poster path without a leading separator.
    pub fn cleaned(&self) -> Self {
        let mut item = self.clone();
        if let Some(stripped) = self
            .poster_path
            .as_deref()
            .and_then(|path| path.strip_prefix('/'))
        {
            item.poster_path = Some(stripped.to_string());
        }
        item
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Genre {
    pub id: i32,
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CatalogItemDetail {
    pub id: i32,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub overview: Option<String>,
    #[serde(default)]
    pub genres: Vec<Genre>,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub vote_average: Option<f64>,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub runtime: Option<i32>,
    #[serde(default)]
    pub vote_count: Option<i64>,
}

impl CatalogItemDetail {
    pub fn display_title(&self) -> &str {
        self.title.as_deref().unwrap_or("Untitled")
    }

    pub fn poster_url(&self, size: PosterSize) -> Option<String> {
        self.poster_path
            .as_deref()
            .map(|path| poster_url(path, size))
    }

    pub fn release_year(&self) -> Option<&str> {
        self.release_date
            .as_deref()
            .and_then(|date| date.split('-').next())
            .filter(|year| !year.is_empty())
    }

    // Summary record for favoriting from the detail screen.
    pub fn to_item(&self) -> CatalogItem {
        CatalogItem {
            adult: Some(false),
            id: self.id,
            poster_path: self.poster_path.clone(),
            title: self.title.clone(),
            vote_average: self.vote_average.unwrap_or(0.0),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ListResponse {
    pub page: Option<i32>,
    #[serde(default)]
    pub results: Vec<CatalogItem>,
    pub total_pages: Option<i32>,
    pub total_results: Option<i32>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FilterSpec {
    pub genre_id: i32,
    pub min_year: i32,
    pub max_year: i32,
    pub min_score: f64,
    pub max_score: f64,
}

// Exactly one separator at the join, whatever the stored path carries.
pub fn poster_url(path: &str, size: PosterSize) -> String {
    format!(
        "{IMAGE_BASE}/{}/{}",
        size.as_str(),
        path.trim_start_matches('/')
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn item(poster_path: Option<&str>) -> CatalogItem {
        CatalogItem {
            adult: Some(false),
            id: 550,
            poster_path: poster_path.map(str::to_string),
            title: Some("Fight Club".to_string()),
            vote_average: 8.4,
        }
    }

    #[test]
    fn poster_url_joins_with_single_separator() {
        assert_eq!(
            poster_url("/abc.jpg", PosterSize::W342),
            "https://image.tmdb.org/t/p/w342/abc.jpg"
        );
        assert_eq!(
            poster_url("abc.jpg", PosterSize::W342),
            "https://image.tmdb.org/t/p/w342/abc.jpg"
        );
        assert_eq!(
            item(Some("/abc.jpg")).poster_url(PosterSize::W500).as_deref(),
            Some("https://image.tmdb.org/t/p/w500/abc.jpg")
        );
        assert_eq!(item(None).poster_url(PosterSize::Original), None);
    }

    #[test]
    fn cleaned_strips_leading_separator_only() {
        assert_eq!(
            item(Some("/abc.jpg")).cleaned().poster_path.as_deref(),
            Some("abc.jpg")
        );
        assert_eq!(
            item(Some("abc.jpg")).cleaned().poster_path.as_deref(),
            Some("abc.jpg")
        );
        assert_eq!(item(None).cleaned().poster_path, None);
    }

    #[test]
    fn display_title_falls_back_for_untitled_items() {
        let mut untitled = item(None);
        untitled.title = None;
        assert_eq!(untitled.display_title(), "Untitled");
    }

    #[test]
    fn list_envelope_tolerates_missing_counters() {
        let body = json!({
            "results": [{ "id": 1, "title": "A", "vote_average": 7.5 }]
        });
        let decoded: ListResponse = serde_json::from_value(body).unwrap();
        assert_eq!(decoded.page, None);
        assert_eq!(decoded.results.len(), 1);
        assert_eq!(decoded.results[0].display_title(), "A");
        assert_eq!(decoded.results[0].vote_average, 7.5);
    }

    #[test]
    fn detail_tolerates_absent_fields_and_extracts_year() {
        let body = json!({
            "id": 603,
            "title": "The Matrix",
            "release_date": "1999-03-30",
            "unknown_field": true
        });
        let detail: CatalogItemDetail = serde_json::from_value(body).unwrap();
        assert!(detail.genres.is_empty());
        assert_eq!(detail.runtime, None);
        assert_eq!(detail.release_year(), Some("1999"));

        let favorited = detail.to_item();
        assert_eq!(favorited.id, 603);
        assert_eq!(favorited.adult, Some(false));
        assert_eq!(favorited.vote_average, 0.0);
    }
}
