use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{header, Client};
use serde::de::DeserializeOwned;
use std::env;
use std::time::Duration;
use tracing::debug;

use crate::error::FetchError;
use crate::models::{CatalogItem, CatalogItemDetail, FilterSpec, ListResponse};

const TMDB_BASE: &str = "https://api.themoviedb.org/3";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(12);
const MIN_VOTE_COUNT: u32 = 100;

#[async_trait]
pub trait CatalogApi: Send + Sync {
    async fn fetch_trending(&self) -> Result<Vec<CatalogItem>, FetchError>;
    async fn search(&self, query: &str) -> Result<Vec<CatalogItem>, FetchError>;
    async fn fetch_detail(&self, id: i32) -> Result<CatalogItemDetail, FetchError>;
    async fn discover(&self, filter: &FilterSpec, page: u32)
        -> Result<Vec<CatalogItem>, FetchError>;
}

#[derive(Debug, Clone)]
pub struct TmdbClient {
    client: Client,
    bearer_token: String,
}

impl TmdbClient {
    pub fn new(bearer_token: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .context("building HTTP client failed")?;
        Ok(Self {
            client,
            bearer_token: bearer_token.into(),
        })
    }

    pub fn from_env() -> Result<Self> {
        let bearer_token =
            env::var("TMDB_BEARER_TOKEN").context("TMDB_BEARER_TOKEN not set")?;
        Self::new(bearer_token)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        bypass_cache: bool,
    ) -> Result<T, FetchError> {
        let mut request = self
            .client
            .get(url)
            .header(header::ACCEPT, "application/json")
            .bearer_auth(&self.bearer_token);
        if bypass_cache {
            request = request.header(header::CACHE_CONTROL, "no-cache");
        }
        let res = request.send().await?;
        let status = res.status();
        let text = res.text().await?;
        if !status.is_success() {
            return Err(FetchError::status(status, &text));
        }
        serde_json::from_str(&text).map_err(|err| FetchError::decode(err, &text))
    }
}

#[async_trait]
impl CatalogApi for TmdbClient {
    async fn fetch_trending(&self) -> Result<Vec<CatalogItem>, FetchError> {
        let url = format!("{TMDB_BASE}/trending/movie/day");
        let data: ListResponse = self.get_json(&url, false).await?;
        debug!("trending returned {} movies", data.results.len());
        Ok(data.results)
    }

    async fn search(&self, query: &str) -> Result<Vec<CatalogItem>, FetchError> {
        let trimmed = query.trim();
        if trimmed.is_empty() {
            return Ok(Vec::new());
        }
        let url = format!(
            "{TMDB_BASE}/search/movie?query={}&include_adult=false&language=en-US&page=1",
            urlencoding::encode(trimmed)
        );
        let data: ListResponse = self.get_json(&url, false).await?;
        debug!("search '{}' returned {} movies", trimmed, data.results.len());
        Ok(data.results)
    }

    async fn fetch_detail(&self, id: i32) -> Result<CatalogItemDetail, FetchError> {
        let url = format!("{TMDB_BASE}/movie/{id}");
        self.get_json(&url, false).await
    }

    async fn discover(
        &self,
        filter: &FilterSpec,
        page: u32,
    ) -> Result<Vec<CatalogItem>, FetchError> {
        let url = format!(
            "{TMDB_BASE}/discover/movie?with_genres={}\
             &primary_release_date.gte={}-01-01&primary_release_date.lte={}-12-31\
             &vote_average.gte={}&vote_average.lte={}\
             &vote_count.gte={MIN_VOTE_COUNT}&include_adult=false\
             &sort_by=popularity.desc&page={page}",
            filter.genre_id, filter.min_year, filter.max_year, filter.min_score, filter.max_score
        );
        // Discovery must always hit the network, never a stale cached body.
        let data: ListResponse = self.get_json(&url, true).await?;
        debug!(
            "discover genre {} page {} returned {} movies",
            filter.genre_id,
            page,
            data.results.len()
        );
        Ok(data.results)
    }
}
