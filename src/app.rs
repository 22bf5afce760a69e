use anyhow::Result;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{info, warn};

use crate::favorites::{self, FavoritesStore};
use crate::models::CatalogItem;
use crate::picker::RandomPicker;
use crate::search::SearchCoordinator;
use crate::tmdb::{CatalogApi, TmdbClient};

// One owned instance of everything, threaded to UI surfaces by reference.
// All screens read favorited-ness and search/pick state through here.
#[derive(Clone)]
pub struct AppContext {
    pub catalog: Arc<dyn CatalogApi>,
    pub search: Arc<SearchCoordinator>,
    pub picker: Arc<RandomPicker>,
    pub favorites: Arc<FavoritesStore>,
    trending: watch::Sender<Vec<CatalogItem>>,
}

impl AppContext {
    pub fn from_env() -> Result<Self> {
        let catalog: Arc<dyn CatalogApi> = Arc::new(TmdbClient::from_env()?);
        Ok(Self::new(catalog, FavoritesStore::load(favorites::DEFAULT_FILE)))
    }

    pub fn new(catalog: Arc<dyn CatalogApi>, favorites: FavoritesStore) -> Self {
        let (trending, _) = watch::channel(Vec::new());
        Self {
            search: Arc::new(SearchCoordinator::new(Arc::clone(&catalog))),
            picker: Arc::new(RandomPicker::new(Arc::clone(&catalog))),
            favorites: Arc::new(favorites),
            catalog,
            trending,
        }
    }

    pub fn trending(&self) -> watch::Receiver<Vec<CatalogItem>> {
        self.trending.subscribe()
    }

    pub async fn load_trending(&self) {
        match self.catalog.fetch_trending().await {
            Ok(items) => {
                info!("loaded {} trending movies", items.len());
                self.trending.send_replace(items);
            }
            // The trending rail keeps whatever it showed before.
            Err(err) => warn!("trending fetch failed: {}", err),
        }
    }
}
