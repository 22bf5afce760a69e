use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, warn};

use crate::error::PickError;
use crate::models::{CatalogItem, FilterSpec};
use crate::tmdb::CatalogApi;

const MAX_DISCOVER_PAGE: u32 = 20;

// The genre tiles offered by the picker screen.
pub const GENRES: &[(i32, &str)] = &[
    (28, "Action"),
    (35, "Comedy"),
    (27, "Horror"),
    (878, "Sci-Fi"),
    (10749, "Romance"),
    (16, "Animation"),
    (53, "Thriller"),
    (18, "Drama"),
];

pub struct RandomPicker {
    catalog: Arc<dyn CatalogApi>,
    current: watch::Sender<Option<CatalogItem>>,
}

impl RandomPicker {
    pub fn new(catalog: Arc<dyn CatalogApi>) -> Self {
        let (current, _) = watch::channel(None);
        Self { catalog, current }
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<CatalogItem>> {
        self.current.subscribe()
    }

    pub fn current(&self) -> Option<CatalogItem> {
        self.current.borrow().clone()
    }

    pub async fn pick(&self, filter: &FilterSpec) -> Result<CatalogItem, PickError> {
        // Clear before the network call: a stale pick must never stay
        // visible while a new one is pending.
        self.current.send_replace(None);

        let page = 1 + rand::random::<u32>() % MAX_DISCOVER_PAGE;
        debug!("rolling discovery page {} for genre {}", page, filter.genre_id);
        let results = match self.catalog.discover(filter, page).await {
            Ok(items) => items,
            Err(err) => {
                warn!("discover failed: {}", err);
                return Err(PickError::NoResults);
            }
        };
        if results.is_empty() {
            return Err(PickError::NoResults);
        }

        let choice = results[rand::random::<usize>() % results.len()].clone();
        debug!(
            "picked '{}' from {} candidates",
            choice.display_title(),
            results.len()
        );
        self.current.send_replace(Some(choice.clone()));
        Ok(choice)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn genre_tiles_have_unique_ids() {
        let mut ids: Vec<i32> = GENRES.iter().map(|(id, _)| *id).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), GENRES.len());
    }
}

