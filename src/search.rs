use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::models::CatalogItem;
use crate::tmdb::CatalogApi;

pub const DEBOUNCE: Duration = Duration::from_millis(300);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchPhase {
    Idle,
    Debouncing,
    Loading,
    Settled,
}

#[derive(Debug, Clone)]
pub struct SearchSnapshot {
    pub query: String,
    pub phase: SearchPhase,
    pub results: Vec<CatalogItem>,
}

pub struct SearchCoordinator {
    catalog: Arc<dyn CatalogApi>,
    debounce: Duration,
    generation: Arc<AtomicU64>,
    state: watch::Sender<SearchSnapshot>,
    pending: Mutex<Option<JoinHandle<()>>>,
}

impl SearchCoordinator {
    pub fn new(catalog: Arc<dyn CatalogApi>) -> Self {
        Self::with_debounce(catalog, DEBOUNCE)
    }

    pub fn with_debounce(catalog: Arc<dyn CatalogApi>, debounce: Duration) -> Self {
        let (state, _) = watch::channel(SearchSnapshot {
            query: String::new(),
            phase: SearchPhase::Idle,
            results: Vec::new(),
        });
        Self {
            catalog,
            debounce,
            generation: Arc::new(AtomicU64::new(0)),
            state,
            pending: Mutex::new(None),
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<SearchSnapshot> {
        self.state.subscribe()
    }

    pub fn snapshot(&self) -> SearchSnapshot {
        self.state.borrow().clone()
    }

    pub fn is_loading(&self) -> bool {
        self.state.borrow().phase == SearchPhase::Loading
    }

    pub fn results(&self) -> Vec<CatalogItem> {
        self.state.borrow().results.clone()
    }

    // Every keystroke lands here. Supersedes whatever was pending: the old
    // timer/request task is aborted and its generation invalidated, so only
    // the newest query can ever commit results.
    pub fn set_query(&self, text: &str) {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        if let Some(task) = self.swap_pending(None) {
            task.abort();
        }

        let query = text.trim().to_string();
        if query.is_empty() {
            // Clearing the box empties results right away, no request issued.
            self.state.send_replace(SearchSnapshot {
                query,
                phase: SearchPhase::Idle,
                results: Vec::new(),
            });
            return;
        }

        let previous = self.state.borrow().results.clone();
        self.state.send_replace(SearchSnapshot {
            query: query.clone(),
            phase: SearchPhase::Debouncing,
            results: previous,
        });

        let catalog = Arc::clone(&self.catalog);
        let counter = Arc::clone(&self.generation);
        let state = self.state.clone();
        let debounce = self.debounce;
        let task = tokio::spawn(async move {
            tokio::time::sleep(debounce).await;

            let mut current = false;
            state.send_modify(|snapshot| {
                if counter.load(Ordering::SeqCst) == generation {
                    snapshot.phase = SearchPhase::Loading;
                    current = true;
                }
            });
            if !current {
                return;
            }

            debug!("searching for '{}'", query);
            let results = match catalog.search(&query).await {
                Ok(items) => items,
                Err(err) => {
                    warn!("search '{}' failed: {}", query, err);
                    Vec::new()
                }
            };

            // A response for a superseded query is discarded unconditionally.
            state.send_modify(|snapshot| {
                if counter.load(Ordering::SeqCst) == generation {
                    snapshot.phase = SearchPhase::Settled;
                    snapshot.results = results;
                }
            });
        });
        self.swap_pending(Some(task));
    }

    fn swap_pending(&self, task: Option<JoinHandle<()>>) -> Option<JoinHandle<()>> {
        let mut guard = match self.pending.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        std::mem::replace(&mut *guard, task)
    }
}

impl Drop for SearchCoordinator {
    fn drop(&mut self) {
        if let Some(task) = self.swap_pending(None) {
            task.abort();
        }
    }
}
