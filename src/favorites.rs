use std::path::PathBuf;
use std::sync::{Mutex, MutexGuard};
use tracing::{debug, warn};

use crate::models::CatalogItem;

pub const DEFAULT_FILE: &str = "favorites.json";

pub struct FavoritesStore {
    file_path: PathBuf,
    items: Mutex<Vec<CatalogItem>>,
}

impl FavoritesStore {
    // Missing or corrupt data starts the store empty; startup never fails.
    pub fn load(file_path: impl Into<PathBuf>) -> Self {
        let file_path = file_path.into();
        let items = match std::fs::read_to_string(&file_path) {
            Ok(contents) => match serde_json::from_str(&contents) {
                Ok(items) => items,
                Err(err) => {
                    warn!(
                        "ignoring corrupt favorites file {:?}: {}",
                        file_path, err
                    );
                    Vec::new()
                }
            },
            Err(_) => Vec::new(),
        };
        debug!("loaded {} favorites from {:?}", items.len(), file_path);
        Self {
            file_path,
            items: Mutex::new(items),
        }
    }

    pub fn contains(&self, id: i32) -> bool {
        self.lock().iter().any(|movie| movie.id == id)
    }

    pub fn add(&self, item: &CatalogItem) {
        let mut items = self.lock();
        if items.iter().any(|movie| movie.id == item.id) {
            return;
        }
        items.push(item.cleaned());
        self.persist(&items);
    }

    pub fn remove(&self, id: i32) {
        let mut items = self.lock();
        items.retain(|movie| movie.id != id);
        self.persist(&items);
    }

    // Held under one lock so concurrent toggles of the same id linearize.
    pub fn toggle(&self, item: &CatalogItem) {
        let mut items = self.lock();
        if items.iter().any(|movie| movie.id == item.id) {
            items.retain(|movie| movie.id != item.id);
        } else {
            items.push(item.cleaned());
        }
        self.persist(&items);
    }

    pub fn items(&self) -> Vec<CatalogItem> {
        self.lock().clone()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<CatalogItem>> {
        match self.items.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    // Write-to-temp then rename, so a crash never leaves a corrupt file.
    fn persist(&self, items: &[CatalogItem]) {
        let json = match serde_json::to_string_pretty(items) {
            Ok(json) => json,
            Err(err) => {
                warn!("failed to serialize favorites: {}", err);
                return;
            }
        };
        let tmp_path = self.file_path.with_extension("tmp");
        let written = std::fs::write(&tmp_path, json)
            .and_then(|()| std::fs::rename(&tmp_path, &self.file_path));
        if let Err(err) = written {
            warn!(
                "failed to persist favorites to {:?}: {}",
                self.file_path, err
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn movie(id: i32, poster_path: Option<&str>) -> CatalogItem {
        CatalogItem {
            adult: Some(false),
            id,
            poster_path: poster_path.map(str::to_string),
            title: Some(format!("Movie {id}")),
            vote_average: 7.0,
        }
    }

    fn store_in(dir: &tempfile::TempDir) -> FavoritesStore {
        FavoritesStore::load(dir.path().join(DEFAULT_FILE))
    }

    #[test]
    fn add_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);

        store.add(&movie(1, None));
        store.add(&movie(1, None));
        assert_eq!(store.items().len(), 1);

        // The persisted sequence holds a single record too.
        let reloaded = store_in(&dir);
        assert_eq!(reloaded.items().len(), 1);
    }

    #[test]
    fn toggle_twice_is_identity_for_membership() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);

        store.toggle(&movie(7, None));
        assert!(store.contains(7));
        store.toggle(&movie(7, None));
        assert!(!store.contains(7));
        assert!(store.is_empty());
    }

    #[test]
    fn remove_of_absent_id_is_a_silent_noop() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);

        store.remove(42);
        assert!(store.is_empty());
    }

    #[test]
    fn stored_poster_path_loses_its_leading_separator() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);

        store.add(&movie(1, Some("/abc.jpg")));
        store.add(&movie(2, Some("def.jpg")));

        let items = store.items();
        assert_eq!(items[0].poster_path.as_deref(), Some("abc.jpg"));
        assert_eq!(items[1].poster_path.as_deref(), Some("def.jpg"));

        let reloaded = store_in(&dir);
        assert_eq!(reloaded.items()[0].poster_path.as_deref(), Some("abc.jpg"));
    }

    #[test]
    fn mutations_keep_insertion_order_across_reloads() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);

        store.add(&movie(3, None));
        store.add(&movie(1, None));
        store.add(&movie(2, None));
        store.remove(1);

        let reloaded = store_in(&dir);
        let ids: Vec<i32> = reloaded.items().iter().map(|m| m.id).collect();
        assert_eq!(ids, vec![3, 2]);
    }

    #[test]
    fn corrupt_file_starts_empty_instead_of_failing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(DEFAULT_FILE);
        std::fs::write(&path, "{ not json").unwrap();

        let store = FavoritesStore::load(path.clone());
        assert!(store.is_empty());

        // The store still works and persists after the bad load.
        store.add(&movie(9, None));
        let reloaded = FavoritesStore::load(path);
        assert!(reloaded.contains(9));
    }
}
