use std::collections::HashMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Drops whatever is cached for a canonical page path.
pub trait Revalidator {
    fn revalidate(&self, path: &str);

    /// Drops every cached page, for changes that show up on all of them.
    fn revalidate_all(&self);
}

/// Cache state observed before page data is loaded. An insert carrying a stamp taken before a
/// revalidation of the same path (or of everything) is refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Stamp {
    epoch: u64,
    generation: u64,
}

struct Pages<V> {
    entries: HashMap<String, Arc<V>>,
    generations: HashMap<String, u64>,
    epoch: u64,
}

/// Assembled page data keyed by canonical path.
pub struct PageCache<V> {
    pages: RwLock<Pages<V>>,
}

impl<V> Default for PageCache<V> {
    fn default() -> Self {
        Self {
            pages: RwLock::new(Pages {
                entries: HashMap::new(),
                generations: HashMap::new(),
                epoch: 0,
            }),
        }
    }
}

impl<V> PageCache<V> {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> RwLockReadGuard<'_, Pages<V>> {
        self.pages.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, Pages<V>> {
        self.pages.write().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn get(&self, path: &str) -> Option<Arc<V>> {
        self.read().entries.get(path).cloned()
    }

    pub fn stamp(&self, path: &str) -> Stamp {
        let pages = self.read();
        Stamp {
            epoch: pages.epoch,
            generation: pages.generations.get(path).copied().unwrap_or_default(),
        }
    }

    /// Stores `page` unless `path` was revalidated since `stamp` was taken. Returns whether it was stored.
    pub fn insert(&self, path: String, stamp: Stamp, page: Arc<V>) -> bool {
        let mut pages = self.write();
        let current = Stamp {
            epoch: pages.epoch,
            generation: pages.generations.get(&path).copied().unwrap_or_default(),
        };
        if current != stamp {
            log::debug!("discarding stale page data for {}", path);
            return false;
        }
        pages.entries.insert(path, page);
        true
    }

    pub fn len(&self) -> usize {
        self.read().entries.len()
    }
}

impl<V> Revalidator for PageCache<V> {
    fn revalidate(&self, path: &str) {
        let mut pages = self.write();
        *pages.generations.entry(path.to_owned()).or_default() += 1;
        if pages.entries.remove(path).is_some() {
            log::debug!("revalidated {}", path);
        }
    }

    fn revalidate_all(&self) {
        let mut pages = self.write();
        pages.epoch += 1;
        pages.entries.clear();
        log::debug!("revalidated all pages");
    }
}
