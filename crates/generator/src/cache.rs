use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, Instant};
use tokio::sync::RwLock;

/// A rendered page and when it was produced
#[derive(Debug, Clone)]
pub struct CachedPage {
    pub html: String,
    pub rendered_at: Instant,
}

impl CachedPage {
    pub fn is_stale(&self, max_age: Duration) -> bool {
        self.rendered_at.elapsed() >= max_age
    }
}

/// Rendered pages keyed by request path.
///
/// Also tracks which paths have a regeneration in flight so that at most
/// one runs per path at a time.
#[derive(Debug, Default)]
pub struct PageCache {
    entries: RwLock<HashMap<String, CachedPage>>,
    regenerating: Mutex<HashSet<String>>,
}

impl PageCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn get(&self, path: &str) -> Option<CachedPage> {
        self.entries.read().await.get(path).cloned()
    }

    pub async fn insert(&self, path: &str, html: String) {
        let page = CachedPage {
            html,
            rendered_at: Instant::now(),
        };
        self.entries.write().await.insert(path.to_string(), page);
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }

    /// Claim the regeneration slot for `path`.
    ///
    /// Returns `None` if another regeneration for the same path holds it.
    /// The slot is released when the returned guard is dropped, including
    /// when the task holding it panics.
    pub fn try_begin_regeneration(self: &Arc<Self>, path: &str) -> Option<RegenerationSlot> {
        let claimed = self
            .regenerating
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(path.to_string());
        claimed.then(|| RegenerationSlot {
            cache: Arc::clone(self),
            path: path.to_string(),
        })
    }

    fn finish_regeneration(&self, path: &str) {
        self.regenerating
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(path);
    }
}

/// Exclusive right to regenerate one path; released on drop
#[derive(Debug)]
pub struct RegenerationSlot {
    cache: Arc<PageCache>,
    path: String,
}

impl RegenerationSlot {
    pub fn path(&self) -> &str {
        &self.path
    }
}

impl Drop for RegenerationSlot {
    fn drop(&mut self) {
        self.cache.finish_regeneration(&self.path);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_insert_and_get() {
        let cache = PageCache::new();
        assert!(cache.get("/").await.is_none());
        assert!(cache.is_empty().await);

        cache.insert("/", "<p>home</p>".to_string()).await;
        let page = cache.get("/").await.unwrap();
        assert_eq!(page.html, "<p>home</p>");
        assert_eq!(cache.len().await, 1);
    }

    #[tokio::test]
    async fn test_insert_replaces_and_refreshes() {
        let cache = PageCache::new();
        cache.insert("/blog", "old".to_string()).await;
        let first = cache.get("/blog").await.unwrap();
        cache.insert("/blog", "new".to_string()).await;
        let second = cache.get("/blog").await.unwrap();
        assert_eq!(second.html, "new");
        assert!(second.rendered_at >= first.rendered_at);
        assert_eq!(cache.len().await, 1);
    }

    #[test]
    fn test_staleness() {
        let page = CachedPage {
            html: String::new(),
            rendered_at: Instant::now(),
        };
        assert!(page.is_stale(Duration::ZERO));
        assert!(!page.is_stale(Duration::from_secs(3600)));
    }

    #[test]
    fn test_single_regeneration_per_path() {
        let cache = Arc::new(PageCache::new());
        let slot = cache.try_begin_regeneration("/blog").unwrap();
        assert_eq!(slot.path(), "/blog");
        assert!(cache.try_begin_regeneration("/blog").is_none());
        // Other paths are independent
        let _about = cache.try_begin_regeneration("/about").unwrap();

        drop(slot);
        assert!(cache.try_begin_regeneration("/blog").is_some());
    }

    #[tokio::test]
    async fn test_slot_released_when_task_panics() {
        let cache = Arc::new(PageCache::new());
        let slot = cache.try_begin_regeneration("/blog/1").unwrap();

        let task = tokio::spawn(async move {
            let _slot = slot;
            panic!("render blew up");
        });

        assert!(task.await.unwrap_err().is_panic());
        assert!(cache.try_begin_regeneration("/blog/1").is_some());
    }
}
