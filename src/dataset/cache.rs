use super::source::DatasetSource;
use super::Dataset;
use crate::error::LoadError;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{info, warn};

/// Default time-to-live for a successful load (30 minutes)
pub const DEFAULT_TTL: Duration = Duration::from_secs(1800);

enum Entry {
    Ready { dataset: Arc<Dataset>, loaded: Instant },
    /// Sticky until `invalidate`; failures are never retried on their own
    Failed(LoadError),
}

impl Entry {
    fn is_stale(&self, now: Instant, ttl: Duration) -> bool {
        match self {
            Entry::Ready { loaded, .. } => now.saturating_duration_since(*loaded) >= ttl,
            Entry::Failed(_) => false,
        }
    }
}

/// Time-bounded cache in front of a [`DatasetSource`]
pub struct DatasetCache {
    source: Box<dyn DatasetSource>,
    ttl: Duration,
    entry: Option<Entry>,
}

impl DatasetCache {
    pub fn new(source: Box<dyn DatasetSource>, ttl: Duration) -> Self {
        Self {
            source,
            ttl,
            entry: None,
        }
    }

    /// Current table, reloading when absent or older than the TTL
    pub fn get(&mut self, now: Instant) -> Result<Arc<Dataset>, &LoadError> {
        let entry = match self.entry.take() {
            Some(entry) if !entry.is_stale(now, self.ttl) => entry,
            _ => self.load(now),
        };

        match self.entry.insert(entry) {
            Entry::Ready { dataset, .. } => Ok(Arc::clone(dataset)),
            Entry::Failed(err) => Err(&*err),
        }
    }

    /// Drop whatever is cached so the next `get` reloads
    pub fn invalidate(&mut self) {
        self.entry = None;
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn describe(&self) -> String {
        self.source.describe()
    }

    fn load(&self, now: Instant) -> Entry {
        let started = Instant::now();
        match self.source.load() {
            Ok(dataset) => {
                info!(
                    source = %dataset.source,
                    rows = dataset.len(),
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "dataset loaded"
                );
                Entry::Ready {
                    dataset: Arc::new(dataset),
                    loaded: now,
                }
            }
            Err(err) => {
                warn!(source = %self.source.describe(), error = %err, "dataset load failed");
                Entry::Failed(err)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Counts loads; fails while `fail` is set
    struct Counting {
        loads: Arc<AtomicUsize>,
        fail: bool,
    }

    impl DatasetSource for Counting {
        fn load(&self) -> Result<Dataset, LoadError> {
            self.loads.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                Err(LoadError::Malformed("boom".into()))
            } else {
                Ok(Dataset::empty("counting"))
            }
        }

        fn describe(&self) -> String {
            "counting".into()
        }
    }

    fn cache(fail: bool) -> (DatasetCache, Arc<AtomicUsize>) {
        let loads = Arc::new(AtomicUsize::new(0));
        let source = Counting {
            loads: Arc::clone(&loads),
            fail,
        };
        (DatasetCache::new(Box::new(source), Duration::from_secs(60)), loads)
    }

    #[test]
    fn test_reuses_within_ttl() {
        let (mut cache, loads) = cache(false);
        let t0 = Instant::now();
        let a = cache.get(t0).unwrap();
        let b = cache.get(t0 + Duration::from_secs(59)).unwrap();
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(loads.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_reloads_after_ttl() {
        let (mut cache, loads) = cache(false);
        let t0 = Instant::now();
        let a = cache.get(t0).unwrap();
        let b = cache.get(t0 + Duration::from_secs(60)).unwrap();
        assert!(!Arc::ptr_eq(&a, &b));
        assert_eq!(loads.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_failure_is_sticky_until_invalidated() {
        let (mut cache, loads) = cache(true);
        let t0 = Instant::now();
        assert!(cache.get(t0).is_err());
        assert!(cache.get(t0 + Duration::from_secs(3600)).is_err());
        assert_eq!(loads.load(Ordering::SeqCst), 1);

        cache.invalidate();
        assert!(cache.get(t0).is_err());
        assert_eq!(loads.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_invalidate_forces_reload() {
        let (mut cache, loads) = cache(false);
        let t0 = Instant::now();
        cache.get(t0).unwrap();
        cache.invalidate();
        cache.get(t0).unwrap();
        assert_eq!(loads.load(Ordering::SeqCst), 2);
    }
}
