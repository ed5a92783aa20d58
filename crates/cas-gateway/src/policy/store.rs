//! Published policy snapshot.
//!
//! The current policy lives in a `tokio::sync::watch` channel as an
//! `Arc<Policy>`. Readers clone the `Arc` under the channel's read guard and
//! release it immediately; a reload is one `send_replace`. A reader therefore
//! holds either the old snapshot or the new one, never a mix.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tokio::sync::watch;

use cas_core::error::Result;
use cas_core::Policy;

use super::source::{PolicySource, SourceSnapshot};

/// Read access to the live policy (the seam the engine consumes).
pub trait PolicyView: Send + Sync {
    fn current(&self) -> Arc<Policy>;
}

pub struct PolicyStore {
    tx: watch::Sender<Arc<Policy>>,
    /// File content the startup load read, if any.
    opened_from: Option<String>,
    reloads_ok: AtomicU64,
    reloads_failed: AtomicU64,
}

impl PolicyStore {
    pub fn new(initial: Policy) -> Self {
        let (tx, _rx) = watch::channel(Arc::new(initial));
        Self {
            tx,
            opened_from: None,
            reloads_ok: AtomicU64::new(0),
            reloads_failed: AtomicU64::new(0),
        }
    }

    /// Startup load. A malformed source is logged and the defaults are used.
    pub fn open(source: &PolicySource) -> Self {
        let snapshot = match source.read() {
            Ok(s) => s,
            Err(e) => {
                tracing::warn!(error = %e, "policy source unreadable at startup, using defaults");
                None
            }
        };
        let initial = match source.load_snapshot(snapshot.as_ref()) {
            Ok(p) => p,
            Err(e) => {
                tracing::warn!(error = %e, "policy source unusable at startup, using defaults");
                Policy::default()
            }
        };
        if snapshot.is_none() {
            tracing::info!("no policy file found, using defaults");
        }
        tracing::info!(drm_id = %initial.required_drm_id(), "policy loaded");

        let mut store = Self::new(initial);
        store.opened_from = snapshot.map(|s| s.content);
        store
    }

    /// Content of the file the store was opened from. `None` when no file was
    /// found or the store was built with `new`.
    pub fn opened_from(&self) -> Option<&str> {
        self.opened_from.as_deref()
    }

    /// Latest published snapshot. Never blocks on a reload in progress
    /// beyond the pointer exchange.
    pub fn current(&self) -> Arc<Policy> {
        Arc::clone(&self.tx.borrow())
    }

    /// Replace the snapshot atomically and return it.
    pub fn publish(&self, policy: Policy) -> Arc<Policy> {
        let next = Arc::new(policy);
        let prev = self.tx.send_replace(Arc::clone(&next));
        if prev.required_drm_id() != next.required_drm_id() {
            tracing::info!(
                from = %prev.required_drm_id(),
                to = %next.required_drm_id(),
                "policy changed"
            );
        }
        next
    }

    /// Re-read the source. On failure the previous snapshot stays published.
    pub fn reload(&self, source: &PolicySource) -> Result<Arc<Policy>> {
        let snapshot = match source.read() {
            Ok(s) => s,
            Err(e) => return Err(self.reload_failed(e)),
        };
        self.reload_from(source, snapshot.as_ref())
    }

    /// Apply content that was already read (used by the watcher so the
    /// change it detected is the content it applies).
    pub fn reload_from(
        &self,
        source: &PolicySource,
        snapshot: Option<&SourceSnapshot>,
    ) -> Result<Arc<Policy>> {
        match source.load_snapshot(snapshot) {
            Ok(policy) => {
                self.reloads_ok.fetch_add(1, Ordering::Relaxed);
                Ok(self.publish(policy))
            }
            Err(e) => Err(self.reload_failed(e)),
        }
    }

    fn reload_failed(&self, e: cas_core::CasError) -> cas_core::CasError {
        self.reloads_failed.fetch_add(1, Ordering::Relaxed);
        tracing::warn!(
            error = %e,
            kept = %self.current().required_drm_id(),
            "policy reload failed, keeping previous policy"
        );
        e
    }

    /// Receiver notified on every publish.
    pub fn subscribe(&self) -> watch::Receiver<Arc<Policy>> {
        self.tx.subscribe()
    }

    /// `(ok, failed)` reload counts since startup.
    pub fn reload_counts(&self) -> (u64, u64) {
        (
            self.reloads_ok.load(Ordering::Relaxed),
            self.reloads_failed.load(Ordering::Relaxed),
        )
    }
}

impl PolicyView for PolicyStore {
    fn current(&self) -> Arc<Policy> {
        PolicyStore::current(self)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::fs;
    use std::thread;

    use super::*;

    #[test]
    fn reload_swaps_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cas-app-config.yaml");
        fs::write(&path, "config:\n  app:\n    DEFAULT_DRM_ID: \"6\"\n").unwrap();
        let source = PolicySource::file(&path);

        let store = PolicyStore::open(&source);
        let before = store.current();
        assert_eq!(before.required_drm_id(), "6");

        fs::write(&path, "config:\n  app:\n    DEFAULT_DRM_ID: \"9\"\n").unwrap();
        store.reload(&source).unwrap();

        assert_eq!(store.current().required_drm_id(), "9");
        // a reader holding the old snapshot keeps a whole, unchanged value
        assert_eq!(before.required_drm_id(), "6");
        assert_eq!(store.reload_counts(), (1, 0));
    }

    #[test]
    fn malformed_reload_keeps_previous() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cas-app-config.yaml");
        fs::write(&path, "config:\n  app:\n    DEFAULT_DRM_ID: \"7\"\n").unwrap();
        let source = PolicySource::file(&path);
        let store = PolicyStore::open(&source);

        fs::write(&path, "config: [broken\n").unwrap();
        assert!(store.reload(&source).is_err());
        assert_eq!(store.current().required_drm_id(), "7");
        assert_eq!(store.reload_counts(), (0, 1));
    }

    #[test]
    fn open_remembers_startup_content() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cas-app-config.yaml");
        let content = "config:\n  app:\n    DEFAULT_DRM_ID: \"5\"\n";
        fs::write(&path, content).unwrap();

        let store = PolicyStore::open(&PolicySource::file(&path));
        assert_eq!(store.opened_from(), Some(content));
        let absent = PolicySource::file(dir.path().join("absent.yaml"));
        assert_eq!(PolicyStore::open(&absent).opened_from(), None);
    }

    #[test]
    fn malformed_at_startup_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cas-app-config.yaml");
        fs::write(&path, "config:\n  app:\n    nope: 1\n").unwrap();
        let store = PolicyStore::open(&PolicySource::file(&path));
        assert_eq!(store.current().required_drm_id(), "6");
    }

    #[test]
    fn concurrent_readers_see_whole_snapshots() {
        let store = Arc::new(PolicyStore::new(Policy::new("6").unwrap()));
        let writer = {
            let store = Arc::clone(&store);
            thread::spawn(move || {
                for i in 0..500 {
                    let id = if i % 2 == 0 { "9" } else { "6" };
                    store.publish(Policy::new(id).unwrap());
                }
            })
        };
        let readers: Vec<_> = (0..4)
            .map(|_| {
                let store = Arc::clone(&store);
                thread::spawn(move || {
                    for _ in 0..2000 {
                        let p = store.current();
                        let id = p.required_drm_id();
                        assert!(id == "6" || id == "9", "torn policy: {id}");
                    }
                })
            })
            .collect();
        writer.join().unwrap();
        for r in readers {
            r.join().unwrap();
        }
    }

    #[tokio::test]
    async fn subscribers_are_notified() {
        let store = PolicyStore::new(Policy::default());
        let mut rx = store.subscribe();
        store.publish(Policy::new("9").unwrap());
        rx.changed().await.unwrap();
        assert_eq!(rx.borrow().required_drm_id(), "9");
    }
}
