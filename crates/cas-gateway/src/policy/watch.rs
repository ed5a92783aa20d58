//! Policy file watcher.
//!
//! Polls the source on a fixed interval and reloads when the resolved file's
//! content differs from the last content seen. Malformed content is reported
//! once and retried only after the file changes again. A file that disappears
//! leaves the current policy in place.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use cas_core::Policy;

use super::source::PolicySource;
use super::store::PolicyStore;

/// Aborts the watch task when stopped or dropped.
#[derive(Debug)]
pub struct WatchHandle {
    task: JoinHandle<()>,
}

impl WatchHandle {
    pub fn stop(self) {
        drop(self);
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

impl Drop for WatchHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// Start watching `source`. `on_change` runs after every successful reload
/// with the newly published policy. Must be called inside a tokio runtime.
pub fn watch<F>(
    store: Arc<PolicyStore>,
    source: PolicySource,
    interval: Duration,
    on_change: F,
) -> WatchHandle
where
    F: Fn(&Policy) + Send + Sync + 'static,
{
    // Compare against what the store was opened from, so an edit landing
    // between the startup load and this call is still applied.
    let mut last = store.opened_from().map(str::to_string);

    let task = tokio::spawn(async move {
        let mut tick = tokio::time::interval(interval);
        tick.set_missed_tick_behavior(MissedTickBehavior::Skip);
        tick.tick().await;

        loop {
            tick.tick().await;

            let snapshot = match source.read() {
                Ok(s) => s,
                Err(e) => {
                    tracing::warn!(error = %e, "policy source unreadable");
                    continue;
                }
            };

            let Some(snapshot) = snapshot else {
                if last.take().is_some() {
                    tracing::info!("policy file removed, keeping current policy");
                }
                continue;
            };

            if last.as_deref() == Some(snapshot.content.as_str()) {
                continue;
            }
            last = Some(snapshot.content.clone());

            tracing::info!(path = %snapshot.path.display(), "policy file changed");
            if let Ok(policy) = store.reload_from(&source, Some(&snapshot)) {
                tracing::info!(drm_id = %policy.required_drm_id(), "default DRM id from config");
                on_change(&policy);
            }
        }
    });

    WatchHandle { task }
}
