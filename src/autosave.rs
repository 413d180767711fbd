use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

/// Auto-save participation for a repository holding a dirty flag.
///
/// A tick saves only when the document is dirty, so a burst of edits within
/// one interval coalesces into a single save. A tick that finds a save
/// already in flight must skip, not queue: at most one save request per
/// repository is ever in flight.
#[async_trait]
pub trait AutoSave: Send + Sync {
    fn is_dirty(&self) -> bool;
    async fn autosave_tick(&self);
}

/// Spawn the fixed-interval auto-save loop for `repo`.
///
/// The task runs for the life of the page; there is no cancellation path. A
/// save superseded by teardown is simply allowed to complete or fail.
pub fn spawn_autosave(repo: Arc<dyn AutoSave>, period: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
        // The first tick of a tokio interval completes immediately.
        interval.tick().await;
        loop {
            interval.tick().await;
            repo.autosave_tick().await;
        }
    })
}
