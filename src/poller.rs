// src/poller.rs
// Cancellable periodic task used by the game view to re-fetch its data.

use std::future::Future;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

/// Handle to a running poller. Dropping it stops the poller.
pub struct PollHandle {
    active: Arc<Mutex<bool>>,
    task: JoinHandle<()>,
}

impl PollHandle {
    /// Stops polling. Once this returns, `on_result` is never called again
    /// and a fetch still in flight is discarded.
    pub fn stop(&self) {
        let mut active = self.active.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        *active = false;
        drop(active);
        self.task.abort();
    }

    pub fn is_active(&self) -> bool {
        *self.active.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Drop for PollHandle {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Runs `fetch` right away and then every `period`, handing each result to
/// `on_result`. A slow fetch delays the next tick instead of overlapping it.
pub fn start<F, Fut, T, C>(period: Duration, fetch: F, on_result: C) -> PollHandle
where
    F: Fn() -> Fut + Send + 'static,
    Fut: Future<Output = T> + Send + 'static,
    T: Send + 'static,
    C: FnMut(T) + Send + 'static,
{
    let active = Arc::new(Mutex::new(true));
    let flag = Arc::clone(&active);

    let task = tokio::spawn(async move {
        let mut on_result = on_result;
        let mut ticker = tokio::time::interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            let result = fetch().await;
            if !deliver(&flag, &mut on_result, result) {
                break;
            }
        }
    });

    PollHandle { active, task }
}

// The callback runs under the lock so stop() waits for it to finish.
fn deliver<T, C: FnMut(T)>(flag: &Mutex<bool>, on_result: &mut C, result: T) -> bool {
    let active = flag.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
    if !*active {
        return false;
    }
    on_result(result);
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::sync::{mpsc, Notify};

    #[tokio::test]
    async fn test_first_tick_is_immediate() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let handle = start(Duration::from_secs(3600), || async { 42 }, move |v| {
            let _ = tx.send(v);
        });

        let value = tokio::time::timeout(Duration::from_secs(2), rx.recv()).await.unwrap();
        assert_eq!(value, Some(42));
        handle.stop();
    }

    #[tokio::test]
    async fn test_polls_repeatedly() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let (tx, mut rx) = mpsc::unbounded_channel();
        let handle = start(
            Duration::from_millis(10),
            move || {
                let n = counter.fetch_add(1, Ordering::SeqCst);
                async move { n }
            },
            move |v| {
                let _ = tx.send(v);
            },
        );

        for expected in 0..3 {
            let value = tokio::time::timeout(Duration::from_secs(2), rx.recv()).await.unwrap();
            assert_eq!(value, Some(expected));
        }
        handle.stop();
        assert!(!handle.is_active());
    }

    #[tokio::test]
    async fn test_stop_discards_in_flight_result() {
        let release = Arc::new(Notify::new());
        let started = Arc::new(Notify::new());
        let delivered = Arc::new(AtomicUsize::new(0));

        let gate = Arc::clone(&release);
        let announce = Arc::clone(&started);
        let sink = Arc::clone(&delivered);
        let handle = start(
            Duration::from_secs(3600),
            move || {
                let gate = Arc::clone(&gate);
                let announce = Arc::clone(&announce);
                async move {
                    announce.notify_one();
                    gate.notified().await;
                    "late"
                }
            },
            move |_| {
                sink.fetch_add(1, Ordering::SeqCst);
            },
        );

        // Fetch is in flight; stop, then let it resolve.
        started.notified().await;
        handle.stop();
        release.notify_one();
        tokio::time::sleep(Duration::from_millis(50)).await;

        assert_eq!(delivered.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_drop_stops_polling() {
        let delivered = Arc::new(AtomicUsize::new(0));
        let sink = Arc::clone(&delivered);
        let handle = start(Duration::from_millis(5), || async {}, move |_| {
            sink.fetch_add(1, Ordering::SeqCst);
        });
        tokio::time::sleep(Duration::from_millis(30)).await;
        drop(handle);
        let after_drop = delivered.load(Ordering::SeqCst);
        tokio::time::sleep(Duration::from_millis(30)).await;
        assert_eq!(delivered.load(Ordering::SeqCst), after_drop);
    }
}
