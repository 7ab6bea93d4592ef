use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

/// Counts elapsed seconds of a live interview session.
///
/// A background task ticks once per second and increments the counter while
/// the timer is running. The task is aborted by [`SessionTimer::stop`] or
/// when the timer is dropped.
pub struct SessionTimer {
    elapsed: Arc<AtomicU64>,
    running: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl SessionTimer {
    /// Must be called from within a tokio runtime.
    pub fn start() -> Self {
        let elapsed = Arc::new(AtomicU64::new(0));
        let running = Arc::new(AtomicBool::new(true));

        let handle = {
            let elapsed = elapsed.clone();
            let running = running.clone();
            tokio::spawn(async move {
                let mut ticker = tokio::time::interval(Duration::from_secs(1));
                ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
                // The first tick completes immediately.
                ticker.tick().await;
                loop {
                    ticker.tick().await;
                    if running.load(Ordering::Acquire) {
                        elapsed.fetch_add(1, Ordering::AcqRel);
                    }
                }
            })
        };

        Self {
            elapsed,
            running,
            handle: Some(handle),
        }
    }

    pub fn pause(&self) {
        self.running.store(false, Ordering::Release);
    }

    pub fn resume(&self) {
        if self.handle.is_some() {
            self.running.store(true, Ordering::Release);
        }
    }

    pub fn is_running(&self) -> bool {
        self.handle.is_some() && self.running.load(Ordering::Acquire)
    }

    pub fn elapsed_secs(&self) -> u64 {
        self.elapsed.load(Ordering::Acquire)
    }

    /// Stops counting for good and returns the final elapsed seconds.
    pub fn stop(&mut self) -> u64 {
        self.running.store(false, Ordering::Release);
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
        self.elapsed_secs()
    }
}

impl Drop for SessionTimer {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}

/// `HH:MM:SS`, hours unbounded.
pub fn format_elapsed(secs: u64) -> String {
    format!("{:02}:{:02}:{:02}", secs / 3600, (secs / 60) % 60, secs % 60)
}
