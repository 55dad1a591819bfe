//! Drives [`MovieList::reload`] from focus, a periodic timer, scroll-to-top and manual requests.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior, interval_at};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use super::{MovieList, RefreshOutcome, RefreshTrigger, ScrollTracker};

/// Starts the refresh loop for a focused list screen.
#[derive(Debug, Clone)]
pub struct RefreshScheduler {
    period: Duration,
}

impl RefreshScheduler {
    pub fn new(period: Duration) -> Self {
        Self { period }
    }

    /// Attach `list`, load it immediately, then keep it fresh until the handle is stopped.
    ///
    /// Must be called from within a tokio runtime.
    pub fn start(&self, list: Arc<MovieList>) -> SchedulerHandle {
        list.attach();
        let cancel = CancellationToken::new();
        let (triggers, receiver) = mpsc::unbounded_channel();
        let task = tokio::spawn(run_loop(Arc::clone(&list), self.period, receiver, cancel.clone()));
        info!(target: "refresh::scheduler", period_ms = self.period.as_millis() as u64, "refresh started");
        SchedulerHandle {
            list,
            triggers,
            cancel,
            scroll: Mutex::new(ScrollTracker::new()),
            task: Some(task),
        }
    }
}

/// Owned by the focused screen; stopping or dropping it tears the loop down.
#[derive(Debug)]
pub struct SchedulerHandle {
    list: Arc<MovieList>,
    triggers: mpsc::UnboundedSender<RefreshTrigger>,
    cancel: CancellationToken,
    scroll: Mutex<ScrollTracker>,
    task: Option<JoinHandle<()>>,
}

impl SchedulerHandle {
    pub fn list(&self) -> &Arc<MovieList> {
        &self.list
    }

    /// False once stopped, including after the session was rejected.
    pub fn is_running(&self) -> bool {
        !self.cancel.is_cancelled()
    }

    /// Queue an extra cycle. Returns false when the loop is gone.
    pub fn request(&self, trigger: RefreshTrigger) -> bool {
        self.is_running() && self.triggers.send(trigger).is_ok()
    }

    /// Report the list's scroll offset; returning to the top queues a reload.
    pub fn notify_scroll(&self, offset: f64) -> bool {
        let reached_top = self.scroll.lock().observe(offset);
        reached_top && self.request(RefreshTrigger::ScrollTop)
    }

    /// Blur: cancel the timer and any in-flight cycle; late results are dropped.
    pub fn stop(&self) {
        if !self.cancel.is_cancelled() {
            debug!(target: "refresh::scheduler", "refresh stopping");
        }
        self.cancel.cancel();
        self.list.detach();
    }

    /// Stop and wait for the loop task to finish.
    pub async fn shutdown(mut self) {
        self.stop();
        if let Some(task) = self.task.take() {
            let _ = task.await;
        }
    }
}

impl Drop for SchedulerHandle {
    fn drop(&mut self) {
        self.stop();
    }
}

async fn run_loop(
    list: Arc<MovieList>,
    period: Duration,
    mut triggers: mpsc::UnboundedReceiver<RefreshTrigger>,
    cancel: CancellationToken,
) {
    let mut ticker = interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let mut pending = Some(RefreshTrigger::Focus);

    loop {
        let trigger = match pending.take() {
            Some(trigger) => trigger,
            None => tokio::select! {
                biased;
                _ = cancel.cancelled() => break,
                _ = ticker.tick() => RefreshTrigger::Timer,
                received = triggers.recv() => match received {
                    Some(trigger) => trigger,
                    None => break,
                },
            },
        };

        let outcome = tokio::select! {
            biased;
            _ = cancel.cancelled() => break,
            outcome = list.reload(trigger) => outcome,
        };

        if outcome == RefreshOutcome::Unauthorized {
            info!(target: "refresh::scheduler", "session rejected; refresh stopped");
            cancel.cancel();
            list.detach();
            break;
        }
    }

    debug!(target: "refresh::scheduler", "refresh loop exited");
}
