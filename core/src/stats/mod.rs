//! Refresh-cycle counters and load latency percentiles.
//!
//! The engine records every cycle here; hosts read a [`RefreshSnapshot`] for diagnostics.

use std::cmp::Ordering;
use std::collections::VecDeque;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use serde::Serialize;
use tracing::warn;

const DEFAULT_SAMPLE_CAPACITY: usize = 120;

#[derive(Debug, Default)]
struct SampleWindow {
    samples: VecDeque<f32>,
    capacity: usize,
}

impl SampleWindow {
    fn new(capacity: usize) -> Self {
        Self { samples: VecDeque::with_capacity(capacity), capacity }
    }

    fn push(&mut self, value: f32) {
        if self.samples.len() == self.capacity {
            self.samples.pop_front();
        }
        self.samples.push_back(value);
    }

    fn percentile(&self, percentile: f32) -> f32 {
        if self.samples.is_empty() {
            return 0.0;
        }
        let mut sorted: Vec<f32> = self.samples.iter().copied().collect();
        sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));
        let rank = percentile.clamp(0.0, 1.0) * (sorted.len() - 1) as f32;
        sorted.get(rank.round() as usize).copied().unwrap_or(0.0)
    }
}

/// How a refresh cycle ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleResult {
    Loaded,
    Failed,
    Unauthorized,
    Discarded,
}

#[derive(Debug)]
struct StatsInner {
    started_at: Instant,
    load_times_ms: SampleWindow,
    cycles_started: u64,
    cycles_loaded: u64,
    cycles_failed: u64,
    cycles_unauthorized: u64,
    cycles_discarded: u64,
    last_loaded_ms: Option<u64>,
    last_movie_count: usize,
}

impl Default for StatsInner {
    fn default() -> Self {
        Self {
            started_at: Instant::now(),
            load_times_ms: SampleWindow::new(DEFAULT_SAMPLE_CAPACITY),
            cycles_started: 0,
            cycles_loaded: 0,
            cycles_failed: 0,
            cycles_unauthorized: 0,
            cycles_discarded: 0,
            last_loaded_ms: None,
            last_movie_count: 0,
        }
    }
}

#[derive(Debug, Default)]
pub struct RefreshStats {
    inner: parking_lot::Mutex<StatsInner>,
}

impl RefreshStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_started(&self) {
        let mut guard = self.inner.lock();
        guard.cycles_started = guard.cycles_started.saturating_add(1);
    }

    /// Record the end of a cycle; `movie_count` only matters for loaded cycles.
    pub fn record_finished(&self, result: CycleResult, elapsed: Duration, movie_count: usize) {
        let mut guard = self.inner.lock();
        match result {
            CycleResult::Loaded => {
                guard.cycles_loaded = guard.cycles_loaded.saturating_add(1);
                guard.load_times_ms.push(elapsed.as_secs_f64() as f32 * 1_000.0);
                guard.last_loaded_ms = Some(now_ms());
                guard.last_movie_count = movie_count;
            }
            CycleResult::Failed => guard.cycles_failed = guard.cycles_failed.saturating_add(1),
            CycleResult::Unauthorized => {
                guard.cycles_unauthorized = guard.cycles_unauthorized.saturating_add(1)
            }
            CycleResult::Discarded => {
                guard.cycles_discarded = guard.cycles_discarded.saturating_add(1)
            }
        }
    }

    pub fn snapshot(&self) -> RefreshSnapshot {
        let guard = self.inner.lock();
        RefreshSnapshot {
            timestamp_ms: now_ms(),
            uptime_ms: guard.started_at.elapsed().as_millis() as u64,
            cycles_started: guard.cycles_started,
            cycles_loaded: guard.cycles_loaded,
            cycles_failed: guard.cycles_failed,
            cycles_unauthorized: guard.cycles_unauthorized,
            cycles_discarded: guard.cycles_discarded,
            load_time_ms_p50: guard.load_times_ms.percentile(0.50),
            load_time_ms_p95: guard.load_times_ms.percentile(0.95),
            last_loaded_ms: guard.last_loaded_ms,
            last_movie_count: guard.last_movie_count,
        }
    }
}

fn now_ms() -> u64 {
    match SystemTime::now().duration_since(UNIX_EPOCH) {
        Ok(delta) => delta.as_millis() as u64,
        Err(err) => {
            warn!("system clock error: {err}");
            0
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshSnapshot {
    pub timestamp_ms: u64,
    pub uptime_ms: u64,
    pub cycles_started: u64,
    pub cycles_loaded: u64,
    pub cycles_failed: u64,
    pub cycles_unauthorized: u64,
    pub cycles_discarded: u64,
    pub load_time_ms_p50: f32,
    pub load_time_ms_p95: f32,
    pub last_loaded_ms: Option<u64>,
    pub last_movie_count: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_each_outcome() {
        let stats = RefreshStats::new();
        for _ in 0..4 {
            stats.record_started();
        }
        stats.record_finished(CycleResult::Loaded, Duration::from_millis(40), 12);
        stats.record_finished(CycleResult::Failed, Duration::from_millis(5), 0);
        stats.record_finished(CycleResult::Unauthorized, Duration::from_millis(5), 0);
        stats.record_finished(CycleResult::Discarded, Duration::from_millis(5), 0);

        let snap = stats.snapshot();
        assert_eq!(snap.cycles_started, 4);
        assert_eq!(snap.cycles_loaded, 1);
        assert_eq!(snap.cycles_failed, 1);
        assert_eq!(snap.cycles_unauthorized, 1);
        assert_eq!(snap.cycles_discarded, 1);
        assert_eq!(snap.last_movie_count, 12);
        assert!(snap.last_loaded_ms.is_some());
    }

    #[test]
    fn percentiles_only_track_successful_loads() {
        let stats = RefreshStats::new();
        stats.record_finished(CycleResult::Loaded, Duration::from_millis(10), 1);
        stats.record_finished(CycleResult::Loaded, Duration::from_millis(20), 1);
        stats.record_finished(CycleResult::Loaded, Duration::from_millis(30), 1);
        stats.record_finished(CycleResult::Failed, Duration::from_secs(9), 0);

        let snap = stats.snapshot();
        assert!((snap.load_time_ms_p50 - 20.0).abs() < 0.5);
        assert!(snap.load_time_ms_p95 <= 30.5);
    }
}
