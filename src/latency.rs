//! In-memory latency rollups for hot routes.
//!
//! Each route keeps a bounded sample window so p50/p95 can be surfaced over
//! `GET /api/diagnostics/latency` without persistent storage. The recorder is owned
//! by [`crate::state::AppState`], so every test gets its own.

use std::collections::{HashMap, VecDeque};
use std::time::Instant;

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::Serialize;

use crate::util::format_timestamp;

const MAX_SAMPLES_PER_ROUTE: usize = 256;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LatencyRouteRollup {
    pub route: String,
    pub sample_count: usize,
    pub p50_ms: u128,
    pub p95_ms: u128,
    pub max_ms: u128,
    pub budget_ms: u128,
    pub budget_violations: u64,
    pub last_recorded_at: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LatencyRollupsPayload {
    pub generated_at: String,
    pub routes: Vec<LatencyRouteRollup>,
}

#[derive(Debug, Clone, Default)]
struct RouteLatencyWindow {
    samples_ms: VecDeque<u128>,
    budget_ms: u128,
    budget_violations: u64,
    last_recorded_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Default)]
pub struct LatencyRecorder {
    windows: Mutex<HashMap<String, RouteLatencyWindow>>,
}

impl LatencyRecorder {
    pub fn record_sample(&self, route: &str, elapsed_ms: u128, budget_ms: u128) {
        let mut windows = self.windows.lock();

        let window = windows.entry(route.to_string()).or_default();
        window.budget_ms = budget_ms;
        if elapsed_ms > budget_ms {
            window.budget_violations += 1;
            tracing::warn!(route, elapsed_ms, budget_ms, "route exceeded latency budget");
        }
        if window.samples_ms.len() >= MAX_SAMPLES_PER_ROUTE {
            window.samples_ms.pop_front();
        }
        window.samples_ms.push_back(elapsed_ms);
        window.last_recorded_at = Some(Utc::now());
    }

    /// Run `f`, recording its wall time under `route`.
    pub fn time<T>(&self, route: &str, budget_ms: u128, f: impl FnOnce() -> T) -> T {
        let started = Instant::now();
        let out = f();
        self.record_sample(route, started.elapsed().as_millis(), budget_ms);
        out
    }

    pub fn snapshot(&self) -> LatencyRollupsPayload {
        let windows = self.windows.lock();

        let mut routes: Vec<LatencyRouteRollup> = windows
            .iter()
            .map(|(route, window)| {
                let mut values: Vec<u128> = window.samples_ms.iter().copied().collect();
                values.sort_unstable();

                LatencyRouteRollup {
                    route: route.clone(),
                    sample_count: values.len(),
                    p50_ms: percentile(&values, 50.0).unwrap_or(0),
                    p95_ms: percentile(&values, 95.0).unwrap_or(0),
                    max_ms: values.last().copied().unwrap_or(0),
                    budget_ms: window.budget_ms,
                    budget_violations: window.budget_violations,
                    last_recorded_at: window.last_recorded_at.as_ref().map(format_timestamp),
                }
            })
            .collect();

        routes.sort_by(|a, b| b.p95_ms.cmp(&a.p95_ms).then(a.route.cmp(&b.route)));

        LatencyRollupsPayload {
            generated_at: format_timestamp(&Utc::now()),
            routes,
        }
    }
}

/// Nearest-rank percentile over sorted values.
fn percentile(values: &[u128], p: f64) -> Option<u128> {
    if values.is_empty() {
        return None;
    }
    let n = values.len();
    let rank = ((p / 100.0) * n as f64).ceil() as usize;
    let idx = rank.saturating_sub(1).min(n - 1);
    Some(values[idx])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percentile_empty() {
        assert_eq!(percentile(&[], 95.0), None);
    }

    #[test]
    fn test_percentile_nearest_rank() {
        let values = vec![10_u128, 20, 30];
        assert_eq!(percentile(&values, 50.0), Some(20));
        assert_eq!(percentile(&values, 95.0), Some(30));
        assert_eq!(percentile(&[7], 50.0), Some(7));
    }

    #[test]
    fn test_window_is_bounded() {
        let recorder = LatencyRecorder::default();
        for ms in 1..=300 {
            recorder.record_sample("GET /api/dashboard/stats", ms, 100);
        }
        let snapshot = recorder.snapshot();
        let rollup = &snapshot.routes[0];
        assert_eq!(rollup.sample_count, MAX_SAMPLES_PER_ROUTE);
        assert_eq!(rollup.max_ms, 300);
        // Oldest 44 samples were dropped.
        assert_eq!(rollup.p50_ms, 45 + 127);
    }

    #[tracing_test::traced_test]
    #[test]
    fn test_budget_violations_only_when_exceeded() {
        let recorder = LatencyRecorder::default();
        recorder.record_sample("stats", 95, 100);
        recorder.record_sample("stats", 100, 100);
        recorder.record_sample("stats", 101, 100);
        recorder.record_sample("stats", 300, 100);

        let snapshot = recorder.snapshot();
        assert_eq!(snapshot.routes[0].budget_violations, 2);
        assert_eq!(snapshot.routes[0].budget_ms, 100);
        assert!(logs_contain("route exceeded latency budget"));
    }

    #[test]
    fn test_routes_sorted_by_p95_desc() {
        let recorder = LatencyRecorder::default();
        recorder.record_sample("fast", 1, 100);
        recorder.record_sample("slow", 50, 100);
        let value = recorder.time("timed", 100, || 42);
        assert_eq!(value, 42);

        let names: Vec<String> = recorder
            .snapshot()
            .routes
            .into_iter()
            .map(|r| r.route)
            .collect();
        assert_eq!(names[0], "slow");
        assert_eq!(names.len(), 3);
    }

    #[test]
    fn test_empty_snapshot() {
        let snapshot = LatencyRecorder::default().snapshot();
        assert!(snapshot.routes.is_empty());
        assert!(snapshot.generated_at.ends_with('Z'));
    }
}
