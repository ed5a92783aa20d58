//! Minimal metrics registry for the gateway.
//!
//! Each counter family has one label; values are keyed by the label value in
//! a `DashMap`. Rendering sorts label values so output is deterministic.
//! Histogram buckets are fixed in microseconds to avoid floating point math.

use std::fmt::Write;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::Duration;

use dashmap::DashMap;

use cas_core::Verdict;

pub(crate) fn escape_label(v: &str) -> String {
    v.replace('\\', "\\\\").replace('"', "\\\"").replace('\n', "\\n")
}

/// Counter family with a single label.
pub struct LabeledCounter {
    label: &'static str,
    values: DashMap<String, AtomicU64>,
}

impl LabeledCounter {
    pub fn new(label: &'static str) -> Self {
        Self {
            label,
            values: DashMap::new(),
        }
    }

    pub fn inc(&self, value: &str) {
        if let Some(c) = self.values.get(value) {
            c.fetch_add(1, Ordering::Relaxed);
            return;
        }
        self.values
            .entry(value.to_string())
            .or_insert_with(|| AtomicU64::new(0))
            .fetch_add(1, Ordering::Relaxed);
    }

    pub fn get(&self, value: &str) -> u64 {
        self.values
            .get(value)
            .map(|c| c.load(Ordering::Relaxed))
            .unwrap_or(0)
    }

    fn render(&self, name: &str, out: &mut String) {
        let _ = writeln!(out, "# TYPE {name} counter");
        let mut rows: Vec<(String, u64)> = self
            .values
            .iter()
            .map(|r| (r.key().clone(), r.value().load(Ordering::Relaxed)))
            .collect();
        rows.sort();
        for (v, n) in rows {
            let _ = writeln!(out, "{name}{{{}=\"{}\"}} {n}", self.label, escape_label(&v));
        }
    }
}

// 1ms, 5ms, 10ms, 50ms, 100ms, 500ms, 1s, 5s
const BUCKETS_MICROS: [u64; 8] = [
    1_000, 5_000, 10_000, 50_000, 100_000, 500_000, 1_000_000, 5_000_000,
];

/// Cumulative latency histogram (unit: microseconds).
#[derive(Default)]
pub struct LatencyHistogram {
    count: AtomicU64,
    sum: AtomicU64,
    buckets: [AtomicU64; 8],
}

impl LatencyHistogram {
    pub fn observe(&self, d: Duration) {
        let micros = u64::try_from(d.as_micros()).unwrap_or(u64::MAX);
        self.count.fetch_add(1, Ordering::Relaxed);
        self.sum.fetch_add(micros, Ordering::Relaxed);
        for (slot, &le) in self.buckets.iter().zip(BUCKETS_MICROS.iter()) {
            if micros <= le {
                slot.fetch_add(1, Ordering::Relaxed);
            }
        }
    }

    pub fn count(&self) -> u64 {
        self.count.load(Ordering::Relaxed)
    }

    fn render(&self, name: &str, out: &mut String) {
        let _ = writeln!(out, "# TYPE {name} histogram");
        for (slot, le) in self.buckets.iter().zip(BUCKETS_MICROS.iter()) {
            let _ = writeln!(out, "{name}_bucket{{le=\"{le}\"}} {}", slot.load(Ordering::Relaxed));
        }
        let count = self.count();
        let _ = writeln!(out, "{name}_bucket{{le=\"+Inf\"}} {count}");
        let _ = writeln!(out, "{name}_sum {}", self.sum.load(Ordering::Relaxed));
        let _ = writeln!(out, "{name}_count {count}");
    }
}

pub struct GatewayMetrics {
    pub verdicts: LabeledCounter,
    pub catalog_errors: LabeledCounter,
    pub token_rejections: AtomicU64,
    pub authorize_duration: LatencyHistogram,
    draining: AtomicBool,
}

impl Default for GatewayMetrics {
    fn default() -> Self {
        Self {
            verdicts: LabeledCounter::new("outcome"),
            catalog_errors: LabeledCounter::new("kind"),
            token_rejections: AtomicU64::new(0),
            authorize_duration: LatencyHistogram::default(),
            draining: AtomicBool::new(false),
        }
    }
}

impl GatewayMetrics {
    pub fn observe_verdict(&self, verdict: &Verdict, elapsed: Duration) {
        self.verdicts.inc(verdict.outcome());
        self.authorize_duration.observe(elapsed);
    }

    pub fn token_rejected(&self) {
        self.token_rejections.fetch_add(1, Ordering::Relaxed);
    }

    pub fn set_draining(&self) {
        self.draining.store(true, Ordering::Relaxed);
    }

    pub fn is_draining(&self) -> bool {
        self.draining.load(Ordering::Relaxed)
    }

    /// Render all families plus caller-provided `(line prefix, value)` rows.
    pub fn render(&self, extra: &[(&str, u64)]) -> String {
        let mut out = String::new();
        self.verdicts.render("cas_verdicts_total", &mut out);
        self.catalog_errors.render("cas_catalog_errors_total", &mut out);
        let _ = writeln!(
            out,
            "# TYPE cas_token_rejections_total counter\ncas_token_rejections_total {}",
            self.token_rejections.load(Ordering::Relaxed)
        );
        self.authorize_duration
            .render("cas_authorize_duration_micros", &mut out);
        let _ = writeln!(
            out,
            "# TYPE cas_draining gauge\ncas_draining {}",
            u8::from(self.is_draining())
        );
        for (k, v) in extra {
            let _ = writeln!(out, "{k} {v}");
        }
        out
    }
}
