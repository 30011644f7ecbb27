//! # Progress — Scan Progress Counters
//!
//! Thread-safe counters shared between the rayon classification workers and
//! the background status reporter. Atomics keep the per-candidate updates
//! lock-free; a Mutex guards only the current-block string, which changes
//! once per base block rather than once per candidate.
//!
//! A Q_n(q) scan is finite and knows its candidate count before it starts,
//! so a [`Progress`] built with [`Progress::for_candidates`] also reports
//! percent complete and a rate-based finish estimate. [`Progress::new`]
//! leaves the total open for callers that drive the counters directly.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};
use tracing::info;

/// How often the background reporter logs a status line.
const REPORT_INTERVAL: Duration = Duration::from_secs(30);

pub struct Progress {
    pub tested: AtomicU64,
    pub found: AtomicU64,
    pub current: Mutex<String>,
    total: Option<u64>,
    start: Instant,
    shutdown: AtomicBool,
}

impl Progress {
    /// Progress with no known candidate total.
    pub fn new() -> Arc<Self> {
        Self::build(None)
    }

    /// Progress for a scan whose candidate count is known up front.
    pub fn for_candidates(total: u64) -> Arc<Self> {
        Self::build(Some(total))
    }

    fn build(total: Option<u64>) -> Arc<Self> {
        Arc::new(Progress {
            tested: AtomicU64::new(0),
            found: AtomicU64::new(0),
            current: Mutex::new(String::new()),
            total,
            start: Instant::now(),
            shutdown: AtomicBool::new(false),
        })
    }

    /// Fraction of the scan completed, when the total is known and nonzero.
    pub fn completion(&self) -> Option<f64> {
        match self.total {
            Some(total) if total > 0 => {
                Some(self.tested.load(Ordering::Relaxed) as f64 / total as f64)
            }
            _ => None,
        }
    }

    /// Spawn the reporter thread. It logs a status line every
    /// `REPORT_INTERVAL` until [`Progress::stop`] is called.
    pub fn start_reporter(self: &Arc<Self>) -> thread::JoinHandle<()> {
        let progress = Arc::clone(self);
        thread::spawn(move || loop {
            thread::sleep(REPORT_INTERVAL);
            if progress.shutdown.load(Ordering::Relaxed) {
                break;
            }
            progress.print_status();
        })
    }

    pub fn print_status(&self) {
        let elapsed = self.start.elapsed();
        let tested = self.tested.load(Ordering::Relaxed);
        let found = self.found.load(Ordering::Relaxed);
        let current = self.current.lock().unwrap().clone();
        let rate = if elapsed.as_secs() > 0 {
            tested as f64 / elapsed.as_secs_f64()
        } else {
            0.0
        };
        let h = elapsed.as_secs() / 3600;
        let m = (elapsed.as_secs() % 3600) / 60;
        let s = elapsed.as_secs() % 60;
        match self.total {
            Some(total) if total > 0 => {
                let remaining = total.saturating_sub(tested);
                let eta_secs = if rate > 0.0 {
                    (remaining as f64 / rate) as u64
                } else {
                    0
                };
                info!(
                    current = %current,
                    tested,
                    total,
                    pct = format_args!("{:.1}", 100.0 * tested as f64 / total as f64),
                    rate = format_args!("{:.2}", rate),
                    found,
                    elapsed = format_args!("{:02}:{:02}:{:02}", h, m, s),
                    eta_secs,
                    "scan progress"
                );
            }
            _ => {
                info!(
                    current = %current,
                    tested,
                    rate = format_args!("{:.2}", rate),
                    found,
                    elapsed = format_args!("{:02}:{:02}:{:02}", h, m, s),
                    "scan progress"
                );
            }
        }
    }

    pub fn stop(&self) {
        self.shutdown.store(true, Ordering::Relaxed);
    }
}
