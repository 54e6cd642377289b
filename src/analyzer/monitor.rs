//! Memory budget watchdog.
//!
//! The monitor samples process memory on a fixed interval while metric
//! generation runs and signals once usage crosses the configured ceiling.
//! It never signals while usage stays under the limit.

use crate::error::{AnalyzerError, Result};
use parking_lot::Mutex;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use sysinfo::{Pid, System};
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

/// Interval between memory samples.
pub const CHECK_INTERVAL: Duration = Duration::from_millis(50);

const BYTES_PER_MB: f64 = 1024.0 * 1024.0;

/// Convert bytes to megabytes.
pub fn bytes_to_mb(bytes: u64) -> f64 {
    bytes as f64 / BYTES_PER_MB
}

// ============================================================================
// Memory Probes
// ============================================================================

/// Source of the current memory figure the budget is enforced against.
pub trait MemoryProbe: Send + Sync {
    /// Current usage in bytes. Returns 0 when the figure is unavailable.
    fn current_bytes(&self) -> u64;
}

/// Resident memory of the current process, read through `sysinfo`.
pub struct ProcessMemoryProbe {
    system: Mutex<System>,
    pid: Option<Pid>,
}

impl ProcessMemoryProbe {
    pub fn new() -> Self {
        let pid = sysinfo::get_current_pid()
            .map_err(|e| log::warn!("Cannot resolve current pid, memory probe disabled: {}", e))
            .ok();
        Self {
            system: Mutex::new(System::new()),
            pid,
        }
    }
}

impl Default for ProcessMemoryProbe {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryProbe for ProcessMemoryProbe {
    fn current_bytes(&self) -> u64 {
        let Some(pid) = self.pid else {
            return 0;
        };
        let mut system = self.system.lock();
        if !system.refresh_process(pid) {
            return 0;
        }
        system.process(pid).map(|p| p.memory()).unwrap_or(0)
    }
}

// ============================================================================
// Budget Checks
// ============================================================================

/// One-off check performed before any work starts.
pub fn check_budget(probe: &dyn MemoryProbe, limit_bytes: u64) -> Result<u64> {
    let used = probe.current_bytes();
    if used > limit_bytes {
        return Err(AnalyzerError::memory(
            format!(
                "Current memory usage ({:.2} MB) already exceeds limit ({:.2} MB)",
                bytes_to_mb(used),
                bytes_to_mb(limit_bytes)
            ),
            bytes_to_mb(used),
            bytes_to_mb(limit_bytes),
        ));
    }
    Ok(used)
}

/// Background watchdog enforcing a memory ceiling.
///
/// The polling task is aborted when the monitor is stopped or dropped.
pub struct BudgetMonitor {
    handle: JoinHandle<()>,
    violation: oneshot::Receiver<AnalyzerError>,
    peak: Arc<AtomicU64>,
}

impl BudgetMonitor {
    /// Start polling. Must be called from within a tokio runtime.
    pub fn start(probe: Arc<dyn MemoryProbe>, limit_bytes: u64) -> Self {
        let (tx, violation) = oneshot::channel();
        let peak = Arc::new(AtomicU64::new(0));
        let task_peak = Arc::clone(&peak);

        let handle = tokio::spawn(async move {
            let mut interval = tokio::time::interval(CHECK_INTERVAL);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // The first tick completes immediately; the upfront check covered it
            interval.tick().await;

            loop {
                interval.tick().await;
                let used = probe.current_bytes();
                task_peak.fetch_max(used, Ordering::Relaxed);

                if used > limit_bytes {
                    log::warn!(
                        "Memory budget exceeded: {:.2} MB used, limit {:.2} MB",
                        bytes_to_mb(used),
                        bytes_to_mb(limit_bytes)
                    );
                    let _ = tx.send(AnalyzerError::memory(
                        format!(
                            "Memory limit exceeded during analysis: {:.2} MB used, limit {:.2} MB",
                            bytes_to_mb(used),
                            bytes_to_mb(limit_bytes)
                        ),
                        bytes_to_mb(used),
                        bytes_to_mb(limit_bytes),
                    ));
                    break;
                }
            }
        });

        Self {
            handle,
            violation,
            peak,
        }
    }

    /// Resolves only when the budget has been violated.
    pub async fn violated(&mut self) -> AnalyzerError {
        match (&mut self.violation).await {
            Ok(err) => err,
            // Polling stopped without a violation
            Err(_) => std::future::pending().await,
        }
    }

    /// Highest usage observed by the polling task, in bytes.
    pub fn peak_bytes(&self) -> u64 {
        self.peak.load(Ordering::Relaxed)
    }

    /// Stop polling.
    pub fn stop(&self) {
        self.handle.abort();
    }

    /// Check if the polling task is still running.
    pub fn is_running(&self) -> bool {
        !self.handle.is_finished()
    }
}

impl Drop for BudgetMonitor {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

// ============================================================================
// Tests
// ============================================================================
