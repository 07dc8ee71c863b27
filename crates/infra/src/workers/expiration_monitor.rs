//! Periodic scan for expired food.
//!
//! The monitor runs on its own named thread, wakes every interval, asks the
//! warehouse for food that expired before today and hands any hits to an
//! [`ExpiryReporter`]. It only ever reads the warehouse.
//!
//! At process exit the monitor is simply abandoned: nothing joins it. A
//! [`MonitorHandle`] can still stop it explicitly (tests do).

use std::io;
use std::panic::{self, AssertUnwindSafe};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::sync::{Arc, Mutex, PoisonError};
use std::thread;
use std::time::Duration;

use chrono::{Local, NaiveDate};
use thiserror::Error;
use tracing::{debug, error, info, warn};

use stockroom_inventory::Warehouse;
use stockroom_products::Product;

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("failed to write expiry report: {0}")]
    Io(#[from] io::Error),

    #[error("{0}")]
    Other(String),
}

/// Receives the expired products found by a scan.
///
/// Only called when at least one product has expired. Reporters handed to
/// [`ExpirationMonitor::spawn`] must also be `Send + 'static`.
pub trait ExpiryReporter {
    fn report(&mut self, as_of: NaiveDate, expired: &[Product]) -> Result<(), ReportError>;
}

impl<F> ExpiryReporter for F
where
    F: FnMut(NaiveDate, &[Product]) -> Result<(), ReportError>,
{
    fn report(&mut self, as_of: NaiveDate, expired: &[Product]) -> Result<(), ReportError> {
        self(as_of, expired)
    }
}

/// Expiration monitor configuration.
#[derive(Debug, Clone)]
pub struct ExpirationMonitorConfig {
    /// Pause between scans
    pub interval: Duration,
    /// Thread name, also used in log fields
    pub name: String,
}

impl Default for ExpirationMonitorConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(30),
            name: "expiration-monitor".to_string(),
        }
    }
}

impl ExpirationMonitorConfig {
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }
}

/// Monitor runtime statistics.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MonitorStats {
    pub scans: u64,
    pub reports: u64,
    pub failures: u64,
    /// Number of expired products seen by the latest successful scan.
    pub last_expired: usize,
}

/// Handle to a running monitor.
#[derive(Debug)]
pub struct MonitorHandle {
    shutdown: mpsc::Sender<()>,
    join: Option<thread::JoinHandle<()>>,
    stats: Arc<Mutex<MonitorStats>>,
}

impl MonitorHandle {
    /// Request shutdown and wait for the monitor thread to stop.
    pub fn shutdown(mut self) {
        let _ = self.shutdown.send(());
        if let Some(j) = self.join.take() {
            let _ = j.join();
        }
    }

    /// Let the monitor run for the rest of the process without a way to stop it.
    pub fn detach(self) {}

    pub fn stats(&self) -> MonitorStats {
        self.stats
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

/// Background expired-food scanner.
#[derive(Debug)]
pub struct ExpirationMonitor;

impl ExpirationMonitor {
    /// Spawn the monitor using the local calendar date as "today".
    pub fn spawn<R>(
        warehouse: Arc<Warehouse>,
        config: ExpirationMonitorConfig,
        reporter: R,
    ) -> io::Result<MonitorHandle>
    where
        R: ExpiryReporter + Send + 'static,
    {
        Self::spawn_with_clock(warehouse, config, reporter, || Local::now().date_naive())
    }

    /// Spawn the monitor with an explicit source for "today".
    pub fn spawn_with_clock<R, C>(
        warehouse: Arc<Warehouse>,
        config: ExpirationMonitorConfig,
        reporter: R,
        today: C,
    ) -> io::Result<MonitorHandle>
    where
        R: ExpiryReporter + Send + 'static,
        C: Fn() -> NaiveDate + Send + 'static,
    {
        let (shutdown_tx, shutdown_rx) = mpsc::channel::<()>();
        let stats = Arc::new(Mutex::new(MonitorStats::default()));
        let stats_clone = stats.clone();

        let join = thread::Builder::new()
            .name(config.name.clone())
            .spawn(move || {
                monitor_loop(warehouse, config, shutdown_rx, reporter, today, stats_clone);
            })?;

        Ok(MonitorHandle {
            shutdown: shutdown_tx,
            join: Some(join),
            stats,
        })
    }

    /// Run a single scan. Returns how many expired products were found.
    pub fn scan_once<R>(
        warehouse: &Warehouse,
        as_of: NaiveDate,
        reporter: &mut R,
    ) -> Result<usize, ReportError>
    where
        R: ExpiryReporter + ?Sized,
    {
        let expired = warehouse.list_expired_food(as_of);
        if !expired.is_empty() {
            reporter.report(as_of, &expired)?;
        }
        Ok(expired.len())
    }
}

fn monitor_loop<R, C>(
    warehouse: Arc<Warehouse>,
    config: ExpirationMonitorConfig,
    shutdown_rx: mpsc::Receiver<()>,
    mut reporter: R,
    today: C,
    stats: Arc<Mutex<MonitorStats>>,
) where
    R: ExpiryReporter,
    C: Fn() -> NaiveDate,
{
    info!(
        monitor = %config.name,
        interval_ms = config.interval.as_millis() as u64,
        "expiration monitor started"
    );

    loop {
        match shutdown_rx.recv_timeout(config.interval) {
            Ok(()) => break,
            Err(RecvTimeoutError::Timeout) => {}
            // Handle dropped: nobody can stop us any more, keep the cadence.
            Err(RecvTimeoutError::Disconnected) => thread::sleep(config.interval),
        }

        let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
            let as_of = today();
            ExpirationMonitor::scan_once(&warehouse, as_of, &mut reporter)
        }));

        let mut s = stats.lock().unwrap_or_else(PoisonError::into_inner);
        s.scans += 1;
        match outcome {
            Ok(Ok(found)) => {
                s.last_expired = found;
                if found > 0 {
                    s.reports += 1;
                }
                debug!(monitor = %config.name, expired = found, "expiration scan finished");
            }
            Ok(Err(err)) => {
                s.failures += 1;
                warn!(monitor = %config.name, error = %err, "expiry report failed");
            }
            Err(_) => {
                s.failures += 1;
                error!(monitor = %config.name, "expiration scan panicked");
            }
        }
    }

    info!(monitor = %config.name, "expiration monitor stopped");
}
