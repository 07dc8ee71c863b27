//! Background workers that run beside the interactive loop.

pub mod expiration_monitor;

pub use expiration_monitor::{
    ExpirationMonitor, ExpirationMonitorConfig, ExpiryReporter, MonitorHandle, MonitorStats,
    ReportError,
};
