//! Infrastructure layer: data file codec, file persistence, configuration and
//! background workers.

pub mod codec;
pub mod config;
pub mod persistence;
pub mod workers;

pub use codec::{Decoded, SkipReason, SkippedLine};
pub use config::{ConfigError, InventoryConfig};
pub use persistence::{LoadOutcome, PersistenceError, ProductFile};
pub use workers::{ExpirationMonitor, ExpirationMonitorConfig, ExpiryReporter, MonitorHandle, ReportError};
