use std::io;
use std::sync::Arc;

use anyhow::Context;

use stockroom_cli::{ConsoleReporter, Session};
use stockroom_infra::config::working_dir;
use stockroom_infra::{ExpirationMonitor, ExpirationMonitorConfig, InventoryConfig, ProductFile};
use stockroom_inventory::Warehouse;

fn main() -> anyhow::Result<()> {
    let (config, config_error) = match InventoryConfig::load() {
        Ok(config) => (config, None),
        Err(err) => (InventoryConfig::defaults_in(&working_dir()), Some(err)),
    };

    stockroom_observability::init(config.log_format);
    if let Some(err) = config_error {
        tracing::warn!(error = %err, "invalid configuration; using defaults");
    }

    println!("Working directory: {}", working_dir().display());

    let warehouse = Arc::new(Warehouse::new());
    let stdin = io::stdin();
    let mut session = Session::new(
        warehouse.clone(),
        ProductFile::new(&config.data_file),
        stdin.lock(),
        io::stdout(),
    );
    session.load().context("failed to write to the console")?;

    // Never joined: the monitor dies with the process.
    ExpirationMonitor::spawn(
        warehouse,
        ExpirationMonitorConfig::default().with_interval(config.expiry_check_interval),
        ConsoleReporter::new(io::stdout()),
    )
    .context("failed to start the expiration monitor")?
    .detach();

    session.run().context("failed to write to the console")?;
    session.save().context("failed to write to the console")?;
    println!("Goodbye!");

    Ok(())
}
