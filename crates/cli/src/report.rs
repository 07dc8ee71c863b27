//! Console output for the expiration monitor.

use std::io::Write;

use chrono::NaiveDate;
use tracing::warn;

use stockroom_infra::{ExpiryReporter, ReportError};
use stockroom_products::Product;

/// Prints a warning banner and the expired products.
///
/// The whole report goes out in one write so that it does not get split by
/// output from the menu thread; it ends with a fresh prompt marker because the
/// operator is usually sitting at the menu prompt when it appears.
#[derive(Debug)]
pub struct ConsoleReporter<W> {
    out: W,
}

impl<W: Write> ConsoleReporter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> ExpiryReporter for ConsoleReporter<W> {
    fn report(&mut self, as_of: NaiveDate, expired: &[Product]) -> Result<(), ReportError> {
        warn!(%as_of, count = expired.len(), "expired products in stock");

        let mut text = String::from("\n[WARNING] Expired products:\n");
        for product in expired {
            text.push_str(&product.to_string());
            text.push('\n');
        }
        text.push_str("> ");

        self.out.write_all(text.as_bytes())?;
        self.out.flush()?;
        Ok(())
    }
}
