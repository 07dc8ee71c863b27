//! Operator console: the text menu over the warehouse, plus the console
//! output of the expiration monitor.

pub mod input;
pub mod menu;
pub mod report;
pub mod session;

pub use input::InputError;
pub use menu::MenuChoice;
pub use report::ConsoleReporter;
pub use session::Session;
