//! `stockroom-core`: domain foundation building blocks.
//!
//! This crate contains **pure domain** primitives (no I/O, no locking).

pub mod entity;
pub mod error;
pub mod id;
pub mod money;

pub use entity::Entity;
pub use error::{DomainError, DomainResult};
pub use id::ProductId;
pub use money::Price;
