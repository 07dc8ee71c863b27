//! Products domain module.
//!
//! This crate contains the product record and its variants, implemented purely
//! as deterministic domain logic (no IO, no locking, no storage).

pub mod product;

pub use product::{Product, ProductKind, ProductKindTag, validate_name};
