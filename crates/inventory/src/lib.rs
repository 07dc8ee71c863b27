//! Inventory module: the warehouse that owns every product.
//!
//! The warehouse is the single authoritative collection for the process. It is
//! shared by `Arc` between the operator's menu and the expiration monitor and
//! serializes every operation behind one lock.

pub mod warehouse;

pub use warehouse::Warehouse;
