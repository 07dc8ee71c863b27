//! Strongly-typed identifiers used across the domain.

use core::str::FromStr;
use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Identifier of a product inside a warehouse.
///
/// Ids are plain integers so they survive the text file verbatim. The value is
/// not range-checked: negative ids read from disk are kept as-is. The default
/// is `0`, which no generator ever hands out.
///
/// [`ProductId::MAX`] has no successor, so it is never stored: the data file
/// rejects it and a warehouse counter stops there.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(i64);

impl ProductId {
    /// The first id handed out by an empty warehouse.
    pub const FIRST: ProductId = ProductId(1);

    /// Ceiling of the id space.
    pub const MAX: ProductId = ProductId(i64::MAX);

    pub const fn new(value: i64) -> Self {
        Self(value)
    }

    pub const fn value(self) -> i64 {
        self.0
    }

    /// The id immediately after this one, or `None` at [`ProductId::MAX`].
    pub const fn next(self) -> Option<Self> {
        match self.0.checked_add(1) {
            Some(value) => Some(Self(value)),
            None => None,
        }
    }
}

impl core::fmt::Display for ProductId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

impl From<i64> for ProductId {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl From<ProductId> for i64 {
    fn from(value: ProductId) -> Self {
        value.0
    }
}

impl FromStr for ProductId {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = s
            .trim()
            .parse::<i64>()
            .map_err(|e| DomainError::invalid_id(format!("ProductId: {s:?}: {e}")))?;
        Ok(Self(value))
    }
}
