use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use stockroom_core::{DomainError, DomainResult, Entity, Price, ProductId};

/// Kind-specific payload of a product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ProductKind {
    Food { expiration_date: NaiveDate },
    Electronics { warranty_months: i64 },
}

impl ProductKind {
    pub fn tag(&self) -> ProductKindTag {
        match self {
            ProductKind::Food { .. } => ProductKindTag::Food,
            ProductKind::Electronics { .. } => ProductKindTag::Electronics,
        }
    }
}

/// Payload-free discriminant of [`ProductKind`], as written in the data file
/// and typed by the operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProductKindTag {
    Food,
    Electronics,
}

impl ProductKindTag {
    pub fn as_str(self) -> &'static str {
        match self {
            ProductKindTag::Food => "food",
            ProductKindTag::Electronics => "electronics",
        }
    }
}

impl core::fmt::Display for ProductKindTag {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Case-insensitive; surrounding whitespace is ignored.
impl core::str::FromStr for ProductKindTag {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "food" => Ok(ProductKindTag::Food),
            "electronics" => Ok(ProductKindTag::Electronics),
            other => Err(DomainError::validation(format!("unknown product kind: {other:?}"))),
        }
    }
}

/// One inventory item.
///
/// Immutable once constructed: a product is either built from operator input
/// with an id taken from the warehouse, or read back from the data file with
/// its stored id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Product {
    id: ProductId,
    name: String,
    price: Price,
    quantity: i64,
    #[serde(flatten)]
    kind: ProductKind,
}

impl Product {
    pub fn new(
        id: ProductId,
        name: impl Into<String>,
        price: Price,
        quantity: i64,
        kind: ProductKind,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            price,
            quantity,
            kind,
        }
    }

    pub fn food(
        id: ProductId,
        name: impl Into<String>,
        price: Price,
        quantity: i64,
        expiration_date: NaiveDate,
    ) -> Self {
        Self::new(id, name, price, quantity, ProductKind::Food { expiration_date })
    }

    pub fn electronics(
        id: ProductId,
        name: impl Into<String>,
        price: Price,
        quantity: i64,
        warranty_months: i64,
    ) -> Self {
        Self::new(
            id,
            name,
            price,
            quantity,
            ProductKind::Electronics { warranty_months },
        )
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn price(&self) -> Price {
        self.price
    }

    pub fn quantity(&self) -> i64 {
        self.quantity
    }

    pub fn kind(&self) -> &ProductKind {
        &self.kind
    }

    pub fn expiration_date(&self) -> Option<NaiveDate> {
        match self.kind {
            ProductKind::Food { expiration_date } => Some(expiration_date),
            ProductKind::Electronics { .. } => None,
        }
    }

    pub fn warranty_months(&self) -> Option<i64> {
        match self.kind {
            ProductKind::Electronics { warranty_months } => Some(warranty_months),
            ProductKind::Food { .. } => None,
        }
    }

    /// True for food whose expiration date is strictly before `as_of`.
    ///
    /// Food expiring on `as_of` itself is still good for that day.
    pub fn is_expired(&self, as_of: NaiveDate) -> bool {
        self.expiration_date().is_some_and(|date| date < as_of)
    }
}

impl Entity for Product {
    type Id = ProductId;

    fn id(&self) -> ProductId {
        self.id
    }
}

impl core::fmt::Display for Product {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let common = format!(
            "ID={}, Name='{}', Price={}, Qty={}",
            self.id, self.name, self.price, self.quantity
        );
        match self.kind {
            ProductKind::Food { expiration_date } => {
                write!(f, "Food{{{common}, Expiration={expiration_date}}}")
            }
            ProductKind::Electronics { warranty_months } => {
                write!(f, "Electronics{{{common}, WarrantyMonths={warranty_months}}}")
            }
        }
    }
}

/// Check a product name typed by the operator.
///
/// Names are stored verbatim in a comma-separated file, so a comma would
/// split the record.
pub fn validate_name(name: &str) -> DomainResult<&str> {
    if name.trim().is_empty() {
        return Err(DomainError::validation("name cannot be empty"));
    }
    if name.contains(',') {
        return Err(DomainError::validation("name cannot contain ','"));
    }
    Ok(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn milk() -> Product {
        Product::food(
            ProductId::new(1),
            "Milk",
            Price::from_cents(250),
            10,
            date(2020, 1, 1),
        )
    }

    fn radio() -> Product {
        Product::electronics(ProductId::new(2), "Radio", Price::from_cents(4999), 3, 12)
    }

    #[test]
    fn accessors_expose_variant_fields() {
        let milk = milk();
        assert_eq!(milk.id(), ProductId::new(1));
        assert_eq!(milk.kind().tag(), ProductKindTag::Food);
        assert_eq!(milk.expiration_date(), Some(date(2020, 1, 1)));
        assert_eq!(milk.warranty_months(), None);

        let radio = radio();
        assert_eq!(radio.kind().tag(), ProductKindTag::Electronics);
        assert_eq!(radio.warranty_months(), Some(12));
        assert_eq!(radio.expiration_date(), None);
    }

    #[test]
    fn expiry_is_strictly_before_reference_date() {
        let milk = milk();
        assert!(milk.is_expired(date(2020, 1, 2)));
        assert!(!milk.is_expired(date(2020, 1, 1)));
        assert!(!milk.is_expired(date(2019, 12, 31)));
        assert!(!radio().is_expired(date(2100, 1, 1)));
    }

    #[test]
    fn display_matches_operator_listing() {
        assert_eq!(
            milk().to_string(),
            "Food{ID=1, Name='Milk', Price=2.50, Qty=10, Expiration=2020-01-01}"
        );
        assert_eq!(
            radio().to_string(),
            "Electronics{ID=2, Name='Radio', Price=49.99, Qty=3, WarrantyMonths=12}"
        );
    }

    #[test]
    fn kind_tag_parsing_is_case_insensitive() {
        assert_eq!("FOOD".parse::<ProductKindTag>().unwrap(), ProductKindTag::Food);
        assert_eq!(
            " Electronics ".parse::<ProductKindTag>().unwrap(),
            ProductKindTag::Electronics
        );
        assert!("toys".parse::<ProductKindTag>().is_err());
    }

    #[test]
    fn name_validation() {
        assert!(validate_name("Milk").is_ok());
        assert!(validate_name("").is_err());
        assert!(validate_name("   ").is_err());
        assert!(validate_name("Milk, whole").is_err());
    }

    #[test]
    fn serde_shape_is_flat_with_kind_tag() {
        let value = serde_json::to_value(milk()).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "id": 1,
                "name": "Milk",
                "price": 250,
                "quantity": 10,
                "kind": "food",
                "expiration_date": "2020-01-01"
            })
        );

        let back: Product = serde_json::from_value(serde_json::json!({
            "id": 2,
            "name": "Radio",
            "price": 4999,
            "quantity": 3,
            "kind": "electronics",
            "warranty_months": 12
        }))
        .unwrap();
        assert_eq!(back, radio());
    }

    #[cfg(test)]
    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            /// Property: electronics never expire, food expires exactly after its date.
            #[test]
            fn expiry_depends_only_on_food_date(
                offset in -1000i64..1000,
                warranty in 0i64..120,
            ) {
                let reference = date(2024, 6, 15);
                let expires = reference + chrono::Duration::days(offset);
                let food = Product::food(ProductId::new(1), "Bread", Price::ZERO, 1, expires);
                let gadget = Product::electronics(ProductId::new(2), "Lamp", Price::ZERO, 1, warranty);

                prop_assert_eq!(food.is_expired(reference), offset < 0);
                prop_assert!(!gadget.is_expired(reference));
            }
        }
    }
}
