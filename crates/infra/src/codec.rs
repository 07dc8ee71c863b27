//! Line-oriented text format for the product file.
//!
//! One product per line, six comma-separated fields:
//!
//! ```text
//! <id>,<kind>,<name>,<price>,<quantity>,<variant>
//! 1,food,Milk,2.50,10,2020-01-01
//! 2,electronics,Radio,49.99,3,12
//! ```
//!
//! `kind` is `food` or `electronics`; `variant` is the expiration date
//! (`YYYY-MM-DD`) for food and the warranty in months for electronics. The
//! price is written with exactly two fractional digits and a `.` separator.
//!
//! Decoding never fails as a whole: a line that does not parse becomes a
//! [`SkippedLine`] and the remaining lines are still read.

use chrono::NaiveDate;
use thiserror::Error;

use stockroom_core::{Entity, Price, ProductId};
use stockroom_products::{Product, ProductKind, ProductKindTag};

pub const DELIMITER: &str = ",";

/// Why a line was dropped while decoding.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SkipReason {
    #[error("expected 6 fields, found {found}")]
    FieldCount { found: usize },

    #[error("invalid id {0:?}")]
    InvalidId(String),

    #[error("unknown product kind {0:?}")]
    UnknownKind(String),

    #[error("invalid price {0:?}")]
    InvalidPrice(String),

    #[error("invalid quantity {0:?}")]
    InvalidQuantity(String),

    #[error("invalid expiration date {0:?}")]
    InvalidExpirationDate(String),

    #[error("invalid warranty {0:?}")]
    InvalidWarranty(String),
}

/// A line that could not be decoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedLine {
    /// 1-based line number within the decoded text.
    pub line_number: usize,
    pub content: String,
    pub reason: SkipReason,
}

impl core::fmt::Display for SkippedLine {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(
            f,
            "line {}: {} ({:?})",
            self.line_number, self.reason, self.content
        )
    }
}

/// Result of decoding a whole file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Decoded {
    pub products: Vec<Product>,
    /// Largest id among the decoded products, `0` when none decoded.
    pub max_id: ProductId,
    pub skipped: Vec<SkippedLine>,
}

impl Decoded {
    /// Counter seed for a warehouse loaded with these products.
    pub fn next_id(&self) -> ProductId {
        self.max_id.next().unwrap_or(ProductId::MAX)
    }
}

/// Encode one product as a line, without the trailing newline.
pub fn encode_line(product: &Product) -> String {
    let variant = match product.kind() {
        ProductKind::Food { expiration_date } => expiration_date.format("%Y-%m-%d").to_string(),
        ProductKind::Electronics { warranty_months } => warranty_months.to_string(),
    };
    [
        product.id().to_string(),
        product.kind().tag().as_str().to_string(),
        product.name().to_string(),
        product.price().to_string(),
        product.quantity().to_string(),
        variant,
    ]
    .join(DELIMITER)
}

/// Encode products in the given order, one `\n`-terminated line each.
pub fn serialize(products: &[Product]) -> String {
    let mut out = String::new();
    for product in products {
        out.push_str(&encode_line(product));
        out.push('\n');
    }
    out
}

/// Decode a single line.
pub fn decode_line(line: &str) -> Result<Product, SkipReason> {
    let fields: Vec<&str> = line.split(DELIMITER).collect();
    let [id, kind, name, price, quantity, variant] = fields.as_slice() else {
        return Err(SkipReason::FieldCount {
            found: fields.len(),
        });
    };

    // MAX is the counter ceiling and can never be stored.
    let id = id
        .parse::<ProductId>()
        .ok()
        .filter(|parsed| *parsed != ProductId::MAX)
        .ok_or_else(|| SkipReason::InvalidId(id.to_string()))?;
    let tag: ProductKindTag = kind
        .parse()
        .map_err(|_| SkipReason::UnknownKind(kind.to_string()))?;
    let price = Price::parse(price).map_err(|_| SkipReason::InvalidPrice(price.to_string()))?;
    let quantity: i64 = quantity
        .trim()
        .parse()
        .map_err(|_| SkipReason::InvalidQuantity(quantity.to_string()))?;

    let kind = match tag {
        ProductKindTag::Food => {
            let expiration_date: NaiveDate = variant
                .trim()
                .parse()
                .map_err(|_| SkipReason::InvalidExpirationDate(variant.to_string()))?;
            ProductKind::Food { expiration_date }
        }
        ProductKindTag::Electronics => {
            let warranty_months: i64 = variant
                .trim()
                .parse()
                .map_err(|_| SkipReason::InvalidWarranty(variant.to_string()))?;
            ProductKind::Electronics { warranty_months }
        }
    };

    Ok(Product::new(id, *name, price, quantity, kind))
}

/// Decode every line of `text`, collecting failures instead of stopping.
pub fn deserialize(text: &str) -> Decoded {
    let mut decoded = Decoded::default();

    for (index, line) in text.lines().enumerate() {
        match decode_line(line) {
            Ok(product) => {
                if decoded.products.is_empty() || product.id() > decoded.max_id {
                    decoded.max_id = product.id();
                }
                decoded.products.push(product);
            }
            Err(reason) => decoded.skipped.push(SkippedLine {
                line_number: index + 1,
                content: line.to_string(),
                reason,
            }),
        }
    }

    decoded
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
            Price::parse("2.5").unwrap(),
            10,
            date(2020, 1, 1),
        )
    }

    fn radio() -> Product {
        Product::electronics(ProductId::new(2), "Radio", Price::parse("49.99").unwrap(), 3, 12)
    }

    #[test]
    fn serializes_known_scenario() {
        let text = serialize(&[milk(), radio()]);
        assert_eq!(
            text,
            "1,food,Milk,2.50,10,2020-01-01\n2,electronics,Radio,49.99,3,12\n"
        );
    }

    #[test]
    fn deserializes_known_scenario() {
        let decoded = deserialize("1,food,Milk,2.50,10,2020-01-01\n2,electronics,Radio,49.99,3,12\n");
        assert!(decoded.skipped.is_empty());
        assert_eq!(decoded.products, vec![milk(), radio()]);
        assert_eq!(decoded.max_id, ProductId::new(2));
        assert_eq!(decoded.next_id(), ProductId::new(3));
    }

    #[test]
    fn empty_text_decodes_to_nothing() {
        let decoded = deserialize("");
        assert!(decoded.products.is_empty());
        assert!(decoded.skipped.is_empty());
        assert_eq!(decoded.max_id, ProductId::new(0));
        assert_eq!(decoded.next_id(), ProductId::FIRST);
    }

    #[test]
    fn wrong_field_count_is_skipped_not_fatal() {
        let decoded = deserialize("1,food,Milk,2.50,10,2020-01-01\n2,electronics,Radio,49.99,3\n");
        assert_eq!(decoded.products.len(), 1);
        assert_eq!(decoded.skipped.len(), 1);

        let skipped = &decoded.skipped[0];
        assert_eq!(skipped.line_number, 2);
        assert_eq!(skipped.content, "2,electronics,Radio,49.99,3");
        assert_eq!(skipped.reason, SkipReason::FieldCount { found: 5 });
    }

    #[test]
    fn every_kind_of_bad_field_is_reported() {
        let cases = [
            ("x,food,Milk,2.50,10,2020-01-01", SkipReason::InvalidId("x".into())),
            ("1,toys,Ball,2.50,10,3", SkipReason::UnknownKind("toys".into())),
            ("1,food,Milk,cheap,10,2020-01-01", SkipReason::InvalidPrice("cheap".into())),
            ("1,food,Milk,2.50,many,2020-01-01", SkipReason::InvalidQuantity("many".into())),
            ("1,food,Milk,2.50,10,soon", SkipReason::InvalidExpirationDate("soon".into())),
            ("1,food,Milk,2.50,10,2020-02-30", SkipReason::InvalidExpirationDate("2020-02-30".into())),
            ("1,electronics,Radio,49.99,3,long", SkipReason::InvalidWarranty("long".into())),
            ("", SkipReason::FieldCount { found: 1 }),
            ("1,food,Milk,2,50,10,2020-01-01", SkipReason::FieldCount { found: 7 }),
            ("1,food,Milk,2.50,10,2020-01-01,", SkipReason::FieldCount { found: 7 }),
            (
                "9223372036854775807,electronics,Radio,49.99,3,12",
                SkipReason::InvalidId("9223372036854775807".into()),
            ),
        ];

        for (line, expected) in cases {
            assert_eq!(decode_line(line), Err(expected), "line {line:?}");
        }
    }

    #[test]
    fn kind_tag_is_case_insensitive_and_crlf_is_tolerated() {
        let decoded = deserialize("1,FOOD,Milk,2.50,10,2020-01-01\r\n2,Electronics,Radio,49.99,3,12\r\n");
        assert!(decoded.skipped.is_empty());
        assert_eq!(decoded.products, vec![milk(), radio()]);
    }

    #[test]
    fn n_lines_with_k_malformed_yield_n_minus_k_products() {
        let text = [
            "1,food,Milk,2.50,10,2020-01-01",
            "garbage",
            "2,electronics,Radio,49.99,3,12",
            "3,food,Eggs,3.10,12,not-a-date",
            "4,food,Eggs,3.10,12,2030-05-05",
        ]
        .join("\n");

        let decoded = deserialize(&text);
        assert_eq!(decoded.products.len(), 3);
        assert_eq!(decoded.skipped.len(), 2);
        assert_eq!(
            decoded.skipped.iter().map(|s| s.line_number).collect::<Vec<_>>(),
            vec![2, 4]
        );
        assert_eq!(decoded.max_id, ProductId::new(4));
    }

    #[test]
    fn max_id_tracks_largest_not_last() {
        let decoded = deserialize("7,electronics,A,1.00,1,1\n3,electronics,B,1.00,1,1\n");
        assert_eq!(decoded.max_id, ProductId::new(7));
    }

    #[test]
    fn top_of_id_space_is_skipped_without_overflow() {
        let decoded = deserialize(
            "9223372036854775807,electronics,Radio,49.99,3,12\n\
             9223372036854775806,food,Milk,2.50,10,2020-01-01\n",
        );
        assert_eq!(decoded.skipped.len(), 1);
        assert_eq!(decoded.skipped[0].line_number, 1);
        assert_eq!(decoded.max_id, ProductId::new(i64::MAX - 1));
        assert_eq!(decoded.next_id(), ProductId::MAX);
    }

    #[test]
    fn negative_values_are_kept() {
        let product = decode_line("-4,electronics,Refund,-1.50,-2,0").unwrap();
        assert_eq!(product.id(), ProductId::new(-4));
        assert_eq!(product.price(), Price::from_cents(-150));
        assert_eq!(product.quantity(), -2);
    }

    #[test]
    fn skipped_line_display_names_line_and_reason() {
        let decoded = deserialize("oops");
        assert_eq!(
            decoded.skipped[0].to_string(),
            "line 1: expected 6 fields, found 1 (\"oops\")"
        );
    }

    #[cfg(test)]
    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        fn product_strategy() -> impl Strategy<Value = Product> {
            let food = (
                -1000i64..100_000,
                "[A-Za-z][A-Za-z0-9 ]{0,30}",
                -100_000i64..10_000_000,
                -100i64..100_000,
                0i64..40_000,
            )
                .prop_map(|(id, name, cents, qty, days)| {
                    let expires = date(2000, 1, 1) + chrono::Duration::days(days);
                    Product::food(ProductId::new(id), name, Price::from_cents(cents), qty, expires)
                });
            let electronics = (
                -1000i64..100_000,
                "[A-Za-z][A-Za-z0-9 ]{0,30}",
                -100_000i64..10_000_000,
                -100i64..100_000,
                0i64..600,
            )
                .prop_map(|(id, name, cents, qty, warranty)| {
                    Product::electronics(ProductId::new(id), name, Price::from_cents(cents), qty, warranty)
                });
            prop_oneof![food, electronics]
        }

        proptest! {
            /// Property: decoding the encoded text yields the same products in order.
            #[test]
            fn serialize_then_deserialize_round_trips(
                products in proptest::collection::vec(product_strategy(), 0..40)
            ) {
                let decoded = deserialize(&serialize(&products));
                prop_assert!(decoded.skipped.is_empty());
                prop_assert_eq!(&decoded.products, &products);
            }
        }
    }
}
