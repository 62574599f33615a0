//! Price representation using decimal arithmetic.
//!
//! Product prices are stored as [`rust_decimal::Decimal`] to avoid binary
//! floating point drift, but the JSON API speaks plain numbers: prices
//! serialize as JSON numbers (`19.99`), and deserialize from either a JSON
//! number or a string (`"19.99"`), since the admin form submits prices as
//! strings.

use core::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::de::{self, Deserializer, Visitor};

/// Serde helpers for price fields: serialize as a JSON number, accept a
/// number or a string on input.
///
/// Use with `#[serde(with = "entre_nous_core::price::as_number")]`.
pub mod as_number {
    use super::{Decimal, Deserializer, FlexibleDecimal};

    /// Serialize a decimal as a JSON float.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying serializer fails.
    pub fn serialize<S>(value: &Decimal, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        rust_decimal::serde::float::serialize(value, serializer)
    }

    /// Deserialize a decimal from a JSON number or string.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is neither a number nor a parseable
    /// numeric string.
    pub fn deserialize<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(FlexibleDecimal)
    }
}

/// Serde helpers for optional price fields.
///
/// Use with `#[serde(with = "entre_nous_core::price::as_number_opt")]`.
pub mod as_number_opt {
    use super::{Decimal, Deserializer, FlexibleDecimal, de};

    /// Serialize an optional decimal as a JSON float or null.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying serializer fails.
    pub fn serialize<S>(value: &Option<Decimal>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        match value {
            Some(d) => rust_decimal::serde::float::serialize(d, serializer),
            None => serializer.serialize_none(),
        }
    }

    /// Deserialize an optional decimal from a JSON number, string, or null.
    ///
    /// # Errors
    ///
    /// Returns an error if a present value is neither a number nor a
    /// parseable numeric string.
    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct OptVisitor;

        impl<'de> de::Visitor<'de> for OptVisitor {
            type Value = Option<Decimal>;

            fn expecting(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                f.write_str("a number, a numeric string, or null")
            }

            fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
                Ok(None)
            }

            fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
                Ok(None)
            }

            fn visit_some<D2>(self, deserializer: D2) -> Result<Self::Value, D2::Error>
            where
                D2: Deserializer<'de>,
            {
                deserializer.deserialize_any(FlexibleDecimal).map(Some)
            }
        }

        deserializer.deserialize_option(OptVisitor)
    }
}

/// Visitor that accepts a decimal encoded as a float, an integer, or a
/// string.
struct FlexibleDecimal;

impl Visitor<'_> for FlexibleDecimal {
    type Value = Decimal;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a number or a numeric string")
    }

    fn visit_f64<E: de::Error>(self, value: f64) -> Result<Decimal, E> {
        // Round-trip through the shortest decimal representation so that
        // 19.99 parses as 19.99, not its nearest binary expansion.
        Decimal::from_str(&value.to_string())
            .map_err(|_| E::custom(format!("invalid price: {value}")))
    }

    fn visit_i64<E: de::Error>(self, value: i64) -> Result<Decimal, E> {
        Ok(Decimal::from(value))
    }

    fn visit_u64<E: de::Error>(self, value: u64) -> Result<Decimal, E> {
        Ok(Decimal::from(value))
    }

    fn visit_str<E: de::Error>(self, value: &str) -> Result<Decimal, E> {
        Decimal::from_str(value.trim())
            .map_err(|_| E::custom(format!("invalid price: {value:?}")))
    }
}

/// Format a price for display in US dollars, e.g. `$89.99`.
#[must_use]
pub fn format_usd(amount: Decimal) -> String {
    let rounded = amount.round_dp(2);
    format!("${rounded:.2}")
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rust_decimal::Decimal;
    use serde::{Deserialize, Serialize};

    use super::format_usd;

    #[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
    struct Priced {
        #[serde(with = "super::as_number")]
        price: Decimal,
    }

    #[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
    struct MaybePriced {
        #[serde(default, with = "super::as_number_opt")]
        price: Option<Decimal>,
    }

    #[test]
    fn test_deserialize_from_number() {
        let p: Priced = serde_json::from_str(r#"{"price": 19.99}"#).unwrap();
        assert_eq!(p.price, Decimal::new(1999, 2));
    }

    #[test]
    fn test_deserialize_from_string() {
        let p: Priced = serde_json::from_str(r#"{"price": "19.99"}"#).unwrap();
        assert_eq!(p.price, Decimal::new(1999, 2));
    }

    #[test]
    fn test_deserialize_from_integer() {
        let p: Priced = serde_json::from_str(r#"{"price": 65}"#).unwrap();
        assert_eq!(p.price, Decimal::from(65));
    }

    #[test]
    fn test_deserialize_rejects_garbage() {
        assert!(serde_json::from_str::<Priced>(r#"{"price": "cheap"}"#).is_err());
        assert!(serde_json::from_str::<Priced>(r#"{"price": true}"#).is_err());
    }

    #[test]
    fn test_serialize_as_number() {
        let p = Priced {
            price: Decimal::new(1999, 2),
        };
        assert_eq!(serde_json::to_string(&p).unwrap(), r#"{"price":19.99}"#);
    }

    #[test]
    fn test_optional_missing_and_present() {
        let none: MaybePriced = serde_json::from_str("{}").unwrap();
        assert_eq!(none.price, None);

        let some: MaybePriced = serde_json::from_str(r#"{"price": "10.5"}"#).unwrap();
        assert_eq!(some.price, Some(Decimal::new(105, 1)));
    }

    #[test]
    fn test_format_usd() {
        assert_eq!(format_usd(Decimal::new(8999, 2)), "$89.99");
        assert_eq!(format_usd(Decimal::from(65)), "$65.00");
        assert_eq!(format_usd(Decimal::new(105, 1)), "$10.50");
    }
}
