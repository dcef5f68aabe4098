//! Static field table mapping a [`Coupon`] to its cached hash.
//!
//! Every field is written on populate and required on read, so `decode` is the
//! exact inverse of `encode`.

use std::collections::HashMap;
use std::str::FromStr;

use chrono::{DateTime, SecondsFormat, Utc};
use rust_decimal::Decimal;

use super::CacheError;
use crate::domain::{Coupon, CouponCode, CouponType, CouponUsage};

/// One entry of the cached hash.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CouponField {
    /// `coupon_code`
    Code,
    /// `title`
    Title,
    /// `description`
    Description,
    /// `coupon_type`
    CouponType,
    /// `usage`
    Usage,
    /// `coupon_value`
    Value,
    /// `expired_at`
    ExpiresAt,
    /// `created_at`
    CreatedAt,
    /// `updated_at`
    UpdatedAt,
}

impl CouponField {
    /// Every field, in write order.
    pub const ALL: [Self; 9] = [
        Self::Code,
        Self::Title,
        Self::Description,
        Self::CouponType,
        Self::Usage,
        Self::Value,
        Self::ExpiresAt,
        Self::CreatedAt,
        Self::UpdatedAt,
    ];

    /// Hash field name, shared with the JSON wire format.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Code => "coupon_code",
            Self::Title => "title",
            Self::Description => "description",
            Self::CouponType => "coupon_type",
            Self::Usage => "usage",
            Self::Value => "coupon_value",
            Self::ExpiresAt => "expired_at",
            Self::CreatedAt => "created_at",
            Self::UpdatedAt => "updated_at",
        }
    }

    fn read(self, coupon: &Coupon) -> String {
        match self {
            Self::Code => coupon.code.to_string(),
            Self::Title => coupon.title.clone(),
            Self::Description => coupon.description.clone(),
            Self::CouponType => coupon.coupon_type.to_string(),
            Self::Usage => coupon.usage.to_string(),
            Self::Value => coupon.value.to_string(),
            Self::ExpiresAt => format_timestamp(coupon.expires_at),
            Self::CreatedAt => format_timestamp(coupon.created_at),
            Self::UpdatedAt => format_timestamp(coupon.updated_at),
        }
    }
}

fn format_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Nanos, true)
}

/// Flatten `coupon` into `(field, value)` pairs for HSET.
#[must_use]
pub fn encode(coupon: &Coupon) -> Vec<(&'static str, String)> {
    CouponField::ALL
        .iter()
        .map(|field| (field.key(), field.read(coupon)))
        .collect()
}

/// Rebuild a coupon from a cached hash.
///
/// # Errors
/// Returns [`CacheError::Corrupt`] naming the first missing or unparseable
/// field.
pub fn decode(hash: &HashMap<String, String>) -> Result<Coupon, CacheError> {
    let code = CouponCode::new(raw(hash, CouponField::Code)?)
        .map_err(|err| corrupt(CouponField::Code, err))?;
    let value = Decimal::from_str(raw(hash, CouponField::Value)?)
        .map_err(|err| corrupt(CouponField::Value, err))?;

    Ok(Coupon {
        code,
        title: raw(hash, CouponField::Title)?.to_owned(),
        description: raw(hash, CouponField::Description)?.to_owned(),
        coupon_type: CouponType::from_stored(raw(hash, CouponField::CouponType)?),
        usage: CouponUsage::from_stored(raw(hash, CouponField::Usage)?),
        value,
        expires_at: timestamp(hash, CouponField::ExpiresAt)?,
        created_at: timestamp(hash, CouponField::CreatedAt)?,
        updated_at: timestamp(hash, CouponField::UpdatedAt)?,
    })
}

fn raw(hash: &HashMap<String, String>, field: CouponField) -> Result<&str, CacheError> {
    hash.get(field.key())
        .map(String::as_str)
        .ok_or_else(|| CacheError::corrupt(field.key(), "missing"))
}

fn timestamp(hash: &HashMap<String, String>, field: CouponField) -> Result<DateTime<Utc>, CacheError> {
    DateTime::parse_from_rfc3339(raw(hash, field)?)
        .map(|at| at.with_timezone(&Utc))
        .map_err(|err| corrupt(field, err))
}

fn corrupt(field: CouponField, err: impl std::fmt::Display) -> CacheError {
    CacheError::corrupt(field.key(), err.to_string())
}

#[cfg(test)]
mod tests {
    //! Field table coverage.
    use super::*;
    use crate::test_support::sample_coupon;
    use chrono::TimeZone;
    use rstest::{fixture, rstest};
    use rust_decimal_macros::dec;

    #[fixture]
    fn coupon() -> Coupon {
        Coupon {
            value: dec!(150.50),
            expires_at: Utc
                .with_ymd_and_hms(2030, 12, 31, 23, 59, 59)
                .unwrap()
                .checked_add_signed(chrono::Duration::nanoseconds(123_456_789))
                .expect("in range"),
            ..sample_coupon("ROUNDTRIP")
        }
    }

    fn to_hash(pairs: Vec<(&'static str, String)>) -> HashMap<String, String> {
        pairs
            .into_iter()
            .map(|(key, value)| (key.to_owned(), value))
            .collect()
    }

    #[rstest]
    fn decode_inverts_encode(coupon: Coupon) {
        let hash = to_hash(encode(&coupon));
        assert_eq!(decode(&hash), Ok(coupon));
    }

    #[rstest]
    fn encode_writes_every_field(coupon: Coupon) {
        let keys: Vec<_> = encode(&coupon).into_iter().map(|(key, _)| key).collect();
        let expected: Vec<_> = CouponField::ALL.iter().map(|field| field.key()).collect();
        assert_eq!(keys, expected);
    }

    #[rstest]
    fn encode_uses_wire_strings(coupon: Coupon) {
        let hash = to_hash(encode(&coupon));
        assert_eq!(hash.get("coupon_value").map(String::as_str), Some("150.50"));
        assert_eq!(
            hash.get("expired_at").map(String::as_str),
            Some("2030-12-31T23:59:59.123456789Z")
        );
        assert_eq!(hash.get("coupon_type").map(String::as_str), Some("fixed"));
    }

    #[rstest]
    fn decode_keeps_unknown_coupon_type(coupon: Coupon) {
        let mut hash = to_hash(encode(&coupon));
        hash.insert("coupon_type".to_owned(), "bogo".to_owned());
        let decoded = decode(&hash).expect("decodes");
        assert_eq!(decoded.coupon_type, CouponType::Unsupported("bogo".to_owned()));
    }

    #[rstest]
    #[case("title", None)]
    #[case("coupon_value", Some("ten"))]
    #[case("expired_at", Some("yesterday"))]
    #[case("updated_at", None)]
    #[case("coupon_code", Some(""))]
    fn decode_reports_corrupt_field(
        coupon: Coupon,
        #[case] field: &str,
        #[case] replacement: Option<&str>,
    ) {
        let mut hash = to_hash(encode(&coupon));
        match replacement {
            Some(value) => hash.insert(field.to_owned(), value.to_owned()),
            None => hash.remove(field),
        };
        let err = decode(&hash).expect_err("corrupt hash");
        assert!(
            matches!(&err, CacheError::Corrupt { field: reported, .. } if reported == field),
            "unexpected error: {err:?}"
        );
    }

    #[rstest]
    fn decode_accepts_offset_timestamps(coupon: Coupon) {
        let mut hash = to_hash(encode(&coupon));
        hash.insert("created_at".to_owned(), "2025-01-01T09:00:00+02:00".to_owned());
        let decoded = decode(&hash).expect("decodes");
        assert_eq!(
            decoded.created_at,
            Utc.with_ymd_and_hms(2025, 1, 1, 7, 0, 0).unwrap()
        );
    }
}
