//! Coupon entity and the value objects used to create and change it.
//!
//! A coupon is identified by its user-supplied [`CouponCode`]. Monetary values
//! are [`Decimal`]s held at two decimal places, matching the `NUMERIC(10,2)`
//! storage column.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::{Decimal, RoundingStrategy};
use serde_json::json;

use super::Error;

/// Number of decimal places kept for coupon values and order amounts.
pub const MONEY_SCALE: u32 = 2;

/// Largest amount representable by the storage column (`NUMERIC(10,2)`).
pub const MAX_MONEY: Decimal = Decimal::from_parts(1_410_065_407, 2, 0, false, 2);

/// Round a monetary amount to [`MONEY_SCALE`], midpoint away from zero.
#[must_use]
pub fn round_money(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(MONEY_SCALE, RoundingStrategy::MidpointAwayFromZero)
}

/// Validation errors for [`CouponCode`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CouponCodeError {
    /// The code is empty once trimmed.
    #[error("coupon_code must not be empty")]
    Empty,
    /// The code carries leading or trailing whitespace.
    #[error("coupon_code must not contain surrounding whitespace")]
    SurroundingWhitespace,
}

/// Unique, user-supplied coupon identifier.
///
/// # Examples
/// ```
/// use coupon_backend::domain::CouponCode;
///
/// let code = CouponCode::new("SAVE10").expect("valid code");
/// assert_eq!(code.as_str(), "SAVE10");
/// assert!(CouponCode::new("  ").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CouponCode(String);

impl CouponCode {
    /// Validate and wrap a coupon code.
    ///
    /// # Errors
    /// Rejects blank codes and codes with surrounding whitespace.
    pub fn new(code: impl Into<String>) -> Result<Self, CouponCodeError> {
        let raw = code.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(CouponCodeError::Empty);
        }
        if trimmed.len() != raw.len() {
            return Err(CouponCodeError::SurroundingWhitespace);
        }
        Ok(Self(raw))
    }

    /// Borrow the code as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for CouponCode {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CouponCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for CouponCode {
    type Err = CouponCodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

/// How a coupon's value is interpreted.
///
/// `Unsupported` only arises when reading records written outside this
/// service; the discount engine rejects it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CouponType {
    /// `value` is subtracted from the amount.
    Fixed,
    /// `value` is a percentage of the amount.
    Percentage,
    /// Any other stored type string.
    Unsupported(String),
}

impl CouponType {
    /// Map a stored string, keeping unknown values instead of failing.
    #[must_use]
    pub fn from_stored(raw: &str) -> Self {
        raw.parse().unwrap_or_else(|_| Self::Unsupported(raw.to_owned()))
    }

    /// Wire representation.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Fixed => "fixed",
            Self::Percentage => "percentage",
            Self::Unsupported(raw) => raw,
        }
    }
}

impl fmt::Display for CouponType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown [`CouponType`] or [`CouponUsage`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unsupported {field} {value:?}")]
pub struct UnknownVariantError {
    /// Wire field name.
    pub field: &'static str,
    /// Rejected value.
    pub value: String,
}

impl FromStr for CouponType {
    type Err = UnknownVariantError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "fixed" => Ok(Self::Fixed),
            "percentage" => Ok(Self::Percentage),
            other => Err(UnknownVariantError {
                field: "coupon_type",
                value: other.to_owned(),
            }),
        }
    }
}

/// How a coupon is applied at checkout. Carried but not enforced.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CouponUsage {
    /// The customer enters the code.
    Manual,
    /// The coupon applies automatically.
    Auto,
    /// Any other stored usage string.
    Other(String),
}

impl CouponUsage {
    /// Map a stored string, keeping unknown values instead of failing.
    #[must_use]
    pub fn from_stored(raw: &str) -> Self {
        raw.parse().unwrap_or_else(|_| Self::Other(raw.to_owned()))
    }

    /// Wire representation.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Manual => "manual",
            Self::Auto => "auto",
            Self::Other(raw) => raw,
        }
    }
}

impl fmt::Display for CouponUsage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CouponUsage {
    type Err = UnknownVariantError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "manual" => Ok(Self::Manual),
            "auto" => Ok(Self::Auto),
            other => Err(UnknownVariantError {
                field: "usage",
                value: other.to_owned(),
            }),
        }
    }
}

/// Persisted coupon record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Coupon {
    /// Unique identifier.
    pub code: CouponCode,
    /// Display title.
    pub title: String,
    /// Free-form description.
    pub description: String,
    /// Interpretation of `value`.
    pub coupon_type: CouponType,
    /// Application mode.
    pub usage: CouponUsage,
    /// Fixed amount or percentage, depending on `coupon_type`.
    pub value: Decimal,
    /// Instant after which the coupon no longer applies.
    pub expires_at: DateTime<Utc>,
    /// Assigned by the store on creation.
    pub created_at: DateTime<Utc>,
    /// Refreshed by the store on every update.
    pub updated_at: DateTime<Utc>,
}

/// Rule violations for coupon input.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CouponInputError {
    /// `coupon_value` is zero or negative.
    #[error("coupon_value must be greater than zero")]
    NonPositiveValue,
    /// `coupon_value` does not fit the storage column.
    #[error("coupon_value must be less than 100000000")]
    ValueOutOfRange,
    /// `coupon_type` is not one of the supported kinds.
    #[error("coupon_type must be one of fixed, percentage")]
    UnsupportedType,
    /// `usage` is not one of the supported modes.
    #[error("usage must be one of manual, auto")]
    UnsupportedUsage,
}

impl CouponInputError {
    /// Wire name of the offending field.
    #[must_use]
    pub const fn field(&self) -> &'static str {
        match self {
            Self::NonPositiveValue | Self::ValueOutOfRange => "coupon_value",
            Self::UnsupportedType => "coupon_type",
            Self::UnsupportedUsage => "usage",
        }
    }
}

impl From<CouponInputError> for Error {
    fn from(err: CouponInputError) -> Self {
        Self::invalid_request(err.to_string()).with_details(json!({ "field": err.field() }))
    }
}

fn check_value(value: Decimal) -> Result<Decimal, CouponInputError> {
    let rounded = round_money(value);
    if rounded <= Decimal::ZERO {
        return Err(CouponInputError::NonPositiveValue);
    }
    if rounded > MAX_MONEY {
        return Err(CouponInputError::ValueOutOfRange);
    }
    Ok(rounded)
}

const fn check_type(coupon_type: &CouponType) -> Result<(), CouponInputError> {
    match coupon_type {
        CouponType::Unsupported(_) => Err(CouponInputError::UnsupportedType),
        CouponType::Fixed | CouponType::Percentage => Ok(()),
    }
}

const fn check_usage(usage: &CouponUsage) -> Result<(), CouponInputError> {
    match usage {
        CouponUsage::Other(_) => Err(CouponInputError::UnsupportedUsage),
        CouponUsage::Manual | CouponUsage::Auto => Ok(()),
    }
}

/// Caller-supplied attributes of a coupon.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CouponDetails {
    /// Display title.
    pub title: String,
    /// Free-form description.
    pub description: String,
    /// Interpretation of `value`.
    pub coupon_type: CouponType,
    /// Application mode.
    pub usage: CouponUsage,
    /// Fixed amount or percentage.
    pub value: Decimal,
    /// Expiry instant.
    pub expires_at: DateTime<Utc>,
}

/// Validated request to create a coupon.
///
/// # Examples
/// ```
/// use chrono::{TimeZone, Utc};
/// use coupon_backend::domain::{CouponCode, CouponDetails, CouponType, CouponUsage, NewCoupon};
/// use rust_decimal::Decimal;
///
/// let details = CouponDetails {
///     title: "Spring sale".to_owned(),
///     description: "10 off".to_owned(),
///     coupon_type: CouponType::Fixed,
///     usage: CouponUsage::Manual,
///     value: Decimal::new(1000, 2),
///     expires_at: Utc.with_ymd_and_hms(2030, 1, 1, 0, 0, 0).unwrap(),
/// };
/// let code = CouponCode::new("SPRING").expect("valid code");
/// assert!(NewCoupon::try_new(code.clone(), details.clone()).is_ok());
///
/// let zero = CouponDetails { value: Decimal::ZERO, ..details };
/// assert!(NewCoupon::try_new(code, zero).is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCoupon {
    code: CouponCode,
    details: CouponDetails,
}

impl NewCoupon {
    /// Validate creation input.
    ///
    /// The value is rounded to two decimal places before checking.
    ///
    /// # Errors
    /// Returns [`CouponInputError`] when the value is not strictly positive or
    /// too large, or when the type or usage is unsupported.
    pub fn try_new(code: CouponCode, mut details: CouponDetails) -> Result<Self, CouponInputError> {
        details.value = check_value(details.value)?;
        check_type(&details.coupon_type)?;
        check_usage(&details.usage)?;
        Ok(Self { code, details })
    }

    /// Code the coupon will be stored under.
    #[must_use]
    pub const fn code(&self) -> &CouponCode {
        &self.code
    }

    /// Validated attributes.
    #[must_use]
    pub const fn details(&self) -> &CouponDetails {
        &self.details
    }

    /// Materialise the record with store-assigned timestamps.
    #[must_use]
    pub fn into_coupon(self, now: DateTime<Utc>) -> Coupon {
        let CouponDetails {
            title,
            description,
            coupon_type,
            usage,
            value,
            expires_at,
        } = self.details;
        Coupon {
            code: self.code,
            title,
            description,
            coupon_type,
            usage,
            value,
            expires_at,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Partial update; `None` leaves a field untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CouponPatch {
    /// Replacement title.
    pub title: Option<String>,
    /// Replacement description.
    pub description: Option<String>,
    /// Replacement type.
    pub coupon_type: Option<CouponType>,
    /// Replacement usage.
    pub usage: Option<CouponUsage>,
    /// Replacement value.
    pub value: Option<Decimal>,
    /// Replacement expiry.
    pub expires_at: Option<DateTime<Utc>>,
}

impl CouponPatch {
    /// Apply the same rules as creation to the supplied fields.
    ///
    /// # Errors
    /// Returns [`CouponInputError`] for the first invalid supplied field.
    pub fn validate(mut self) -> Result<Self, CouponInputError> {
        if let Some(value) = self.value {
            self.value = Some(check_value(value)?);
        }
        if let Some(coupon_type) = &self.coupon_type {
            check_type(coupon_type)?;
        }
        if let Some(usage) = &self.usage {
            check_usage(usage)?;
        }
        Ok(self)
    }

    /// Write the supplied fields into `coupon` and stamp `updated_at`.
    pub fn apply_to(self, coupon: &mut Coupon, now: DateTime<Utc>) {
        if let Some(title) = self.title {
            coupon.title = title;
        }
        if let Some(description) = self.description {
            coupon.description = description;
        }
        if let Some(coupon_type) = self.coupon_type {
            coupon.coupon_type = coupon_type;
        }
        if let Some(usage) = self.usage {
            coupon.usage = usage;
        }
        if let Some(value) = self.value {
            coupon.value = value;
        }
        if let Some(expires_at) = self.expires_at {
            coupon.expires_at = expires_at;
        }
        coupon.updated_at = now.max(coupon.created_at);
    }
}

/// One page of coupons plus the total number of matches.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CouponPage {
    /// Coupons on this page, ordered by code.
    pub coupons: Vec<Coupon>,
    /// Matches before paging was applied.
    pub total: u64,
}

#[cfg(test)]
mod tests {
    //! Unit coverage for coupon value objects.
    use super::*;
    use chrono::TimeZone;
    use rstest::{fixture, rstest};
    use rust_decimal_macros::dec;

    #[fixture]
    fn details() -> CouponDetails {
        CouponDetails {
            title: "Launch".to_owned(),
            description: "Launch week".to_owned(),
            coupon_type: CouponType::Percentage,
            usage: CouponUsage::Auto,
            value: dec!(20),
            expires_at: Utc.with_ymd_and_hms(2030, 6, 1, 0, 0, 0).unwrap(),
        }
    }

    #[fixture]
    fn code() -> CouponCode {
        CouponCode::new("LAUNCH").expect("valid code")
    }

    #[rstest]
    #[case("", CouponCodeError::Empty)]
    #[case("   ", CouponCodeError::Empty)]
    #[case(" SAVE", CouponCodeError::SurroundingWhitespace)]
    #[case("SAVE\n", CouponCodeError::SurroundingWhitespace)]
    fn coupon_code_rejects_invalid_values(#[case] raw: &str, #[case] expected: CouponCodeError) {
        assert_eq!(CouponCode::new(raw), Err(expected));
    }

    #[rstest]
    #[case("fixed", CouponType::Fixed)]
    #[case("percentage", CouponType::Percentage)]
    #[case("bogo", CouponType::Unsupported("bogo".to_owned()))]
    fn coupon_type_from_stored_keeps_unknown_values(#[case] raw: &str, #[case] expected: CouponType) {
        let parsed = CouponType::from_stored(raw);
        assert_eq!(parsed.as_str(), raw);
        assert_eq!(parsed, expected);
    }

    #[rstest]
    fn coupon_usage_rejects_unknown_strings() {
        let err = "sometimes".parse::<CouponUsage>().expect_err("unknown usage");
        assert_eq!(err.field, "usage");
    }

    #[rstest]
    #[case(dec!(0), CouponInputError::NonPositiveValue)]
    #[case(dec!(-5), CouponInputError::NonPositiveValue)]
    #[case(dec!(0.004), CouponInputError::NonPositiveValue)]
    #[case(dec!(100000000), CouponInputError::ValueOutOfRange)]
    fn new_coupon_rejects_bad_values(
        code: CouponCode,
        details: CouponDetails,
        #[case] value: Decimal,
        #[case] expected: CouponInputError,
    ) {
        let priced = CouponDetails { value, ..details };
        assert_eq!(NewCoupon::try_new(code, priced), Err(expected));
    }

    #[rstest]
    fn new_coupon_rejects_unsupported_type(code: CouponCode, details: CouponDetails) {
        let bogo = CouponDetails {
            coupon_type: CouponType::Unsupported("bogo".to_owned()),
            ..details
        };
        let err = NewCoupon::try_new(code, bogo).expect_err("unsupported type");
        assert_eq!(err.field(), "coupon_type");
    }

    #[rstest]
    fn new_coupon_rounds_value_to_cents(code: CouponCode, details: CouponDetails) {
        let fractional = CouponDetails {
            value: dec!(12.345),
            ..details
        };
        let coupon = NewCoupon::try_new(code, fractional).expect("valid coupon");
        assert_eq!(coupon.details().value, dec!(12.35));
    }

    #[rstest]
    fn into_coupon_stamps_both_timestamps(code: CouponCode, details: CouponDetails) {
        let now = Utc.with_ymd_and_hms(2025, 1, 1, 12, 0, 0).unwrap();
        let coupon = NewCoupon::try_new(code, details)
            .expect("valid coupon")
            .into_coupon(now);
        assert_eq!(coupon.created_at, now);
        assert_eq!(coupon.updated_at, now);
    }

    #[rstest]
    fn patch_only_touches_supplied_fields(code: CouponCode, details: CouponDetails) {
        let created = Utc.with_ymd_and_hms(2025, 1, 1, 12, 0, 0).unwrap();
        let mut coupon = NewCoupon::try_new(code, details)
            .expect("valid coupon")
            .into_coupon(created);
        let original = coupon.clone();
        let later = created + chrono::Duration::hours(1);

        CouponPatch {
            title: Some("Renamed".to_owned()),
            value: Some(dec!(15)),
            ..CouponPatch::default()
        }
        .apply_to(&mut coupon, later);

        assert_eq!(coupon.title, "Renamed");
        assert_eq!(coupon.value, dec!(15));
        assert_eq!(coupon.description, original.description);
        assert_eq!(coupon.coupon_type, original.coupon_type);
        assert_eq!(coupon.created_at, created);
        assert_eq!(coupon.updated_at, later);
    }

    #[rstest]
    fn patch_validation_rejects_zero_value() {
        let patch = CouponPatch {
            value: Some(Decimal::ZERO),
            ..CouponPatch::default()
        };
        assert_eq!(patch.validate(), Err(CouponInputError::NonPositiveValue));
    }
}
