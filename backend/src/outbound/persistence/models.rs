//! Internal Diesel row structs for the `coupons` table.
//!
//! These types never leave the persistence layer.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use rust_decimal::Decimal;

use crate::domain::{Coupon, CouponCode, CouponPatch, CouponType, CouponUsage, NewCoupon};

use super::schema::coupons;

/// Row struct for reading from the coupons table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = coupons)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct CouponRow {
    pub coupon_code: String,
    pub title: String,
    pub description: String,
    pub coupon_type: String,
    pub usage: String,
    pub coupon_value: Decimal,
    pub expired_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl CouponRow {
    /// Convert to the domain entity.
    ///
    /// Unknown type or usage strings are carried through; only an invalid
    /// code is rejected.
    pub fn into_coupon(self) -> Result<Coupon, String> {
        let code = CouponCode::new(self.coupon_code)
            .map_err(|err| format!("stored coupon code is invalid: {err}"))?;
        Ok(Coupon {
            code,
            title: self.title,
            description: self.description,
            coupon_type: CouponType::from_stored(&self.coupon_type),
            usage: CouponUsage::from_stored(&self.usage),
            value: self.coupon_value,
            expires_at: self.expired_at,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

/// Insertable struct for new coupons; timestamps come from column defaults.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = coupons)]
pub(crate) struct NewCouponRow<'a> {
    pub coupon_code: &'a str,
    pub title: &'a str,
    pub description: &'a str,
    pub coupon_type: &'a str,
    pub usage: &'a str,
    pub coupon_value: Decimal,
    pub expired_at: DateTime<Utc>,
}

impl<'a> From<&'a NewCoupon> for NewCouponRow<'a> {
    fn from(coupon: &'a NewCoupon) -> Self {
        let details = coupon.details();
        Self {
            coupon_code: coupon.code().as_str(),
            title: &details.title,
            description: &details.description,
            coupon_type: details.coupon_type.as_str(),
            usage: details.usage.as_str(),
            coupon_value: details.value,
            expired_at: details.expires_at,
        }
    }
}

/// Changeset for partial updates; `None` fields are left untouched.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = coupons)]
pub(crate) struct CouponChangeset<'a> {
    pub title: Option<&'a str>,
    pub description: Option<&'a str>,
    pub coupon_type: Option<&'a str>,
    pub usage: Option<&'a str>,
    pub coupon_value: Option<Decimal>,
    pub expired_at: Option<DateTime<Utc>>,
}

impl<'a> From<&'a CouponPatch> for CouponChangeset<'a> {
    fn from(patch: &'a CouponPatch) -> Self {
        Self {
            title: patch.title.as_deref(),
            description: patch.description.as_deref(),
            coupon_type: patch.coupon_type.as_ref().map(CouponType::as_str),
            usage: patch.usage.as_ref().map(CouponUsage::as_str),
            coupon_value: patch.value,
            expired_at: patch.expires_at,
        }
    }
}
