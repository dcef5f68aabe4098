//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match `backend/migrations` exactly; regenerate with
//! `diesel print-schema` when a migration changes the table.

diesel::table! {
    /// Coupon records keyed by their user-supplied code.
    coupons (coupon_code) {
        /// Primary key: the coupon code.
        coupon_code -> Varchar,
        title -> Varchar,
        description -> Text,
        /// `fixed` or `percentage`.
        coupon_type -> Varchar,
        /// `manual` or `auto`.
        usage -> Varchar,
        /// `NUMERIC(10,2)`.
        coupon_value -> Numeric,
        expired_at -> Timestamptz,
        created_at -> Timestamptz,
        /// Refreshed by every update.
        updated_at -> Timestamptz,
    }
}
