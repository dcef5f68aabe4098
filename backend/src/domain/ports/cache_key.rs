//! Cache key for coupon hashes.

use crate::domain::CouponCode;

const PREFIX: &str = "coupon:";

/// Key under which a coupon's field hash is cached: `coupon:<code>`.
///
/// Built from a validated [`CouponCode`], so construction cannot fail.
///
/// # Examples
/// ```
/// use coupon_backend::domain::CouponCode;
/// use coupon_backend::domain::ports::CouponCacheKey;
///
/// let code = CouponCode::new("SAVE10").expect("valid code");
/// assert_eq!(CouponCacheKey::for_code(&code).as_str(), "coupon:SAVE10");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CouponCacheKey(String);

impl CouponCacheKey {
    /// Key for the coupon identified by `code`.
    #[must_use]
    pub fn for_code(code: &CouponCode) -> Self {
        Self(format!("{PREFIX}{code}"))
    }

    /// Borrow the key as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for CouponCacheKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl AsRef<str> for CouponCacheKey {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}
