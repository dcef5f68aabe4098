//! Offset/limit pagination primitives shared by list endpoints.
//!
//! Query strings arrive as raw text. [`PageParams::parse`] turns the optional
//! `offset` and `limit` values into validated parameters, and [`Paging`] is the
//! envelope echoed back to clients alongside a page of results.
//!
//! An absent or blank value means "not supplied": the offset defaults to zero
//! and the limit to unbounded.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Validation failures raised while parsing paging parameters.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PageParamsError {
    /// The offset is not an integer.
    #[error("offset must be an integer, got {value:?}")]
    InvalidOffset {
        /// Raw value supplied by the caller.
        value: String,
    },
    /// The offset is below zero.
    #[error("Offset cannot be negative")]
    NegativeOffset,
    /// The limit is not an integer.
    #[error("limit must be an integer, got {value:?}")]
    InvalidLimit {
        /// Raw value supplied by the caller.
        value: String,
    },
    /// The limit is zero or negative.
    #[error("Limit must be greater than zero")]
    NonPositiveLimit,
}

impl PageParamsError {
    /// Name of the query parameter that failed validation.
    #[must_use]
    pub const fn field(&self) -> &'static str {
        match self {
            Self::InvalidOffset { .. } | Self::NegativeOffset => "offset",
            Self::InvalidLimit { .. } | Self::NonPositiveLimit => "limit",
        }
    }
}

/// Validated offset/limit pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PageParams {
    offset: u64,
    limit: Option<u64>,
}

impl PageParams {
    /// Build parameters from already-validated values.
    ///
    /// # Errors
    /// Returns [`PageParamsError::NonPositiveLimit`] when `limit` is `Some(0)`.
    pub const fn new(offset: u64, limit: Option<u64>) -> Result<Self, PageParamsError> {
        if let Some(0) = limit {
            return Err(PageParamsError::NonPositiveLimit);
        }
        Ok(Self { offset, limit })
    }

    /// Parse raw query-string values.
    ///
    /// # Examples
    /// ```
    /// use pagination::PageParams;
    ///
    /// let params = PageParams::parse(Some("20"), Some("10")).expect("valid params");
    /// assert_eq!(params.offset(), 20);
    /// assert_eq!(params.limit(), Some(10));
    ///
    /// let defaults = PageParams::parse(None, Some("")).expect("blank values are ignored");
    /// assert_eq!(defaults.offset(), 0);
    /// assert_eq!(defaults.limit(), None);
    /// ```
    ///
    /// # Errors
    /// Returns a [`PageParamsError`] when either value is not an integer, the
    /// offset is negative, or the limit is not strictly positive.
    pub fn parse(offset: Option<&str>, limit: Option<&str>) -> Result<Self, PageParamsError> {
        let parsed_offset = match supplied(offset) {
            None => 0,
            Some(raw) => {
                let value: i64 = raw
                    .parse()
                    .map_err(|_| PageParamsError::InvalidOffset {
                        value: raw.to_owned(),
                    })?;
                u64::try_from(value).map_err(|_| PageParamsError::NegativeOffset)?
            }
        };

        let parsed_limit = match supplied(limit) {
            None => None,
            Some(raw) => {
                let value: i64 = raw.parse().map_err(|_| PageParamsError::InvalidLimit {
                    value: raw.to_owned(),
                })?;
                if value <= 0 {
                    return Err(PageParamsError::NonPositiveLimit);
                }
                Some(value.unsigned_abs())
            }
        };

        Ok(Self {
            offset: parsed_offset,
            limit: parsed_limit,
        })
    }

    /// Number of records to skip.
    #[must_use]
    pub const fn offset(&self) -> u64 {
        self.offset
    }

    /// Maximum number of records to return; `None` means unbounded.
    #[must_use]
    pub const fn limit(&self) -> Option<u64> {
        self.limit
    }

    /// Apply these parameters to an in-memory sequence.
    ///
    /// # Examples
    /// ```
    /// use pagination::PageParams;
    ///
    /// let params = PageParams::new(1, Some(2)).expect("valid params");
    /// let page: Vec<_> = params.apply(["a", "b", "c", "d"]).collect();
    /// assert_eq!(page, ["b", "c"]);
    /// ```
    pub fn apply<I>(&self, items: I) -> impl Iterator<Item = I::Item>
    where
        I: IntoIterator,
    {
        let skip = usize::try_from(self.offset).unwrap_or(usize::MAX);
        let take = self
            .limit
            .map_or(usize::MAX, |limit| usize::try_from(limit).unwrap_or(usize::MAX));
        items.into_iter().skip(skip).take(take)
    }
}

fn supplied(raw: Option<&str>) -> Option<&str> {
    raw.map(str::trim).filter(|value| !value.is_empty())
}

/// Paging envelope returned with list responses.
///
/// `limit` is reported as zero when the caller did not supply one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Paging {
    /// Total number of records matching the query before paging.
    pub total: u64,
    /// Limit applied to the query.
    pub limit: u64,
    /// Offset applied to the query.
    pub offset: u64,
}

impl Paging {
    /// Describe a page produced with `params` out of `total` records.
    #[must_use]
    pub fn new(total: u64, params: &PageParams) -> Self {
        Self {
            total,
            limit: params.limit.unwrap_or_default(),
            offset: params.offset,
        }
    }
}

#[cfg(test)]
mod tests {
    //! Unit coverage for paging parameter parsing.
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(None, None, 0, None)]
    #[case(Some(""), Some("  "), 0, None)]
    #[case(Some("0"), Some("1"), 0, Some(1))]
    #[case(Some("15"), Some("5"), 15, Some(5))]
    fn parse_accepts_valid_values(
        #[case] offset: Option<&str>,
        #[case] limit: Option<&str>,
        #[case] expected_offset: u64,
        #[case] expected_limit: Option<u64>,
    ) {
        let params = PageParams::parse(offset, limit).expect("valid params");
        assert_eq!(params.offset(), expected_offset);
        assert_eq!(params.limit(), expected_limit);
    }

    #[rstest]
    #[case(Some("-1"), None, PageParamsError::NegativeOffset)]
    #[case(None, Some("0"), PageParamsError::NonPositiveLimit)]
    #[case(None, Some("-4"), PageParamsError::NonPositiveLimit)]
    #[case(Some("ten"), None, PageParamsError::InvalidOffset { value: "ten".to_owned() })]
    #[case(None, Some("1.5"), PageParamsError::InvalidLimit { value: "1.5".to_owned() })]
    fn parse_rejects_invalid_values(
        #[case] offset: Option<&str>,
        #[case] limit: Option<&str>,
        #[case] expected: PageParamsError,
    ) {
        let err = PageParams::parse(offset, limit).expect_err("invalid params");
        assert_eq!(err, expected);
    }

    #[rstest]
    fn error_reports_offending_field() {
        assert_eq!(PageParamsError::NegativeOffset.field(), "offset");
        assert_eq!(PageParamsError::NonPositiveLimit.field(), "limit");
    }

    #[rstest]
    fn new_rejects_zero_limit() {
        assert_eq!(
            PageParams::new(0, Some(0)),
            Err(PageParamsError::NonPositiveLimit)
        );
    }

    #[rstest]
    fn apply_without_limit_returns_tail() {
        let params = PageParams::new(2, None).expect("valid params");
        let page: Vec<_> = params.apply(1..=5).collect();
        assert_eq!(page, vec![3, 4, 5]);
    }

    #[rstest]
    fn paging_reports_zero_limit_when_unbounded() {
        let params = PageParams::new(3, None).expect("valid params");
        let paging = Paging::new(42, &params);
        assert_eq!(
            serde_json::to_value(paging).expect("serialise paging"),
            serde_json::json!({ "total": 42, "limit": 0, "offset": 3 })
        );
    }
}
