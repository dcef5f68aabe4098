//! PostgreSQL-backed `CouponRepository` implementation using Diesel ORM.
//!
//! The table is the source of truth for coupons. `created_at` and
//! `updated_at` come from column defaults; updates stamp `updated_at` with the
//! database clock.

use async_trait::async_trait;
use diesel::dsl::count_star;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use pagination::PageParams;
use tracing::debug;

use crate::domain::ports::{CouponRepository, CouponRepositoryError};
use crate::domain::{Coupon, CouponCode, CouponPage, CouponPatch, NewCoupon};

use super::models::{CouponChangeset, CouponRow, NewCouponRow};
use super::pool::{DbPool, PoolError};
use super::schema::coupons;

/// Diesel-backed implementation of the `CouponRepository` port.
#[derive(Clone)]
pub struct DieselCouponRepository {
    pool: DbPool,
}

impl DieselCouponRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

/// Map pool errors to domain coupon repository errors.
fn map_pool_error(error: PoolError) -> CouponRepositoryError {
    match error {
        PoolError::Checkout { message } | PoolError::Build { message } => {
            CouponRepositoryError::connection(message)
        }
    }
}

/// Map Diesel errors to domain coupon repository errors.
fn map_diesel_error(error: diesel::result::Error) -> CouponRepositoryError {
    use diesel::result::{DatabaseErrorKind, Error as DieselError};

    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
        }
        _ => debug!(
            error_type = %std::any::type_name_of_val(&error),
            "diesel operation failed"
        ),
    }

    match error {
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            CouponRepositoryError::connection("database connection error")
        }
        DieselError::QueryBuilderError(_) => CouponRepositoryError::query("database query error"),
        _ => CouponRepositoryError::query("database error"),
    }
}

/// Map an insert failure, recognising duplicate codes.
fn map_insert_error(error: diesel::result::Error, code: &CouponCode) -> CouponRepositoryError {
    use diesel::result::{DatabaseErrorKind, Error as DieselError};

    match error {
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
            CouponRepositoryError::duplicate(code.as_str())
        }
        other => map_diesel_error(other),
    }
}

fn row_to_coupon(row: CouponRow) -> Result<Coupon, CouponRepositoryError> {
    row.into_coupon().map_err(CouponRepositoryError::query)
}

/// Build a `LIKE` pattern matching `term` anywhere, with wildcards escaped.
fn contains_pattern(term: &str) -> String {
    let mut pattern = String::with_capacity(term.len() + 2);
    pattern.push('%');
    for ch in term.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(ch);
    }
    pattern.push('%');
    pattern
}

fn to_sql_count(value: u64, name: &str) -> Result<i64, CouponRepositoryError> {
    i64::try_from(value).map_err(|_| CouponRepositoryError::query(format!("{name} is out of range")))
}

impl DieselCouponRepository {
    /// Count and load one page, optionally restricted to codes matching
    /// `pattern`.
    async fn page(
        &self,
        pattern: Option<String>,
        page: PageParams,
    ) -> Result<CouponPage, CouponRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let mut count_query = coupons::table.select(count_star()).into_boxed();
        if let Some(like) = &pattern {
            count_query = count_query.filter(coupons::coupon_code.like(like.clone()));
        }
        let total: i64 = count_query
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        let mut rows_query = coupons::table
            .select(CouponRow::as_select())
            .order(coupons::coupon_code.asc())
            .offset(to_sql_count(page.offset(), "offset")?)
            .into_boxed();
        if let Some(like) = pattern {
            rows_query = rows_query.filter(coupons::coupon_code.like(like));
        }
        if let Some(limit) = page.limit() {
            rows_query = rows_query.limit(to_sql_count(limit, "limit")?);
        }
        let rows: Vec<CouponRow> = rows_query.load(&mut conn).await.map_err(map_diesel_error)?;

        let coupons = rows
            .into_iter()
            .map(row_to_coupon)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(CouponPage {
            coupons,
            total: u64::try_from(total).unwrap_or_default(),
        })
    }
}

#[async_trait]
impl CouponRepository for DieselCouponRepository {
    async fn create(&self, coupon: &NewCoupon) -> Result<Coupon, CouponRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: CouponRow = diesel::insert_into(coupons::table)
            .values(NewCouponRow::from(coupon))
            .returning(CouponRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(|err| map_insert_error(err, coupon.code()))?;

        row_to_coupon(row)
    }

    async fn find_by_code(
        &self,
        code: &CouponCode,
    ) -> Result<Option<Coupon>, CouponRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<CouponRow> = coupons::table
            .filter(coupons::coupon_code.eq(code.as_str()))
            .select(CouponRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(row_to_coupon).transpose()
    }

    async fn update(
        &self,
        code: &CouponCode,
        patch: &CouponPatch,
    ) -> Result<Coupon, CouponRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let changeset = CouponChangeset::from(patch);
        let row: Option<CouponRow> =
            diesel::update(coupons::table.filter(coupons::coupon_code.eq(code.as_str())))
                .set((changeset, coupons::updated_at.eq(diesel::dsl::now)))
                .returning(CouponRow::as_returning())
                .get_result(&mut conn)
                .await
                .optional()
                .map_err(map_diesel_error)?;

        match row {
            Some(row) => row_to_coupon(row),
            None => Err(CouponRepositoryError::not_found(code.as_str())),
        }
    }

    async fn delete(&self, code: &CouponCode) -> Result<(), CouponRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let deleted = diesel::delete(coupons::table.filter(coupons::coupon_code.eq(code.as_str())))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        if deleted == 0 {
            return Err(CouponRepositoryError::not_found(code.as_str()));
        }
        Ok(())
    }

    async fn list(&self, page: PageParams) -> Result<CouponPage, CouponRepositoryError> {
        self.page(None, page).await
    }

    async fn search(
        &self,
        term: &str,
        page: PageParams,
    ) -> Result<CouponPage, CouponRepositoryError> {
        self.page(Some(contains_pattern(term)), page).await
    }
}
