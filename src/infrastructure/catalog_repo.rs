use bigdecimal::BigDecimal;
use chrono::Utc;
use diesel::prelude::*;
use uuid::Uuid;

use crate::db::DbPool;
use crate::domain::catalog::{Coupon, NewCoupon, NewShop, Shop};
use crate::domain::errors::DomainError;
use crate::domain::ports::{CatalogRepository, PricingSource};
use crate::schema::{coupons, platform_settings, shops};

use super::models::{CouponRow, NewCouponRow, NewShopRow, PlatformSettingsRow, ShopRow};

/// `platform_settings` holds a single row.
const SETTINGS_ROW_ID: i16 = 1;

#[derive(Clone)]
pub struct DieselCatalogRepository {
    pool: DbPool,
}

impl DieselCatalogRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn clear_default_flags(conn: &mut PgConnection, keep: Option<Uuid>) -> QueryResult<usize> {
    let flagged = shops::table.filter(shops::is_default.eq(true));
    match keep {
        Some(id) => diesel::update(flagged.filter(shops::id.ne(id)))
            .set(shops::is_default.eq(false))
            .execute(conn),
        None => diesel::update(flagged)
            .set(shops::is_default.eq(false))
            .execute(conn),
    }
}

impl PricingSource for DieselCatalogRepository {
    fn find_shop(&self, id: Uuid) -> Result<Option<Shop>, DomainError> {
        let mut conn = self.pool.get()?;

        let row = shops::table
            .filter(shops::id.eq(id))
            .select(ShopRow::as_select())
            .first(&mut conn)
            .optional()?;

        Ok(row.map(Shop::from))
    }

    fn find_coupon(&self, code: &str) -> Result<Option<Coupon>, DomainError> {
        let mut conn = self.pool.get()?;

        let row = coupons::table
            .filter(coupons::code.eq(code))
            .select(CouponRow::as_select())
            .first(&mut conn)
            .optional()?;

        row.map(Coupon::try_from).transpose()
    }

    fn service_fee(&self) -> Result<Option<BigDecimal>, DomainError> {
        let mut conn = self.pool.get()?;

        let fee: Option<Option<BigDecimal>> = platform_settings::table
            .filter(platform_settings::id.eq(SETTINGS_ROW_ID))
            .select(platform_settings::service_fee)
            .first(&mut conn)
            .optional()?;

        Ok(fee.flatten())
    }
}

impl CatalogRepository for DieselCatalogRepository {
    fn create_shop(&self, shop: &NewShop) -> Result<Uuid, DomainError> {
        let mut conn = self.pool.get()?;

        conn.transaction::<_, DomainError, _>(|conn| {
            if shop.is_default {
                clear_default_flags(conn, None)?;
            }

            let id = Uuid::new_v4();
            diesel::insert_into(shops::table)
                .values(&NewShopRow {
                    id,
                    name: shop.name.clone(),
                    tax_pct: shop.tax_pct.clone(),
                    commission_pct: shop.commission_pct.clone(),
                    is_default: shop.is_default,
                })
                .execute(conn)?;
            Ok(id)
        })
    }

    fn set_default_shop(&self, id: Uuid) -> Result<(), DomainError> {
        let mut conn = self.pool.get()?;

        conn.transaction::<_, DomainError, _>(|conn| {
            // Clear first: the partial unique index rejects two flagged rows.
            clear_default_flags(conn, Some(id))?;

            let updated = diesel::update(shops::table.filter(shops::id.eq(id)))
                .set(shops::is_default.eq(true))
                .execute(conn)?;
            if updated == 0 {
                return Err(DomainError::NotFound("Shop"));
            }
            Ok(())
        })
    }

    fn create_coupon(&self, coupon: &NewCoupon) -> Result<Uuid, DomainError> {
        let mut conn = self.pool.get()?;

        let id = Uuid::new_v4();
        diesel::insert_into(coupons::table)
            .values(&NewCouponRow {
                id,
                code: coupon.code.clone(),
                discount_type: coupon.discount_type.as_str().to_string(),
                discount: coupon.discount.clone(),
            })
            .execute(&mut conn)?;
        Ok(id)
    }

    fn set_service_fee(&self, fee: &BigDecimal) -> Result<(), DomainError> {
        let mut conn = self.pool.get()?;

        let now = Utc::now();
        diesel::insert_into(platform_settings::table)
            .values(&PlatformSettingsRow {
                id: SETTINGS_ROW_ID,
                service_fee: Some(fee.clone()),
                updated_at: now,
            })
            .on_conflict(platform_settings::id)
            .do_update()
            .set((
                platform_settings::service_fee.eq(fee),
                platform_settings::updated_at.eq(now),
            ))
            .execute(&mut conn)?;
        Ok(())
    }
}
