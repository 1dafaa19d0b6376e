use bigdecimal::{BigDecimal, Zero};
use log::info;
use uuid::Uuid;

use crate::domain::catalog::{NewCoupon, NewShop, Shop};
use crate::domain::errors::DomainError;
use crate::domain::money::check_amount;
use crate::domain::ports::CatalogRepository;

pub struct CatalogService<C> {
    repo: C,
}

impl<C: CatalogRepository> CatalogService<C> {
    pub fn new(repo: C) -> Self {
        Self { repo }
    }

    pub fn create_shop(&self, shop: &NewShop) -> Result<Uuid, DomainError> {
        shop.validate()?;
        let id = self.repo.create_shop(shop)?;
        if shop.is_default {
            info!("shop {} created as the default shop", id);
        }
        Ok(id)
    }

    pub fn get_shop(&self, id: Uuid) -> Result<Option<Shop>, DomainError> {
        self.repo.find_shop(id)
    }

    pub fn set_default_shop(&self, id: Uuid) -> Result<(), DomainError> {
        self.repo.set_default_shop(id)?;
        info!("shop {} is now the default shop", id);
        Ok(())
    }

    pub fn create_coupon(&self, coupon: &NewCoupon) -> Result<Uuid, DomainError> {
        let coupon = NewCoupon {
            code: coupon.code.trim().to_string(),
            ..coupon.clone()
        };
        coupon.validate()?;
        self.repo.create_coupon(&coupon)
    }

    pub fn get_service_fee(&self) -> Result<Option<BigDecimal>, DomainError> {
        self.repo.service_fee()
    }

    pub fn set_service_fee(&self, fee: &BigDecimal) -> Result<(), DomainError> {
        if fee < &BigDecimal::zero() {
            return Err(DomainError::invalid("service fee must not be negative"));
        }
        check_amount("service fee", fee)?;
        self.repo.set_service_fee(fee)?;
        info!("service fee set to {}", fee);
        Ok(())
    }
}
