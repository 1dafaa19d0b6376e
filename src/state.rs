use bigdecimal::BigDecimal;

use crate::application::catalog_service::CatalogService;
use crate::application::order_service::OrderService;
use crate::application::proximity_service::ProximityService;
use crate::db::DbPool;
use crate::infrastructure::catalog_repo::DieselCatalogRepository;
use crate::infrastructure::delivery_point_repo::DieselDeliveryPointRepository;
use crate::infrastructure::order_repo::DieselOrderRepository;

/// Services shared by every actix worker.
pub struct AppState {
    pub orders: OrderService<DieselOrderRepository, DieselCatalogRepository>,
    pub catalog: CatalogService<DieselCatalogRepository>,
    pub proximity: ProximityService<DieselDeliveryPointRepository>,
}

impl AppState {
    pub fn new(pool: DbPool, default_service_fee: Option<BigDecimal>) -> Self {
        let catalog_repo = DieselCatalogRepository::new(pool.clone());
        Self {
            orders: OrderService::new(
                DieselOrderRepository::new(pool.clone()),
                catalog_repo.clone(),
                default_service_fee,
            ),
            catalog: CatalogService::new(catalog_repo),
            proximity: ProximityService::new(DieselDeliveryPointRepository::new(pool)),
        }
    }
}
