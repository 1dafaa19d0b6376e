use diesel::prelude::*;
use uuid::Uuid;

use crate::db::DbPool;
use crate::domain::errors::DomainError;
use crate::domain::geo::{BoundingBox, DeliveryPoint, NewDeliveryPoint};
use crate::domain::ports::DeliveryPointRepository;
use crate::schema::delivery_points;

use super::models::{DeliveryPointRow, NewDeliveryPointRow};

#[derive(Clone)]
pub struct DieselDeliveryPointRepository {
    pool: DbPool,
}

impl DieselDeliveryPointRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

impl DeliveryPointRepository for DieselDeliveryPointRepository {
    fn create(&self, point: &NewDeliveryPoint) -> Result<Uuid, DomainError> {
        let mut conn = self.pool.get()?;

        let id = Uuid::new_v4();
        diesel::insert_into(delivery_points::table)
            .values(&NewDeliveryPointRow {
                id,
                name: point.name.clone(),
                latitude: point.latitude,
                longitude: point.longitude,
                active: point.active,
                address: point.address.clone(),
                image: point.image.clone(),
            })
            .execute(&mut conn)?;
        Ok(id)
    }

    fn set_active(&self, id: Uuid, active: bool) -> Result<(), DomainError> {
        let mut conn = self.pool.get()?;

        let updated = diesel::update(delivery_points::table.filter(delivery_points::id.eq(id)))
            .set(delivery_points::active.eq(active))
            .execute(&mut conn)?;
        if updated == 0 {
            return Err(DomainError::NotFound("Delivery point"));
        }
        Ok(())
    }

    fn active_within(&self, bbox: &BoundingBox) -> Result<Vec<DeliveryPoint>, DomainError> {
        let mut conn = self.pool.get()?;

        let rows = delivery_points::table
            .filter(delivery_points::active.eq(true))
            .filter(delivery_points::latitude.between(bbox.min_lat, bbox.max_lat))
            .filter(delivery_points::longitude.between(bbox.min_lon, bbox.max_lon))
            .select(DeliveryPointRow::as_select())
            .load(&mut conn)?;

        Ok(rows.into_iter().map(DeliveryPoint::from).collect())
    }
}
