use log::debug;
use uuid::Uuid;

use crate::domain::errors::DomainError;
use crate::domain::geo::{find_nearest, BoundingBox, NearbyPoint, NewDeliveryPoint, ProximityQuery};
use crate::domain::ports::DeliveryPointRepository;

pub struct ProximityService<D> {
    repo: D,
}

impl<D: DeliveryPointRepository> ProximityService<D> {
    pub fn new(repo: D) -> Self {
        Self { repo }
    }

    pub fn create_delivery_point(&self, point: &NewDeliveryPoint) -> Result<Uuid, DomainError> {
        point.validate()?;
        self.repo.create(point)
    }

    pub fn set_active(&self, id: Uuid, active: bool) -> Result<(), DomainError> {
        self.repo.set_active(id, active)
    }

    pub fn find_nearest(&self, query: &ProximityQuery) -> Result<Vec<NearbyPoint>, DomainError> {
        let bbox = BoundingBox::around(query);
        let candidates = self.repo.active_within(&bbox)?;
        debug!(
            "{} candidate delivery points inside {:?}",
            candidates.len(),
            bbox
        );
        Ok(find_nearest(candidates, query))
    }
}
