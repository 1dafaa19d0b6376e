//! Nearest-delivery-point search.
//!
//! Distances use the haversine great-circle formula on a sphere of mean Earth
//! radius. Storage adapters narrow the candidate set with [`BoundingBox`]; the
//! ranking in [`find_nearest`] is what decides inclusion and order.

use std::cmp::Ordering;

use uuid::Uuid;

use super::catalog::MAX_NAME_LEN;
use super::errors::DomainError;

pub const EARTH_RADIUS_KM: f64 = 6371.0;
pub const DEFAULT_RADIUS_KM: f64 = 20.0;
pub const DEFAULT_LIMIT: usize = 20;
pub const MAX_LIMIT: usize = 100;

#[derive(Debug, Clone, PartialEq)]
pub struct DeliveryPoint {
    pub id: Uuid,
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub active: bool,
    pub address: Option<String>,
    pub image: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NewDeliveryPoint {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub active: bool,
    pub address: Option<String>,
    pub image: Option<String>,
}

impl NewDeliveryPoint {
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.name.trim().is_empty() {
            return Err(DomainError::invalid("delivery point name must not be empty"));
        }
        if self.name.chars().count() > MAX_NAME_LEN {
            return Err(DomainError::invalid(format!(
                "delivery point name must be at most {} characters",
                MAX_NAME_LEN
            )));
        }
        check_latitude(self.latitude)?;
        check_longitude(self.longitude)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NearbyPoint {
    pub point: DeliveryPoint,
    pub distance_km: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProximityQuery {
    pub latitude: f64,
    pub longitude: f64,
    pub radius_km: f64,
    pub limit: usize,
}

fn check_latitude(lat: f64) -> Result<(), DomainError> {
    if !(-90.0..=90.0).contains(&lat) {
        return Err(DomainError::invalid(format!(
            "latitude must be within [-90, 90], got {}",
            lat
        )));
    }
    Ok(())
}

fn check_longitude(lon: f64) -> Result<(), DomainError> {
    if !(-180.0..=180.0).contains(&lon) {
        return Err(DomainError::invalid(format!(
            "longitude must be within [-180, 180], got {}",
            lon
        )));
    }
    Ok(())
}

fn parse_finite(field: &str, raw: &str) -> Result<f64, DomainError> {
    match raw.trim().parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(DomainError::invalid(format!(
            "{} must be a finite number, got '{}'",
            field, raw
        ))),
    }
}

impl ProximityQuery {
    /// Build a query from raw request values. Latitude and longitude are
    /// required; radius and limit fall back to their defaults only when absent.
    pub fn parse(
        latitude: Option<&str>,
        longitude: Option<&str>,
        radius_km: Option<&str>,
        limit: Option<&str>,
    ) -> Result<Self, DomainError> {
        let latitude = latitude.ok_or_else(|| DomainError::invalid("latitude is required"))?;
        let longitude = longitude.ok_or_else(|| DomainError::invalid("longitude is required"))?;

        let latitude = parse_finite("latitude", latitude)?;
        let longitude = parse_finite("longitude", longitude)?;
        check_latitude(latitude)?;
        check_longitude(longitude)?;

        let radius_km = match radius_km {
            Some(raw) => parse_finite("radius", raw)?,
            None => DEFAULT_RADIUS_KM,
        };
        if radius_km < 0.0 {
            return Err(DomainError::invalid(format!(
                "radius must not be negative, got {}",
                radius_km
            )));
        }

        let limit = match limit {
            Some(raw) => match raw.trim().parse::<usize>() {
                Ok(n) if (1..=MAX_LIMIT).contains(&n) => n,
                _ => {
                    return Err(DomainError::invalid(format!(
                        "limit must be an integer between 1 and {}, got '{}'",
                        MAX_LIMIT, raw
                    )))
                }
            },
            None => DEFAULT_LIMIT,
        };

        Ok(Self {
            latitude,
            longitude,
            radius_km,
            limit,
        })
    }
}

pub fn haversine_km(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let d_lat = (lat2 - lat1).to_radians();
    let d_lon = (lon2 - lon1).to_radians();
    let a = (d_lat / 2.0).sin().powi(2)
        + lat1.to_radians().cos() * lat2.to_radians().cos() * (d_lon / 2.0).sin().powi(2);
    // Float noise can push `a` a hair above 1 for antipodal points.
    let c = 2.0 * a.clamp(0.0, 1.0).sqrt().asin();
    EARTH_RADIUS_KM * c
}

/// Latitude/longitude window containing every point within `radius_km` of the
/// centre. Spans all longitudes when the circle reaches a pole or crosses the
/// antimeridian.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lon: f64,
    pub max_lon: f64,
}

impl BoundingBox {
    const SLACK_DEG: f64 = 1e-9;

    pub fn around(query: &ProximityQuery) -> Self {
        let angular = query.radius_km / EARTH_RADIUS_KM;
        let lat_delta = angular.to_degrees();
        let min_lat = query.latitude - lat_delta - Self::SLACK_DEG;
        let max_lat = query.latitude + lat_delta + Self::SLACK_DEG;

        if min_lat <= -90.0 || max_lat >= 90.0 {
            return Self {
                min_lat: min_lat.max(-90.0),
                max_lat: max_lat.min(90.0),
                min_lon: -180.0,
                max_lon: 180.0,
            };
        }

        let ratio = angular.sin() / query.latitude.to_radians().cos();
        if angular >= std::f64::consts::FRAC_PI_2 || ratio >= 1.0 {
            return Self {
                min_lat,
                max_lat,
                min_lon: -180.0,
                max_lon: 180.0,
            };
        }

        let lon_delta = ratio.asin().to_degrees();
        let min_lon = query.longitude - lon_delta - Self::SLACK_DEG;
        let max_lon = query.longitude + lon_delta + Self::SLACK_DEG;
        if min_lon < -180.0 || max_lon > 180.0 {
            return Self {
                min_lat,
                max_lat,
                min_lon: -180.0,
                max_lon: 180.0,
            };
        }

        Self {
            min_lat,
            max_lat,
            min_lon,
            max_lon,
        }
    }

    pub fn contains(&self, lat: f64, lon: f64) -> bool {
        (self.min_lat..=self.max_lat).contains(&lat) && (self.min_lon..=self.max_lon).contains(&lon)
    }
}

/// Rank active points by distance from the query, dropping those beyond the
/// radius, nearest first, at most `query.limit` results.
pub fn find_nearest<I>(points: I, query: &ProximityQuery) -> Vec<NearbyPoint>
where
    I: IntoIterator<Item = DeliveryPoint>,
{
    let mut nearby: Vec<NearbyPoint> = points
        .into_iter()
        .filter(|p| p.active)
        .filter_map(|point| {
            let distance_km =
                haversine_km(query.latitude, query.longitude, point.latitude, point.longitude);
            (distance_km <= query.radius_km).then_some(NearbyPoint { point, distance_km })
        })
        .collect();

    nearby.sort_by(|a, b| {
        a.distance_km
            .partial_cmp(&b.distance_km)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.point.id.cmp(&b.point.id))
    });
    nearby.truncate(query.limit);
    nearby
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(lat: f64, lon: f64, active: bool) -> DeliveryPoint {
        DeliveryPoint {
            id: Uuid::new_v4(),
            name: format!("point {},{}", lat, lon),
            latitude: lat,
            longitude: lon,
            active,
            address: None,
            image: None,
        }
    }

    fn query(lat: f64, lon: f64, radius_km: f64, limit: usize) -> ProximityQuery {
        ProximityQuery {
            latitude: lat,
            longitude: lon,
            radius_km,
            limit,
        }
    }

    #[test]
    fn one_degree_of_longitude_on_the_equator() {
        let d = haversine_km(0.0, 0.0, 0.0, 1.0);
        assert!((d - 111.195).abs() < 0.01, "got {}", d);
    }

    #[test]
    fn distance_is_zero_for_the_same_point() {
        assert_eq!(haversine_km(48.85, 2.35, 48.85, 2.35), 0.0);
    }

    #[test]
    fn antipodal_points_are_half_the_circumference_apart() {
        let d = haversine_km(0.0, 0.0, 0.0, 180.0);
        assert!((d - std::f64::consts::PI * EARTH_RADIUS_KM).abs() < 1e-6);
    }

    #[test]
    fn results_are_ordered_and_radius_bounded() {
        let far = point(0.0, 5.0, true);
        let near = point(0.0, 1.0, true);
        let here = point(0.0, 0.0, true);
        let results = find_nearest(
            vec![far, near.clone(), here.clone()],
            &query(0.0, 0.0, 200.0, 20),
        );

        let ids: Vec<Uuid> = results.iter().map(|n| n.point.id).collect();
        assert_eq!(ids, vec![here.id, near.id]);
        assert_eq!(results[0].distance_km, 0.0);
        assert!(results[1].distance_km > 111.0 && results[1].distance_km < 112.0);
    }

    #[test]
    fn inactive_points_are_excluded_even_when_nearest() {
        let closed = point(0.0, 0.0, false);
        let open = point(0.0, 0.5, true);
        let results = find_nearest(vec![closed, open.clone()], &query(0.0, 0.0, 200.0, 20));

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].point.id, open.id);
    }

    #[test]
    fn limit_keeps_the_nearest() {
        let points: Vec<DeliveryPoint> = [0.4, 0.1, 0.3, 0.5, 0.2]
            .iter()
            .map(|lon| point(0.0, *lon, true))
            .collect();
        let results = find_nearest(points, &query(0.0, 0.0, 100.0, 2));

        assert_eq!(results.len(), 2);
        assert_eq!(results[0].point.longitude, 0.1);
        assert_eq!(results[1].point.longitude, 0.2);
        assert!(results[0].distance_km < results[1].distance_km);
    }

    #[test]
    fn nothing_within_radius_is_an_empty_result() {
        let results = find_nearest(vec![point(10.0, 10.0, true)], &query(0.0, 0.0, 5.0, 20));
        assert!(results.is_empty());
    }

    #[test]
    fn zero_radius_keeps_exact_matches() {
        let here = point(12.5, -3.25, true);
        let results = find_nearest(
            vec![here.clone(), point(12.5, -3.2, true)],
            &query(12.5, -3.25, 0.0, 20),
        );
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].point.id, here.id);
    }

    #[test]
    fn parse_applies_defaults() {
        let q = ProximityQuery::parse(Some("51.5"), Some("-0.12"), None, None).expect("valid");
        assert_eq!(q.latitude, 51.5);
        assert_eq!(q.longitude, -0.12);
        assert_eq!(q.radius_km, DEFAULT_RADIUS_KM);
        assert_eq!(q.limit, DEFAULT_LIMIT);
    }

    #[test]
    fn parse_rejects_non_numeric_latitude() {
        let err = ProximityQuery::parse(Some("north"), Some("0"), None, None).unwrap_err();
        assert!(matches!(err, DomainError::InvalidArgument(_)));
    }

    #[test]
    fn parse_rejects_missing_coordinates() {
        assert!(ProximityQuery::parse(None, Some("0"), None, None).is_err());
        assert!(ProximityQuery::parse(Some("0"), None, None, None).is_err());
    }

    #[test]
    fn parse_rejects_non_finite_and_negative_radius() {
        assert!(ProximityQuery::parse(Some("0"), Some("0"), Some("NaN"), None).is_err());
        assert!(ProximityQuery::parse(Some("0"), Some("0"), Some("inf"), None).is_err());
        assert!(ProximityQuery::parse(Some("0"), Some("0"), Some("-1"), None).is_err());
        assert!(ProximityQuery::parse(Some("0"), Some("0"), Some("abc"), None).is_err());
    }

    #[test]
    fn parse_rejects_out_of_range_coordinates() {
        assert!(ProximityQuery::parse(Some("91"), Some("0"), None, None).is_err());
        assert!(ProximityQuery::parse(Some("0"), Some("-180.5"), None, None).is_err());
    }

    #[test]
    fn parse_rejects_limit_outside_bounds() {
        assert!(ProximityQuery::parse(Some("0"), Some("0"), None, Some("0")).is_err());
        assert!(ProximityQuery::parse(Some("0"), Some("0"), None, Some("two")).is_err());
        assert!(matches!(
            ProximityQuery::parse(Some("0"), Some("0"), None, Some("101")),
            Err(DomainError::InvalidArgument(_))
        ));
        let q = ProximityQuery::parse(Some("0"), Some("0"), None, Some("100")).expect("valid");
        assert_eq!(q.limit, MAX_LIMIT);
    }

    #[test]
    fn bounding_box_contains_every_point_on_the_radius() {
        let q = query(45.0, 7.0, 50.0, 20);
        let bbox = BoundingBox::around(&q);
        for step in 0..360 {
            let bearing = (step as f64).to_radians();
            let (lat, lon) = destination(q.latitude, q.longitude, bearing, q.radius_km * 0.999);
            assert!(bbox.contains(lat, lon), "bearing {} -> ({}, {})", step, lat, lon);
        }
    }

    #[test]
    fn bounding_box_spans_all_longitudes_near_poles_and_antimeridian() {
        let polar = BoundingBox::around(&query(89.9, 0.0, 50.0, 20));
        assert_eq!((polar.min_lon, polar.max_lon), (-180.0, 180.0));

        let dateline = BoundingBox::around(&query(0.0, 179.9, 50.0, 20));
        assert_eq!((dateline.min_lon, dateline.max_lon), (-180.0, 180.0));
    }

    // Great-circle destination from a start point, bearing and distance.
    fn destination(lat: f64, lon: f64, bearing: f64, distance_km: f64) -> (f64, f64) {
        let d = distance_km / EARTH_RADIUS_KM;
        let lat1 = lat.to_radians();
        let lon1 = lon.to_radians();
        let lat2 = (lat1.sin() * d.cos() + lat1.cos() * d.sin() * bearing.cos()).asin();
        let lon2 = lon1
            + (bearing.sin() * d.sin() * lat1.cos()).atan2(d.cos() - lat1.sin() * lat2.sin());
        (lat2.to_degrees(), lon2.to_degrees())
    }
}
