//! Coordinate validation for aurora predictions.

use serde::{Deserialize, Serialize};

/// Inclusive latitude bounds in degrees.
pub const LATITUDE_RANGE: (f64, f64) = (-90.0, 90.0);
/// Inclusive longitude bounds in degrees.
pub const LONGITUDE_RANGE: (f64, f64) = (-180.0, 180.0);

/// A validated latitude/longitude pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

/// Raw prediction request body; either field may be absent.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CoordinatesRequest {
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

/// Why a coordinate pair was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum CoordinateError {
    #[error("Latitude and longitude are required")]
    Missing,
    #[error("Invalid coordinates")]
    OutOfRange,
}

impl Coordinates {
    /// Check presence and range of both fields.
    pub fn validate(latitude: Option<f64>, longitude: Option<f64>) -> Result<Self, CoordinateError> {
        let (Some(latitude), Some(longitude)) = (latitude, longitude) else {
            return Err(CoordinateError::Missing);
        };

        if !in_range(latitude, LATITUDE_RANGE) || !in_range(longitude, LONGITUDE_RANGE) {
            return Err(CoordinateError::OutOfRange);
        }

        Ok(Self { latitude, longitude })
    }
}

impl TryFrom<CoordinatesRequest> for Coordinates {
    type Error = CoordinateError;

    fn try_from(req: CoordinatesRequest) -> Result<Self, Self::Error> {
        Self::validate(req.latitude, req.longitude)
    }
}

// NaN fails both comparisons, so it is rejected here too.
fn in_range(value: f64, (min, max): (f64, f64)) -> bool {
    value >= min && value <= max
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_bounds_inclusive() {
        for (lat, lon) in [(90.0, 180.0), (-90.0, -180.0), (0.0, 0.0), (64.8, -147.7)] {
            let coords = Coordinates::validate(Some(lat), Some(lon)).unwrap();
            assert_eq!(coords.latitude, lat);
            assert_eq!(coords.longitude, lon);
        }
    }

    #[test]
    fn test_rejects_out_of_range() {
        for (lat, lon) in [(90.01, 0.0), (-91.0, 0.0), (0.0, 180.5), (0.0, -181.0), (f64::NAN, 0.0)] {
            assert_eq!(
                Coordinates::validate(Some(lat), Some(lon)),
                Err(CoordinateError::OutOfRange),
                "({lat}, {lon}) should be rejected"
            );
        }
    }

    #[test]
    fn test_rejects_missing() {
        assert_eq!(Coordinates::validate(None, Some(1.0)), Err(CoordinateError::Missing));
        assert_eq!(Coordinates::validate(Some(1.0), None), Err(CoordinateError::Missing));
        assert_eq!(
            Coordinates::try_from(CoordinatesRequest::default()),
            Err(CoordinateError::Missing)
        );
    }
}
