use crate::GeoPointError;
use std::fmt::{Display, Formatter};

/// A point on the earth given by latitude and longitude.
///
/// Both coordinates are stored with 30 bits. The latitude occupies the more significant bits, so
/// the packed representation orders points by latitude first.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoPoint {
    lat: f64,
    lng: f64,
}

const NUM_COORDINATE_BITS: u32 = 30;
const COORDINATE_MASK: u64 = (1 << NUM_COORDINATE_BITS) - 1;
#[allow(clippy::cast_precision_loss)]
const MAX_COORDINATE: f64 = COORDINATE_MASK as f64;

impl GeoPoint {
    pub fn try_new(lat: f64, lng: f64) -> Result<Self, GeoPointError> {
        if !(-90.0..=90.0).contains(&lat) {
            return Err(GeoPointError::LatitudeOutOfRange(lat));
        }
        if !(-180.0..=180.0).contains(&lng) {
            return Err(GeoPointError::LongitudeOutOfRange(lng));
        }
        Ok(Self { lat, lng })
    }

    /// Parses a WKT literal of the form `POINT(lng lat)`.
    pub fn parse_wkt(wkt: &str) -> Result<Self, GeoPointError> {
        let invalid = || GeoPointError::InvalidWkt(wkt.to_owned());
        let trimmed = wkt.trim();
        let prefix = trimmed.get(..5).ok_or_else(invalid)?;
        if !prefix.eq_ignore_ascii_case("POINT") {
            return Err(invalid());
        }
        let coordinates = trimmed[5..]
            .trim_start()
            .strip_prefix('(')
            .and_then(|rest| rest.trim_end().strip_suffix(')'))
            .ok_or_else(invalid)?;
        let mut parts = coordinates.split_whitespace();
        let (Some(lng), Some(lat), None) = (parts.next(), parts.next(), parts.next()) else {
            return Err(invalid());
        };
        let lng = lng.parse::<f64>().map_err(|_| invalid())?;
        let lat = lat.parse::<f64>().map_err(|_| invalid())?;
        Self::try_new(lat, lng)
    }

    pub fn lat(&self) -> f64 {
        self.lat
    }

    pub fn lng(&self) -> f64 {
        self.lng
    }

    /// Packs the point into 60 bits.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn to_bits(self) -> u64 {
        let lat = ((self.lat + 90.0) / 180.0 * MAX_COORDINATE).round() as u64;
        let lng = ((self.lng + 180.0) / 360.0 * MAX_COORDINATE).round() as u64;
        (lat << NUM_COORDINATE_BITS) | lng
    }

    /// Unpacks a point. The coordinates may differ slightly from the ones that were packed.
    #[allow(clippy::cast_precision_loss)]
    pub fn from_bits(bits: u64) -> Self {
        let lat = ((bits >> NUM_COORDINATE_BITS) & COORDINATE_MASK) as f64;
        let lng = (bits & COORDINATE_MASK) as f64;
        Self {
            lat: lat / MAX_COORDINATE * 180.0 - 90.0,
            lng: lng / MAX_COORDINATE * 360.0 - 180.0,
        }
    }
}

impl Display for GeoPoint {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "POINT({:.6} {:.6})", self.lng, self.lat)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_wkt() {
        let point = GeoPoint::parse_wkt("POINT(7.8 48.0)").unwrap();
        assert_eq!(point.lng(), 7.8);
        assert_eq!(point.lat(), 48.0);
        assert!(GeoPoint::parse_wkt(" point ( -1 2 ) ").is_ok());
        assert!(GeoPoint::parse_wkt("LINESTRING(1 2, 3 4)").is_err());
        assert!(GeoPoint::parse_wkt("POINT(1)").is_err());
        assert!(GeoPoint::parse_wkt("POINT(1 2 3)").is_err());
    }

    #[test]
    fn rejects_out_of_range_coordinates() {
        assert_eq!(
            GeoPoint::try_new(91.0, 0.0),
            Err(GeoPointError::LatitudeOutOfRange(91.0))
        );
        assert!(GeoPoint::parse_wkt("POINT(181 0)").is_err());
    }

    #[test]
    fn round_trip_is_precise() {
        let point = GeoPoint::try_new(48.0, 7.8).unwrap();
        let decoded = GeoPoint::from_bits(point.to_bits());
        assert!((decoded.lat() - 48.0).abs() < 1e-6);
        assert!((decoded.lng() - 7.8).abs() < 1e-6);
        assert!(point.to_bits() < 1 << 60);
    }

    #[test]
    fn display() {
        let point = GeoPoint::try_new(-10.5, 20.25).unwrap();
        insta::assert_snapshot!(point, @"POINT(20.250000 -10.500000)");
    }
}
