/// Coordinate types and utilities.
use crate::{protocol::aprs::PositionReport, Error, ATResult};

/// Mean earth radius used for great-circle distances.
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

//  _____
// |_   _|   _ _ __   ___  ___
//   | || | | | '_ \ / _ \/ __|
//   | || |_| | |_) |  __/\__ \
//   |_| \__, | .__/ \___||___/
//       |___/|_|

/// (latitude, longitude) in WGS 84 degrees.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Point2d(pub f64, pub f64);

/// One point of a track, the only part of a position report that KML output needs.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct TrackPoint {
    pub lat_deg: f64,
    pub lon_deg: f64,
    pub alt_m: Option<f64>,
}

impl From<&PositionReport> for TrackPoint {
    fn from(report: &PositionReport) -> Self {
        Self {
            lat_deg: report.latitude_deg(),
            lon_deg: report.longitude_deg(),
            alt_m: report.altitude_m(),
        }
    }
}

impl From<TrackPoint> for Point2d {
    fn from(p: TrackPoint) -> Self {
        Point2d(p.lat_deg, p.lon_deg)
    }
}

pub fn validate_lat(lat: f64) -> ATResult<()> {
    if !(-90.0..=90.0).contains(&lat) {
        return Err(Error::InvalidCoord(format!("latitude {lat}")));
    }
    Ok(())
}

pub fn validate_lon(lon: f64) -> ATResult<()> {
    if !(-180.0..=180.0).contains(&lon) {
        return Err(Error::InvalidCoord(format!("longitude {lon}")));
    }
    Ok(())
}

pub fn meter_per_deg_lat(lat_deg: f64) -> ATResult<f64> {
    validate_lat(lat_deg)?;
    // num meters to travel 1 degree on N-S line changes with latitude:
    // 111132.92 - 559.82 * cos(2 * lat_rad) + 1.175 * cos(4 * lat_rad) - 0.0023 * cos(6 * lat_rad)
    // Source: https://en.wikipedia.org/wiki/Geographic_coordinate_system
    let lat_rad = lat_deg.to_radians();
    Ok(
        111132.92 - 559.82 * (2.0 * lat_rad).cos() + 1.175 * (4.0 * lat_rad).cos()
            - 0.0023 * (6.0 * lat_rad).cos(),
    )
}

pub fn meter_per_deg_lon(lat_deg: f64) -> ATResult<f64> {
    validate_lat(lat_deg)?;
    let lat_rad = lat_deg.to_radians();

    // Meters per degree of longitude on an E-W line depends on the circle of latitude.
    // m = 111412.84 * cos(lat_rad) - 93.5 * cos(3 * lat_rad) + 0.118 * cos(5 * lat_rad)
    Ok(
        111412.84 * lat_rad.cos() - 93.5 * (3.0 * lat_rad).cos()
            + 0.118 * (5.0 * lat_rad).cos(),
    )
}

/// Great-circle distance in meters (haversine formula).
pub fn haversine_m(a: Point2d, b: Point2d) -> f64 {
    let (lat1, lon1) = (a.0.to_radians(), a.1.to_radians());
    let (lat2, lon2) = (b.0.to_radians(), b.1.to_radians());
    let h = ((lat2 - lat1) / 2.0).sin().powi(2)
        + lat1.cos() * lat2.cos() * ((lon2 - lon1) / 2.0).sin().powi(2);
    2.0 * h.sqrt().asin() * EARTH_RADIUS_M
}

/// Compass heading in degrees, kept in `[0, 360)`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Heading(pub f64);

impl Heading {
    /// Heading of a displacement given in meters north and east.
    pub fn from_offsets(north_m: f64, east_m: f64) -> Self {
        let mut h = Self(0.0);
        h.rot(east_m.atan2(north_m).to_degrees());
        h
    }

    pub fn rot(&mut self, deg_cw: f64) {
        self.0 = (self.0 + deg_cw).rem_euclid(360.0);
        // rem_euclid rounds tiny negative inputs up to exactly 360
        if self.0 >= 360.0 {
            self.0 = 0.0;
        }
    }
}

impl From<f64> for Heading {
    fn from(deg: f64) -> Self {
        let mut h = Self(0.0);
        h.rot(deg);
        h
    }
}

impl From<Heading> for f64 {
    fn from(h: Heading) -> f64 {
        h.0
    }
}
