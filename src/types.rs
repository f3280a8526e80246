/*  types.rs -- Common types
    This file is part of <https://github.com/mahor1221/platform-shims>.
    Copyright (C) 2024 Mahor Foruzesh <mahor1221@gmail.com>

    This program is free software: you can redistribute it and/or modify
    it under the terms of the GNU General Public License as published by
    the Free Software Foundation, either version 3 of the License, or
    (at your option) any later version.

    This program is distributed in the hope that it will be useful,
    but WITHOUT ANY WARRANTY; without even the implied warranty of
    MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
    GNU General Public License for more details.

    You should have received a copy of the GNU General Public License
    along with this program.  If not, see <https://www.gnu.org/licenses/>.
*/

use crate::{
    error::types::{
        AccuracyError, HeadingError, LatitudeError, LocationError,
        LocationErrorT, LongitudeError, SpeedError,
    },
    utils::IntoGeneric,
};
use chrono::{DateTime, Utc};
use frunk::{validated::IntoValidated, Generic};
use std::ops::Deref;

pub const DEFAULT_LATITUDE: f64 = 0.0; // Null Island
pub const DEFAULT_LONGITUDE: f64 = 0.0;
// Delay between two replayed positions (milliseconds)
pub const DEFAULT_REPLAY_INTERVAL: u64 = 1000;

pub const MIN_LATITUDE: f64 = -90.0;
pub const MAX_LATITUDE: f64 = 90.0;
pub const MIN_LONGITUDE: f64 = -180.0;
pub const MAX_LONGITUDE: f64 = 180.0;
pub const MAX_HEADING: f64 = 360.0;

#[derive(Debug, Clone, Copy)]
pub struct Latitude(f64);
#[derive(Debug, Clone, Copy)]
pub struct Longitude(f64);
#[derive(Debug, Clone, Copy, Default, PartialEq, Generic)]
pub struct Location {
    pub lat: Latitude,
    pub lon: Longitude,
}

/// Radius of the 95% confidence circle, in meters
#[derive(Debug, Clone, Copy, Default)]
pub struct Accuracy(f64);
/// Direction of travel in degrees, clockwise from true north
#[derive(Debug, Clone, Copy)]
pub struct Heading(f64);
/// Ground speed in meters per second
#[derive(Debug, Clone, Copy)]
pub struct Speed(f64);

/// A successful position fix
#[derive(Debug, Clone, PartialEq)]
pub struct Geoposition {
    pub location: Location,
    pub accuracy: Accuracy,
    /// Height above the WGS84 ellipsoid in meters
    pub altitude: Option<f64>,
    pub altitude_accuracy: Option<Accuracy>,
    pub heading: Option<Heading>,
    pub speed: Option<Speed>,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeopositionErrorCode {
    PermissionDenied = 1,
    PositionUnavailable = 2,
    Timeout = 3,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeopositionError {
    pub code: GeopositionErrorCode,
    pub message: String,
    /// Diagnostic details, not meant to be shown to the user
    pub technical: String,
}

/// What a location provider hands to its consumer on each update
#[derive(Debug, Clone, PartialEq)]
pub enum GeopositionResult {
    Position(Geoposition),
    Error(GeopositionError),
}

#[derive(Debug, Clone, Default, PartialEq)]
pub enum LocationProviderType {
    Manual(Location),
    #[default]
    Fake,
}

/// Positioning activity of a location provider
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ProviderState {
    #[default]
    Stopped,
    LowAccuracy,
    HighAccuracy,
}

//

impl Default for Latitude {
    fn default() -> Self {
        Self(DEFAULT_LATITUDE)
    }
}

impl Default for Longitude {
    fn default() -> Self {
        Self(DEFAULT_LONGITUDE)
    }
}

impl TryFrom<f64> for Latitude {
    type Error = LatitudeError;

    fn try_from(n: f64) -> Result<Self, Self::Error> {
        if (MIN_LATITUDE..=MAX_LATITUDE).contains(&n) {
            Ok(Self(n))
        } else {
            Err(LatitudeError(n))
        }
    }
}

impl TryFrom<f64> for Longitude {
    type Error = LongitudeError;

    fn try_from(n: f64) -> Result<Self, Self::Error> {
        if (MIN_LONGITUDE..=MAX_LONGITUDE).contains(&n) {
            Ok(Self(n))
        } else {
            Err(LongitudeError(n))
        }
    }
}

impl TryFrom<(f64, f64)> for Location {
    type Error = LocationError;

    fn try_from((lat, lon): (f64, f64)) -> Result<Self, Self::Error> {
        let lat = Latitude::try_from(lat).map_err(LocationErrorT::from);
        let lon = Longitude::try_from(lon).map_err(LocationErrorT::from);
        Ok((lat.into_validated() + lon).into_result()?.into_generic())
    }
}

impl TryFrom<f64> for Accuracy {
    type Error = AccuracyError;

    fn try_from(n: f64) -> Result<Self, Self::Error> {
        // also rejects NaN
        if n >= 0.0 && n.is_finite() {
            Ok(Self(n))
        } else {
            Err(AccuracyError(n))
        }
    }
}

impl TryFrom<f64> for Heading {
    type Error = HeadingError;

    fn try_from(n: f64) -> Result<Self, Self::Error> {
        if (0.0..MAX_HEADING).contains(&n) {
            Ok(Self(n))
        } else {
            Err(HeadingError(n))
        }
    }
}

impl TryFrom<f64> for Speed {
    type Error = SpeedError;

    fn try_from(n: f64) -> Result<Self, Self::Error> {
        if n >= 0.0 && n.is_finite() {
            Ok(Self(n))
        } else {
            Err(SpeedError(n))
        }
    }
}

// NOTE: Using Deref is not an anti pattern here. These newtypes are plain
// wrappers that only enforce restrictions and boundaries on the inner type.
// DerefMut must not be implemented for these types.

impl Deref for Latitude {
    type Target = f64;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl Deref for Longitude {
    type Target = f64;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl Deref for Accuracy {
    type Target = f64;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl Deref for Heading {
    type Target = f64;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl Deref for Speed {
    type Target = f64;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

//

/// Coordinates closer than this are considered equal (roughly 1cm)
const EPSILON: f64 = 1e-7;

fn eq(lhs: f64, rhs: f64) -> bool {
    (lhs - rhs).abs() < EPSILON
}

impl PartialEq for Latitude {
    fn eq(&self, other: &Self) -> bool {
        eq(**self, **other)
    }
}
impl PartialEq for Longitude {
    fn eq(&self, other: &Self) -> bool {
        eq(**self, **other)
    }
}
impl PartialEq for Accuracy {
    fn eq(&self, other: &Self) -> bool {
        eq(**self, **other)
    }
}
impl PartialEq for Heading {
    fn eq(&self, other: &Self) -> bool {
        eq(**self, **other)
    }
}
impl PartialEq for Speed {
    fn eq(&self, other: &Self) -> bool {
        eq(**self, **other)
    }
}

//

impl Geoposition {
    /// A fix at `location`, timestamped now
    pub fn new(location: Location, accuracy: Accuracy) -> Self {
        Self {
            location,
            accuracy,
            altitude: None,
            altitude_accuracy: None,
            heading: None,
            speed: None,
            timestamp: Utc::now(),
        }
    }

    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = timestamp;
        self
    }

    pub fn with_altitude(mut self, altitude: f64, accuracy: Accuracy) -> Self {
        self.altitude = Some(altitude);
        self.altitude_accuracy = Some(accuracy);
        self
    }

    pub fn with_motion(mut self, heading: Heading, speed: Speed) -> Self {
        self.heading = Some(heading);
        self.speed = Some(speed);
        self
    }
}

impl GeopositionError {
    pub fn new(code: GeopositionErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            technical: String::new(),
        }
    }

    pub fn with_technical(mut self, technical: impl Into<String>) -> Self {
        self.technical = technical.into();
        self
    }
}

impl GeopositionErrorCode {
    pub fn default_message(&self) -> &'static str {
        match self {
            Self::PermissionDenied => "User denied Geolocation",
            Self::PositionUnavailable => "Position update is unavailable",
            Self::Timeout => "Timeout expired",
        }
    }
}

impl GeopositionResult {
    pub fn position(&self) -> Option<&Geoposition> {
        match self {
            Self::Position(p) => Some(p),
            Self::Error(_) => None,
        }
    }

    pub fn error(&self) -> Option<&GeopositionError> {
        match self {
            Self::Position(_) => None,
            Self::Error(e) => Some(e),
        }
    }
}

impl From<Geoposition> for GeopositionResult {
    fn from(p: Geoposition) -> Self {
        Self::Position(p)
    }
}

impl From<GeopositionError> for GeopositionResult {
    fn from(e: GeopositionError) -> Self {
        Self::Error(e)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use anyhow::Result;

    #[test]
    fn location_bounds() {
        assert!(Location::try_from((90.0, -180.0)).is_ok());
        assert!(Location::try_from((-90.0, 180.0)).is_ok());
        assert!(Latitude::try_from(90.5).is_err());
        assert!(Longitude::try_from(-180.5).is_err());
    }

    #[test]
    fn location_collects_both_errors() {
        let e = Location::try_from((100.0, 200.0)).unwrap_err();
        assert_eq!(e.0 .0.len(), 2);
    }

    #[test]
    fn accuracy_rejects_negative_and_nan() {
        assert!(Accuracy::try_from(0.0).is_ok());
        assert!(Accuracy::try_from(-1.0).is_err());
        assert!(Accuracy::try_from(f64::NAN).is_err());
        assert!(Heading::try_from(360.0).is_err());
        assert!(Speed::try_from(f64::INFINITY).is_err());
    }

    #[test]
    fn result_accessors() -> Result<()> {
        let loc = Location::try_from((1.0, 2.0))?;
        let pos = Geoposition::new(loc, Accuracy::try_from(5.0)?);
        let ok = GeopositionResult::from(pos.clone());
        assert_eq!(ok.position(), Some(&pos));
        assert!(ok.error().is_none());

        let code = GeopositionErrorCode::Timeout;
        let err = GeopositionResult::from(GeopositionError::new(
            code,
            code.default_message(),
        ));
        assert!(err.position().is_none());
        assert_eq!(err.error().map(|e| e.code), Some(code));
        Ok(())
    }
}
