/*  types_parse.rs -- FromStr implementation for types
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
    error::parse::*,
    ntp_metrics::NewTabPageAction,
    types::{
        Accuracy, Geoposition, GeopositionError, GeopositionErrorCode,
        GeopositionResult, Latitude, Location, LocationProviderType,
        Longitude,
    },
    utils::IntoGeneric,
};
use frunk::{hlist_pat, validated::IntoValidated};
use std::str::FromStr;

impl FromStr for Latitude {
    type Err = LatitudeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(s.trim()
            .parse::<f64>()
            .map_err(|e| LatitudeError::Parse(e, s.into()))?
            .try_into()?)
    }
}

impl FromStr for Longitude {
    type Err = LongitudeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(s.trim()
            .parse::<f64>()
            .map_err(|e| LongitudeError::Parse(e, s.into()))?
            .try_into()?)
    }
}

impl FromStr for Accuracy {
    type Err = AccuracyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(s.trim()
            .parse::<f64>()
            .map_err(|e| AccuracyError::Parse(e, s.into()))?
            .try_into()?)
    }
}

impl FromStr for Location {
    type Err = LocationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match *s.split(':').collect::<Vec<_>>().as_slice() {
            [lat, lon] => Ok((lat
                .parse::<Latitude>()
                .map_err(LocationErrorT::from)
                .into_validated()
                + lon.parse::<Longitude>().map_err(LocationErrorT::from))
            .into_result()?
            .into_generic()),
            _ => Err(LocationError::Fmt(s.into())),
        }
    }
}

/// `LATITUDE:LONGITUDE[:ACCURACY]`, timestamped now
impl FromStr for Geoposition {
    type Err = PositionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (lat, lon, acc) =
            match *s.split(':').collect::<Vec<_>>().as_slice() {
                [lat, lon] => (lat, lon, None),
                [lat, lon, acc] => (lat, lon, Some(acc)),
                _ => return Err(PositionError::Fmt(s.into())),
            };

        let acc = acc.map_or(Ok(Accuracy::default()), str::parse);
        let hlist_pat![lat, lon, acc] = (lat
            .parse::<Latitude>()
            .map_err(PositionErrorT::from)
            .into_validated()
            + lon.parse::<Longitude>().map_err(PositionErrorT::from)
            + acc.map_err(PositionErrorT::from))
        .into_result()?;

        Ok(Self::new(Location { lat, lon }, acc))
    }
}

impl FromStr for GeopositionErrorCode {
    type Err = GeopositionResultError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "permission-denied" => Ok(Self::PermissionDenied),
            "position-unavailable" => Ok(Self::PositionUnavailable),
            "timeout" => Ok(Self::Timeout),
            _ => Err(GeopositionResultError::ErrorCode(s.into())),
        }
    }
}

/// Either a position or `error:CODE[:MESSAGE]`
impl FromStr for GeopositionResult {
    type Err = GeopositionResultError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        match s.strip_prefix("error:") {
            Some(e) => {
                let (code, msg) = e.split_once(':').unwrap_or((e, ""));
                let code: GeopositionErrorCode = code.parse()?;
                let msg = match msg.trim() {
                    "" => code.default_message(),
                    m => m,
                };
                Ok(GeopositionError::new(code, msg).into())
            }
            None => Ok(s.parse::<Geoposition>()?.into()),
        }
    }
}

impl FromStr for LocationProviderType {
    type Err = ProviderKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "fake" => Ok(Self::Fake),
            _ => Ok(Self::Manual(s.parse()?)),
        }
    }
}

impl FromStr for NewTabPageAction {
    type Err = ActionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "recent-tab" => Ok(Self::RecentTabTile),
            "feed-article" => Ok(Self::FeedArticle),
            "most-visited" => Ok(Self::MostVisitedTile),
            "shortcut" => Ok(Self::ShortcutTile),
            _ => Err(ActionError(s.into())),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use anyhow::Result;
    use insta::assert_snapshot;

    #[test]
    fn location() -> Result<()> {
        let l = "35.7:-51.4".parse::<Location>()?;
        assert_eq!(l, Location::try_from((35.7, -51.4))?);
        assert!(" 1 : 2 ".parse::<Location>().is_ok());
        assert!(matches!(
            "1:2:3".parse::<Location>(),
            Err(LocationError::Fmt(_))
        ));
        Ok(())
    }

    #[test]
    fn location_reports_both_components() {
        let e = "north:200".parse::<Location>().unwrap_err();
        let LocationError::Components(v) = e else {
            unreachable!()
        };
        assert_eq!(v.0.len(), 2);
        assert!(matches!(v.0[0], LocationErrorT::Latitude(_)));
        assert!(matches!(v.0[1], LocationErrorT::Longitude(_)));
    }

    #[test]
    fn geoposition() -> Result<()> {
        let p = "1:2".parse::<Geoposition>()?;
        assert_eq!(p.location, Location::try_from((1.0, 2.0))?);
        assert_eq!(*p.accuracy, 0.0);

        let p = "1:2:25.5".parse::<Geoposition>()?;
        assert_eq!(*p.accuracy, 25.5);

        let e = "100:2:-1".parse::<Geoposition>().unwrap_err();
        assert!(matches!(e, PositionError::Components(v) if v.0.len() == 2));
        assert!(matches!(
            "1".parse::<Geoposition>(),
            Err(PositionError::Fmt(_))
        ));
        Ok(())
    }

    #[test]
    fn geoposition_result() -> Result<()> {
        let r = "error:timeout".parse::<GeopositionResult>()?;
        let e = r.error().cloned();
        assert_eq!(e.as_ref().map(|e| e.code), Some(GeopositionErrorCode::Timeout));
        assert_eq!(e.map(|e| e.message), Some("Timeout expired".into()));

        let r = "error:permission-denied:blocked by policy"
            .parse::<GeopositionResult>()?;
        assert_eq!(
            r.error().map(|e| e.message.as_str()),
            Some("blocked by policy")
        );

        assert!("3:4".parse::<GeopositionResult>()?.position().is_some());
        assert!(matches!(
            "error:lost".parse::<GeopositionResult>(),
            Err(GeopositionResultError::ErrorCode(_))
        ));
        Ok(())
    }

    #[test]
    fn provider_type() -> Result<()> {
        assert_eq!(
            "fake".parse::<LocationProviderType>()?,
            LocationProviderType::Fake
        );
        assert_eq!(
            "48.85:2.35".parse::<LocationProviderType>()?,
            LocationProviderType::Manual(Location::try_from((48.85, 2.35))?)
        );
        Ok(())
    }

    #[test]
    fn provider_type_error_message() {
        let e = "geoclue".parse::<LocationProviderType>().unwrap_err();
        assert_snapshot!(e.to_string(), @r###"
        location must be in the form of LATITUDE:LONGITUDE (geoclue)
        or a location provider name: fake
        "###);
    }

    #[test]
    fn action() -> Result<()> {
        let a = "recent-tab feed-article most-visited shortcut"
            .split(' ')
            .map(str::parse)
            .collect::<Result<Vec<NewTabPageAction>, _>>()?;
        assert_eq!(a, NewTabPageAction::ALL);
        assert!("tab".parse::<NewTabPageAction>().is_err());
        Ok(())
    }
}
