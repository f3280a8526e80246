/*  types_display.rs -- Display implementation for common types
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
    compliance::{CheckOutcome, CheckReport},
    ntp_metrics::{NewTabPageAction, NewTabPageMetricsRecorder},
    types::{
        Accuracy, Geoposition, GeopositionError, GeopositionErrorCode,
        GeopositionResult, Location, ProviderState,
    },
};
use anstyle::{AnsiColor, Color, Style};
use itertools::Itertools;
use std::fmt::{Display, Formatter, Result as FmtResult};

pub const HEADER: Style = Style::new().bold().underline();
pub const BODY: Style = Style::new().bold();
pub const ERR: Style = Style::new()
    .bold()
    .fg_color(Some(Color::Ansi(AnsiColor::Red)));
pub const WARN: Style = Style::new()
    .bold()
    .fg_color(Some(Color::Ansi(AnsiColor::Yellow)));
pub const OK: Style = Style::new()
    .bold()
    .fg_color(Some(Color::Ansi(AnsiColor::Green)));

/// Degrees, minutes and seconds of an angle
fn dms(n: f64) -> (u16, u8, u8) {
    let secs = (n.abs() * 3600.0).round() as u32;
    ((secs / 3600) as u16, (secs / 60 % 60) as u8, (secs % 60) as u8)
}

impl Display for Location {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        let ns = if *self.lat >= 0.0 { "N" } else { "S" };
        let ew = if *self.lon >= 0.0 { "E" } else { "W" };
        let (a1, a2, a3) = dms(*self.lat);
        let (b1, b2, b3) = dms(*self.lon);
        write!(f, "{a1}°{a2}′{a3}″{ns}, {b1}°{b2}′{b3}″{ew}")
    }
}

impl Display for Accuracy {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "±{:.1}m", **self)
    }
}

impl Display for Geoposition {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        let Self {
            location,
            accuracy,
            altitude,
            altitude_accuracy,
            heading,
            speed,
            timestamp,
        } = self;

        write!(f, "{location} ({accuracy})")?;
        if let Some(a) = altitude {
            write!(f, ", altitude {a:.1}m")?;
            if let Some(acc) = altitude_accuracy {
                write!(f, " ({acc})")?;
            }
        }
        if let Some(h) = heading {
            write!(f, ", heading {:.1}°", **h)?;
        }
        if let Some(s) = speed {
            write!(f, ", speed {:.1}m/s", **s)?;
        }
        write!(f, " at {}", timestamp.format("%Y-%m-%d %H:%M:%S UTC"))
    }
}

impl Display for GeopositionErrorCode {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        let s = match self {
            Self::PermissionDenied => "permission denied",
            Self::PositionUnavailable => "position unavailable",
            Self::Timeout => "timeout",
        };
        f.write_str(s)
    }
}

impl Display for GeopositionError {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        let Self {
            code,
            message,
            technical,
        } = self;
        write!(f, "{code}: {message}")?;
        if !technical.is_empty() {
            write!(f, " ({technical})")?;
        }
        Ok(())
    }
}

impl Display for GeopositionResult {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Self::Position(p) => write!(f, "{BODY}Position{BODY:#}: {p}"),
            Self::Error(e) => write!(f, "{WARN}Error{WARN:#}: {e}"),
        }
    }
}

impl Display for ProviderState {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        let s = match self {
            Self::Stopped => "stopped",
            Self::LowAccuracy => "low accuracy",
            Self::HighAccuracy => "high accuracy",
        };
        f.write_str(s)
    }
}

//

impl Display for NewTabPageAction {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        let s = match self {
            Self::RecentTabTile => "Recent tab tile",
            Self::FeedArticle => "Feed article",
            Self::MostVisitedTile => "Most visited tile",
            Self::ShortcutTile => "Shortcut tile",
        };
        // let the width and fill flags through
        f.pad(s)
    }
}

impl Display for NewTabPageMetricsRecorder {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        let rows = NewTabPageAction::ALL
            .iter()
            .map(|a| format!("{a:<18}: {}", self.count(*a)))
            .join("\n");
        write!(f, "{rows}\n{:<18}: {}", "Total", self.total())
    }
}

//

impl Display for CheckReport {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        let Self { name, outcome } = self;
        match outcome {
            CheckOutcome::Passed(s) => {
                write!(f, "{OK}passed{OK:#}  {BODY}{name}{BODY:#}: {s}")
            }
            CheckOutcome::Skipped(s) => {
                write!(f, "{WARN}skipped{WARN:#} {BODY}{name}{BODY:#}: {s}")
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::types::{Heading, Speed};
    use anyhow::Result;
    use chrono::{TimeZone, Utc};
    use insta::assert_snapshot;

    #[test]
    fn location() -> Result<()> {
        let l = Location::try_from((35.6892, -51.389))?;
        assert_snapshot!(l.to_string(), @"35°41′21″N, 51°23′20″W");
        Ok(())
    }

    #[test]
    fn geoposition() -> Result<()> {
        let t = Utc.with_ymd_and_hms(2024, 6, 1, 12, 30, 0).unwrap();
        let loc = Location::try_from((-33.9, 18.4))?;
        let p = Geoposition::new(loc, Accuracy::try_from(12.0)?)
            .with_altitude(20.0, Accuracy::try_from(3.0)?)
            .with_motion(Heading::try_from(90.0)?, Speed::try_from(1.5)?)
            .with_timestamp(t);
        assert_snapshot!(p.to_string(), @"33°54′0″S, 18°24′0″E (±12.0m), altitude 20.0m (±3.0m), heading 90.0°, speed 1.5m/s at 2024-06-01 12:30:00 UTC");
        Ok(())
    }

    #[test]
    fn geoposition_error() {
        let e = GeopositionError::new(GeopositionErrorCode::Timeout, "Timeout expired")
            .with_technical("no fix after 30s");
        assert_snapshot!(e.to_string(), @"timeout: Timeout expired (no fix after 30s)");
    }
}
