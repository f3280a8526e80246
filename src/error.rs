/*  error.rs -- Errors
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

use crate::types_display::ERR;
use itertools::Itertools;
use std::{
    error::Error,
    fmt::{self, Display, Formatter},
    io,
    path::PathBuf,
};
use thiserror::Error;

#[derive(Debug, Error)]
pub struct VecError<E: Error>(pub Vec<E>);
impl<E: Error> Display for VecError<E> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let err =
            |e: &E| "- ".to_string() + &e.to_string().lines().join("\n  ");
        let s = self.0.iter().map(err).join("\n");
        f.write_str(&s)
    }
}

impl<E: Error> Default for VecError<E> {
    fn default() -> Self {
        Self(vec![])
    }
}

impl<E: Error> From<Vec<E>> for VecError<E> {
    fn from(v: Vec<E>) -> Self {
        Self(v)
    }
}

//

#[derive(Debug)]
pub struct ShimError(ShimErrorKind);

impl Display for ShimError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let sep = "\n".to_string() + &" ".repeat("error: ".len());
        let s = format!("{ERR}error:{ERR:#} {}", self.0).lines().join(&sep);
        f.write_str(&s)
    }
}

impl Error for ShimError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        Some(&self.0)
    }
}

impl ShimError {
    pub fn kind(&self) -> &ShimErrorKind {
        &self.0
    }

    /// Exit code reported to the shell, see [exitcode]
    pub fn exit_code(&self) -> exitcode::ExitCode {
        match self.0 {
            ShimErrorKind::Config(_) => exitcode::CONFIG,
            ShimErrorKind::Compliance(_) => exitcode::UNAVAILABLE,
            ShimErrorKind::Replay(_) => exitcode::DATAERR,
            ShimErrorKind::Io(_) => exitcode::IOERR,
            ShimErrorKind::Ctrlc(_) | ShimErrorKind::Mpsc(_) => {
                exitcode::OSERR
            }
        }
    }
}

#[derive(Debug, Error)]
pub enum ShimErrorKind {
    #[error("configuration failed:\n{0}")]
    Config(#[from] config::ConfigError),
    #[error("compliance checks failed:\n{0}")]
    Compliance(#[from] VecError<ComplianceError>),
    #[error("position replay failed:\n{0}")]
    Replay(#[from] ReplayError),
    #[error("unable to write output:\n{0}")]
    Io(#[from] io::Error),
    #[error("failed to set CTRL-C handler:\n{0}")]
    Ctrlc(#[from] ctrlc::Error),
    #[error("failed to handle CTRL-C:\n{0}")]
    Mpsc(#[from] std::sync::mpsc::RecvTimeoutError),
}

#[derive(Debug, Error)]
pub enum ComplianceError {
    #[error("unable to get the content directory of the platform")]
    ContentDirUnavailable,
    #[error("crash upload certificate directory does not exist ({0})")]
    CertDirMissing(PathBuf),
    #[error("crash handler extension is not registered ({0})")]
    ExtensionMissing(&'static str),
}

#[derive(Debug, Error)]
pub enum ReplayError {
    #[error("the manual provider publishes its own location; use `-l fake`")]
    ManualProvider,
    #[error("unable to read position file ({1}):\n{0}")]
    OpenFailed(io::Error, PathBuf),
    #[error("invalid positions ({1}):\n{0}")]
    InvalidLines(VecError<LineError>, PathBuf),
}

#[derive(Debug, Error)]
#[error("line {line}:\n{err}")]
pub struct LineError {
    pub line: usize,
    pub err: parse::GeopositionResultError,
}

pub mod config {
    use super::*;

    #[derive(Debug, Error)]
    pub enum ConfigError {
        #[error("{0}")]
        File(#[from] ConfigFileError),
        #[error("no content directory was given. Use --content-dir")]
        NoContentDir,
    }

    #[derive(Debug, Error)]
    pub enum ConfigFileError {
        #[error("given path is not a file ({0})")]
        PathNotFile(PathBuf),
        #[error("unable to find configuration file. Use the -c flag.")]
        ConfigDirNotFound,
        #[error("unable to read file ({1}):\n{0}")]
        OpenFailed(io::Error, PathBuf),
        #[error("unable to deserialize file ({1}):\n{0}")]
        DeserializeFailed(toml::de::Error, PathBuf),
    }
}

pub mod types {
    use super::*;
    use crate::types::{
        MAX_HEADING, MAX_LATITUDE, MAX_LONGITUDE, MIN_LATITUDE, MIN_LONGITUDE,
    };

    #[derive(Debug, Error)]
    #[error("latitude must be between {MIN_LATITUDE}° and {MAX_LATITUDE}° ({0})")]
    pub struct LatitudeError(pub f64);

    #[derive(Debug, Error)]
    #[error("longitude must be between {MIN_LONGITUDE}° and {MAX_LONGITUDE}° ({0})")]
    pub struct LongitudeError(pub f64);

    #[derive(Debug, Error)]
    #[error("accuracy must be a non-negative number of meters ({0})")]
    pub struct AccuracyError(pub f64);

    #[derive(Debug, Error)]
    #[error("speed must be a non-negative number of meters per second ({0})")]
    pub struct SpeedError(pub f64);

    #[derive(Debug, Error)]
    #[error("heading must be in [0°, {MAX_HEADING}°) ({0})")]
    pub struct HeadingError(pub f64);

    #[derive(Debug, Error)]
    pub enum LocationErrorT {
        #[error("{0}")]
        Latitude(#[from] LatitudeError),
        #[error("{0}")]
        Longitude(#[from] LongitudeError),
    }

    #[derive(Debug, Error)]
    #[error("{0}")]
    pub struct LocationError(#[from] pub VecError<LocationErrorT>);

    impl From<Vec<LocationErrorT>> for LocationError {
        fn from(v: Vec<LocationErrorT>) -> Self {
            Self(VecError(v))
        }
    }
}

pub mod parse {
    use super::*;
    use std::num::ParseFloatError;

    #[derive(Debug, Error)]
    pub enum LatitudeError {
        #[error("invalid number ({1}):\n{0}")]
        Parse(ParseFloatError, String),
        #[error("{0}")]
        Type(#[from] types::LatitudeError),
    }

    #[derive(Debug, Error)]
    pub enum LongitudeError {
        #[error("invalid number ({1}):\n{0}")]
        Parse(ParseFloatError, String),
        #[error("{0}")]
        Type(#[from] types::LongitudeError),
    }

    #[derive(Debug, Error)]
    pub enum AccuracyError {
        #[error("invalid number ({1}):\n{0}")]
        Parse(ParseFloatError, String),
        #[error("{0}")]
        Type(#[from] types::AccuracyError),
    }

    #[derive(Debug, Error)]
    pub enum LocationErrorT {
        #[error("{0}")]
        Latitude(#[from] LatitudeError),
        #[error("{0}")]
        Longitude(#[from] LongitudeError),
    }

    #[derive(Debug, Error)]
    pub enum LocationError {
        #[error("{0}")]
        Components(#[from] VecError<LocationErrorT>),
        #[error("location must be in the form of LATITUDE:LONGITUDE ({0})")]
        Fmt(String),
    }

    impl From<Vec<LocationErrorT>> for LocationError {
        fn from(v: Vec<LocationErrorT>) -> Self {
            Self::Components(VecError(v))
        }
    }

    #[derive(Debug, Error)]
    pub enum PositionErrorT {
        #[error("{0}")]
        Latitude(#[from] LatitudeError),
        #[error("{0}")]
        Longitude(#[from] LongitudeError),
        #[error("{0}")]
        Accuracy(#[from] AccuracyError),
    }

    #[derive(Debug, Error)]
    pub enum PositionError {
        #[error("{0}")]
        Components(#[from] VecError<PositionErrorT>),
        #[error(
            "position must be in the form of LATITUDE:LONGITUDE[:ACCURACY] ({0})"
        )]
        Fmt(String),
    }

    impl From<Vec<PositionErrorT>> for PositionError {
        fn from(v: Vec<PositionErrorT>) -> Self {
            Self::Components(VecError(v))
        }
    }

    #[derive(Debug, Error)]
    pub enum GeopositionResultError {
        #[error("{0}")]
        Position(#[from] PositionError),
        #[error(
            "unknown error code ({0}). Available codes are: \
             permission-denied, position-unavailable, timeout"
        )]
        ErrorCode(String),
    }

    #[derive(Debug, Error)]
    #[error("{0}\nor a location provider name: fake")]
    pub struct ProviderKindError(#[from] pub LocationError);

    #[derive(Debug, Error)]
    #[error(
        "unknown new tab page action ({0}). Available actions are: \
         recent-tab, feed-article, most-visited, shortcut"
    )]
    pub struct ActionError(pub String);
}

//

impl From<config::ConfigError> for ShimError {
    fn from(e: config::ConfigError) -> Self {
        Self(ShimErrorKind::Config(e))
    }
}

impl From<VecError<ComplianceError>> for ShimError {
    fn from(e: VecError<ComplianceError>) -> Self {
        Self(ShimErrorKind::Compliance(e))
    }
}

impl From<ReplayError> for ShimError {
    fn from(e: ReplayError) -> Self {
        Self(ShimErrorKind::Replay(e))
    }
}

impl From<io::Error> for ShimError {
    fn from(e: io::Error) -> Self {
        Self(ShimErrorKind::Io(e))
    }
}

impl From<ctrlc::Error> for ShimError {
    fn from(e: ctrlc::Error) -> Self {
        Self(ShimErrorKind::Ctrlc(e))
    }
}

impl From<std::sync::mpsc::RecvTimeoutError> for ShimError {
    fn from(e: std::sync::mpsc::RecvTimeoutError) -> Self {
        Self(ShimErrorKind::Mpsc(e))
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn shim_error_is_a_std_error() -> anyhow::Result<()> {
        let e = ShimError::from(ReplayError::ManualProvider);
        assert!(e.source().is_some());
        assert_eq!(e.exit_code(), exitcode::DATAERR);

        let r: Result<(), ShimError> = Err(e);
        let e = r.map_err(anyhow::Error::from).unwrap_err();
        assert!(e.downcast_ref::<ShimError>().is_some());
        Ok(())
    }
}
