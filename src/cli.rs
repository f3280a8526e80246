/*  cli.rs -- Command line interface
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
    compliance::CRASH_HANDLER_EXTENSION_NAME,
    ntp_metrics::NewTabPageAction,
    types::{GeopositionResult, LocationProviderType},
};
use clap::{Args, ColorChoice, Command, CommandFactory, Parser, Subcommand};
use const_format::formatcp;
use std::{path::PathBuf, str::FromStr};
use tracing::level_filters::LevelFilter;

const VERSION: &str = {
    const PKG_VERSION: &str = env!("CARGO_PKG_VERSION");
    const GIT_DESCRIBE: &str = env!("VERGEN_GIT_DESCRIBE");
    const GIT_COMMIT_DATE: &str = env!("VERGEN_GIT_COMMIT_DATE");

    formatcp!("{PKG_VERSION} ({GIT_DESCRIBE} {GIT_COMMIT_DATE})")
};

const VERSION_LONG: &str = {
    const RUSTC_SEMVER: &str = env!("VERGEN_RUSTC_SEMVER");
    const RUSTC_HOST_TRIPLE: &str = env!("VERGEN_RUSTC_HOST_TRIPLE");
    const CARGO_FEATURES: &str = env!("VERGEN_CARGO_FEATURES");
    const CARGO_TARGET_TRIPLE: &str = env!("VERGEN_CARGO_TARGET_TRIPLE");

    formatcp!(
        "{VERSION}

rustc version:       {RUSTC_SEMVER}
rustc host triple:   {RUSTC_HOST_TRIPLE}
cargo features:      {CARGO_FEATURES}
cargo target triple: {CARGO_TARGET_TRIPLE}"
    )
};

const ABOUT_CHECK: &str = formatcp!(
    "Verify the crash reporting setup: the upload certificate directory must \
     exist and the {CRASH_HANDLER_EXTENSION_NAME} extension must be registered"
);
const ABOUT_REPLAY: &str =
    "Feed positions to a location provider and print every update";
const ABOUT_METRICS: &str =
    "Report new tab page actions to the metrics recorder and print the counts";

const HELP_POSITION: &str = "\
A position LATITUDE:LONGITUDE[:ACCURACY] or an error \
error:CODE[:MESSAGE] where CODE is one of permission-denied, \
position-unavailable, timeout";

pub fn cli_args_command() -> Command {
    CliArgs::command()
}

#[derive(Debug, Parser)]
#[command(version = VERSION, long_version = VERSION_LONG, about)]
#[command(propagate_version = true)]
pub struct CliArgs {
    #[command(subcommand)]
    pub mode: ModeArgs,

    #[arg(long, short, display_order(100), value_name = "FILE")]
    pub config: Option<PathBuf>,

    #[command(flatten)]
    pub verbosity: VerbosityArgs,

    #[arg(long, display_order(100), value_name = "WHEN")]
    pub color: Option<ColorChoice>,
}

#[derive(Debug, Subcommand)]
pub enum ModeArgs {
    #[command(about = ABOUT_CHECK)]
    Check {
        /// Content directory of the platform
        #[arg(long, value_name = "DIRECTORY")]
        content_dir: Option<PathBuf>,
        /// Name of a registered platform extension
        #[arg(long = "extension", short, value_name = "NAME")]
        extensions: Vec<String>,
    },

    #[command(about = ABOUT_REPLAY)]
    Replay {
        #[arg(
            long,
            short,
            value_name = "LOCATION_PROVIDER | LOCATION",
            value_parser = LocationProviderType::from_str,
        )]
        location: Option<LocationProviderType>,
        /// Start the provider in high accuracy mode
        #[arg(long)]
        high_accuracy: bool,
        /// Grant the geolocation permission before starting the provider
        #[arg(long)]
        grant_permission: bool,
        /// Delay between two positions
        #[arg(long, short, value_name = "MILLISECONDS")]
        interval: Option<u64>,
        /// Read positions from a file, one per line
        #[arg(long, short, value_name = "FILE")]
        file: Option<PathBuf>,
        #[arg(
            long = "position",
            short,
            value_name = "POSITION",
            help = HELP_POSITION,
            value_parser = GeopositionResult::from_str,
        )]
        positions: Vec<GeopositionResult>,
    },

    #[command(about = ABOUT_METRICS)]
    Metrics {
        /// One of recent-tab, feed-article, most-visited, shortcut
        #[arg(
            required = true,
            value_name = "ACTION",
            value_parser = NewTabPageAction::from_str,
        )]
        actions: Vec<NewTabPageAction>,
    },
}

#[derive(Debug, Clone, Copy, Args)]
#[group(multiple = false)]
pub struct VerbosityArgs {
    #[arg(long, short, display_order(100))]
    pub quiet: bool,
    #[arg(long, short, display_order(100))]
    pub verbose: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Verbosity {
    Quiet,
    #[default]
    Low,
    High,
}

impl From<VerbosityArgs> for Verbosity {
    fn from(t: VerbosityArgs) -> Self {
        match (t.quiet, t.verbose) {
            (true, _) => Self::Quiet,
            (false, true) => Self::High,
            (false, false) => Self::Low,
        }
    }
}

impl Verbosity {
    pub fn level_filter(&self) -> LevelFilter {
        match self {
            Self::Quiet => LevelFilter::WARN,
            Self::Low => LevelFilter::INFO,
            Self::High => LevelFilter::TRACE,
        }
    }
}

pub trait ClapColorChoiceExt {
    fn to_choice(&self) -> anstream::ColorChoice;
}

impl ClapColorChoiceExt for ColorChoice {
    fn to_choice(&self) -> anstream::ColorChoice {
        match self {
            ColorChoice::Auto => anstream::ColorChoice::Auto,
            ColorChoice::Always => anstream::ColorChoice::Always,
            ColorChoice::Never => anstream::ColorChoice::Never,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use anyhow::Result;

    #[test]
    fn verify_cli() {
        CliArgs::command().debug_assert();
    }

    #[test]
    fn replay_args() -> Result<()> {
        let args = CliArgs::try_parse_from([
            "platform-shims",
            "-v",
            "replay",
            "-l",
            "fake",
            "--high-accuracy",
            "-p",
            "1:2",
            "-p",
            "error:timeout",
        ])?;
        assert_eq!(Verbosity::from(args.verbosity), Verbosity::High);
        let ModeArgs::Replay {
            location,
            high_accuracy,
            positions,
            ..
        } = args.mode
        else {
            unreachable!()
        };
        assert_eq!(location, Some(LocationProviderType::Fake));
        assert!(high_accuracy);
        assert_eq!(positions.len(), 2);
        Ok(())
    }

    #[test]
    fn quiet_and_verbose_conflict() {
        let r = CliArgs::try_parse_from([
            "platform-shims",
            "-q",
            "-v",
            "metrics",
            "shortcut",
        ]);
        assert!(r.is_err());
    }

    #[test]
    fn metrics_requires_action() {
        assert!(CliArgs::try_parse_from(["platform-shims", "metrics"]).is_err());
        assert!(CliArgs::try_parse_from(["platform-shims", "metrics", "tab"]).is_err());
    }
}
