/*  lib.rs -- Main program
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

mod cli;
mod config;
mod error;
mod types;
mod types_display;
mod types_parse;
mod utils;

pub mod compliance;
pub mod location;
pub mod location_fake;
pub mod location_manual;
pub mod ntp_metrics;

pub use cli::cli_args_command;
pub use error::{ShimError, ShimErrorKind};
pub use types::{
    Accuracy, Geoposition, GeopositionError, GeopositionErrorCode,
    GeopositionResult, Heading, Location, LocationProviderType,
    ProviderState, Speed,
};

use crate::{
    cli::ClapColorChoiceExt,
    compliance::{ExtensionRegistry, SystemPaths},
    config::{Config, ConfigBuilder, Mode, ReplayConfig},
    error::{LineError, ReplayError},
    location::{LocationProvider, LocationProviderKind},
    location_fake::FakeLocationProvider,
    ntp_metrics::{NewTabPageAction, NewTabPageMetricsRecorder},
    types_display::HEADER,
    utils::CollectResult,
};
use anstream::AutoStream;
use chrono::Utc;
use itertools::Itertools;
use std::{
    fs, io,
    path::Path,
    sync::mpsc::{self, Receiver, RecvTimeoutError},
    time::Duration,
};
use tracing::{error, info, level_filters::LevelFilter, Level, Subscriber};
use tracing_subscriber::{
    fmt::{writer::MakeWriterExt, MakeWriter},
    util::SubscriberInitExt,
};

pub fn main() {
    let res = (|| -> Result<(), ShimError> {
        let c = ConfigBuilder::new(|verbosity, color| {
            let choice = color.to_choice();
            let stdout = move || AutoStream::new(io::stdout(), choice).lock();
            let stderr = move || AutoStream::new(io::stderr(), choice).lock();
            let stdio = stderr.with_max_level(Level::WARN).or_else(stdout);
            logger(stdio, verbosity.level_filter()).init();
        })?
        .build()?;

        let (tx, rx) = mpsc::channel();
        ctrlc::set_handler(move || {
            // the receiver is gone once the replay is over
            let _ = tx.send(());
        })
        .or_else(|e| match c.mode {
            Mode::Check { .. } | Mode::Metrics(_) => Ok(()),
            Mode::Replay(_) => Err(e),
        })?;

        run(&c, &rx)
    })();

    if let Err(e) = res {
        error!("{e}");
        std::process::exit(e.exit_code());
    }
}

fn logger<W>(
    writer: W,
    level: LevelFilter,
) -> impl Subscriber + Send + Sync + 'static
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    tracing_subscriber::fmt()
        .with_writer(writer)
        .with_max_level(level)
        .without_time()
        .with_level(false)
        .with_target(false)
        .finish()
}

fn run(c: &Config, sig: &Receiver<()>) -> Result<(), ShimError> {
    match &c.mode {
        Mode::Check { paths, registry } => run_check_mode(paths, registry),
        Mode::Replay(r) => run_replay_mode(r, sig).map(drop),
        Mode::Metrics(actions) => {
            run_metrics_mode(actions);
            Ok(())
        }
    }
}

fn run_check_mode(
    paths: &impl SystemPaths,
    registry: &impl ExtensionRegistry,
) -> Result<(), ShimError> {
    let reports = compliance::run_all(paths, registry)?;
    info!("{HEADER}Compliance{HEADER:#}:\n{}", reports.iter().join("\n"));
    Ok(())
}

fn run_metrics_mode(actions: &[NewTabPageAction]) -> NewTabPageMetricsRecorder {
    let mut recorder = NewTabPageMetricsRecorder::new();
    for a in actions {
        a.notify(&mut recorder);
    }
    info!("{HEADER}Summary{HEADER:#}:\n{recorder}");
    recorder
}

/// Returns the stopped provider
fn run_replay_mode(
    c: &ReplayConfig,
    sig: &Receiver<()>,
) -> Result<LocationProviderKind, ShimError> {
    let mut positions = c.positions.clone();
    if let Some(path) = &c.file {
        positions.extend(read_positions(path)?);
    }

    let mut provider = LocationProviderKind::from(c.location.clone());
    if matches!(provider, LocationProviderKind::Manual(_))
        && !positions.is_empty()
    {
        Err(ReplayError::ManualProvider)?
    }

    if c.grant_permission {
        provider.on_permission_granted();
    }
    provider.set_update_callback(Box::new(|_, r| info!("{r}")));
    provider.start(c.high_accuracy);
    info!("{HEADER}Provider{HEADER:#}: {}", provider.state());

    if let LocationProviderKind::Fake(fake) = &mut provider {
        feed_positions(fake, positions, c.interval, sig)?;
    }

    provider.stop();
    info!("{HEADER}Provider{HEADER:#}: {}", provider.state());
    Ok(provider)
}

/// Hand the positions to the provider one `interval` apart, each stamped
/// with its delivery time. Returns how many were delivered before the end
/// or a ctrl-c.
fn feed_positions(
    fake: &mut FakeLocationProvider,
    positions: Vec<GeopositionResult>,
    interval: Duration,
    sig: &Receiver<()>,
) -> Result<usize, ShimError> {
    let mut positions = positions.into_iter().peekable();
    let mut n = 0;
    while let Some(p) = positions.next() {
        let p = match p {
            GeopositionResult::Position(p) => {
                p.with_timestamp(Utc::now()).into()
            }
            e @ GeopositionResult::Error(_) => e,
        };
        fake.handle_position_changed(p);
        n += 1;
        if positions.peek().is_none() {
            break;
        }
        // wait for the next position or stop on ctrl-c
        match sig.recv_timeout(interval) {
            Err(RecvTimeoutError::Timeout) => {}
            Err(e) => Err(e)?,
            Ok(()) => {
                info!("interrupted");
                break;
            }
        }
    }
    Ok(n)
}

/// One position per line. Blank lines and lines starting with `#` are
/// ignored.
fn read_positions(path: &Path) -> Result<Vec<GeopositionResult>, ReplayError> {
    let buf = fs::read_to_string(path)
        .map_err(|e| ReplayError::OpenFailed(e, path.into()))?;
    buf.lines()
        .enumerate()
        .map(|(i, l)| (i + 1, l.trim()))
        .filter(|(_, l)| !l.is_empty() && !l.starts_with('#'))
        .map(|(line, l)| l.parse().map_err(|err| LineError { line, err }))
        .collect_result()
        .map_err(|e| ReplayError::InvalidLines(e, path.into()))
}
