/*  config.rs -- Hierarchical configuration
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
    cli::{CliArgs, ModeArgs, Verbosity},
    compliance::{DirectoryPaths, StaticExtensionRegistry},
    error::config::{ConfigError, ConfigFileError},
    ntp_metrics::NewTabPageAction,
    types::{GeopositionResult, LocationProviderType, DEFAULT_REPLAY_INTERVAL},
};
use clap::{ColorChoice, Parser};
use const_format::formatcp;
use serde::{de, Deserialize, Deserializer};
use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

pub const PKG_NAME: &str = env!("CARGO_PKG_NAME");

/// Merge of cli arguments and config files from highest priority to lowest:
/// 1. CLI arguments
/// 2. User config file
/// 3. System config file (Unix-like OS's only)
/// 4. Default values
#[derive(Debug)]
pub struct Config {
    pub mode: Mode,
}

#[derive(Debug)]
pub enum Mode {
    Check {
        paths: DirectoryPaths,
        registry: StaticExtensionRegistry,
    },
    Replay(ReplayConfig),
    Metrics(Vec<NewTabPageAction>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReplayConfig {
    pub location: LocationProviderType,
    pub high_accuracy: bool,
    pub grant_permission: bool,
    pub interval: Duration,
    pub file: Option<PathBuf>,
    pub positions: Vec<GeopositionResult>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
enum ModeType {
    #[default]
    Check,
    Replay,
    Metrics,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConfigBuilder {
    mode: ModeType,

    content_dir: Option<PathBuf>,
    extensions: Vec<String>,

    location: LocationProviderType,
    high_accuracy: bool,
    grant_permission: bool,
    interval: Duration,
    file: Option<PathBuf>,
    positions: Vec<GeopositionResult>,

    actions: Vec<NewTabPageAction>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
struct ConfigFile {
    content_dir: Option<PathBuf>,
    extensions: Option<Vec<String>>,
    location: Option<LocationProviderType>,
    high_accuracy: Option<bool>,
    grant_permission: Option<bool>,
    /// Milliseconds
    interval: Option<u64>,
}

impl ConfigBuilder {
    /// Parse the command line, let the caller set up logging according to
    /// it, then read the config files
    pub fn new(
        f: impl FnOnce(Verbosity, ColorChoice),
    ) -> Result<Self, ConfigError> {
        let cli_args = CliArgs::parse();
        let mut cfg = Self::default();
        f(cli_args.verbosity.into(), cli_args.color.unwrap_or_default());

        let config_file = ConfigFile::new(cli_args.config.as_deref())?;
        cfg.merge_with_config_file(config_file);
        cfg.merge_with_cli_args(cli_args);
        Ok(cfg)
    }

    pub fn build(self) -> Result<Config, ConfigError> {
        let Self {
            mode,
            content_dir,
            extensions,
            location,
            high_accuracy,
            grant_permission,
            interval,
            file,
            positions,
            actions,
        } = self;

        let mode = match mode {
            ModeType::Check => Mode::Check {
                paths: DirectoryPaths {
                    content_dir: content_dir.ok_or(ConfigError::NoContentDir)?,
                },
                registry: StaticExtensionRegistry { extensions },
            },
            ModeType::Replay => Mode::Replay(ReplayConfig {
                location,
                high_accuracy,
                grant_permission,
                interval,
                file,
                positions,
            }),
            ModeType::Metrics => Mode::Metrics(actions),
        };

        Ok(Config { mode })
    }

    fn merge_with_cli_args(&mut self, cli_args: CliArgs) {
        let CliArgs {
            mode,
            config: _,
            verbosity: _,
            color: _,
        } = cli_args;

        match mode {
            ModeArgs::Check {
                content_dir,
                extensions,
            } => {
                if let Some(t) = content_dir {
                    self.content_dir = Some(t);
                }
                if !extensions.is_empty() {
                    self.extensions = extensions;
                }
                self.mode = ModeType::Check;
            }
            ModeArgs::Replay {
                location,
                high_accuracy,
                grant_permission,
                interval,
                file,
                positions,
            } => {
                if let Some(t) = location {
                    self.location = t;
                }
                if high_accuracy {
                    self.high_accuracy = true;
                }
                if grant_permission {
                    self.grant_permission = true;
                }
                if let Some(t) = interval {
                    self.interval = Duration::from_millis(t);
                }
                self.file = file;
                self.positions = positions;
                self.mode = ModeType::Replay;
            }
            ModeArgs::Metrics { actions } => {
                self.actions = actions;
                self.mode = ModeType::Metrics;
            }
        }
    }

    fn merge_with_config_file(&mut self, config: ConfigFile) {
        let ConfigFile {
            content_dir,
            extensions,
            location,
            high_accuracy,
            grant_permission,
            interval,
        } = config;

        if let Some(t) = content_dir {
            self.content_dir = Some(t);
        }
        if let Some(t) = extensions {
            self.extensions = t;
        }
        if let Some(t) = location {
            self.location = t;
        }
        if let Some(t) = high_accuracy {
            self.high_accuracy = t;
        }
        if let Some(t) = grant_permission {
            self.grant_permission = t;
        }
        if let Some(t) = interval {
            self.interval = Duration::from_millis(t);
        }
    }
}

impl ConfigFile {
    fn new(config_path: Option<&Path>) -> Result<Self, ConfigFileError> {
        #[cfg(unix)]
        let system_config =
            Path::new(formatcp!("/etc/{PKG_NAME}/config.toml"));
        let local_config =
            dirs::config_dir().map(|d| d.join(PKG_NAME).join("config.toml"));
        let user_config = config_path
            .map(|p| match p.is_file() {
                true => Ok(p),
                false => Err(ConfigFileError::PathNotFile(p.into())),
            })
            .transpose()?
            .or(local_config.as_deref())
            .ok_or(ConfigFileError::ConfigDirNotFound)?;

        let mut config = Self::default();
        #[cfg(unix)]
        config.merge(Self::read(system_config)?);
        config.merge(Self::read(user_config)?);
        Ok(config)
    }

    /// A missing file is an empty config
    fn read(path: &Path) -> Result<Self, ConfigFileError> {
        if !path.is_file() {
            return Ok(Self::default());
        }
        let buf = fs::read_to_string(path)
            .map_err(|e| ConfigFileError::OpenFailed(e, path.into()))?;
        toml::from_str(&buf)
            .map_err(|e| ConfigFileError::DeserializeFailed(e, path.into()))
    }

    fn merge(&mut self, other: Self) {
        let Self {
            content_dir,
            extensions,
            location,
            high_accuracy,
            grant_permission,
            interval,
        } = other;

        if let Some(t) = content_dir {
            self.content_dir = Some(t);
        }
        if let Some(t) = extensions {
            self.extensions = Some(t);
        }
        if let Some(t) = location {
            self.location = Some(t);
        }
        if let Some(t) = high_accuracy {
            self.high_accuracy = Some(t);
        }
        if let Some(t) = grant_permission {
            self.grant_permission = Some(t);
        }
        if let Some(t) = interval {
            self.interval = Some(t);
        }
    }
}

//

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self {
            mode: Default::default(),
            content_dir: Default::default(),
            extensions: Default::default(),
            location: Default::default(),
            high_accuracy: Default::default(),
            grant_permission: Default::default(),
            interval: Duration::from_millis(DEFAULT_REPLAY_INTERVAL),
            file: Default::default(),
            positions: Default::default(),
            actions: Default::default(),
        }
    }
}

impl<'de> Deserialize<'de> for LocationProviderType {
    fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        String::deserialize(d)?.parse().map_err(de::Error::custom)
    }
}
