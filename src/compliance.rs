/*  compliance.rs -- Crash reporting configuration checks
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
    error::{ComplianceError, VecError},
    utils::CollectResult,
};
use std::path::{Path, PathBuf};
use tracing::debug;

pub const CRASH_HANDLER_EXTENSION_NAME: &str =
    "dev.cobalt.extension.CrashHandler";
/// Location of the crash upload certificates, relative to the content
/// directory
pub const UPLOAD_CERT_SUBPATH: [&str; 5] =
    ["app", "cobalt", "content", "ssl", "certs"];

/// Well known directories of the platform
pub trait SystemPaths {
    fn content_directory(&self) -> Option<PathBuf>;
}

/// Optional platform capabilities, looked up by name
pub trait ExtensionRegistry {
    fn get_extension(&self, name: &str) -> Option<&str>;
}

/// A content directory given on the command line or in the config file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryPaths {
    pub content_dir: PathBuf,
}

/// Extensions registered through the command line or the config file
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StaticExtensionRegistry {
    pub extensions: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckOutcome {
    Passed(String),
    Skipped(&'static str),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckReport {
    pub name: &'static str,
    pub outcome: CheckOutcome,
}

impl SystemPaths for DirectoryPaths {
    fn content_directory(&self) -> Option<PathBuf> {
        Some(self.content_dir.clone())
    }
}

impl ExtensionRegistry for StaticExtensionRegistry {
    fn get_extension(&self, name: &str) -> Option<&str> {
        self.extensions
            .iter()
            .map(String::as_str)
            .find(|e| *e == name)
    }
}

pub fn upload_cert_dir(content_dir: &Path) -> PathBuf {
    UPLOAD_CERT_SUBPATH
        .iter()
        .fold(content_dir.to_path_buf(), |p, s| p.join(s))
}

/// The crash upload certificates must be shipped with the content
pub fn verify_upload_cert(
    paths: &impl SystemPaths,
) -> Result<CheckOutcome, ComplianceError> {
    if cfg!(android) {
        return Ok(CheckOutcome::Skipped("not applicable to AOSP"));
    }

    let content = paths
        .content_directory()
        .ok_or(ComplianceError::ContentDirUnavailable)?;
    let certs = upload_cert_dir(&content);
    debug!("looking for certificates in {}", certs.display());
    if certs.exists() {
        Ok(CheckOutcome::Passed(certs.display().to_string()))
    } else {
        Err(ComplianceError::CertDirMissing(certs))
    }
}

pub fn verify_crash_handler_extension(
    registry: &impl ExtensionRegistry,
) -> Result<CheckOutcome, ComplianceError> {
    registry
        .get_extension(CRASH_HANDLER_EXTENSION_NAME)
        .map(|e| CheckOutcome::Passed(e.to_string()))
        .ok_or(ComplianceError::ExtensionMissing(CRASH_HANDLER_EXTENSION_NAME))
}

/// Run every check, reporting all failures instead of stopping at the first
pub fn run_all(
    paths: &impl SystemPaths,
    registry: &impl ExtensionRegistry,
) -> Result<Vec<CheckReport>, VecError<ComplianceError>> {
    let report = |name, r: Result<CheckOutcome, ComplianceError>| {
        r.map(|outcome| CheckReport { name, outcome })
    };

    [
        report("upload certificates", verify_upload_cert(paths)),
        report(
            "crash handler extension",
            verify_crash_handler_extension(registry),
        ),
    ]
    .into_iter()
    .collect_result()
}

#[cfg(test)]
mod test {
    use super::*;
    use anyhow::Result;
    use std::fs;

    struct NoContentDir;
    impl SystemPaths for NoContentDir {
        fn content_directory(&self) -> Option<PathBuf> {
            None
        }
    }

    fn registry(names: &[&str]) -> StaticExtensionRegistry {
        StaticExtensionRegistry {
            extensions: names.iter().map(ToString::to_string).collect(),
        }
    }

    #[test]
    fn cert_dir_layout() {
        let p = upload_cert_dir(Path::new("/content"));
        assert_eq!(p, Path::new("/content/app/cobalt/content/ssl/certs"));
    }

    #[cfg(not(android))]
    #[test]
    fn cert_dir_present() -> Result<()> {
        let tmp = tempfile::tempdir()?;
        fs::create_dir_all(upload_cert_dir(tmp.path()))?;
        let paths = DirectoryPaths {
            content_dir: tmp.path().to_path_buf(),
        };
        assert!(matches!(
            verify_upload_cert(&paths)?,
            CheckOutcome::Passed(_)
        ));
        Ok(())
    }

    #[cfg(not(android))]
    #[test]
    fn cert_dir_missing() -> Result<()> {
        let tmp = tempfile::tempdir()?;
        // only part of the path exists
        fs::create_dir_all(tmp.path().join("app").join("cobalt"))?;
        let paths = DirectoryPaths {
            content_dir: tmp.path().to_path_buf(),
        };
        let err = verify_upload_cert(&paths).unwrap_err();
        assert!(
            matches!(err, ComplianceError::CertDirMissing(p) if p == upload_cert_dir(tmp.path()))
        );

        assert!(matches!(
            verify_upload_cert(&NoContentDir),
            Err(ComplianceError::ContentDirUnavailable)
        ));
        Ok(())
    }

    #[test]
    fn crash_handler_registered() -> Result<()> {
        let r = registry(&["dev.cobalt.extension.Graphics", CRASH_HANDLER_EXTENSION_NAME]);
        assert_eq!(
            verify_crash_handler_extension(&r)?,
            CheckOutcome::Passed(CRASH_HANDLER_EXTENSION_NAME.into())
        );
        assert!(matches!(
            verify_crash_handler_extension(&registry(&[])),
            Err(ComplianceError::ExtensionMissing(CRASH_HANDLER_EXTENSION_NAME))
        ));
        Ok(())
    }

    #[cfg(not(android))]
    #[test]
    fn run_all_collects_every_failure() -> Result<()> {
        let tmp = tempfile::tempdir()?;
        let paths = DirectoryPaths {
            content_dir: tmp.path().to_path_buf(),
        };
        let err = run_all(&paths, &registry(&[])).unwrap_err();
        assert_eq!(err.0.len(), 2);

        fs::create_dir_all(upload_cert_dir(tmp.path()))?;
        let reports = run_all(&paths, &registry(&[CRASH_HANDLER_EXTENSION_NAME]))?;
        assert_eq!(reports.len(), 2);
        assert_eq!(reports[1].name, "crash handler extension");
        Ok(())
    }
}
