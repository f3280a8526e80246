/*  location.rs -- Location provider interface
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
    location_fake::FakeLocationProvider,
    location_manual::ManualLocationProvider,
    types::{GeopositionResult, LocationProviderType, ProviderState},
};

/// Called synchronously, on the thread that supplied the update, with the
/// provider and its new position
pub type LocationProviderUpdateCallback =
    Box<dyn Fn(&dyn LocationProvider, &GeopositionResult)>;

/// A source of position updates. Consumers hold it behind this trait and
/// can't tell a real provider from a fake one.
pub trait LocationProvider {
    /// Replace the callback that receives new positions. Only one callback is
    /// kept; the previous one is dropped.
    fn set_update_callback(&mut self, callback: LocationProviderUpdateCallback);

    /// Start providing updates. Calling it again switches the accuracy.
    fn start(&mut self, high_accuracy: bool);

    fn stop(&mut self);

    /// The most recent position, if any was received
    fn position(&self) -> Option<&GeopositionResult>;

    /// The embedder granted the geolocation permission. Providers that need
    /// it for network requests may begin using it from now on.
    fn on_permission_granted(&mut self);
}

/// Providers selectable from the command line and the configuration file
#[derive(Debug)]
pub enum LocationProviderKind {
    Manual(ManualLocationProvider),
    Fake(FakeLocationProvider),
}

impl LocationProviderKind {
    pub fn state(&self) -> ProviderState {
        match self {
            Self::Manual(t) => t.state(),
            Self::Fake(t) => t.state(),
        }
    }

    pub fn is_permission_granted(&self) -> bool {
        match self {
            Self::Manual(t) => t.is_permission_granted(),
            Self::Fake(t) => t.is_permission_granted(),
        }
    }
}

impl From<LocationProviderType> for LocationProviderKind {
    fn from(t: LocationProviderType) -> Self {
        match t {
            LocationProviderType::Manual(l) => {
                Self::Manual(ManualLocationProvider::new(l))
            }
            LocationProviderType::Fake => Self::Fake(Default::default()),
        }
    }
}

impl LocationProvider for LocationProviderKind {
    fn set_update_callback(&mut self, callback: LocationProviderUpdateCallback) {
        match self {
            Self::Manual(t) => t.set_update_callback(callback),
            Self::Fake(t) => t.set_update_callback(callback),
        }
    }

    fn start(&mut self, high_accuracy: bool) {
        match self {
            Self::Manual(t) => t.start(high_accuracy),
            Self::Fake(t) => t.start(high_accuracy),
        }
    }

    fn stop(&mut self) {
        match self {
            Self::Manual(t) => t.stop(),
            Self::Fake(t) => t.stop(),
        }
    }

    fn position(&self) -> Option<&GeopositionResult> {
        match self {
            Self::Manual(t) => t.position(),
            Self::Fake(t) => t.position(),
        }
    }

    fn on_permission_granted(&mut self) {
        match self {
            Self::Manual(t) => t.on_permission_granted(),
            Self::Fake(t) => t.on_permission_granted(),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::types::Location;
    use anyhow::Result;
    use std::{cell::Cell, rc::Rc};

    #[test]
    fn kind_from_type() -> Result<()> {
        let fake = LocationProviderKind::from(LocationProviderType::Fake);
        assert!(matches!(fake, LocationProviderKind::Fake(_)));

        let loc = Location::try_from((35.7, 51.4))?;
        let manual = LocationProviderKind::from(LocationProviderType::Manual(loc));
        assert!(matches!(manual, LocationProviderKind::Manual(_)));
        Ok(())
    }

    #[test]
    fn kind_dispatches_to_provider() -> Result<()> {
        let loc = Location::try_from((35.7, 51.4))?;
        let mut p = LocationProviderKind::from(LocationProviderType::Manual(loc));
        let calls = Rc::new(Cell::new(0));
        let c = calls.clone();
        p.set_update_callback(Box::new(move |_, _| c.set(c.get() + 1)));

        assert_eq!(p.state(), ProviderState::Stopped);
        p.start(true);
        assert_eq!(p.state(), ProviderState::HighAccuracy);
        assert_eq!(calls.get(), 1);
        assert_eq!(
            p.position().and_then(|r| r.position()).map(|p| p.location),
            Some(loc)
        );

        p.on_permission_granted();
        assert!(p.is_permission_granted());
        p.stop();
        assert_eq!(p.state(), ProviderState::Stopped);
        Ok(())
    }
}
