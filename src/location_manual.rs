/*  location_manual.rs -- Manual location provider
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
    location::{LocationProvider, LocationProviderUpdateCallback},
    types::{Accuracy, Geoposition, GeopositionResult, Location, ProviderState},
};
use std::fmt::{self, Debug, Formatter};
use tracing::{debug, info};

/// Serves a location given by the user. The location is published once, on
/// the first start.
pub struct ManualLocationProvider {
    location: Location,
    state: ProviderState,
    is_permission_granted: bool,
    result: Option<GeopositionResult>,
    callback: Option<LocationProviderUpdateCallback>,
}

impl ManualLocationProvider {
    pub fn new(location: Location) -> Self {
        Self {
            location,
            state: Default::default(),
            is_permission_granted: false,
            result: None,
            callback: None,
        }
    }

    pub fn location(&self) -> Location {
        self.location
    }

    pub fn state(&self) -> ProviderState {
        self.state
    }

    pub fn is_permission_granted(&self) -> bool {
        self.is_permission_granted
    }

    fn publish(&mut self) {
        // a user supplied location is exact
        let pos = Geoposition::new(self.location, Accuracy::default());
        info!("manual provider: {}", self.location);
        self.result = Some(pos.into());
        if let (Some(callback), Some(result)) = (&self.callback, &self.result) {
            callback(&*self, result);
        }
    }
}

impl LocationProvider for ManualLocationProvider {
    fn set_update_callback(&mut self, callback: LocationProviderUpdateCallback) {
        self.callback = Some(callback);
    }

    fn start(&mut self, high_accuracy: bool) {
        self.state = if high_accuracy {
            ProviderState::HighAccuracy
        } else {
            ProviderState::LowAccuracy
        };
        debug!("manual provider: {}", self.state);
        if self.result.is_none() {
            self.publish();
        }
    }

    fn stop(&mut self) {
        self.state = ProviderState::Stopped;
        debug!("manual provider: {}", self.state);
    }

    fn position(&self) -> Option<&GeopositionResult> {
        self.result.as_ref()
    }

    fn on_permission_granted(&mut self) {
        self.is_permission_granted = true;
    }
}

impl Debug for ManualLocationProvider {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("ManualLocationProvider")
            .field("location", &self.location)
            .field("state", &self.state)
            .field("is_permission_granted", &self.is_permission_granted)
            .field("result", &self.result)
            .field("callback", &self.callback.is_some())
            .finish()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use anyhow::Result;
    use std::{cell::Cell, rc::Rc};

    #[test]
    fn publishes_once() -> Result<()> {
        let loc = Location::try_from((-33.9, 18.4))?;
        let mut p = ManualLocationProvider::new(loc);
        assert!(p.position().is_none());

        let calls = Rc::new(Cell::new(0));
        let c = calls.clone();
        p.set_update_callback(Box::new(move |_, _| c.set(c.get() + 1)));

        p.start(false);
        assert_eq!(p.state(), ProviderState::LowAccuracy);
        p.stop();
        p.start(true);
        assert_eq!(p.state(), ProviderState::HighAccuracy);
        assert_eq!(calls.get(), 1);

        let pos = p.position().and_then(GeopositionResult::position);
        assert_eq!(pos.map(|p| p.location), Some(loc));
        assert_eq!(pos.map(|p| *p.accuracy), Some(0.0));
        Ok(())
    }
}
