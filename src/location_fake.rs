/*  location_fake.rs -- Location provider for tests
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
    types::{GeopositionResult, ProviderState},
};
use std::fmt::{self, Debug, Formatter};
use tracing::{debug, trace};

/// Does not read any sensor. Positions are supplied by the caller through
/// [FakeLocationProvider::handle_position_changed].
#[derive(Default)]
pub struct FakeLocationProvider {
    state: ProviderState,
    is_permission_granted: bool,
    result: Option<GeopositionResult>,
    callback: Option<LocationProviderUpdateCallback>,
}

impl FakeLocationProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store the new position and pass it on to the registered callback
    pub fn handle_position_changed(&mut self, result: GeopositionResult) {
        trace!("fake provider: position changed: {result:?}");
        self.result = Some(result);
        if let (Some(callback), Some(result)) = (&self.callback, &self.result) {
            callback(&*self, result);
        }
    }

    pub fn state(&self) -> ProviderState {
        self.state
    }

    pub fn is_permission_granted(&self) -> bool {
        self.is_permission_granted
    }
}

impl LocationProvider for FakeLocationProvider {
    fn set_update_callback(&mut self, callback: LocationProviderUpdateCallback) {
        self.callback = Some(callback);
    }

    fn start(&mut self, high_accuracy: bool) {
        self.state = if high_accuracy {
            ProviderState::HighAccuracy
        } else {
            ProviderState::LowAccuracy
        };
        debug!("fake provider: {}", self.state);
    }

    fn stop(&mut self) {
        self.state = ProviderState::Stopped;
        debug!("fake provider: {}", self.state);
    }

    fn position(&self) -> Option<&GeopositionResult> {
        self.result.as_ref()
    }

    fn on_permission_granted(&mut self) {
        self.is_permission_granted = true;
    }
}

impl Debug for FakeLocationProvider {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("FakeLocationProvider")
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
    use crate::types::{
        Accuracy, Geoposition, GeopositionError, GeopositionErrorCode,
        Location,
    };
    use anyhow::Result;
    use std::{cell::RefCell, rc::Rc};

    fn position(lat: f64, lon: f64) -> Result<GeopositionResult> {
        let loc = Location::try_from((lat, lon))?;
        Ok(Geoposition::new(loc, Accuracy::try_from(10.0)?).into())
    }

    #[test]
    fn initial_state() {
        let p = FakeLocationProvider::new();
        assert_eq!(p.state(), ProviderState::Stopped);
        assert!(!p.is_permission_granted());
        assert!(p.position().is_none());
    }

    #[test]
    fn state_follows_last_call() {
        use ProviderState::*;
        let mut p = FakeLocationProvider::new();
        let calls: [(Option<bool>, ProviderState); 7] = [
            (Some(true), HighAccuracy),
            (Some(true), HighAccuracy),
            (Some(false), LowAccuracy),
            (None, Stopped),
            (None, Stopped),
            (Some(false), LowAccuracy),
            (Some(true), HighAccuracy),
        ];
        for (call, expected) in calls {
            match call {
                Some(high_accuracy) => p.start(high_accuracy),
                None => p.stop(),
            }
            assert_eq!(p.state(), expected);
        }
    }

    #[test]
    fn position_without_callback() -> Result<()> {
        let mut p = FakeLocationProvider::new();
        let r = position(1.0, 2.0)?;
        p.handle_position_changed(r.clone());
        assert_eq!(p.position(), Some(&r));
        Ok(())
    }

    #[test]
    fn callback_invoked_once_per_update() -> Result<()> {
        let mut p = FakeLocationProvider::new();
        let received = Rc::new(RefCell::new(Vec::new()));
        let r = received.clone();
        p.set_update_callback(Box::new(move |provider, result| {
            // the provider already holds the new position
            assert_eq!(provider.position(), Some(result));
            r.borrow_mut().push(result.clone());
        }));

        let r1 = position(1.0, 2.0)?;
        p.handle_position_changed(r1.clone());
        assert_eq!(*received.borrow(), vec![r1.clone()]);

        let code = GeopositionErrorCode::PositionUnavailable;
        let r2: GeopositionResult =
            GeopositionError::new(code, code.default_message()).into();
        p.handle_position_changed(r2.clone());
        assert_eq!(*received.borrow(), vec![r1, r2.clone()]);
        assert_eq!(p.position(), Some(&r2));
        Ok(())
    }

    #[test]
    fn replacing_callback_drops_previous() -> Result<()> {
        let mut p = FakeLocationProvider::new();
        let first = Rc::new(RefCell::new(0));
        let second = Rc::new(RefCell::new(0));
        let f = first.clone();
        p.set_update_callback(Box::new(move |_, _| *f.borrow_mut() += 1));
        let s = second.clone();
        p.set_update_callback(Box::new(move |_, _| *s.borrow_mut() += 1));

        p.handle_position_changed(position(1.0, 2.0)?);
        assert_eq!(*first.borrow(), 0);
        assert_eq!(*second.borrow(), 1);
        // the provider no longer owns the first closure
        assert_eq!(Rc::strong_count(&first), 1);
        Ok(())
    }

    #[test]
    fn permission_is_monotonic() {
        let mut p = FakeLocationProvider::new();
        p.on_permission_granted();
        assert!(p.is_permission_granted());
        p.start(true);
        p.stop();
        p.on_permission_granted();
        assert!(p.is_permission_granted());
    }

    #[test]
    fn start_update_stop() -> Result<()> {
        let mut p = FakeLocationProvider::new();
        assert_eq!(p.state(), ProviderState::Stopped);
        p.start(true);
        assert_eq!(p.state(), ProviderState::HighAccuracy);

        let received = Rc::new(RefCell::new(None));
        let r = received.clone();
        p.set_update_callback(Box::new(move |_, result| {
            *r.borrow_mut() = Some(result.clone());
        }));
        let pos = position(1.0, 2.0)?;
        p.handle_position_changed(pos.clone());
        assert_eq!(*received.borrow(), Some(pos.clone()));

        p.stop();
        assert_eq!(p.state(), ProviderState::Stopped);
        assert_eq!(p.position(), Some(&pos));
        Ok(())
    }
}
