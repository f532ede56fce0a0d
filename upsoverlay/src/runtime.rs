//! Thread wiring for live pages.
//!
//! Two fixed-interval pollers drive the controller: one samples the
//! navigation location, one runs the player detector. Neither is
//! cancellable; they live until page teardown, like every other watcher in
//! this stack. Tests bypass this module entirely and call the controller's
//! tick methods directly.

use std::io;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use upsgateway::ConfigApi;

use crate::controller::OverlayController;
use crate::route_watcher::{LocationSource, RouteWatcher};
use crate::{PLAYER_PROBE_INTERVAL, ROUTE_POLL_INTERVAL};

/// Handles of the two polling threads.
pub struct OverlayRuntime {
    pub route: thread::JoinHandle<()>,
    pub probe: thread::JoinHandle<()>,
}

impl OverlayRuntime {
    /// Spawn both pollers with the default intervals.
    pub fn spawn<A: ConfigApi + 'static>(
        controller: Arc<OverlayController<A>>,
        source: Arc<dyn LocationSource>,
    ) -> io::Result<Self> {
        Self::spawn_with_intervals(controller, source, ROUTE_POLL_INTERVAL, PLAYER_PROBE_INTERVAL)
    }

    pub fn spawn_with_intervals<A: ConfigApi + 'static>(
        controller: Arc<OverlayController<A>>,
        source: Arc<dyn LocationSource>,
        route_interval: Duration,
        probe_interval: Duration,
    ) -> io::Result<Self> {
        let route_source = Arc::clone(&source);
        let route_controller = Arc::clone(&controller);
        let watcher = RouteWatcher::new(move || route_source.current_location());
        let route = watcher.spawn(route_interval, move |change| {
            route_controller.handle_route_change(&change);
        })?;

        let probe = thread::Builder::new()
            .name("overlay-player-probe".into())
            .spawn(move || {
                loop {
                    thread::sleep(probe_interval);
                    controller.probe_tick(&source.current_location());
                }
            })?;

        Ok(Self { route, probe })
    }
}
