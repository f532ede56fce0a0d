//! Navigation watcher.
//!
//! The host exposes no navigation events we could subscribe to, so the
//! location is sampled on a fixed interval. Sampling is a pure read and
//! cannot fail; the thread never stops on its own, page teardown ends it.

use std::sync::Mutex;
use std::thread;
use std::time::Duration;

use tracing::debug;

/// Where the current navigation address comes from.
///
/// Injected so tests can script a navigation sequence without a browser.
pub trait LocationSource: Send + Sync {
    fn current_location(&self) -> String;
}

impl<F> LocationSource for F
where
    F: Fn() -> String + Send + Sync,
{
    fn current_location(&self) -> String {
        self()
    }
}

/// A detected navigation transition.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RouteChange {
    pub from: String,
    pub to: String,
}

/// Samples a [`LocationSource`] and reports transitions.
pub struct RouteWatcher<S: LocationSource> {
    source: S,
    last: Mutex<String>,
}

impl<S: LocationSource> RouteWatcher<S> {
    /// The first sample is taken here, so `sample` only ever reports
    /// genuine transitions, not the initial location.
    pub fn new(source: S) -> Self {
        let initial = source.current_location();
        Self {
            source,
            last: Mutex::new(initial),
        }
    }

    /// Take one sample. Returns the transition when the location differs
    /// from the previous sample (string inequality, no debouncing).
    pub fn sample(&self) -> Option<RouteChange> {
        let current = self.source.current_location();
        let mut last = self.last.lock().unwrap();
        if *last == current {
            return None;
        }
        let change = RouteChange {
            from: std::mem::replace(&mut *last, current.clone()),
            to: current,
        };
        debug!(from = %change.from, to = %change.to, "Route changed");
        Some(change)
    }
}

impl<S: LocationSource + 'static> RouteWatcher<S> {
    /// Spawn the polling thread. It samples forever; there is no stop
    /// handle, the page's teardown is the only way out.
    pub fn spawn(
        self,
        interval: Duration,
        on_change: impl Fn(RouteChange) + Send + 'static,
    ) -> std::io::Result<thread::JoinHandle<()>> {
        thread::Builder::new()
            .name("overlay-route-watcher".into())
            .spawn(move || {
                loop {
                    thread::sleep(interval);
                    if let Some(change) = self.sample() {
                        on_change(change);
                    }
                }
            })
    }
}
