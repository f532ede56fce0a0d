//! Lifecycle controller for the AI Upscaler player overlay.
//!
//! The host is a single-page media application that never reloads; its
//! navigation and markup can only be observed. This crate watches the
//! route, waits for the player surface to materialize, injects the overlay
//! button idempotently, removes it when the user leaves playback, and keeps
//! the enable flag / scale factor synchronized through the host's
//! configuration API.

pub mod controller;
pub mod errors;
pub mod events;
pub mod host;
pub mod notifier;
pub mod quick_menu;
pub mod route_watcher;
pub mod runtime;
pub mod styles;

use std::time::Duration;

pub use controller::{OverlayController, Shortcut};
pub use errors::OverlayError;
pub use events::{OverlayEvent, OverlayEventBus};
pub use notifier::{Notifier, Severity};
pub use quick_menu::{MenuAction, MenuToggle, QuickMenu};
pub use route_watcher::{LocationSource, RouteChange, RouteWatcher};
pub use runtime::OverlayRuntime;
pub use styles::StyleInjector;

/// How often the navigation location is sampled.
pub const ROUTE_POLL_INTERVAL: Duration = Duration::from_millis(500);

/// How often the player probe looks for the media surface.
pub const PLAYER_PROBE_INTERVAL: Duration = Duration::from_millis(1000);

/// How long a notification stays on screen.
pub const NOTIFICATION_TTL: Duration = Duration::from_millis(2500);
