use std::sync::atomic::{AtomicBool, Ordering};

use tracing::{debug, info, warn};
use upsdom::{Document, NodeId};
use upsgateway::{ConfigApi, ConfigGateway, PluginConfig};

use crate::errors::OverlayError;
use crate::events::{OverlayEvent, OverlayEventBus};
use crate::host;
use crate::notifier::{Notifier, Severity};
use crate::quick_menu::{MenuAction, MenuToggle, QuickMenu};
use crate::route_watcher::RouteChange;

/// Keyboard shortcuts the embedder forwards while the overlay is attached
/// (Alt+U and Alt+M on the host page).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Shortcut {
    ToggleUpscaling,
    ToggleMenu,
}

/// Orchestrateur de l'overlay :
/// - consomme les transitions de route et les ticks de détection du player,
/// - décide quand injecter ou retirer le bouton,
/// - relie les interactions utilisateur à la configuration distante.
///
/// Two steady states: *Detached* (no button in the document) and *Attached*
/// (button present), plus a pending flag while waiting for the player
/// surface to materialize. The `injected` flag mirrors the button's
/// existence exactly; every DOM mutation is guarded by an existence check
/// so the interleaving of route and probe ticks can never duplicate UI.
pub struct OverlayController<A: ConfigApi> {
    doc: Document,
    gateway: ConfigGateway<A>,
    notifier: Notifier,
    events: OverlayEventBus,
    initialized: AtomicBool,
    injected: AtomicBool,
    probe_armed: AtomicBool,
}

impl<A: ConfigApi> OverlayController<A> {
    pub fn new(doc: Document, gateway: ConfigGateway<A>) -> Self {
        let notifier = Notifier::new(doc.clone());
        Self::with_notifier(doc, gateway, notifier)
    }

    /// Variant with an injected notifier (tests shorten its dismiss delay).
    pub fn with_notifier(doc: Document, gateway: ConfigGateway<A>, notifier: Notifier) -> Self {
        Self {
            doc,
            gateway,
            notifier,
            events: OverlayEventBus::new(),
            initialized: AtomicBool::new(false),
            injected: AtomicBool::new(false),
            probe_armed: AtomicBool::new(false),
        }
    }

    pub fn events(&self) -> &OverlayEventBus {
        &self.events
    }

    pub fn document(&self) -> &Document {
        &self.doc
    }

    /// One-time installation: styles plus the initial route evaluation (the
    /// user may have landed directly on a playback view).
    ///
    /// The overlay code can be delivered into the page more than once by
    /// the host's navigation; every call after the first is refused without
    /// side effects.
    pub fn install(&self, initial_location: &str) -> Result<(), OverlayError> {
        if self.initialized.swap(true, Ordering::SeqCst) {
            info!("Overlay already initialized, ignoring duplicate load");
            return Err(OverlayError::AlreadyInitialized);
        }

        crate::styles::StyleInjector::ensure_styles(&self.doc);
        self.handle_location(initial_location);
        info!(location = initial_location, "Overlay installed");
        Ok(())
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized.load(Ordering::SeqCst)
    }

    /// Tear the overlay back down to its pre-install state (test hook).
    pub fn reset(&self) {
        self.detach();
        self.probe_armed.store(false, Ordering::SeqCst);
        self.initialized.store(false, Ordering::SeqCst);
    }

    pub fn injected(&self) -> bool {
        self.injected.load(Ordering::SeqCst)
    }

    pub fn probe_armed(&self) -> bool {
        self.probe_armed.load(Ordering::SeqCst)
    }

    pub fn handle_route_change(&self, change: &RouteChange) {
        self.handle_location(&change.to);
    }

    fn handle_location(&self, location: &str) {
        if host::is_playback_view(location) {
            if !self.injected() {
                self.probe_armed.store(true, Ordering::SeqCst);
                debug!(location, "Playback view entered, waiting for player");
            }
        } else {
            self.probe_armed.store(false, Ordering::SeqCst);
            if self.injected() {
                debug!(location, "Left playback view, removing overlay UI");
                self.detach();
            }
        }
    }

    /// One pass of the steady-state player detector.
    ///
    /// The media element is the canonical playback signal. On the settings
    /// page (marker present, no media element) a preview surface is kept
    /// available instead so the button has an anchor there too.
    pub fn probe_tick(&self, location: &str) {
        if host::settings_marker_present(&self.doc) && host::find_media_element(&self.doc).is_none()
        {
            if let Some(anchor) = self.ensure_preview_surface() {
                self.inject_button(anchor, true);
            }
            return;
        }

        if !self.probe_armed.load(Ordering::SeqCst) {
            return;
        }

        // The user may have navigated away between ticks; a stale probe
        // must disarm itself, never inject.
        if !host::is_playback_view(location) {
            self.probe_armed.store(false, Ordering::SeqCst);
            debug!(location, "Playback view gone, abandoning player wait");
            return;
        }

        if host::find_media_element(&self.doc).is_some() {
            if let Some(anchor) = host::find_button_anchor(&self.doc) {
                self.inject_button(anchor, false);
                self.probe_armed.store(false, Ordering::SeqCst);
            }
        }
    }

    /// Idempotent injection: at most one button exists no matter how many
    /// attempts race.
    fn inject_button(&self, anchor: NodeId, preview: bool) {
        if self.doc.get_element_by_id(host::BUTTON_ID).is_some() {
            self.injected.store(true, Ordering::SeqCst);
            return;
        }

        let button = self.doc.create_element("button");
        self.doc.set_id(button, host::BUTTON_ID);
        self.doc.add_class(button, "paper-icon-button-light");
        self.doc.set_attr(button, "type", "button");
        self.doc.set_attr(button, "title", "AI Upscaler");

        let icon = self.doc.create_element("span");
        self.doc.add_class(icon, "material-icons");
        self.doc.set_text(icon, "auto_awesome");
        let status = self.doc.create_element("span");
        self.doc.add_class(status, "upscaler-status");
        self.doc.set_text(status, "AI");
        let _ = self.doc.append_child(button, icon);
        let _ = self.doc.append_child(button, status);

        if self.doc.append_child(anchor, button).is_err() {
            // The anchor vanished between probe and injection.
            self.doc.remove(button);
            return;
        }

        self.injected.store(true, Ordering::SeqCst);
        info!(preview, "Overlay button injected");
        self.events.broadcast(OverlayEvent::Attached { preview });
    }

    /// Remove button and menu; both removals tolerate absence.
    fn detach(&self) {
        let mut removed = false;
        if let Some(button) = self.doc.get_element_by_id(host::BUTTON_ID) {
            removed = self.doc.remove(button);
        }
        removed = QuickMenu::close(&self.doc) || removed;
        let was_injected = self.injected.swap(false, Ordering::SeqCst);
        if removed || was_injected {
            info!("Overlay UI removed");
            self.events.broadcast(OverlayEvent::Detached);
        }
    }

    /// Settings-page preview: a placeholder player frame so the button can
    /// be exercised without live playback. Returns its controls row.
    fn ensure_preview_surface(&self) -> Option<NodeId> {
        if self.doc.get_element_by_id(host::PREVIEW_ID).is_some() {
            return upsdom::DomProbe::find_any(&self.doc, &[host::PREVIEW_CONTROLS_SELECTOR]);
        }

        let preview = self.doc.create_element("div");
        self.doc.set_id(preview, host::PREVIEW_ID);
        let frame = self.doc.create_element("div");
        self.doc.add_class(frame, "ai-preview-frame");
        let video = self.doc.create_element("div");
        self.doc.add_class(video, "ai-preview-video");
        self.doc.set_text(video, "\u{1f3ac} Player Preview");
        let controls = self.doc.create_element("div");
        self.doc.add_class(controls, "ai-preview-controls");

        let _ = self.doc.append_child(frame, video);
        let _ = self.doc.append_child(frame, controls);
        let _ = self.doc.append_child(preview, frame);
        if self.doc.append_child(self.doc.body(), preview).is_err() {
            return None;
        }
        info!("Preview player injected on settings page");
        Some(controls)
    }

    /// The button toggles the quick menu.
    pub fn handle_button_click(&self) {
        match QuickMenu::toggle(&self.doc) {
            MenuToggle::Opened(_) => self.events.broadcast(OverlayEvent::MenuOpened),
            MenuToggle::Closed => self.events.broadcast(OverlayEvent::MenuClosed),
        }
    }

    /// Execute a quick-menu action. Follow-ups run after the remote call
    /// resolves: persist, then badge refresh, then menu close.
    pub fn handle_menu_action(&self, action: MenuAction) {
        match action {
            MenuAction::SetScale(factor) => {
                let mut patch = PluginConfig::new();
                match patch.set_scale_factor(factor) {
                    Ok(()) => match self.gateway.update(&patch) {
                        Ok(merged) => {
                            self.notify(
                                &format!("Scale set to {factor}\u{00d7}"),
                                Severity::Success,
                            );
                            self.events.broadcast(OverlayEvent::ConfigChanged {
                                enabled: merged.enable_plugin(),
                                scale: merged.scale_factor(),
                            });
                        }
                        Err(err) => {
                            warn!(factor, error = %err, "Scale update failed");
                        }
                    },
                    Err(err) => {
                        warn!(factor, error = %err, "Refusing scale update");
                    }
                }
                self.close_menu();
            }
            MenuAction::ToggleEnabled => {
                let enabled = !self.gateway.read().enable_plugin();
                let mut patch = PluginConfig::new();
                patch.set_enable_plugin(enabled);
                match self.gateway.update(&patch) {
                    Ok(merged) => {
                        let enabled = merged.enable_plugin();
                        self.refresh_button_state(enabled);
                        self.notify(
                            if enabled { "Upscaling enabled" } else { "Upscaling disabled" },
                            if enabled { Severity::Success } else { Severity::Warning },
                        );
                        self.events.broadcast(OverlayEvent::ConfigChanged {
                            enabled,
                            scale: merged.scale_factor(),
                        });
                    }
                    Err(err) => {
                        warn!(error = %err, "Enable toggle failed");
                    }
                }
                self.close_menu();
            }
            MenuAction::ShowStats => {
                match self.gateway.status() {
                    Ok(payload) => {
                        let pretty = serde_json::to_string_pretty(&payload)
                            .unwrap_or_else(|_| payload.to_string());
                        self.notify(&pretty, Severity::Info);
                    }
                    Err(err) => {
                        debug!(error = %err, "Status fetch failed");
                        self.notify("Stats unavailable", Severity::Warning);
                    }
                }
                self.close_menu();
            }
            MenuAction::Close => self.close_menu(),
        }
    }

    /// Forwarded keyboard shortcut; ignored while detached.
    pub fn handle_shortcut(&self, shortcut: Shortcut) {
        if !self.injected() {
            return;
        }
        match shortcut {
            Shortcut::ToggleUpscaling => self.handle_menu_action(MenuAction::ToggleEnabled),
            Shortcut::ToggleMenu => self.handle_button_click(),
        }
    }

    /// Repaint the ON/OFF badge. Only the enable toggle changes it; scale
    /// selection leaves it alone.
    pub fn refresh_button_state(&self, enabled: bool) {
        let status = self
            .doc
            .query_selector("#aiUpscalerButton .upscaler-status")
            .ok()
            .flatten();
        if let Some(status) = status {
            self.doc.set_text(status, if enabled { "ON" } else { "OFF" });
            self.doc.set_attr(
                status,
                "style",
                if enabled { "color: #00ff88;" } else { "color: #ff6666;" },
            );
        }
    }

    fn close_menu(&self) {
        if QuickMenu::close(&self.doc) {
            self.events.broadcast(OverlayEvent::MenuClosed);
        }
    }

    fn notify(&self, message: &str, severity: Severity) {
        self.notifier.show(message, severity);
        self.events.broadcast(OverlayEvent::Notified {
            message: message.to_string(),
            severity,
        });
    }
}
