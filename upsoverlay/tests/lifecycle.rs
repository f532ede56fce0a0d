//! End-to-end walks of the overlay lifecycle against a scripted host page.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use serde_json::{Value, json};
use uuid::Uuid;

use upsdom::Document;
use upsgateway::{ConfigApi, ConfigGateway, GatewayError, PluginConfig};
use upsoverlay::host::{BUTTON_ID, PREVIEW_ID, QUICK_MENU_ID, STYLE_BLOCK_ID};
use upsoverlay::{
    MenuAction, Notifier, OverlayController, OverlayError, RouteChange, Shortcut,
};

const HOME: &str = "/web/#/home";
const VIDEO: &str = "/web/#/video/123";
const SETTINGS: &str = "/web/#/configurationpage?name=AI%20Upscaler";

/// In-memory host API; `fail_status` makes the status endpoint unreachable.
struct FakeApi {
    stored: Mutex<PluginConfig>,
    submitted: Mutex<Vec<Value>>,
    fail_status: bool,
}

impl FakeApi {
    fn new(stored: Value) -> Arc<Self> {
        Arc::new(Self {
            stored: Mutex::new(PluginConfig::from_value(stored).unwrap()),
            submitted: Mutex::new(Vec::new()),
            fail_status: false,
        })
    }

    fn failing_status(stored: Value) -> Arc<Self> {
        Arc::new(Self {
            stored: Mutex::new(PluginConfig::from_value(stored).unwrap()),
            submitted: Mutex::new(Vec::new()),
            fail_status: true,
        })
    }

    fn last_submitted(&self) -> Option<Value> {
        self.submitted.lock().unwrap().last().cloned()
    }
}

impl ConfigApi for FakeApi {
    fn fetch(&self, _plugin: &Uuid) -> Result<PluginConfig, GatewayError> {
        Ok(self.stored.lock().unwrap().clone())
    }

    fn submit(&self, _plugin: &Uuid, config: &PluginConfig) -> Result<(), GatewayError> {
        *self.stored.lock().unwrap() = config.clone();
        self.submitted
            .lock()
            .unwrap()
            .push(config.clone().into_value());
        Ok(())
    }

    fn status(&self) -> Result<Value, GatewayError> {
        if self.fail_status {
            Err(GatewayError::HttpIo(std::io::Error::other("refused")))
        } else {
            Ok(json!({ "service": "up", "sessions": 1 }))
        }
    }
}

fn controller_with(
    doc: &Document,
    api: &Arc<FakeApi>,
) -> OverlayController<Arc<FakeApi>> {
    // Long TTL keeps notifications around for the assertions below.
    let notifier = Notifier::with_ttl(doc.clone(), Duration::from_secs(60));
    OverlayController::with_notifier(
        doc.clone(),
        ConfigGateway::new(Arc::clone(api)),
        notifier,
    )
}

/// The host finished building its player: a media element plus the OSD
/// controls container.
fn materialize_player(doc: &Document) {
    let video = doc.create_element("video");
    doc.append_child(doc.body(), video).unwrap();
    let osd = doc.create_element("div");
    doc.add_class(osd, "videoOsdBottom");
    doc.append_child(doc.body(), osd).unwrap();
}

fn route(controller: &OverlayController<Arc<FakeApi>>, from: &str, to: &str) {
    controller.handle_route_change(&RouteChange {
        from: from.to_string(),
        to: to.to_string(),
    });
}

fn notifications(doc: &Document) -> Vec<String> {
    doc.query_selector_all(".ai-upscaler-notify")
        .unwrap()
        .into_iter()
        .filter_map(|node| doc.text(node))
        .collect()
}

#[test]
fn test_attach_then_detach_walk() {
    let doc = Document::new();
    let api = FakeApi::new(json!({}));
    let controller = controller_with(&doc, &api);

    controller.install(HOME).unwrap();
    assert!(!controller.injected());
    assert!(!controller.probe_armed());

    // Entering a playback view arms the player probe but injects nothing.
    route(&controller, HOME, VIDEO);
    assert!(controller.probe_armed());
    controller.probe_tick(VIDEO);
    assert!(!controller.injected());
    assert_eq!(doc.get_element_by_id(BUTTON_ID), None);

    // The player materializes; the next tick attaches.
    materialize_player(&doc);
    controller.probe_tick(VIDEO);
    assert!(controller.injected());
    assert!(doc.get_element_by_id(BUTTON_ID).is_some());

    // Staying inside playback is a no-op.
    route(&controller, VIDEO, "/web/#/video/456");
    assert!(controller.injected());

    // Leaving playback removes button and menu.
    controller.handle_button_click();
    assert!(doc.get_element_by_id(QUICK_MENU_ID).is_some());
    route(&controller, "/web/#/video/456", HOME);
    assert!(!controller.injected());
    assert_eq!(doc.get_element_by_id(BUTTON_ID), None);
    assert_eq!(doc.get_element_by_id(QUICK_MENU_ID), None);
}

#[test]
fn test_injection_is_idempotent_across_duplicate_loads() {
    let doc = Document::new();
    let api = FakeApi::new(json!({}));
    materialize_player(&doc);

    let first = controller_with(&doc, &api);
    first.install(VIDEO).unwrap();
    first.probe_tick(VIDEO);
    assert_eq!(doc.count_matches("button#aiUpscalerButton").unwrap(), 1);

    // Repeated ticks never duplicate the button.
    first.probe_tick(VIDEO);
    first.probe_tick(VIDEO);
    assert_eq!(doc.count_matches("button#aiUpscalerButton").unwrap(), 1);

    // A second controller instance (the SPA re-delivered the overlay into
    // the same page) finds the existing button and leaves it alone.
    let second = controller_with(&doc, &api);
    second.install(VIDEO).unwrap();
    second.probe_tick(VIDEO);
    assert_eq!(doc.count_matches("button#aiUpscalerButton").unwrap(), 1);
}

#[test]
fn test_stale_probe_never_injects_after_navigation() {
    let doc = Document::new();
    let api = FakeApi::new(json!({}));
    let controller = controller_with(&doc, &api);
    controller.install(HOME).unwrap();

    route(&controller, HOME, VIDEO);
    assert!(controller.probe_armed());

    // User navigates away before the player ever appears.
    route(&controller, VIDEO, HOME);
    assert!(!controller.probe_armed());

    // Even with a player in the document, the abandoned probe must not
    // inject; ticks also re-check the location themselves.
    materialize_player(&doc);
    controller.probe_tick(HOME);
    assert_eq!(doc.get_element_by_id(BUTTON_ID), None);
    assert!(!controller.injected());
}

#[test]
fn test_probe_tick_rechecks_location_each_tick() {
    let doc = Document::new();
    let api = FakeApi::new(json!({}));
    let controller = controller_with(&doc, &api);
    controller.install(VIDEO).unwrap();
    assert!(controller.probe_armed());

    // The route thread has not sampled the transition yet, but the probe
    // sees the new location and disarms instead of injecting.
    materialize_player(&doc);
    controller.probe_tick(HOME);
    assert!(!controller.probe_armed());
    assert_eq!(doc.get_element_by_id(BUTTON_ID), None);
}

#[test]
fn test_preview_surface_on_settings_page() {
    let doc = Document::new();
    let marker = doc.create_element("div");
    doc.set_id(marker, "UpscalerConfigurationPage");
    doc.append_child(doc.body(), marker).unwrap();

    let api = FakeApi::new(json!({}));
    let controller = controller_with(&doc, &api);
    controller.install(SETTINGS).unwrap();

    controller.probe_tick(SETTINGS);
    assert!(doc.get_element_by_id(PREVIEW_ID).is_some());
    assert!(doc.get_element_by_id(BUTTON_ID).is_some());
    assert!(controller.injected());

    // Further ticks keep both singletons.
    controller.probe_tick(SETTINGS);
    assert_eq!(doc.count_matches("#aiUpscalerPreviewPlayer").unwrap(), 1);
    assert_eq!(doc.count_matches("#aiUpscalerButton").unwrap(), 1);
}

#[test]
fn test_toggle_persists_and_repaints_badge() {
    let doc = Document::new();
    let api = FakeApi::new(json!({ "EnablePlugin": false, "Model": "esrgan-v2" }));
    materialize_player(&doc);
    let controller = controller_with(&doc, &api);
    controller.install(VIDEO).unwrap();
    controller.probe_tick(VIDEO);

    controller.handle_button_click();
    controller.handle_menu_action(MenuAction::ToggleEnabled);

    assert_eq!(
        api.last_submitted(),
        Some(json!({ "EnablePlugin": true, "Model": "esrgan-v2" }))
    );

    let badge = doc
        .query_selector("#aiUpscalerButton .upscaler-status")
        .unwrap()
        .unwrap();
    assert_eq!(doc.text(badge).as_deref(), Some("ON"));
    assert_eq!(doc.attr(badge, "style").as_deref(), Some("color: #00ff88;"));
    assert_eq!(notifications(&doc), vec!["Upscaling enabled".to_string()]);
    assert_eq!(doc.get_element_by_id(QUICK_MENU_ID), None);

    // Toggling back repaints OFF.
    controller.handle_menu_action(MenuAction::ToggleEnabled);
    assert_eq!(doc.text(badge).as_deref(), Some("OFF"));
    assert_eq!(doc.attr(badge, "style").as_deref(), Some("color: #ff6666;"));
}

#[test]
fn test_scale_selection_leaves_badge_alone() {
    let doc = Document::new();
    let api = FakeApi::new(json!({ "EnablePlugin": true, "ScaleFactor": 2 }));
    materialize_player(&doc);
    let controller = controller_with(&doc, &api);
    controller.install(VIDEO).unwrap();
    controller.probe_tick(VIDEO);

    controller.handle_button_click();
    controller.handle_menu_action(MenuAction::SetScale(3));

    assert_eq!(
        api.last_submitted(),
        Some(json!({ "EnablePlugin": true, "ScaleFactor": 3 }))
    );

    let badge = doc
        .query_selector("#aiUpscalerButton .upscaler-status")
        .unwrap()
        .unwrap();
    assert_eq!(doc.text(badge).as_deref(), Some("AI"));
    assert_eq!(notifications(&doc), vec!["Scale set to 3\u{00d7}".to_string()]);
}

#[test]
fn test_stats_action_reports_payload_or_fallback() {
    let doc = Document::new();
    let api = FakeApi::new(json!({}));
    let controller = controller_with(&doc, &api);
    controller.install(VIDEO).unwrap();
    controller.handle_menu_action(MenuAction::ShowStats);

    let shown = notifications(&doc);
    assert_eq!(shown.len(), 1);
    assert!(shown[0].contains("\"service\": \"up\""));

    let doc = Document::new();
    let api = FakeApi::failing_status(json!({}));
    let controller = controller_with(&doc, &api);
    controller.install(VIDEO).unwrap();
    controller.handle_menu_action(MenuAction::ShowStats);
    assert_eq!(notifications(&doc), vec!["Stats unavailable".to_string()]);
}

#[test]
fn test_duplicate_install_is_rejected() {
    let doc = Document::new();
    let api = FakeApi::new(json!({}));
    let controller = controller_with(&doc, &api);

    controller.install(HOME).unwrap();
    assert!(controller.is_initialized());
    assert!(matches!(
        controller.install(HOME),
        Err(OverlayError::AlreadyInitialized)
    ));

    // Styles were only installed once either way.
    assert_eq!(doc.count_matches("style").unwrap(), 1);
    assert!(doc.get_element_by_id(STYLE_BLOCK_ID).is_some());

    // reset() restores the pre-install state for the next load.
    controller.reset();
    assert!(!controller.is_initialized());
    controller.install(HOME).unwrap();
}

#[test]
fn test_shortcuts_ignored_while_detached() {
    let doc = Document::new();
    let api = FakeApi::new(json!({ "EnablePlugin": false }));
    let controller = controller_with(&doc, &api);
    controller.install(HOME).unwrap();

    controller.handle_shortcut(Shortcut::ToggleMenu);
    assert_eq!(doc.get_element_by_id(QUICK_MENU_ID), None);
    controller.handle_shortcut(Shortcut::ToggleUpscaling);
    assert_eq!(api.last_submitted(), None);

    // Attached, the same shortcuts work.
    materialize_player(&doc);
    route(&controller, HOME, VIDEO);
    controller.probe_tick(VIDEO);
    controller.handle_shortcut(Shortcut::ToggleMenu);
    assert!(doc.get_element_by_id(QUICK_MENU_ID).is_some());
    controller.handle_shortcut(Shortcut::ToggleUpscaling);
    assert_eq!(
        api.last_submitted(),
        Some(json!({ "EnablePlugin": true }))
    );
}
