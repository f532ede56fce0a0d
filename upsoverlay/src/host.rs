//! Contract with the host page.
//!
//! Everything here is best-effort: the host's markup and routing scheme are
//! not under our control, so these selectors and patterns describe what the
//! host is known to render today, not what it promises.

use upsdom::{Document, DomProbe, NodeId};

/// Id of the overlay button.
pub const BUTTON_ID: &str = "aiUpscalerButton";
/// Id of the quick menu popup.
pub const QUICK_MENU_ID: &str = "aiUpscalerQuickMenu";
/// Id of the injected style block.
pub const STYLE_BLOCK_ID: &str = "aiUpscalerPlayerStyles";
/// Id of the preview surface injected on the settings page.
pub const PREVIEW_ID: &str = "aiUpscalerPreviewPlayer";

/// Containers housing the on-screen playback controls, primary first.
pub const CONTROLS_SELECTORS: &[&str] = &[".videoOsdBottom", ".osdControls"];
/// The media element itself, the canonical playback signal.
pub const MEDIA_SELECTOR: &str = "video";
/// Marker present only on the plugin settings page.
pub const SETTINGS_MARKER_SELECTOR: &str = "#UpscalerConfigurationPage";
/// Controls row of the preview surface.
pub const PREVIEW_CONTROLS_SELECTOR: &str = ".ai-preview-controls";

/// Classify a navigation location as a playback view.
///
/// The host routes through the hash fragment; every playback route carries
/// a `#/video` segment (`/web/#/video/123`, `/web/index.html#/video`).
pub fn is_playback_view(location: &str) -> bool {
    location.contains("#/video")
}

/// Element the overlay button should be appended to, if any exists yet:
/// the playback controls container, or the preview surface's controls row.
pub fn find_button_anchor(doc: &Document) -> Option<NodeId> {
    DomProbe::find_any(doc, CONTROLS_SELECTORS)
        .or_else(|| DomProbe::find_any(doc, &[PREVIEW_CONTROLS_SELECTOR]))
}

pub fn find_media_element(doc: &Document) -> Option<NodeId> {
    DomProbe::find_any(doc, &[MEDIA_SELECTOR])
}

pub fn settings_marker_present(doc: &Document) -> bool {
    DomProbe::any_present(doc, &[SETTINGS_MARKER_SELECTOR])
}
