use tracing::debug;
use upsdom::Document;

use crate::host::STYLE_BLOCK_ID;

/// Visual rules for the button, quick menu, notifications and the preview
/// surface. Inserted once per page; never updated afterwards.
const OVERLAY_CSS: &str = r#"
#aiUpscalerButton { margin: 0 6px; }
.aiUpscalerQuickMenu {
    position: fixed;
    top: 50%; left: 50%;
    transform: translate(-50%, -50%);
    background: #000;
    color: #fff;
    border: 2px solid #00d4ff;
    border-radius: 10px;
    padding: 12px;
    z-index: 99999;
}
.menu-header {
    display: flex;
    justify-content: space-between;
    align-items: center;
    margin-bottom: 8px;
}
.menu-body button {
    display: block;
    width: 100%;
    margin: 4px 0;
}
.ai-upscaler-notify {
    position: fixed;
    top: 20px;
    right: 20px;
    padding: 8px 12px;
    border-radius: 6px;
    background: #2563eb;
    color: #fff;
    z-index: 99999;
}
.ai-preview-frame {
    border: 2px dashed #00d4ff;
    padding: 10px;
    margin-top: 10px;
}
.ai-preview-video {
    height: 120px;
    background: #111;
    display: flex;
    align-items: center;
    justify-content: center;
    color: #00d4ff;
}
"#;

/// Idempotent style installation; first write wins for the page lifetime.
pub struct StyleInjector;

impl StyleInjector {
    /// Ensure the overlay style block exists in `head`. Returns true when
    /// this call inserted it, false when it was already there.
    pub fn ensure_styles(doc: &Document) -> bool {
        if doc.get_element_by_id(STYLE_BLOCK_ID).is_some() {
            return false;
        }

        let style = doc.create_element("style");
        doc.set_id(style, STYLE_BLOCK_ID);
        doc.set_text(style, OVERLAY_CSS);
        if doc.append_child(doc.head(), style).is_ok() {
            debug!("Overlay styles installed");
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ensure_styles_is_idempotent() {
        let doc = Document::new();
        assert!(StyleInjector::ensure_styles(&doc));
        for _ in 0..5 {
            assert!(!StyleInjector::ensure_styles(&doc));
        }
        assert_eq!(doc.query_selector_all("style").unwrap().len(), 1);
    }

    #[test]
    fn test_existing_block_is_never_rewritten() {
        let doc = Document::new();
        StyleInjector::ensure_styles(&doc);
        let block = doc.get_element_by_id(STYLE_BLOCK_ID).unwrap();
        doc.set_text(block, "/* host override */");

        StyleInjector::ensure_styles(&doc);
        assert_eq!(doc.text(block).as_deref(), Some("/* host override */"));
    }
}
