use tracing::debug;
use upsdom::{Document, NodeId};

use crate::host::QUICK_MENU_ID;

/// What a quick-menu element does when activated.
///
/// The embedder resolves a click to the element under the pointer and asks
/// [`QuickMenu::action_at`] what it means; the controller executes it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MenuAction {
    SetScale(u8),
    ToggleEnabled,
    ShowStats,
    Close,
}

/// Outcome of a menu toggle.
#[derive(Debug, PartialEq, Eq)]
pub enum MenuToggle {
    Opened(NodeId),
    Closed,
}

/// The transient popup offering scale selection, the enable toggle and the
/// stats action. At most one instance exists; opening while open closes.
pub struct QuickMenu;

impl QuickMenu {
    pub fn is_open(doc: &Document) -> bool {
        doc.get_element_by_id(QUICK_MENU_ID).is_some()
    }

    /// Single toggle: destroy the open instance if any, otherwise build one.
    pub fn toggle(doc: &Document) -> MenuToggle {
        if let Some(existing) = doc.get_element_by_id(QUICK_MENU_ID) {
            doc.remove(existing);
            debug!("Quick menu closed");
            return MenuToggle::Closed;
        }

        let menu = doc.create_element("div");
        doc.set_id(menu, QUICK_MENU_ID);
        doc.add_class(menu, "aiUpscalerQuickMenu");

        let header = doc.create_element("div");
        doc.add_class(header, "menu-header");
        let title = doc.create_element("strong");
        doc.set_text(title, "\u{1f680} AI Upscaler");
        let close = doc.create_element("button");
        doc.add_class(close, "menu-close");
        doc.set_attr(close, "data-action", "close");
        doc.set_text(close, "\u{00d7}");
        let _ = doc.append_child(header, title);
        let _ = doc.append_child(header, close);

        let body = doc.create_element("div");
        doc.add_class(body, "menu-body");
        for scale in [2u8, 3, 4] {
            let option = doc.create_element("button");
            doc.set_attr(option, "data-scale", &scale.to_string());
            doc.set_text(option, &format!("{scale}\u{00d7} Upscale"));
            let _ = doc.append_child(body, option);
        }
        let separator = doc.create_element("hr");
        let _ = doc.append_child(body, separator);

        let toggle = doc.create_element("button");
        doc.set_attr(toggle, "data-action", "toggle");
        doc.set_text(toggle, "Toggle Upscaling");
        let _ = doc.append_child(body, toggle);

        let stats = doc.create_element("button");
        doc.set_attr(stats, "data-action", "stats");
        doc.set_text(stats, "Show Stats");
        let _ = doc.append_child(body, stats);

        let _ = doc.append_child(menu, header);
        let _ = doc.append_child(menu, body);
        let _ = doc.append_child(doc.body(), menu);
        debug!("Quick menu opened");
        MenuToggle::Opened(menu)
    }

    /// Remove the menu unconditionally. Returns true when one existed.
    pub fn close(doc: &Document) -> bool {
        match doc.get_element_by_id(QUICK_MENU_ID) {
            Some(menu) => doc.remove(menu),
            None => false,
        }
    }

    /// Interpret an activated element inside the menu.
    pub fn action_at(doc: &Document, node: NodeId) -> Option<MenuAction> {
        if let Some(scale) = doc.attr(node, "data-scale") {
            return scale.parse::<u8>().ok().map(MenuAction::SetScale);
        }
        match doc.attr(node, "data-action").as_deref() {
            Some("toggle") => Some(MenuAction::ToggleEnabled),
            Some("stats") => Some(MenuAction::ShowStats),
            Some("close") => Some(MenuAction::Close),
            _ => None,
        }
    }
}
