use std::thread;
use std::time::Duration;

use tracing::debug;
use upsdom::{Document, NodeId};

use crate::NOTIFICATION_TTL;

/// Visual weight of a notification.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Severity {
    Info,
    Success,
    Warning,
}

impl Severity {
    fn css_class(self) -> &'static str {
        match self {
            Severity::Info => "info",
            Severity::Success => "success",
            Severity::Warning => "warning",
        }
    }
}

/// Transient, auto-dismissing user messages.
///
/// Each notification schedules its own removal after a fixed delay; there
/// is no cancellation. The delay is injectable so tests do not wait 2.5s.
#[derive(Clone)]
pub struct Notifier {
    doc: Document,
    ttl: Duration,
}

impl Notifier {
    pub fn new(doc: Document) -> Self {
        Self::with_ttl(doc, NOTIFICATION_TTL)
    }

    pub fn with_ttl(doc: Document, ttl: Duration) -> Self {
        Self { doc, ttl }
    }

    /// Show a message and schedule its removal.
    pub fn show(&self, message: &str, severity: Severity) -> NodeId {
        let node = self.doc.create_element("div");
        self.doc.add_class(node, "ai-upscaler-notify");
        self.doc.add_class(node, severity.css_class());
        self.doc.set_text(node, message);
        let _ = self.doc.append_child(self.doc.body(), node);
        debug!(message, severity = ?severity, "Notification shown");

        let doc = self.doc.clone();
        let ttl = self.ttl;
        let _ = thread::Builder::new()
            .name("overlay-notify-dismiss".into())
            .spawn(move || {
                thread::sleep(ttl);
                // The element may already be gone (page teardown); removal
                // tolerates that.
                doc.remove(node);
            });

        node
    }
}
