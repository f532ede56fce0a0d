use std::sync::{Arc, Mutex};

use crossbeam_channel::{Receiver, Sender, unbounded};

use crate::notifier::Severity;

/// Observable overlay lifecycle notifications.
#[derive(Clone, Debug)]
pub enum OverlayEvent {
    /// The button was injected. `preview` is true when it was anchored on
    /// the settings-page preview surface rather than live playback controls.
    Attached { preview: bool },
    /// Button (and menu, if open) were removed.
    Detached,
    MenuOpened,
    MenuClosed,
    /// The remote configuration was updated through the overlay.
    ConfigChanged { enabled: bool, scale: Option<u8> },
    /// A notification was displayed to the user.
    Notified { message: String, severity: Severity },
}

/// Fan-out bus for [`OverlayEvent`]s.
#[derive(Clone, Default)]
pub struct OverlayEventBus {
    subscribers: Arc<Mutex<Vec<Sender<OverlayEvent>>>>,
}

impl OverlayEventBus {
    pub fn new() -> Self {
        Self {
            subscribers: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn subscribe(&self) -> Receiver<OverlayEvent> {
        let (tx, rx) = unbounded::<OverlayEvent>();
        {
            let mut subscribers = self.subscribers.lock().unwrap();
            subscribers.push(tx);
        }
        rx
    }

    pub(crate) fn broadcast(&self, event: OverlayEvent) {
        let mut subscribers = self.subscribers.lock().unwrap();
        subscribers.retain(|tx| tx.send(event.clone()).is_ok());
    }
}
