//! Drive the overlay through a simulated SPA session.
//!
//! A scripted host page: the user lands on the home view, opens a video,
//! plays with the quick menu, then navigates back home. Run with:
//!
//! ```bash
//! cargo run --example overlay_demo
//! ```

use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::Result;
use serde_json::{Value, json};
use uuid::Uuid;

use upsdom::Document;
use upsgateway::{ConfigApi, ConfigGateway, GatewayError, PluginConfig};
use upsoverlay::{MenuAction, OverlayController, OverlayRuntime};

/// Stand-in for the host server.
struct DemoApi {
    stored: Mutex<PluginConfig>,
}

impl ConfigApi for DemoApi {
    fn fetch(&self, _plugin: &Uuid) -> Result<PluginConfig, GatewayError> {
        Ok(self.stored.lock().unwrap().clone())
    }

    fn submit(&self, _plugin: &Uuid, config: &PluginConfig) -> Result<(), GatewayError> {
        *self.stored.lock().unwrap() = config.clone();
        Ok(())
    }

    fn status(&self) -> Result<Value, GatewayError> {
        Ok(json!({ "service": "up", "model": "esrgan-v2", "queue": 0 }))
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "debug".into()),
        )
        .init();

    let doc = Document::new();
    let location = Arc::new(Mutex::new("/web/#/home".to_string()));

    let api = DemoApi {
        stored: Mutex::new(
            PluginConfig::from_value(json!({ "EnablePlugin": false, "ScaleFactor": 2 }))?,
        ),
    };
    let controller = Arc::new(OverlayController::new(doc.clone(), ConfigGateway::new(api)));

    let events = controller.events().subscribe();
    controller.install(&location.lock().unwrap().clone()).ok();

    let source = {
        let location = Arc::clone(&location);
        move || location.lock().unwrap().clone()
    };
    let _runtime = OverlayRuntime::spawn_with_intervals(
        Arc::clone(&controller),
        Arc::new(source),
        Duration::from_millis(20),
        Duration::from_millis(20),
    )?;

    // The user opens a video; the host builds its player shortly after.
    *location.lock().unwrap() = "/web/#/video/42".to_string();
    std::thread::sleep(Duration::from_millis(60));

    let video = doc.create_element("video");
    doc.append_child(doc.body(), video)?;
    let osd = doc.create_element("div");
    doc.add_class(osd, "videoOsdBottom");
    doc.append_child(doc.body(), osd)?;
    std::thread::sleep(Duration::from_millis(60));

    // Quick menu round: pick a scale, enable upscaling, check the stats.
    controller.handle_button_click();
    controller.handle_menu_action(MenuAction::SetScale(4));
    controller.handle_menu_action(MenuAction::ToggleEnabled);
    controller.handle_menu_action(MenuAction::ShowStats);

    // Back to the home view; the overlay cleans up after itself.
    *location.lock().unwrap() = "/web/#/home".to_string();
    std::thread::sleep(Duration::from_millis(60));

    drop(controller);
    for event in events.try_iter() {
        println!("event: {event:?}");
    }

    Ok(())
}
