use crate::app::Application;
use crate::gpu;
use crate::input::{self, InputState};
use sevenfold_core::platform::platform_from_user_agent;
use sevenfold_core::{DiamondTable, SceneError};
use sevenfold_scene::Scene;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;

const CANVAS_ID: &str = "sevenfold-canvas";

/// WASM entry point. Sets the panic hook and initializes logging.
#[wasm_bindgen(start)]
pub fn main() {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).expect("logger init failed");
    log::info!("Sevenfold starting...");

    wasm_bindgen_futures::spawn_local(async {
        if let Err(e) = run().await {
            show_error_to_user(&format!("{e}"));
        }
    });
}

/// Async initialization: canvas, platform, scene, audio, GPU, then the loop.
async fn run() -> Result<(), SceneError> {
    let window = web_sys::window().expect("no global window");
    let document = window.document().expect("no document");

    let canvas = document
        .get_element_by_id(CANVAS_ID)
        .ok_or_else(|| SceneError::CanvasNotFound(CANVAS_ID.into()))?
        .dyn_into::<web_sys::HtmlCanvasElement>()
        .map_err(|_| SceneError::CanvasNotFound(format!("#{CANVAS_ID} is not a canvas")))?;

    // Backing store in physical pixels
    let dpi_scale = window.device_pixel_ratio() as f32;
    let css_width = canvas.client_width() as f32;
    let css_height = canvas.client_height() as f32;
    let physical_width = ((css_width * dpi_scale) as u32).max(1);
    let physical_height = ((css_height * dpi_scale) as u32).max(1);
    canvas.set_width(physical_width);
    canvas.set_height(physical_height);

    log::info!(
        "Canvas: {}x{} CSS, {}x{} physical (DPI: {:.2})",
        css_width,
        css_height,
        physical_width,
        physical_height,
        dpi_scale
    );

    let user_agent = window.navigator().user_agent().unwrap_or_default();
    let platform = platform_from_user_agent(&user_agent);
    log::info!("Platform: {platform:?}");

    let table = DiamondTable::load_or_builtin();

    // A missing AudioContext leaves the scene silent but usable
    let audio = match sevenfold_audio::web_player(platform, &table) {
        Ok(player) => Some(player),
        Err(e) => {
            log::error!("{e}");
            None
        }
    };

    let now_ms = window.performance().map_or(0.0, |p| p.now());
    let scene = Scene::new(table, platform.is_mobile(), now_ms);

    // Listeners are registered once for the app lifetime
    let input_state = Rc::new(RefCell::new(InputState::new()));
    input::register_input_listeners(&canvas, input_state.clone())
        .map_err(|e| SceneError::BrowserApi(format!("input listeners: {e:?}")))?;

    let gpu_ctx = gpu::init_gpu(canvas.clone(), physical_width, physical_height).await?;
    let application =
        Application::new(gpu_ctx, canvas, dpi_scale, input_state, scene, audio);
    Application::start_loop(Rc::new(RefCell::new(application)));

    Ok(())
}

/// Show a fatal error to the user, not just the console.
fn show_error_to_user(msg: &str) {
    log::error!("{msg}");
    let window = web_sys::window().expect("no global window");
    let _ = window.alert_with_message(&format!("Sevenfold Error: {msg}"));
}
