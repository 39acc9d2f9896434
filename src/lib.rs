//! Scroll-charged reveal of a 3D packaging prop.
//!
//! `core` holds the platform-free sequencer and is what the host tests
//! exercise; everything else is the wasm32 web frontend around it.

pub mod core;

#[cfg(target_arch = "wasm32")]
mod constants;
#[cfg(target_arch = "wasm32")]
mod dom;
#[cfg(target_arch = "wasm32")]
mod events;
#[cfg(target_arch = "wasm32")]
mod frame;
#[cfg(target_arch = "wasm32")]
mod nav;
#[cfg(target_arch = "wasm32")]
mod overlay;
#[cfg(target_arch = "wasm32")]
mod render;

#[cfg(target_arch = "wasm32")]
pub use app::start;

#[cfg(target_arch = "wasm32")]
mod app {
    use super::{constants, dom, events, frame, overlay};
    use crate::core::{Affordance, Sequencer};
    use instant::Instant;
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;
    use std::sync::atomic::{AtomicBool, Ordering};
    use wasm_bindgen::prelude::*;
    use wasm_bindgen::JsCast;
    use wasm_bindgen_futures::spawn_local;
    use web_sys as web;

    #[wasm_bindgen(start)]
    pub fn start() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).ok();
        log::info!("capsule-reveal starting");

        spawn_local(async move {
            if let Err(e) = init().await {
                log::error!("init error: {:?}", e);
            }
        });
        Ok(())
    }

    async fn init() -> anyhow::Result<()> {
        let window = web::window().ok_or_else(|| anyhow::anyhow!("no window"))?;
        let document = window
            .document()
            .ok_or_else(|| anyhow::anyhow!("no document"))?;

        let canvas_el = document
            .get_element_by_id(constants::CANVAS_ID)
            .ok_or_else(|| anyhow::anyhow!("missing #{}", constants::CANVAS_ID))?;
        let canvas: web::HtmlCanvasElement = canvas_el
            .dyn_into::<web::HtmlCanvasElement>()
            .map_err(|e| anyhow::anyhow!(format!("{:?}", e)))?;

        static STARTED: AtomicBool = AtomicBool::new(false);
        if STARTED.swap(true, Ordering::SeqCst) {
            return Ok(());
        }

        // Maintain canvas internal pixel size to match CSS size * devicePixelRatio
        dom::sync_canvas_backing_size(&canvas);

        let cfg = dom::read_config(&canvas);
        let sequencer = Rc::new(RefCell::new(Sequencer::new(
            cfg,
            dom::canvas_viewport(&canvas),
        )));
        overlay::show_hint(&document, Affordance::ScrollHint);
        overlay::hide_hint(&document, Affordance::DragHint);

        // first frame picks up the backing size through the resize path
        let resize_pending = Rc::new(Cell::new(true));
        events::wire_input_handlers(events::InputWiring {
            canvas: canvas.clone(),
            document: document.clone(),
            sequencer: sequencer.clone(),
            resize_pending: resize_pending.clone(),
        });

        // Without WebGPU the sequence still runs (input, hit-testing) against a null sink
        let gpu = frame::init_gpu(&canvas).await;
        let frame_ctx = Rc::new(RefCell::new(frame::FrameContext {
            sequencer,
            canvas,
            document,
            gpu,
            resize_pending,
            last_instant: Instant::now(),
        }));
        frame::start_loop(frame_ctx);
        Ok(())
    }
}
