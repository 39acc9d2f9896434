use crate::core::{NullSink, PhaseKind, SceneSink, Sequencer};
use crate::{dom, overlay, render};
use instant::Instant;
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

pub struct FrameContext<'a> {
    pub sequencer: Rc<RefCell<Sequencer>>,
    pub canvas: web::HtmlCanvasElement,
    pub document: web::Document,
    pub gpu: Option<render::GpuState<'a>>,
    pub resize_pending: Rc<Cell<bool>>,
    pub last_instant: Instant,
}

impl<'a> FrameContext<'a> {
    pub fn frame(&mut self) {
        let now = Instant::now();
        let dt_sec = (now - self.last_instant).as_secs_f32();
        self.last_instant = now;

        let mut null = NullSink;
        let sink: &mut dyn SceneSink = match self.gpu.as_mut() {
            Some(g) => g,
            None => &mut null,
        };

        let mut seq = self.sequencer.borrow_mut();
        if self.resize_pending.replace(false) {
            let viewport = dom::canvas_viewport(&self.canvas);
            seq.resize(
                viewport,
                (self.canvas.width(), self.canvas.height()),
                sink,
            );
        }

        let report = seq.tick(dt_sec, sink);
        drop(seq);

        if let Some(hint) = report.reveal {
            overlay::show_hint(&self.document, hint);
        }
        if let Some(cursor) = report.cursor {
            overlay::set_cursor(&self.canvas, cursor);
        }
        if report.changes.iter().any(|c| c.to == PhaseKind::Discharge) {
            log::info!("[frame] zap");
        }
    }
}

pub async fn init_gpu(canvas: &web::HtmlCanvasElement) -> Option<render::GpuState<'static>> {
    // leak a canvas clone to satisfy 'static lifetime for surface
    let leaked_canvas = Box::leak(Box::new(canvas.clone()));
    match render::GpuState::new(leaked_canvas).await {
        Ok(g) => Some(g),
        Err(e) => {
            log::error!("WebGPU init error: {:?}", e);
            None
        }
    }
}

pub fn start_loop(frame_ctx: Rc<RefCell<FrameContext<'static>>>) {
    let tick: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
    let tick_clone = tick.clone();
    *tick.borrow_mut() = Some(Closure::wrap(Box::new(move || {
        frame_ctx.borrow_mut().frame();
        request_frame(&tick_clone);
    }) as Box<dyn FnMut()>));
    request_frame(&tick);
}

fn request_frame(tick: &Rc<RefCell<Option<Closure<dyn FnMut()>>>>) {
    if let (Some(w), Some(cb)) = (web::window(), tick.borrow().as_ref()) {
        _ = w.request_animation_frame(cb.as_ref().unchecked_ref());
    }
}
