use crate::core::{InputEvent, InputReport, Sequencer};
use crate::nav::LocationNavigator;
use crate::{dom, overlay};
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

mod pointer;
mod touch;
mod wheel;

#[derive(Clone)]
pub struct InputWiring {
    pub canvas: web::HtmlCanvasElement,
    pub document: web::Document,
    pub sequencer: Rc<RefCell<Sequencer>>,
    pub resize_pending: Rc<Cell<bool>>,
}

pub fn wire_input_handlers(w: InputWiring) {
    pointer::wire_pointermove(&w);
    pointer::wire_click(&w);
    wheel::wire_wheel(&w);
    touch::wire_touch(&w);
    wire_resize(&w);
}

/// Feed one event to the sequencer and apply its DOM side effects.
pub(crate) fn dispatch(w: &InputWiring, event: InputEvent) -> InputReport {
    let report = w
        .sequencer
        .borrow_mut()
        .on_input(&event, &mut LocationNavigator);
    if let Some(hint) = report.dismissed {
        log::info!("[input] dismissed {:?}", hint);
        overlay::hide_hint(&w.document, hint);
    }
    if let Some(cursor) = report.cursor {
        overlay::set_cursor(&w.canvas, cursor);
    }
    report
}

pub(crate) fn non_passive() -> web::AddEventListenerOptions {
    let opts = web::AddEventListenerOptions::new();
    opts.set_passive(false);
    opts
}

fn wire_resize(w: &InputWiring) {
    let canvas = w.canvas.clone();
    let pending = w.resize_pending.clone();
    let closure = Closure::wrap(Box::new(move || {
        dom::sync_canvas_backing_size(&canvas);
        pending.set(true);
    }) as Box<dyn FnMut()>);
    if let Some(window) = web::window() {
        _ = window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
    }
    closure.forget();
}
