use super::{dispatch, InputWiring};
use crate::core::InputEvent;
use crate::dom;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

pub(super) fn wire_pointermove(w: &InputWiring) {
    let w = w.clone();
    let closure = Closure::wrap(Box::new(move |ev: web::PointerEvent| {
        // touch pointers are handled by the touch listeners
        if ev.pointer_type() == "touch" {
            return;
        }
        let pos = dom::client_to_canvas(&w.canvas, ev.client_x() as f64, ev.client_y() as f64);
        dispatch(&w, InputEvent::PointerMove { x: pos.x, y: pos.y });
    }) as Box<dyn FnMut(_)>);

    if let Some(wnd) = web::window() {
        _ = wnd.add_event_listener_with_callback("pointermove", closure.as_ref().unchecked_ref());
    }
    closure.forget();
}

pub(super) fn wire_click(w: &InputWiring) {
    let w = w.clone();
    let canvas_for_listener = w.canvas.clone();
    let closure = Closure::wrap(Box::new(move |ev: web::MouseEvent| {
        let pos = dom::client_to_canvas(&w.canvas, ev.client_x() as f64, ev.client_y() as f64);
        let report = dispatch(&w, InputEvent::Click { x: pos.x, y: pos.y });
        if report.navigated {
            ev.prevent_default();
        }
    }) as Box<dyn FnMut(_)>);
    _ = canvas_for_listener.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
    closure.forget();
}
