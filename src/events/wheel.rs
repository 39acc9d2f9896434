use super::{dispatch, non_passive, InputWiring};
use crate::constants::WHEEL_LINE_PX;
use crate::core::InputEvent;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

/// Wheel deltas in pixels regardless of the event's delta mode.
#[inline]
fn delta_px(ev: &web::WheelEvent, page_px: f32) -> (f32, f32) {
    let scale = match ev.delta_mode() {
        web::WheelEvent::DOM_DELTA_LINE => WHEEL_LINE_PX,
        web::WheelEvent::DOM_DELTA_PAGE => page_px,
        _ => 1.0,
    };
    (ev.delta_x() as f32 * scale, ev.delta_y() as f32 * scale)
}

pub(super) fn wire_wheel(w: &InputWiring) {
    let w = w.clone();
    let closure = Closure::wrap(Box::new(move |ev: web::WheelEvent| {
        let page_px = w.sequencer.borrow().viewport().height;
        let (delta_x, delta_y) = delta_px(&ev, page_px);
        let report = dispatch(&w, InputEvent::Wheel { delta_x, delta_y });
        if report.consumed {
            ev.prevent_default();
        }
    }) as Box<dyn FnMut(_)>);

    if let Some(wnd) = web::window() {
        _ = wnd.add_event_listener_with_callback_and_add_event_listener_options(
            "wheel",
            closure.as_ref().unchecked_ref(),
            &non_passive(),
        );
    }
    closure.forget();
}
