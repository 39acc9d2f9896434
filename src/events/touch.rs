use super::{dispatch, non_passive, InputWiring};
use crate::core::{Contacts, InputEvent};
use crate::dom;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

fn contacts(ev: &web::TouchEvent, canvas: &web::HtmlCanvasElement) -> Contacts {
    let list = ev.touches();
    (0..list.length())
        .filter_map(|i| list.item(i))
        .map(|t| dom::client_to_canvas(canvas, t.client_x() as f64, t.client_y() as f64))
        .collect()
}

fn listen(w: &InputWiring, kind: &str, handler: impl FnMut(web::TouchEvent) + 'static) {
    let closure = Closure::wrap(Box::new(handler) as Box<dyn FnMut(_)>);
    _ = w
        .canvas
        .add_event_listener_with_callback_and_add_event_listener_options(
            kind,
            closure.as_ref().unchecked_ref(),
            &non_passive(),
        );
    closure.forget();
}

pub(super) fn wire_touch(w: &InputWiring) {
    let ws = w.clone();
    listen(w, "touchstart", move |ev| {
        let contacts = contacts(&ev, &ws.canvas);
        dispatch(&ws, InputEvent::TouchStart { contacts });
    });

    let wm = w.clone();
    listen(w, "touchmove", move |ev| {
        let contacts = contacts(&ev, &wm.canvas);
        let report = dispatch(&wm, InputEvent::TouchMove { contacts });
        if report.consumed || !wm.sequencer.borrow().kind().accepts_progress() {
            // charging swipes and rotation drags must not scroll the page
            ev.prevent_default();
        }
    });

    let we = w.clone();
    listen(w, "touchend", move |ev| {
        let remaining = ev.touches().length() as usize;
        let report = dispatch(&we, InputEvent::TouchEnd { remaining });
        if report.navigated {
            // suppress the synthesized click so navigation fires once
            ev.prevent_default();
        }
    });

    let wc = w.clone();
    listen(w, "touchcancel", move |_ev| {
        dispatch(&wc, InputEvent::TouchCancel);
    });
}
