use crate::core::{Affordance, Cursor};
use web_sys as web;

#[inline]
pub fn show_hint(document: &web::Document, hint: Affordance) {
    if let Some(el) = document.get_element_by_id(hint.element_id()) {
        _ = el.class_list().remove_1("hidden");
        // fallback for environments without CSS class
        _ = el.set_attribute("style", "");
    }
}

#[inline]
pub fn hide_hint(document: &web::Document, hint: Affordance) {
    if let Some(el) = document.get_element_by_id(hint.element_id()) {
        _ = el.class_list().add_1("hidden");
        // fallback
        _ = el.set_attribute("style", "display:none");
    }
}

#[inline]
pub fn set_cursor(canvas: &web::HtmlCanvasElement, cursor: Cursor) {
    _ = canvas.style().set_property("cursor", cursor.css());
}
