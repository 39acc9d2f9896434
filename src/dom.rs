use crate::constants::CONFIG_KEYS;
use crate::core::{SequenceConfig, Viewport};
use glam::Vec2;
use web_sys as web;

pub fn sync_canvas_backing_size(canvas: &web::HtmlCanvasElement) {
    if let Some(w) = web::window() {
        let dpr = w.device_pixel_ratio();
        let rect = canvas.get_bounding_client_rect();
        let w_px = (rect.width() * dpr) as u32;
        let h_px = (rect.height() * dpr) as u32;
        canvas.set_width(w_px.max(1));
        canvas.set_height(h_px.max(1));
    }
}

/// Canvas size in CSS pixels, the space input positions are reported in.
#[inline]
pub fn canvas_viewport(canvas: &web::HtmlCanvasElement) -> Viewport {
    let rect = canvas.get_bounding_client_rect();
    Viewport::new(rect.width() as f32, rect.height() as f32)
}

/// Client coordinates relative to the canvas' top-left corner.
#[inline]
pub fn client_to_canvas(canvas: &web::HtmlCanvasElement, client_x: f64, client_y: f64) -> Vec2 {
    let rect = canvas.get_bounding_client_rect();
    Vec2::new(
        (client_x - rect.left()) as f32,
        (client_y - rect.top()) as f32,
    )
}

/// Defaults overridden by `data-*` attributes on the canvas.
pub fn read_config(canvas: &web::HtmlCanvasElement) -> SequenceConfig {
    let mut cfg = SequenceConfig::default();
    for key in CONFIG_KEYS {
        if let Some(value) = canvas.get_attribute(&format!("data-{key}")) {
            if !cfg.apply_override(key, &value) {
                log::warn!("[config] ignoring data-{}={:?}", key, value);
            }
        }
    }
    log::info!(
        "[config] auto_charge={} tap_threshold={}px href={}",
        cfg.auto_charge,
        cfg.tap_max_movement_px,
        cfg.target_url
    );
    cfg
}
