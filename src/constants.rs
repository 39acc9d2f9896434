//! Page wiring and renderer tuning for the web frontend.
//!
//! Sequencing constants live in `core::constants`; these only concern the DOM
//! and the GPU pass.

// DOM
pub const CANVAS_ID: &str = "app-canvas";
pub const CONFIG_KEYS: [&str; 7] = [
    "href",
    "auto-charge",
    "charge-threshold",
    "dismiss-threshold",
    "tap-threshold",
    "discharge-duration",
    "seed",
];

// Wheel delta modes (DOM_DELTA_PIXEL / LINE / PAGE)
pub const WHEEL_LINE_PX: f32 = 16.0;

// Renderer
pub const CLEAR_RGB: [f32; 3] = [0.015, 0.016, 0.022];
pub const SHOCK_CLEAR_RGB: [f32; 3] = [0.10, 0.13, 0.20]; // added per unit of shock light
pub const CASE_RGB: [f32; 3] = [0.07, 0.07, 0.07]; // black plastic
pub const LABEL_RGB: [f32; 3] = [0.78, 0.74, 0.66]; // printed cover
pub const KEY_LIGHT_POS: [f32; 3] = [3.0, 2.0, 4.0];
pub const BOLT_MAX_POINTS: usize = 32;
pub const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth24Plus;
