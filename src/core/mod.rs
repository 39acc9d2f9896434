pub mod camera;
pub mod config;
pub mod constants;
pub mod hit;
pub mod input;
pub mod interp;
pub mod lightning;
pub mod sequence;
pub mod sequencer;

pub use camera::*;
pub use config::*;
pub use hit::*;
pub use input::*;
pub use interp::*;
pub use lightning::*;
pub use sequence::*;
pub use sequencer::*;

// Shaders bundled as string constants
pub static PROP_WGSL: &str = include_str!("../../shaders/prop.wgsl");
