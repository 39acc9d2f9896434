use glam::{Vec2, Vec3};

// Sequencing/animation tuning shared by the core and the web frontend.

// Phase timing
pub const DISCHARGE_DURATION_SEC: f32 = 0.15; // length of the zap
pub const LIGHTNING_HIDE_BELOW_SEC: f32 = 0.02; // bolt hidden once the timer drops below this
pub const SETTLE_EPSILON: f32 = 0.005; // world units; settle ends when the prop is this close
pub const MAX_FRAME_DT_SEC: f32 = 0.1; // clamp for tab switches / long stalls
pub const REFERENCE_FPS: f32 = 60.0; // smoothing factors are expressed per 60 Hz frame

// Input
pub const WHEEL_PROGRESS_PER_PX: f32 = 0.0008; // ~1250px of wheel travel charges fully
pub const SWIPE_PROGRESS_PER_PX: f32 = 0.0025;
pub const POINTER_YAW_GAIN: f32 = 0.6; // radians per unit of NDC x
pub const POINTER_PITCH_GAIN: f32 = 0.4; // radians per unit of NDC y
pub const SWIPE_ROTATE_GAIN: f32 = 1.5; // touch drags rotate faster than hover
pub const TAP_MAX_MOVEMENT_PX: f32 = 10.0;
pub const ROTATION_LIMIT: Vec2 = Vec2::new(1.2, 0.6); // |yaw|, |pitch| clamp for targets

// Smoothing factors (per reference frame)
pub const ROTATION_SMOOTHING: f32 = 0.08;
pub const POSITION_SMOOTHING: f32 = 0.05;
pub const CAMERA_SMOOTHING: f32 = 0.06;
pub const LIGHT_SMOOTHING_CHARGE: f32 = 0.10;
pub const LIGHT_SMOOTHING_DISCHARGE: f32 = 0.5;
pub const LIGHT_SMOOTHING_SETTLE: f32 = 0.04;

// Idle sway: two sinusoids per axis at distinct low frequencies (rad/s)
pub const SWAY_YAW: [(f32, f32); 2] = [(0.06, 0.7), (0.025, 1.9)]; // (amplitude, frequency)
pub const SWAY_PITCH: [(f32, f32); 2] = [(0.03, 0.5), (0.012, 1.3)];

// Discharge shock
pub const SHOCK_FREQUENCY: f32 = 55.0; // rad/s, far above the sway
pub const SHOCK_PULSE_K: f32 = 1.0; // pulse = sin((duration - timer) * PI * k / duration)
pub const SHOCK_ROTATION_AMP: f32 = 0.08;
pub const SHOCK_CAMERA_AMP: f32 = 0.06;

// Scene layout
pub const INITIAL_ROTATION: Vec2 = Vec2::new(-0.2, 0.05); // yaw, pitch
pub const CHARGE_POSITION: Vec3 = Vec3::ZERO;
pub const FINAL_POSITION: Vec3 = Vec3::new(0.0, -0.25, 0.6);
pub const CAMERA_FAR: Vec3 = Vec3::new(0.0, 0.3, 7.5);
pub const CAMERA_NEAR: Vec3 = Vec3::new(0.0, 0.0, 4.2);
pub const CAMERA_REST: Vec3 = Vec3::new(0.0, 0.0, 5.0);
pub const CAMERA_TARGET: Vec3 = Vec3::ZERO;
pub const CAMERA_FOVY_RADIANS: f32 = 45.0 * std::f32::consts::PI / 180.0;
pub const CAMERA_ZNEAR: f32 = 0.1;
pub const CAMERA_ZFAR: f32 = 100.0;

// Prop geometry (VHS-style case), local space half extents
pub const PROP_HALF_EXTENTS: Vec3 = Vec3::new(0.8, 1.5, 0.2);
pub const LABEL_INSET: f32 = 0.08; // label sits inside the front face by this much per side
pub const LABEL_THICKNESS: f32 = 0.01;

// Lightning
pub const LIGHTNING_SEGMENTS: usize = 10;
pub const LIGHTNING_START_HEIGHT: f32 = 4.0;
pub const LIGHTNING_START_RADIUS: f32 = 0.6; // horizontal jitter of the strike origin
pub const LIGHTNING_CHAOS: f32 = 0.5; // interior offsets lie in [-chaos/2, chaos/2] per axis
pub const LIGHTNING_FLICKER_MIN: f32 = 0.55;
pub const LIGHTNING_FLICKER_MAX: f32 = 1.0;

// Lighting presets: (ambient, key, read, emissive shock)
pub const LIGHTS_INTRO: [f32; 4] = [0.12, 0.0, 0.0, 0.0];
pub const LIGHTS_CHARGE_EMPTY: [f32; 4] = [0.15, 0.2, 0.0, 0.0];
pub const LIGHTS_CHARGE_FULL: [f32; 4] = [0.35, 1.6, 0.0, 0.3];
pub const LIGHTS_DISCHARGE: [f32; 4] = [1.2, 3.0, 0.0, 2.5];
pub const LIGHTS_INTERACTIVE: [f32; 4] = [0.6, 0.8, 1.0, 0.0];
