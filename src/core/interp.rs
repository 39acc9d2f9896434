//! Per-frame smoothing of prop pose, camera and light intensities.
//!
//! The interpolator is the only writer of the derived scene state. Each frame
//! it moves every tracked quantity a fraction of the way towards a
//! phase-dependent target; sway is folded into the rotation target, while the
//! discharge shock is superimposed on top of the smoothed values.

use super::constants::*;
use super::sequence::{Phase, PhaseKind, SequenceState};
use glam::{Mat4, Vec2, Vec3};
use std::f32::consts::PI;

/// Position and (yaw, pitch) rotation of the tracked prop.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ObjectPose {
    pub position: Vec3,
    pub rotation: Vec2,
}

impl ObjectPose {
    /// Object-to-world transform; pitch is applied outside yaw.
    pub fn model_matrix(&self) -> Mat4 {
        Mat4::from_translation(self.position)
            * Mat4::from_rotation_x(self.rotation.y)
            * Mat4::from_rotation_y(self.rotation.x)
    }
}

/// Named light channels driven by the sequence.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct LightIntensities {
    pub ambient: f32,
    /// flashlight-style key light
    pub key: f32,
    /// soft light used to read the label once settled
    pub read: f32,
    /// emissive flash on the prop during the zap
    pub shock: f32,
}

impl LightIntensities {
    pub const fn from_array(v: [f32; 4]) -> Self {
        Self {
            ambient: v[0],
            key: v[1],
            read: v[2],
            shock: v[3],
        }
    }

    #[inline]
    pub fn to_array(self) -> [f32; 4] {
        [self.ambient, self.key, self.read, self.shock]
    }

    pub fn lerp(self, other: Self, t: f32) -> Self {
        let a = self.to_array();
        let b = other.to_array();
        Self::from_array(std::array::from_fn(|i| a[i] + (b[i] - a[i]) * t))
    }

    pub fn scaled(self, k: f32) -> Self {
        Self::from_array(self.to_array().map(|v| v * k))
    }
}

/// Convert a per-reference-frame smoothing factor to the blend for `dt_sec`.
///
/// At exactly one reference frame this is `factor` itself, so
/// `current += (target - current) * alpha` matches the fixed-rate formula.
#[inline]
pub fn smoothing_alpha(factor: f32, dt_sec: f32) -> f32 {
    let f = factor.clamp(0.0, 1.0);
    let frames = (dt_sec * REFERENCE_FPS).max(0.0);
    (1.0 - (1.0 - f).powf(frames)).clamp(0.0, 1.0)
}

/// Idle sway offset (yaw, pitch) at session time `t`.
pub fn idle_sway(t: f32) -> Vec2 {
    let axis = |terms: &[(f32, f32); 2]| terms.iter().map(|(a, w)| a * (w * t).sin()).sum::<f32>();
    Vec2::new(axis(&SWAY_YAW), axis(&SWAY_PITCH))
}

/// Sway amplitude bound per axis (sum of the amplitudes).
pub fn idle_sway_bound() -> Vec2 {
    let amp = |terms: &[(f32, f32); 2]| terms.iter().map(|(a, _)| a.abs()).sum::<f32>();
    Vec2::new(amp(&SWAY_YAW), amp(&SWAY_PITCH))
}

/// Shaped 0→1→0 pulse over the discharge window.
#[inline]
pub fn shock_pulse(timer: f32, duration: f32) -> f32 {
    if duration <= 0.0 {
        return 0.0;
    }
    let elapsed = (duration - timer).clamp(0.0, duration);
    (elapsed / duration * PI * SHOCK_PULSE_K).sin().max(0.0)
}

/// Camera point on the charge dolly for the given progress.
#[inline]
pub fn dolly_target(progress: f32) -> Vec3 {
    CAMERA_FAR.lerp(CAMERA_NEAR, progress.clamp(0.0, 1.0))
}

pub fn position_target(kind: PhaseKind) -> Vec3 {
    match kind {
        PhaseKind::Settling | PhaseKind::Interactive => FINAL_POSITION,
        _ => CHARGE_POSITION,
    }
}

/// Light targets and smoothing factor for a phase.
pub fn light_target(kind: PhaseKind, progress: f32, flicker: f32) -> (LightIntensities, f32) {
    match kind {
        PhaseKind::Intro => (LightIntensities::from_array(LIGHTS_INTRO), LIGHT_SMOOTHING_CHARGE),
        PhaseKind::Charging => (
            LightIntensities::from_array(LIGHTS_CHARGE_EMPTY).lerp(
                LightIntensities::from_array(LIGHTS_CHARGE_FULL),
                progress.clamp(0.0, 1.0),
            ),
            LIGHT_SMOOTHING_CHARGE,
        ),
        PhaseKind::Discharge => (
            LightIntensities::from_array(LIGHTS_DISCHARGE).scaled(flicker),
            LIGHT_SMOOTHING_DISCHARGE,
        ),
        PhaseKind::Settling | PhaseKind::Interactive => (
            LightIntensities::from_array(LIGHTS_INTERACTIVE),
            LIGHT_SMOOTHING_SETTLE,
        ),
    }
}

#[derive(Clone, Debug)]
pub struct Interpolator {
    rotation_base: Vec2,
    position: Vec3,
    camera_base: Vec3,
    shock_rotation: Vec2,
    shock_camera: Vec3,
    lights: LightIntensities,
}

impl Default for Interpolator {
    fn default() -> Self {
        Self::new()
    }
}

impl Interpolator {
    pub fn new() -> Self {
        Self {
            rotation_base: INITIAL_ROTATION,
            position: CHARGE_POSITION,
            camera_base: CAMERA_FAR,
            shock_rotation: Vec2::ZERO,
            shock_camera: Vec3::ZERO,
            lights: LightIntensities::from_array(LIGHTS_INTRO),
        }
    }

    #[inline]
    pub fn pose(&self) -> ObjectPose {
        ObjectPose {
            position: self.position,
            rotation: self.rotation_base + self.shock_rotation,
        }
    }

    #[inline]
    pub fn camera_eye(&self) -> Vec3 {
        self.camera_base + self.shock_camera
    }

    #[inline]
    pub fn lights(&self) -> LightIntensities {
        self.lights
    }

    /// One-time snaps on phase entry.
    pub fn enter(&mut self, kind: PhaseKind) {
        match kind {
            PhaseKind::Discharge => {
                self.lights = LightIntensities::from_array(LIGHTS_DISCHARGE);
            }
            PhaseKind::Interactive => {
                self.lights = LightIntensities::from_array(LIGHTS_INTERACTIVE);
                self.shock_rotation = Vec2::ZERO;
                self.shock_camera = Vec3::ZERO;
            }
            _ => {}
        }
    }

    /// Advance one frame.
    ///
    /// `elapsed_sec` is session time (drives sway and shock oscillation),
    /// `flicker` the per-frame lightning brightness in [0, 1].
    pub fn step(
        &mut self,
        state: &SequenceState,
        dt_sec: f32,
        elapsed_sec: f32,
        discharge_duration: f32,
        flicker: f32,
    ) {
        let kind = state.kind();

        let mut rot_target = state.rotation_target();
        if kind >= PhaseKind::Charging {
            rot_target += idle_sway(elapsed_sec);
        }
        let a_rot = smoothing_alpha(ROTATION_SMOOTHING, dt_sec);
        self.rotation_base += (rot_target - self.rotation_base) * a_rot;

        let a_pos = smoothing_alpha(POSITION_SMOOTHING, dt_sec);
        self.position += (position_target(kind) - self.position) * a_pos;

        let cam_target = match kind {
            PhaseKind::Intro | PhaseKind::Charging => dolly_target(state.progress()),
            PhaseKind::Discharge => CAMERA_NEAR,
            PhaseKind::Settling | PhaseKind::Interactive => CAMERA_REST,
        };
        let a_cam = smoothing_alpha(CAMERA_SMOOTHING, dt_sec);
        self.camera_base += (cam_target - self.camera_base) * a_cam;

        match state.phase() {
            Phase::Discharge { timer } => {
                let pulse = shock_pulse(timer, discharge_duration);
                let w = elapsed_sec * SHOCK_FREQUENCY;
                self.shock_rotation =
                    Vec2::new(w.sin(), (w * 1.3).cos()) * (SHOCK_ROTATION_AMP * pulse);
                self.shock_camera =
                    Vec3::new((w * 1.1).sin(), (w * 0.9).cos(), 0.0) * (SHOCK_CAMERA_AMP * pulse);
            }
            _ => {
                self.shock_rotation = Vec2::ZERO;
                self.shock_camera = Vec3::ZERO;
            }
        }

        let (light_goal, light_factor) =
            light_target(kind, state.progress(), flicker.clamp(0.0, 1.0));
        let a_light = smoothing_alpha(light_factor, dt_sec);
        self.lights = self.lights.lerp(light_goal, a_light);
    }

    /// Whether the prop has reached its resting position within `epsilon`.
    #[inline]
    pub fn settled(&self, epsilon: f32) -> bool {
        self.position.distance(FINAL_POSITION) <= epsilon
    }
}
