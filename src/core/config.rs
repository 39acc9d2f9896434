use super::constants::*;
use glam::Vec2;

/// Destination opened when the prop is clicked in the interactive phase.
pub const DEFAULT_TARGET_URL: &str = "https://example.com/";

/// Runtime tuning for the reveal sequence.
///
/// - `target_url` is handed to the navigation collaborator on a successful hit
/// - `auto_charge` skips waiting for input and enters CHARGING on the first tick
/// - `charge_start_threshold` is the minimum progress delta that counts as
///   "qualifying" input for leaving INTRO (0.0 = any positive delta)
/// - `dismiss_threshold` is the minimum input magnitude (progress units while
///   charging, radians afterwards) that hides the on-screen hint
/// - `lightning_seed` fixes the bolt RNG; `None` draws from entropy
#[derive(Clone, Debug)]
pub struct SequenceConfig {
    pub target_url: String,
    pub auto_charge: bool,
    pub charge_start_threshold: f32,
    pub dismiss_threshold: f32,
    pub wheel_progress_per_px: f32,
    pub swipe_progress_per_px: f32,
    pub discharge_duration_sec: f32,
    pub lightning_hide_below_sec: f32,
    pub settle_epsilon: f32,
    pub tap_max_movement_px: f32,
    pub rotation_limit: Vec2,
    pub lightning_seed: Option<u64>,
}

impl Default for SequenceConfig {
    fn default() -> Self {
        Self {
            target_url: DEFAULT_TARGET_URL.to_string(),
            auto_charge: false,
            charge_start_threshold: 0.0,
            dismiss_threshold: 0.0,
            wheel_progress_per_px: WHEEL_PROGRESS_PER_PX,
            swipe_progress_per_px: SWIPE_PROGRESS_PER_PX,
            discharge_duration_sec: DISCHARGE_DURATION_SEC,
            lightning_hide_below_sec: LIGHTNING_HIDE_BELOW_SEC,
            settle_epsilon: SETTLE_EPSILON,
            tap_max_movement_px: TAP_MAX_MOVEMENT_PX,
            rotation_limit: ROTATION_LIMIT,
            lightning_seed: None,
        }
    }
}

impl SequenceConfig {
    /// Apply a `key=value` override as found in the canvas `data-*` attributes.
    ///
    /// Returns `false` when the key is unknown or the value does not parse; the
    /// previous value is kept in that case.
    pub fn apply_override(&mut self, key: &str, value: &str) -> bool {
        let value = value.trim();
        match key {
            "href" if !value.is_empty() => {
                self.target_url = value.to_string();
                true
            }
            "auto-charge" => match value {
                "" | "true" | "1" => {
                    self.auto_charge = true;
                    true
                }
                "false" | "0" => {
                    self.auto_charge = false;
                    true
                }
                _ => false,
            },
            "charge-threshold" => set_non_negative(&mut self.charge_start_threshold, value),
            "dismiss-threshold" => set_non_negative(&mut self.dismiss_threshold, value),
            "tap-threshold" => set_non_negative(&mut self.tap_max_movement_px, value),
            "discharge-duration" => match value.parse::<f32>() {
                Ok(v) if v.is_finite() && v > 0.0 => {
                    self.discharge_duration_sec = v;
                    true
                }
                _ => false,
            },
            "seed" => match value.parse::<u64>() {
                Ok(v) => {
                    self.lightning_seed = Some(v);
                    true
                }
                Err(_) => false,
            },
            _ => false,
        }
    }
}

fn set_non_negative(slot: &mut f32, value: &str) -> bool {
    match value.parse::<f32>() {
        Ok(v) if v.is_finite() && v >= 0.0 => {
            *slot = v;
            true
        }
        _ => false,
    }
}
