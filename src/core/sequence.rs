//! Phase state machine for the reveal sequence.
//!
//! The sequence only ever moves forward:
//! INTRO → CHARGING → DISCHARGE → SETTLING → INTERACTIVE.
//! Per-phase data (the discharge countdown) lives inside the `Phase` variant,
//! so a timer cannot exist outside DISCHARGE and no phase can be re-entered.

use super::config::SequenceConfig;
use glam::Vec2;
use smallvec::SmallVec;

/// Current stage of the sequence, carrying the data only that stage needs.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Phase {
    Intro,
    Charging,
    Discharge { timer: f32 },
    Settling,
    Interactive,
}

/// Data-free phase tag, ordered by sequence position.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PhaseKind {
    Intro,
    Charging,
    Discharge,
    Settling,
    Interactive,
}

impl Phase {
    #[inline]
    pub fn kind(&self) -> PhaseKind {
        match self {
            Phase::Intro => PhaseKind::Intro,
            Phase::Charging => PhaseKind::Charging,
            Phase::Discharge { .. } => PhaseKind::Discharge,
            Phase::Settling => PhaseKind::Settling,
            Phase::Interactive => PhaseKind::Interactive,
        }
    }
}

impl PhaseKind {
    /// Progress input drives the sequence only before the discharge.
    #[inline]
    pub fn accepts_progress(self) -> bool {
        self <= PhaseKind::Charging
    }

    /// From the discharge onwards, pointer/swipe motion rotates the prop.
    #[inline]
    pub fn accepts_rotation(self) -> bool {
        self >= PhaseKind::Discharge
    }

    pub fn label(self) -> &'static str {
        match self {
            PhaseKind::Intro => "intro",
            PhaseKind::Charging => "charging",
            PhaseKind::Discharge => "discharge",
            PhaseKind::Settling => "settling",
            PhaseKind::Interactive => "interactive",
        }
    }
}

/// A phase transition that fired. Emitted exactly once per edge.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PhaseChange {
    pub from: PhaseKind,
    pub to: PhaseKind,
}

pub type PhaseChanges = SmallVec<[PhaseChange; 2]>;

/// Sequence-owned state: phase, charge progress and the user's rotation target.
///
/// Pose and light intensities are owned by the interpolator.
#[derive(Clone, Debug)]
pub struct SequenceState {
    phase: Phase,
    progress: f32,
    rotation_target: Vec2,
}

impl SequenceState {
    pub fn new(initial_rotation: Vec2) -> Self {
        Self {
            phase: Phase::Intro,
            progress: 0.0,
            rotation_target: initial_rotation,
        }
    }

    #[inline]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    #[inline]
    pub fn kind(&self) -> PhaseKind {
        self.phase.kind()
    }

    #[inline]
    pub fn progress(&self) -> f32 {
        self.progress
    }

    #[inline]
    pub fn rotation_target(&self) -> Vec2 {
        self.rotation_target
    }

    /// Remaining discharge time; `None` outside DISCHARGE.
    #[inline]
    pub fn discharge_timer(&self) -> Option<f32> {
        match self.phase {
            Phase::Discharge { timer } => Some(timer),
            _ => None,
        }
    }

    /// Accumulate a progress delta. Negative and non-finite deltas are dropped so
    /// progress never rewinds; the result is clamped to [0, 1].
    ///
    /// A delta of at least `charge_start_threshold` received during INTRO also
    /// moves the sequence into CHARGING.
    pub fn apply_progress(&mut self, delta: f32, cfg: &SequenceConfig) -> Option<PhaseChange> {
        if !self.kind().accepts_progress() || !delta.is_finite() || delta <= 0.0 {
            return None;
        }
        let mut change = None;
        if self.phase == Phase::Intro {
            if delta < cfg.charge_start_threshold {
                return None;
            }
            change = Some(self.enter(Phase::Charging));
        }
        self.progress = (self.progress + delta).clamp(0.0, 1.0);
        change
    }

    /// Nudge the rotation target. Ignored before the discharge.
    pub fn apply_rotation(&mut self, delta: Vec2, limit: Vec2) -> bool {
        if !self.kind().accepts_rotation() || !delta.is_finite() || delta == Vec2::ZERO {
            return false;
        }
        let limit = limit.abs();
        self.rotation_target = (self.rotation_target + delta).clamp(-limit, limit);
        true
    }

    /// Evaluate the time- and progress-driven guards for one animation tick.
    pub fn advance(&mut self, dt_sec: f32, cfg: &SequenceConfig) -> PhaseChanges {
        let mut changes = PhaseChanges::new();
        let dt = if dt_sec.is_finite() { dt_sec.max(0.0) } else { 0.0 };

        if self.phase == Phase::Intro && cfg.auto_charge {
            changes.push(self.enter(Phase::Charging));
        }

        match self.phase {
            Phase::Charging if self.progress >= 1.0 => {
                self.progress = 1.0;
                changes.push(self.enter(Phase::Discharge {
                    timer: cfg.discharge_duration_sec.max(0.0),
                }));
            }
            Phase::Discharge { timer } => {
                let remaining = (timer - dt).max(0.0);
                if remaining <= 0.0 {
                    changes.push(self.enter(Phase::Settling));
                } else {
                    self.phase = Phase::Discharge { timer: remaining };
                }
            }
            _ => {}
        }
        changes
    }

    /// Called once the interpolated pose has converged on its resting place.
    pub fn finish_settling(&mut self) -> Option<PhaseChange> {
        (self.phase == Phase::Settling).then(|| self.enter(Phase::Interactive))
    }

    fn enter(&mut self, next: Phase) -> PhaseChange {
        let change = PhaseChange {
            from: self.kind(),
            to: next.kind(),
        };
        debug_assert!(change.to > change.from, "phase regression {:?}", change);
        self.phase = next;
        log::info!(
            "[sequence] {} -> {} (progress {:.2})",
            change.from.label(),
            change.to.label(),
            self.progress
        );
        change
    }
}
