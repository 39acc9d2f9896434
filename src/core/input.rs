use super::config::SequenceConfig;
use super::constants::{POINTER_PITCH_GAIN, POINTER_YAW_GAIN, SWIPE_ROTATE_GAIN};
use super::sequence::PhaseKind;
use glam::Vec2;
use smallvec::SmallVec;

/// Touch contact positions in client pixels (one or two fingers in practice).
pub type Contacts = SmallVec<[Vec2; 2]>;

/// Raw input as delivered by the host, in client (CSS pixel) coordinates.
#[derive(Clone, Debug, PartialEq)]
pub enum InputEvent {
    PointerMove { x: f32, y: f32 },
    Click { x: f32, y: f32 },
    /// Wheel deltas already converted to pixels.
    Wheel { delta_x: f32, delta_y: f32 },
    TouchStart { contacts: Contacts },
    TouchMove { contacts: Contacts },
    /// `remaining` is the number of contacts still on the surface.
    TouchEnd { remaining: usize },
    /// The host aborted the gesture; it never classifies as a tap.
    TouchCancel,
}

/// Drawing surface size in client pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 1.0,
            height: 1.0,
        }
    }
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width: width.max(1.0),
            height: height.max(1.0),
        }
    }

    /// Screen-normalized coordinates: x right, y down, both in [-1, 1] across the viewport.
    #[inline]
    pub fn normalized(&self, p: Vec2) -> Vec2 {
        Vec2::new(p.x / self.width * 2.0 - 1.0, p.y / self.height * 2.0 - 1.0)
    }

    /// Normalized device coordinates (y up), as used for ray casting.
    #[inline]
    pub fn ndc(&self, p: Vec2) -> Vec2 {
        let n = self.normalized(p);
        Vec2::new(n.x, -n.y)
    }

    #[inline]
    pub fn aspect(&self) -> f32 {
        self.width / self.height
    }
}

/// On-screen hints, each dismissed once on the first qualifying input of its regime.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Affordance {
    /// "scroll to continue", shown while charging
    ScrollHint,
    /// "drag to rotate", shown once the prop can be rotated
    DragHint,
}

impl Affordance {
    pub fn element_id(self) -> &'static str {
        match self {
            Affordance::ScrollHint => "hint-scroll",
            Affordance::DragHint => "hint-drag",
        }
    }
}

/// Normalized result of one input event.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct InputDeltas {
    pub progress: f32,
    pub rotation: Vec2,
    /// Position of a click or classified tap, for the hit-test gate.
    pub activate: Option<Vec2>,
    /// Pointer position for hover feedback.
    pub hover: Option<Vec2>,
    pub dismiss: Option<Affordance>,
}

#[derive(Clone, Copy, Debug, Default)]
struct AffordanceLatch {
    scroll_dismissed: bool,
    drag_dismissed: bool,
}

impl AffordanceLatch {
    fn dismiss(&mut self, which: Affordance) -> Option<Affordance> {
        let slot = match which {
            Affordance::ScrollHint => &mut self.scroll_dismissed,
            Affordance::DragHint => &mut self.drag_dismissed,
        };
        if *slot {
            return None;
        }
        *slot = true;
        Some(which)
    }

    fn is_dismissed(&self, which: Affordance) -> bool {
        match which {
            Affordance::ScrollHint => self.scroll_dismissed,
            Affordance::DragHint => self.drag_dismissed,
        }
    }
}

/// Single-finger vs multi-finger gesture bookkeeping.
#[derive(Clone, Copy, Debug, Default)]
pub struct TouchState {
    pub active: bool,
    pub last: Option<Vec2>,
    pub last_count: usize,
    pub max_contacts: usize,
    pub travelled_px: f32,
}

impl TouchState {
    fn begin(&mut self, contacts: &[Vec2]) {
        if !self.active {
            *self = TouchState {
                active: true,
                ..Default::default()
            };
        }
        self.max_contacts = self.max_contacts.max(contacts.len());
        self.last_count = contacts.len();
        self.last = centroid(contacts);
    }

    /// Returns the centroid motion since the previous move. A change in contact
    /// count re-anchors without producing motion.
    fn step(&mut self, contacts: &[Vec2]) -> Vec2 {
        let Some(c) = centroid(contacts) else {
            return Vec2::ZERO;
        };
        self.max_contacts = self.max_contacts.max(contacts.len());
        let delta = match self.last {
            Some(prev) if self.last_count == contacts.len() => c - prev,
            _ => Vec2::ZERO,
        };
        self.travelled_px += delta.length();
        self.last = Some(c);
        self.last_count = contacts.len();
        delta
    }

    /// Classify the finished gesture. Only single-finger gestures can be taps.
    fn end(&mut self, tap_threshold_px: f32) -> Option<Vec2> {
        let tap = (self.active && self.max_contacts == 1 && self.travelled_px < tap_threshold_px)
            .then_some(self.last)
            .flatten();
        *self = TouchState::default();
        tap
    }

    fn cancel(&mut self) {
        *self = TouchState::default();
    }
}

#[inline]
pub fn centroid(points: &[Vec2]) -> Option<Vec2> {
    if points.is_empty() {
        return None;
    }
    Some(points.iter().copied().sum::<Vec2>() / points.len() as f32)
}

/// Turns pointer, wheel and touch events into progress/rotation deltas.
///
/// Routing depends on the phase: before the discharge vertical scroll/swipe
/// charges progress and rotation input is dropped; from the discharge on,
/// progress input is dropped and pointer/swipe motion rotates the prop.
#[derive(Clone, Debug, Default)]
pub struct InputAggregator {
    viewport: Viewport,
    pointer_last: Option<Vec2>,
    touch: TouchState,
    hints: AffordanceLatch,
}

impl InputAggregator {
    pub fn new(viewport: Viewport) -> Self {
        Self {
            viewport,
            ..Default::default()
        }
    }

    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
        // old positions are meaningless in the new normalization
        self.pointer_last = None;
    }

    #[inline]
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    #[inline]
    pub fn touch_state(&self) -> &TouchState {
        &self.touch
    }

    pub fn is_dismissed(&self, which: Affordance) -> bool {
        self.hints.is_dismissed(which)
    }

    pub fn process(
        &mut self,
        event: &InputEvent,
        phase: PhaseKind,
        cfg: &SequenceConfig,
    ) -> InputDeltas {
        let mut out = InputDeltas::default();
        match event {
            InputEvent::Wheel { delta_y, .. } => {
                if phase.accepts_progress() {
                    out.progress = sanitize(*delta_y) * cfg.wheel_progress_per_px;
                }
            }
            InputEvent::PointerMove { x, y } => {
                let pos = Vec2::new(*x, *y);
                let n = self.viewport.normalized(pos);
                if let Some(prev) = self.pointer_last {
                    if phase.accepts_rotation() {
                        let d = n - prev;
                        out.rotation = Vec2::new(d.x * POINTER_YAW_GAIN, d.y * POINTER_PITCH_GAIN);
                    }
                }
                if n.is_finite() {
                    self.pointer_last = Some(n);
                }
                out.hover = Some(pos);
            }
            InputEvent::Click { x, y } => {
                out.activate = Some(Vec2::new(*x, *y));
            }
            InputEvent::TouchStart { contacts } => {
                self.touch.begin(contacts);
            }
            InputEvent::TouchMove { contacts } => {
                let d = self.touch.step(contacts);
                if phase.accepts_progress() {
                    // swiping up scrolls down the page
                    out.progress = sanitize(-d.y) * cfg.swipe_progress_per_px;
                } else {
                    let dn = Vec2::new(d.x / self.viewport.width, d.y / self.viewport.height) * 2.0;
                    out.rotation = Vec2::new(dn.x * POINTER_YAW_GAIN, dn.y * POINTER_PITCH_GAIN)
                        * SWIPE_ROTATE_GAIN;
                }
            }
            InputEvent::TouchEnd { remaining } => {
                if *remaining == 0 {
                    out.activate = self.touch.end(cfg.tap_max_movement_px);
                } else {
                    // lifting one of two fingers: next move re-anchors
                    self.touch.last = None;
                }
            }
            InputEvent::TouchCancel => {
                self.touch.cancel();
            }
        }
        if !out.rotation.is_finite() {
            out.rotation = Vec2::ZERO;
        }

        if phase.accepts_progress() {
            if out.progress > 0.0 && out.progress >= cfg.dismiss_threshold {
                out.dismiss = self.hints.dismiss(Affordance::ScrollHint);
            }
        } else if out.rotation != Vec2::ZERO && out.rotation.length() >= cfg.dismiss_threshold {
            out.dismiss = self.hints.dismiss(Affordance::DragHint);
        }
        out
    }
}

#[inline]
fn sanitize(v: f32) -> f32 {
    if v.is_finite() {
        v
    } else {
        0.0
    }
}
