//! The reveal sequencer: one owned object driven by `on_input` and `tick`.
//!
//! Field ownership is strict: the state machine writes phase/progress and the
//! rotation target, the aggregator writes its own gesture bookkeeping, the
//! interpolator writes pose/camera/lights, and the lightning generator writes
//! only the bolt it returns. Hosts with more than one thread should funnel
//! events into the task that owns the sequencer rather than share it.

use super::camera::Camera;
use super::config::SequenceConfig;
use super::constants::{INITIAL_ROTATION, MAX_FRAME_DT_SEC, PROP_HALF_EXTENTS};
use super::hit::{Cursor, Hit, HitGate};
use super::input::{Affordance, InputAggregator, InputEvent, Viewport};
use super::interp::{Interpolator, LightIntensities, ObjectPose};
use super::lightning::{Bolt, BoltShape, LightningGenerator};
use super::sequence::{Phase, PhaseChange, PhaseChanges, PhaseKind, SequenceState};
use glam::{Vec2, Vec3};

/// Render collaborator. Receives the frame's derived state, then one draw call.
pub trait SceneSink {
    fn set_object_pose(&mut self, pose: &ObjectPose);
    fn set_light_intensities(&mut self, lights: &LightIntensities);
    fn set_camera_pose(&mut self, eye: Vec3, target: Vec3);
    /// `None` outside the discharge.
    fn set_lightning(&mut self, bolt: Option<&Bolt>);
    fn resize(&mut self, width: u32, height: u32);
    fn draw_frame(&mut self, dt_sec: f32) -> anyhow::Result<()>;
}

/// Navigation collaborator, told to open the configured destination.
pub trait Navigator {
    fn navigate(&mut self, url: &str);
}

/// Sink that drops everything; used when no GPU is available.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullSink;

impl SceneSink for NullSink {
    fn set_object_pose(&mut self, _pose: &ObjectPose) {}
    fn set_light_intensities(&mut self, _lights: &LightIntensities) {}
    fn set_camera_pose(&mut self, _eye: Vec3, _target: Vec3) {}
    fn set_lightning(&mut self, _bolt: Option<&Bolt>) {}
    fn resize(&mut self, _width: u32, _height: u32) {}
    fn draw_frame(&mut self, _dt_sec: f32) -> anyhow::Result<()> {
        Ok(())
    }
}

/// What a tick changed, for the host's DOM bookkeeping.
#[derive(Clone, Debug, Default)]
pub struct TickReport {
    pub changes: PhaseChanges,
    /// hint to show because a phase that uses it just started
    pub reveal: Option<Affordance>,
    /// new cursor when the prop moved under a resting pointer
    pub cursor: Option<Cursor>,
    pub drawn: bool,
}

/// What an input event changed.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct InputReport {
    pub change: Option<PhaseChange>,
    pub dismissed: Option<Affordance>,
    /// new cursor, only when it differs from the previous one
    pub cursor: Option<Cursor>,
    pub navigated: bool,
    /// the event drove progress, so the host should suppress page scrolling
    pub consumed: bool,
}

pub struct Sequencer {
    cfg: SequenceConfig,
    state: SequenceState,
    input: InputAggregator,
    interp: Interpolator,
    lightning: LightningGenerator,
    gate: HitGate,
    cursor: Cursor,
    hover_at: Option<Vec2>,
    elapsed_sec: f32,
}

impl Sequencer {
    pub fn new(cfg: SequenceConfig, viewport: Viewport) -> Self {
        let lightning = match cfg.lightning_seed {
            Some(seed) => LightningGenerator::new(BoltShape::default(), seed),
            None => LightningGenerator::from_entropy(BoltShape::default()),
        };
        Self {
            state: SequenceState::new(INITIAL_ROTATION),
            input: InputAggregator::new(viewport),
            interp: Interpolator::new(),
            lightning,
            gate: HitGate::default(),
            cursor: Cursor::Default,
            hover_at: None,
            elapsed_sec: 0.0,
            cfg,
        }
    }

    #[inline]
    pub fn config(&self) -> &SequenceConfig {
        &self.cfg
    }

    #[inline]
    pub fn phase(&self) -> Phase {
        self.state.phase()
    }

    #[inline]
    pub fn kind(&self) -> PhaseKind {
        self.state.kind()
    }

    #[inline]
    pub fn progress(&self) -> f32 {
        self.state.progress()
    }

    #[inline]
    pub fn discharge_timer(&self) -> Option<f32> {
        self.state.discharge_timer()
    }

    #[inline]
    pub fn rotation_target(&self) -> Vec2 {
        self.state.rotation_target()
    }

    #[inline]
    pub fn pose(&self) -> ObjectPose {
        self.interp.pose()
    }

    #[inline]
    pub fn lights(&self) -> LightIntensities {
        self.interp.lights()
    }

    #[inline]
    pub fn cursor(&self) -> Cursor {
        self.cursor
    }

    #[inline]
    pub fn viewport(&self) -> Viewport {
        self.input.viewport()
    }

    pub fn camera(&self) -> Camera {
        Camera::looking_at_scene(self.interp.camera_eye(), self.input.viewport())
    }

    /// Point the bolt strikes: the center of the prop's top face, following
    /// its current pose.
    pub fn lightning_anchor(&self) -> Vec3 {
        self.interp
            .pose()
            .model_matrix()
            .transform_point3(Vec3::Y * PROP_HALF_EXTENTS.y)
    }

    pub fn is_hint_dismissed(&self, which: Affordance) -> bool {
        self.input.is_dismissed(which)
    }

    /// Viewport notification: `viewport` is in client pixels for input mapping,
    /// `backing_px` the drawing buffer size handed to the render collaborator.
    pub fn resize(&mut self, viewport: Viewport, backing_px: (u32, u32), sink: &mut dyn SceneSink) {
        self.input.set_viewport(viewport);
        sink.resize(backing_px.0, backing_px.1);
    }

    /// World-space ray from the camera through a client-pixel position.
    pub fn screen_ray(&self, client: Vec2) -> (Vec3, Vec3) {
        let ndc = self.input.viewport().ndc(client);
        self.camera().ray_through_ndc(ndc)
    }

    /// Hit-test a screen position (client pixels) against the posed prop.
    pub fn hit_test(&self, client: Vec2) -> Option<Hit> {
        let (ro, rd) = self.screen_ray(client);
        self.gate.test(self.kind(), &self.interp.pose(), ro, rd)
    }

    pub fn on_input(&mut self, event: &InputEvent, nav: &mut dyn Navigator) -> InputReport {
        let kind = self.kind();
        let deltas = self.input.process(event, kind, &self.cfg);
        let mut report = InputReport {
            dismissed: deltas.dismiss,
            consumed: kind.accepts_progress() && deltas.progress != 0.0,
            ..Default::default()
        };

        report.change = self.state.apply_progress(deltas.progress, &self.cfg);
        self.state.apply_rotation(deltas.rotation, self.cfg.rotation_limit);

        if let Some(pos) = deltas.hover {
            self.hover_at = Some(pos);
            report.cursor = self.refresh_cursor();
        }

        if let Some(pos) = deltas.activate {
            if let Some(hit) = self.hit_test(pos) {
                log::info!("[hit] {} at {:.2}, navigating", hit.part, hit.distance);
                nav.navigate(&self.cfg.target_url);
                report.navigated = true;
            }
        }
        report
    }

    /// Re-run the hover test at the last pointer position. Returns the cursor
    /// only when it changed.
    fn refresh_cursor(&mut self) -> Option<Cursor> {
        let pos = self.hover_at?;
        let (ro, rd) = self.screen_ray(pos);
        let next = self.gate.hover(self.kind(), &self.interp.pose(), ro, rd);
        if next == self.cursor {
            return None;
        }
        self.cursor = next;
        Some(next)
    }

    /// Advance one animation frame and push the result to the render collaborator.
    pub fn tick(&mut self, dt_sec: f32, sink: &mut dyn SceneSink) -> TickReport {
        let dt = if dt_sec.is_finite() {
            dt_sec.clamp(0.0, MAX_FRAME_DT_SEC)
        } else {
            0.0
        };
        self.elapsed_sec += dt;

        let mut changes = self.state.advance(dt, &self.cfg);
        for c in &changes {
            self.interp.enter(c.to);
        }

        let anchor = self.lightning_anchor();
        let hide_below = self.cfg.lightning_hide_below_sec;
        let bolt = self
            .state
            .discharge_timer()
            .map(|timer| self.lightning.generate(anchor, timer, hide_below));
        let flicker = bolt.as_ref().map_or(1.0, |b| b.flicker);

        self.interp.step(
            &self.state,
            dt,
            self.elapsed_sec,
            self.cfg.discharge_duration_sec,
            flicker,
        );

        if self.kind() == PhaseKind::Settling && self.interp.settled(self.cfg.settle_epsilon) {
            if let Some(c) = self.state.finish_settling() {
                self.interp.enter(c.to);
                changes.push(c);
            }
        }

        let reveal = changes
            .iter()
            .any(|c| c.to == PhaseKind::Interactive)
            .then_some(Affordance::DragHint)
            .filter(|a| !self.input.is_dismissed(*a));

        // the prop keeps swaying under a still pointer
        let cursor = if self.kind() == PhaseKind::Interactive {
            self.refresh_cursor()
        } else {
            None
        };

        let pose = self.interp.pose();
        let lights = self.interp.lights();
        let camera = self.camera();
        sink.set_object_pose(&pose);
        sink.set_light_intensities(&lights);
        sink.set_camera_pose(camera.eye, camera.target);
        sink.set_lightning(bolt.as_ref());
        let drawn = match sink.draw_frame(dt) {
            Ok(()) => true,
            Err(e) => {
                log::error!("render error: {:?}", e);
                false
            }
        };

        TickReport {
            changes,
            reveal,
            cursor,
            drawn,
        }
    }
}
