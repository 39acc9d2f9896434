// End-to-end scenarios through the sequencer with recording collaborators.

use capsule_reveal::core::constants::*;
use capsule_reveal::core::{
    Affordance, Bolt, Cursor, InputEvent, LightIntensities, Navigator, ObjectPose, PhaseKind,
    SceneSink, SequenceConfig, Sequencer, Viewport,
};
use glam::{Vec2, Vec3};
use smallvec::smallvec;

const W: f32 = 800.0;
const H: f32 = 600.0;
const DT: f32 = 1.0 / 60.0;

#[derive(Default)]
struct RecordingSink {
    draws: usize,
    bolts: usize,
    last_bolt: Option<Bolt>,
    last_pose: Option<ObjectPose>,
    last_lights: Option<LightIntensities>,
    last_camera: Option<(Vec3, Vec3)>,
    resized: Vec<(u32, u32)>,
    fail: bool,
}

impl SceneSink for RecordingSink {
    fn set_object_pose(&mut self, pose: &ObjectPose) {
        self.last_pose = Some(*pose);
    }

    fn set_light_intensities(&mut self, lights: &LightIntensities) {
        self.last_lights = Some(*lights);
    }

    fn set_camera_pose(&mut self, eye: Vec3, target: Vec3) {
        self.last_camera = Some((eye, target));
    }

    fn set_lightning(&mut self, bolt: Option<&Bolt>) {
        if bolt.is_some() {
            self.bolts += 1;
        }
        self.last_bolt = bolt.cloned();
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.resized.push((width, height));
    }

    fn draw_frame(&mut self, _dt_sec: f32) -> anyhow::Result<()> {
        if self.fail {
            anyhow::bail!("surface lost");
        }
        self.draws += 1;
        Ok(())
    }
}

#[derive(Default)]
struct RecordingNavigator {
    urls: Vec<String>,
}

impl Navigator for RecordingNavigator {
    fn navigate(&mut self, url: &str) {
        self.urls.push(url.to_string());
    }
}

fn seeded() -> SequenceConfig {
    SequenceConfig {
        lightning_seed: Some(7),
        ..Default::default()
    }
}

fn wheel(px: f32) -> InputEvent {
    InputEvent::Wheel {
        delta_x: 0.0,
        delta_y: px,
    }
}

/// Scroll until progress saturates, then tick into the discharge.
fn charge(seq: &mut Sequencer, sink: &mut RecordingSink, nav: &mut RecordingNavigator) {
    for _ in 0..20 {
        if seq.progress() >= 1.0 {
            break;
        }
        seq.on_input(&wheel(100.0), nav);
    }
    assert_eq!(seq.progress(), 1.0);
    let report = seq.tick(DT, sink);
    assert_eq!(seq.kind(), PhaseKind::Discharge);
    assert_eq!(report.changes.len(), 1);
}

/// Tick until `kind` is reached, returning every transition seen on the way.
fn run_until(
    seq: &mut Sequencer,
    sink: &mut RecordingSink,
    kind: PhaseKind,
) -> Vec<(PhaseKind, Option<Affordance>)> {
    let mut seen = Vec::new();
    for _ in 0..1000 {
        if seq.kind() == kind {
            return seen;
        }
        let report = seq.tick(DT, sink);
        for c in &report.changes {
            seen.push((c.to, report.reveal));
        }
    }
    panic!("never reached {:?}", kind);
}

/// Client-pixel position of the prop center on screen.
fn prop_on_screen(seq: &Sequencer) -> Vec2 {
    let ndc = seq.camera().project(seq.pose().position).unwrap();
    Vec2::new((ndc.x + 1.0) * 0.5 * W, (1.0 - ndc.y) * 0.5 * H)
}

fn revealed() -> (Sequencer, RecordingSink, RecordingNavigator) {
    let mut seq = Sequencer::new(seeded(), Viewport::new(W, H));
    let mut sink = RecordingSink::default();
    let mut nav = RecordingNavigator::default();
    charge(&mut seq, &mut sink, &mut nav);
    run_until(&mut seq, &mut sink, PhaseKind::Interactive);
    (seq, sink, nav)
}

#[test]
fn scroll_drives_the_full_reveal() {
    let mut seq = Sequencer::new(seeded(), Viewport::new(W, H));
    let mut sink = RecordingSink::default();
    let mut nav = RecordingNavigator::default();
    assert_eq!(seq.kind(), PhaseKind::Intro);

    let first = seq.on_input(&wheel(100.0), &mut nav);
    assert_eq!(first.change.map(|c| c.to), Some(PhaseKind::Charging));
    assert_eq!(first.dismissed, Some(Affordance::ScrollHint));
    assert!(first.consumed);

    charge(&mut seq, &mut sink, &mut nav);
    assert_eq!(seq.discharge_timer(), Some(DISCHARGE_DURATION_SEC));
    assert!(sink.last_bolt.is_some());

    let seen = run_until(&mut seq, &mut sink, PhaseKind::Interactive);
    let kinds: Vec<_> = seen.iter().map(|(k, _)| *k).collect();
    assert_eq!(kinds, vec![PhaseKind::Settling, PhaseKind::Interactive]);
    assert_eq!(seen[1].1, Some(Affordance::DragHint));

    // one bolt per discharge frame and none afterwards
    assert!(sink.bolts >= 9 && sink.bolts <= 11, "bolts {}", sink.bolts);
    assert!(sink.last_bolt.is_none());
    assert!(seq.pose().position.distance(FINAL_POSITION) <= seq.config().settle_epsilon);
    assert_eq!(seq.lights(), LightIntensities::from_array(LIGHTS_INTERACTIVE));
    assert_eq!(sink.last_lights, Some(seq.lights()));
    assert!(nav.urls.is_empty());
}

#[test]
fn swipe_up_charges_like_scroll() {
    let mut seq = Sequencer::new(seeded(), Viewport::new(W, H));
    let mut sink = RecordingSink::default();
    let mut nav = RecordingNavigator::default();
    seq.on_input(
        &InputEvent::TouchStart {
            contacts: smallvec![Vec2::new(400.0, 500.0)],
        },
        &mut nav,
    );
    let report = seq.on_input(
        &InputEvent::TouchMove {
            contacts: smallvec![Vec2::new(400.0, 50.0)],
        },
        &mut nav,
    );
    assert!(report.consumed);
    assert_eq!(seq.kind(), PhaseKind::Charging);
    assert_eq!(seq.progress(), 1.0);
    seq.on_input(&InputEvent::TouchEnd { remaining: 0 }, &mut nav);
    seq.tick(DT, &mut sink);
    assert_eq!(seq.kind(), PhaseKind::Discharge);
}

#[test]
fn progress_input_is_ignored_after_charging() {
    let mut seq = Sequencer::new(seeded(), Viewport::new(W, H));
    let mut sink = RecordingSink::default();
    let mut nav = RecordingNavigator::default();
    charge(&mut seq, &mut sink, &mut nav);

    let report = seq.on_input(&wheel(500.0), &mut nav);
    assert!(!report.consumed);
    assert_eq!(report.change, None);
    assert_eq!(seq.progress(), 1.0);
    assert_eq!(seq.kind(), PhaseKind::Discharge);
}

#[test]
fn auto_charge_starts_without_input() {
    let cfg = SequenceConfig {
        auto_charge: true,
        ..seeded()
    };
    let mut seq = Sequencer::new(cfg, Viewport::new(W, H));
    let mut sink = RecordingSink::default();
    let report = seq.tick(DT, &mut sink);
    assert_eq!(report.changes.len(), 1);
    assert_eq!(report.changes[0].to, PhaseKind::Charging);
    assert_eq!(seq.progress(), 0.0);
    seq.tick(DT, &mut sink);
    assert_eq!(seq.kind(), PhaseKind::Charging);
}

#[test]
fn long_frame_gaps_are_clamped() {
    let mut seq = Sequencer::new(seeded(), Viewport::new(W, H));
    let mut sink = RecordingSink::default();
    let mut nav = RecordingNavigator::default();
    charge(&mut seq, &mut sink, &mut nav);

    seq.tick(10.0, &mut sink);
    let timer = seq.discharge_timer().unwrap();
    assert!((timer - (DISCHARGE_DURATION_SEC - MAX_FRAME_DT_SEC)).abs() < 1e-5);

    seq.tick(f32::NAN, &mut sink);
    seq.tick(-1.0, &mut sink);
    assert_eq!(seq.discharge_timer(), Some(timer));

    seq.tick(MAX_FRAME_DT_SEC, &mut sink);
    assert_eq!(seq.kind(), PhaseKind::Settling);
}

#[test]
fn clicking_the_prop_navigates_once_interactive() {
    let (mut seq, _sink, mut nav) = revealed();
    let at = prop_on_screen(&seq);
    let report = seq.on_input(&InputEvent::Click { x: at.x, y: at.y }, &mut nav);
    assert!(report.navigated);
    assert_eq!(nav.urls, vec![seq.config().target_url.clone()]);

    let report = seq.on_input(&InputEvent::Click { x: 0.0, y: 0.0 }, &mut nav);
    assert!(!report.navigated);
    assert_eq!(nav.urls.len(), 1);
}

#[test]
fn clicks_before_the_reveal_do_nothing() {
    let mut seq = Sequencer::new(seeded(), Viewport::new(W, H));
    let mut sink = RecordingSink::default();
    let mut nav = RecordingNavigator::default();
    let center = InputEvent::Click { x: W / 2.0, y: H / 2.0 };

    assert!(!seq.on_input(&center, &mut nav).navigated);
    charge(&mut seq, &mut sink, &mut nav);
    assert!(!seq.on_input(&center, &mut nav).navigated);
    run_until(&mut seq, &mut sink, PhaseKind::Settling);
    assert!(!seq.on_input(&center, &mut nav).navigated);
    assert!(nav.urls.is_empty());
}

#[test]
fn short_tap_navigates_but_drag_does_not() {
    let (mut seq, _sink, mut nav) = revealed();
    let at = prop_on_screen(&seq);

    let drag_end = at + Vec2::new(50.0, 0.0);
    seq.on_input(&InputEvent::TouchStart { contacts: smallvec![at] }, &mut nav);
    seq.on_input(&InputEvent::TouchMove { contacts: smallvec![drag_end] }, &mut nav);
    let report = seq.on_input(&InputEvent::TouchEnd { remaining: 0 }, &mut nav);
    assert!(!report.navigated);

    let nudge = at + Vec2::new(3.0, 0.0);
    seq.on_input(&InputEvent::TouchStart { contacts: smallvec![at] }, &mut nav);
    seq.on_input(&InputEvent::TouchMove { contacts: smallvec![nudge] }, &mut nav);
    let report = seq.on_input(&InputEvent::TouchEnd { remaining: 0 }, &mut nav);
    assert!(report.navigated);
    assert_eq!(nav.urls.len(), 1);
}

#[test]
fn hover_reports_cursor_changes_only() {
    let (mut seq, _sink, mut nav) = revealed();
    let at = prop_on_screen(&seq);
    let over = InputEvent::PointerMove { x: at.x, y: at.y };
    let away = InputEvent::PointerMove { x: 1.0, y: 1.0 };

    assert_eq!(seq.on_input(&over, &mut nav).cursor, Some(Cursor::Pointer));
    assert_eq!(seq.cursor(), Cursor::Pointer);
    assert_eq!(seq.on_input(&over, &mut nav).cursor, None);
    assert_eq!(seq.on_input(&away, &mut nav).cursor, Some(Cursor::Default));
}

#[test]
fn pointer_motion_rotates_within_limits() {
    let (mut seq, _sink, mut nav) = revealed();
    let before = seq.rotation_target();
    seq.on_input(&InputEvent::PointerMove { x: 0.0, y: 300.0 }, &mut nav);
    seq.on_input(&InputEvent::PointerMove { x: 400.0, y: 300.0 }, &mut nav);
    assert!(seq.rotation_target().x > before.x);

    for i in 0..200 {
        let x = if i % 2 == 0 { 800.0 } else { 0.0 };
        seq.on_input(&InputEvent::PointerMove { x, y: 0.0 }, &mut nav);
        seq.on_input(&InputEvent::PointerMove { x, y: 600.0 }, &mut nav);
    }
    let r = seq.rotation_target();
    assert!(r.x.abs() <= ROTATION_LIMIT.x + 1e-6);
    assert!(r.y.abs() <= ROTATION_LIMIT.y + 1e-6);
}

#[test]
fn drag_hint_stays_hidden_once_dismissed() {
    let mut seq = Sequencer::new(seeded(), Viewport::new(W, H));
    let mut sink = RecordingSink::default();
    let mut nav = RecordingNavigator::default();
    charge(&mut seq, &mut sink, &mut nav);
    run_until(&mut seq, &mut sink, PhaseKind::Settling);

    seq.on_input(&InputEvent::PointerMove { x: 100.0, y: 300.0 }, &mut nav);
    let report = seq.on_input(&InputEvent::PointerMove { x: 300.0, y: 300.0 }, &mut nav);
    assert_eq!(report.dismissed, Some(Affordance::DragHint));
    assert!(seq.is_hint_dismissed(Affordance::DragHint));

    let seen = run_until(&mut seq, &mut sink, PhaseKind::Interactive);
    assert_eq!(seen, vec![(PhaseKind::Interactive, None)]);
}

#[test]
fn resize_updates_viewport_and_sink() {
    let mut seq = Sequencer::new(seeded(), Viewport::new(W, H));
    let mut sink = RecordingSink::default();
    seq.resize(Viewport::new(1024.0, 768.0), (2048, 1536), &mut sink);
    assert_eq!(seq.viewport(), Viewport::new(1024.0, 768.0));
    assert_eq!(sink.resized, vec![(2048, 1536)]);
    assert!((seq.camera().aspect - 1024.0 / 768.0).abs() < 1e-6);
}

#[test]
fn render_failure_does_not_stall_the_sequence() {
    let mut seq = Sequencer::new(seeded(), Viewport::new(W, H));
    let mut sink = RecordingSink {
        fail: true,
        ..Default::default()
    };
    let mut nav = RecordingNavigator::default();
    for _ in 0..13 {
        seq.on_input(&wheel(100.0), &mut nav);
    }
    let report = seq.tick(DT, &mut sink);
    assert!(!report.drawn);
    assert_eq!(seq.kind(), PhaseKind::Discharge);
    assert_eq!(sink.draws, 0);
    assert!(sink.last_pose.is_some());
    assert_eq!(sink.last_camera.map(|(_, target)| target), Some(CAMERA_TARGET));
}

#[test]
fn seeded_sequences_strike_identically() {
    let run = || {
        let mut seq = Sequencer::new(seeded(), Viewport::new(W, H));
        let mut sink = RecordingSink::default();
        let mut nav = RecordingNavigator::default();
        charge(&mut seq, &mut sink, &mut nav);
        let first = sink.last_bolt.clone();
        seq.tick(DT, &mut sink);
        (first, sink.last_bolt)
    };
    let a = run();
    let b = run();
    assert!(a.0.is_some());
    assert_eq!(a, b);
    assert_ne!(a.0, a.1);
}

#[test]
fn bolt_strikes_the_top_of_the_posed_prop() {
    let mut seq = Sequencer::new(seeded(), Viewport::new(W, H));
    let mut sink = RecordingSink::default();
    let mut nav = RecordingNavigator::default();
    for _ in 0..13 {
        seq.on_input(&wheel(100.0), &mut nav);
    }
    let pose = seq.pose();
    let anchor = seq.lightning_anchor();
    let top = Vec3::Y * PROP_HALF_EXTENTS.y;
    assert_eq!(anchor, pose.model_matrix().transform_point3(top));
    // the initial pitch tilts the top face towards the camera
    assert!(anchor.distance(pose.position + top) > 0.01);

    seq.tick(DT, &mut sink);
    assert_eq!(seq.kind(), PhaseKind::Discharge);
    let bolt = sink.last_bolt.clone().unwrap();
    assert_eq!(*bolt.points.last().unwrap(), anchor);
    assert!(bolt.visible);

    // the shock shakes the prop but the strike stays on its top face
    for _ in 0..4 {
        seq.tick(DT, &mut sink);
        let pose = seq.pose();
        let offset = seq.lightning_anchor() - pose.position;
        assert!((offset.length() - PROP_HALF_EXTENTS.y).abs() < 1e-4);
        assert_eq!(
            seq.lightning_anchor(),
            pose.model_matrix().transform_point3(top)
        );
    }
}

#[test]
fn tap_after_cancelled_drag_still_navigates() {
    let (mut seq, _sink, mut nav) = revealed();
    let at = prop_on_screen(&seq);

    seq.on_input(&InputEvent::TouchStart { contacts: smallvec![at] }, &mut nav);
    seq.on_input(
        &InputEvent::TouchMove {
            contacts: smallvec![at + Vec2::new(60.0, 0.0)],
        },
        &mut nav,
    );
    let report = seq.on_input(&InputEvent::TouchCancel, &mut nav);
    assert!(!report.navigated);

    seq.on_input(&InputEvent::TouchStart { contacts: smallvec![at] }, &mut nav);
    let report = seq.on_input(&InputEvent::TouchEnd { remaining: 0 }, &mut nav);
    assert!(report.navigated);
    assert_eq!(nav.urls.len(), 1);
}

#[test]
fn cursor_turns_pointer_when_the_prop_becomes_interactive() {
    let mut seq = Sequencer::new(seeded(), Viewport::new(W, H));
    let mut sink = RecordingSink::default();
    let mut nav = RecordingNavigator::default();
    charge(&mut seq, &mut sink, &mut nav);
    run_until(&mut seq, &mut sink, PhaseKind::Settling);

    // pointer rests over the prop before it can be clicked
    let report = seq.on_input(&InputEvent::PointerMove { x: W / 2.0, y: H / 2.0 }, &mut nav);
    assert_eq!(report.cursor, None);
    assert_eq!(seq.cursor(), Cursor::Default);

    let mut turned = None;
    for _ in 0..1000 {
        let report = seq.tick(DT, &mut sink);
        if report.changes.iter().any(|c| c.to == PhaseKind::Interactive) {
            turned = Some(report.cursor);
            break;
        }
        assert_eq!(report.cursor, None);
    }
    assert_eq!(turned, Some(Some(Cursor::Pointer)));
    assert_eq!(seq.cursor(), Cursor::Pointer);

    // no repeated reports while nothing changes under the pointer
    assert_eq!(seq.tick(DT, &mut sink).cursor, None);
}
