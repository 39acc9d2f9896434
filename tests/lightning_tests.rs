// Host-side tests for the lightning generator.

use capsule_reveal::core::constants::*;
use capsule_reveal::core::{BoltShape, LightningGenerator};
use glam::Vec3;

const END: Vec3 = Vec3::new(0.0, 1.5, 0.0);

#[test]
fn bolt_spans_from_the_sky_to_the_anchor() {
    let mut gen = LightningGenerator::new(BoltShape::default(), 1);
    for _ in 0..50 {
        let bolt = gen.generate(END, 0.1, LIGHTNING_HIDE_BELOW_SEC);
        assert_eq!(bolt.points.len(), LIGHTNING_SEGMENTS + 1);
        let start = bolt.points[0];
        assert_eq!(start.y, LIGHTNING_START_HEIGHT);
        assert!(Vec3::new(start.x, 0.0, start.z).length() <= LIGHTNING_START_RADIUS + 1e-5);
        assert_eq!(*bolt.points.last().unwrap(), END);
    }
}

#[test]
fn interior_points_stay_within_chaos() {
    let shape = BoltShape::default();
    let mut gen = LightningGenerator::new(shape, 99);
    let start = Vec3::new(0.3, 4.0, -0.2);
    let half = shape.chaos * 0.5 + 1e-5;
    for _ in 0..50 {
        let points = gen.polyline(start, END);
        let n = points.len() - 1;
        assert_eq!(points[0], start);
        assert_eq!(points[n], END);
        for (i, p) in points.iter().enumerate() {
            let base = start.lerp(END, i as f32 / n as f32);
            let off = (*p - base).abs();
            assert!(off.max_element() <= half, "point {} off by {:?}", i, off);
        }
    }
}

#[test]
fn flicker_and_color_are_in_range() {
    let mut gen = LightningGenerator::new(BoltShape::default(), 5);
    for _ in 0..200 {
        let bolt = gen.generate(END, 0.1, LIGHTNING_HIDE_BELOW_SEC);
        assert!(bolt.flicker >= LIGHTNING_FLICKER_MIN && bolt.flicker <= LIGHTNING_FLICKER_MAX);
        assert_eq!(bolt.color[2], bolt.flicker);
        assert!(bolt.color[0] < bolt.color[1] && bolt.color[1] < bolt.color[2]);
    }
}

#[test]
fn bolt_hides_in_the_last_moments() {
    let mut gen = LightningGenerator::new(BoltShape::default(), 3);
    assert!(gen.generate(END, 0.1, 0.02).visible);
    assert!(gen.generate(END, 0.02, 0.02).visible);
    assert!(!gen.generate(END, 0.019, 0.02).visible);
    assert!(!gen.generate(END, 0.0, 0.02).visible);
}

#[test]
fn same_seed_same_bolts() {
    let mut a = LightningGenerator::new(BoltShape::default(), 42);
    let mut b = LightningGenerator::new(BoltShape::default(), 42);
    for _ in 0..10 {
        assert_eq!(a.generate(END, 0.1, 0.02), b.generate(END, 0.1, 0.02));
    }
}

#[test]
fn every_frame_gets_a_fresh_bolt() {
    let mut gen = LightningGenerator::new(BoltShape::default(), 42);
    let first = gen.generate(END, 0.1, 0.02);
    let second = gen.generate(END, 0.1, 0.02);
    assert_ne!(first.points, second.points);
}

#[test]
fn single_segment_is_a_straight_line() {
    let shape = BoltShape {
        segments: 1,
        ..Default::default()
    };
    let mut gen = LightningGenerator::new(shape, 0);
    let points = gen.polyline(Vec3::Y * 4.0, END);
    assert_eq!(points.as_slice(), &[Vec3::Y * 4.0, END]);
}
