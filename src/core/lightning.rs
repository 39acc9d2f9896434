use super::constants::*;
use glam::Vec3;
use rand::prelude::*;
use smallvec::SmallVec;

/// Polyline vertices of one bolt (segments + 1 points).
pub type BoltPoints = SmallVec<[Vec3; 16]>;

/// One frame's lightning: fresh geometry, color and visibility.
#[derive(Clone, Debug, PartialEq)]
pub struct Bolt {
    pub points: BoltPoints,
    pub color: [f32; 3],
    /// brightness in [`LIGHTNING_FLICKER_MIN`, `LIGHTNING_FLICKER_MAX`]
    pub flicker: f32,
    pub visible: bool,
}

/// Shape parameters for the bolt.
#[derive(Clone, Copy, Debug)]
pub struct BoltShape {
    pub segments: usize,
    pub start_height: f32,
    pub start_radius: f32,
    pub chaos: f32,
}

impl Default for BoltShape {
    fn default() -> Self {
        Self {
            segments: LIGHTNING_SEGMENTS,
            start_height: LIGHTNING_START_HEIGHT,
            start_radius: LIGHTNING_START_RADIUS,
            chaos: LIGHTNING_CHAOS,
        }
    }
}

/// Regenerates a jittered bolt every frame of the discharge.
///
/// Nothing carries over between frames except the RNG stream.
pub struct LightningGenerator {
    shape: BoltShape,
    rng: StdRng,
}

impl LightningGenerator {
    pub fn new(shape: BoltShape, seed: u64) -> Self {
        Self {
            shape,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn from_entropy(shape: BoltShape) -> Self {
        Self {
            shape,
            rng: StdRng::from_entropy(),
        }
    }

    #[inline]
    pub fn shape(&self) -> BoltShape {
        self.shape
    }

    /// Build a bolt ending at `end`. The strike origin sits at the configured
    /// height with a random horizontal offset inside `start_radius`.
    ///
    /// `visible` is false once `timer` has dropped below `hide_below`.
    pub fn generate(&mut self, end: Vec3, timer: f32, hide_below: f32) -> Bolt {
        let start = self.random_start();
        let points = self.polyline(start, end);
        let flicker = self
            .rng
            .gen_range(LIGHTNING_FLICKER_MIN..=LIGHTNING_FLICKER_MAX);
        Bolt {
            points,
            color: [0.55 * flicker, 0.75 * flicker, flicker],
            flicker,
            visible: timer >= hide_below,
        }
    }

    fn random_start(&mut self) -> Vec3 {
        let r = self.shape.start_radius.max(0.0);
        let angle = self.rng.gen::<f32>() * std::f32::consts::TAU;
        // sqrt keeps the offsets uniform over the disc
        let dist = r * self.rng.gen::<f32>().sqrt();
        Vec3::new(
            angle.cos() * dist,
            self.shape.start_height,
            angle.sin() * dist,
        )
    }

    /// Interior points are linearly placed between the endpoints, then offset
    /// on every axis by up to `chaos / 2`. The endpoints are exact.
    pub fn polyline(&mut self, start: Vec3, end: Vec3) -> BoltPoints {
        let n = self.shape.segments.max(1);
        let half = self.shape.chaos.abs() * 0.5;
        let mut points = BoltPoints::with_capacity(n + 1);
        points.push(start);
        for i in 1..n {
            let t = i as f32 / n as f32;
            let jitter = Vec3::new(
                self.rng.gen_range(-half..=half),
                self.rng.gen_range(-half..=half),
                self.rng.gen_range(-half..=half),
            );
            points.push(start.lerp(end, t) + jitter);
        }
        points.push(end);
        points
    }
}
