use super::constants::{LABEL_INSET, LABEL_THICKNESS, PROP_HALF_EXTENTS};
use super::interp::ObjectPose;
use super::sequence::PhaseKind;
use glam::{Mat4, Vec3};
use smallvec::{smallvec, SmallVec};

/// Axis-aligned box in the prop's local space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    pub fn from_center_half(center: Vec3, half: Vec3) -> Self {
        Self {
            min: center - half,
            max: center + half,
        }
    }

    #[inline]
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    #[inline]
    pub fn half_extents(&self) -> Vec3 {
        (self.max - self.min) * 0.5
    }
}

/// Slab test. Returns the entry distance along `ray_dir`, or the exit distance
/// when the origin is inside the box.
#[inline]
pub fn ray_aabb(ray_origin: Vec3, ray_dir: Vec3, aabb: &Aabb) -> Option<f32> {
    let inv = ray_dir.recip();
    let t0 = (aabb.min - ray_origin) * inv;
    let t1 = (aabb.max - ray_origin) * inv;
    let t_near = t0.min(t1).max_element();
    let t_far = t0.max(t1).min_element();
    // NaN from 0 * inf on a slab boundary fails both comparisons and counts as a miss
    if !(t_far >= t_near) || t_far < 0.0 {
        return None;
    }
    Some(if t_near >= 0.0 { t_near } else { t_far })
}

/// A named sub-part of the prop.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PropPart {
    pub name: &'static str,
    pub bounds: Aabb,
}

/// Hit geometry: the case body plus the label on its front face.
#[derive(Clone, Debug)]
pub struct PropGeometry {
    pub parts: SmallVec<[PropPart; 4]>,
}

impl Default for PropGeometry {
    fn default() -> Self {
        let h = PROP_HALF_EXTENTS;
        let label_half = Vec3::new(h.x - LABEL_INSET, h.y - LABEL_INSET, LABEL_THICKNESS * 0.5);
        let label_center = Vec3::new(0.0, 0.0, h.z + LABEL_THICKNESS * 0.5);
        Self {
            parts: smallvec![
                PropPart {
                    name: "case",
                    bounds: Aabb::from_center_half(Vec3::ZERO, h),
                },
                PropPart {
                    name: "label",
                    bounds: Aabb::from_center_half(label_center, label_half),
                },
            ],
        }
    }
}

/// Nearest intersection with the prop.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Hit {
    pub part: &'static str,
    pub distance: f32,
}

impl PropGeometry {
    /// Test a world-space ray against every part of the posed prop.
    pub fn raycast(&self, pose: &ObjectPose, ray_origin: Vec3, ray_dir: Vec3) -> Option<Hit> {
        let model = pose.model_matrix();
        let inv: Mat4 = model.inverse();
        let lo = inv.transform_point3(ray_origin);
        // rigid transform: unit length is preserved, so local t equals world t
        let ld = inv.transform_vector3(ray_dir);
        self.parts
            .iter()
            .filter_map(|p| {
                ray_aabb(lo, ld, &p.bounds).map(|t| Hit {
                    part: p.name,
                    distance: t,
                })
            })
            .min_by(|a, b| a.distance.total_cmp(&b.distance))
    }
}

/// Cursor feedback requested by the gate.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Cursor {
    #[default]
    Default,
    Pointer,
}

impl Cursor {
    pub fn css(self) -> &'static str {
        match self {
            Cursor::Default => "default",
            Cursor::Pointer => "pointer",
        }
    }
}

/// Ray hit-testing that only answers in the interactive phase.
#[derive(Clone, Debug, Default)]
pub struct HitGate {
    geometry: PropGeometry,
}

impl HitGate {
    pub fn new(geometry: PropGeometry) -> Self {
        Self { geometry }
    }

    #[inline]
    pub fn enabled(phase: PhaseKind) -> bool {
        phase == PhaseKind::Interactive
    }

    pub fn test(
        &self,
        phase: PhaseKind,
        pose: &ObjectPose,
        ray_origin: Vec3,
        ray_dir: Vec3,
    ) -> Option<Hit> {
        if !Self::enabled(phase) {
            return None;
        }
        self.geometry.raycast(pose, ray_origin, ray_dir)
    }

    pub fn hover(
        &self,
        phase: PhaseKind,
        pose: &ObjectPose,
        ray_origin: Vec3,
        ray_dir: Vec3,
    ) -> Cursor {
        match self.test(phase, pose, ray_origin, ray_dir) {
            Some(_) => Cursor::Pointer,
            None => Cursor::Default,
        }
    }
}
