use crate::constants::{CASE_RGB, LABEL_RGB};
use crate::core::constants::{LABEL_INSET, PROP_HALF_EXTENTS};
use glam::Vec3;

#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub(crate) struct PropVertex {
    pub pos: [f32; 3],
    pub normal: [f32; 3],
    pub color: [f32; 3],
}

pub(crate) const PROP_VERTEX_ATTRS: [wgpu::VertexAttribute; 3] =
    wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x3, 2 => Float32x3];

/// One quad: `u`/`v` are half-axis vectors spanning the face around `center`.
fn push_quad(
    verts: &mut Vec<PropVertex>,
    indices: &mut Vec<u16>,
    center: Vec3,
    u: Vec3,
    v: Vec3,
    color: [f32; 3],
) {
    let normal = u.cross(v).normalize();
    let base = verts.len() as u16;
    for (su, sv) in [(-1.0, -1.0), (1.0, -1.0), (1.0, 1.0), (-1.0, 1.0)] {
        verts.push(PropVertex {
            pos: (center + u * su + v * sv).to_array(),
            normal: normal.to_array(),
            color,
        });
    }
    indices.extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
}

/// The case as six faces plus the label quad floating just off the front face.
pub(crate) fn build_prop_mesh() -> (Vec<PropVertex>, Vec<u16>) {
    let h = PROP_HALF_EXTENTS;
    let mut verts = Vec::with_capacity(28);
    let mut indices = Vec::with_capacity(42);
    let faces = [
        (Vec3::X * h.x, Vec3::NEG_Z * h.z, Vec3::Y * h.y),
        (Vec3::NEG_X * h.x, Vec3::Z * h.z, Vec3::Y * h.y),
        (Vec3::Y * h.y, Vec3::X * h.x, Vec3::NEG_Z * h.z),
        (Vec3::NEG_Y * h.y, Vec3::X * h.x, Vec3::Z * h.z),
        (Vec3::Z * h.z, Vec3::X * h.x, Vec3::Y * h.y),
        (Vec3::NEG_Z * h.z, Vec3::NEG_X * h.x, Vec3::Y * h.y),
    ];
    for (center, u, v) in faces {
        push_quad(&mut verts, &mut indices, center, u, v, CASE_RGB);
    }
    push_quad(
        &mut verts,
        &mut indices,
        Vec3::Z * (h.z + 0.002),
        Vec3::X * (h.x - LABEL_INSET),
        Vec3::Y * (h.y - LABEL_INSET),
        LABEL_RGB,
    );
    (verts, indices)
}
