//! Mesh generators for common demo shapes.
//!
//! These generators produce [`MeshData`] values with the canonical
//! attribute names the scaffold resolves against. The scaffold itself
//! never depends on them; demos and tests do.

use std::f32::consts::PI;

use super::data::{MeshData, PrimitiveTopology, ATTRIBUTE_COLOR, ATTRIBUTE_NORMAL,
    ATTRIBUTE_POSITION};

/// Generate an indexed cube mesh centered at the origin.
///
/// Produces 24 vertices (4 per face, so normals stay flat per face) with
/// `a_Position` and `a_Normal` attributes and 36 u16 indices.
///
/// # Arguments
///
/// * `size` - Edge length of the cube
pub fn generate_cube(size: f32) -> MeshData {
    let h = size / 2.0;

    // (corner offsets, face normal) per face
    #[rustfmt::skip]
    let faces: [([[f32; 3]; 4], [f32; 3]); 6] = [
        ([[-h, -h,  h], [ h, -h,  h], [ h,  h,  h], [-h,  h,  h]], [ 0.0,  0.0,  1.0]), // front
        ([[ h, -h, -h], [-h, -h, -h], [-h,  h, -h], [ h,  h, -h]], [ 0.0,  0.0, -1.0]), // back
        ([[-h,  h,  h], [ h,  h,  h], [ h,  h, -h], [-h,  h, -h]], [ 0.0,  1.0,  0.0]), // up
        ([[-h, -h, -h], [ h, -h, -h], [ h, -h,  h], [-h, -h,  h]], [ 0.0, -1.0,  0.0]), // down
        ([[ h, -h,  h], [ h, -h, -h], [ h,  h, -h], [ h,  h,  h]], [ 1.0,  0.0,  0.0]), // right
        ([[-h, -h, -h], [-h, -h,  h], [-h,  h,  h], [-h,  h, -h]], [-1.0,  0.0,  0.0]), // left
    ];

    let mut positions = Vec::with_capacity(24 * 3);
    let mut normals = Vec::with_capacity(24 * 3);
    let mut indices = Vec::with_capacity(36);

    for (face, (corners, normal)) in faces.iter().enumerate() {
        for corner in corners {
            positions.extend_from_slice(corner);
            normals.extend_from_slice(normal);
        }
        let base = (face * 4) as u16;
        indices.extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
    }

    MeshData::new()
        .with_attribute(ATTRIBUTE_POSITION, 3, positions)
        .with_attribute(ATTRIBUTE_NORMAL, 3, normals)
        .with_indices_u16(indices)
        .with_label("cube")
}

/// Generate a UV sphere mesh centered at the origin.
///
/// Produces `(rings + 1) * (segments + 1)` vertices with `a_Position` and
/// `a_Normal` attributes and u32 indices.
///
/// # Arguments
///
/// * `radius` - Sphere radius
/// * `segments` - Number of longitudinal segments (around the equator)
/// * `rings` - Number of latitudinal rings (from pole to pole)
pub fn generate_sphere(radius: f32, segments: u32, rings: u32) -> MeshData {
    let mut positions = Vec::new();
    let mut normals = Vec::new();
    let mut indices = Vec::new();

    for ring in 0..=rings {
        let theta = ring as f32 * PI / rings as f32;
        let sin_theta = theta.sin();
        let cos_theta = theta.cos();

        for segment in 0..=segments {
            let phi = segment as f32 * 2.0 * PI / segments as f32;
            let sin_phi = phi.sin();
            let cos_phi = phi.cos();

            let x = sin_theta * cos_phi;
            let y = cos_theta;
            let z = sin_theta * sin_phi;

            positions.extend_from_slice(&[x * radius, y * radius, z * radius]);
            normals.extend_from_slice(&[x, y, z]);
        }
    }

    for ring in 0..rings {
        for segment in 0..segments {
            let current = ring * (segments + 1) + segment;
            let next = current + segments + 1;

            indices.push(current);
            indices.push(next);
            indices.push(current + 1);

            indices.push(current + 1);
            indices.push(next);
            indices.push(next + 1);
        }
    }

    MeshData::new()
        .with_attribute(ATTRIBUTE_POSITION, 3, positions)
        .with_attribute(ATTRIBUTE_NORMAL, 3, normals)
        .with_indices_u32(indices)
        .with_label("sphere")
}

/// Generate an XYZ axes helper as line geometry.
///
/// Three lines from the origin along +X, +Y, and +Z, colored red, green,
/// and blue. Uses `a_Position` and `a_Color` attributes, no indices, and
/// [`PrimitiveTopology::Lines`].
///
/// # Arguments
///
/// * `length` - Length of each axis line
pub fn generate_axes(length: f32) -> MeshData {
    #[rustfmt::skip]
    let positions = vec![
        0.0, 0.0, 0.0,  length, 0.0, 0.0,
        0.0, 0.0, 0.0,  0.0, length, 0.0,
        0.0, 0.0, 0.0,  0.0, 0.0, length,
    ];
    #[rustfmt::skip]
    let colors = vec![
        1.0, 0.0, 0.0,  1.0, 0.0, 0.0,
        0.0, 1.0, 0.0,  0.0, 1.0, 0.0,
        0.0, 0.0, 1.0,  0.0, 0.0, 1.0,
    ];

    MeshData::new()
        .with_topology(PrimitiveTopology::Lines)
        .with_attribute(ATTRIBUTE_POSITION, 3, positions)
        .with_attribute(ATTRIBUTE_COLOR, 3, colors)
        .with_label("axes")
}
