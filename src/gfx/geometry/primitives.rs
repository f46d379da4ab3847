//! # Primitive Shape Generation
//!
//! All shapes are centered at the origin and wound counter-clockwise when seen
//! from the side their normals point to.

use cgmath::Vector3;

use super::GeometryData;

/// Generate an axis-aligned box with the given extents
///
/// Each face has its own four vertices so normals stay flat, and each face maps
/// the whole texture.
pub fn generate_box(width: f32, height: f32, depth: f32) -> GeometryData {
    let mut data = GeometryData::new();
    let (hx, hy, hz) = (width * 0.5, height * 0.5, depth * 0.5);

    let x = Vector3::unit_x();
    let y = Vector3::unit_y();
    let z = Vector3::unit_z();

    // (outward normal, half extent along it, face u axis, face v axis); u × v = normal
    let faces = [
        (z, hz, x * hx, y * hy),
        (-z, hz, -x * hx, y * hy),
        (x, hx, -z * hz, y * hy),
        (-x, hx, z * hz, y * hy),
        (y, hy, x * hx, -z * hz),
        (-y, hy, x * hx, z * hz),
    ];

    for (normal, extent, u, v) in faces {
        push_face(&mut data, normal, normal * extent, u, v);
    }

    data
}

fn push_face(
    data: &mut GeometryData,
    normal: Vector3<f32>,
    center: Vector3<f32>,
    u: Vector3<f32>,
    v: Vector3<f32>,
) {
    let base = data.vertices.len() as u32;
    let corners = [
        (center - u - v, [0.0, 1.0]),
        (center + u - v, [1.0, 1.0]),
        (center + u + v, [1.0, 0.0]),
        (center - u + v, [0.0, 0.0]),
    ];

    for (position, uv) in corners {
        data.vertices.push(position.into());
        data.normals.push(normal.into());
        data.tex_coords.push(uv);
    }

    data.indices
        .extend_from_slice(&[base, base + 1, base + 2, base + 2, base + 3, base]);
}

/// Generate a plane in the XY plane facing +Z
///
/// # Arguments
/// * `width` - Width of the plane (X direction)
/// * `height` - Height of the plane (Y direction)
/// * `width_segments` - Number of subdivisions along width
/// * `height_segments` - Number of subdivisions along height
///
/// Lay it on the ground by rotating −π/2 about X, which turns +Z into +Y.
pub fn generate_plane(width: f32, height: f32, width_segments: u32, height_segments: u32) -> GeometryData {
    let mut data = GeometryData::new();

    let w_segs = width_segments.max(1);
    let h_segs = height_segments.max(1);

    for row in 0..=h_segs {
        let v = row as f32 / h_segs as f32;
        let pos_y = (v - 0.5) * height;

        for column in 0..=w_segs {
            let u = column as f32 / w_segs as f32;
            let pos_x = (u - 0.5) * width;

            data.vertices.push([pos_x, pos_y, 0.0]);
            data.normals.push([0.0, 0.0, 1.0]);
            data.tex_coords.push([u, 1.0 - v]);
        }
    }

    for row in 0..h_segs {
        for column in 0..w_segs {
            let i = row * (w_segs + 1) + column;
            let next_row = i + w_segs + 1;

            data.indices.extend_from_slice(&[i, i + 1, next_row]);
            data.indices.extend_from_slice(&[i + 1, next_row + 1, next_row]);
        }
    }

    data
}

#[cfg(test)]
mod tests {
    use cgmath::InnerSpace;

    use super::*;

    fn vec3(p: [f32; 3]) -> Vector3<f32> {
        Vector3::from(p)
    }

    /// Every triangle's winding must agree with its vertex normals.
    fn assert_counter_clockwise(data: &GeometryData) {
        for triangle in data.indices.chunks_exact(3) {
            let [a, b, c] = [triangle[0], triangle[1], triangle[2]].map(|i| vec3(data.vertices[i as usize]));
            let face_normal = (b - a).cross(c - a);
            let vertex_normal = vec3(data.normals[triangle[0] as usize]);
            assert!(face_normal.dot(vertex_normal) > 0.0, "triangle {triangle:?} is wound clockwise");
        }
    }

    #[test]
    fn test_box_extents_and_counts() {
        let data = generate_box(0.6, 0.8, 0.2);

        assert_eq!(data.vertex_count(), 24);
        assert_eq!(data.triangle_count(), 12);
        assert_eq!(data.tex_coords.len(), 24);

        for position in &data.vertices {
            assert!((position[0].abs() - 0.3).abs() < 1e-6);
            assert!((position[1].abs() - 0.4).abs() < 1e-6);
            assert!((position[2].abs() - 0.1).abs() < 1e-6);
        }
    }

    #[test]
    fn test_box_normals_point_outward() {
        let data = generate_box(1.0, 2.0, 3.0);
        assert_counter_clockwise(&data);

        for (position, normal) in data.vertices.iter().zip(&data.normals) {
            assert!(vec3(*position).dot(vec3(*normal)) > 0.0);
        }
    }

    #[test]
    fn test_plane_faces_positive_z() {
        let data = generate_plane(20.0, 20.0, 2, 3);

        assert_eq!(data.vertex_count(), 3 * 4);
        assert_eq!(data.triangle_count(), 2 * 2 * 3);
        assert_eq!(data.vertices[0], [-10.0, -10.0, 0.0]);
        assert_eq!(data.vertices[11], [10.0, 10.0, 0.0]);
        assert_counter_clockwise(&data);
    }

    #[test]
    fn test_plane_uvs_span_unit_square() {
        let data = generate_plane(4.0, 2.0, 1, 1);

        assert_eq!(data.tex_coords, vec![[0.0, 1.0], [1.0, 1.0], [0.0, 0.0], [1.0, 0.0]]);
        let (vertices, indices) = data.to_scene_format();
        assert_eq!(vertices.len(), 4);
        assert_eq!(indices, vec![0, 1, 2, 1, 3, 2]);
        assert_eq!(vertices[3].tex_coords, [1.0, 0.0]);
    }
}
