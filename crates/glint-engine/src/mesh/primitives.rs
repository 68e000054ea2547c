/// Offsets of the interleaved attributes, in `f32` elements from the start of
/// a vertex. Absent attributes are not part of that mesh's layout.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct AttributeOffsets {
    pub position: u32,
    pub normal: Option<u32>,
    pub texcoord: Option<u32>,
    pub color: u32,
}

/// Interleaved mesh data for one primitive.
///
/// Immutable once generated; `square_plane` and `cube` are deterministic, so
/// regenerating with the same size parameter yields identical data.
#[derive(Debug, Clone)]
pub struct MeshData {
    /// Flat interleaved attribute stream.
    pub attributes: Vec<f32>,

    /// Triangle list indices into the vertex stream.
    pub indices: Vec<u16>,

    /// Vertex stride in `f32` elements.
    pub stride: u32,

    pub offsets: AttributeOffsets,
}

impl MeshData {
    pub fn vertex_count(&self) -> usize {
        self.attributes.len() / self.stride as usize
    }

    pub fn index_count(&self) -> u32 {
        self.indices.len() as u32
    }
}

// ── square plane ──────────────────────────────────────────────────────────

const PLANE_COLORS: [[f32; 3]; 4] = [
    [1.0, 1.0, 1.0], // white
    [1.0, 0.0, 0.0], // red
    [0.0, 1.0, 0.0], // green
    [0.0, 0.0, 1.0], // blue
];

/// Generates a square plane in the XY plane: position (vec2) + color (vec3),
/// stride 5, four vertices, two triangles.
pub fn square_plane(size: f32) -> MeshData {
    let s = size;
    let positions: [[f32; 2]; 4] = [[s, s], [-s, s], [s, -s], [-s, -s]];

    let mut attributes = Vec::with_capacity(4 * 5);
    for i in 0..4 {
        attributes.extend_from_slice(&positions[i]);
        attributes.extend_from_slice(&PLANE_COLORS[i]);
    }

    MeshData {
        attributes,
        indices: vec![3, 1, 0, 0, 2, 3],
        stride: 5,
        offsets: AttributeOffsets {
            position: 0,
            normal: None,
            texcoord: None,
            color: 2,
        },
    }
}

const PLANE_ATTRS: [wgpu::VertexAttribute; 2] = wgpu::vertex_attr_array![
    0 => Float32x2, // position
    1 => Float32x3  // color
];

pub fn plane_vertex_layout() -> wgpu::VertexBufferLayout<'static> {
    wgpu::VertexBufferLayout {
        array_stride: 5 * std::mem::size_of::<f32>() as u64,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes: &PLANE_ATTRS,
    }
}

// ── cube ──────────────────────────────────────────────────────────────────

const CUBE_FACE_COLORS: [[f32; 3]; 6] = [
    [1.0, 1.0, 1.0], // white
    [1.0, 0.0, 0.0], // red
    [0.0, 1.0, 0.0], // green
    [0.0, 0.0, 1.0], // blue
    [1.0, 1.0, 0.0], // yellow
    [1.0, 0.0, 1.0], // purple
];

const CUBE_FACE_NORMALS: [[f32; 3]; 6] = [
    [0.0, 0.0, 1.0],  // front
    [0.0, 0.0, -1.0], // back
    [0.0, 1.0, 0.0],  // top
    [0.0, -1.0, 0.0], // bottom
    [1.0, 0.0, 0.0],  // right
    [-1.0, 0.0, 0.0], // left
];

const FACE_TEXCOORDS: [[f32; 2]; 4] = [[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]];

/// Generates a cube with the given edge length: position (vec3) +
/// normal (vec3) + texcoord (vec2) + face color (vec3), stride 11,
/// 24 vertices (four per face), 36 indices.
pub fn cube(edge: f32) -> MeshData {
    let l = edge / 2.0;

    // Four corners per face, wound counter-clockwise looking down the normal.
    let face_positions: [[[f32; 3]; 4]; 6] = [
        // front
        [[-l, -l, l], [l, -l, l], [l, l, l], [-l, l, l]],
        // back
        [[-l, -l, -l], [-l, l, -l], [l, l, -l], [l, -l, -l]],
        // top
        [[-l, l, -l], [-l, l, l], [l, l, l], [l, l, -l]],
        // bottom
        [[-l, -l, -l], [l, -l, -l], [l, -l, l], [-l, -l, l]],
        // right
        [[l, -l, -l], [l, l, -l], [l, l, l], [l, -l, l]],
        // left
        [[-l, -l, -l], [-l, -l, l], [-l, l, l], [-l, l, -l]],
    ];

    let mut attributes = Vec::with_capacity(24 * 11);
    let mut indices = Vec::with_capacity(36);

    for (face, corners) in face_positions.iter().enumerate() {
        for (corner, position) in corners.iter().enumerate() {
            attributes.extend_from_slice(position);
            attributes.extend_from_slice(&CUBE_FACE_NORMALS[face]);
            attributes.extend_from_slice(&FACE_TEXCOORDS[corner]);
            attributes.extend_from_slice(&CUBE_FACE_COLORS[face]);
        }

        let base = (face * 4) as u16;
        indices.extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
    }

    MeshData {
        attributes,
        indices,
        stride: 11,
        offsets: AttributeOffsets {
            position: 0,
            normal: Some(3),
            texcoord: Some(6),
            color: 8,
        },
    }
}

const CUBE_ATTRS: [wgpu::VertexAttribute; 4] = wgpu::vertex_attr_array![
    0 => Float32x3, // position
    1 => Float32x3, // normal
    2 => Float32x2, // texcoord
    3 => Float32x3  // color
];

pub fn cube_vertex_layout() -> wgpu::VertexBufferLayout<'static> {
    wgpu::VertexBufferLayout {
        array_stride: 11 * std::mem::size_of::<f32>() as u64,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes: &CUBE_ATTRS,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── index bounds ──────────────────────────────────────────────────────

    #[test]
    fn plane_indices_stay_within_vertex_count() {
        for size in [0.1, 0.5, 1.0, 4.0] {
            let mesh = square_plane(size);
            let max = *mesh.indices.iter().max().unwrap() as usize;
            assert!(max < mesh.vertex_count());
        }
    }

    #[test]
    fn cube_indices_stay_within_vertex_count() {
        for edge in [0.25, 1.0, 2.0, 10.0] {
            let mesh = cube(edge);
            let max = *mesh.indices.iter().max().unwrap() as usize;
            assert!(max < mesh.vertex_count());
        }
    }

    // ── layout arithmetic ─────────────────────────────────────────────────

    #[test]
    fn plane_layout() {
        let mesh = square_plane(1.0);
        assert_eq!(mesh.vertex_count(), 4);
        assert_eq!(mesh.index_count(), 6);
        assert_eq!(mesh.attributes.len(), 4 * mesh.stride as usize);
        assert_eq!(mesh.offsets.color, 2);
        assert!(mesh.offsets.texcoord.is_none());
    }

    #[test]
    fn cube_layout() {
        let mesh = cube(1.0);
        assert_eq!(mesh.vertex_count(), 24);
        assert_eq!(mesh.index_count(), 36);
        assert_eq!(mesh.attributes.len(), 24 * mesh.stride as usize);
        assert_eq!(mesh.offsets.normal, Some(3));
        assert_eq!(mesh.offsets.texcoord, Some(6));
        assert_eq!(mesh.offsets.color, 8);
    }

    #[test]
    fn regeneration_is_idempotent() {
        let a = cube(1.5);
        let b = cube(1.5);
        assert_eq!(a.attributes, b.attributes);
        assert_eq!(a.indices, b.indices);
    }

    #[test]
    fn cube_positions_scale_with_edge_length() {
        let mesh = cube(3.0);
        // Every position component is ±edge/2.
        for vertex in mesh.attributes.chunks(11) {
            for component in &vertex[0..3] {
                assert_eq!(component.abs(), 1.5);
            }
        }
    }

    #[test]
    fn wgpu_layouts_match_strides() {
        assert_eq!(plane_vertex_layout().array_stride, 20);
        assert_eq!(cube_vertex_layout().array_stride, 44);
    }
}
