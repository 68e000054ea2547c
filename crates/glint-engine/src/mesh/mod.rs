//! Mesh generation for the demo primitives.
//!
//! Pure functions producing interleaved vertex attributes plus a `u16` index
//! list. Meshes are regenerated per session from a single size parameter;
//! nothing here touches the GPU beyond describing vertex layouts.

mod primitives;

pub use primitives::{
    cube, cube_vertex_layout, square_plane, plane_vertex_layout, AttributeOffsets, MeshData,
};
