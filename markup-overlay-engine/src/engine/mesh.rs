use bevy::prelude::*;
use bevy::{render::mesh::PrimitiveTopology, render::render_asset::RenderAssetUsages};

/// Create the marker index mesh for GPU-side vertex expansion.
///
/// Six vertices per marker (two triangles forming a screen-aligned quad);
/// the vertex shader decodes the marker index from the vertex index and
/// reads the actual position from the field uniform, so the only mesh
/// attribute is a running counter.
pub fn create_marker_index_mesh(marker_count: usize) -> Mesh {
    let mut mesh = Mesh::new(
        PrimitiveTopology::TriangleList,
        RenderAssetUsages::RENDER_WORLD,
    );

    let vertex_count = marker_count * 6;
    let indices: Vec<[f32; 3]> = (0..vertex_count).map(|i| [i as f32, 0.0, 0.0]).collect();

    mesh.insert_attribute(Mesh::ATTRIBUTE_POSITION, indices);
    mesh
}
