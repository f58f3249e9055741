//! Marker sprite shader material.

use bevy::{
    prelude::*,
    reflect::TypePath,
    render::render_resource::{AsBindGroup, ShaderRef, ShaderType},
};
use constants::render_settings::{ICON_ATLAS_TILES, MARKER_SPRITE_SIZE, MAX_MARKERS};

use crate::markup::field::MarkerField;

/// Per-field uniform data consumed by `shaders/markers.wgsl`.
///
/// Fixed-capacity arrays keep the whole field in one uniform buffer; the
/// array lengths must stay in sync with the WGSL declaration.
#[derive(Debug, Clone, Copy, ShaderType)]
#[repr(C)]
pub struct MarkerFieldUniform {
    pub marker_count: u32,
    pub sprite_size: f32,
    pub atlas_tiles: u32,
    pub _padding: u32,
    /// xyz = marker position, w unused.
    pub positions: [Vec4; MAX_MARKERS],
    /// x = intensity, y = icon tile index, zw unused.
    pub color_state: [Vec4; MAX_MARKERS],
}

impl Default for MarkerFieldUniform {
    fn default() -> Self {
        Self {
            marker_count: 0,
            sprite_size: MARKER_SPRITE_SIZE,
            atlas_tiles: ICON_ATLAS_TILES,
            _padding: 0,
            positions: [Vec4::ZERO; MAX_MARKERS],
            color_state: [Vec4::ZERO; MAX_MARKERS],
        }
    }
}

impl MarkerFieldUniform {
    pub fn from_field(field: &MarkerField) -> Self {
        let mut uniform = Self::default();
        uniform.marker_count = field.len().min(MAX_MARKERS) as u32;
        let entries = field.positions.iter().zip(&field.color_state);
        for (i, (position, color)) in entries.take(MAX_MARKERS).enumerate() {
            uniform.positions[i] = position.extend(0.0);
            uniform.color_state[i] = Vec4::new(color.x, color.y, 0.0, 0.0);
        }
        uniform
    }
}

/// Billboarded marker sprites sampled from the icon atlas strip.
#[derive(Asset, TypePath, AsBindGroup, Debug, Clone)]
pub struct MarkerSpriteMaterial {
    #[texture(0)]
    #[sampler(1)]
    pub icon_atlas: Handle<Image>,

    #[uniform(2)]
    pub field: MarkerFieldUniform,
}

impl Material for MarkerSpriteMaterial {
    fn vertex_shader() -> ShaderRef {
        "shaders/markers.wgsl".into()
    }

    fn fragment_shader() -> ShaderRef {
        "shaders/markers.wgsl".into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markup::store::MarkupItem;

    fn item(id: u64, x: f32, icon: u32) -> MarkupItem {
        MarkupItem {
            id,
            x,
            y: 0.0,
            z: 0.0,
            icon,
            title: None,
            description: None,
            priority: None,
            assignee: None,
            date: None,
        }
    }

    #[test]
    fn uniform_mirrors_field_contents() {
        let field = MarkerField::build(&[item(1, 0.0, 0), item(2, 10.0, 3)]);
        let uniform = MarkerFieldUniform::from_field(&field);
        assert_eq!(uniform.marker_count, 2);
        assert_eq!(uniform.positions[0].x, 0.0);
        assert_eq!(uniform.positions[1].x, 10.0);
        assert_eq!(uniform.color_state[1].y, 3.0);
        assert_eq!(uniform.positions[2], Vec4::ZERO);
    }
}
