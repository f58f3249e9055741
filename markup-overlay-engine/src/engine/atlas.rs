use bevy::prelude::*;
use bevy::render::render_asset::RenderAssetUsages;
use bevy::render::render_resource::{Extent3d, TextureDimension, TextureFormat};
use constants::category::category_tint;
use constants::render_settings::{ICON_ATLAS_TILES, ICON_TILE_SIZE};

/// Generate the icon atlas strip: one square tile per marker category,
/// tinted per the category table, with a circular alpha mask so the
/// fragment shader's alpha discard produces round sprites.
pub fn create_icon_atlas_image() -> Image {
    let tiles = ICON_ATLAS_TILES as usize;
    let tile = ICON_TILE_SIZE as usize;
    let (width, height) = (tiles * tile, tile);
    let mut data = vec![0u8; width * height * 4];

    let center = (tile as f32 - 1.0) * 0.5;
    let radius = tile as f32 * 0.45;

    for t in 0..tiles {
        let tint = category_tint(t as u32);
        for y in 0..tile {
            for x in 0..tile {
                let dx = x as f32 - center;
                let dy = y as f32 - center;
                let inside = dx * dx + dy * dy <= radius * radius;
                let offset = (y * width + t * tile + x) * 4;
                data[offset] = tint[0];
                data[offset + 1] = tint[1];
                data[offset + 2] = tint[2];
                data[offset + 3] = if inside { tint[3] } else { 0 };
            }
        }
    }

    Image::new(
        Extent3d {
            width: width as u32,
            height: height as u32,
            depth_or_array_layers: 1,
        },
        TextureDimension::D2,
        data,
        TextureFormat::Rgba8UnormSrgb,
        RenderAssetUsages::RENDER_WORLD,
    )
}
