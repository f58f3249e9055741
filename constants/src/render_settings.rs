use bevy::prelude::*;

/// Base sprite size driving the distance-attenuated marker quads.
pub const MARKER_SPRITE_SIZE: f32 = 120.0;

/// Point-picking tolerance: maximum perpendicular ray distance in world units.
pub const PICK_THRESHOLD: f32 = 5.0;

/// Vertical bias lifting markers off the surface they annotate.
pub const MARKER_LIFT: f32 = 3.0;

/// Offset from a selected marker to the anchor line endpoint.
pub const ANCHOR_OFFSET: Vec3 = Vec3::new(0.0, 75.0, 0.0);

pub const ANCHOR_LINE_COLOR: Color = Color::WHITE;
pub const ANCHOR_LINE_OPACITY: f32 = 0.8;
pub const ANCHOR_LINE_RADIUS: f32 = 0.9;

/// Height of the shared anchor cylinder mesh; the segment length is
/// applied as a Y scale on top of this.
pub const ANCHOR_UNIT_LENGTH: f32 = 1.0;

/// Pixel biases placing the info card near, not on top of, the anchor tip.
pub const LABEL_X_OFFSET: f32 = -90.0;
pub const LABEL_Y_OFFSET: f32 = -200.0;

/// Uniform buffer capacity for the marker field. Must match the array
/// lengths declared in `shaders/markers.wgsl`.
pub const MAX_MARKERS: usize = 256;

/// Number of tiles in the horizontal icon atlas strip.
pub const ICON_ATLAS_TILES: u32 = 4;
pub const ICON_TILE_SIZE: u32 = 64;

/// Render layer carrying markup overlay meshes, separate from model geometry.
pub const OVERLAY_LAYER: usize = 1;

pub const MARKUP_DATA_PATH: &str = "markup/markers.json";
