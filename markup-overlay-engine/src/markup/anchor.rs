use bevy::prelude::*;

use constants::render_settings::{
    ANCHOR_OFFSET, ANCHOR_UNIT_LENGTH, LABEL_X_OFFSET, LABEL_Y_OFFSET,
};

use crate::engine::camera::CameraSnapshot;
use crate::markup::field::MarkerField;
use crate::markup::selection::MarkupTool;

/// Tag for the shared anchor line mesh, created once at activation and
/// repositioned on demand.
#[derive(Component)]
pub struct AnchorLine;

/// Screen position feeding the card presenter, refreshed whenever the
/// camera moves while a selection is active.
#[derive(Resource, Debug, Default, Clone, Copy, PartialEq)]
pub struct CardAnchor {
    pub position: Option<Vec2>,
}

/// 3D endpoints of the anchor line for a marker position.
pub fn anchor_segment(marker_pos: Vec3) -> (Vec3, Vec3) {
    (marker_pos, marker_pos + ANCHOR_OFFSET)
}

/// Place the unit anchor mesh so it spans the segment: midpoint
/// translation, Y scale proportional to the length, rotation aligning the
/// mesh axis with the segment direction.
pub fn anchor_transform(start: Vec3, end: Vec3) -> Transform {
    let segment = end - start;
    let length = segment.length();
    Transform::from_translation((start + end) * 0.5)
        .with_rotation(Quat::from_rotation_arc(Vec3::Y, segment / length))
        .with_scale(Vec3::new(1.0, length / ANCHOR_UNIT_LENGTH, 1.0))
}

/// Project a world point to card pixel coordinates, biased so the card
/// sits near the anchor tip rather than on top of it. `None` behind the
/// camera.
pub fn project_to_screen(world: Vec3, camera: &CameraSnapshot) -> Option<Vec2> {
    let ndc = camera.world_to_ndc(world)?;
    Some(Vec2::new(
        (ndc.x + 1.0) * 0.5 * camera.viewport.x + LABEL_X_OFFSET,
        (-ndc.y + 1.0) * 0.5 * camera.viewport.y + LABEL_Y_OFFSET,
    ))
}

/// Continuous re-anchoring: recompute the anchor mesh placement and the
/// card screen position on every camera move or selection change, not
/// just at click time.
pub fn update_anchor_system(
    tool: Res<MarkupTool>,
    field: Res<MarkerField>,
    cameras: Query<(&Camera, &GlobalTransform, &Projection), With<Camera3d>>,
    moved_cameras: Query<(), (With<Camera3d>, Changed<GlobalTransform>)>,
    mut card_anchor: ResMut<CardAnchor>,
    mut anchors: Query<(&mut Transform, &mut Visibility), With<AnchorLine>>,
) {
    if moved_cameras.is_empty() && !tool.is_changed() && !field.is_changed() {
        return;
    }
    let Ok((mut transform, mut visibility)) = anchors.single_mut() else {
        return;
    };

    let Some(index) = tool.selected() else {
        *visibility = Visibility::Hidden;
        card_anchor.position = None;
        return;
    };
    let Some(marker_pos) = field.positions.get(index).copied() else {
        return;
    };
    let Ok((camera, cam_transform, projection)) = cameras.single() else {
        return;
    };
    let Some(snapshot) = CameraSnapshot::from_camera(camera, cam_transform, projection) else {
        return;
    };

    let (start, end) = anchor_segment(marker_pos);
    *transform = anchor_transform(start, end);
    *visibility = Visibility::Visible;
    card_anchor.position = project_to_screen(end, &snapshot);
}
