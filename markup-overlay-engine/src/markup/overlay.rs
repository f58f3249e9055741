use bevy::prelude::*;
use bevy::render::view::{NoFrustumCulling, RenderLayers};
use bevy::window::RequestRedraw;

use constants::render_settings::{
    ANCHOR_LINE_COLOR, ANCHOR_LINE_OPACITY, ANCHOR_LINE_RADIUS, ANCHOR_UNIT_LENGTH, OVERLAY_LAYER,
};

use crate::engine::atlas::create_icon_atlas_image;
use crate::engine::mesh::create_marker_index_mesh;
use crate::engine::shaders::{MarkerFieldUniform, MarkerSpriteMaterial};
use crate::markup::anchor::{AnchorLine, CardAnchor};
use crate::markup::card::CardEvent;
use crate::markup::field::MarkerField;
use crate::markup::selection::{HostSelection, MarkupTool, apply_tool_effects};
use crate::markup::store::{MarkupLoader, MarkupStore};

/// Activation and teardown commands for the markup feature; the host
/// interacts with the tool only through these and the pointer systems,
/// never through inheritance hooks.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkupToolCommand {
    Activate,
    Deactivate,
}

#[derive(Component)]
pub struct MarkerFieldMesh;

/// Owns the overlay meshes and the activation flag. Entities are created
/// once per activation and removed on teardown; repeat commands in either
/// direction are no-ops.
#[derive(Resource, Default)]
pub struct MarkupOverlay {
    pub active: bool,
    pub field_entity: Option<Entity>,
    pub anchor_entity: Option<Entity>,
    pub material: Option<Handle<MarkerSpriteMaterial>>,
}

impl MarkupOverlay {
    /// Idempotence guard: true exactly once per activation.
    pub fn begin_activate(&mut self) -> bool {
        if self.active {
            return false;
        }
        self.active = true;
        true
    }

    /// Idempotence guard: true exactly once per deactivation.
    pub fn begin_deactivate(&mut self) -> bool {
        if !self.active {
            return false;
        }
        self.active = false;
        true
    }
}

pub fn handle_tool_commands(
    mut commands: Commands,
    mut events: EventReader<MarkupToolCommand>,
    mut overlay: ResMut<MarkupOverlay>,
    mut tool: ResMut<MarkupTool>,
    mut loader: ResMut<MarkupLoader>,
    mut store: ResMut<MarkupStore>,
    mut field: ResMut<MarkerField>,
    mut card_anchor: ResMut<CardAnchor>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    mut card_events: EventWriter<CardEvent>,
    mut redraw: EventWriter<RequestRedraw>,
    mut host_selection: ResMut<HostSelection>,
) {
    for command in events.read() {
        match command {
            MarkupToolCommand::Activate => {
                if !overlay.begin_activate() {
                    continue;
                }
                tool.activate();
                if overlay.anchor_entity.is_none() {
                    let entity = commands
                        .spawn((
                            Mesh3d(meshes.add(Cylinder::new(ANCHOR_LINE_RADIUS, ANCHOR_UNIT_LENGTH))),
                            MeshMaterial3d(materials.add(StandardMaterial {
                                base_color: ANCHOR_LINE_COLOR.with_alpha(ANCHOR_LINE_OPACITY),
                                alpha_mode: AlphaMode::Blend,
                                unlit: true,
                                ..default()
                            })),
                            Transform::default(),
                            Visibility::Hidden,
                            AnchorLine,
                            RenderLayers::layer(OVERLAY_LAYER),
                        ))
                        .id();
                    overlay.anchor_entity = Some(entity);
                }
                info!("markup overlay activated");
            }
            MarkupToolCommand::Deactivate => {
                if !overlay.begin_deactivate() {
                    continue;
                }
                let effects = tool.deactivate(&mut field);
                apply_tool_effects(&effects, &mut card_events, &mut redraw, &mut host_selection);
                if let Some(entity) = overlay.field_entity.take() {
                    commands.entity(entity).despawn();
                }
                if let Some(entity) = overlay.anchor_entity.take() {
                    commands.entity(entity).despawn();
                }
                overlay.material = None;
                card_anchor.position = None;
                store.items.clear();
                *field = MarkerField::default();
                *loader = MarkupLoader::default();
                info!("markup overlay deactivated");
            }
        }
    }
}

/// Spawn the point field mesh once the loaded field is available.
pub fn spawn_marker_field(
    mut commands: Commands,
    mut overlay: ResMut<MarkupOverlay>,
    field: Res<MarkerField>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<MarkerSpriteMaterial>>,
    mut images: ResMut<Assets<Image>>,
) {
    if !overlay.active || overlay.field_entity.is_some() || field.is_empty() {
        return;
    }

    let material = materials.add(MarkerSpriteMaterial {
        icon_atlas: images.add(create_icon_atlas_image()),
        field: MarkerFieldUniform::from_field(&field),
    });
    let entity = commands
        .spawn((
            Mesh3d(meshes.add(create_marker_index_mesh(field.len()))),
            MeshMaterial3d(material.clone()),
            Transform::default(),
            MarkerFieldMesh,
            RenderLayers::layer(OVERLAY_LAYER),
            // Positions live in the material uniform, not the mesh, so
            // bevy's AABB culling would discard the whole field.
            NoFrustumCulling,
        ))
        .id();
    overlay.field_entity = Some(entity);
    overlay.material = Some(material);
}

/// Push field changes (hover recolor, rebuild) into the sprite material.
pub fn sync_marker_material(
    overlay: Res<MarkupOverlay>,
    field: Res<MarkerField>,
    mut materials: ResMut<Assets<MarkerSpriteMaterial>>,
) {
    if !field.is_changed() {
        return;
    }
    let Some(handle) = overlay.material.as_ref() else {
        return;
    };
    let Some(material) = materials.get_mut(handle) else {
        return;
    };
    material.field = MarkerFieldUniform::from_field(&field);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn activation_guard_fires_once() {
        let mut overlay = MarkupOverlay::default();
        assert!(overlay.begin_activate());
        assert!(!overlay.begin_activate());
        assert!(overlay.active);
    }

    #[test]
    fn deactivation_when_inactive_is_a_no_op() {
        let mut overlay = MarkupOverlay::default();
        assert!(!overlay.begin_deactivate());
        overlay.begin_activate();
        assert!(overlay.begin_deactivate());
        assert!(!overlay.begin_deactivate());
        assert!(!overlay.active);
    }
}
