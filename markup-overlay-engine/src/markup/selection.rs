use bevy::prelude::*;
use bevy::window::{PrimaryWindow, RequestRedraw};

use constants::render_settings::PICK_THRESHOLD;

use crate::engine::camera::CameraSnapshot;
use crate::markup::card::CardEvent;
use crate::markup::field::{BASE_INTENSITY, HOVER_INTENSITY, MarkerField};
use crate::markup::picking::hit_test;
use crate::markup::store::MarkupStore;

/// Pointer button identity at the host boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerButton {
    Primary,
    Secondary,
}

/// Host-facing side effects requested by the selection state machine. The
/// machine itself never touches host state; thin adapter systems apply
/// these after each callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolEffect {
    /// Ask the host to schedule a redraw.
    Invalidate,
    /// Present the info card for the given item id.
    ShowCard { item_id: u64 },
    HideCard,
    /// Drop any multi-object selection held by the host scene.
    ClearHostSelection,
}

/// Multi-object selection owned by the host scene. A markup click clears
/// it so the two selection models never show at once.
#[derive(Resource, Default)]
pub struct HostSelection {
    pub selected_ids: Vec<u32>,
}

/// The markup selection state machine: sole mutator of hover and
/// selection. Hover raises the marker intensity while it lasts; selection
/// is sticky and only a fresh hit replaces it.
#[derive(Resource, Debug, Default)]
pub struct MarkupTool {
    active: bool,
    hovered: Option<usize>,
    selected: Option<usize>,
}

impl MarkupTool {
    /// Returns false when already active, making repeat activation a no-op.
    pub fn activate(&mut self) -> bool {
        if self.active {
            return false;
        }
        self.active = true;
        true
    }

    pub fn deactivate(&mut self, field: &mut MarkerField) -> Vec<ToolEffect> {
        if !self.active {
            return Vec::new();
        }
        self.active = false;
        if let Some(previous) = self.hovered.take() {
            field.set_intensity(previous, BASE_INTENSITY);
        }
        self.selected = None;
        vec![ToolEffect::HideCard, ToolEffect::Invalidate]
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn hovered(&self) -> Option<usize> {
        self.hovered
    }

    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    /// Drop both indices without deactivating; used when the field is
    /// rebuilt and old indices no longer apply.
    pub fn reset(&mut self) {
        self.hovered = None;
        self.selected = None;
    }

    /// Hover transition: restore the previous marker to base intensity,
    /// raise the new one, and request a redraw. Unchanged hover is silent.
    pub fn handle_pointer_move(
        &mut self,
        cursor: Vec2,
        camera: &CameraSnapshot,
        field: &mut MarkerField,
    ) -> Vec<ToolEffect> {
        if !self.active {
            return Vec::new();
        }
        let hit = hit_test(&camera.pointer_ray(cursor), &field.positions, PICK_THRESHOLD);
        if hit == self.hovered {
            return Vec::new();
        }
        if let Some(previous) = self.hovered {
            field.set_intensity(previous, BASE_INTENSITY);
        }
        if let Some(index) = hit {
            field.set_intensity(index, HOVER_INTENSITY);
        }
        self.hovered = hit;
        vec![ToolEffect::Invalidate]
    }

    /// Primary-button hit selects; a miss is a no-op and the current
    /// selection stays (clicking empty space does not clear it).
    pub fn handle_click(
        &mut self,
        button: PointerButton,
        cursor: Vec2,
        camera: &CameraSnapshot,
        field: &MarkerField,
        store: &MarkupStore,
    ) -> Vec<ToolEffect> {
        if !self.active || button != PointerButton::Primary {
            return Vec::new();
        }
        let Some(index) = hit_test(&camera.pointer_ray(cursor), &field.positions, PICK_THRESHOLD)
        else {
            return Vec::new();
        };
        self.selected = Some(index);
        // Field and store are rebuilt together; a hit index is always a
        // valid item index.
        let item_id = store.items[index].id;
        vec![
            ToolEffect::ShowCard { item_id },
            ToolEffect::ClearHostSelection,
            ToolEffect::Invalidate,
        ]
    }
}

pub fn apply_tool_effects(
    effects: &[ToolEffect],
    card_events: &mut EventWriter<CardEvent>,
    redraw: &mut EventWriter<RequestRedraw>,
    host_selection: &mut HostSelection,
) {
    for effect in effects {
        match effect {
            ToolEffect::Invalidate => {
                redraw.send(RequestRedraw);
            }
            ToolEffect::ShowCard { item_id } => {
                card_events.send(CardEvent::Show { item_id: *item_id });
            }
            ToolEffect::HideCard => {
                card_events.send(CardEvent::Hide);
            }
            ToolEffect::ClearHostSelection => {
                host_selection.selected_ids.clear();
            }
        }
    }
}

/// Feed pointer movement into the state machine.
pub fn markup_pointer_move(
    windows: Query<&Window, With<PrimaryWindow>>,
    cameras: Query<(&Camera, &GlobalTransform, &Projection), With<Camera3d>>,
    mut tool: ResMut<MarkupTool>,
    mut field: ResMut<MarkerField>,
    mut card_events: EventWriter<CardEvent>,
    mut redraw: EventWriter<RequestRedraw>,
    mut host_selection: ResMut<HostSelection>,
) {
    if !tool.is_active() {
        return;
    }
    let Ok(window) = windows.single() else {
        return;
    };
    let Some(cursor) = window.cursor_position() else {
        return;
    };
    let Ok((camera, cam_transform, projection)) = cameras.single() else {
        return;
    };
    let Some(snapshot) = CameraSnapshot::from_camera(camera, cam_transform, projection) else {
        return;
    };

    // Mutate through bypass so an unchanged hover does not mark the field
    // dirty every frame.
    let effects = tool
        .bypass_change_detection()
        .handle_pointer_move(cursor, &snapshot, field.bypass_change_detection());
    if effects.is_empty() {
        return;
    }
    tool.set_changed();
    field.set_changed();
    apply_tool_effects(&effects, &mut card_events, &mut redraw, &mut host_selection);
}

/// Feed click input into the state machine.
pub fn markup_click(
    mouse: Res<ButtonInput<MouseButton>>,
    windows: Query<&Window, With<PrimaryWindow>>,
    cameras: Query<(&Camera, &GlobalTransform, &Projection), With<Camera3d>>,
    mut tool: ResMut<MarkupTool>,
    field: Res<MarkerField>,
    store: Res<MarkupStore>,
    mut card_events: EventWriter<CardEvent>,
    mut redraw: EventWriter<RequestRedraw>,
    mut host_selection: ResMut<HostSelection>,
) {
    let button = if mouse.just_pressed(MouseButton::Left) {
        PointerButton::Primary
    } else if mouse.just_pressed(MouseButton::Right) {
        PointerButton::Secondary
    } else {
        return;
    };
    if !tool.is_active() {
        return;
    }
    let Ok(window) = windows.single() else {
        return;
    };
    let Some(cursor) = window.cursor_position() else {
        return;
    };
    let Ok((camera, cam_transform, projection)) = cameras.single() else {
        return;
    };
    let Some(snapshot) = CameraSnapshot::from_camera(camera, cam_transform, projection) else {
        return;
    };

    let effects = tool
        .bypass_change_detection()
        .handle_click(button, cursor, &snapshot, &field, &store);
    if effects.is_empty() {
        return;
    }
    tool.set_changed();
    apply_tool_effects(&effects, &mut card_events, &mut redraw, &mut host_selection);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markup::store::MarkupItem;

    fn item(id: u64, x: f32) -> MarkupItem {
        MarkupItem {
            id,
            x,
            y: 0.0,
            z: 0.0,
            icon: 0,
            title: None,
            description: None,
            priority: None,
            assignee: None,
            date: None,
        }
    }

    fn store() -> MarkupStore {
        MarkupStore {
            items: vec![item(10, 0.0), item(11, 10.0), item(12, 20.0)],
        }
    }

    fn camera_at(eye: Vec3, target: Vec3) -> CameraSnapshot {
        CameraSnapshot {
            position: eye,
            view_from_world: Mat4::look_at_rh(eye, target, Vec3::Y),
            clip_from_view: Mat4::perspective_rh(60f32.to_radians(), 4.0 / 3.0, 0.1, 1000.0),
            is_perspective: true,
            viewport: Vec2::new(1024.0, 768.0),
        }
    }

    /// Pixel coordinates that project the given world point to the cursor.
    fn cursor_for(camera: &CameraSnapshot, world: Vec3) -> Vec2 {
        let ndc = camera.world_to_ndc(world).unwrap();
        Vec2::new(
            (ndc.x + 1.0) * 0.5 * camera.viewport.x,
            (1.0 - ndc.y) * 0.5 * camera.viewport.y,
        )
    }

    fn active_tool() -> MarkupTool {
        let mut tool = MarkupTool::default();
        assert!(tool.activate());
        tool
    }

    #[test]
    fn activation_is_idempotent() {
        let mut tool = MarkupTool::default();
        assert!(tool.activate());
        assert!(!tool.activate());
        assert!(tool.is_active());
    }

    #[test]
    fn hover_moves_between_markers_and_restores_intensity() {
        let store = store();
        let mut field = MarkerField::build(&store.items);
        let mut tool = active_tool();
        let camera = camera_at(Vec3::new(10.0, 3.0, 50.0), Vec3::new(10.0, 3.0, 0.0));

        let over_a = cursor_for(&camera, field.positions[0]);
        let effects = tool.handle_pointer_move(over_a, &camera, &mut field);
        assert_eq!(tool.hovered(), Some(0));
        assert_eq!(field.color_state[0].x, HOVER_INTENSITY);
        assert_eq!(effects, vec![ToolEffect::Invalidate]);

        // Unchanged hover stays silent.
        assert!(tool.handle_pointer_move(over_a, &camera, &mut field).is_empty());

        let over_b = cursor_for(&camera, field.positions[1]);
        tool.handle_pointer_move(over_b, &camera, &mut field);
        assert_eq!(tool.hovered(), Some(1));
        assert_eq!(field.color_state[0].x, BASE_INTENSITY);
        assert_eq!(field.color_state[1].x, HOVER_INTENSITY);
    }

    #[test]
    fn hover_clears_on_miss() {
        let store = store();
        let mut field = MarkerField::build(&store.items);
        let mut tool = active_tool();
        let camera = camera_at(Vec3::new(10.0, 3.0, 50.0), Vec3::new(10.0, 3.0, 0.0));

        tool.handle_pointer_move(cursor_for(&camera, field.positions[2]), &camera, &mut field);
        assert_eq!(tool.hovered(), Some(2));

        // Top-left corner looks past every marker.
        let effects = tool.handle_pointer_move(Vec2::ZERO, &camera, &mut field);
        assert_eq!(tool.hovered(), None);
        assert_eq!(field.color_state[2].x, BASE_INTENSITY);
        assert_eq!(effects, vec![ToolEffect::Invalidate]);
    }

    #[test]
    fn primary_click_selects_and_requests_card() {
        let store = store();
        let mut field = MarkerField::build(&store.items);
        let mut tool = active_tool();
        let camera = camera_at(Vec3::new(10.0, 3.0, 50.0), Vec3::new(10.0, 3.0, 0.0));

        let cursor = cursor_for(&camera, field.positions[1]);
        let effects = tool.handle_click(PointerButton::Primary, cursor, &camera, &field, &store);
        assert_eq!(tool.selected(), Some(1));
        assert!(effects.contains(&ToolEffect::ShowCard { item_id: 11 }));
        assert!(effects.contains(&ToolEffect::ClearHostSelection));
        assert!(effects.contains(&ToolEffect::Invalidate));
    }

    #[test]
    fn secondary_click_is_a_no_op() {
        let store = store();
        let field = MarkerField::build(&store.items);
        let mut tool = active_tool();
        let camera = camera_at(Vec3::new(10.0, 3.0, 50.0), Vec3::new(10.0, 3.0, 0.0));

        let cursor = cursor_for(&camera, field.positions[1]);
        let effects = tool.handle_click(PointerButton::Secondary, cursor, &camera, &field, &store);
        assert!(effects.is_empty());
        assert_eq!(tool.selected(), None);
    }

    #[test]
    fn click_on_empty_space_keeps_the_selection() {
        // Pins the observed sticky behavior: a miss never clears the
        // current selection, only a fresh hit replaces it.
        let store = store();
        let mut field = MarkerField::build(&store.items);
        let mut tool = active_tool();
        let camera = camera_at(Vec3::new(10.0, 3.0, 50.0), Vec3::new(10.0, 3.0, 0.0));

        let cursor = cursor_for(&camera, field.positions[1]);
        tool.handle_click(PointerButton::Primary, cursor, &camera, &field, &store);
        assert_eq!(tool.selected(), Some(1));

        let effects =
            tool.handle_click(PointerButton::Primary, Vec2::ZERO, &camera, &field, &store);
        assert!(effects.is_empty());
        assert_eq!(tool.selected(), Some(1));
    }

    #[test]
    fn deactivate_resets_state_and_hides_card() {
        let store = store();
        let mut field = MarkerField::build(&store.items);
        let mut tool = active_tool();
        let camera = camera_at(Vec3::new(10.0, 3.0, 50.0), Vec3::new(10.0, 3.0, 0.0));

        let cursor = cursor_for(&camera, field.positions[0]);
        tool.handle_pointer_move(cursor, &camera, &mut field);
        tool.handle_click(PointerButton::Primary, cursor, &camera, &field, &store);

        let effects = tool.deactivate(&mut field);
        assert!(!tool.is_active());
        assert_eq!(tool.hovered(), None);
        assert_eq!(tool.selected(), None);
        assert_eq!(field.color_state[0].x, BASE_INTENSITY);
        assert!(effects.contains(&ToolEffect::HideCard));

        // Deactivating again is a no-op.
        assert!(tool.deactivate(&mut field).is_empty());
    }

    #[test]
    fn inactive_tool_ignores_input() {
        let store = store();
        let mut field = MarkerField::build(&store.items);
        let mut tool = MarkupTool::default();
        let camera = camera_at(Vec3::new(10.0, 3.0, 50.0), Vec3::new(10.0, 3.0, 0.0));

        let cursor = cursor_for(&camera, field.positions[0]);
        assert!(tool.handle_pointer_move(cursor, &camera, &mut field).is_empty());
        assert!(
            tool.handle_click(PointerButton::Primary, cursor, &camera, &field, &store)
                .is_empty()
        );
    }
}
