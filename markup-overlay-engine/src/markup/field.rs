use bevy::prelude::*;
use constants::render_settings::MARKER_LIFT;

use crate::markup::store::MarkupItem;

/// Intensity encoding carried in `color_state[i].x`. Selection is tracked
/// separately and never changes intensity.
pub const BASE_INTENSITY: f32 = 1.0;
pub const HOVER_INTENSITY: f32 = 2.0;

/// The renderable point field: parallel arrays over the loaded items.
///
/// `positions[i]` corresponds to `items[i]` for the lifetime of one load;
/// rebuilds replace the whole value rather than editing in place.
#[derive(Resource, Debug, Default, Clone, PartialEq)]
pub struct MarkerField {
    pub positions: Vec<Vec3>,
    /// x = intensity, y = icon tile index.
    pub color_state: Vec<Vec2>,
}

impl MarkerField {
    /// Pure, deterministic build from the loaded items. Markers are lifted
    /// off the annotated surface by a constant vertical bias.
    pub fn build(items: &[MarkupItem]) -> Self {
        Self {
            positions: items
                .iter()
                .map(|item| item.position() + Vec3::Y * MARKER_LIFT)
                .collect(),
            color_state: items
                .iter()
                .map(|item| Vec2::new(BASE_INTENSITY, item.icon as f32))
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn set_intensity(&mut self, index: usize, intensity: f32) {
        if let Some(color) = self.color_state.get_mut(index) {
            color.x = intensity;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: u64, x: f32, y: f32, z: f32, icon: u32) -> MarkupItem {
        MarkupItem {
            id,
            x,
            y,
            z,
            icon,
            title: None,
            description: None,
            priority: None,
            assignee: None,
            date: None,
        }
    }

    #[test]
    fn build_keeps_parallel_arrays_in_correspondence() {
        let items = vec![
            item(10, 0.0, 0.0, 0.0, 0),
            item(11, 10.0, 1.0, -5.0, 2),
            item(12, 20.0, 2.0, 5.0, 3),
        ];
        let field = MarkerField::build(&items);
        assert_eq!(field.positions.len(), items.len());
        assert_eq!(field.color_state.len(), items.len());
        for (i, src) in items.iter().enumerate() {
            assert_eq!(field.positions[i], src.position() + Vec3::Y * MARKER_LIFT);
            assert_eq!(field.color_state[i], Vec2::new(BASE_INTENSITY, src.icon as f32));
        }
    }

    #[test]
    fn set_intensity_touches_only_the_given_index() {
        let mut field = MarkerField::build(&[item(1, 0.0, 0.0, 0.0, 0), item(2, 1.0, 0.0, 0.0, 1)]);
        field.set_intensity(1, HOVER_INTENSITY);
        assert_eq!(field.color_state[0].x, BASE_INTENSITY);
        assert_eq!(field.color_state[1].x, HOVER_INTENSITY);
        // Icon encoding untouched.
        assert_eq!(field.color_state[1].y, 1.0);
        // Out-of-range indices are ignored.
        field.set_intensity(9, HOVER_INTENSITY);
    }
}
