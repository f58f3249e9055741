use bevy::prelude::*;

use crate::engine::camera::PointerRay;

/// Nearest-point-to-ray intersection over the marker positions.
///
/// A marker counts as hit when its perpendicular distance to the ray is
/// within `threshold` world units; among hits, the smallest distance along
/// the ray wins. Markers behind the ray origin are skipped. Pure: the
/// caller owns all selection state.
pub fn hit_test(ray: &PointerRay, positions: &[Vec3], threshold: f32) -> Option<usize> {
    let threshold_sq = threshold * threshold;
    let mut best: Option<(usize, f32)> = None;

    for (index, position) in positions.iter().enumerate() {
        let along = (*position - ray.origin).dot(ray.direction);
        if along < 0.0 {
            continue;
        }
        let closest = ray.origin + ray.direction * along;
        if closest.distance_squared(*position) > threshold_sq {
            continue;
        }
        if best.is_none_or(|(_, best_along)| along < best_along) {
            best = Some((index, along));
        }
    }

    best.map(|(index, _)| index)
}
