// Axis-aligned bounding-box collision tests and proximity queries.
//
// Entity counts stay in the tens, so every query is a linear scan.

use crate::domain::entities::{Rect, Spatial};
use crate::domain::tuning::Playfield;

/// Strict AABB overlap; touching edges do not collide.
pub fn overlaps(a: &Rect, b: &Rect) -> bool {
    a.x < b.x + b.width && a.x + a.width > b.x && a.y < b.y + b.height && a.y + a.height > b.y
}

pub fn collides(a: &impl Spatial, b: &impl Spatial) -> bool {
    overlaps(&a.rect(), &b.rect())
}

pub fn distance(a: (f32, f32), b: (f32, f32)) -> f32 {
    let dx = b.0 - a.0;
    let dy = b.1 - a.1;
    (dx * dx + dy * dy).sqrt()
}

/// Index of the item whose centre is closest to `origin`.
///
/// `radius` bounds the search; `skip` filters candidates out.
pub fn nearest_index<T: Spatial>(
    items: &[T],
    origin: (f32, f32),
    radius: Option<f32>,
    mut skip: impl FnMut(&T) -> bool,
) -> Option<usize> {
    let mut best: Option<(usize, f32)> = None;
    for (i, item) in items.iter().enumerate() {
        if skip(item) {
            continue;
        }
        let d = distance(origin, item.center());
        if radius.is_some_and(|r| d > r) {
            continue;
        }
        if best.is_none_or(|(_, best_d)| d < best_d) {
            best = Some((i, d));
        }
    }
    best.map(|(i, _)| i)
}

impl Playfield {
    /// True while any part of the box is on screen.
    pub fn overlaps(&self, rect: &Rect) -> bool {
        overlaps(rect, &Rect::new(0.0, 0.0, self.width, self.height))
    }

    /// Entities entering from the top are kept until they fall past the bottom edge.
    pub fn above_bottom(&self, rect: &Rect) -> bool {
        rect.y < self.height
    }

    /// Moves the box back inside the playfield.
    pub fn clamp(&self, rect: &mut Rect) {
        rect.x = rect.x.clamp(0.0, (self.width - rect.width).max(0.0));
        rect.y = rect.y.clamp(0.0, (self.height - rect.height).max(0.0));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn when_boxes_are_apart_then_no_collision() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(20.0, 0.0, 10.0, 10.0);
        assert!(!overlaps(&a, &b));
        assert!(!overlaps(&b, &a));
    }

    #[test]
    fn when_edges_only_touch_then_no_collision() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let right = Rect::new(10.0, 0.0, 10.0, 10.0);
        let below = Rect::new(0.0, 10.0, 10.0, 10.0);
        assert!(!overlaps(&a, &right));
        assert!(!overlaps(&a, &below));
    }

    #[test]
    fn when_boxes_overlap_by_one_pixel_on_either_axis_then_collision() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert!(overlaps(&a, &Rect::new(9.0, 0.0, 10.0, 10.0)));
        assert!(overlaps(&a, &Rect::new(0.0, 9.0, 10.0, 10.0)));
        assert!(overlaps(&a, &Rect::new(-9.0, -9.0, 10.0, 10.0)));
    }

    #[test]
    fn when_searching_nearest_then_radius_and_skip_are_respected() {
        let items = vec![
            Rect::centered(0.0, 0.0, 2.0, 2.0),
            Rect::centered(30.0, 0.0, 2.0, 2.0),
            Rect::centered(10.0, 0.0, 2.0, 2.0),
        ];

        assert_eq!(nearest_index(&items, (0.0, 0.0), None, |_| false), Some(0));
        assert_eq!(
            nearest_index(&items, (0.0, 0.0), None, |r| r.x < 0.0),
            Some(2)
        );
        assert_eq!(
            nearest_index(&items, (0.0, 0.0), Some(5.0), |r| r.x < 0.0),
            None
        );
    }

    #[test]
    fn when_clamping_then_box_stays_inside_playfield() {
        let field = Playfield::default();
        let mut rect = Rect::new(-15.0, 900.0, 40.0, 40.0);
        field.clamp(&mut rect);
        assert_eq!(rect.x, 0.0);
        assert_eq!(rect.y, 560.0);
    }
}
