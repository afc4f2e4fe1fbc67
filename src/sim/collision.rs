//! Axis-aligned collision detection
//!
//! Both the character and every obstacle are plain rectangles, so a hit is
//! an interval overlap on both axes.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::state::Obstacle;

/// Axis-aligned rectangle (top-left origin, y grows downward)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub min: Vec2,
    pub size: Vec2,
}

impl Rect {
    pub fn new(min: Vec2, size: Vec2) -> Self {
        Self { min, size }
    }

    pub fn from_xywh(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self::new(Vec2::new(x, y), Vec2::new(w, h))
    }

    #[inline]
    pub fn max(&self) -> Vec2 {
        self.min + self.size
    }

    /// Point containment, edges inclusive (used for button hit tests)
    pub fn contains(&self, point: Vec2) -> bool {
        let max = self.max();
        point.x >= self.min.x && point.x <= max.x && point.y >= self.min.y && point.y <= max.y
    }
}

/// AABB overlap with strict inequalities: touching edges do not collide
#[inline]
pub fn overlaps(a: &Rect, b: &Rect) -> bool {
    let a_max = a.max();
    let b_max = b.max();
    a.min.x < b_max.x && a_max.x > b.min.x && a.min.y < b_max.y && a_max.y > b.min.y
}

/// ID of the first obstacle (oldest first) overlapping `body`
pub fn first_hit(body: &Rect, obstacles: &[Obstacle]) -> Option<u32> {
    obstacles
        .iter()
        .find(|o| overlaps(body, &o.rect()))
        .map(|o| o.id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::ObstacleKind;

    fn obstacle(id: u32, x: f32, y: f32, w: f32, h: f32) -> Obstacle {
        Obstacle {
            id,
            kind: ObstacleKind::Standard,
            pos: Vec2::new(x, y),
            size: Vec2::new(w, h),
            base_y: y,
            spawn_x: 800.0,
        }
    }

    #[test]
    fn test_overlap_on_both_axes() {
        let a = Rect::from_xywh(50.0, 370.0, 30.0, 30.0);
        let b = Rect::from_xywh(70.0, 360.0, 20.0, 40.0);
        assert!(overlaps(&a, &b));
        assert!(overlaps(&b, &a));
    }

    #[test]
    fn test_overlap_on_one_axis_only() {
        let character = Rect::from_xywh(50.0, 300.0, 30.0, 30.0);
        // Same columns, but the character is above the obstacle
        let below = Rect::from_xywh(60.0, 340.0, 20.0, 60.0);
        assert!(!overlaps(&character, &below));
        // Same rows, but the obstacle is further right
        let ahead = Rect::from_xywh(200.0, 300.0, 20.0, 60.0);
        assert!(!overlaps(&character, &ahead));
    }

    #[test]
    fn test_touching_edges_do_not_collide() {
        let character = Rect::from_xywh(50.0, 370.0, 30.0, 30.0);
        let right = Rect::from_xywh(80.0, 370.0, 20.0, 30.0);
        assert!(!overlaps(&character, &right));
        let under = Rect::from_xywh(50.0, 400.0, 30.0, 10.0);
        assert!(!overlaps(&character, &under));
    }

    #[test]
    fn test_first_hit_reports_oldest() {
        let character = Rect::from_xywh(50.0, 370.0, 30.0, 30.0);
        let obstacles = vec![
            obstacle(1, 400.0, 360.0, 20.0, 40.0),
            obstacle(2, 60.0, 360.0, 20.0, 40.0),
            obstacle(3, 70.0, 360.0, 20.0, 40.0),
        ];
        assert_eq!(first_hit(&character, &obstacles), Some(2));
        assert_eq!(first_hit(&character, &obstacles[..1]), None);
    }

    #[test]
    fn test_contains_edges() {
        let r = Rect::from_xywh(10.0, 10.0, 20.0, 20.0);
        assert!(r.contains(Vec2::new(10.0, 30.0)));
        assert!(!r.contains(Vec2::new(31.0, 15.0)));
    }
}
