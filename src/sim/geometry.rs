//! Collision primitives shared by the engines
//!
//! Rectangles use screen coordinates: x grows right, y grows down.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle anchored at its top-left corner
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Square box of edge `size` centered on `center`
    pub fn centered(center: Vec2, size: f32) -> Self {
        let half = size / 2.0;
        Self::new(center.x - half, center.y - half, size, size)
    }

    #[inline]
    pub fn left(&self) -> f32 {
        self.x
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.y
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    pub fn overlaps(&self, other: &Rect) -> bool {
        aabb_overlap(self, other)
    }
}

/// AABB overlap test. Strict: rectangles that only share an edge do not overlap.
#[inline]
pub fn aabb_overlap(a: &Rect, b: &Rect) -> bool {
    a.right() > b.left() && a.left() < b.right() && a.bottom() > b.top() && a.top() < b.bottom()
}

/// Euclidean distance between two points
#[inline]
pub fn circular_distance(p1: Vec2, p2: Vec2) -> f32 {
    p1.distance(p2)
}

/// True if a body of edge `size` centered at `pos` overlaps any rectangle
pub fn overlaps_any(pos: Vec2, size: f32, rects: &[Rect]) -> bool {
    let body = Rect::centered(pos, size);
    rects.iter().any(|r| aabb_overlap(&body, r))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overlap_basic() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(5.0, 5.0, 10.0, 10.0);
        assert!(aabb_overlap(&a, &b));
        assert!(aabb_overlap(&b, &a));
    }

    #[test]
    fn test_touching_edges_do_not_overlap() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let right = Rect::new(10.0, 0.0, 10.0, 10.0);
        let below = Rect::new(0.0, 10.0, 10.0, 10.0);
        assert!(!aabb_overlap(&a, &right));
        assert!(!aabb_overlap(&a, &below));
    }

    #[test]
    fn test_contained_rect_overlaps() {
        let outer = Rect::new(0.0, 0.0, 100.0, 100.0);
        let inner = Rect::centered(Vec2::new(50.0, 50.0), 6.0);
        assert!(aabb_overlap(&outer, &inner));
        assert_eq!(inner.center(), Vec2::new(50.0, 50.0));
    }

    #[test]
    fn test_circular_distance() {
        let d = circular_distance(Vec2::new(0.0, 0.0), Vec2::new(3.0, 4.0));
        assert!((d - 5.0).abs() < 0.0001);
    }

    #[test]
    fn test_overlaps_any() {
        let walls = [Rect::new(0.0, 0.0, 900.0, 6.0)];
        // Box edge at y=6 touches the wall bottom exactly
        assert!(!overlaps_any(Vec2::new(50.0, 9.0), 6.0, &walls));
        assert!(overlaps_any(Vec2::new(50.0, 8.0), 6.0, &walls));
    }
}
