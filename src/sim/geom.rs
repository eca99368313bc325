//! Axis-aligned rectangles in screen space
//!
//! Screen coordinates: x grows to the right, y grows downward, so `bottom`
//! is the larger y value. All positions are whole pixels.

use glam::IVec2;
use serde::{Deserialize, Serialize};

/// An axis-aligned bounding rectangle (top-left corner + size)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub pos: IVec2,
    pub size: IVec2,
}

impl Rect {
    pub fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self {
            pos: IVec2::new(x, y),
            size: IVec2::new(w, h),
        }
    }

    /// Build a rectangle of `size` centred on `center`
    pub fn from_center(center: IVec2, size: IVec2) -> Self {
        Self {
            pos: center - size / 2,
            size,
        }
    }

    #[inline]
    pub fn left(&self) -> i32 {
        self.pos.x
    }

    #[inline]
    pub fn right(&self) -> i32 {
        self.pos.x + self.size.x
    }

    #[inline]
    pub fn top(&self) -> i32 {
        self.pos.y
    }

    #[inline]
    pub fn bottom(&self) -> i32 {
        self.pos.y + self.size.y
    }

    #[inline]
    pub fn width(&self) -> i32 {
        self.size.x
    }

    #[inline]
    pub fn height(&self) -> i32 {
        self.size.y
    }

    pub fn center(&self) -> IVec2 {
        self.pos + self.size / 2
    }

    pub fn set_left(&mut self, x: i32) {
        self.pos.x = x;
    }

    pub fn set_right(&mut self, x: i32) {
        self.pos.x = x - self.size.x;
    }

    pub fn set_top(&mut self, y: i32) {
        self.pos.y = y;
    }

    pub fn set_bottom(&mut self, y: i32) {
        self.pos.y = y - self.size.y;
    }

    pub fn set_center(&mut self, center: IVec2) {
        self.pos = center - self.size / 2;
    }

    pub fn set_center_y(&mut self, y: i32) {
        self.pos.y = y - self.size.y / 2;
    }

    pub fn translate(&mut self, delta: IVec2) {
        self.pos += delta;
    }

    /// Rectangles intersect iff both axis intervals intersect.
    /// Touching edges do not count.
    #[inline]
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.left() < other.right()
            && other.left() < self.right()
            && self.top() < other.bottom()
            && other.top() < self.bottom()
    }

    /// Keep the rectangle horizontally inside `[0, width]`
    pub fn clamp_horizontal(&mut self, width: i32) {
        if self.left() < 0 {
            self.set_left(0);
        }
        if self.right() > width {
            self.set_right(width);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edges() {
        let r = Rect::new(10, 20, 30, 40);
        assert_eq!(r.left(), 10);
        assert_eq!(r.right(), 40);
        assert_eq!(r.top(), 20);
        assert_eq!(r.bottom(), 60);
        assert_eq!(r.center(), IVec2::new(25, 40));
    }

    #[test]
    fn test_overlap_requires_both_axes() {
        let a = Rect::new(0, 0, 10, 10);
        assert!(a.overlaps(&Rect::new(5, 5, 10, 10)));
        // x overlaps, y does not
        assert!(!a.overlaps(&Rect::new(5, 20, 10, 10)));
        // y overlaps, x does not
        assert!(!a.overlaps(&Rect::new(20, 5, 10, 10)));
        // touching edges
        assert!(!a.overlaps(&Rect::new(10, 0, 10, 10)));
    }

    #[test]
    fn test_set_bottom_and_center() {
        let mut r = Rect::new(0, 0, 20, 10);
        r.set_bottom(100);
        assert_eq!(r.bottom(), 100);
        assert_eq!(r.top(), 90);

        r.set_center(IVec2::new(50, 50));
        assert_eq!(r.center(), IVec2::new(50, 50));
    }

    #[test]
    fn test_clamp_horizontal() {
        let mut r = Rect::new(-5, 0, 20, 10);
        r.clamp_horizontal(100);
        assert_eq!(r.left(), 0);

        let mut r = Rect::new(95, 0, 20, 10);
        r.clamp_horizontal(100);
        assert_eq!(r.right(), 100);
    }
}
