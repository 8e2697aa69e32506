//! Math type aliases and rectangle geometry.
//!
//! Coordinates use `f64` and a y axis that grows upward, so the "top" of a
//! rectangle is its maximum y.

pub use nalgebra;

/// 2D point (f64).
pub type Point2 = nalgebra::Point2<f64>;

/// 2D vector (f64).
pub type Vector2 = nalgebra::Vector2<f64>;

/// Axis-aligned rectangle given by an origin and a size.
///
/// The size may be negative; the min/max accessors always return the
/// normalized extent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub origin: Point2,
    pub size: Vector2,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            origin: Point2::new(x, y),
            size: Vector2::new(width, height),
        }
    }

    pub fn width(&self) -> f64 {
        self.size.x.abs()
    }

    pub fn height(&self) -> f64 {
        self.size.y.abs()
    }

    pub fn min_x(&self) -> f64 {
        self.origin.x.min(self.origin.x + self.size.x)
    }

    pub fn mid_x(&self) -> f64 {
        self.origin.x + self.size.x * 0.5
    }

    pub fn max_x(&self) -> f64 {
        self.origin.x.max(self.origin.x + self.size.x)
    }

    pub fn min_y(&self) -> f64 {
        self.origin.y.min(self.origin.y + self.size.y)
    }

    pub fn mid_y(&self) -> f64 {
        self.origin.y + self.size.y * 0.5
    }

    pub fn max_y(&self) -> f64 {
        self.origin.y.max(self.origin.y + self.size.y)
    }

    pub fn center(&self) -> Point2 {
        Point2::new(self.mid_x(), self.mid_y())
    }

    /// Midpoint of the left edge.
    pub fn left(&self) -> Point2 {
        Point2::new(self.min_x(), self.mid_y())
    }

    /// Midpoint of the right edge.
    pub fn right(&self) -> Point2 {
        Point2::new(self.max_x(), self.mid_y())
    }

    /// Midpoint of the top (max y) edge.
    pub fn top(&self) -> Point2 {
        Point2::new(self.mid_x(), self.max_y())
    }

    /// Midpoint of the bottom (min y) edge.
    pub fn bottom(&self) -> Point2 {
        Point2::new(self.mid_x(), self.min_y())
    }

    pub fn top_left(&self) -> Point2 {
        Point2::new(self.min_x(), self.max_y())
    }

    pub fn top_right(&self) -> Point2 {
        Point2::new(self.max_x(), self.max_y())
    }

    pub fn bottom_left(&self) -> Point2 {
        Point2::new(self.min_x(), self.min_y())
    }

    pub fn bottom_right(&self) -> Point2 {
        Point2::new(self.max_x(), self.min_y())
    }

    pub fn shorter_edge(&self) -> f64 {
        self.width().min(self.height())
    }

    pub fn longer_edge(&self) -> f64 {
        self.width().max(self.height())
    }

    pub fn diagonal(&self) -> f64 {
        self.size.norm()
    }

    /// Scales the rectangle so that it fits a square of `max_edge`, keeping
    /// the aspect ratio.
    ///
    /// The factor is `min(max_edge / width, max_edge / height)` and applies
    /// to the origin as well as the size. A rectangle with a zero-length
    /// edge scales by the other edge only; an empty one is returned as is.
    pub fn scale_to(&self, max_edge: f64) -> Self {
        let fx = max_edge / self.width();
        let fy = max_edge / self.height();
        let factor = fx.min(fy);
        if !factor.is_finite() {
            return *self;
        }

        Self {
            origin: self.origin * factor,
            size: self.size * factor,
        }
    }
}

impl Default for Rect {
    fn default() -> Self {
        Self::new(0.0, 0.0, 0.0, 0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_point(actual: Point2, x: f64, y: f64) {
        assert!(
            (actual.x - x).abs() < 1e-9 && (actual.y - y).abs() < 1e-9,
            "expected ({x}, {y}), got ({}, {})",
            actual.x,
            actual.y
        );
    }

    #[test]
    fn edge_midpoints() {
        let r = Rect::new(10.0, 20.0, 100.0, 50.0);
        assert_point(r.center(), 60.0, 45.0);
        assert_point(r.left(), 10.0, 45.0);
        assert_point(r.right(), 110.0, 45.0);
        assert_point(r.top(), 60.0, 70.0);
        assert_point(r.bottom(), 60.0, 20.0);
    }

    #[test]
    fn corners_follow_upward_y() {
        let r = Rect::new(10.0, 20.0, 100.0, 50.0);
        assert_point(r.top_left(), 10.0, 70.0);
        assert_point(r.top_right(), 110.0, 70.0);
        assert_point(r.bottom_left(), 10.0, 20.0);
        assert_point(r.bottom_right(), 110.0, 20.0);
    }

    #[test]
    fn negative_size_is_normalized() {
        let r = Rect::new(100.0, 100.0, -40.0, -10.0);
        assert_eq!(r.min_x(), 60.0);
        assert_eq!(r.max_x(), 100.0);
        assert_eq!(r.min_y(), 90.0);
        assert_eq!(r.max_y(), 100.0);
        assert_point(r.center(), 80.0, 95.0);
        assert_eq!(r.shorter_edge(), 10.0);
    }

    #[test]
    fn edge_lengths() {
        let r = Rect::new(0.0, 0.0, 3.0, 4.0);
        assert_eq!(r.shorter_edge(), 3.0);
        assert_eq!(r.longer_edge(), 4.0);
        assert!((r.diagonal() - 5.0).abs() < 1e-12);
    }

    #[test]
    fn scale_to_fits_longer_edge() {
        let r = Rect::new(10.0, 5.0, 200.0, 100.0).scale_to(50.0);
        assert_eq!(r, Rect::new(2.5, 1.25, 50.0, 25.0));
        assert_eq!(r.longer_edge(), 50.0);
    }

    #[test]
    fn scale_to_can_enlarge() {
        let r = Rect::new(0.0, 0.0, 10.0, 40.0).scale_to(80.0);
        assert_eq!(r.size, Vector2::new(20.0, 80.0));
    }

    #[test]
    fn scale_to_on_empty_rect_is_identity() {
        let r = Rect::default();
        assert_eq!(r.scale_to(10.0), r);
    }
}
