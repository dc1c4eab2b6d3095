//! # Geometry
//!
//! Points, rectangles and a 2D affine matrix, independent of any DOM.
//!
//! The matrix is the 2×3 affine form used by CSS transforms
//! (`matrix(a, b, c, d, e, f)`): a point maps as
//! `x' = a·x + c·y + e`, `y' = b·x + d·y + f`. The drag controller relies on
//! [`Matrix::invert`] to translate pointer coordinates captured in client
//! space back into an element's local, pre-transform coordinate space.
//!
//! Rotation is about the origin — for scene nodes that means the element's
//! top-left corner, which is the reference behavior this engine preserves.

use serde::{Deserialize, Serialize};

/// Determinants smaller than this are treated as non-invertible.
const DET_EPSILON: f64 = 1e-12;

/// A point or vector in pixel space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Squared Euclidean distance to `other`.
    pub fn distance_sq(self, other: Point) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx * dx + dy * dy
    }
}

/// An axis-aligned rectangle in pixel space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, w: f64, h: f64) -> Self {
        Self { x, y, w, h }
    }

    pub fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn center(&self) -> Point {
        Point::new(self.x + self.w / 2.0, self.y + self.h / 2.0)
    }

    pub fn right(&self) -> f64 {
        self.x + self.w
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.h
    }

    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.x && p.x <= self.right() && p.y >= self.y && p.y <= self.bottom()
    }

    /// The rectangle shrunk by `amount` on every side.
    pub fn inset(&self, amount: f64) -> Rect {
        Rect::new(
            self.x + amount,
            self.y + amount,
            self.w - amount * 2.0,
            self.h - amount * 2.0,
        )
    }

    /// Uniformly scaled about the origin of the coordinate system.
    pub fn scaled(&self, s: f64) -> Rect {
        Rect::new(self.x * s, self.y * s, self.w * s, self.h * s)
    }
}

/// The host viewport dimensions in client pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// A 2×3 affine transform matrix in CSS `matrix(a, b, c, d, e, f)` layout.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Matrix {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
    pub e: f64,
    pub f: f64,
}

impl Default for Matrix {
    fn default() -> Self {
        Self::identity()
    }
}

impl Matrix {
    pub fn identity() -> Self {
        Self {
            a: 1.0,
            b: 0.0,
            c: 0.0,
            d: 1.0,
            e: 0.0,
            f: 0.0,
        }
    }

    pub fn translate(tx: f64, ty: f64) -> Self {
        Self {
            e: tx,
            f: ty,
            ..Self::identity()
        }
    }

    pub fn scale(s: f64) -> Self {
        Self {
            a: s,
            d: s,
            ..Self::identity()
        }
    }

    /// Rotation by `deg` degrees, counter-clockwise negative in screen
    /// coordinates, about the origin (an element's top-left corner).
    pub fn rotate_deg(deg: f64) -> Self {
        let rad = deg.to_radians();
        let (sin, cos) = rad.sin_cos();
        Self {
            a: cos,
            b: sin,
            c: -sin,
            d: cos,
            e: 0.0,
            f: 0.0,
        }
    }

    /// `self · other`: the resulting matrix applies `other` first, then
    /// `self` — matching `DOMMatrix.multiply`.
    pub fn multiply(&self, other: &Matrix) -> Matrix {
        Matrix {
            a: self.a * other.a + self.c * other.b,
            b: self.b * other.a + self.d * other.b,
            c: self.a * other.c + self.c * other.d,
            d: self.b * other.c + self.d * other.d,
            e: self.a * other.e + self.c * other.f + self.e,
            f: self.b * other.e + self.d * other.f + self.f,
        }
    }

    pub fn determinant(&self) -> f64 {
        self.a * self.d - self.b * self.c
    }

    /// The inverse transform, or `None` for a degenerate matrix.
    pub fn invert(&self) -> Option<Matrix> {
        let det = self.determinant();
        if det.abs() < DET_EPSILON {
            return None;
        }
        Some(Matrix {
            a: self.d / det,
            b: -self.b / det,
            c: -self.c / det,
            d: self.a / det,
            e: (self.c * self.f - self.d * self.e) / det,
            f: (self.b * self.e - self.a * self.f) / det,
        })
    }

    pub fn transform_point(&self, p: Point) -> Point {
        Point::new(
            self.a * p.x + self.c * p.y + self.e,
            self.b * p.x + self.d * p.y + self.f,
        )
    }

    /// True when this matrix does nothing.
    pub fn is_identity(&self) -> bool {
        *self == Self::identity()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: Point, b: Point) -> bool {
        (a.x - b.x).abs() < 1e-9 && (a.y - b.y).abs() < 1e-9
    }

    #[test]
    fn identity_transform() {
        let p = Point::new(3.0, -4.0);
        assert_eq!(Matrix::identity().transform_point(p), p);
    }

    #[test]
    fn translate_then_scale_order() {
        // multiply applies the right-hand matrix first.
        let m = Matrix::scale(2.0).multiply(&Matrix::translate(10.0, 0.0));
        assert!(approx(m.transform_point(Point::new(1.0, 1.0)), Point::new(22.0, 2.0)));

        let m = Matrix::translate(10.0, 0.0).multiply(&Matrix::scale(2.0));
        assert!(approx(m.transform_point(Point::new(1.0, 1.0)), Point::new(12.0, 2.0)));
    }

    #[test]
    fn rotation_quarter_turn() {
        let m = Matrix::rotate_deg(90.0);
        // Screen coordinates: +y is down, so (1,0) rotates to (0,1).
        assert!(approx(m.transform_point(Point::new(1.0, 0.0)), Point::new(0.0, 1.0)));
    }

    #[test]
    fn invert_round_trips() {
        let m = Matrix::rotate_deg(33.0)
            .multiply(&Matrix::scale(0.5))
            .multiply(&Matrix::translate(7.0, -3.0));
        let inv = m.invert().expect("invertible");
        let p = Point::new(12.5, 8.25);
        assert!(approx(inv.transform_point(m.transform_point(p)), p));
        assert!(m.multiply(&inv).is_identity() || {
            let id = m.multiply(&inv);
            (id.a - 1.0).abs() < 1e-9 && (id.d - 1.0).abs() < 1e-9 && id.e.abs() < 1e-9
        });
    }

    #[test]
    fn degenerate_matrix_has_no_inverse() {
        assert!(Matrix::scale(0.0).invert().is_none());
    }

    #[test]
    fn rect_helpers() {
        let r = Rect::new(10.0, 20.0, 100.0, 50.0);
        assert_eq!(r.center(), Point::new(60.0, 45.0));
        assert_eq!(r.right(), 110.0);
        assert_eq!(r.bottom(), 70.0);
        assert!(r.contains(Point::new(10.0, 20.0)));
        assert!(!r.contains(Point::new(9.9, 20.0)));
        assert_eq!(r.inset(5.0), Rect::new(15.0, 25.0, 90.0, 40.0));
        assert_eq!(r.scaled(0.5), Rect::new(5.0, 10.0, 50.0, 25.0));
    }
}
