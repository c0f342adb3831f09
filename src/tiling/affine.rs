use serde::{Deserialize, Serialize};
use std::ops::{Add, Div, Mul, Sub};

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn distance(&self, other: Point) -> f32 {
        (*self - other).length()
    }

    pub fn length(&self) -> f32 {
        self.x.hypot(self.y)
    }

    /// Angle of the vector against +x, in radians.
    pub fn angle(&self) -> f32 {
        self.y.atan2(self.x)
    }
}

impl Add for Point {
    type Output = Point;
    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point {
    type Output = Point;
    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f32> for Point {
    type Output = Point;
    fn mul(self, k: f32) -> Point {
        Point::new(self.x * k, self.y * k)
    }
}

impl Div<f32> for Point {
    type Output = Point;
    fn div(self, k: f32) -> Point {
        Point::new(self.x / k, self.y / k)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    pub fn centre(&self) -> Point {
        Point::new(self.x + self.w / 2.0, self.y + self.h / 2.0)
    }

    pub fn corners(&self) -> [Point; 4] {
        [
            Point::new(self.x, self.y),
            Point::new(self.x + self.w, self.y),
            Point::new(self.x + self.w, self.y + self.h),
            Point::new(self.x, self.y + self.h),
        ]
    }

    /// Shrinks every side by `margin`.
    pub fn reduced(&self, margin: f32) -> Rect {
        Rect::new(
            self.x + margin,
            self.y + margin,
            self.w - 2.0 * margin,
            self.h - 2.0 * margin,
        )
    }

    /// Smallest axis-aligned rect holding every point.
    pub fn enclosing(points: &[Point]) -> Rect {
        let Some(first) = points.first() else {
            return Rect::default();
        };
        let (mut min, mut max) = (*first, *first);
        for p in &points[1..] {
            min = Point::new(min.x.min(p.x), min.y.min(p.y));
            max = Point::new(max.x.max(p.x), max.y.max(p.y));
        }
        Rect::new(min.x, min.y, max.x - min.x, max.y - min.y)
    }

    pub fn contains(&self, other: &Rect, tolerance: f32) -> bool {
        other.x >= self.x - tolerance
            && other.y >= self.y - tolerance
            && other.x + other.w <= self.x + self.w + tolerance
            && other.y + other.h <= self.y + self.h + tolerance
    }
}

/// 2D affine map: `x' = a*x + b*y + c`, `y' = d*x + e*y + f`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AffineTransform {
    pub a: f32,
    pub b: f32,
    pub c: f32,
    pub d: f32,
    pub e: f32,
    pub f: f32,
}

impl Default for AffineTransform {
    fn default() -> Self {
        Self::identity()
    }
}

impl AffineTransform {
    pub const fn identity() -> Self {
        Self {
            a: 1.0,
            b: 0.0,
            c: 0.0,
            d: 0.0,
            e: 1.0,
            f: 0.0,
        }
    }

    pub fn translation(dx: f32, dy: f32) -> Self {
        Self {
            c: dx,
            f: dy,
            ..Self::identity()
        }
    }

    /// Rotation by `angle` radians about `pivot`.
    pub fn rotation(angle: f32, pivot: Point) -> Self {
        let (sin, cos) = angle.sin_cos();
        Self {
            a: cos,
            b: -sin,
            c: pivot.x - cos * pivot.x + sin * pivot.y,
            d: sin,
            e: cos,
            f: pivot.y - sin * pivot.x - cos * pivot.y,
        }
    }

    /// Uniform scale by `factor` about `pivot`.
    pub fn scale(factor: f32, pivot: Point) -> Self {
        Self {
            a: factor,
            b: 0.0,
            c: pivot.x * (1.0 - factor),
            d: 0.0,
            e: factor,
            f: pivot.y * (1.0 - factor),
        }
    }

    /// `self` first, then `next`.
    pub fn followed_by(&self, next: &AffineTransform) -> AffineTransform {
        AffineTransform {
            a: next.a * self.a + next.b * self.d,
            b: next.a * self.b + next.b * self.e,
            c: next.a * self.c + next.b * self.f + next.c,
            d: next.d * self.a + next.e * self.d,
            e: next.d * self.b + next.e * self.e,
            f: next.d * self.c + next.e * self.f + next.f,
        }
    }

    #[inline(always)]
    pub fn apply(&self, p: Point) -> Point {
        Point::new(
            self.a * p.x + self.b * p.y + self.c,
            self.d * p.x + self.e * p.y + self.f,
        )
    }

    /// Axis-aligned bounds of `rect` after transformation.
    pub fn bounding_box(&self, rect: &Rect) -> Rect {
        Rect::enclosing(&rect.corners().map(|p| self.apply(p)))
    }
}
