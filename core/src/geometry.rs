//! Plain geometric value types shared by every simulation component.

use std::ops::{Add, Mul, Neg, Sub};

use serde::{Deserialize, Serialize};

/// Two-dimensional point or displacement expressed in world units.
///
/// Every operation returns a new value; nothing mutates in place.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Vector2 {
    /// Horizontal component.
    pub x: f32,
    /// Vertical component, growing downwards in screen space.
    pub y: f32,
}

impl Vector2 {
    /// Vector with both components set to zero.
    pub const ZERO: Self = Self::new(0.0, 0.0);

    /// Creates a vector from its components.
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Creates a vector pointing along `angle` (radians) with the given length.
    #[must_use]
    pub fn from_angle(angle: f32, magnitude: f32) -> Self {
        Self::new(angle.cos() * magnitude, angle.sin() * magnitude)
    }

    /// Euclidean distance between two points.
    #[must_use]
    pub fn distance(self, other: Self) -> f32 {
        (self - other).magnitude()
    }

    /// Length of the vector.
    #[must_use]
    pub fn magnitude(self) -> f32 {
        self.x.hypot(self.y)
    }

    /// Unit vector with the same heading, or [`Vector2::ZERO`] for a zero-length input.
    #[must_use]
    pub fn normalize(self) -> Self {
        let magnitude = self.magnitude();
        if magnitude == 0.0 || !magnitude.is_finite() {
            return Self::ZERO;
        }
        Self::new(self.x / magnitude, self.y / magnitude)
    }

    /// Heading of the vector in radians, measured from the positive x axis.
    #[must_use]
    pub fn angle(self) -> f32 {
        self.y.atan2(self.x)
    }

    /// Heading from `self` towards `other` in radians.
    #[must_use]
    pub fn angle_to(self, other: Self) -> f32 {
        (other - self).angle()
    }

    /// Reports whether both components are finite numbers.
    #[must_use]
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl Add for Vector2 {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Vector2 {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f32> for Vector2 {
    type Output = Self;

    fn mul(self, scalar: f32) -> Self {
        Self::new(self.x * scalar, self.y * scalar)
    }
}

impl Neg for Vector2 {
    type Output = Self;

    fn neg(self) -> Self {
        Self::new(-self.x, -self.y)
    }
}

/// Axis-aligned rectangle anchored at its upper-left corner.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    /// Left edge.
    pub x: f32,
    /// Top edge.
    pub y: f32,
    /// Horizontal extent.
    pub width: f32,
    /// Vertical extent.
    pub height: f32,
}

impl Rect {
    /// Creates a rectangle from its origin and size.
    #[must_use]
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Reports whether the point lies inside the rectangle, edges included.
    #[must_use]
    pub fn contains(&self, point: Vector2) -> bool {
        point.x >= self.x
            && point.x <= self.x + self.width
            && point.y >= self.y
            && point.y <= self.y + self.height
    }

    /// Reports whether the rectangles overlap or touch.
    #[must_use]
    pub fn intersects(&self, other: &Rect) -> bool {
        !(self.x + self.width < other.x
            || self.x > other.x + other.width
            || self.y + self.height < other.y
            || self.y > other.y + other.height)
    }

    /// Distance from the point to the closest edge, zero when inside.
    #[must_use]
    pub fn distance_to_point(&self, point: Vector2) -> f32 {
        let dx = (self.x - point.x).max(0.0).max(point.x - (self.x + self.width));
        let dy = (self.y - point.y).max(0.0).max(point.y - (self.y + self.height));
        dx.hypot(dy)
    }

    /// Centre point of the rectangle.
    #[must_use]
    pub fn center(&self) -> Vector2 {
        Vector2::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }
}

/// Circle used for proximity checks.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Circle {
    /// Centre of the circle.
    pub center: Vector2,
    /// Radius in world units.
    pub radius: f32,
}

impl Circle {
    /// Creates a circle from its centre and radius.
    #[must_use]
    pub const fn new(center: Vector2, radius: f32) -> Self {
        Self { center, radius }
    }

    /// Reports whether the point lies inside the circle, boundary included.
    #[must_use]
    pub fn contains(&self, point: Vector2) -> bool {
        let dx = point.x - self.center.x;
        let dy = point.y - self.center.y;
        dx * dx + dy * dy <= self.radius * self.radius
    }

    /// Reports whether two circles overlap.
    ///
    /// Touching circles do not count; the centres must be strictly closer than
    /// the sum of the radii.
    #[must_use]
    pub fn intersects(&self, other: &Circle) -> bool {
        self.center.distance(other.center) < self.radius + other.radius
    }

    /// Signed distance from the boundary, negative inside.
    #[must_use]
    pub fn distance_to_point(&self, point: Vector2) -> f32 {
        self.center.distance(point) - self.radius
    }
}

#[cfg(test)]
mod tests {
    use super::{Circle, Rect, Vector2};

    #[test]
    fn normalize_of_zero_vector_is_zero() {
        assert_eq!(Vector2::ZERO.normalize(), Vector2::ZERO);
    }

    #[test]
    fn normalize_produces_unit_length() {
        let unit = Vector2::new(3.0, 4.0).normalize();
        assert!((unit.magnitude() - 1.0).abs() < 1e-6);
        assert!((unit.x - 0.6).abs() < 1e-6);
    }

    #[test]
    fn arithmetic_returns_new_values() {
        let a = Vector2::new(1.0, 2.0);
        let b = Vector2::new(3.0, -1.0);
        assert_eq!(a + b, Vector2::new(4.0, 1.0));
        assert_eq!(a - b, Vector2::new(-2.0, 3.0));
        assert_eq!(a * 2.0, Vector2::new(2.0, 4.0));
        assert_eq!(a, Vector2::new(1.0, 2.0));
    }

    #[test]
    fn angle_to_points_along_positive_y() {
        let angle = Vector2::ZERO.angle_to(Vector2::new(0.0, 5.0));
        assert!((angle - std::f32::consts::FRAC_PI_2).abs() < 1e-6);
    }

    #[test]
    fn rect_distance_is_zero_inside() {
        let rect = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert_eq!(rect.distance_to_point(Vector2::new(5.0, 5.0)), 0.0);
        assert!((rect.distance_to_point(Vector2::new(13.0, 14.0)) - 5.0).abs() < 1e-6);
        assert!(rect.contains(Vector2::new(10.0, 10.0)));
        assert_eq!(rect.center(), Vector2::new(5.0, 5.0));
    }

    #[test]
    fn rect_intersection_includes_touching_edges() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert!(a.intersects(&Rect::new(10.0, 0.0, 5.0, 5.0)));
        assert!(!a.intersects(&Rect::new(10.5, 0.0, 5.0, 5.0)));
    }

    #[test]
    fn circles_must_overlap_strictly() {
        let a = Circle::new(Vector2::ZERO, 8.0);
        assert!(a.intersects(&Circle::new(Vector2::new(11.9, 0.0), 4.0)));
        assert!(!a.intersects(&Circle::new(Vector2::new(12.1, 0.0), 4.0)));
        assert!(a.contains(Vector2::new(8.0, 0.0)));
        assert!((a.distance_to_point(Vector2::new(2.0, 0.0)) + 6.0).abs() < 1e-6);
    }
}
