//! Geometric primitives for diagram layout.
//!
//! - [`Point`] - A 2D coordinate in diagram space
//! - [`Size`] - Width and height dimensions
//! - [`Bounds`] - An axis-aligned rectangle given by its minimum and maximum corners
//! - [`Insets`] - Spacing values for the four sides of a rectangle
//!
//! # Coordinate System
//!
//! Cadence uses the SVG coordinate system:
//!
//! ```text
//!   (0,0) ────────► +X
//!     │
//!     │
//!     ▼
//!    +Y
//! ```
//!
//! Angles used by [`Point::on_circle`] are measured in radians from the +X
//! axis, so `-FRAC_PI_2` points straight up.

use serde::Serialize;

/// A 2D point in diagram coordinate space.
///
/// # Examples
///
/// ```
/// # use cadence_core::geometry::Point;
/// let a = Point::new(10.0, 20.0);
/// let b = Point::new(30.0, 40.0);
///
/// let mid = a.midpoint(b);
/// assert_eq!(mid, Point::new(20.0, 30.0));
/// assert_eq!(b.sub_point(a), Point::new(20.0, 20.0));
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Point {
    x: f32,
    y: f32,
}

impl Point {
    /// Creates a new point with the specified coordinates
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Returns the x-coordinate of the point
    pub fn x(self) -> f32 {
        self.x
    }

    /// Returns the y-coordinate of the point
    pub fn y(self) -> f32 {
        self.y
    }

    /// Places a point on a circle around `center`.
    ///
    /// # Examples
    ///
    /// ```
    /// # use cadence_core::geometry::Point;
    /// let top = Point::on_circle(Point::new(100.0, 100.0), 50.0, -std::f32::consts::FRAC_PI_2);
    /// assert!((top.x() - 100.0).abs() < 1e-4);
    /// assert!((top.y() - 50.0).abs() < 1e-4);
    /// ```
    pub fn on_circle(center: Point, radius: f32, angle: f32) -> Self {
        Self {
            x: center.x + radius * angle.cos(),
            y: center.y + radius * angle.sin(),
        }
    }

    pub fn add_point(self, other: Point) -> Self {
        Self {
            x: self.x + other.x,
            y: self.y + other.y,
        }
    }

    pub fn sub_point(self, other: Point) -> Self {
        Self {
            x: self.x - other.x,
            y: self.y - other.y,
        }
    }

    /// Calculates the midpoint between this point and another point
    pub fn midpoint(self, other: Point) -> Self {
        Self {
            x: (self.x + other.x) / 2.0,
            y: (self.y + other.y) / 2.0,
        }
    }

    /// Euclidean distance to another point
    pub fn distance(self, other: Point) -> f32 {
        (other.x - self.x).hypot(other.y - self.y)
    }

    /// Swaps the two coordinates.
    ///
    /// Layered layouts compute positions along a main axis and a cross axis;
    /// transposing maps a left-to-right placement onto a top-to-bottom one.
    pub fn transpose(self) -> Self {
        Self {
            x: self.y,
            y: self.x,
        }
    }

    /// Converts a center point and a size into bounds
    pub fn to_bounds(self, size: Size) -> Bounds {
        Bounds::new_from_center(self, size)
    }
}

/// Width and height of an element
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Size {
    width: f32,
    height: f32,
}

impl Size {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn width(self) -> f32 {
        self.width
    }

    pub fn height(self) -> f32 {
        self.height
    }

    /// Component-wise maximum of two sizes
    pub fn max(self, other: Size) -> Self {
        Self {
            width: self.width.max(other.width),
            height: self.height.max(other.height),
        }
    }

    /// Grows the size by the given insets on all sides
    pub fn add_padding(self, insets: Insets) -> Self {
        Self {
            width: self.width + insets.horizontal_sum(),
            height: self.height + insets.vertical_sum(),
        }
    }

    /// Swaps width and height
    pub fn transpose(self) -> Self {
        Self {
            width: self.height,
            height: self.width,
        }
    }
}

/// Axis-aligned rectangle with minimum and maximum coordinates
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Bounds {
    min_x: f32,
    min_y: f32,
    max_x: f32,
    max_y: f32,
}

impl Bounds {
    /// Creates bounds centered on `center`
    pub fn new_from_center(center: Point, size: Size) -> Self {
        let half_width = size.width / 2.0;
        let half_height = size.height / 2.0;
        Self {
            min_x: center.x - half_width,
            min_y: center.y - half_height,
            max_x: center.x + half_width,
            max_y: center.y + half_height,
        }
    }

    /// Creates bounds whose minimum corner is `top_left`
    pub fn new_from_top_left(top_left: Point, size: Size) -> Self {
        Self {
            min_x: top_left.x,
            min_y: top_left.y,
            max_x: top_left.x + size.width,
            max_y: top_left.y + size.height,
        }
    }

    pub fn min_x(self) -> f32 {
        self.min_x
    }

    pub fn min_y(self) -> f32 {
        self.min_y
    }

    pub fn max_x(self) -> f32 {
        self.max_x
    }

    pub fn max_y(self) -> f32 {
        self.max_y
    }

    pub fn width(self) -> f32 {
        self.max_x - self.min_x
    }

    pub fn height(self) -> f32 {
        self.max_y - self.min_y
    }

    pub fn center(self) -> Point {
        Point::new(
            (self.min_x + self.max_x) / 2.0,
            (self.min_y + self.max_y) / 2.0,
        )
    }

    /// Returns the top-left corner
    pub fn min_point(self) -> Point {
        Point::new(self.min_x, self.min_y)
    }

    /// Smallest bounds containing both rectangles.
    ///
    /// # Examples
    ///
    /// ```
    /// # use cadence_core::geometry::{Bounds, Point, Size};
    /// let a = Bounds::new_from_top_left(Point::new(0.0, 0.0), Size::new(10.0, 10.0));
    /// let b = Bounds::new_from_top_left(Point::new(20.0, 5.0), Size::new(10.0, 10.0));
    ///
    /// let merged = a.merge(&b);
    /// assert_eq!(merged.width(), 30.0);
    /// assert_eq!(merged.height(), 15.0);
    /// ```
    pub fn merge(&self, other: &Self) -> Self {
        Self {
            min_x: self.min_x.min(other.min_x),
            min_y: self.min_y.min(other.min_y),
            max_x: self.max_x.max(other.max_x),
            max_y: self.max_y.max(other.max_y),
        }
    }

    /// Expands the bounds outward by the given insets
    pub fn add_padding(&self, insets: Insets) -> Self {
        Self {
            min_x: self.min_x - insets.left,
            min_y: self.min_y - insets.top,
            max_x: self.max_x + insets.right,
            max_y: self.max_y + insets.bottom,
        }
    }

    /// Returns true if `point` lies inside or on the border of the bounds
    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.min_x
            && point.x <= self.max_x
            && point.y >= self.min_y
            && point.y <= self.max_y
    }

    /// Returns true if `other` lies entirely within these bounds
    pub fn contains_bounds(&self, other: &Bounds) -> bool {
        self.contains(other.min_point()) && self.contains(Point::new(other.max_x, other.max_y))
    }

    /// Point where the ray from the center toward `toward` leaves the rectangle.
    ///
    /// Returns the center itself when `toward` coincides with it.
    pub fn clip_toward(&self, toward: Point) -> Point {
        let center = self.center();
        let dx = toward.x - center.x;
        let dy = toward.y - center.y;

        if dx.abs() < f32::EPSILON && dy.abs() < f32::EPSILON {
            return center;
        }

        let scale_x = if dx.abs() > f32::EPSILON {
            (self.width() / 2.0) / dx.abs()
        } else {
            f32::INFINITY
        };
        let scale_y = if dy.abs() > f32::EPSILON {
            (self.height() / 2.0) / dy.abs()
        } else {
            f32::INFINITY
        };
        let scale = scale_x.min(scale_y).min(1.0);

        Point::new(center.x + dx * scale, center.y + dy * scale)
    }
}

/// Spacing around an element with a value per side
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Insets {
    top: f32,
    right: f32,
    bottom: f32,
    left: f32,
}

impl Insets {
    pub fn new(top: f32, right: f32, bottom: f32, left: f32) -> Self {
        Self {
            top,
            right,
            bottom,
            left,
        }
    }

    /// Creates uniform insets with the same value for all sides
    pub fn uniform(value: f32) -> Self {
        Self::new(value, value, value, value)
    }

    pub fn top(self) -> f32 {
        self.top
    }

    pub fn right(self) -> f32 {
        self.right
    }

    pub fn bottom(self) -> f32 {
        self.bottom
    }

    pub fn left(self) -> f32 {
        self.left
    }

    pub fn horizontal_sum(self) -> f32 {
        self.left + self.right
    }

    pub fn vertical_sum(self) -> f32 {
        self.top + self.bottom
    }
}

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;

    use super::*;

    #[test]
    fn test_point_transpose() {
        let p = Point::new(3.0, 7.0).transpose();
        assert_eq!(p, Point::new(7.0, 3.0));
    }

    #[test]
    fn test_point_distance() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(3.0, 4.0);
        assert_approx_eq!(f32, a.distance(b), 5.0);
        assert_approx_eq!(f32, b.distance(a), 5.0);
    }

    #[test]
    fn test_point_on_circle_quadrants() {
        let center = Point::new(10.0, 10.0);

        let right = Point::on_circle(center, 5.0, 0.0);
        assert_approx_eq!(f32, right.x(), 15.0, epsilon = 1e-4);
        assert_approx_eq!(f32, right.y(), 10.0, epsilon = 1e-4);

        let down = Point::on_circle(center, 5.0, std::f32::consts::FRAC_PI_2);
        assert_approx_eq!(f32, down.x(), 10.0, epsilon = 1e-4);
        assert_approx_eq!(f32, down.y(), 15.0, epsilon = 1e-4);
    }

    #[test]
    fn test_bounds_from_center() {
        let bounds = Point::new(50.0, 60.0).to_bounds(Size::new(20.0, 30.0));

        assert_eq!(bounds.min_x(), 40.0);
        assert_eq!(bounds.min_y(), 45.0);
        assert_eq!(bounds.max_x(), 60.0);
        assert_eq!(bounds.max_y(), 75.0);
        assert_eq!(bounds.center(), Point::new(50.0, 60.0));
        assert_eq!((bounds.width(), bounds.height()), (20.0, 30.0));
    }

    #[test]
    fn test_bounds_add_padding() {
        let bounds = Bounds::new_from_top_left(Point::new(10.0, 10.0), Size::new(10.0, 10.0))
            .add_padding(Insets::uniform(5.0));

        assert_eq!(bounds.min_point(), Point::new(5.0, 5.0));
        assert_eq!(bounds.width(), 20.0);
        assert_eq!(bounds.height(), 20.0);
    }

    #[test]
    fn test_bounds_contains_bounds() {
        let outer = Bounds::new_from_top_left(Point::new(0.0, 0.0), Size::new(100.0, 100.0));
        let inner = Bounds::new_from_top_left(Point::new(10.0, 10.0), Size::new(20.0, 20.0));
        let straddling = Bounds::new_from_top_left(Point::new(90.0, 90.0), Size::new(20.0, 20.0));

        assert!(outer.contains_bounds(&inner));
        assert!(!outer.contains_bounds(&straddling));
        assert!(!inner.contains_bounds(&outer));
    }

    #[test]
    fn test_clip_toward_hits_border() {
        let bounds = Point::new(0.0, 0.0).to_bounds(Size::new(40.0, 20.0));

        let right = bounds.clip_toward(Point::new(100.0, 0.0));
        assert_approx_eq!(f32, right.x(), 20.0);
        assert_approx_eq!(f32, right.y(), 0.0);

        let below = bounds.clip_toward(Point::new(0.0, 100.0));
        assert_approx_eq!(f32, below.x(), 0.0);
        assert_approx_eq!(f32, below.y(), 10.0);
    }

    #[test]
    fn test_clip_toward_center_is_center() {
        let bounds = Point::new(5.0, 5.0).to_bounds(Size::new(10.0, 10.0));
        assert_eq!(bounds.clip_toward(Point::new(5.0, 5.0)), Point::new(5.0, 5.0));
    }

    #[test]
    fn test_size_padding_and_transpose() {
        let size = Size::new(10.0, 20.0).add_padding(Insets::new(1.0, 2.0, 3.0, 4.0));
        assert_eq!(size, Size::new(16.0, 24.0));
        assert_eq!(size.transpose(), Size::new(24.0, 16.0));
    }
}

#[cfg(test)]
mod proptest_tests {
    use float_cmp::approx_eq;
    use proptest::prelude::*;

    use super::*;

    fn bounds_strategy() -> impl Strategy<Value = Bounds> {
        (
            -1000.0f32..1000.0,
            -1000.0f32..1000.0,
            1.0f32..500.0,
            1.0f32..500.0,
        )
            .prop_map(|(x, y, w, h)| Bounds::new_from_top_left(Point::new(x, y), Size::new(w, h)))
    }

    fn point_strategy() -> impl Strategy<Value = Point> {
        (-1000.0f32..1000.0, -1000.0f32..1000.0).prop_map(|(x, y)| Point::new(x, y))
    }

    /// Merged bounds must contain both inputs.
    fn check_merge_contains_both(b1: Bounds, b2: Bounds) -> Result<(), TestCaseError> {
        let merged = b1.merge(&b2);
        prop_assert!(merged.contains_bounds(&b1));
        prop_assert!(merged.contains_bounds(&b2));
        Ok(())
    }

    /// A clipped anchor always lies on or inside the rectangle.
    fn check_clip_stays_inside(bounds: Bounds, toward: Point) -> Result<(), TestCaseError> {
        let clipped = bounds.clip_toward(toward);
        let tolerance = bounds.add_padding(Insets::uniform(0.01));
        prop_assert!(tolerance.contains(clipped));
        Ok(())
    }

    /// Transposing twice is the identity.
    fn check_transpose_involution(p: Point) -> Result<(), TestCaseError> {
        let back = p.transpose().transpose();
        prop_assert!(approx_eq!(f32, back.x(), p.x()));
        prop_assert!(approx_eq!(f32, back.y(), p.y()));
        Ok(())
    }

    proptest! {
        #[test]
        fn merge_contains_both(b1 in bounds_strategy(), b2 in bounds_strategy()) {
            check_merge_contains_both(b1, b2)?;
        }

        #[test]
        fn clip_stays_inside(bounds in bounds_strategy(), toward in point_strategy()) {
            check_clip_stays_inside(bounds, toward)?;
        }

        #[test]
        fn transpose_involution(p in point_strategy()) {
            check_transpose_involution(p)?;
        }
    }
}
