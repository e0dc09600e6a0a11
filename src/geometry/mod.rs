//! Pixel-space geometry used by the shape writers.
//!
//! Everything here is pure: no markup, no scaling. Coordinates are device
//! pixels, angles are degrees measured counter-clockwise from the positive
//! x axis.

pub mod arc;
pub mod bbox;
pub mod dash;
pub mod path;

pub use arc::{EllipticArc, arc_box, arc_endpoints, normalize_angles, point_angles};
pub use bbox::{BoundingBox, BoxMode, path_bounding_box};
pub use dash::{DashStop, normalize_dashes};
pub use path::{Path, PathError, PathOp, Segment, Segments};

/// A point in device pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    #[inline]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Translate into a coordinate system whose origin is `origin`.
    #[inline]
    pub const fn relative_to(self, origin: Point) -> Self {
        Self {
            x: self.x - origin.x,
            y: self.y - origin.y,
        }
    }
}

impl From<(i32, i32)> for Point {
    fn from((x, y): (i32, i32)) -> Self {
        Self { x, y }
    }
}
