//! Bounding boxes over polygons, Bezier chains and paths.

use super::Point;
use super::arc::arc_box;
use super::path::{PathError, PathOp, Segment, Segments};

/// Inclusive pixel box.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoundingBox {
    pub xmin: i32,
    pub xmax: i32,
    pub ymin: i32,
    pub ymax: i32,
}

impl BoundingBox {
    pub fn from_point(p: Point) -> Self {
        Self {
            xmin: p.x,
            xmax: p.x,
            ymin: p.y,
            ymax: p.y,
        }
    }

    /// Box spanned by two opposite corners, in any order.
    pub fn from_corners(a: Point, b: Point) -> Self {
        let mut bbox = Self::from_point(a);
        bbox.include(b);
        bbox
    }

    pub fn include(&mut self, p: Point) {
        self.xmin = self.xmin.min(p.x);
        self.xmax = self.xmax.max(p.x);
        self.ymin = self.ymin.min(p.y);
        self.ymax = self.ymax.max(p.y);
    }

    pub fn union(&mut self, other: &BoundingBox) {
        self.include(other.min());
        self.include(other.max());
    }

    pub fn min(&self) -> Point {
        Point::new(self.xmin, self.ymin)
    }

    pub fn max(&self) -> Point {
        Point::new(self.xmax, self.ymax)
    }

    /// Width in pixels, both edges inclusive.
    pub fn width(&self) -> i32 {
        self.xmax - self.xmin + 1
    }

    /// Height in pixels, both edges inclusive.
    pub fn height(&self) -> i32 {
        self.ymax - self.ymin + 1
    }
}

/// How the point list passed to [`path_bounding_box`] is interpreted.
#[derive(Debug, Clone, Copy)]
pub enum BoxMode<'a> {
    /// Points are the buffer of a path with these opcodes
    Path(&'a [PathOp]),
    /// Every point is a vertex
    Polygon,
    /// A start point followed by groups of (control, control, end)
    Bezier,
}

/// Bounding box over `points`.
///
/// The first point always seeds the box. In path mode an arc adds the corners
/// of its own box, and curves add their control points, which gives a cheap
/// conservative box rather than the tight curve extent.
pub fn path_bounding_box(points: &[Point], mode: BoxMode<'_>) -> Result<BoundingBox, PathError> {
    let first = points.first().ok_or(PathError::Empty)?;
    let mut bbox = BoundingBox::from_point(*first);

    match mode {
        BoxMode::Path(ops) => {
            for segment in Segments::new(ops, points) {
                match segment? {
                    Segment::MoveTo(p) | Segment::LineTo(p) => bbox.include(p),
                    Segment::ArcTo(arc) => bbox.union(&arc_box(&arc)),
                    Segment::CurveTo(pts) => pts.iter().for_each(|p| bbox.include(*p)),
                    _ => {},
                }
            }
        },
        BoxMode::Polygon => points.iter().for_each(|p| bbox.include(*p)),
        BoxMode::Bezier => {
            if (points.len() - 1) % 3 != 0 {
                return Err(PathError::IncompleteBezier {
                    count: points.len(),
                });
            }
            points[1..].iter().for_each(|p| bbox.include(*p));
        },
    }

    Ok(bbox)
}
