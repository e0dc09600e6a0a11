//! Composite paths: an opcode list paired with a point buffer.
//!
//! Opcodes do not carry their operands. Each one consumes a fixed number of
//! points from the shared buffer, so the buffer has to be walked with a
//! cursor. [`Segments`] does that walk and turns every opcode into a typed
//! [`Segment`], reporting [`PathError::Overrun`] instead of reading past the
//! end of the buffer.

use super::Point;
use super::arc::EllipticArc;
use super::bbox::{BoundingBox, BoxMode, path_bounding_box};
use thiserror::Error;

/// Errors raised while walking a path or its points.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PathError {
    /// An opcode needs more points than the buffer has left
    #[error("{op:?} at opcode {index} needs {needed} points but only {available} remain")]
    Overrun {
        op: PathOp,
        index: usize,
        needed: usize,
        available: usize,
    },

    /// Arc with a zero width or height
    #[error("arc at opcode {index} has an empty ellipse box")]
    DegenerateArc { index: usize },

    /// Bezier point list that is not `1 + 3k` long
    #[error("bezier needs 1 + 3k points, got {count}")]
    IncompleteBezier { count: usize },

    /// No points at all
    #[error("point list is empty")]
    Empty,
}

/// Path opcodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathOp {
    NewSubpath,
    MoveTo,
    LineTo,
    /// Arc, encoded in three points: centre, `(width, height)` and
    /// `(angle1 * 1000, angle2 * 1000)`
    ArcTo,
    CurveTo,
    Close,
    Fill,
    Stroke,
    FillStroke,
    Clip,
}

impl PathOp {
    /// Number of buffer points this opcode consumes.
    pub const fn points(self) -> usize {
        match self {
            Self::MoveTo | Self::LineTo => 1,
            Self::ArcTo | Self::CurveTo => 3,
            _ => 0,
        }
    }
}

/// Decoded path segment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Segment {
    NewSubpath,
    MoveTo(Point),
    LineTo(Point),
    ArcTo(EllipticArc),
    /// Two control points and the end point
    CurveTo([Point; 3]),
    Close,
    Fill,
    Stroke,
    FillStroke,
    Clip,
}

/// A composite path as the canvas accumulates it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Path {
    ops: Vec<PathOp>,
    points: Vec<Point>,
}

impl Path {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a path from raw parts. The parts are not checked against each
    /// other; a short point buffer surfaces as an error while iterating.
    pub fn from_parts(ops: Vec<PathOp>, points: Vec<Point>) -> Self {
        Self { ops, points }
    }

    pub fn ops(&self) -> &[PathOp] {
        &self.ops
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    pub fn clear(&mut self) {
        self.ops.clear();
        self.points.clear();
    }

    pub fn new_subpath(&mut self) -> &mut Self {
        self.ops.push(PathOp::NewSubpath);
        self
    }

    pub fn move_to(&mut self, p: Point) -> &mut Self {
        self.ops.push(PathOp::MoveTo);
        self.points.push(p);
        self
    }

    pub fn line_to(&mut self, p: Point) -> &mut Self {
        self.ops.push(PathOp::LineTo);
        self.points.push(p);
        self
    }

    pub fn arc_to(&mut self, arc: &EllipticArc) -> &mut Self {
        self.ops.push(PathOp::ArcTo);
        self.points.push(arc.center);
        self.points.push(Point::new(arc.width, arc.height));
        self.points.push(Point::new(
            (arc.angle1 * 1000.0) as i32,
            (arc.angle2 * 1000.0) as i32,
        ));
        self
    }

    pub fn curve_to(&mut self, c1: Point, c2: Point, end: Point) -> &mut Self {
        self.ops.push(PathOp::CurveTo);
        self.points.extend([c1, c2, end]);
        self
    }

    pub fn close(&mut self) -> &mut Self {
        self.ops.push(PathOp::Close);
        self
    }

    pub fn fill(&mut self) -> &mut Self {
        self.ops.push(PathOp::Fill);
        self
    }

    pub fn stroke(&mut self) -> &mut Self {
        self.ops.push(PathOp::Stroke);
        self
    }

    pub fn fill_stroke(&mut self) -> &mut Self {
        self.ops.push(PathOp::FillStroke);
        self
    }

    pub fn clip(&mut self) -> &mut Self {
        self.ops.push(PathOp::Clip);
        self
    }

    /// Iterate over decoded segments.
    pub fn segments(&self) -> Segments<'_> {
        Segments::new(&self.ops, &self.points)
    }

    /// Box over every point the path touches.
    pub fn bounding_box(&self) -> Result<BoundingBox, PathError> {
        path_bounding_box(&self.points, BoxMode::Path(&self.ops))
    }
}

/// Cursor over the opcodes of a path.
///
/// The iterator is fused after the first error.
#[derive(Debug, Clone)]
pub struct Segments<'a> {
    ops: &'a [PathOp],
    points: &'a [Point],
    op_index: usize,
    cursor: usize,
    failed: bool,
}

impl<'a> Segments<'a> {
    pub fn new(ops: &'a [PathOp], points: &'a [Point]) -> Self {
        Self {
            ops,
            points,
            op_index: 0,
            cursor: 0,
            failed: false,
        }
    }

    /// Index of the next unread point.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    fn take(&mut self, op: PathOp) -> Result<&'a [Point], PathError> {
        let needed = op.points();
        let available = self.points.len() - self.cursor;
        if needed > available {
            return Err(PathError::Overrun {
                op,
                index: self.op_index,
                needed,
                available,
            });
        }
        let taken = &self.points[self.cursor..self.cursor + needed];
        self.cursor += needed;
        Ok(taken)
    }

    fn decode(&mut self, op: PathOp) -> Result<Segment, PathError> {
        let pts = self.take(op)?;
        let segment = match op {
            PathOp::NewSubpath => Segment::NewSubpath,
            PathOp::MoveTo => Segment::MoveTo(pts[0]),
            PathOp::LineTo => Segment::LineTo(pts[0]),
            PathOp::ArcTo => {
                let size = pts[1];
                if size.x == 0 || size.y == 0 {
                    return Err(PathError::DegenerateArc {
                        index: self.op_index,
                    });
                }
                Segment::ArcTo(EllipticArc::new(
                    pts[0],
                    size.x,
                    size.y,
                    pts[2].x as f64 / 1000.0,
                    pts[2].y as f64 / 1000.0,
                ))
            },
            PathOp::CurveTo => Segment::CurveTo([pts[0], pts[1], pts[2]]),
            PathOp::Close => Segment::Close,
            PathOp::Fill => Segment::Fill,
            PathOp::Stroke => Segment::Stroke,
            PathOp::FillStroke => Segment::FillStroke,
            PathOp::Clip => Segment::Clip,
        };
        Ok(segment)
    }
}

impl Iterator for Segments<'_> {
    type Item = Result<Segment, PathError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        let op = *self.ops.get(self.op_index)?;
        let result = self.decode(op);
        self.op_index += 1;
        if result.is_err() {
            self.failed = true;
        }
        Some(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_segments_track_cursor() {
        let mut path = Path::new();
        path.move_to(Point::new(0, 0))
            .line_to(Point::new(10, 0))
            .curve_to(Point::new(10, 5), Point::new(5, 10), Point::new(0, 10))
            .close()
            .stroke();

        let mut segs = path.segments();
        assert_eq!(segs.next(), Some(Ok(Segment::MoveTo(Point::new(0, 0)))));
        assert_eq!(segs.next(), Some(Ok(Segment::LineTo(Point::new(10, 0)))));
        assert_eq!(segs.cursor(), 2);
        assert!(matches!(segs.next(), Some(Ok(Segment::CurveTo(_)))));
        assert_eq!(segs.cursor(), 5);
        assert_eq!(segs.next(), Some(Ok(Segment::Close)));
        assert_eq!(segs.next(), Some(Ok(Segment::Stroke)));
        assert_eq!(segs.next(), None);
    }

    #[test]
    fn test_arc_roundtrips_through_points() {
        let arc = EllipticArc::new(Point::new(50, 50), 20, 10, 30.5, 120.0);
        let mut path = Path::new();
        path.arc_to(&arc);
        assert_eq!(path.points()[2], Point::new(30_500, 120_000));

        match path.segments().next() {
            Some(Ok(Segment::ArcTo(decoded))) => assert_eq!(decoded, arc),
            other => panic!("unexpected segment {:?}", other),
        }
    }

    #[test]
    fn test_overrun_is_reported_and_fuses() {
        let path = Path::from_parts(
            vec![PathOp::MoveTo, PathOp::CurveTo, PathOp::LineTo],
            vec![Point::new(0, 0), Point::new(1, 1)],
        );
        let mut segs = path.segments();
        assert!(segs.next().unwrap().is_ok());
        assert_eq!(
            segs.next(),
            Some(Err(PathError::Overrun {
                op: PathOp::CurveTo,
                index: 1,
                needed: 3,
                available: 1,
            }))
        );
        assert_eq!(segs.next(), None);
    }

    #[test]
    fn test_degenerate_arc() {
        let path = Path::from_parts(
            vec![PathOp::ArcTo],
            vec![Point::new(5, 5), Point::new(0, 10), Point::new(0, 90_000)],
        );
        assert_eq!(
            path.segments().next(),
            Some(Err(PathError::DegenerateArc { index: 0 }))
        );
    }
}
