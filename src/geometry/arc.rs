//! Elliptical arc parameterisation.

use super::Point;
use super::bbox::BoundingBox;

/// An arc of the ellipse inscribed in a `width` x `height` box centred on
/// `center`, running counter-clockwise from `angle1` to `angle2` (degrees).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EllipticArc {
    pub center: Point,
    pub width: i32,
    pub height: i32,
    pub angle1: f64,
    pub angle2: f64,
}

impl EllipticArc {
    pub fn new(center: Point, width: i32, height: i32, angle1: f64, angle2: f64) -> Self {
        Self {
            center,
            width,
            height,
            angle1,
            angle2,
        }
    }

    /// Top-left corner of the ellipse box.
    pub fn origin(&self) -> Point {
        Point::new(
            self.center.x - self.width / 2,
            self.center.y - self.height / 2,
        )
    }

    /// Point of the ellipse at `degrees`, rounded to whole pixels.
    pub fn point_at(&self, degrees: f64) -> Point {
        let rad = degrees.to_radians();
        let half_w = self.width as f64 / 2.0;
        let half_h = self.height as f64 / 2.0;
        Point::new(
            self.center.x + (half_w * rad.cos()).round() as i32,
            self.center.y + (half_h * rad.sin()).round() as i32,
        )
    }

    fn oriented(&self, invert_y: bool) -> (f64, f64) {
        if invert_y {
            (-self.angle1, -self.angle2)
        } else {
            (self.angle1, self.angle2)
        }
    }

    fn angle_of(&self, p: Point) -> f64 {
        ((p.y - self.center.y) as f64)
            .atan2((p.x - self.center.x) as f64)
            .to_degrees()
    }
}

/// Start and end points of `arc`.
///
/// With `invert_y` both angles are negated first, since arc angles follow the
/// mathematical orientation while a top-down device grows y downwards.
pub fn arc_endpoints(arc: &EllipticArc, invert_y: bool) -> (Point, Point) {
    let (a1, a2) = arc.oriented(invert_y);
    (arc.point_at(a1), arc.point_at(a2))
}

/// Angles of the arc endpoints mapped into `[0, 360)` and sorted ascending.
pub fn normalize_angles(arc: &EllipticArc, invert_y: bool) -> (f64, f64) {
    let (start, end) = arc_endpoints(arc, invert_y);
    let wrap = |a: f64| if a < 0.0 { a + 360.0 } else { a };

    let lo = wrap(arc.angle_of(start));
    let hi = wrap(arc.angle_of(end));
    if hi < lo { (hi, lo) } else { (lo, hi) }
}

/// Raw start angle of the arc (as seen from its centre) and the sweep to its
/// end point, both in degrees. Used when the arc continues a drawn path.
pub fn point_angles(arc: &EllipticArc, invert_y: bool) -> (f64, f64) {
    let (start, end) = arc_endpoints(arc, invert_y);
    let st = arc.angle_of(start);
    (st, arc.angle_of(end) - st)
}

/// Tight box around the arc: both endpoints plus every axis extreme the arc
/// sweeps over.
pub fn arc_box(arc: &EllipticArc) -> BoundingBox {
    let start = arc.point_at(arc.angle1);
    let mut bbox = BoundingBox::from_point(start);
    bbox.include(arc.point_at(arc.angle2));

    let first = arc.angle1.rem_euclid(360.0);
    let sweep = if (arc.angle2 - arc.angle1).abs() >= 360.0 {
        360.0
    } else {
        (arc.angle2 - arc.angle1).rem_euclid(360.0)
    };

    // Axis angles up to 630 cover any start in [0, 360) plus a full turn.
    for k in 0..8 {
        let axis = k as f64 * 90.0;
        if axis >= first && axis <= first + sweep {
            bbox.include(arc.point_at(axis));
        }
    }

    bbox
}
