/// Shape markup for the open slide.
///
/// Every element is assembled in a `String` first and handed to the slide
/// stream in one piece. The shape id is only committed once that write
/// succeeded, so a shape that fails half way leaves no trace and no gap in
/// the id sequence.
use crate::common::unit::{ScaleFactors, to_angle};
use crate::common::xml::push_escaped;
use crate::common::Color;
use crate::config::StrokeAlphaPolicy;
use crate::geometry::{
    BoundingBox, BoxMode, EllipticArc, Path, PathError, Point, Segment, arc_endpoints, normalize_angles,
    path_bounding_box, point_angles,
};
use crate::ooxml::error::Result;
use std::fmt::Write as FmtWrite;
use std::path::Path as FsPath;
use tracing::{debug, warn};

use super::fill::{FillResolver, FillSpec, ResolvedFill, Stroke, write_no_line, write_solid_fill};
use super::media::{MediaSink, MediaStore, Raster, RasterEncoder};
use super::relmap::IdAllocator;
use super::slide::SlideStream;

/// One command of a custom geometry, in absolute pixels.
#[derive(Debug, Clone, PartialEq)]
pub enum PathCommand {
    MoveTo(Point),
    LineTo(Point),
    /// Elliptic arc continuing from the current point
    ArcTo {
        width_radius: i32,
        height_radius: i32,
        /// Start angle in degrees
        start: f64,
        /// Sweep in degrees
        sweep: f64,
    },
    CubicBezTo([Point; 3]),
    Close,
}

/// A `custGeom` outline with the box it is placed in.
#[derive(Debug, Clone, PartialEq)]
pub struct CustomGeometry {
    bbox: BoundingBox,
    commands: Vec<PathCommand>,
}

impl CustomGeometry {
    pub fn new(bbox: BoundingBox) -> Self {
        Self {
            bbox,
            commands: Vec::new(),
        }
    }

    /// Segment from `a` to `b`.
    pub fn line(a: Point, b: Point) -> Self {
        let mut geometry = Self::new(BoundingBox::from_corners(a, b));
        geometry.push(PathCommand::MoveTo(a));
        geometry.push(PathCommand::LineTo(b));
        geometry
    }

    /// Closed outline of an axis-aligned rectangle.
    pub fn rect(xmin: i32, xmax: i32, ymin: i32, ymax: i32) -> Self {
        let mut geometry = Self::new(BoundingBox::from_corners(Point::new(xmin, ymin), Point::new(xmax, ymax)));
        geometry.push(PathCommand::MoveTo(Point::new(xmin, ymin)));
        for corner in [(xmax, ymin), (xmax, ymax), (xmin, ymax), (xmin, ymin)] {
            geometry.push(PathCommand::LineTo(corner.into()));
        }
        geometry
    }

    /// Polyline through `points`, returning to the first point when `closed`.
    pub fn polyline(points: &[Point], closed: bool) -> std::result::Result<Self, PathError> {
        let mut geometry = Self::new(path_bounding_box(points, BoxMode::Polygon)?);
        geometry.push(PathCommand::MoveTo(points[0]));
        for p in &points[1..] {
            geometry.push(PathCommand::LineTo(*p));
        }
        if closed {
            geometry.push(PathCommand::LineTo(points[0]));
        }
        Ok(geometry)
    }

    /// Bézier chain: a start point followed by `(control, control, end)`
    /// groups.
    pub fn bezier(points: &[Point]) -> std::result::Result<Self, PathError> {
        let mut geometry = Self::new(path_bounding_box(points, BoxMode::Bezier)?);
        geometry.push(PathCommand::MoveTo(points[0]));
        for group in points[1..].chunks_exact(3) {
            geometry.push(PathCommand::CubicBezTo([group[0], group[1], group[2]]));
        }
        Ok(geometry)
    }

    pub fn push(&mut self, command: PathCommand) {
        self.commands.push(command);
    }

    pub fn bbox(&self) -> &BoundingBox {
        &self.bbox
    }

    pub fn commands(&self) -> &[PathCommand] {
        &self.commands
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    fn write_xml(&self, xml: &mut String, scale: &ScaleFactors) -> Result<()> {
        let origin = self.bbox.min();
        let pt = |xml: &mut String, p: Point| -> Result<()> {
            let p = p.relative_to(origin);
            write!(xml, r#"<a:pt x="{}" y="{}"/>"#, scale.sx(p.x), scale.sy(p.y))?;
            Ok(())
        };

        write!(
            xml,
            r#"<a:custGeom><a:pathLst><a:path extrusionOk="0" w="{}" h="{}">"#,
            scale.sx(self.bbox.width()),
            scale.sy(self.bbox.height())
        )?;
        for command in &self.commands {
            match command {
                PathCommand::MoveTo(p) => {
                    xml.push_str("<a:moveTo>");
                    pt(xml, *p)?;
                    xml.push_str("</a:moveTo>");
                },
                PathCommand::LineTo(p) => {
                    xml.push_str("<a:lnTo>");
                    pt(xml, *p)?;
                    xml.push_str("</a:lnTo>");
                },
                PathCommand::ArcTo {
                    width_radius,
                    height_radius,
                    start,
                    sweep,
                } => write!(
                    xml,
                    r#"<a:arcTo hR="{}" wR="{}" stAng="{}" swAng="{}"/>"#,
                    scale.sy(*height_radius),
                    scale.sx(*width_radius),
                    to_angle(*start),
                    to_angle(*sweep)
                )?,
                PathCommand::CubicBezTo(pts) => {
                    xml.push_str("<a:cubicBezTo>");
                    for p in pts {
                        pt(xml, *p)?;
                    }
                    xml.push_str("</a:cubicBezTo>");
                },
                PathCommand::Close => xml.push_str("<a:close/>"),
            }
        }
        xml.push_str("</a:path></a:pathLst></a:custGeom>");
        Ok(())
    }
}

/// Preset geometries parameterised by two angles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PresetShape {
    Arc,
    Pie,
    Chord,
}

impl PresetShape {
    pub fn preset(&self) -> &'static str {
        match self {
            Self::Arc => "arc",
            Self::Pie => "pie",
            Self::Chord => "chord",
        }
    }
}

/// How a path shape is painted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathPaint {
    Fill,
    Stroke,
    FillStroke,
}

/// Split a path into painted outlines.
///
/// Each fill, stroke or fill-and-stroke opcode ends one outline. All outlines
/// share the box of the whole path. Geometry after the last paint opcode is
/// dropped.
pub fn path_geometries(path: &Path, invert_y: bool) -> std::result::Result<Vec<(CustomGeometry, PathPaint)>, PathError> {
    let bbox = path.bounding_box()?;
    let mut painted = Vec::new();
    let mut current = CustomGeometry::new(bbox);
    let mut subpath_start: Option<Point> = None;

    for segment in path.segments() {
        let paint = match segment? {
            Segment::NewSubpath => {
                subpath_start = None;
                continue;
            },
            Segment::MoveTo(p) => {
                subpath_start = Some(p);
                current.push(PathCommand::MoveTo(p));
                continue;
            },
            Segment::LineTo(p) => {
                subpath_start.get_or_insert(p);
                current.push(PathCommand::LineTo(p));
                continue;
            },
            Segment::ArcTo(arc) => {
                let (start, _) = arc_endpoints(&arc, invert_y);
                let (start_angle, sweep) = point_angles(&arc, invert_y);
                subpath_start.get_or_insert(start);
                current.push(PathCommand::LineTo(start));
                current.push(PathCommand::ArcTo {
                    width_radius: arc.width / 2,
                    height_radius: arc.height / 2,
                    start: start_angle,
                    sweep,
                });
                continue;
            },
            Segment::CurveTo(pts) => {
                current.push(PathCommand::CubicBezTo(pts));
                continue;
            },
            Segment::Close => {
                if let Some(start) = subpath_start {
                    current.push(PathCommand::LineTo(start));
                }
                current.push(PathCommand::Close);
                continue;
            },
            Segment::Clip => continue,
            Segment::Fill => PathPaint::Fill,
            Segment::Stroke => PathPaint::Stroke,
            Segment::FillStroke => PathPaint::FillStroke,
        };

        let outline = std::mem::replace(&mut current, CustomGeometry::new(bbox));
        if !outline.is_empty() {
            painted.push((outline, paint));
        }
    }

    if !current.is_empty() {
        warn!(
            commands = current.commands().len(),
            "dropping path geometry with no paint operation"
        );
    }
    Ok(painted)
}

/// Fill and outline of one shape.
#[derive(Debug, Clone)]
pub struct Paint<'a> {
    pub fill: Option<FillSpec<'a>>,
    pub stroke: Option<Stroke>,
}

impl<'a> Paint<'a> {
    /// Outline only.
    pub fn stroke(stroke: Stroke) -> Self {
        Self {
            fill: None,
            stroke: Some(stroke),
        }
    }

    /// Interior only.
    pub fn fill(fill: FillSpec<'a>) -> Self {
        Self {
            fill: Some(fill),
            stroke: None,
        }
    }

    pub fn fill_and_stroke(fill: FillSpec<'a>, stroke: Stroke) -> Self {
        Self {
            fill: Some(fill),
            stroke: Some(stroke),
        }
    }
}

/// A single run of text placed in a box.
#[derive(Debug, Clone)]
pub struct TextRun<'a> {
    /// Top-left corner of the box in pixels
    pub origin: Point,
    pub width: i32,
    pub height: i32,
    /// Rotation in degrees, clockwise
    pub rotation: f64,
    pub typeface: &'a str,
    /// Size in points
    pub size: i32,
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
    pub strikeout: bool,
    pub color: Color,
    pub text: &'a str,
}

/// `sz` of a run in hundredths of a point, two thirds of `size`, kept inside
/// the 1 to 4000 point range DrawingML accepts.
fn font_size_attr(size: i32) -> i32 {
    (size.clamp(0, 6000) * 2 / 3 * 100).clamp(100, 400_000)
}

/// Writes shapes into the open slide.
pub struct ShapeWriter<'a> {
    pub(crate) root: &'a FsPath,
    pub(crate) slide: &'a mut SlideStream,
    pub(crate) ids: &'a mut IdAllocator,
    pub(crate) scale: ScaleFactors,
    pub(crate) encoder: &'a dyn RasterEncoder,
    pub(crate) policy: StrokeAlphaPolicy,
}

impl<'a> ShapeWriter<'a> {
    pub fn scale(&self) -> ScaleFactors {
        self.scale
    }

    /// Media sink that stores into the open slide.
    pub fn media(&mut self) -> MediaStore<'_> {
        MediaStore {
            root: self.root,
            ids: &mut *self.ids,
            slide: &mut *self.slide,
            encoder: self.encoder,
        }
    }

    /// Emit a `custGeom` shape and return its id.
    ///
    /// The fill is resolved last, after the rest of the markup is built. A
    /// media part stored for it is only left unreferenced when the slide
    /// write itself fails, and it keeps its relationship.
    pub fn custom_shape(&mut self, geometry: &CustomGeometry, paint: &Paint<'_>) -> Result<u32> {
        let id = self.ids.next_shape_id();
        let bbox = geometry.bbox();

        let mut xml = String::with_capacity(1024);
        self.write_sp_open(&mut xml, id, bbox.min(), bbox.width(), bbox.height())?;
        geometry.write_xml(&mut xml, &self.scale)?;
        let fill = self.resolve_fill(paint)?;
        self.write_sp_close(&mut xml, &fill, paint.stroke.as_ref())?;

        self.commit(&xml, "custom")
    }

    /// Emit an `arc`, `pie` or `chord` preset covering `arc`.
    pub fn preset_shape(
        &mut self,
        shape: PresetShape,
        arc: &EllipticArc,
        invert_y: bool,
        paint: &Paint<'_>,
    ) -> Result<u32> {
        let (lo, hi) = normalize_angles(arc, invert_y);
        let id = self.ids.next_shape_id();

        let mut xml = String::with_capacity(1024);
        self.write_sp_open(&mut xml, id, arc.origin(), arc.width.abs(), arc.height.abs())?;
        write!(
            xml,
            r#"<a:prstGeom prst="{}"><a:avLst><a:gd name="adj1" fmla="val {}"/><a:gd name="adj2" fmla="val {}"/></a:avLst></a:prstGeom>"#,
            shape.preset(),
            to_angle(lo),
            to_angle(hi)
        )?;
        let fill = self.resolve_fill(paint)?;
        self.write_sp_close(&mut xml, &fill, paint.stroke.as_ref())?;

        self.commit(&xml, shape.preset())
    }

    /// Emit every painted outline of `path`, returning their ids.
    ///
    /// The whole path is validated before anything is written, so a
    /// malformed path produces no shapes and consumes no ids.
    pub fn path(&mut self, path: &Path, invert_y: bool, fill: FillSpec<'_>, stroke: &Stroke) -> Result<Vec<u32>> {
        let outlines = path_geometries(path, invert_y)?;
        let mut ids = Vec::with_capacity(outlines.len());
        for (geometry, paint) in &outlines {
            let paint = match paint {
                PathPaint::Fill => Paint::fill(fill),
                PathPaint::Stroke => Paint::stroke(stroke.clone()),
                PathPaint::FillStroke => Paint::fill_and_stroke(fill, stroke.clone()),
            };
            ids.push(self.custom_shape(geometry, &paint)?);
        }
        Ok(ids)
    }

    /// Emit a one pixel square outlined in `color`.
    pub fn pixel(&mut self, at: Point, color: Color) -> Result<u32> {
        let mut geometry = CustomGeometry::new(BoundingBox::from_point(at));
        geometry.push(PathCommand::MoveTo(at));
        for (dx, dy) in [(1, 0), (1, 1), (0, 1), (0, 0)] {
            geometry.push(PathCommand::LineTo(Point::new(at.x + dx, at.y + dy)));
        }
        self.custom_shape(&geometry, &Paint::stroke(Stroke::solid(1, color)))
    }

    /// Emit a text box.
    pub fn text(&mut self, run: &TextRun<'_>) -> Result<u32> {
        let id = self.ids.next_shape_id();
        let mut xml = String::with_capacity(1536 + run.text.len());

        write!(
            xml,
            r#"<p:sp><p:nvSpPr><p:cNvPr id="{}" name="Shape {}"/><p:cNvSpPr txBox="0"/><p:nvPr/></p:nvSpPr>"#,
            id, id
        )?;
        write!(
            xml,
            r#"<p:spPr><a:xfrm rot="{}"><a:off x="{}" y="{}"/><a:ext cx="{}" cy="{}"/></a:xfrm>"#,
            to_angle(run.rotation),
            self.scale.sx(run.origin.x),
            self.scale.sy(run.origin.y),
            self.scale.sx(run.width),
            self.scale.sy(run.height)
        )?;
        xml.push_str(r#"<a:prstGeom prst="rect"><a:avLst/></a:prstGeom><a:noFill/>"#);
        write_no_line(&mut xml);
        xml.push_str("</p:spPr>");

        xml.push_str(r#"<p:txBody><a:bodyPr wrap="none" anchorCtr="1" anchor="ctr" bIns="0" lIns="0" rIns="0" tIns="0"><a:noAutofit/></a:bodyPr>"#);
        xml.push_str(r#"<a:lstStyle/><a:p><a:pPr lvl="0"><a:spcBef><a:spcPts val="0"/></a:spcBef><a:buNone/></a:pPr>"#);
        write!(
            xml,
            r#"<a:r><a:rPr b="{}" i="{}" strike="{}" lang="en" u="{}" sz="{}">"#,
            run.bold as u8,
            run.italic as u8,
            if run.strikeout { "sngStrike" } else { "noStrike" },
            if run.underline { "sng" } else { "none" },
            font_size_attr(run.size)
        )?;
        write_solid_fill(&mut xml, run.color)?;
        for tag in ["latin", "ea", "cs", "sym"] {
            xml.push_str("<a:");
            xml.push_str(tag);
            xml.push_str(r#" typeface=""#);
            push_escaped(&mut xml, run.typeface);
            xml.push_str(r#""/>"#);
        }
        xml.push_str("</a:rPr><a:t>");
        push_escaped(&mut xml, run.text);
        xml.push_str("</a:t></a:r></a:p></p:txBody></p:sp>");

        self.commit(&xml, "text")
    }

    /// Store `raster` as media and emit a `p:pic` stretched over the box.
    ///
    /// # Arguments
    /// * `raster` - Pixels, rows top to bottom
    /// * `origin` - Top-left corner of the picture in pixels
    /// * `width`, `height` - Size of the picture in pixels
    pub fn picture(&mut self, raster: &Raster, origin: Point, width: i32, height: i32) -> Result<u32> {
        let slot = self.media().store(raster)?;
        let id = self.ids.next_shape_id();
        let mut xml = String::with_capacity(1024);

        write!(
            xml,
            r#"<p:pic><p:nvPicPr><p:cNvPr id="{}" name="Shape {}"/><p:cNvPicPr preferRelativeResize="0"/><p:nvPr/></p:nvPicPr>"#,
            id, id
        )?;
        write!(
            xml,
            r#"<p:blipFill><a:blip r:embed="{}"><a:alphaModFix/></a:blip><a:stretch><a:fillRect/></a:stretch></p:blipFill>"#,
            slot.rel_id_string()
        )?;
        write!(
            xml,
            r#"<p:spPr><a:xfrm><a:off x="{}" y="{}"/><a:ext cx="{}" cy="{}"/></a:xfrm>"#,
            self.scale.sx(origin.x),
            self.scale.sy(origin.y),
            self.scale.sx(width),
            self.scale.sy(height)
        )?;
        xml.push_str(r#"<a:prstGeom prst="rect"><a:avLst/></a:prstGeom><a:noFill/>"#);
        write_no_line(&mut xml);
        xml.push_str("</p:spPr></p:pic>");

        self.commit(&xml, "picture")
    }

    fn resolve_fill(&mut self, paint: &Paint<'_>) -> Result<ResolvedFill> {
        match &paint.fill {
            Some(fill) => {
                let mut media = self.media();
                FillResolver::resolve(fill, &mut media as &mut dyn MediaSink)
            },
            None => Ok(ResolvedFill::None),
        }
    }

    fn write_sp_open(&self, xml: &mut String, id: u32, origin: Point, width: i32, height: i32) -> Result<()> {
        write!(
            xml,
            r#"<p:sp><p:nvSpPr><p:cNvPr id="{}" name="Shape {}"/><p:cNvSpPr/><p:nvPr/></p:nvSpPr>"#,
            id, id
        )?;
        write!(
            xml,
            r#"<p:spPr><a:xfrm><a:off x="{}" y="{}"/><a:ext cx="{}" cy="{}"/></a:xfrm>"#,
            self.scale.sx(origin.x),
            self.scale.sy(origin.y),
            self.scale.sx(width),
            self.scale.sy(height)
        )?;
        Ok(())
    }

    fn write_sp_close(&self, xml: &mut String, fill: &ResolvedFill, stroke: Option<&Stroke>) -> Result<()> {
        fill.write_xml(xml)?;
        match stroke {
            Some(stroke) => {
                let forced;
                let stroke = if fill.is_visible() && self.policy == StrokeAlphaPolicy::ForceOpaqueWhenFilled {
                    forced = Stroke {
                        color: stroke.color.with_alpha(255),
                        ..stroke.clone()
                    };
                    &forced
                } else {
                    stroke
                };
                stroke.write_xml(xml, self.scale.sx(stroke.width))?;
            },
            None => write_no_line(xml),
        }
        xml.push_str("</p:spPr></p:sp>");
        Ok(())
    }

    fn commit(&mut self, xml: &str, kind: &str) -> Result<u32> {
        self.slide.write_shape(xml)?;
        let id = self.ids.commit_shape();
        debug!(slide = self.slide.index(), id, kind, "wrote shape");
        Ok(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::PathOp;

    #[test]
    fn test_font_size_attr() {
        assert_eq!(font_size_attr(12), 800);
        assert_eq!(font_size_attr(57), 3800);
        assert_eq!(font_size_attr(1), 100);
        assert_eq!(font_size_attr(-20), 100);
        assert_eq!(font_size_attr(i32::MAX), 400_000);
    }

    #[test]
    fn test_rect_geometry() {
        let geometry = CustomGeometry::rect(10, 20, 5, 8);
        assert_eq!(geometry.bbox().width(), 11);
        assert_eq!(geometry.bbox().height(), 4);
        assert_eq!(geometry.commands().len(), 5);

        let mut xml = String::new();
        let scale = ScaleFactors::from_extent(1000, 1000, 100, 100).unwrap();
        geometry.write_xml(&mut xml, &scale).unwrap();
        assert!(xml.contains(r#"<a:path extrusionOk="0" w="110" h="40">"#));
        assert!(xml.contains(r#"<a:moveTo><a:pt x="0" y="0"/></a:moveTo>"#));
        assert!(xml.contains(r#"<a:lnTo><a:pt x="100" y="30"/></a:lnTo>"#));
    }

    #[test]
    fn test_closed_polyline_returns_to_start() {
        let pts = [Point::new(0, 0), Point::new(4, 0), Point::new(4, 4)];
        let geometry = CustomGeometry::polyline(&pts, true).unwrap();
        assert_eq!(geometry.commands().last(), Some(&PathCommand::LineTo(Point::new(0, 0))));
        let open = CustomGeometry::polyline(&pts, false).unwrap();
        assert_eq!(open.commands().len(), 3);
    }

    #[test]
    fn test_incomplete_bezier_rejected() {
        let pts = [Point::new(0, 0), Point::new(1, 1), Point::new(2, 2)];
        assert!(matches!(
            CustomGeometry::bezier(&pts),
            Err(PathError::IncompleteBezier { count: 3 })
        ));
    }

    #[test]
    fn test_path_split_on_paint() {
        let mut path = Path::new();
        path.move_to(Point::new(0, 0))
            .line_to(Point::new(10, 0))
            .line_to(Point::new(10, 10))
            .close()
            .fill_stroke()
            .move_to(Point::new(2, 2))
            .line_to(Point::new(8, 8))
            .stroke();

        let outlines = path_geometries(&path, true).unwrap();
        assert_eq!(outlines.len(), 2);
        assert_eq!(outlines[0].1, PathPaint::FillStroke);
        assert_eq!(
            &outlines[0].0.commands()[3..],
            &[PathCommand::LineTo(Point::new(0, 0)), PathCommand::Close]
        );
        assert_eq!(outlines[1].1, PathPaint::Stroke);
        assert_eq!(outlines[1].0.bbox(), outlines[0].0.bbox());
    }

    #[test]
    fn test_path_arc_starts_with_line() {
        let mut path = Path::new();
        path.arc_to(&EllipticArc::new(Point::new(50, 50), 20, 10, 0.0, 90.0)).stroke();
        let outlines = path_geometries(&path, false).unwrap();
        let commands = outlines[0].0.commands();
        assert_eq!(commands[0], PathCommand::LineTo(Point::new(60, 50)));
        match commands[1] {
            PathCommand::ArcTo {
                width_radius,
                height_radius,
                start,
                sweep,
            } => {
                assert_eq!((width_radius, height_radius), (10, 5));
                assert!(start.abs() < 1e-9);
                assert!((sweep - 90.0).abs() < 1e-9);
            },
            ref other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_malformed_path_is_an_error() {
        let path = Path::from_parts(vec![PathOp::MoveTo, PathOp::LineTo, PathOp::Stroke], vec![Point::new(0, 0)]);
        assert!(matches!(path_geometries(&path, true), Err(PathError::Overrun { .. })));
    }

    #[test]
    fn test_unpainted_geometry_dropped() {
        let mut path = Path::new();
        path.move_to(Point::new(0, 0)).line_to(Point::new(3, 3));
        assert!(path_geometries(&path, true).unwrap().is_empty());
    }
}
