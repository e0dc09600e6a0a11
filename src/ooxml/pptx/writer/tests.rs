//! Integration tests for the presentation writer
//!
//! These tests drive a whole document through staging, finalizing and
//! packaging, then read the archive back with the zip reader.

use super::*;
use crate::common::Color;
use crate::config::{ExportOptions, StrokeAlphaPolicy};
use crate::geometry::{EllipticArc, Path as DrawPath, PathOp, Point};
use crate::ooxml::error::ExportError;
use crate::ooxml::pptx::format::ImageFormat;
use crate::ooxml::pptx::package::ZipArchiver;
use std::fs::{self, File};
use std::io::Read;
use std::path::Path;

fn options_in(dir: &Path) -> ExportOptions {
    ExportOptions {
        staging_parent: Some(dir.to_path_buf()),
        ..Default::default()
    }
}

fn entry_names(archive: &Path) -> Vec<String> {
    let zip = zip::ZipArchive::new(File::open(archive).unwrap()).unwrap();
    zip.file_names().map(str::to_string).collect()
}

fn read_entry(archive: &Path, name: &str) -> String {
    let mut zip = zip::ZipArchive::new(File::open(archive).unwrap()).unwrap();
    let mut entry = zip.by_name(name).unwrap();
    let mut text = String::new();
    entry.read_to_string(&mut text).unwrap();
    text
}

fn red_box<'a>() -> Paint<'a> {
    Paint::fill_and_stroke(FillSpec::Solid(Color::rgb(255, 0, 0)), Stroke::solid(1, Color::BLACK))
}

/// Encoder that always fails.
struct BrokenEncoder;

impl RasterEncoder for BrokenEncoder {
    fn format(&self) -> ImageFormat {
        ImageFormat::Png
    }

    fn encode(&self, _raster: &Raster) -> crate::ooxml::error::Result<Vec<u8>> {
        Err(ExportError::Encode("encoder offline".to_string()))
    }
}

/// Encoder that claims PNG but writes JPEG magic.
struct MislabeledEncoder;

impl RasterEncoder for MislabeledEncoder {
    fn format(&self) -> ImageFormat {
        ImageFormat::Png
    }

    fn encode(&self, _raster: &Raster) -> crate::ooxml::error::Result<Vec<u8>> {
        Ok(vec![0xFF, 0xD8, 0xFF, 0xE0])
    }
}

#[test]
fn test_single_slide_end_to_end() {
    let dir = tempfile::tempdir().unwrap();
    let mut doc = Document::create(100.0, 100.0, 100, 100, &options_in(dir.path())).unwrap();
    assert_eq!(doc.scale().x(), 36_000);
    let root = doc.root().to_path_buf();

    {
        let mut shapes = doc.shape_writer().unwrap();
        let line = shapes
            .custom_shape(
                &CustomGeometry::line(Point::new(0, 0), Point::new(10, 10)),
                &Paint::stroke(Stroke::solid(1, Color::BLACK)),
            )
            .unwrap();
        let filled = shapes.custom_shape(&CustomGeometry::rect(20, 40, 20, 40), &red_box()).unwrap();
        assert_eq!((line, filled), (52, 53));
    }
    doc.close_slide().unwrap();
    doc.finalize().unwrap();

    let target = dir.path().join("out.pptx");
    doc.package(&target, &ZipArchiver).unwrap();
    assert_eq!(doc.state(), DocumentState::Packaged);
    assert!(!root.exists());

    let names = entry_names(&target);
    assert_eq!(names.len(), 2 + 10);
    assert!(names.iter().all(|n| !n.starts_with("ppt/media/")));
    assert!(names.contains(&"ppt/slides/slide1.xml".to_string()));
    assert!(!names.contains(&"ppt/slides/slide2.xml".to_string()));

    let slide = read_entry(&target, "ppt/slides/slide1.xml");
    assert!(slide.contains(r#"<p:cNvPr id="51" name="Shape 51"/>"#));
    assert!(slide.contains(r#"<p:cNvPr id="52" name="Shape 52"/>"#));
    assert!(slide.contains(r#"<p:cNvPr id="53" name="Shape 53"/>"#));
    assert!(slide.contains(r#"<a:off x="720000" y="720000"/><a:ext cx="756000" cy="756000"/>"#));
    assert!(slide.contains(r#"<a:srgbClr val="FF0000"><a:alpha val="100000"/></a:srgbClr>"#));

    let content_types = read_entry(&target, "[Content_Types].xml");
    assert_eq!(content_types.matches("presentationml.slide+xml").count(), 1);

    let presentation = read_entry(&target, "ppt/presentation.xml");
    assert!(presentation.contains(r#"<p:sldId id="256" r:id="rId4"/>"#));
    assert!(presentation.contains(r#"<p:sldSz cx="3600000" cy="3600000"/>"#));
}

#[test]
fn test_flush_produces_consecutive_slides() {
    let dir = tempfile::tempdir().unwrap();
    let mut doc = Document::create(254.0, 190.5, 960, 720, &options_in(dir.path())).unwrap();

    for _ in 0..2 {
        doc.close_slide().unwrap();
        doc.open_slide().unwrap();
    }
    // Three group shapes, one per slide.
    assert_eq!(doc.ids().next_shape_id(), 54);
    doc.finalize().unwrap();
    assert_eq!(doc.ids().slides_closed(), 3);

    let target = dir.path().join("three.pptx");
    doc.package(&target, &ZipArchiver).unwrap();

    let presentation = read_entry(&target, "ppt/presentation.xml");
    assert!(presentation.contains(r#"<p:sldId id="258" r:id="rId6"/>"#));
    let rels = read_entry(&target, "ppt/_rels/presentation.xml.rels");
    assert!(rels.contains(r#"Id="rId6""#));
    assert!(rels.contains(r#"Target="slides/slide3.xml""#));
    assert_eq!(entry_names(&target).len(), 2 * 3 + 10);
}

#[test]
fn test_media_and_relationships_pair_up() {
    let dir = tempfile::tempdir().unwrap();
    let mut doc = Document::create(100.0, 100.0, 100, 100, &options_in(dir.path())).unwrap();
    let raster = Raster::from_fn(2, 2, PixelLayout::Rgba, |c, r| Color::rgba(c as u8 * 100, r as u8 * 100, 0, 255)).unwrap();
    let pattern = PatternImage::new(2, 1, vec![0x00_FF_00_00, 0x00_00_FF_00]).unwrap();

    {
        let mut shapes = doc.shape_writer().unwrap();
        shapes.picture(&raster, Point::new(0, 0), 20, 20).unwrap();
        shapes
            .custom_shape(&CustomGeometry::rect(0, 9, 0, 9), &Paint::fill(FillSpec::Pattern(&pattern)))
            .unwrap();
        shapes.picture(&raster, Point::new(50, 50), 10, 10).unwrap();
    }
    assert_eq!(doc.ids().media_count(), 3);
    doc.finalize().unwrap();

    let rels = fs::read_to_string(doc.root().join("ppt/slides/_rels/slide1.xml.rels")).unwrap();
    for (rel, index) in [(4, 0), (5, 1), (6, 2)] {
        assert!(rels.contains(&format!(r#"Id="rId{}""#, rel)));
        assert!(rels.contains(&format!("../media/image{}.png", index)));
    }

    let target = dir.path().join("media.pptx");
    doc.package(&target, &ZipArchiver).unwrap();
    let names = entry_names(&target);
    assert_eq!(names.iter().filter(|n| n.starts_with("ppt/media/")).count(), 3);

    let slide = read_entry(&target, "ppt/slides/slide1.xml");
    assert!(slide.contains(r#"<a:blip r:embed="rId4"><a:alphaModFix/></a:blip>"#));
    assert!(slide.contains(r#"<a:blip r:embed="rId5"/>"#));
    assert!(slide.contains(r#"<a:blip r:embed="rId6"><a:alphaModFix/></a:blip>"#));
}

#[test]
fn test_failed_encode_consumes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let mut doc = Document::create_with_encoder(
        100.0,
        100.0,
        100,
        100,
        &options_in(dir.path()),
        Box::new(BrokenEncoder),
    )
    .unwrap();
    let raster = Raster::from_fn(1, 1, PixelLayout::Rgb, |_, _| Color::WHITE).unwrap();

    let mut shapes = doc.shape_writer().unwrap();
    let err = shapes.picture(&raster, Point::new(0, 0), 1, 1).unwrap_err();
    assert!(matches!(err, ExportError::Encode(_)));
    let next = shapes
        .custom_shape(&CustomGeometry::rect(0, 1, 0, 1), &red_box())
        .unwrap();
    assert_eq!(next, 52);
    drop(shapes);

    assert_eq!(doc.ids().media_count(), 0);
    assert!(fs::read_dir(doc.root().join("ppt/media")).unwrap().next().is_none());
}

#[test]
fn test_failed_fill_leaves_no_shape_or_rel() {
    let dir = tempfile::tempdir().unwrap();
    let mut doc = Document::create_with_encoder(
        100.0,
        100.0,
        100,
        100,
        &options_in(dir.path()),
        Box::new(BrokenEncoder),
    )
    .unwrap();
    let pattern = PatternImage::new(1, 1, vec![0x00_FF_00_00]).unwrap();
    let paint = Paint::fill_and_stroke(FillSpec::Pattern(&pattern), Stroke::solid(1, Color::BLACK));

    {
        let mut shapes = doc.shape_writer().unwrap();
        let err = shapes
            .custom_shape(&CustomGeometry::rect(0, 9, 0, 9), &paint)
            .unwrap_err();
        assert!(matches!(err, ExportError::Encode(_)));
        let err = shapes
            .preset_shape(
                PresetShape::Pie,
                &EllipticArc::new(Point::new(50, 50), 20, 20, 0.0, 90.0),
                true,
                &paint,
            )
            .unwrap_err();
        assert!(matches!(err, ExportError::Encode(_)));
    }
    assert_eq!(doc.ids().next_shape_id(), 52);
    assert_eq!(doc.ids().media_count(), 0);
    doc.close_slide().unwrap();

    let slide = fs::read_to_string(doc.root().join("ppt/slides/slide1.xml")).unwrap();
    assert!(!slide.contains("<p:sp>"));
    let rels = fs::read_to_string(doc.root().join("ppt/slides/_rels/slide1.xml.rels")).unwrap();
    assert_eq!(rels.matches("<Relationship ").count(), 1);
}

#[test]
fn test_mislabeled_media_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let mut doc = Document::create_with_encoder(
        100.0,
        100.0,
        100,
        100,
        &options_in(dir.path()),
        Box::new(MislabeledEncoder),
    )
    .unwrap();
    let raster = Raster::from_fn(1, 1, PixelLayout::Rgb, |_, _| Color::WHITE).unwrap();

    let err = doc
        .shape_writer()
        .unwrap()
        .picture(&raster, Point::new(0, 0), 1, 1)
        .unwrap_err();
    assert!(matches!(err, ExportError::Encode(_)));
    assert_eq!(doc.ids().media_count(), 0);
}

#[test]
fn test_malformed_path_abandons_shape() {
    let dir = tempfile::tempdir().unwrap();
    let mut doc = Document::create(100.0, 100.0, 100, 100, &options_in(dir.path())).unwrap();
    let path = DrawPath::from_parts(
        vec![PathOp::MoveTo, PathOp::LineTo, PathOp::ArcTo, PathOp::Stroke],
        vec![Point::new(0, 0), Point::new(5, 5)],
    );

    let mut shapes = doc.shape_writer().unwrap();
    let err = shapes
        .path(&path, true, FillSpec::Hollow, &Stroke::solid(1, Color::BLACK))
        .unwrap_err();
    assert!(matches!(err, ExportError::Path(_)));
    drop(shapes);
    assert_eq!(doc.ids().next_shape_id(), 52);

    doc.close_slide().unwrap();
    let slide = fs::read_to_string(doc.root().join("ppt/slides/slide1.xml")).unwrap();
    assert!(!slide.contains("<p:sp>"));
}

#[test]
fn test_path_fill_stroke_and_arc_presets() {
    let dir = tempfile::tempdir().unwrap();
    let mut doc = Document::create(100.0, 100.0, 100, 100, &options_in(dir.path())).unwrap();
    let mut path = DrawPath::new();
    path.move_to(Point::new(10, 10))
        .line_to(Point::new(30, 10))
        .arc_to(&EllipticArc::new(Point::new(30, 20), 20, 20, 90.0, 0.0))
        .close()
        .fill_stroke();

    {
        let mut shapes = doc.shape_writer().unwrap();
        let ids = shapes
            .path(&path, true, FillSpec::Solid(Color::WHITE), &Stroke::solid(2, Color::BLACK))
            .unwrap();
        assert_eq!(ids, vec![52]);
        let pie = shapes
            .preset_shape(
                PresetShape::Pie,
                &EllipticArc::new(Point::new(50, 50), 20, 10, 0.0, 90.0),
                true,
                &red_box(),
            )
            .unwrap();
        assert_eq!(pie, 53);
    }
    doc.close_slide().unwrap();

    let slide = fs::read_to_string(doc.root().join("ppt/slides/slide1.xml")).unwrap();
    assert!(slide.contains("<a:arcTo "));
    assert!(slide.contains("<a:close/>"));
    assert!(slide.contains(r#"<a:ln cap="flat" cmpd="sng" w="72000">"#));
    assert!(slide.contains(r#"<a:prstGeom prst="pie"><a:avLst><a:gd name="adj1" fmla="val 0"/><a:gd name="adj2" fmla="val 16200000"/>"#));
    assert!(slide.contains(r#"<a:off x="1440000" y="1620000"/><a:ext cx="720000" cy="360000"/>"#));
}

#[test]
fn test_stroke_alpha_policy() {
    let dir = tempfile::tempdir().unwrap();
    let translucent = Stroke::solid(1, Color::rgba(0, 0, 255, 0));
    let paint = Paint::fill_and_stroke(FillSpec::Solid(Color::WHITE), translucent.clone());

    for (policy, expected) in [
        (StrokeAlphaPolicy::ForceOpaqueWhenFilled, "100000"),
        (StrokeAlphaPolicy::KeepComputed, "0"),
    ] {
        let options = ExportOptions {
            stroke_alpha: policy,
            ..options_in(dir.path())
        };
        let mut doc = Document::create(100.0, 100.0, 100, 100, &options).unwrap();
        doc.shape_writer()
            .unwrap()
            .custom_shape(&CustomGeometry::rect(0, 5, 0, 5), &paint)
            .unwrap();
        doc.shape_writer()
            .unwrap()
            .custom_shape(&CustomGeometry::rect(0, 5, 0, 5), &Paint::stroke(translucent.clone()))
            .unwrap();
        doc.close_slide().unwrap();

        let slide = fs::read_to_string(doc.root().join("ppt/slides/slide1.xml")).unwrap();
        let filled_line = format!(r#"<a:srgbClr val="0000FF"><a:alpha val="{}"/>"#, expected);
        assert!(slide.contains(&filled_line), "{:?}", policy);
        // Outline-only shapes always keep their alpha.
        assert_eq!(slide.matches(r#"<a:srgbClr val="0000FF"><a:alpha val="0"/>"#).count(), if expected == "0" { 2 } else { 1 });
    }
}

#[test]
fn test_text_run_markup() {
    let dir = tempfile::tempdir().unwrap();
    let mut doc = Document::create(100.0, 100.0, 100, 100, &options_in(dir.path())).unwrap();
    let run = TextRun {
        origin: Point::new(1, 2),
        width: 30,
        height: 10,
        rotation: -45.0,
        typeface: "Helvetica",
        size: 12,
        bold: true,
        italic: false,
        underline: true,
        strikeout: false,
        color: Color::rgb(0, 128, 0),
        text: "a < b & c",
    };
    doc.shape_writer().unwrap().text(&run).unwrap();
    doc.close_slide().unwrap();

    let slide = fs::read_to_string(doc.root().join("ppt/slides/slide1.xml")).unwrap();
    assert!(slide.contains(r#"<p:cNvSpPr txBox="0"/>"#));
    assert!(slide.contains(r#"<a:xfrm rot="-2700000"><a:off x="36000" y="72000"/><a:ext cx="1080000" cy="360000"/>"#));
    assert!(slide.contains(r#"<a:rPr b="1" i="0" strike="noStrike" lang="en" u="sng" sz="800">"#));
    assert!(slide.contains(r#"<a:latin typeface="Helvetica"/>"#));
    assert!(slide.contains("<a:t>a &lt; b &amp; c</a:t>"));
}

#[test]
fn test_state_machine_errors() {
    let dir = tempfile::tempdir().unwrap();
    let mut doc = Document::create(100.0, 100.0, 100, 100, &options_in(dir.path())).unwrap();

    assert!(matches!(doc.open_slide(), Err(ExportError::InvalidState(_))));
    let target = dir.path().join("early.pptx");
    assert!(matches!(doc.package(&target, &ZipArchiver), Err(ExportError::InvalidState(_))));

    doc.finalize().unwrap();
    assert!(matches!(doc.finalize(), Err(ExportError::InvalidState(_))));
    assert!(doc.shape_writer().is_err());

    doc.package(&target, &ZipArchiver).unwrap();
    let err = doc.package(&target, &ZipArchiver).unwrap_err();
    assert!(matches!(err, ExportError::InvalidState(_)));
    assert!(target.exists());
}

#[test]
fn test_abort_and_drop_remove_staging() {
    let dir = tempfile::tempdir().unwrap();

    let mut doc = Document::create(100.0, 100.0, 100, 100, &options_in(dir.path())).unwrap();
    let root = doc.root().to_path_buf();
    assert!(root.join("ppt/theme/theme1.xml").exists());
    doc.abort();
    doc.abort();
    assert_eq!(doc.state(), DocumentState::Aborted);
    assert!(!root.exists());

    let doc = Document::create(100.0, 100.0, 100, 100, &options_in(dir.path())).unwrap();
    let root = doc.root().to_path_buf();
    drop(doc);
    assert!(!root.exists());
    assert!(fs::read_dir(dir.path()).unwrap().next().is_none());
}

#[test]
fn test_create_rejects_bad_extent() {
    let dir = tempfile::tempdir().unwrap();
    let options = options_in(dir.path());
    assert!(Document::create(100.0, 100.0, 0, 100, &options).is_err());
    assert!(Document::create(0.0, 100.0, 100, 100, &options).is_err());
    assert!(fs::read_dir(dir.path()).unwrap().next().is_none());
}

#[test]
fn test_scale_from_physical_size() {
    let dir = tempfile::tempdir().unwrap();
    let doc = Document::create(270.0, 195.0, 1200, 866, &options_in(dir.path())).unwrap();
    assert_eq!(doc.scale().x(), 8100);
    assert_eq!(doc.slide_size(), (9_720_000, 7_020_000));
}
