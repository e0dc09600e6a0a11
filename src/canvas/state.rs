/// Drawing state that a canvas driver reads when it renders a primitive.
use crate::common::{Color, HatchStyle, InteriorStyle, LineStyle};
use crate::ooxml::pptx::writer::{BackOpacity, Dash, FillSpec, PatternImage, StippleImage, Stroke};
use bitflags::bitflags;
use serde::{Deserialize, Serialize};

bitflags! {
    /// Font style bits.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    pub struct FontStyle: u8 {
        const BOLD = 0x01;
        const ITALIC = 0x02;
        const UNDERLINE = 0x04;
        const STRIKEOUT = 0x08;
    }
}

/// Which point of the text box sits on the reference point of a text call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextAlignment {
    North,
    South,
    East,
    West,
    NorthEast,
    NorthWest,
    SouthEast,
    SouthWest,
    Center,
    #[default]
    BaseLeft,
    BaseCenter,
    BaseRight,
}

impl TextAlignment {
    /// Aligned on the baseline.
    pub fn is_baseline(&self) -> bool {
        matches!(self, Self::BaseLeft | Self::BaseCenter | Self::BaseRight)
    }

    /// Aligned on the bottom edge.
    pub fn is_south(&self) -> bool {
        matches!(self, Self::South | Self::SouthEast | Self::SouthWest)
    }

    /// Aligned on the top edge.
    pub fn is_north(&self) -> bool {
        matches!(self, Self::North | Self::NorthEast | Self::NorthWest)
    }

    /// Aligned on the left edge.
    pub fn is_west(&self) -> bool {
        matches!(self, Self::West | Self::NorthWest | Self::SouthWest | Self::BaseLeft)
    }

    /// Aligned on the right edge.
    pub fn is_east(&self) -> bool {
        matches!(self, Self::East | Self::NorthEast | Self::SouthEast | Self::BaseRight)
    }
}

/// Selected font.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Font {
    pub typeface: String,
    pub style: FontStyle,
    /// Points when positive, pixels when negative
    pub size: i32,
}

impl Default for Font {
    fn default() -> Self {
        Self {
            typeface: "System".to_string(),
            style: FontStyle::empty(),
            size: 12,
        }
    }
}

/// Attributes shared by every primitive drawn on a canvas.
#[derive(Debug, Clone)]
pub struct CanvasState {
    pub foreground: Color,
    pub background: Color,
    /// Line width in pixels
    pub line_width: i32,
    pub line_style: LineStyle,
    /// Dash and gap lengths in pixels for [`LineStyle::Custom`]
    pub line_dashes: Vec<i32>,
    pub interior_style: InteriorStyle,
    pub hatch_style: HatchStyle,
    pub back_opacity: BackOpacity,
    pub pattern: Option<PatternImage>,
    pub stipple: Option<StippleImage>,
    pub font: Font,
    pub text_alignment: TextAlignment,
    /// Text rotation in degrees, counter-clockwise
    pub text_orientation: f64,
    /// Device y grows downwards
    pub invert_y: bool,
}

impl Default for CanvasState {
    fn default() -> Self {
        Self {
            foreground: Color::BLACK,
            background: Color::WHITE,
            line_width: 1,
            line_style: LineStyle::Continuous,
            line_dashes: Vec::new(),
            interior_style: InteriorStyle::Solid,
            hatch_style: HatchStyle::Horizontal,
            back_opacity: BackOpacity::Transparent,
            pattern: None,
            stipple: None,
            font: Font::default(),
            text_alignment: TextAlignment::BaseLeft,
            text_orientation: 0.0,
            invert_y: true,
        }
    }
}

impl CanvasState {
    /// Use `pattern` for filled primitives from now on.
    pub fn set_pattern(&mut self, pattern: PatternImage) {
        self.pattern = Some(pattern);
        self.interior_style = InteriorStyle::Pattern;
    }

    /// Use `stipple` for filled primitives from now on.
    pub fn set_stipple(&mut self, stipple: StippleImage) {
        self.stipple = Some(stipple);
        self.interior_style = InteriorStyle::Stipple;
    }

    /// Custom dash lengths; switches the line style to [`LineStyle::Custom`].
    pub fn set_line_dashes(&mut self, dashes: &[i32]) {
        self.line_dashes = dashes.to_vec();
        self.line_style = LineStyle::Custom;
    }

    pub fn set_font(&mut self, typeface: &str, style: FontStyle, size: i32) {
        self.font = Font {
            typeface: typeface.to_string(),
            style,
            size,
        };
    }

    /// Outline drawn by line and shape primitives.
    pub fn stroke(&self) -> Stroke {
        Stroke {
            width: self.line_width,
            color: self.foreground,
            dash: Dash::from_style(self.line_style, &self.line_dashes, self.line_width),
        }
    }

    /// Interior of filled primitives.
    ///
    /// A pattern or stipple style without an image falls back to a solid
    /// foreground fill.
    pub fn fill(&self) -> FillSpec<'_> {
        match self.interior_style {
            InteriorStyle::Solid => FillSpec::Solid(self.foreground),
            InteriorStyle::Hatch => FillSpec::Hatch {
                style: self.hatch_style,
                fg: self.foreground,
                bg: self.background,
            },
            InteriorStyle::Pattern => match &self.pattern {
                Some(pattern) => FillSpec::Pattern(pattern),
                None => FillSpec::Solid(self.foreground),
            },
            InteriorStyle::Stipple => match &self.stipple {
                Some(image) => FillSpec::Stipple {
                    image,
                    fg: self.foreground,
                    bg: self.background,
                    back_opacity: self.back_opacity,
                },
                None => FillSpec::Solid(self.foreground),
            },
            InteriorStyle::Hollow => FillSpec::Hollow,
        }
    }
}
