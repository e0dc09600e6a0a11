/// Line dash style of the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineStyle {
    #[default]
    Continuous,
    Dashed,
    Dotted,
    DashDot,
    DashDotDot,
    /// Dash pattern taken from the canvas' custom dash list
    Custom,
}

impl LineStyle {
    /// DrawingML `prstDash` value, `None` for custom dashes.
    pub fn preset(&self) -> Option<&'static str> {
        match self {
            Self::Continuous => Some("solid"),
            Self::Dashed => Some("sysDash"),
            Self::Dotted => Some("sysDot"),
            Self::DashDot => Some("sysDashDot"),
            Self::DashDotDot => Some("sysDashDotDot"),
            Self::Custom => None,
        }
    }
}

/// How closed areas are filled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InteriorStyle {
    #[default]
    Solid,
    Hatch,
    Pattern,
    Stipple,
    Hollow,
}

/// Hatch pattern used by [`InteriorStyle::Hatch`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HatchStyle {
    #[default]
    Horizontal,
    Vertical,
    ForwardDiagonal,
    BackwardDiagonal,
    Cross,
    DiagonalCross,
}

impl HatchStyle {
    /// DrawingML `pattFill` preset.
    pub fn preset(&self) -> &'static str {
        match self {
            Self::Horizontal => "ltHorz",
            Self::Vertical => "ltVert",
            Self::ForwardDiagonal => "ltDnDiag",
            Self::BackwardDiagonal => "ltUpDiag",
            Self::Cross => "smGrid",
            Self::DiagonalCross => "diagCross",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets() {
        assert_eq!(LineStyle::Continuous.preset(), Some("solid"));
        assert_eq!(LineStyle::DashDotDot.preset(), Some("sysDashDotDot"));
        assert_eq!(LineStyle::Custom.preset(), None);
        assert_eq!(HatchStyle::Cross.preset(), "smGrid");
        assert_eq!(HatchStyle::ForwardDiagonal.preset(), "ltDnDiag");
    }
}
