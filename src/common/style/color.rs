use std::fmt;

/// RGBA color.
///
/// Canvas colors travel packed in a `u32` as `0xTTRRGGBB`, where the top byte
/// holds *transparency* (255 - alpha). A plain `0x00RRGGBB` literal is
/// therefore fully opaque.
///
/// # Examples
///
/// ```rust
/// use canvas_pptx::common::Color;
///
/// let red = Color::rgb(255, 0, 0);
/// assert_eq!(red.to_hex(), "FF0000");
/// assert_eq!(Color::from_packed(0x00FF0000), red);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    /// Opacity (255 is opaque)
    pub a: u8,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);

    #[inline]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    #[inline]
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Decode a packed canvas color.
    #[inline]
    pub const fn from_packed(packed: u32) -> Self {
        Self {
            r: (packed >> 16) as u8,
            g: (packed >> 8) as u8,
            b: packed as u8,
            a: 255 - (packed >> 24) as u8,
        }
    }

    /// Encode into the packed canvas form.
    #[inline]
    pub const fn to_packed(self) -> u32 {
        ((255 - self.a) as u32) << 24 | (self.r as u32) << 16 | (self.g as u32) << 8 | self.b as u32
    }

    #[inline]
    pub const fn with_alpha(self, a: u8) -> Self {
        Self { a, ..self }
    }

    #[inline]
    pub const fn is_opaque(&self) -> bool {
        self.a == 255
    }

    /// Convert to hex string (without # prefix and without alpha).
    pub fn to_hex(&self) -> String {
        format!("{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::BLACK
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.to_hex())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_packed_transparency_byte() {
        let c = Color::from_packed(0x80_10_20_30);
        assert_eq!((c.r, c.g, c.b), (0x10, 0x20, 0x30));
        assert_eq!(c.a, 127);
        assert_eq!(Color::rgba(1, 2, 3, 200).to_packed(), 0x37_01_02_03);
        assert_eq!(Color::from_packed(Color::rgba(9, 8, 7, 6).to_packed()), Color::rgba(9, 8, 7, 6));
    }

    #[test]
    fn test_display() {
        assert_eq!(Color::rgb(0, 128, 255).to_string(), "#0080FF");
        assert!(Color::WHITE.is_opaque());
        assert!(!Color::WHITE.with_alpha(3).is_opaque());
    }
}
