/// A single straight-alpha RGBA8 color.
///
/// Fully transparent colors are still colors, distinct from an empty [`Cell`].
/// Painting `a == 0` is allowed, it simply contributes nothing when composited.
#[repr(C)]
#[derive(
    Copy, Clone, PartialEq, Eq, Hash, Debug, Default, bytemuck::Pod, bytemuck::Zeroable,
)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

/// The contents of one grid cell. `None` is an empty (never painted, or erased) cell.
pub type Cell = Option<Color>;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseColorError {
    #[error("expected 3, 6, or 8 hex digits, found {0}")]
    BadLength(usize),
    #[error("invalid hex digit {0:?}")]
    BadDigit(char),
}

impl Color {
    pub const TRANSPARENT: Self = Self::rgba(0, 0, 0, 0);
    pub const BLACK: Self = Self::rgb(0, 0, 0);
    pub const WHITE: Self = Self::rgb(255, 255, 255);
    pub const RED: Self = Self::rgb(255, 0, 0);
    pub const GREEN: Self = Self::rgb(0, 255, 0);
    pub const BLUE: Self = Self::rgb(0, 0, 255);
    pub const YELLOW: Self = Self::rgb(255, 255, 0);

    #[must_use]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }
    #[must_use]
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }
    #[must_use]
    pub const fn as_array(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }
    #[must_use]
    pub const fn from_array([r, g, b, a]: [u8; 4]) -> Self {
        Self { r, g, b, a }
    }
    /// Channels as floats in `[0, 1]`, straight alpha.
    #[must_use]
    pub fn as_unit_floats(self) -> [f32; 4] {
        self.as_array().map(|c| f32::from(c) / 255.0)
    }
    /// Parse `#rgb`, `#rrggbb`, or `#rrggbbaa`. The leading `#` is optional.
    pub fn from_hex(hex: &str) -> Result<Self, ParseColorError> {
        let digits = hex.trim().trim_start_matches('#');
        let nibbles = digits
            .chars()
            .map(|c| {
                c.to_digit(16)
                    // Always < 16
                    .map(|d| d as u8)
                    .ok_or(ParseColorError::BadDigit(c))
            })
            .collect::<Result<Vec<u8>, _>>()?;

        let byte = |hi: u8, lo: u8| hi << 4 | lo;
        match nibbles.as_slice() {
            // Short form, each nibble is doubled. #f80 == #ff8800
            &[r, g, b] => Ok(Self::rgb(byte(r, r), byte(g, g), byte(b, b))),
            &[r1, r0, g1, g0, b1, b0] => Ok(Self::rgb(byte(r1, r0), byte(g1, g0), byte(b1, b0))),
            &[r1, r0, g1, g0, b1, b0, a1, a0] => Ok(Self::rgba(
                byte(r1, r0),
                byte(g1, g0),
                byte(b1, b0),
                byte(a1, a0),
            )),
            other => Err(ParseColorError::BadLength(other.len())),
        }
    }
}
impl std::str::FromStr for Color {
    type Err = ParseColorError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}
impl std::fmt::Display for Color {
    /// `#rrggbb`, or `#rrggbbaa` if not opaque.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)?;
        if self.a != 255 {
            write!(f, "{:02x}", self.a)?;
        }
        Ok(())
    }
}
