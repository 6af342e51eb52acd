use crate::{color::Color, error::EditError};

/// Layer opacity, as an integer percentage.
///
/// Values above 100 are rejected rather than clamped, so a caller bug shows up as an
/// [`EditError::InvalidArgument`] instead of a silently different image.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct Opacity(u8);
impl Opacity {
    pub const TRANSPARENT: Self = Self(0);
    pub const OPAQUE: Self = Self(100);
    pub fn new(percent: u8) -> Result<Self, EditError> {
        if percent > 100 {
            Err(EditError::InvalidArgument(format!(
                "opacity must be within 0..=100, got {percent}"
            )))
        } else {
            Ok(Self(percent))
        }
    }
    #[must_use]
    pub fn percent(self) -> u8 {
        self.0
    }
    /// Opacity mapped onto `[0, 1]`.
    #[must_use]
    pub fn factor(self) -> f32 {
        f32::from(self.0) / 100.0
    }
}
impl Default for Opacity {
    fn default() -> Self {
        Self::OPAQUE
    }
}
impl TryFrom<u8> for Opacity {
    type Error = EditError;
    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// A premultiplied RGBA accumulator in `[0, 1]`.
#[derive(Copy, Clone, PartialEq, Debug, Default)]
pub struct Premultiplied([f32; 4]);
impl Premultiplied {
    pub const TRANSPARENT: Self = Self([0.0; 4]);
    /// Premultiply a straight color, modulating its alpha by `opacity`.
    #[must_use]
    pub fn from_color(color: Color, opacity: Opacity) -> Self {
        let [r, g, b, a] = color.as_unit_floats();
        let a = a * opacity.factor();
        Self([r * a, g * a, b * a, a])
    }
    #[must_use]
    pub fn alpha(self) -> f32 {
        self.0[3]
    }
    /// Porter-Duff source-over: `self` on top of `below`.
    #[must_use]
    pub fn over(self, below: Self) -> Self {
        let keep = 1.0 - self.alpha();
        let mut out = [0.0; 4];
        for ((out, src), dst) in out.iter_mut().zip(self.0).zip(below.0) {
            *out = src + dst * keep;
        }
        Self(out)
    }
    /// Un-premultiply back to straight RGBA8, rounding to nearest.
    /// Zero alpha always yields [`Color::TRANSPARENT`].
    #[must_use]
    pub fn to_color(self) -> Color {
        let a = self.alpha().clamp(0.0, 1.0);
        if a <= 0.0 {
            return Color::TRANSPARENT;
        }
        // Values are clamped to [0, 255] before the cast.
        let quantize = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        let [r, g, b, _] = self.0;
        Color::rgba(quantize(r / a), quantize(g / a), quantize(b / a), quantize(a))
    }
}

#[cfg(test)]
mod test {
    use super::{Opacity, Premultiplied};
    use crate::color::Color;

    #[test]
    fn opacity_rejects_out_of_range() {
        assert!(Opacity::new(100).is_ok());
        assert!(Opacity::new(0).is_ok());
        assert!(Opacity::new(101).is_err());
        assert!(Opacity::try_from(255).is_err());
    }
    #[test]
    fn opaque_over_anything_is_itself() {
        let below = Premultiplied::from_color(Color::BLUE, Opacity::OPAQUE);
        let top = Premultiplied::from_color(Color::RED, Opacity::OPAQUE);
        assert_eq!(top.over(below).to_color(), Color::RED);
    }
    #[test]
    fn half_red_over_blue() {
        let below = Premultiplied::from_color(Color::BLUE, Opacity::OPAQUE);
        let top = Premultiplied::from_color(Color::RED, Opacity::new(50).unwrap());
        assert_eq!(top.over(below).to_color(), Color::rgba(128, 0, 128, 255));
    }
    #[test]
    fn half_over_nothing_keeps_color() {
        let top = Premultiplied::from_color(Color::GREEN, Opacity::new(50).unwrap());
        assert_eq!(
            top.over(Premultiplied::TRANSPARENT).to_color(),
            Color::rgba(0, 255, 0, 128)
        );
    }
    #[test]
    fn zero_opacity_contributes_nothing() {
        let top = Premultiplied::from_color(Color::RED, Opacity::TRANSPARENT);
        assert_eq!(
            top.over(Premultiplied::TRANSPARENT).to_color(),
            Color::TRANSPARENT
        );
    }
}
