//! Linear RGB color

use serde::{Deserialize, Serialize};

/// RGB color with channels nominally in `[0, 1]`
///
/// Channels are deliberately not clamped: light ramps push them past 1.0
/// for over-bright effects.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    /// Red channel
    pub r: f32,
    /// Green channel
    pub g: f32,
    /// Blue channel
    pub b: f32,
}

impl Default for Color {
    fn default() -> Self {
        Self::WHITE
    }
}

impl Color {
    /// Pure white
    pub const WHITE: Self = Self::rgb(1.0, 1.0, 1.0);
    /// Pure black
    pub const BLACK: Self = Self::rgb(0.0, 0.0, 0.0);

    /// Construct from float channels
    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Construct from 8-bit channels
    pub fn from_rgb8(r: u8, g: u8, b: u8) -> Self {
        Self::rgb(
            f32::from(r) / 255.0,
            f32::from(g) / 255.0,
            f32::from(b) / 255.0,
        )
    }

    /// Construct from a packed `0xRRGGBB` value
    pub fn from_hex(hex: u32) -> Self {
        let [_, r, g, b] = hex.to_be_bytes();
        Self::from_rgb8(r, g, b)
    }

    /// Channels as an array
    pub fn to_array(self) -> [f32; 3] {
        [self.r, self.g, self.b]
    }

    /// Build from an array of channels
    pub fn from_array([r, g, b]: [f32; 3]) -> Self {
        Self::rgb(r, g, b)
    }

    /// Multiply every channel by `factor`
    #[must_use]
    pub fn scaled(self, factor: f32) -> Self {
        Self::rgb(self.r * factor, self.g * factor, self.b * factor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_from_hex() {
        let c = Color::from_hex(0xff_d8_3c);
        assert_relative_eq!(c.r, 1.0);
        assert_relative_eq!(c.g, 216.0 / 255.0);
        assert_relative_eq!(c.b, 60.0 / 255.0);
    }

    #[test]
    fn test_scaled() {
        assert_eq!(Color::WHITE.scaled(0.2), Color::rgb(0.2, 0.2, 0.2));
    }
}
