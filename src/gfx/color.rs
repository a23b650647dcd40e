//! 16-bit-per-channel RGB color.

/// A color with 16 bits per channel.
///
/// Output devices that only support 8 bits per channel take the high
/// byte of each component, see [`Color::to_pixel`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Color {
    pub r: u16,
    pub g: u16,
    pub b: u16,
}

impl Color {
    pub const fn rgb_i16(r: u16, g: u16, b: u16) -> Self {
        Self { r, g, b }
    }

    /// Pack into a 0x00RRGGBB pixel value.
    pub fn to_pixel(&self) -> u32 {
        (((self.r >> 8) as u32) << 16) | (((self.g >> 8) as u32) << 8) | ((self.b >> 8) as u32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_pixel() {
        assert_eq!(Color::rgb_i16(0xffff, 0, 0).to_pixel(), 0x00ff0000);
        assert_eq!(Color::rgb_i16(0, 0xffff, 0).to_pixel(), 0x0000ff00);
        assert_eq!(Color::rgb_i16(0x8000, 0xc800, 0xffff).to_pixel(), 0x0080c8ff);
    }
}
