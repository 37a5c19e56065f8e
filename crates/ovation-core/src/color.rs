/// RGBA color, 8 bits per channel.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Color(pub u8, pub u8, pub u8, pub u8);

impl Color {
    /// `alpha` in 0.0..=1.0, CSS-style.
    pub fn from_rgba(r: u8, g: u8, b: u8, alpha: f32) -> Self {
        Color(r, g, b, (alpha.clamp(0.0, 1.0) * 255.0).round() as u8)
    }
}
