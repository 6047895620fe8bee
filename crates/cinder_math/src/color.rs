use bytemuck::{Pod, Zeroable};
use glam::Vec3;

/// An 8-bit RGB pixel, the element type of every frame buffer.
///
/// `#[repr(C)]` and `Pod` so a `&[Color]` can be handed to an image encoder
/// or a texture upload as tightly packed RGB bytes.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Pod, Zeroable)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const BLACK: Color = Color::new(0, 0, 0);
    pub const WHITE: Color = Color::new(255, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Same value on all three channels.
    pub const fn gray(value: u8) -> Self {
        Self::new(value, value, value)
    }

    /// Grayscale from a light intensity in [0, 1].
    pub fn from_intensity(intensity: f32) -> Self {
        Self::gray(unit_to_byte(intensity))
    }

    /// Convert a floating color with components in [0, 1].
    /// Out-of-range components saturate.
    pub fn from_unit(color: Vec3) -> Self {
        Self::new(
            unit_to_byte(color.x),
            unit_to_byte(color.y),
            unit_to_byte(color.z),
        )
    }

    /// Floating representation with components in [0, 1].
    pub fn to_unit(self) -> Vec3 {
        Vec3::new(self.r as f32, self.g as f32, self.b as f32) / 255.0
    }
}

impl From<[u8; 3]> for Color {
    fn from([r, g, b]: [u8; 3]) -> Self {
        Self::new(r, g, b)
    }
}

#[inline]
fn unit_to_byte(value: f32) -> u8 {
    (value * 255.0).clamp(0.0, 255.0) as u8
}
