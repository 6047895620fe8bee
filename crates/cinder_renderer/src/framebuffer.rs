//! Color and depth buffers.
//!
//! Both are row-major with row 0 at the top of the image and column 0 at
//! the left.

use cinder_math::Color;

/// Row-major offset of (x, y), computed in `usize` so large frames don't
/// overflow `u32`.
#[inline]
fn pixel_index(width: u32, x: u32, y: u32) -> usize {
    y as usize * width as usize + x as usize
}

#[inline]
fn pixel_count(width: u32, height: u32) -> usize {
    width as usize * height as usize
}

/// Image being rendered into. Sized by the caller; the pipelines never
/// resize it.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameBuffer {
    width: u32,
    height: u32,
    pixels: Vec<Color>,
}

impl FrameBuffer {
    /// Create a new frame buffer filled with black.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![Color::BLACK; pixel_count(width, height)],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Width over height.
    pub fn aspect_ratio(&self) -> f32 {
        self.width as f32 / self.height as f32
    }

    /// Get the pixel at (x, y).
    pub fn get(&self, x: u32, y: u32) -> Color {
        self.pixels[self.index(x, y)]
    }

    /// Set the pixel at (x, y).
    pub fn set(&mut self, x: u32, y: u32, color: Color) {
        let index = self.index(x, y);
        self.pixels[index] = color;
    }

    /// Overwrite every pixel.
    pub fn fill(&mut self, color: Color) {
        self.pixels.fill(color);
    }

    pub fn pixels(&self) -> &[Color] {
        &self.pixels
    }

    /// Packed RGB bytes, ready for an image encoder or a texture upload.
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.pixels)
    }

    #[inline]
    fn index(&self, x: u32, y: u32) -> usize {
        pixel_index(self.width, x, y)
    }
}

/// Per-pixel depth of the nearest surface drawn so far.
///
/// Smaller is nearer; a cleared buffer holds +infinity everywhere.
#[derive(Debug, Clone)]
pub struct DepthBuffer {
    width: u32,
    height: u32,
    values: Vec<f32>,
}

impl DepthBuffer {
    /// Create a cleared depth buffer.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            values: vec![f32::INFINITY; pixel_count(width, height)],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Reset every entry to +infinity.
    pub fn clear(&mut self) {
        self.values.fill(f32::INFINITY);
    }

    /// Depth stored at (x, y).
    pub fn get(&self, x: u32, y: u32) -> f32 {
        self.values[pixel_index(self.width, x, y)]
    }

    /// Store `depth` at (x, y) if it is nearer than what is there.
    /// Returns true if the value was written.
    #[inline]
    pub fn test_and_set(&mut self, x: u32, y: u32, depth: f32) -> bool {
        let slot = &mut self.values[pixel_index(self.width, x, y)];
        if depth < *slot {
            *slot = depth;
            true
        } else {
            false
        }
    }

    pub fn values(&self) -> &[f32] {
        &self.values
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_buffer_layout() {
        let mut frame = FrameBuffer::new(4, 2);
        frame.set(3, 0, Color::WHITE);
        frame.set(0, 1, Color::new(1, 2, 3));

        // Row 0 is the top row
        assert_eq!(frame.pixels()[3], Color::WHITE);
        assert_eq!(frame.pixels()[4], Color::new(1, 2, 3));
        assert_eq!(frame.get(0, 1), Color::new(1, 2, 3));
        assert_eq!(frame.as_bytes().len(), 4 * 2 * 3);
        assert_eq!(&frame.as_bytes()[12..15], &[1, 2, 3]);
    }

    #[test]
    fn test_frame_buffer_fill() {
        let mut frame = FrameBuffer::new(3, 3);
        frame.fill(Color::gray(9));
        assert!(frame.pixels().iter().all(|&c| c == Color::gray(9)));
        assert_eq!(frame.aspect_ratio(), 1.0);
    }

    #[test]
    #[cfg(target_pointer_width = "64")]
    fn test_index_past_u32_range() {
        // 65536 * 65536 does not fit in a u32
        assert_eq!(pixel_count(65536, 65536), 1usize << 32);
        assert_eq!(pixel_index(65536, 5, 65535), 65535usize * 65536 + 5);
        assert_eq!(pixel_index(4, 3, 1), 7);
    }

    #[test]
    fn test_depth_nearer_wins() {
        let mut depth = DepthBuffer::new(2, 2);
        assert_eq!(depth.get(1, 1), f32::INFINITY);

        assert!(depth.test_and_set(1, 1, 0.5));
        assert!(!depth.test_and_set(1, 1, 0.7));
        assert!(!depth.test_and_set(1, 1, 0.5));
        assert!(depth.test_and_set(1, 1, -0.2));
        assert_eq!(depth.get(1, 1), -0.2);

        depth.clear();
        assert!(depth.values().iter().all(|d| *d == f32::INFINITY));
    }
}
