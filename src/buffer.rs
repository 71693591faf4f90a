//! Pixel buffers for the 1 bit per pixel frame
//!
//! [`Buffer`] owns its bytes and has its size fixed at compile time,
//! [`VarBuffer`] borrows a slice and is sized at runtime. Both implement
//! [`PixelBuffer`] and can be handed to the driver, and with the `graphics`
//! feature both are `embedded-graphics` draw targets.

use crate::buffer_len;
use crate::color::Color;
use crate::traits::PixelBuffer;

/// Display rotation, only 90° increments supported
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum DisplayRotation {
    /// No rotation
    #[default]
    Rotate0,
    /// Rotate by 90 degrees clockwise
    Rotate90,
    /// Rotate by 180 degrees clockwise
    Rotate180,
    /// Rotate 270 degrees clockwise
    Rotate270,
}

impl DisplayRotation {
    /// Maps a point of the rotated drawing area onto panel coordinates.
    ///
    /// Returns `None` if the point lies outside of the panel.
    pub(crate) fn to_panel(self, x: i32, y: i32, width: u32, height: u32) -> Option<(u32, u32)> {
        // as i32 = never use more than 2 billion pixel per line or per column
        let (w, h) = (width as i32, height as i32);
        let (x, y) = match self {
            DisplayRotation::Rotate0 => (x, y),
            DisplayRotation::Rotate90 => (w - 1 - y, x),
            DisplayRotation::Rotate180 => (w - 1 - x, h - 1 - y),
            DisplayRotation::Rotate270 => (y, h - 1 - x),
        };

        if x < 0 || x >= w || y < 0 || y >= h {
            return None;
        }
        Some((x as u32, y as u32))
    }

    /// Size of the drawing area seen through this rotation
    pub(crate) fn dimensions(self, width: u32, height: u32) -> (u32, u32) {
        match self {
            DisplayRotation::Rotate0 | DisplayRotation::Rotate180 => (width, height),
            DisplayRotation::Rotate90 | DisplayRotation::Rotate270 => (height, width),
        }
    }
}

/// Error found during creation of a [`VarBuffer`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BufferError {
    /// The controller addresses whole bytes per row
    WidthNotMultipleOf8,
    /// The provided buffer was too small
    BufferTooSmall,
}

/// Frame buffer with its characteristics fixed at compile time
///
/// - WIDTH: width in pixel when display is not rotated, a multiple of 8
/// - HEIGHT: height in pixel when display is not rotated
/// - BYTECOUNT: `buffer_len(WIDTH, HEIGHT)`. This is redundant and should be
///   removed when const generic expressions are stabilized
///
/// A mismatch between these fails the build as soon as the buffer is created.
pub struct Buffer<const WIDTH: u32, const HEIGHT: u32, const BYTECOUNT: usize> {
    buffer: [u8; BYTECOUNT],
    rotation: DisplayRotation,
}

impl<const WIDTH: u32, const HEIGHT: u32, const BYTECOUNT: usize> Buffer<WIDTH, HEIGHT, BYTECOUNT> {
    const LAYOUT: () = assert!(
        WIDTH % 8 == 0 && BYTECOUNT == buffer_len(WIDTH as usize, HEIGHT as usize),
        "WIDTH must be a multiple of 8 and BYTECOUNT must be WIDTH / 8 * HEIGHT"
    );

    /// Creates an all white buffer
    // inline is necessary here to allow heap allocation via Box on stack limited programs
    #[inline(always)]
    pub fn new() -> Self {
        #[allow(clippy::let_unit_value)]
        let () = Self::LAYOUT;
        Self {
            buffer: [Color::White.get_byte_value(); BYTECOUNT],
            rotation: DisplayRotation::default(),
        }
    }

    /// Set the display rotation.
    ///
    /// This only concerns future drawing made to it. Anything aready drawn
    /// stays as it is in the buffer.
    pub fn set_rotation(&mut self, rotation: DisplayRotation) {
        self.rotation = rotation;
    }

    /// Get current rotation
    pub fn rotation(&self) -> DisplayRotation {
        self.rotation
    }

    /// Set a pixel given in rotated coordinates
    pub fn draw_pixel(&mut self, x: i32, y: i32, color: Color) {
        if let Some((x, y)) = self.rotation.to_panel(x, y, WIDTH, HEIGHT) {
            self.set_pixel(x, y, color);
        }
    }
}

impl<const WIDTH: u32, const HEIGHT: u32, const BYTECOUNT: usize> Default
    for Buffer<WIDTH, HEIGHT, BYTECOUNT>
{
    #[inline(always)]
    fn default() -> Self {
        Self::new()
    }
}

impl<const WIDTH: u32, const HEIGHT: u32, const BYTECOUNT: usize> PixelBuffer
    for Buffer<WIDTH, HEIGHT, BYTECOUNT>
{
    fn width(&self) -> u32 {
        WIDTH
    }

    fn height(&self) -> u32 {
        HEIGHT
    }

    fn buffer(&self) -> &[u8] {
        &self.buffer
    }

    fn buffer_mut(&mut self) -> &mut [u8] {
        &mut self.buffer
    }
}

/// Same as [`Buffer`], except that its characteristics are defined at runtime
/// and the bytes are borrowed.
pub struct VarBuffer<'a> {
    width: u32,
    height: u32,
    buffer: &'a mut [u8],
    rotation: DisplayRotation,
}

impl<'a> VarBuffer<'a> {
    /// You must allocate the buffer by yourself, it must be large enough to contain all pixels.
    ///
    /// Bytes past `width / 8 * height` are left alone. The content isn't
    /// cleared, call [`fill`](PixelBuffer::fill) for a defined start.
    pub fn new(width: u32, height: u32, buffer: &'a mut [u8]) -> Result<Self, BufferError> {
        if width % 8 != 0 {
            return Err(BufferError::WidthNotMultipleOf8);
        }
        if buffer_len(width as usize, height as usize) > buffer.len() {
            return Err(BufferError::BufferTooSmall);
        }
        Ok(Self {
            width,
            height,
            buffer,
            rotation: DisplayRotation::default(),
        })
    }

    /// get the number of used bytes in the buffer
    fn buffer_size(&self) -> usize {
        buffer_len(self.width as usize, self.height as usize)
    }

    /// Set the display rotation.
    ///
    /// This only concerns future drawing made to it. Anything aready drawn
    /// stays as it is in the buffer.
    pub fn set_rotation(&mut self, rotation: DisplayRotation) {
        self.rotation = rotation;
    }

    /// Get current rotation
    pub fn rotation(&self) -> DisplayRotation {
        self.rotation
    }

    /// Set a pixel given in rotated coordinates
    pub fn draw_pixel(&mut self, x: i32, y: i32, color: Color) {
        if let Some((x, y)) = self.rotation.to_panel(x, y, self.width, self.height) {
            self.set_pixel(x, y, color);
        }
    }
}

impl PixelBuffer for VarBuffer<'_> {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn buffer(&self) -> &[u8] {
        &self.buffer[..self.buffer_size()]
    }

    fn buffer_mut(&mut self) -> &mut [u8] {
        let size = self.buffer_size();
        &mut self.buffer[..size]
    }
}
