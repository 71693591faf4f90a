use crate::color::Color;

/// All commands need to have this trait which gives the address of the command
/// which needs to be send via SPI with activated CommandsPin (Data/Command Pin in CommandMode)
pub(crate) trait Command: Copy {
    fn address(self) -> u8;

    /// Number of parameter bytes following the command
    fn arity(self) -> Arity;
}

/// How many data bytes belong to a command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Arity {
    /// Exactly this many parameter bytes
    Fixed(usize),
    /// Any number of bytes, e.g. image data
    Stream,
}

impl Arity {
    pub(crate) fn accepts(self, len: usize) -> bool {
        match self {
            Arity::Fixed(n) => n == len,
            Arity::Stream => true,
        }
    }
}

/// A 1 bit per pixel frame as the controller expects it
///
/// Rows of `width / 8` bytes, the MSB of each byte is the leftmost of its
/// eight pixels and a set bit is white. `width` is always a multiple of 8,
/// implementors enforce that when they are created.
pub trait PixelBuffer {
    /// Width in pixels, unrotated
    fn width(&self) -> u32;

    /// Height in pixels, unrotated
    fn height(&self) -> u32;

    /// The packed frame, `width / 8 * height` bytes
    fn buffer(&self) -> &[u8];

    /// The packed frame for direct manipulation
    fn buffer_mut(&mut self) -> &mut [u8];

    /// Sets every pixel to `color`
    fn fill(&mut self, color: Color) {
        let value = color.get_byte_value();
        self.buffer_mut().fill(value);
    }

    /// Sets the pixel at (`x`, `y`) in panel coordinates.
    ///
    /// Pixels outside of the panel are ignored.
    fn set_pixel(&mut self, x: u32, y: u32, color: Color) {
        if x >= self.width() || y >= self.height() {
            return;
        }
        let (index, bit) = pixel_position(x, y, self.width());
        let byte = &mut self.buffer_mut()[index];
        match color {
            Color::White => *byte |= bit,
            Color::Black => *byte &= !bit,
        }
    }

    /// Color of the pixel at (`x`, `y`), `None` outside of the panel
    fn pixel(&self, x: u32, y: u32) -> Option<Color> {
        if x >= self.width() || y >= self.height() {
            return None;
        }
        let (index, bit) = pixel_position(x, y, self.width());
        Some(Color::from_bit(self.buffer()[index] & bit))
    }
}

/// byte index and bit mask of a pixel, MSB first
fn pixel_position(x: u32, y: u32, width: u32) -> (usize, u8) {
    let index = (y * (width / 8) + x / 8) as usize;
    (index, 0x80 >> (x % 8))
}
