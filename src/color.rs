//! B/W Color for EPDs

#[cfg(feature = "graphics")]
use embedded_graphics_core::pixelcolor::{BinaryColor, PixelColor};

/// Only for the Black/White-Displays
///
/// A white pixel is a set bit, a black pixel a cleared one.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum Color {
    /// Black color
    Black,
    /// White color
    #[default]
    White,
}

impl Color {
    /// Get the color encoding of the color for one bit
    pub fn get_bit_value(&self) -> u8 {
        match self {
            Color::White => 1u8,
            Color::Black => 0u8,
        }
    }

    /// Gets a full byte of black or white pixels
    pub fn get_byte_value(&self) -> u8 {
        match self {
            Color::White => 0xff,
            Color::Black => 0x00,
        }
    }

    /// Returns the inverse of the given color.
    ///
    /// Black returns White and White returns Black
    pub fn inverse(&self) -> Color {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }

    /// Any set bit is white
    pub(crate) fn from_bit(bit: u8) -> Color {
        if bit == 0 {
            Color::Black
        } else {
            Color::White
        }
    }

    /// Color of pixel `pos` inside a packed byte.
    ///
    /// pos is counted from the left (highest value) from 0 to 7
    pub fn from_byte(byte: u8, pos: u8) -> Color {
        Color::from_bit((byte >> (7 - (pos & 7))) & 1)
    }
}

#[cfg(feature = "graphics")]
impl PixelColor for Color {
    type Raw = ();
}

/// `On` is ink, so it maps to black
#[cfg(feature = "graphics")]
impl From<BinaryColor> for Color {
    fn from(b: BinaryColor) -> Color {
        match b {
            BinaryColor::On => Color::Black,
            BinaryColor::Off => Color::White,
        }
    }
}
