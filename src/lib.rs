//! A simple Driver for 4.2" IL0398 monochrome E-Ink Displays via SPI
//!
//! This driver was built using [`embedded-hal`] traits.
//!
//! [`embedded-hal`]: https://docs.rs/embedded-hal/1
//!
//! # Requirements
//!
//! ### SPI
//!
//! - MISO is not connected/available
//! - SPI_MODE_0 is used (CPHL = 0, CPOL = 0)
//! - 8 bits per word, MSB first
//! - Up to 20Mhz
//!
//! The driver takes the raw [`SpiBus`](embedded_hal::spi::SpiBus) and drives chip-select itself,
//! so every command byte and every payload gets its own chip-select span.
//!
//! ### Other....
//!
//! - Buffersize: Wherever a buffer is used it always needs to be of the size: `width / 8 * height`,
//!   with `width` being a multiple of 8
//! - A bit set to 1 is a white pixel, the leftmost pixel of a byte is its MSB
//!
//! # Examples
//!
//! ```ignore
//! use epd_il0398::{epd4in2::*, prelude::*};
//!
//! let mut epd = Epd4in2::new(spi, cs, busy, dc, rst, delay, Display4in2::default(), Config::default());
//! epd.initialize()?;
//!
//! // draw something into the owned buffer
//! epd.buffer_mut().set_pixel(10, 10, Color::Black);
//! epd.display_frame()?;
//!
//! // or show a buffer you prepared yourself
//! let frame = [0xFFu8; buffer_len(400, 300)];
//! epd.display_buffer(&frame)?;
//!
//! epd.sleep()?;
//! // ...
//! epd.wake()?;
//! ```
#![no_std]

#[cfg(feature = "graphics")]
pub mod graphics;

mod traits;

pub mod buffer;
pub mod color;
pub mod error;
pub mod state;

/// Interface for the physical connection between display and the controlling device
mod interface;

pub mod epd4in2;

#[cfg(test)]
mod mock;

pub mod prelude {
    pub use crate::buffer::{Buffer, BufferError, DisplayRotation, VarBuffer};
    pub use crate::color::Color;
    pub use crate::error::ErrorKind;
    pub use crate::state::State;
    pub use crate::traits::PixelBuffer;
    pub use crate::{buffer_len, SPI_MODE};
}

use embedded_hal::spi::{Mode, Phase, Polarity};

/// SPI mode -
/// For more infos see [Requirements: SPI](index.html#spi)
pub const SPI_MODE: Mode = Mode {
    phase: Phase::CaptureOnFirstTransition,
    polarity: Polarity::IdleLow,
};

/// Computes the needed buffer length. Takes care of rounding up in case width
/// is not divisible by 8.
///
///  unused
///  bits        width
/// <----><------------------------>
/// \[XXXXX210\]\[76543210\]...\[76543210\] ^
/// \[XXXXX210\]\[76543210\]...\[76543210\] | height
/// \[XXXXX210\]\[76543210\]...\[76543210\] v
///
/// The buffers of this crate only accept widths divisible by 8, so there are
/// no unused bits there.
pub const fn buffer_len(width: usize, height: usize) -> usize {
    (width + 7) / 8 * height
}
