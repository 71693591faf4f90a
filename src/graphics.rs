//! Graphics Support for EPDs
//!
//! Both buffers are `embedded-graphics` draw targets. Drawing goes through
//! the buffer's [`DisplayRotation`](crate::buffer::DisplayRotation), pixels
//! outside of the panel are skipped.

use crate::buffer::{Buffer, VarBuffer};
use crate::color::Color;
use crate::traits::PixelBuffer;
use embedded_graphics_core::prelude::*;

/// For use with embedded_grahics
impl<const WIDTH: u32, const HEIGHT: u32, const BYTECOUNT: usize> DrawTarget
    for Buffer<WIDTH, HEIGHT, BYTECOUNT>
{
    type Color = Color;
    type Error = core::convert::Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, color) in pixels {
            self.draw_pixel(point.x, point.y, color);
        }
        Ok(())
    }

    fn clear(&mut self, color: Self::Color) -> Result<(), Self::Error> {
        self.fill(color);
        Ok(())
    }
}

/// For use with embedded_grahics
impl<const WIDTH: u32, const HEIGHT: u32, const BYTECOUNT: usize> OriginDimensions
    for Buffer<WIDTH, HEIGHT, BYTECOUNT>
{
    fn size(&self) -> Size {
        let (width, height) = self.rotation().dimensions(WIDTH, HEIGHT);
        Size::new(width, height)
    }
}

/// For use with embedded_grahics
impl DrawTarget for VarBuffer<'_> {
    type Color = Color;
    type Error = core::convert::Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, color) in pixels {
            self.draw_pixel(point.x, point.y, color);
        }
        Ok(())
    }

    fn clear(&mut self, color: Self::Color) -> Result<(), Self::Error> {
        self.fill(color);
        Ok(())
    }
}

/// For use with embedded_grahics
impl OriginDimensions for VarBuffer<'_> {
    fn size(&self) -> Size {
        let (width, height) = self.rotation().dimensions(self.width(), self.height());
        Size::new(width, height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::DisplayRotation;
    use crate::epd4in2::{Display4in2, HEIGHT, WIDTH};
    use embedded_graphics::{
        primitives::{Line, Primitive, PrimitiveStyle},
        Drawable,
    };

    // Test that rotation is handled correctly: each line ends up in the
    // first byte of the panel
    fn check_first_byte_drawn(display: &Display4in2) {
        let buffer = display.buffer();
        assert_eq!(buffer[0], Color::Black.get_byte_value());
        for &byte in buffer.iter().skip(1) {
            assert_eq!(byte, Color::White.get_byte_value());
        }
    }

    #[test]
    fn graphics_size() {
        let mut display = Display4in2::default();
        assert_eq!(display.size(), Size::new(WIDTH, HEIGHT));
        display.set_rotation(DisplayRotation::Rotate90);
        assert_eq!(display.size(), Size::new(HEIGHT, WIDTH));
    }

    #[test]
    fn graphics_rotation_0() {
        let mut display = Display4in2::default();
        let _ = Line::new(Point::new(0, 0), Point::new(7, 0))
            .into_styled(PrimitiveStyle::with_stroke(Color::Black, 1))
            .draw(&mut display);

        check_first_byte_drawn(&display);
    }

    #[test]
    fn graphics_rotation_90() {
        let mut display = Display4in2::default();
        display.set_rotation(DisplayRotation::Rotate90);
        let _ = Line::new(Point::new(0, WIDTH as i32 - 8), Point::new(0, WIDTH as i32 - 1))
            .into_styled(PrimitiveStyle::with_stroke(Color::Black, 1))
            .draw(&mut display);

        check_first_byte_drawn(&display);
    }

    #[test]
    fn graphics_rotation_180() {
        let mut display = Display4in2::default();
        display.set_rotation(DisplayRotation::Rotate180);
        let _ = Line::new(
            Point::new(WIDTH as i32 - 8, HEIGHT as i32 - 1),
            Point::new(WIDTH as i32 - 1, HEIGHT as i32 - 1),
        )
        .into_styled(PrimitiveStyle::with_stroke(Color::Black, 1))
        .draw(&mut display);

        check_first_byte_drawn(&display);
    }

    #[test]
    fn graphics_rotation_270() {
        let mut display = Display4in2::default();
        display.set_rotation(DisplayRotation::Rotate270);
        let _ = Line::new(Point::new(HEIGHT as i32 - 1, 0), Point::new(HEIGHT as i32 - 1, 7))
            .into_styled(PrimitiveStyle::with_stroke(Color::Black, 1))
            .draw(&mut display);

        check_first_byte_drawn(&display);
    }

    #[test]
    fn clear_fills_whole_buffer() {
        let mut display = Display4in2::default();
        display.clear(Color::Black).unwrap();
        assert!(display.buffer().iter().all(|&byte| byte == 0x00));
    }

    #[test]
    fn var_buffer_draws_off_panel_silently() {
        let mut bytes = [0xffu8; 8];
        let mut display = VarBuffer::new(16, 4, &mut bytes).unwrap();
        display.set_rotation(DisplayRotation::Rotate90);
        assert_eq!(display.size(), Size::new(4, 16));

        let _ = Line::new(Point::new(-3, 0), Point::new(20, 0))
            .into_styled(PrimitiveStyle::with_stroke(Color::Black, 1))
            .draw(&mut display);

        // row 0 of the rotated view is the last panel column
        for y in 0..4 {
            assert_eq!(display.pixel(15, y), Some(Color::Black));
            assert_eq!(display.pixel(14, y), Some(Color::White));
        }
    }
}
