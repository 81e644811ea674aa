//! The boundary between the core and whatever displays the fractal.
//! The core only ever asks a surface to fill a rectangle with a color
//! and, when a consistent frame is ready, to refresh.  Windowing,
//! event loops, and file formats all live on the far side of this
//! trait.

use color::Color;
use planes::{IntegralPlane, PixelRect};

/// Anything that can show (or record) the fractal.
pub trait RenderAdapter {
    /// Fill a rectangle with one color.
    fn paint(&mut self, rect: &PixelRect, color: Color);
    /// A consistent frame has been fully painted.
    fn refresh(&mut self);
}

/// An in-memory RGB surface.  The CLI renders into one of these and
/// hands the buffer to the image encoder.
pub struct PixelSurface {
    bounds: IntegralPlane,
    pixels: Vec<u8>,
}

impl PixelSurface {
    /// A black surface of the given size.
    pub fn new(width: usize, height: usize) -> PixelSurface {
        PixelSurface {
            bounds: IntegralPlane(width, height),
            pixels: vec![0u8; width * height * 3],
        }
    }

    /// The surface dimensions.
    pub fn bounds(&self) -> IntegralPlane {
        self.bounds
    }

    /// The raw RGB bytes, three per pixel, row-major.
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }
}

impl RenderAdapter for PixelSurface {
    fn paint(&mut self, rect: &PixelRect, color: Color) {
        let IntegralPlane(width, height) = self.bounds;
        let x1 = (rect.x + rect.w).min(width);
        let y1 = (rect.y + rect.h).min(height);
        for y in rect.y.min(height)..y1 {
            for x in rect.x.min(width)..x1 {
                let offset = (y * width + x) * 3;
                self.pixels[offset] = color.0;
                self.pixels[offset + 1] = color.1;
                self.pixels[offset + 2] = color.2;
            }
        }
    }

    fn refresh(&mut self) {}
}
