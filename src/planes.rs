//! Contains the PlaneMapper struct, which describes a relationship
//! between a rectangle on the integral pixel plane with an origin at
//! 0,0, and a window in the starting-angle space of a double
//! pendulum, with an arbitrary pair of corners defining the lower and
//! upper bounds of the two arm angles.

/// Describes the width and height of an integral plane that is assumed
/// to start at 0,0 and all values are assumed to be non-negative
/// integers.  For that reason, the lower-left-hand corner is not
/// included.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct IntegralPlane(pub usize, pub usize);

/// A pair of starting angles for a double pendulum: the angle of the
/// first arm and the angle of the second arm, in radians, measured
/// from the downward vertical.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct AnglePoint(pub f64, pub f64);

/// Describes the corners of the angle window.  The first field holds
/// the (theta1, theta2) pair mapped to the pixel origin, the second
/// the pair mapped to the far corner of the canvas.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct AngleWindow(pub AnglePoint, pub AnglePoint);

/// Describes the x, y of a point in a region.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Pixel(pub usize, pub usize);

/// An axis-aligned rectangle of pixels on the canvas.  Regions of the
/// fractal are rectangles; the canvas itself is the rectangle at 0,0
/// spanning the whole integral plane.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct PixelRect {
    /// Leftmost column of the rectangle.
    pub x: usize,
    /// Topmost row of the rectangle.
    pub y: usize,
    /// Width in pixels.
    pub w: usize,
    /// Height in pixels.
    pub h: usize,
}

impl PixelRect {
    /// Constructor.
    pub fn new(x: usize, y: usize, w: usize, h: usize) -> PixelRect {
        PixelRect { x, y, w, h }
    }

    /// The center of the rectangle in continuous pixel coordinates.
    pub fn center(&self) -> (f64, f64) {
        (
            (self.x as f64) + (self.w as f64) / 2.0,
            (self.y as f64) + (self.h as f64) / 2.0,
        )
    }

    /// The number of pixels covered by the rectangle.
    pub fn area(&self) -> usize {
        self.w * self.h
    }

    /// The four quadrants of the rectangle.  Odd widths and heights
    /// are divided floor/ceil so the quadrants still tile the parent
    /// exactly.
    pub fn quadrants(&self) -> [PixelRect; 4] {
        let w0 = self.w / 2;
        let h0 = self.h / 2;
        let w1 = self.w - w0;
        let h1 = self.h - h0;
        [
            PixelRect::new(self.x, self.y, w0, h0),
            PixelRect::new(self.x + w0, self.y, w1, h0),
            PixelRect::new(self.x, self.y + h0, w0, h1),
            PixelRect::new(self.x + w0, self.y + h0, w1, h1),
        ]
    }
}

/// Contains the definitions of two planes: an integral cartesian
/// plane, and a window in angle space.  Maps points from one to the
/// other.  Every region's starting angles come from here, which is
/// what makes a rerun of the same canvas bit-reproducible.
#[derive(Debug)]
pub struct PlaneMapper {
    /// The right-lower corner of the integral cartesian plane.  The
    /// left-upper is assumed to be at 0,0.
    pub integral_plane: IntegralPlane,
    /// The two corners defining the angle window.
    pub angle_window: AngleWindow,
    // The ratio mapping the width and height of the integral plane to
    // the spans of theta1 and theta2, respectively.
    grid_factors: (f64, f64),
}

impl PlaneMapper {
    /// Constructor.  Takes the width and height of the integral plane,
    /// and two corners describing the angle window.  Has functions to
    /// map points inside one to points inside the other.
    pub fn new(
        width: usize,
        height: usize,
        lower: AnglePoint,
        upper: AnglePoint,
    ) -> Result<PlaneMapper, String> {
        if width == 0 || height == 0 {
            return Err("The canvas must be at least one pixel on each side.".to_string());
        }

        if upper.0 <= lower.0 {
            return Err(
                "The theta1 window is empty; its upper bound is not above its lower bound."
                    .to_string(),
            );
        }

        if upper.1 <= lower.1 {
            return Err(
                "The theta2 window is empty; its upper bound is not above its lower bound."
                    .to_string(),
            );
        }

        // Radians of starting angle per pixel, in each dimension.
        let grid_factors = (
            (upper.0 - lower.0) / (width as f64),
            (upper.1 - lower.1) / (height as f64),
        );

        Ok(PlaneMapper {
            integral_plane: IntegralPlane(width, height),
            angle_window: AngleWindow(lower, upper),
            grid_factors,
        })
    }

    /// The total number of points in the integral grid.  Used to
    /// calculate memory needs.
    pub fn len(&self) -> usize {
        self.integral_plane.0 * self.integral_plane.1
    }

    /// Describes that the integral plane is of a size.
    pub fn is_empty(&self) -> bool {
        self.integral_plane.0 == 0 || self.integral_plane.1 == 0
    }

    /// The rectangle covering the whole canvas.
    pub fn canvas(&self) -> PixelRect {
        PixelRect::new(0, 0, self.integral_plane.0, self.integral_plane.1)
    }

    /// Given a point in continuous pixel coordinates, map it linearly
    /// into the angle window.
    pub fn point_to_angles(&self, x: f64, y: f64) -> AnglePoint {
        AnglePoint(
            (self.angle_window.0).0 + x * self.grid_factors.0,
            (self.angle_window.0).1 + y * self.grid_factors.1,
        )
    }

    /// Given a pixel on the integral cartesian plane, map it as
    /// closely as possible to a point in the angle window.
    pub fn pixel_to_angles(&self, pixel: &Pixel) -> AnglePoint {
        self.point_to_angles(pixel.0 as f64, pixel.1 as f64)
    }

    /// The starting angles for a region: the linear image of the
    /// rectangle's center point.
    pub fn seed_for(&self, rect: &PixelRect) -> AnglePoint {
        let (cx, cy) = rect.center();
        self.point_to_angles(cx, cy)
    }
}
