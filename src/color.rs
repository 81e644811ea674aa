//! The color policy.  A running region shimmers with its second arm's
//! current angle, a flipped region is colored by when it flipped, and
//! a timed-out region goes a flat gray.

use angular_units::{Angle, Rad};
use num::clamp;
use prisma::{Hsv, Rgb};
use std::f64::consts::TAU;

/// An 8-bit RGB color, ready for a render surface.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Color(pub u8, pub u8, pub u8);

/// The flat color of a region that never flipped.
pub const TIMED_OUT: Color = Color(128, 128, 128);

// Saturation of the live animation; flipped regions get full
// saturation so the settled fractal reads stronger than the shimmer.
const RUNNING_SATURATION: f32 = 0.7;

// One full trip around the hue wheel per this many simulated time
// units of flip time.
const FLIP_HUE_PERIOD: f64 = 20.0;

fn from_hsv(hue: f64, saturation: f32, value: f32) -> Color {
    let hsv = Hsv::new(Rad::new(hue as f32), saturation, value);
    let rgb: Rgb<f32> = hsv.into();
    Color(
        clamp(rgb.red() * 255.0, 0.0, 255.0) as u8,
        clamp(rgb.green() * 255.0, 0.0, 255.0) as u8,
        clamp(rgb.blue() * 255.0, 0.0, 255.0) as u8,
    )
}

/// The live animation color: hue tracks the second arm's angle.
pub fn running(theta2: f64) -> Color {
    from_hsv(theta2.rem_euclid(TAU), RUNNING_SATURATION, 1.0)
}

/// The settled color of a flipped region: hue cycles with the flip
/// time, so neighborhoods with similar flip times shade together.
pub fn flipped(flip_time: f64) -> Color {
    from_hsv((flip_time / FLIP_HUE_PERIOD).fract() * TAU, 1.0, 1.0)
}
