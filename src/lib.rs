#![deny(missing_docs)]
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Pendulabrot renderer
//!
//! The double pendulum is chaotic: hold both arms at some pair of
//! starting angles, let go, and the time until the second arm first
//! swings over the top ("flips") varies wildly with the tiniest
//! change in those angles.  Map a canvas onto starting-angle space,
//! one pendulum per region, color each region by its time-to-flip,
//! and the boundary between quick flips and never-flips draws a
//! fractal.
//!
//! Rather than simulating one pendulum per pixel, the renderer starts
//! with coarse regions and refines adaptively: when two neighboring
//! regions come to rest with flip times close enough to suggest the
//! interesting boundary passes between them, both are replaced by
//! four finer regions, down to a minimum region size.  Regions whose
//! pendulum never flips inside the time budget are always refined,
//! since they say nothing about where the boundary runs.

extern crate angular_units;
extern crate crossbeam;
extern crate itertools;
extern crate num;
extern crate prisma;

pub mod adaptive;
pub mod color;
pub mod grid;
pub mod pendulum;
pub mod physics;
pub mod planes;
pub mod refine;
pub mod render;

pub use adaptive::{AdaptiveConfig, AdaptiveRenderer, TickSummary};
pub use grid::RegionGrid;
pub use physics::{PendulumParams, PendulumState};
pub use planes::{AnglePoint, PlaneMapper};
pub use render::{PixelSurface, RenderAdapter};
