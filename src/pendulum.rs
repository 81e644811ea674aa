// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! One region's simulation unit.  A unit owns a rectangle of the
//! canvas, the pendulum state seeded from that rectangle's center,
//! and a small state machine: it runs until the second arm flips or
//! the simulated-time budget runs out, and then it is frozen for good.

use color;
use color::Color;
use physics;
use physics::{PendulumParams, PendulumState};
use planes::{PixelRect, PlaneMapper};

/// How a finished region came to rest.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Outcome {
    /// The second arm crossed its upper dead center at this simulated
    /// time.
    Flipped(f64),
    /// The time budget ran out before a flip.
    TimedOut,
}

/// The lifecycle of a region.  A stopped region never integrates
/// again; it only goes away when subdivision replaces it with four
/// children.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Status {
    /// Still being integrated every tick.
    Running,
    /// Terminal.
    Stopped(Outcome),
}

/// A rectangle of the canvas and the double pendulum simulating it.
#[derive(Clone, Debug)]
pub struct PendulumUnit {
    /// The pixels this unit paints.
    pub rect: PixelRect,
    /// The owned pendulum state.  Frozen once stopped.
    pub state: PendulumState,
    /// Where the unit is in its lifecycle.
    pub status: Status,
    /// Accumulated simulated time.
    pub elapsed: f64,
    // Signed offset from the upper dead center after the previous
    // substep, for crossing detection.
    prev_upright: f64,
}

impl PendulumUnit {
    /// A fresh running unit for a rectangle, its angles derived from
    /// the rectangle's center, hanging with no initial motion.
    pub fn seeded(rect: PixelRect, mapper: &PlaneMapper) -> PendulumUnit {
        let angles = mapper.seed_for(&rect);
        let state = PendulumState::at_rest(angles.0, angles.1);
        let prev_upright = physics::upright_offset(state.theta2);
        PendulumUnit {
            rect,
            state,
            status: Status::Running,
            elapsed: 0.0,
            prev_upright,
        }
    }

    /// Whether the unit still integrates.
    pub fn is_running(&self) -> bool {
        self.status == Status::Running
    }

    /// Advance the unit by one tick: `substeps` integration steps of
    /// `dt` each, checking for a flip after every step.  Stops on the
    /// first flip, or when `elapsed` reaches `max_time` without one.
    /// A stopped unit ignores the call.
    pub fn tick(&mut self, params: &PendulumParams, dt: f64, substeps: usize, max_time: f64) {
        if let Status::Stopped(_) = self.status {
            return;
        }
        for _ in 0..substeps {
            self.state = physics::step(&self.state, params, dt);
            self.elapsed += dt;

            let upright = physics::upright_offset(self.state.theta2);
            if physics::crossed_upright(self.prev_upright, upright) {
                self.status = Status::Stopped(Outcome::Flipped(self.elapsed));
                return;
            }
            self.prev_upright = upright;

            if self.elapsed >= max_time {
                self.status = Status::Stopped(Outcome::TimedOut);
                return;
            }
        }
    }

    /// The unit's display color right now.  Pull-based on purpose:
    /// the paint rate is the render surface's business, not the
    /// simulation's.
    pub fn current_color(&self) -> Color {
        match self.status {
            Status::Running => color::running(self.state.theta2),
            Status::Stopped(Outcome::Flipped(t)) => color::flipped(t),
            Status::Stopped(Outcome::TimedOut) => color::TIMED_OUT,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use planes::AnglePoint;
    use std::f64::consts::{PI, TAU};

    fn mapper() -> PlaneMapper {
        PlaneMapper::new(64, 64, AnglePoint(0.0, 0.0), AnglePoint(TAU, PI)).unwrap()
    }

    #[test]
    fn seeded_unit_starts_running_at_rest() {
        let m = mapper();
        let unit = PendulumUnit::seeded(m.canvas(), &m);
        assert!(unit.is_running());
        assert_eq!(unit.state.omega1, 0.0);
        assert_eq!(unit.state.omega2, 0.0);
        assert_eq!(unit.state.theta1, PI);
        assert_eq!(unit.state.theta2, PI / 2.0);
        assert_eq!(unit.elapsed, 0.0);
    }

    #[test]
    fn near_rest_unit_times_out() {
        let m = mapper();
        // Top-left corner region: both angles tiny, the pendulum
        // barely sways and never gets near the dead center.
        let mut unit = PendulumUnit::seeded(PixelRect::new(0, 0, 2, 2), &m);
        for _ in 0..20 {
            unit.tick(&PendulumParams::standard(), 0.01, 120, 1.5);
        }
        assert_eq!(unit.status, Status::Stopped(Outcome::TimedOut));
    }

    #[test]
    fn spinning_arm_flips_and_freezes() {
        let m = mapper();
        let mut unit = PendulumUnit::seeded(PixelRect::new(0, 0, 2, 2), &m);
        // Hand the second arm enough spin to carry it over the top.
        unit.state = PendulumState {
            theta1: 0.0,
            theta2: 3.0,
            omega1: 0.0,
            omega2: 5.0,
        };
        unit.prev_upright = physics::upright_offset(3.0);
        unit.tick(&PendulumParams::standard(), 0.01, 120, 10.0);

        let flip_time = match unit.status {
            Status::Stopped(Outcome::Flipped(t)) => t,
            other => panic!("expected a flip, got {:?}", other),
        };
        assert!(flip_time > 0.0 && flip_time < 1.0);

        // Terminal: further ticks change nothing.
        let frozen = unit.state;
        let elapsed = unit.elapsed;
        unit.tick(&PendulumParams::standard(), 0.01, 120, 10.0);
        assert_eq!(unit.state, frozen);
        assert_eq!(unit.elapsed, elapsed);
    }

    #[test]
    fn identically_seeded_units_report_identical_flip_times() {
        let m = mapper();
        let rect = PixelRect::new(32, 8, 4, 4);
        let mut a = PendulumUnit::seeded(rect, &m);
        let mut b = PendulumUnit::seeded(rect, &m);
        for _ in 0..200 {
            a.tick(&PendulumParams::standard(), 0.01, 120, 60.0);
            b.tick(&PendulumParams::standard(), 0.01, 120, 60.0);
        }
        assert_eq!(a.status, b.status);
        assert_eq!(a.state, b.state);
    }

    #[test]
    fn stopped_color_is_frozen() {
        let m = mapper();
        let mut unit = PendulumUnit::seeded(PixelRect::new(0, 0, 2, 2), &m);
        unit.status = Status::Stopped(Outcome::TimedOut);
        assert_eq!(unit.current_color(), ::color::TIMED_OUT);
        unit.status = Status::Stopped(Outcome::Flipped(2.5));
        assert_eq!(unit.current_color(), ::color::flipped(2.5));
    }
}
