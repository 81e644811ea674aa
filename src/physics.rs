// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The equations of motion for a double pendulum, the Runge-Kutta
//! integrator that advances them, and the detector for the second arm
//! crossing its upper dead center.
//!
//! Everything here is deterministic: the same state and parameters
//! always produce the same next state, bit for bit.  Two regions
//! seeded with the same angles therefore always report the same flip
//! time, which is the property the whole subdivision scheme rests on.

use std::f64::consts::PI;

/// Mass and length constants for both arms, plus gravity.  One set is
/// shared read-only by every region on the canvas and never mutated
/// after startup.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PendulumParams {
    /// Mass of the first bob.
    pub m1: f64,
    /// Mass of the second bob.
    pub m2: f64,
    /// Length of the first arm.
    pub l1: f64,
    /// Length of the second arm.
    pub l2: f64,
    /// Acceleration of gravity.
    pub g: f64,
}

impl PendulumParams {
    /// Constructor.  All five constants must be strictly positive for
    /// the equations of motion to stay well-defined.
    pub fn new(m1: f64, m2: f64, l1: f64, l2: f64, g: f64) -> Result<PendulumParams, String> {
        if m1 <= 0.0 || m2 <= 0.0 {
            return Err("Pendulum masses must be strictly positive.".to_string());
        }
        if l1 <= 0.0 || l2 <= 0.0 {
            return Err("Pendulum arm lengths must be strictly positive.".to_string());
        }
        if g <= 0.0 {
            return Err("Gravity must be strictly positive.".to_string());
        }
        Ok(PendulumParams { m1, m2, l1, l2, g })
    }

    /// Unit masses, equal unit arms, earth gravity.
    pub fn standard() -> PendulumParams {
        PendulumParams {
            m1: 1.0,
            m2: 1.0,
            l1: 1.0,
            l2: 1.0,
            g: 9.81,
        }
    }
}

/// The instantaneous state of one double pendulum: the two arm angles
/// in radians from the downward vertical, and their angular
/// velocities.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PendulumState {
    /// Angle of the first arm.
    pub theta1: f64,
    /// Angle of the second arm.
    pub theta2: f64,
    /// Angular velocity of the first arm.
    pub omega1: f64,
    /// Angular velocity of the second arm.
    pub omega2: f64,
}

impl PendulumState {
    /// A pendulum held at the given angles with no initial motion.
    pub fn at_rest(theta1: f64, theta2: f64) -> PendulumState {
        PendulumState {
            theta1,
            theta2,
            omega1: 0.0,
            omega2: 0.0,
        }
    }

    /// True when every component is a normal, finite number.
    pub fn is_finite(&self) -> bool {
        self.theta1.is_finite()
            && self.theta2.is_finite()
            && self.omega1.is_finite()
            && self.omega2.is_finite()
    }
}

/// The time derivative of a PendulumState.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Derivative {
    /// Rate of change of theta1, i.e. omega1.
    pub dtheta1: f64,
    /// Rate of change of theta2, i.e. omega2.
    pub dtheta2: f64,
    /// Angular acceleration of the first arm.
    pub domega1: f64,
    /// Angular acceleration of the second arm.
    pub domega2: f64,
}

/// The standard equations of motion for two point masses on rigid
/// massless rods under uniform gravity.  Pure: no side effects, no
/// internal state.  The denominator 2*m1 + m2 - m2*cos(2(t1 - t2)) is
/// bounded below by 2*m1, so the derivative is finite for every
/// finite state as long as masses and lengths are positive.
pub fn derivative(state: &PendulumState, params: &PendulumParams) -> Derivative {
    let (t1, t2) = (state.theta1, state.theta2);
    let (w1, w2) = (state.omega1, state.omega2);
    let (m1, m2) = (params.m1, params.m2);
    let (l1, l2) = (params.l1, params.l2);
    let g = params.g;

    let delta = t1 - t2;
    let den = 2.0 * m1 + m2 - m2 * (2.0 * delta).cos();

    let domega1 = (-g * (2.0 * m1 + m2) * t1.sin()
        - m2 * g * (t1 - 2.0 * t2).sin()
        - 2.0 * delta.sin() * m2 * (w2 * w2 * l2 + w1 * w1 * l1 * delta.cos()))
        / (l1 * den);

    let domega2 = (2.0
        * delta.sin()
        * (w1 * w1 * l1 * (m1 + m2) + g * (m1 + m2) * t1.cos() + w2 * w2 * l2 * m2 * delta.cos()))
        / (l2 * den);

    Derivative {
        dtheta1: w1,
        dtheta2: w2,
        domega1,
        domega2,
    }
}

// Euler substep used to build the Runge-Kutta stages.
fn offset(state: &PendulumState, d: &Derivative, h: f64) -> PendulumState {
    PendulumState {
        theta1: state.theta1 + d.dtheta1 * h,
        theta2: state.theta2 + d.dtheta2 * h,
        omega1: state.omega1 + d.domega1 * h,
        omega2: state.omega2 + d.domega2 * h,
    }
}

/// Advance one fixed time step with the classical 4th-order
/// Runge-Kutta scheme.  Panics if the result is non-finite, which for
/// valid parameters indicates a broken invariant upstream; NaN must
/// not leak into the grid.
pub fn step(state: &PendulumState, params: &PendulumParams, dt: f64) -> PendulumState {
    let k1 = derivative(state, params);
    let k2 = derivative(&offset(state, &k1, dt * 0.5), params);
    let k3 = derivative(&offset(state, &k2, dt * 0.5), params);
    let k4 = derivative(&offset(state, &k3, dt), params);

    let sixth = dt / 6.0;
    let next = PendulumState {
        theta1: state.theta1 + sixth * (k1.dtheta1 + 2.0 * k2.dtheta1 + 2.0 * k3.dtheta1 + k4.dtheta1),
        theta2: state.theta2 + sixth * (k1.dtheta2 + 2.0 * k2.dtheta2 + 2.0 * k3.dtheta2 + k4.dtheta2),
        omega1: state.omega1 + sixth * (k1.domega1 + 2.0 * k2.domega1 + 2.0 * k3.domega1 + k4.domega1),
        omega2: state.omega2 + sixth * (k1.domega2 + 2.0 * k2.domega2 + 2.0 * k3.domega2 + k4.domega2),
    };

    assert!(
        next.is_finite(),
        "non-finite pendulum state after integration step: {:?}",
        next
    );
    next
}

/// Wrap an angle to the canonical range [-pi, pi].
pub fn wrap_to_pi(angle: f64) -> f64 {
    let tau = 2.0 * PI;
    angle - tau * (angle / tau).round()
}

/// The second arm's signed offset from its upper dead center.  Zero
/// means the arm points straight up.
pub fn upright_offset(theta2: f64) -> f64 {
    wrap_to_pi(theta2 - PI)
}

/// Whether the upright offset crossed zero between two consecutive
/// integration steps.  A sign change alone is not enough: the wrapped
/// coordinate also flips sign when the arm swings through the
/// downward vertical, so the crossing must be small.  Steps that jump
/// the dead center entirely are accepted as detection misses.
pub fn crossed_upright(prev: f64, cur: f64) -> bool {
    (prev < 0.0) != (cur < 0.0) && (cur - prev).abs() < PI
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derivative_is_finite_over_angle_grid() {
        let params = PendulumParams::standard();
        for i in 0..16 {
            for j in 0..16 {
                let t1 = (i as f64) * PI / 8.0;
                let t2 = (j as f64) * PI / 8.0;
                for &w in &[-8.0, 0.0, 8.0] {
                    let s = PendulumState {
                        theta1: t1,
                        theta2: t2,
                        omega1: w,
                        omega2: -w,
                    };
                    let d = derivative(&s, &params);
                    assert!(d.domega1.is_finite() && d.domega2.is_finite(), "{:?}", s);
                }
            }
        }
    }

    #[test]
    fn derivative_is_zero_at_stable_rest() {
        let params = PendulumParams::standard();
        let d = derivative(&PendulumState::at_rest(0.0, 0.0), &params);
        assert_eq!(d.dtheta1, 0.0);
        assert_eq!(d.dtheta2, 0.0);
        assert_eq!(d.domega1, 0.0);
        assert_eq!(d.domega2, 0.0);
    }

    #[test]
    fn derivative_is_bit_deterministic() {
        let params = PendulumParams::standard();
        let s = PendulumState {
            theta1: 2.3,
            theta2: 0.7,
            omega1: -1.1,
            omega2: 4.9,
        };
        assert_eq!(derivative(&s, &params), derivative(&s, &params));
    }

    #[test]
    fn step_is_bit_reproducible() {
        let params = PendulumParams::standard();
        let mut a = PendulumState::at_rest(PI, PI / 2.0);
        let mut b = PendulumState::at_rest(PI, PI / 2.0);
        for _ in 0..1000 {
            a = step(&a, &params, 0.01);
            b = step(&b, &params, 0.01);
        }
        assert_eq!(a, b);
    }

    #[test]
    fn params_reject_degenerate_values() {
        assert!(PendulumParams::new(0.0, 1.0, 1.0, 1.0, 9.81).is_err());
        assert!(PendulumParams::new(1.0, 1.0, -1.0, 1.0, 9.81).is_err());
        assert!(PendulumParams::new(1.0, 1.0, 1.0, 1.0, 0.0).is_err());
        assert!(PendulumParams::new(1.0, 1.0, 1.0, 1.0, 9.81).is_ok());
    }

    #[test]
    fn wrap_to_pi_stays_in_range() {
        for i in -20..20 {
            let a = (i as f64) * 0.7;
            let w = wrap_to_pi(a);
            assert!(w > -PI - 1e-12 && w <= PI + 1e-12, "{} -> {}", a, w);
        }
    }

    #[test]
    fn upright_offset_is_zero_at_the_top() {
        assert_eq!(upright_offset(PI), 0.0);
        assert!(upright_offset(PI + 0.1) > 0.0);
        assert!(upright_offset(PI - 0.1) < 0.0);
        // One full turn later is still the dead center.
        assert!(upright_offset(3.0 * PI).abs() < 1e-12);
    }

    #[test]
    fn crossing_detected_in_both_directions() {
        assert!(crossed_upright(-0.05, 0.02));
        assert!(crossed_upright(0.02, -0.05));
        assert!(!crossed_upright(0.02, 0.05));
        assert!(!crossed_upright(-0.05, -0.02));
    }

    #[test]
    fn downward_seam_is_not_a_crossing() {
        // Swinging through the bottom flips the sign of the wrapped
        // offset with a jump of nearly 2*pi; that is not a flip.
        assert!(!crossed_upright(-PI + 0.01, PI - 0.01));
        assert!(!crossed_upright(PI - 0.01, -PI + 0.01));
    }
}
