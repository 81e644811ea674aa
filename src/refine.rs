// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The subdivision policy.  When a region stops, its flip time is
//! compared against each stopped neighbor's; close calls mean the
//! boundary between basins of behavior runs somewhere through those
//! regions, so both are replaced with four finer ones.  A region that
//! timed out carries no comparable value and is always refined.

use grid::RegionGrid;
use pendulum::{Outcome, Status};
use planes::PixelRect;

/// Neighboring flip times closer than this split both regions.
pub const FLIP_TIME_THRESHOLD: f64 = 0.9;

/// A region's report that it has come to rest, emitted once and
/// consumed by the controller after the tick that produced it.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct StopEvent {
    /// The region that stopped.
    pub id: usize,
    /// Its rectangle, kept here so the event stays usable even after
    /// the region itself has been split away by an earlier event in
    /// the same tick.
    pub rect: PixelRect,
    /// How it stopped.
    pub outcome: Outcome,
}

/// Decides which regions get refined.  All grid mutation funnels
/// through here, one event at a time, on the coordinator thread.
pub struct SubdivisionController {
    threshold: f64,
}

impl SubdivisionController {
    /// A controller with the standard threshold.
    pub fn new() -> SubdivisionController {
        SubdivisionController {
            threshold: FLIP_TIME_THRESHOLD,
        }
    }

    /// A controller with a custom threshold.
    pub fn with_threshold(threshold: f64) -> SubdivisionController {
        SubdivisionController { threshold }
    }

    /// Handle one stop event.  Marks the stopping region and any
    /// qualifying neighbors, performs the splits, and returns the ids
    /// of every child created.  Splits that fail the minimum-size
    /// check fall out silently; those regions are terminal leaves.
    pub fn on_stop(&self, grid: &mut RegionGrid, event: &StopEvent) -> Vec<usize> {
        let mut marked: Vec<usize> = Vec::new();

        match event.outcome {
            // A timed-out region yields no comparative data; always
            // refine it, alone.
            Outcome::TimedOut => marked.push(event.id),
            Outcome::Flipped(t_r) => {
                let neighbors = grid.neighbors(&event.rect);
                for id in neighbors.iter() {
                    let t_n = match grid.get(id).map(|u| u.status) {
                        Some(Status::Stopped(Outcome::Flipped(t))) => t,
                        // Running regions have nothing to compare
                        // yet, and timed-out regions never serve as
                        // comparison partners.
                        _ => continue,
                    };
                    if (t_r - t_n).abs() < self.threshold {
                        if marked.is_empty() {
                            marked.push(event.id);
                        }
                        marked.push(id);
                    }
                }
            }
        }

        let mut children = Vec::new();
        for id in marked {
            if let Some(kids) = grid.split(id) {
                children.extend(kids.iter().cloned());
            }
        }
        children
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use grid::RegionGrid;
    use pendulum::{Outcome, Status};
    use planes::{AnglePoint, PlaneMapper};
    use std::f64::consts::{PI, TAU};

    // A 2x2 lattice of 16x16 regions, everything splittable.
    fn quad_grid() -> RegionGrid {
        let mapper = PlaneMapper::new(32, 32, AnglePoint(0.0, 0.0), AnglePoint(TAU, PI)).unwrap();
        RegionGrid::with_uniform_grid(mapper, 8, 2).unwrap()
    }

    fn stop(grid: &mut RegionGrid, id: usize, outcome: Outcome) -> StopEvent {
        let unit = grid.get_mut(id).unwrap();
        unit.status = Status::Stopped(outcome);
        StopEvent {
            id,
            rect: unit.rect,
            outcome,
        }
    }

    // Two horizontally adjacent region ids from the lattice.
    fn adjacent_pair(grid: &RegionGrid) -> (usize, usize) {
        let ids = grid.running_ids();
        let a = ids[0];
        let rect = grid.get(a).unwrap().rect;
        let b = grid.neighbors(&rect).right[0];
        (a, b)
    }

    #[test]
    fn close_flip_times_split_both_regions() {
        let mut grid = quad_grid();
        let (a, b) = adjacent_pair(&grid);
        stop(&mut grid, b, Outcome::Flipped(1.85));
        let event = stop(&mut grid, a, Outcome::Flipped(1.00));

        // |1.00 - 1.85| = 0.85 < 0.9: both go.
        let children = SubdivisionController::new().on_stop(&mut grid, &event);
        assert_eq!(children.len(), 8);
        assert!(grid.get(a).is_none());
        assert!(grid.get(b).is_none());
        assert_eq!(grid.len(), 10);
    }

    #[test]
    fn distant_flip_times_split_nothing() {
        let mut grid = quad_grid();
        let (a, b) = adjacent_pair(&grid);
        stop(&mut grid, b, Outcome::Flipped(2.00));
        let event = stop(&mut grid, a, Outcome::Flipped(1.00));

        // |1.00 - 2.00| = 1.0 is not under the threshold.
        let children = SubdivisionController::new().on_stop(&mut grid, &event);
        assert!(children.is_empty());
        assert_eq!(grid.len(), 4);
    }

    #[test]
    fn timeout_always_splits_itself() {
        let mut grid = quad_grid();
        let (a, b) = adjacent_pair(&grid);
        stop(&mut grid, b, Outcome::Flipped(1.0));
        let event = stop(&mut grid, a, Outcome::TimedOut);

        let children = SubdivisionController::new().on_stop(&mut grid, &event);
        assert_eq!(children.len(), 4);
        assert!(grid.get(a).is_none());
        // The flipped neighbor is left alone.
        assert!(grid.get(b).is_some());
    }

    #[test]
    fn timed_out_neighbor_is_not_a_comparison_partner() {
        let mut grid = quad_grid();
        let (a, b) = adjacent_pair(&grid);
        stop(&mut grid, b, Outcome::TimedOut);
        let event = stop(&mut grid, a, Outcome::Flipped(1.0));

        let children = SubdivisionController::new().on_stop(&mut grid, &event);
        assert!(children.is_empty());
        assert!(grid.get(a).is_some());
        assert!(grid.get(b).is_some());
    }

    #[test]
    fn running_neighbors_are_ignored() {
        let mut grid = quad_grid();
        let (a, _) = adjacent_pair(&grid);
        let event = stop(&mut grid, a, Outcome::Flipped(1.0));

        let children = SubdivisionController::new().on_stop(&mut grid, &event);
        assert!(children.is_empty());
        assert_eq!(grid.len(), 4);
    }

    #[test]
    fn minimum_size_region_stays_a_stopped_leaf() {
        // A lattice whose cells are already at the minimum: marked
        // regions cannot split and keep their stopped state.
        let mapper = PlaneMapper::new(16, 16, AnglePoint(0.0, 0.0), AnglePoint(TAU, PI)).unwrap();
        let mut grid = RegionGrid::with_uniform_grid(mapper, 16, 2).unwrap();
        let (a, b) = adjacent_pair(&grid);
        stop(&mut grid, b, Outcome::Flipped(1.1));
        let event = stop(&mut grid, a, Outcome::Flipped(1.0));

        let children = SubdivisionController::new().on_stop(&mut grid, &event);
        assert!(children.is_empty());
        assert_eq!(grid.get(a).unwrap().status, Status::Stopped(Outcome::Flipped(1.0)));
        assert_eq!(grid.get(a).unwrap().current_color(), ::color::flipped(1.0));
    }

    #[test]
    fn multiple_close_neighbors_all_split() {
        let mut grid = quad_grid();
        let ids = grid.running_ids();
        let a = ids[0];
        let rect = grid.get(a).unwrap().rect;
        let right = grid.neighbors(&rect).right[0];
        let down = grid.neighbors(&rect).down[0];
        stop(&mut grid, right, Outcome::Flipped(1.2));
        stop(&mut grid, down, Outcome::Flipped(0.8));
        let event = stop(&mut grid, a, Outcome::Flipped(1.0));

        let children = SubdivisionController::new().on_stop(&mut grid, &event);
        assert_eq!(children.len(), 12);
        assert_eq!(grid.len(), 4 - 3 + 12);
    }
}
