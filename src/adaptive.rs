// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The adaptive renderer: drives every running region forward one
//! tick at a time, collects the regions that stopped, and feeds them
//! to the subdivision controller.
//!
//! Regions are embarrassingly parallel within a tick, so integration
//! fans out over a scoped worker pool pulling units from a shared
//! queue.  The scope join is the tick barrier: no stop event is
//! processed until every unit has finished the tick, and all grid
//! mutation happens serially on the coordinator thread afterwards.

use std::sync::{Arc, Mutex};

use crossbeam;

use grid::RegionGrid;
use pendulum::Status;
use physics::PendulumParams;
use refine::{StopEvent, SubdivisionController};
use render::RenderAdapter;

/// Integration and scheduling knobs for a render.
#[derive(Copy, Clone, Debug)]
pub struct AdaptiveConfig {
    /// Size of one integration step, in simulated time.
    pub dt: f64,
    /// Integration steps per tick.
    pub substeps: usize,
    /// Simulated time budget per region; past this a region stops as
    /// timed out.
    pub max_time: f64,
    /// Worker threads for the per-tick integration.
    pub threads: usize,
}

impl AdaptiveConfig {
    /// The defaults the original rendering was tuned with: dt of
    /// 0.01, 120 steps per tick, and a generous time budget.
    pub fn standard() -> AdaptiveConfig {
        AdaptiveConfig {
            dt: 0.01,
            substeps: 120,
            max_time: 120.0,
            threads: 1,
        }
    }

    fn validate(&self) -> Result<(), String> {
        if !(self.dt > 0.0 && self.dt.is_finite()) {
            return Err("The integration step must be a positive, finite number.".to_string());
        }
        if self.substeps == 0 {
            return Err("Each tick must run at least one integration step.".to_string());
        }
        if !(self.max_time > 0.0 && self.max_time.is_finite()) {
            return Err("The time budget must be a positive, finite number.".to_string());
        }
        if self.threads == 0 {
            return Err("The worker pool needs at least one thread.".to_string());
        }
        Ok(())
    }
}

/// What one tick did.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct TickSummary {
    /// Regions that came to rest during the tick.
    pub stopped: usize,
    /// Child regions created by subdivision during the tick.
    pub spawned: usize,
}

/// Owns the grid and the knobs, and runs the simulate/compare/split
/// loop until every region has settled.
pub struct AdaptiveRenderer {
    grid: RegionGrid,
    params: PendulumParams,
    config: AdaptiveConfig,
    controller: SubdivisionController,
}

impl AdaptiveRenderer {
    /// Constructor.  The grid carries the canvas geometry and any
    /// initial lattice; the params are shared read-only by every
    /// region.
    pub fn new(
        grid: RegionGrid,
        params: PendulumParams,
        config: AdaptiveConfig,
    ) -> Result<AdaptiveRenderer, String> {
        config.validate()?;
        Ok(AdaptiveRenderer {
            grid,
            params,
            config,
            controller: SubdivisionController::new(),
        })
    }

    /// The current region set.
    pub fn grid(&self) -> &RegionGrid {
        &self.grid
    }

    /// True once no region is running.  With every leaf at the
    /// minimum splittable size this is the designed end of the
    /// recursion, not an error.
    pub fn is_settled(&self) -> bool {
        self.grid.running_count() == 0
    }

    /// Advance every running region by one tick, then process the
    /// stop events serially.
    pub fn tick(&mut self) -> TickSummary {
        let before = self.grid.running_ids();
        if before.is_empty() {
            return TickSummary::default();
        }

        {
            let params = &self.params;
            let dt = self.config.dt;
            let substeps = self.config.substeps;
            let max_time = self.config.max_time;
            let threads = self.config.threads;
            let queue = Arc::new(Mutex::new(self.grid.running_mut()));
            crossbeam::scope(|spawner| {
                for _ in 0..threads {
                    let queue = queue.clone();
                    spawner.spawn(move |_| loop {
                        let unit = { queue.lock().unwrap().pop() };
                        match unit {
                            Some(unit) => unit.tick(params, dt, substeps, max_time),
                            None => break,
                        }
                    });
                }
            })
            .unwrap();
        }

        // The tick barrier has passed; anything that was running
        // before and is stopped now gets a stop event, in id order.
        let mut events = Vec::new();
        for id in before {
            if let Some(unit) = self.grid.get(id) {
                if let Status::Stopped(outcome) = unit.status {
                    events.push(StopEvent {
                        id,
                        rect: unit.rect,
                        outcome,
                    });
                }
            }
        }

        let mut spawned = 0;
        for event in &events {
            spawned += self.controller.on_stop(&mut self.grid, event).len();
        }

        TickSummary {
            stopped: events.len(),
            spawned,
        }
    }

    /// Tick until the grid settles or the cap is reached.  Returns
    /// the number of ticks executed.
    pub fn run(&mut self, max_ticks: usize) -> usize {
        for ticks in 0..max_ticks {
            if self.is_settled() {
                return ticks;
            }
            self.tick();
        }
        max_ticks
    }

    /// Paint every region's current color and signal a frame.  The
    /// adapter sees one paint per region, coarse regions and fine
    /// ones alike.
    pub fn render(&self, adapter: &mut dyn RenderAdapter) {
        for unit in self.grid.units() {
            adapter.paint(&unit.rect, unit.current_color());
        }
        adapter.refresh();
    }
}
