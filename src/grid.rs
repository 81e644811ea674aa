// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The arena of live regions.  Regions are keyed by a monotonically
//! increasing id; adjacency is recomputed geometrically from the
//! rectangles, so a region's neighbor can sit at any subdivision
//! depth.  The grid performs splits but holds no opinion about when
//! to split; that policy lives in the refine module.
//!
//! Invariant: the region rectangles exactly tile the canvas at all
//! times.  A split replaces one rectangle with its four quadrants, so
//! the invariant is preserved by construction.

use std::collections::BTreeMap;

use itertools::iproduct;

use pendulum::PendulumUnit;
use planes::{PixelRect, PlaneMapper};

/// Edge-adjacent regions of a rectangle, one bucket per side.  At a
/// canvas edge the bucket is empty; against finer neighbors a bucket
/// holds several ids.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Neighbors {
    /// Regions touching the top edge.
    pub up: Vec<usize>,
    /// Regions touching the bottom edge.
    pub down: Vec<usize>,
    /// Regions touching the left edge.
    pub left: Vec<usize>,
    /// Regions touching the right edge.
    pub right: Vec<usize>,
}

impl Neighbors {
    /// All neighbor ids, in side order.
    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.up
            .iter()
            .chain(self.down.iter())
            .chain(self.left.iter())
            .chain(self.right.iter())
            .cloned()
    }
}

/// The full set of currently-displayed regions.  A BTreeMap rather
/// than a hash map: iteration order feeds the tick scheduler and the
/// stop-event queue, and must be reproducible across runs.
pub struct RegionGrid {
    mapper: PlaneMapper,
    regions: BTreeMap<usize, PendulumUnit>,
    counter: usize,
    min_split: usize,
}

impl RegionGrid {
    /// A grid with a single region spanning the whole canvas.
    /// `min_split` is the smallest width or height a region may have
    /// and still be splittable; it must be at least 2 so that no
    /// split can produce an empty quadrant.
    pub fn new(mapper: PlaneMapper, min_split: usize) -> Result<RegionGrid, String> {
        if min_split < 2 {
            return Err("The minimum splittable size must be at least 2 pixels.".to_string());
        }
        let mut grid = RegionGrid {
            mapper,
            regions: BTreeMap::new(),
            counter: 0,
            min_split,
        };
        let canvas = grid.mapper.canvas();
        grid.insert(canvas);
        Ok(grid)
    }

    /// A grid pre-tiled into an n-by-n lattice of regions instead of
    /// one canvas-spanning region.  Cell boundaries come from integer
    /// division, so uneven canvases still tile exactly.
    pub fn with_uniform_grid(
        mapper: PlaneMapper,
        min_split: usize,
        n: usize,
    ) -> Result<RegionGrid, String> {
        if n == 0 {
            return Err("The initial lattice must have at least one cell.".to_string());
        }
        let mut grid = RegionGrid::new(mapper, min_split)?;
        if n == 1 {
            return Ok(grid);
        }
        grid.regions.clear();
        let PixelRect { w, h, .. } = grid.mapper.canvas();
        for (j, i) in iproduct!(0..n, 0..n) {
            let x0 = i * w / n;
            let x1 = (i + 1) * w / n;
            let y0 = j * h / n;
            let y1 = (j + 1) * h / n;
            if x1 > x0 && y1 > y0 {
                grid.insert(PixelRect::new(x0, y0, x1 - x0, y1 - y0));
            }
        }
        Ok(grid)
    }

    // Seed and register a fresh running unit for a rectangle.
    fn insert(&mut self, rect: PixelRect) -> usize {
        self.counter += 1;
        let id = self.counter;
        self.regions.insert(id, PendulumUnit::seeded(rect, &self.mapper));
        id
    }

    /// Number of live regions.
    pub fn len(&self) -> usize {
        self.regions.len()
    }

    /// Whether the grid holds no regions at all.
    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    /// The coordinate mapping shared by every region.
    pub fn mapper(&self) -> &PlaneMapper {
        &self.mapper
    }

    /// Look up one region.
    pub fn get(&self, id: usize) -> Option<&PendulumUnit> {
        self.regions.get(&id)
    }

    /// Look up one region mutably.
    pub fn get_mut(&mut self, id: usize) -> Option<&mut PendulumUnit> {
        self.regions.get_mut(&id)
    }

    /// Every live region, in id order.
    pub fn units(&self) -> impl Iterator<Item = &PendulumUnit> {
        self.regions.values()
    }

    /// Ids of the regions still integrating, in id order.
    pub fn running_ids(&self) -> Vec<usize> {
        self.regions
            .iter()
            .filter(|&(_, u)| u.is_running())
            .map(|(&id, _)| id)
            .collect()
    }

    /// Mutable references to the running regions, for the tick
    /// worker pool.
    pub fn running_mut(&mut self) -> Vec<&mut PendulumUnit> {
        self.regions
            .values_mut()
            .filter(|u| u.is_running())
            .collect()
    }

    /// How many regions are still integrating.
    pub fn running_count(&self) -> usize {
        self.regions.values().filter(|u| u.is_running()).count()
    }

    /// How many regions have stopped.
    pub fn stopped_count(&self) -> usize {
        self.regions.values().filter(|u| !u.is_running()).count()
    }

    /// The regions sharing an edge with a rectangle, bucketed by
    /// side.  Pure geometry: subdivision depth does not matter, and a
    /// rectangle at the canvas edge simply has an empty bucket on
    /// that side.  Corner contact does not count.
    pub fn neighbors(&self, rect: &PixelRect) -> Neighbors {
        let mut found = Neighbors::default();
        for (&id, unit) in &self.regions {
            let o = unit.rect;
            let h_overlap = o.x < rect.x + rect.w && rect.x < o.x + o.w;
            let v_overlap = o.y < rect.y + rect.h && rect.y < o.y + o.h;
            if o.y + o.h == rect.y && h_overlap {
                found.up.push(id);
            } else if rect.y + rect.h == o.y && h_overlap {
                found.down.push(id);
            } else if o.x + o.w == rect.x && v_overlap {
                found.left.push(id);
            } else if rect.x + rect.w == o.x && v_overlap {
                found.right.push(id);
            }
        }
        found
    }

    /// Replace a region with its four quadrants, each seeded as a
    /// fresh running unit from its own center.  Returns the child
    /// ids, or None as a no-op when the region is gone or too small
    /// to split; a too-small region keeps its stopped state forever,
    /// which is what terminates the recursion.
    pub fn split(&mut self, id: usize) -> Option<[usize; 4]> {
        let rect = match self.regions.get(&id) {
            Some(unit) => unit.rect,
            None => return None,
        };
        if rect.w < self.min_split || rect.h < self.min_split {
            return None;
        }
        Some(self.replace(id, rect.quadrants()))
    }

    // The atomic part of a split: drop the parent, register the
    // children.
    fn replace(&mut self, id: usize, quadrants: [PixelRect; 4]) -> [usize; 4] {
        self.regions.remove(&id);
        [
            self.insert(quadrants[0]),
            self.insert(quadrants[1]),
            self.insert(quadrants[2]),
            self.insert(quadrants[3]),
        ]
    }
}
