// Copyright (c) 2019 Georg Brandl.  Licensed under the Apache License,
// Version 2.0 <LICENSE-APACHE or http://www.apache.org/licenses/LICENSE-2.0>
// or the MIT license <LICENSE-MIT or http://opensource.org/licenses/MIT>, at
// your option. This file may not be copied, modified, or distributed except
// according to those terms.

use std::collections::HashMap;
use itertools::Itertools;

use crate::error::Error;
use crate::settings::RESERVED_PARAMS;

/// Integer grid cell coordinates.
pub type Cell = (i64, i64);

/// The rectangle covered by below-surface travel.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounds {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl Bounds {
    pub fn point(x: f64, y: f64) -> Self {
        Bounds { min_x: x, min_y: y, max_x: x, max_y: y }
    }

    pub fn fold(&mut self, x: f64, y: f64) {
        self.min_x = self.min_x.min(x);
        self.min_y = self.min_y.min(y);
        self.max_x = self.max_x.max(x);
        self.max_y = self.max_y.max(y);
    }

    pub fn width(&self) -> f64 { self.max_x - self.min_x }
    pub fn height(&self) -> f64 { self.max_y - self.min_y }
}

/// The probing grid laid over the board.
///
/// Cells are numbered from 0 to `cells_x`/`cells_y` inclusive.  The lower
/// bounds are padded by half a nominal pitch, and the adjusted pitch is chosen
/// so that the center of the last cell sits on the upper bound.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Grid {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
    pub cells_x: i64,
    pub cells_y: i64,
    pub pitch_x: f64,
    pub pitch_y: f64,
}

impl Grid {
    pub fn new(bounds: Bounds, pitch: f64) -> Self {
        let cells_x = (bounds.width() / pitch).ceil() as i64;
        let cells_y = (bounds.height() / pitch).ceil() as i64;
        let min_x = bounds.min_x - pitch / 2.;
        let min_y = bounds.min_y - pitch / 2.;
        Grid {
            min_x,
            min_y,
            max_x: bounds.max_x,
            max_y: bounds.max_y,
            cells_x,
            cells_y,
            pitch_x: (bounds.max_x - min_x) / (cells_x as f64 + 0.5),
            pitch_y: (bounds.max_y - min_y) / (cells_y as f64 + 0.5),
        }
    }

    /// Number of cells including both edges.
    pub fn len(&self) -> usize {
        let n = self.cells_x.saturating_add(1).saturating_mul(self.cells_y.saturating_add(1));
        usize::try_from(n).unwrap_or(usize::MAX)
    }

    pub fn cell_of(&self, x: f64, y: f64) -> Cell {
        let cx = ((x - self.min_x) / self.pitch_x).floor() as i64;
        let cy = ((y - self.min_y) / self.pitch_y).floor() as i64;
        (cx.max(0).min(self.cells_x), cy.max(0).min(self.cells_y))
    }

    pub fn center_of(&self, (cx, cy): Cell) -> (f64, f64) {
        (self.min_x + cx as f64 * self.pitch_x + self.pitch_x / 2.,
         self.min_y + cy as f64 * self.pitch_y + self.pitch_y / 2.)
    }

    /// Compute the interpolation stencil for a point.
    pub fn stencil(&self, x: f64, y: f64) -> Stencil {
        let (cx, cy) = self.cell_of(x, y);
        let os_x = (((x - self.min_x) - cx as f64 * self.pitch_x) / self.pitch_x).max(0.).min(1.);
        let os_y = (((y - self.min_y) - cy as f64 * self.pitch_y) / self.pitch_y).max(0.).min(1.);

        let neighbor = |c: i64, os: f64, max: i64| {
            let n = if os > 0.5 { c + 1 } else { c - 1 };
            if n < 0 || n > max { c } else { n }
        };
        let nx = neighbor(cx, os_x, self.cells_x);
        let ny = neighbor(cy, os_y, self.cells_y);

        let wx = 0.5 + if os_x > 0.5 { 1. - os_x } else { os_x };
        let wy = 0.5 + if os_y > 0.5 { 1. - os_y } else { os_y };

        Stencil {
            corners: [(cx, cy), (nx, cy), (cx, ny), (nx, ny)],
            weights: [wx * wy, (1. - wx) * wy, wx * (1. - wy), (1. - wx) * (1. - wy)],
        }
    }
}

/// Four cells and their bilinear weights.
///
/// Corners are ordered: own cell, X neighbor, Y neighbor, diagonal neighbor.
/// At the grid edge a missing neighbor is replaced by the own cell.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Stencil {
    pub corners: [Cell; 4],
    pub weights: [f64; 4],
}

/// Assigns a machine parameter number to each referenced grid cell.
///
/// Numbers are handed out in order of first reference and never change.
#[derive(Clone, Debug)]
pub struct CellTable {
    vars: HashMap<Cell, u16>,
    first: u16,
    next: u16,
}

impl CellTable {
    pub fn new(first: u16) -> Self {
        CellTable { vars: HashMap::new(), first, next: first }
    }

    pub fn ensure(&mut self, cell: Cell) -> Result<u16, Error> {
        if let Some(&var) = self.vars.get(&cell) {
            return Ok(var);
        }
        if self.next >= RESERVED_PARAMS {
            return Err(Error::TooManyCells { first: self.first, limit: RESERVED_PARAMS });
        }
        let var = self.next;
        self.vars.insert(cell, var);
        self.next += 1;
        Ok(var)
    }

    pub fn contains(&self, cell: Cell) -> bool {
        self.vars.contains_key(&cell)
    }

    pub fn get(&self, cell: Cell) -> Option<u16> {
        self.vars.get(&cell).cloned()
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }

    /// Allocated cells in probing order: row by row, alternating the
    /// direction on each row.
    pub fn serpentine(&self) -> Vec<(Cell, u16)> {
        let mut cells: Vec<_> = self.vars.iter().map(|(&cell, &var)| (cell, var)).collect();
        cells.sort_by_key(|&((gx, gy), _)| (gy, if gy % 2 == 1 { -gx } else { gx }));
        cells
    }
}

/// Build the depth formula for a point: the interpolated surface height plus
/// the depth parameter `#depth_par`.
pub fn formula(grid: &Grid, cells: &mut CellTable, x: f64, y: f64, depth_par: u16)
               -> Result<String, Error>
{
    let stencil = grid.stencil(x, y);
    let mut vars = [0; 4];
    for (var, &cell) in vars.iter_mut().zip(&stencil.corners) {
        *var = cells.ensure(cell)?;
    }
    let terms = stencil.weights.iter().zip(&vars)
                               .map(|(w, var)| format!("{:.3}*#{}", w, var));
    Ok(format!("{} + #{}", terms.format(" + "), depth_par))
}
