// Copyright (c) 2019 Georg Brandl.  Licensed under the Apache License,
// Version 2.0 <LICENSE-APACHE or http://www.apache.org/licenses/LICENSE-2.0>
// or the MIT license <LICENSE-MIT or http://opensource.org/licenses/MIT>, at
// your option. This file may not be copied, modified, or distributed except
// according to those terms.

//! The leveling pipeline.
//!
//! Leveling happens in three passes, each represented by its own type:
//!
//! * [`Planner`] consumes the program, splits long moves below the surface
//!   and finds the extent of the routed area, yielding a [`Planned`] program.
//! * [`Planned::interpolate`] replaces the depth of every cutting and drilling
//!   move by a formula over the probed heights, yielding a [`Leveled`] program.
//! * The `Display` impl of [`Leveled`] renders the final program including the
//!   probing routine.

mod emit;
pub mod grid;
pub mod split;

use tracing::{debug, info, warn};

use crate::command::{Command, Kind, Units};
use crate::error::Error;
use crate::settings::Settings;

pub use self::grid::{Bounds, Cell, CellTable, Grid, Stencil};

/// Parameter holding the route depth in the generated program.
pub const ROUTE_DEPTH_PAR: u16 = 3;
/// Parameter holding the drill spot depth in the generated program.
pub const DRILL_DEPTH_PAR: u16 = 7;

/// Current tool location.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Position {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Position {
    /// The position after executing a move.  Missing axis words leave the
    /// coordinate unchanged.
    pub fn after(&self, cmd: &Command) -> Position {
        Position {
            x: cmd.x().unwrap_or(self.x),
            y: cmd.y().unwrap_or(self.y),
            z: cmd.z().unwrap_or(self.z),
        }
    }

    pub fn move_to(&mut self, cmd: &Command) {
        *self = self.after(cmd);
    }

    /// Execute a drill cycle and return the bottom of the hole.  The tool
    /// ends up at the retract plane if one is given.
    ///
    /// `depth` is the modal hole depth: a cycle without a Z word drills to
    /// the depth of the previous cycle.
    pub fn drill(&mut self, cmd: &Command, depth: &mut Option<f64>) -> Position {
        let z = cmd.z().or(*depth).unwrap_or(self.z);
        let bottom = Position { z, ..self.after(cmd) };
        *depth = Some(z);
        *self = Position { z: cmd.get('R').unwrap_or(z), ..bottom };
        bottom
    }
}

/// Everything learned about the board in the first pass.
#[derive(Clone, Debug, PartialEq)]
pub struct Board {
    pub units: Units,
    /// Nominal grid pitch in program units.
    pub pitch: f64,
    pub split_over: f64,
    pub bounds: Option<Bounds>,
    /// Lowest Z of all cutting moves.
    pub route_depth: Option<f64>,
    pub has_drill_spots: bool,
    /// Z of the first drill cycle.
    pub drill_spot_depth: Option<f64>,
    /// `None` if nothing is cut below the surface.
    pub grid: Option<Grid>,
}

/// First pass: collects commands, splitting long moves, and measures the board.
pub struct Planner {
    settings: Settings,
    units: Units,
    pos: Position,
    drill_z: Option<f64>,
    bounds: Option<Bounds>,
    route_depth: Option<f64>,
    has_drill_spots: bool,
    drill_spot_depth: Option<f64>,
    commands: Vec<Command>,
    splits: usize,
}

impl Planner {
    pub fn new(settings: Settings) -> Result<Self, Error> {
        settings.validate()?;
        Ok(Planner {
            settings,
            units: Units::default(),
            pos: Position::default(),
            drill_z: None,
            bounds: None,
            route_depth: None,
            has_drill_spots: false,
            drill_spot_depth: None,
            commands: vec![],
            splits: 0,
        })
    }

    fn fold(&mut self, x: f64, y: f64) {
        match &mut self.bounds {
            Some(bounds) => bounds.fold(x, y),
            None => self.bounds = Some(Bounds::point(x, y)),
        }
    }

    pub fn feed(&mut self, cmd: Command) {
        match cmd.kind() {
            Kind::Units(units) => {
                if units != self.units {
                    debug!("line {}: switching to {}", cmd.lineno, units);
                }
                self.units = units;
                self.commands.push(cmd);
            }
            Kind::RapidMove | Kind::LinearMove => {
                let origin = self.pos;
                if origin.after(&cmd).z < 0. {
                    self.fold(origin.x, origin.y);
                }
                let threshold = self.settings.split_over_in(self.units);
                let leaves = split::split(origin, cmd, threshold);
                if leaves.len() > 1 {
                    debug!("line {}: split move into {} segments", leaves[0].lineno, leaves.len());
                    self.splits += 1;
                }
                for leaf in leaves {
                    self.pos.move_to(&leaf);
                    if self.pos.z < 0. {
                        self.fold(self.pos.x, self.pos.y);
                        let depth = self.route_depth.map_or(self.pos.z, |d| d.min(self.pos.z));
                        self.route_depth = Some(depth);
                    }
                    self.commands.push(leaf);
                }
            }
            Kind::DrillCycle => {
                let bottom = self.pos.drill(&cmd, &mut self.drill_z);
                self.has_drill_spots = true;
                if self.drill_spot_depth.is_none() {
                    self.drill_spot_depth = cmd.z();
                }
                if bottom.z < 0. {
                    self.fold(bottom.x, bottom.y);
                }
                self.commands.push(cmd);
            }
            Kind::Other => self.commands.push(cmd),
        }
    }

    /// Feed a whole stream of commands, stopping at the first error.
    pub fn feed_all<I, E>(&mut self, cmds: I) -> Result<(), Error>
    where I: IntoIterator<Item = Result<Command, E>>, Error: From<E>
    {
        for cmd in cmds {
            self.feed(cmd?);
        }
        Ok(())
    }

    pub fn finish(self) -> Planned {
        let pitch = self.settings.pitch_in(self.units);
        let grid = self.bounds.map(|bounds| Grid::new(bounds, pitch));
        match (&self.bounds, &grid) {
            (Some(bounds), Some(grid)) => info!(
                "board size ({}): {:.4} x {:.4}, grid of {} x {} cells",
                self.units, bounds.width(), bounds.height(), grid.cells_x + 1, grid.cells_y + 1),
            _ => warn!("no moves below the surface, nothing to level"),
        }
        debug!("{} moves were split", self.splits);
        Planned {
            board: Board {
                units: self.units,
                pitch,
                split_over: self.settings.split_over_in(self.units),
                bounds: self.bounds,
                route_depth: self.route_depth,
                has_drill_spots: self.has_drill_spots,
                drill_spot_depth: self.drill_spot_depth,
                grid,
            },
            commands: self.commands,
            settings: self.settings,
        }
    }
}

/// A program after the first pass.
#[derive(Clone, Debug)]
pub struct Planned {
    pub board: Board,
    pub commands: Vec<Command>,
    settings: Settings,
}

impl Planned {
    /// Second pass: attach a depth formula to every move below the surface.
    pub fn interpolate(self) -> Result<Leveled, Error> {
        let Planned { board, mut commands, settings } = self;
        let mut cells = CellTable::new(settings.first_var);
        if let Some(grid) = &board.grid {
            let mut pos = Position::default();
            let mut drill_z = None;
            for cmd in &mut commands {
                let (at, par) = match cmd.kind() {
                    kind if kind.is_move() => {
                        pos.move_to(cmd);
                        (pos, ROUTE_DEPTH_PAR)
                    }
                    Kind::DrillCycle => (pos.drill(cmd, &mut drill_z), DRILL_DEPTH_PAR),
                    _ => continue,
                };
                if at.z < 0. {
                    let formula = grid::formula(grid, &mut cells, at.x, at.y, par)?;
                    cmd.set_zformula(formula, at.z);
                }
            }
            info!("{} of {} grid cells need probing", cells.len(), grid.len());
            if !commands.iter().any(|cmd| matches!(cmd.kind(), Kind::Units(_))) {
                warn!("program does not select units, probing routine goes to the top");
            }
        }
        Ok(Leveled { board, commands, cells, settings })
    }
}

/// A fully leveled program, ready to be written out with `Display`.
#[derive(Clone, Debug)]
pub struct Leveled {
    pub board: Board,
    pub commands: Vec<Command>,
    pub cells: CellTable,
    settings: Settings,
}
