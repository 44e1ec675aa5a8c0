// Copyright (c) 2019 Georg Brandl.  Licensed under the Apache License,
// Version 2.0 <LICENSE-APACHE or http://www.apache.org/licenses/LICENSE-2.0>
// or the MIT license <LICENSE-MIT or http://opensource.org/licenses/MIT>, at
// your option. This file may not be copied, modified, or distributed except
// according to those terms.

use crate::command::Units;
use crate::error::Error;

pub const MM_PER_INCH: f64 = 25.4;
pub const DEFAULT_GRID_PITCH: f64 = 5.0;
pub const DEFAULT_FIRST_VAR: u16 = 2000;

/// First parameter number that LinuxCNC reserves for itself.
pub const RESERVED_PARAMS: u16 = 5000;
/// Highest parameter number used by the generated macro block.
const MACRO_PARAMS: u16 = 7;

fn unit_scale(units: Units) -> f64 {
    match units {
        Units::Millimeters => 1.0,
        Units::Inches => 1.0 / MM_PER_INCH,
    }
}

/// Motion parameters of the probing routine, in millimeters.
#[derive(Clone, Debug, PartialEq)]
pub struct ProbeSettings {
    pub clearance_height: f64,
    pub traverse_height: f64,
    /// Lowest point a single probe may go to before giving up.
    pub probe_depth: f64,
    /// Relative depth of the initial probe that finds the work surface.
    pub initial_probe: f64,
    /// Units per minute.
    pub traverse_speed: f64,
    pub probe_speed: f64,
}

impl Default for ProbeSettings {
    fn default() -> Self {
        ProbeSettings {
            clearance_height: 12.0,
            traverse_height: 0.5,
            probe_depth: -1.0,
            initial_probe: -5.0,
            traverse_speed: 400.0,
            probe_speed: 60.0,
        }
    }
}

impl ProbeSettings {
    /// Return the settings converted into the given program units.
    pub fn in_units(&self, units: Units) -> Self {
        let f = unit_scale(units);
        ProbeSettings {
            clearance_height: self.clearance_height * f,
            traverse_height: self.traverse_height * f,
            probe_depth: self.probe_depth * f,
            initial_probe: self.initial_probe * f,
            traverse_speed: self.traverse_speed * f,
            probe_speed: self.probe_speed * f,
        }
    }
}

/// Settings for one leveling run.
///
/// All lengths are given in millimeters and converted when the program
/// selects inches.
#[derive(Clone, Debug, PartialEq)]
pub struct Settings {
    /// Nominal distance between probe points.
    pub grid_pitch: f64,
    /// Moves longer than this on either axis are split; defaults to the pitch.
    pub split_over: Option<f64>,
    /// Parameter number of the first grid cell.
    pub first_var: u16,
    pub probe: ProbeSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            grid_pitch: DEFAULT_GRID_PITCH,
            split_over: None,
            first_var: DEFAULT_FIRST_VAR,
            probe: ProbeSettings::default(),
        }
    }
}

impl Settings {
    pub fn with_grid_pitch(grid_pitch: f64) -> Self {
        Settings { grid_pitch, ..Settings::default() }
    }

    pub fn validate(&self) -> Result<(), Error> {
        if !(self.grid_pitch.is_finite() && self.grid_pitch > 0.) {
            return Error::config(format!("grid pitch must be positive, got {}", self.grid_pitch));
        }
        if let Some(split) = self.split_over {
            if !(split.is_finite() && split > 0.) {
                return Error::config(format!("split length must be positive, got {}", split));
            }
        }
        if self.first_var <= MACRO_PARAMS || self.first_var >= RESERVED_PARAMS {
            return Error::config(format!("first cell parameter must be within #{}..#{}",
                                         MACRO_PARAMS + 1, RESERVED_PARAMS - 1));
        }
        Ok(())
    }

    /// Grid pitch in program units.
    pub fn pitch_in(&self, units: Units) -> f64 {
        self.grid_pitch * unit_scale(units)
    }

    /// Split threshold in program units.
    pub fn split_over_in(&self, units: Units) -> f64 {
        self.split_over.unwrap_or(self.grid_pitch) * unit_scale(units)
    }
}
