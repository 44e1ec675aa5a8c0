// Copyright (c) 2019 Georg Brandl.  Licensed under the Apache License,
// Version 2.0 <LICENSE-APACHE or http://www.apache.org/licenses/LICENSE-2.0>
// or the MIT license <LICENSE-MIT or http://opensource.org/licenses/MIT>, at
// your option. This file may not be copied, modified, or distributed except
// according to those terms.

use std::fmt;

use crate::command::Kind;
use crate::util::fmt_num;
use super::{Grid, Leveled, DRILL_DEPTH_PAR, ROUTE_DEPTH_PAR};

/// Subroutine number of the probe routine.
const PROBE_SUB: u16 = 100;
/// LinuxCNC parameter holding the Z of the last probe hit.
const PROBE_RESULT_PAR: u16 = 5063;

impl Leveled {
    fn write_params(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let probe = self.settings.probe.in_units(self.board.units);
        let route_depth = self.board.route_depth.unwrap_or(0.);
        writeln!(f, "(height map probing, {} grid pitch {})",
                 self.board.units, fmt_num(self.board.pitch))?;
        writeln!(f)?;
        writeln!(f, "#1={}\t\t\t(clearance height)", fmt_num(probe.clearance_height))?;
        writeln!(f, "#2={}\t\t\t(traverse height)", fmt_num(probe.traverse_height))?;
        writeln!(f, "#{}={}\t\t(route depth)", ROUTE_DEPTH_PAR, fmt_num(route_depth))?;
        writeln!(f, "#4={}\t\t\t(probe depth)", fmt_num(probe.probe_depth))?;
        writeln!(f, "#5={}\t\t\t(traverse speed)", fmt_num(probe.traverse_speed))?;
        writeln!(f, "#6={}\t\t\t(probe speed)", fmt_num(probe.probe_speed))?;
        if let (true, Some(depth)) = (self.board.has_drill_spots, self.board.drill_spot_depth) {
            writeln!(f, "#{}={}\t\t(drill spot depth)", DRILL_DEPTH_PAR, fmt_num(depth))?;
        }
        writeln!(f)?;
        writeln!(f, "M05\t\t\t(stop motor)")?;
        writeln!(f, "(MSG,PROBE: Position to within {} of surface & resume)",
                 fmt_num(-probe.initial_probe))?;
        writeln!(f, "M60\t\t\t(pause, wait for resume)")?;
        writeln!(f, "G49\t\t\t(clear any tool offsets)")?;
        writeln!(f, "G92.1\t\t\t(zero co-ordinate offsets)")?;
        writeln!(f, "G91\t\t\t(use relative coordinates)")?;
        writeln!(f, "G38.2 Z{} F[#6]\t(probe to find worksurface)", fmt_num(probe.initial_probe))?;
        writeln!(f, "G90\t\t\t(back to absolute)")?;
        writeln!(f, "G92 Z0\t\t\t(zero Z)")?;
        writeln!(f, "G00 Z[#1]\t\t(safe height)")?;
        writeln!(f, "(MSG,PROBE: Z-Axis calibrate complete, beginning probe)")?;
        writeln!(f)?;
        writeln!(f, "(probe routine)")?;
        writeln!(f, "(params: x y traverse_height probe_depth traverse_speed probe_speed)")?;
        writeln!(f, "O{} sub", PROBE_SUB)?;
        writeln!(f, "G00 X[#1] Y[#2] Z[#3] F[#5]")?;
        writeln!(f, "G38.2 Z[#4] F[#6]")?;
        writeln!(f, "G00 Z[#3]")?;
        writeln!(f, "O{} endsub", PROBE_SUB)?;
        writeln!(f)
    }

    /// Probe every cell that has a parameter.
    fn write_probes(&self, f: &mut fmt::Formatter, grid: &Grid) -> fmt::Result {
        for ((gx, gy), var) in self.cells.serpentine() {
            let (px, py) = grid.center_of((gx, gy));
            let (px, py) = (fmt_num(px), fmt_num(py));
            writeln!(f, "(PROBE[{},{}] {} {} -> {})", gx, gy, px, py, var)?;
            writeln!(f, "O{} call [{}] [{}] [#2] [#4] [#5] [#6]", PROBE_SUB, px, py)?;
            writeln!(f, "#{}=#{}", var, PROBE_RESULT_PAR)?;
        }
        Ok(())
    }

    fn write_pause(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f)?;
        writeln!(f, "G00 Z[#1]\t\t(safe height)")?;
        writeln!(f, "(MSG,PROBE: Probe complete, remove connections & resume)")?;
        writeln!(f, "M60\t\t\t(pause, wait for resume)")?;
        writeln!(f, "(MSG,PROBE: Beginning etch)")?;
        writeln!(f)
    }

    fn write_probing(&self, f: &mut fmt::Formatter, grid: &Grid) -> fmt::Result {
        self.write_params(f)?;
        self.write_probes(f, grid)?;
        self.write_pause(f)
    }
}

/// Renders the leveled program.  The probing routine goes right after the
/// first unit selection, or at the very top if the program never selects
/// units.
impl fmt::Display for Leveled {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let mut pending = self.board.grid.as_ref();
        let has_units = self.commands.iter().any(|cmd| matches!(cmd.kind(), Kind::Units(_)));
        if !has_units {
            if let Some(grid) = pending.take() {
                self.write_probing(f, grid)?;
            }
        }
        for cmd in &self.commands {
            writeln!(f, "{}", cmd)?;
            if let Kind::Units(_) = cmd.kind() {
                if let Some(grid) = pending.take() {
                    self.write_probing(f, grid)?;
                }
            }
        }
        Ok(())
    }
}
