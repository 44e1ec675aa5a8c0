// Copyright (c) 2019 Georg Brandl.  Licensed under the Apache License,
// Version 2.0 <LICENSE-APACHE or http://www.apache.org/licenses/LICENSE-2.0>
// or the MIT license <LICENSE-MIT or http://opensource.org/licenses/MIT>, at
// your option. This file may not be copied, modified, or distributed except
// according to those terms.

//! Subdivision of long moves below the surface.
//!
//! The height map is only sampled once per grid cell, so a single move must
//! not cross more than one cell on either axis.  Long moves are recursively
//! halved until both axis deltas are within the threshold; halving keeps the
//! pieces proportional without any trigonometry.

use crate::command::Command;
use super::Position;

/// Split `cmd`, starting at `from`, into moves no longer than `threshold` on
/// either axis, in travel order.
///
/// Moves that end at or above the surface, or lack an X or Y word, are
/// returned unchanged, as are moves that are short enough already.
pub fn split(from: Position, cmd: Command, threshold: f64) -> Vec<Command> {
    let to = from.after(&cmd);
    if to.z >= 0. || cmd.x().is_none() || cmd.y().is_none() {
        return vec![cmd];
    }
    let mut leaves = vec![];
    bisect(from, to, cmd, threshold, &mut leaves);
    leaves
}

fn bisect(from: Position, to: Position, cmd: Command, threshold: f64, out: &mut Vec<Command>) {
    let dx = to.x - from.x;
    let dy = to.y - from.y;
    if dx.abs() <= threshold && dy.abs() <= threshold {
        out.push(cmd);
        return;
    }

    let mid = Position {
        x: from.x + dx / 2.,
        y: from.y + dy / 2.,
        z: from.z + (to.z - from.z) / 2.,
    };
    let has_z = cmd.z().is_some();

    let mut first = Command::xy(cmd.name.clone(), mid.x, mid.y).with_lineno(cmd.lineno);
    let mut second = Command::xy(cmd.name.clone(), to.x, to.y).with_lineno(cmd.lineno);
    if has_z {
        first.set('Z', mid.z);
        second.set('Z', to.z);
    }
    if let Some(feed) = cmd.feed() {
        first.set('F', feed);
    }

    bisect(from, mid, first, threshold, out);
    bisect(mid, to, second, threshold, out);
}
