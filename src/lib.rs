// Copyright (c) 2019 Georg Brandl.  Licensed under the Apache License,
// Version 2.0 <LICENSE-APACHE or http://www.apache.org/licenses/LICENSE-2.0>
// or the MIT license <LICENSE-MIT or http://opensource.org/licenses/MIT>, at
// your option. This file may not be copied, modified, or distributed except
// according to those terms.

//! Height-map auto-leveling for G-code milling programs, in the [LinuxCNC]
//! dialect.
//!
//! Boards for PCB isolation milling are rarely flat to within the depth of
//! the cut.  This library takes a milling program and rewrites it so that the
//! machine first probes the surface on a grid covering the routed area, and
//! then cuts every move at a depth relative to the bilinearly interpolated
//! surface height.
//!
//! [LinuxCNC]: http://linuxcnc.org/docs/html/gcode/overview.html
//!
//! ## Basic usage
//!
//! ```rust,no_run
//! use std::fs;
//! use ngc_level::{run, settings::Settings};
//!
//! let input = fs::read_to_string("board.ngc").unwrap();
//! match run(input.as_bytes(), Settings::default()) {
//!     Err(e) => eprintln!("Error: {}", e),
//!     Ok(prog) => print!("{}", prog),
//! }
//! ```
//!
//! The passes can also be run one by one, see the [`level`] module.

use std::io::BufRead;

pub mod command;
pub mod error;
pub mod level;
pub mod parse;
pub mod settings;

// internal helpers
pub(crate) mod util;

pub use crate::error::Error;

/// Read a program and run all leveling passes on it.
pub fn run(input: impl BufRead, settings: settings::Settings) -> Result<level::Leveled, Error> {
    let mut planner = level::Planner::new(settings)?;
    planner.feed_all(parse::Reader::new(input))?;
    planner.finish().interpolate()
}
