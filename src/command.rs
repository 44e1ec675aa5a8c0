// Copyright (c) 2019 Georg Brandl.  Licensed under the Apache License,
// Version 2.0 <LICENSE-APACHE or http://www.apache.org/licenses/LICENSE-2.0>
// or the MIT license <LICENSE-MIT or http://opensource.org/licenses/MIT>, at
// your option. This file may not be copied, modified, or distributed except
// according to those terms.

use std::fmt;
use itertools::Itertools;
use strum_macros::Display;

use crate::util::num_to_int;

/// A unit system as selected by G20/G21.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Display)]
pub enum Units {
    #[strum(serialize = "mm")]
    Millimeters,
    #[strum(serialize = "inches")]
    Inches,
}

impl Default for Units {
    fn default() -> Self { Units::Millimeters }
}

/// The small set of commands the leveler cares about.
///
/// Everything else is passed through untouched.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Kind {
    RapidMove,      // G0
    LinearMove,     // G1
    DrillCycle,     // G81-83
    Units(Units),   // G20, G21
    Other,
}

impl Kind {
    pub fn is_move(&self) -> bool {
        matches!(self, Kind::RapidMove | Kind::LinearMove)
    }
}

/// One line of a G-code program.
///
/// Arguments are kept in the order they were first given, which is also the
/// order they are rendered in.  The Z argument can be overridden by a formula
/// that is evaluated by the machine at run time.
#[derive(Clone, Debug, PartialEq)]
pub struct Command {
    pub lineno: usize,
    pub name: String,
    args: Vec<(char, f64)>,
    zformula: Option<String>,
}

impl Command {
    pub fn new(name: impl Into<String>) -> Self {
        Command { lineno: 0, name: name.into(), args: vec![], zformula: None }
    }

    /// A move of the given type to (x, y).
    pub fn xy(name: impl Into<String>, x: f64, y: f64) -> Self {
        let mut cmd = Command::new(name);
        cmd.set('X', x);
        cmd.set('Y', y);
        cmd
    }

    pub fn with_lineno(mut self, lineno: usize) -> Self {
        self.lineno = lineno;
        self
    }

    pub fn get(&self, letter: char) -> Option<f64> {
        self.args.iter().find(|(l, _)| *l == letter).map(|(_, v)| *v)
    }

    /// Set an argument.  A new letter is appended, an existing one keeps its
    /// place.
    pub fn set(&mut self, letter: char, value: f64) {
        match self.args.iter_mut().find(|(l, _)| *l == letter) {
            Some(arg) => arg.1 = value,
            None => self.args.push((letter, value)),
        }
    }

    pub fn args(&self) -> &[(char, f64)] {
        &self.args
    }

    pub fn x(&self) -> Option<f64> { self.get('X') }
    pub fn y(&self) -> Option<f64> { self.get('Y') }
    pub fn z(&self) -> Option<f64> { self.get('Z') }
    pub fn feed(&self) -> Option<f64> { self.get('F') }

    pub fn zformula(&self) -> Option<&str> {
        self.zformula.as_deref()
    }

    /// Attach a depth formula.  Commands without a Z word get one, holding
    /// `z`, so that the formula has a place in the output.
    pub fn set_zformula(&mut self, formula: String, z: f64) {
        if self.z().is_none() {
            self.args.push(('Z', z));
        }
        self.zformula = Some(formula);
    }

    pub fn kind(&self) -> Kind {
        let mut chars = self.name.chars();
        if chars.next() != Some('G') {
            return Kind::Other;
        }
        let code = chars.as_str().parse().ok().and_then(|n| num_to_int(n, 1));
        match code {
            Some(0) => Kind::RapidMove,
            Some(10) => Kind::LinearMove,
            Some(200) => Kind::Units(Units::Inches),
            Some(210) => Kind::Units(Units::Millimeters),
            Some(810) | Some(820) | Some(830) => Kind::DrillCycle,
            _ => Kind::Other,
        }
    }
}

struct Arg<'a>(char, f64, Option<&'a str>);

impl fmt::Display for Arg<'_> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Arg('Z', _, Some(formula)) => write!(f, "Z[{}]", formula),
            Arg(letter, value, _) => write!(f, "{}{:.4}", letter, value),
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.name)?;
        if !self.args.is_empty() {
            let formula = self.zformula();
            write!(f, " {}", self.args.iter().map(|&(l, v)| Arg(l, v, formula)).format(" "))?;
        }
        Ok(())
    }
}
