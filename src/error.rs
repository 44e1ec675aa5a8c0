// Copyright (c) 2019 Georg Brandl.  Licensed under the Apache License,
// Version 2.0 <LICENSE-APACHE or http://www.apache.org/licenses/LICENSE-2.0>
// or the MIT license <LICENSE-MIT or http://opensource.org/licenses/MIT>, at
// your option. This file may not be copied, modified, or distributed except
// according to those terms.

use std::io;
use thiserror::Error;

/// A syntax error in one line of the input program.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("Error in line {lineno}: {kind}")]
pub struct ParseError {
    /// 1-based line number.
    pub lineno: usize,
    pub kind: ErrKind,
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ErrKind {
    #[error("Unknown symbol '{0}'")]
    UnknownSymbol(char),
    #[error("Unknown argument '{0}'")]
    InvalidArgument(String),
    #[error("Unclosed comment")]
    UnclosedComment,
}

/// Everything that can abort a leveling run.
#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("height map needs more cell parameters than available (first free is #{first}, \
             parameters from #{limit} on are reserved)")]
    TooManyCells { first: u16, limit: u16 },
    #[error("invalid settings: {0}")]
    Config(String),
}

impl Error {
    pub fn config<T>(s: impl Into<String>) -> Result<T, Self> {
        Err(Error::Config(s.into()))
    }
}
