// Copyright (c) 2019 Georg Brandl.  Licensed under the Apache License,
// Version 2.0 <LICENSE-APACHE or http://www.apache.org/licenses/LICENSE-2.0>
// or the MIT license <LICENSE-MIT or http://opensource.org/licenses/MIT>, at
// your option. This file may not be copied, modified, or distributed except
// according to those terms.

use std::io::{BufRead, Lines};
use itertools::Itertools;
use pest_derive::Parser;
use pest::{Parser, error::{Error as PestError, InputLocation}, iterators::Pair};

use crate::command::Command;
use crate::error::{Error, ErrKind, ParseError};

#[derive(Parser)]
#[grammar = "gcode.pest"]
pub struct GcodeParser;

type ParseResult<T> = Result<T, ParseError>;

fn parse_num(pair: Pair<Rule>) -> f64 {
    pair.as_str().parse().expect("valid number")
}

fn make_word(pair: Pair<Rule>) -> (char, f64) {
    let (letter, value) = pair.into_inner().collect_tuple().expect("children");
    let letter = letter.as_str().chars().next().expect("one letter");
    (letter.to_ascii_uppercase(), parse_num(value))
}

/// Find the whitespace-delimited token around the position where pest gave
/// up, and classify the failure.
fn make_error(lineno: usize, line: &str, err: PestError<Rule>) -> ParseError {
    let pos = match err.location {
        InputLocation::Pos(p) => p,
        InputLocation::Span((p, _)) => p,
    };
    // only ASCII whitespace is skipped by the grammar
    let pos = line.len() - line[pos..].trim_start_matches(|c: char| c.is_ascii_whitespace()).len();
    if let Some(c) = line[pos..].chars().next().filter(|c| c.is_whitespace()) {
        return ParseError { lineno, kind: ErrKind::UnknownSymbol(c) };
    }
    let start = line[..pos].char_indices().rev()
                           .find(|&(_, c)| c.is_whitespace() || c == ')')
                           .map_or(0, |(i, c)| i + c.len_utf8());
    let end = line[pos..].find(char::is_whitespace).map_or(line.len(), |i| pos + i);
    let token = &line[start..end];
    let kind = match token.chars().next() {
        Some('(') => ErrKind::UnclosedComment,
        Some(c) if c.is_ascii_alphabetic() => ErrKind::InvalidArgument(token.into()),
        Some(c) => ErrKind::UnknownSymbol(c),
        None => ErrKind::UnknownSymbol(line[pos..].chars().next().unwrap_or(' ')),
    };
    ParseError { lineno, kind }
}

/// Parse a single line of G-code.
///
/// Returns `None` for lines that are empty or only contain comments and line
/// numbers.  A line that starts with an axis word is a continuation of linear
/// motion and becomes a `G01`.
pub fn parse_line(lineno: usize, line: &str) -> ParseResult<Option<Command>> {
    let mut pairs = GcodeParser::parse(Rule::line, line)
        .map_err(|e| make_error(lineno, line, e))?;
    let line_pair = pairs.next().expect("line");
    let mut cmd = None;
    for pair in line_pair.into_inner() {
        match pair.as_rule() {
            Rule::lineno | Rule::EOI => (),
            Rule::code => {
                let name = pair.as_str().to_ascii_uppercase();
                cmd = Some(Command::new(name).with_lineno(lineno));
            }
            Rule::arg => {
                let (letter, value) = make_word(pair);
                if cmd.is_none() && !matches!(letter, 'X' | 'Y' | 'Z') {
                    return Err(ParseError { lineno, kind: ErrKind::UnknownSymbol(letter) });
                }
                cmd.get_or_insert_with(|| Command::new("G01").with_lineno(lineno))
                   .set(letter, value);
            }
            _ => unreachable!()
        }
    }
    Ok(cmd)
}

/// Parse a whole program held in memory.
pub fn parse(input: &str) -> ParseResult<Vec<Command>> {
    let mut cmds = vec![];
    for (n, line) in input.lines().enumerate() {
        if let Some(cmd) = parse_line(n + 1, line)? {
            cmds.push(cmd);
        }
    }
    Ok(cmds)
}

/// Lazily reads commands from a buffered source, one line at a time.
pub struct Reader<R> {
    lines: Lines<R>,
    lineno: usize,
}

impl<R: BufRead> Reader<R> {
    pub fn new(input: R) -> Self {
        Reader { lines: input.lines(), lineno: 0 }
    }

    /// The number of the line read last.
    pub fn lineno(&self) -> usize {
        self.lineno
    }
}

impl<R: BufRead> Iterator for Reader<R> {
    type Item = Result<Command, Error>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let line = match self.lines.next()? {
                Ok(line) => line,
                Err(e) => return Some(Err(e.into())),
            };
            self.lineno += 1;
            match parse_line(self.lineno, &line) {
                Ok(Some(cmd)) => return Some(Ok(cmd)),
                Ok(None) => continue,
                Err(e) => return Some(Err(e.into())),
            }
        }
    }
}
