// Copyright (c) 2019 Georg Brandl.  Licensed under the Apache License,
// Version 2.0 <LICENSE-APACHE or http://www.apache.org/licenses/LICENSE-2.0>
// or the MIT license <LICENSE-MIT or http://opensource.org/licenses/MIT>, at
// your option. This file may not be copied, modified, or distributed except
// according to those terms.


/// Helper for converting a code number like `38.2` into an integer with the
/// given number of decimal figures folded in (`382`), if it fits.
pub fn num_to_int(inp: f64, figures: i32) -> Option<u16> {
    let v = inp * 10f64.powi(figures);
    if (v.round() - v).abs() < 0.0001 && v >= 0. && v <= 65535. {
        Some(v.round() as u16)
    } else {
        None
    }
}

/// Format a parameter value for the generated macro block: at most five
/// decimals, without trailing zeros.
pub fn fmt_num(inp: f64) -> String {
    let s = format!("{:.5}", inp);
    let s = s.trim_end_matches('0').trim_end_matches('.');
    match s {
        "-0" | "" => "0".into(),
        s => s.into(),
    }
}
