// Copyright (c) 2019 Georg Brandl.  Licensed under the Apache License,
// Version 2.0 <LICENSE-APACHE or http://www.apache.org/licenses/LICENSE-2.0>
// or the MIT license <LICENSE-MIT or http://opensource.org/licenses/MIT>, at
// your option. This file may not be copied, modified, or distributed except
// according to those terms.

use std::{fs, io::BufReader, path::PathBuf};
use anyhow::{bail, Context};
use clap::Parser;
use tracing::info;

use ngc_level::settings::{Settings, DEFAULT_FIRST_VAR, DEFAULT_GRID_PITCH};

/// Add height-map probing and depth compensation to a G-code milling program.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    /// [GRID] INPUT OUTPUT, where GRID is the probe grid pitch in mm
    /// (default 5)
    #[arg(num_args = 2..=3, required = true, value_name = "ARGS")]
    args: Vec<String>,
    /// Parameter number of the first grid cell
    #[arg(long, default_value_t = DEFAULT_FIRST_VAR)]
    first_var: u16,
    /// Split moves longer than this (in mm) on either axis; defaults to the
    /// grid pitch
    #[arg(long, value_name = "MM")]
    split_over: Option<f64>,
}

impl Cli {
    fn into_parts(self) -> anyhow::Result<(Settings, PathBuf, PathBuf)> {
        let (grid, input, output) = match &self.args[..] {
            [input, output] => (None, input, output),
            [grid, input, output] => (Some(grid), input, output),
            _ => bail!("expected [GRID] INPUT OUTPUT"),
        };
        let grid_pitch = match grid {
            None => DEFAULT_GRID_PITCH,
            Some(g) => match g.parse::<f64>().with_context(|| format!("invalid grid size '{}'", g))? {
                n if n == 0. => DEFAULT_GRID_PITCH,
                n => n,
            },
        };
        let settings = Settings {
            grid_pitch,
            split_over: self.split_over,
            first_var: self.first_var,
            ..Settings::default()
        };
        Ok((settings, input.into(), output.into()))
    }
}

fn init_logging() {
    use tracing_subscriber::EnvFilter;

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> anyhow::Result<()> {
    init_logging();
    let (settings, input, output) = Cli::parse().into_parts()?;

    info!("processing input file {}", input.display());
    let file = fs::File::open(&input)
        .with_context(|| format!("Unable to open file: {}", input.display()))?;
    let prog = ngc_level::run(BufReader::new(file), settings)
        .with_context(|| format!("Processing {}", input.display()))?;

    info!("generating G-code output in {}", output.display());
    fs::write(&output, prog.to_string())
        .with_context(|| format!("Unable to write file: {}", output.display()))?;
    info!("done");
    Ok(())
}
