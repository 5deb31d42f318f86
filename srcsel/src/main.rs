// SPDX-FileCopyrightText: 2021 Kent Gibson <warthog618@gmail.com>
//
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A daemon switching monitor inputs from GPIO buttons.

use clap::{Parser, ValueEnum};
use srcsel::changer::{
    DEFAULT_BUS, DEFAULT_DDCCI_TOOL, DEFAULT_DDCUTIL, DEFAULT_I2C_DEV, DEFAULT_MCCS,
};
use srcsel::common::{self, format_error};
use srcsel::config::{DEFAULT_CHIP, DEFAULT_CONSUMER, DEFAULT_QUEUE_DEPTH};
use srcsel::{Backend, Config, Pin, SourceCode};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

fn main() -> ExitCode {
    match Opts::try_parse() {
        Ok(opts) => {
            env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
                .init();
            return match srcsel::run(&opts.config()) {
                Ok(()) => ExitCode::SUCCESS,
                Err(e) => {
                    eprintln!("{}", format_error(opts.verbose, &e));
                    ExitCode::FAILURE
                }
            };
        }
        Err(e) => {
            if !e.use_stderr() {
                // --help and --version
                print!("{e}");
                return ExitCode::SUCCESS;
            }
            eprintln!("{e}")
        }
    }
    ExitCode::FAILURE
}

#[derive(Debug, Parser)]
#[command(
    name = "srcsel",
    about = "Switch the input source of a monitor using buttons on GPIO lines.",
    version
)]
struct Opts {
    /// The chip the buttons are wired to
    ///
    /// The chip may be identified by number, name, or path.
    /// e.g. the following all select the same chip:
    ///     --chip 0
    ///     --chip gpiochip0
    ///     --chip /dev/gpiochip0
    #[arg(
        short,
        long,
        value_name = "chip",
        default_value = DEFAULT_CHIP,
        env = "SRCSEL_CHIP",
        verbatim_doc_comment
    )]
    chip: String,

    /// Bind a header pin to an input source
    ///
    /// Bindings are given as PIN=SOURCE, with the source in decimal or
    /// 0x prefixed hex, e.g. --bind 37=0x0f.
    /// The buttons are numbered in the order given.
    /// If any are given they replace the reference bindings
    ///     33=0x11 31=0x12 37=0x0f 35=0x13
    #[arg(
        short,
        long = "bind",
        value_name = "binding",
        value_parser = common::parse_binding,
        verbatim_doc_comment
    )]
    bindings: Vec<(Pin, SourceCode)>,

    /// The debounce period for the buttons
    ///
    /// The period is taken as milliseconds unless otherwise specified.
    #[arg(
        short = 'p',
        long,
        value_name = "period",
        default_value = "200ms",
        env = "SRCSEL_DEBOUNCE_PERIOD",
        value_parser = common::parse_duration
    )]
    debounce_period: Duration,

    /// The tool used to set the input source
    #[arg(
        long,
        value_name = "tool",
        value_enum,
        default_value = "ddcci-tool",
        env = "SRCSEL_BACKEND",
        ignore_case = true
    )]
    backend: BackendFlags,

    /// The path to ddcci-tool
    #[arg(long, value_name = "path", default_value = DEFAULT_DDCCI_TOOL)]
    ddcci_tool: PathBuf,

    /// The I2C device the monitor is on, for ddcci-tool
    #[arg(long, value_name = "path", default_value = DEFAULT_I2C_DEV, env = "SRCSEL_I2C_DEV")]
    i2c_dev: PathBuf,

    /// The path to ddcutil
    #[arg(long, value_name = "path", default_value = DEFAULT_DDCUTIL)]
    ddcutil: PathBuf,

    /// The I2C bus the monitor is on, for ddcutil
    #[arg(long, value_name = "num", default_value_t = DEFAULT_BUS, env = "SRCSEL_BUS")]
    bus: u32,

    /// The MCCS version to assume, for ddcutil
    #[arg(long, value_name = "version", default_value = DEFAULT_MCCS)]
    mccs: String,

    /// The consumer label applied to requested lines.
    #[arg(short = 'C', long, value_name = "name", default_value = DEFAULT_CONSUMER)]
    consumer: String,

    /// The number of presses that may be waiting on a slow monitor
    ///
    /// Presses beyond that are dropped.
    #[arg(long, value_name = "num", default_value_t = DEFAULT_QUEUE_DEPTH)]
    queue_depth: usize,

    /// Provide more detailed error messages.
    #[arg(short = 'v', long)]
    verbose: bool,
}

impl Opts {
    fn config(&self) -> Config {
        let mut cfg = Config {
            chip: self.chip.clone(),
            consumer: self.consumer.clone(),
            debounce_period: self.debounce_period,
            backend: self.backend(),
            queue_depth: self.queue_depth,
            ..Default::default()
        };
        if !self.bindings.is_empty() {
            cfg.bindings = self.bindings.clone();
        }
        cfg
    }

    fn backend(&self) -> Backend {
        match self.backend {
            BackendFlags::DdcciTool => Backend::DdcciTool {
                program: self.ddcci_tool.clone(),
                device: self.i2c_dev.clone(),
            },
            BackendFlags::Ddcutil => Backend::Ddcutil {
                program: self.ddcutil.clone(),
                bus: self.bus,
                mccs: self.mccs.clone(),
            },
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum BackendFlags {
    DdcciTool,
    Ddcutil,
}
