// SPDX-FileCopyrightText: 2021 Kent Gibson <warthog618@gmail.com>
//
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Switch the input source of a monitor from buttons wired to GPIO lines.
//!
//! Each button is bound to a header pin and to an MCCS Input Select value.
//! Pressing a button pulls its line low, and the resulting falling edge is
//! debounced, resolved to its binding, and passed to a worker that runs a
//! DDC/CI tool to write VCP code 0x60 to the monitor.
//!
//! ```no_run
//! fn main() -> anyhow::Result<()> {
//!     // the reference wiring, switching with ddcci-tool on /dev/i2c-1
//!     srcsel::run(&srcsel::Config::default())
//! }
//! ```

pub mod board;
pub mod changer;
pub mod common;
pub mod config;
mod debounce;
pub mod handler;
pub mod monitor;
pub mod registry;
pub mod worker;

pub use changer::{Backend, CommandChanger, SourceChanger};
pub use common::Error;
pub use config::Config;
pub use monitor::run;
pub use registry::{Binding, Pin, Registry, SourceCode, Switch};
