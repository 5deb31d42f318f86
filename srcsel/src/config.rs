// SPDX-FileCopyrightText: 2021 Kent Gibson <warthog618@gmail.com>
//
// SPDX-License-Identifier: Apache-2.0 OR MIT

use crate::changer::Backend;
use crate::common::Error;
use crate::registry::{Pin, Registry, SourceCode, DEFAULT_BINDINGS};
use std::time::Duration;

pub const DEFAULT_CHIP: &str = "gpiochip0";
pub const DEFAULT_CONSUMER: &str = "srcsel";
pub const DEFAULT_DEBOUNCE_PERIOD: Duration = Duration::from_millis(200);
pub const DEFAULT_QUEUE_DEPTH: usize = 8;

/// The complete configuration of a run.
///
/// The default is the reference wiring.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Config {
    /// The chip the buttons are wired to, by number, name or path.
    pub chip: String,

    /// The consumer label applied to the requested lines.
    pub consumer: String,

    /// The (header pin, source) pairs in switch order.
    pub bindings: Vec<(Pin, SourceCode)>,

    /// The minimum period between accepted presses of a button.
    pub debounce_period: Duration,

    pub backend: Backend,

    /// The number of presses that may wait for the worker.
    pub queue_depth: usize,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            chip: DEFAULT_CHIP.into(),
            consumer: DEFAULT_CONSUMER.into(),
            bindings: DEFAULT_BINDINGS.to_vec(),
            debounce_period: DEFAULT_DEBOUNCE_PERIOD,
            backend: Backend::default(),
            queue_depth: DEFAULT_QUEUE_DEPTH,
        }
    }
}

impl Config {
    /// Check the configuration and build the registry from the bindings.
    pub fn registry(&self) -> Result<Registry, Error> {
        if self.queue_depth == 0 {
            return Err(Error::ZeroQueueDepth);
        }
        Registry::new(&self.bindings)
    }
}
