// SPDX-FileCopyrightText: 2021 Kent Gibson <warthog618@gmail.com>
//
// SPDX-License-Identifier: Apache-2.0 OR MIT

use crate::debounce::Debouncer;
use crate::registry::{Binding, Pin, Registry, Switch};
use log::{debug, warn};
use std::sync::mpsc::{SyncSender, TrySendError};
use std::time::Duration;

/// What became of an edge.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Outcome {
    /// The switch was queued for the worker.
    Dispatched(Switch),
    /// The pin has no binding.
    Unbound,
    /// The edge fell within the debounce period of an earlier press.
    Bounce,
    /// The worker is still busy with earlier presses.
    QueueFull,
    /// The worker has gone.
    Closed,
}

/// Turns falling edges into source changes for the worker.
///
/// The handler only looks up and queues, so it never blocks on the
/// external command.
pub struct EdgeHandler {
    registry: Registry,
    debouncer: Debouncer,
    tx: SyncSender<Binding>,
}

impl EdgeHandler {
    pub fn new(registry: Registry, debounce_period: Duration, tx: SyncSender<Binding>) -> Self {
        EdgeHandler {
            registry,
            debouncer: Debouncer::new(debounce_period),
            tx,
        }
    }

    pub fn handle(&mut self, pin: Pin, timestamp_ns: u64) -> Outcome {
        let binding = match self.registry.resolve(pin) {
            Some(b) => *b,
            None => {
                debug!("pin {pin}: ignoring edge on unbound pin");
                return Outcome::Unbound;
            }
        };
        if !self.debouncer.accept(pin, timestamp_ns) {
            debug!("pin {pin}: bounce at {timestamp_ns}");
            return Outcome::Bounce;
        }
        match self.tx.try_send(binding) {
            Ok(()) => {
                debug!(
                    "pin {pin}: switch {} pressed, source {}",
                    binding.switch, binding.source
                );
                Outcome::Dispatched(binding.switch)
            }
            Err(TrySendError::Full(_)) => {
                warn!(
                    "pin {pin}: dropping press of switch {} - still busy",
                    binding.switch
                );
                Outcome::QueueFull
            }
            Err(TrySendError::Disconnected(_)) => {
                warn!("pin {pin}: dropping press of switch {} - worker gone", binding.switch);
                Outcome::Closed
            }
        }
    }
}
