// SPDX-FileCopyrightText: 2021 Kent Gibson <warthog618@gmail.com>
//
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The lifetime of the process: request the lines, wait for presses until
//! told to stop, then release the lines.

use crate::board;
use crate::changer::CommandChanger;
use crate::common;
use crate::config::Config;
use crate::handler::EdgeHandler;
use crate::worker::Worker;
use anyhow::{anyhow, Context, Result};
use gpiocdev::line::{Bias, EdgeDetection, EdgeKind, Offset};
use gpiocdev::request::Request;
use log::{debug, error, info};
use mio::unix::SourceFd;
use mio::{Events, Interest, Poll, Token, Waker};
use std::os::unix::prelude::{AsRawFd, RawFd};
use std::path::{Path, PathBuf};
use std::sync::Arc;

const WAKE: Token = Token(0);
const LINES: Token = Token(1);

/// A falling edge on a line.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Edge {
    pub offset: Offset,
    pub timestamp_ns: u64,
}

/// A pollable source of edge events.
///
/// Dropping the source releases the lines.
pub trait EdgeSource: AsRawFd {
    /// Read all pending falling edges into `edges`.
    fn read_edges(&mut self, edges: &mut Vec<Edge>) -> Result<()>;
}

/// The button lines, requested as pulled-up inputs reporting falling edges.
pub struct Buttons {
    req: Request,
    chip: PathBuf,
    offsets: Vec<Offset>,
}

impl Buttons {
    pub fn request(chip: &Path, consumer: &str, offsets: &[Offset]) -> Result<Buttons> {
        let req = Request::builder()
            .on_chip(chip)
            .with_consumer(consumer)
            .with_lines(offsets)
            .as_input()
            .with_bias(Bias::PullUp)
            .with_edge_detection(EdgeDetection::FallingEdge)
            .request()
            .with_context(|| {
                format!("failed to request lines {:?} from {}", offsets, chip.display())
            })?;
        info!("requested lines {:?} from {}", offsets, chip.display());
        Ok(Buttons {
            req,
            chip: chip.to_owned(),
            offsets: offsets.to_vec(),
        })
    }
}

impl AsRawFd for Buttons {
    fn as_raw_fd(&self) -> RawFd {
        self.req.as_raw_fd()
    }
}

impl EdgeSource for Buttons {
    fn read_edges(&mut self, edges: &mut Vec<Edge>) -> Result<()> {
        while self.req.has_edge_event()? {
            let edge = self.req.read_edge_event()?;
            if edge.kind == EdgeKind::Falling {
                edges.push(Edge {
                    offset: edge.offset,
                    timestamp_ns: edge.timestamp_ns,
                });
            }
        }
        Ok(())
    }
}

impl Drop for Buttons {
    fn drop(&mut self) {
        info!(
            "releasing lines {:?} on {}",
            self.offsets,
            self.chip.display()
        );
    }
}

/// Wakes the monitor so it returns from [`Monitor::run`].
#[derive(Clone, Debug)]
pub struct Shutdown(Arc<Waker>);

impl Shutdown {
    pub fn trigger(&self) -> std::io::Result<()> {
        self.0.wake()
    }
}

/// Owns the edge source for the life of the run loop.
pub struct Monitor<S: EdgeSource> {
    poll: Poll,
    shutdown: Shutdown,
    source: S,
}

impl<S: EdgeSource> Monitor<S> {
    pub fn new(source: S) -> Result<Monitor<S>> {
        let poll = Poll::new().context("failed to create poll")?;
        let waker = Waker::new(poll.registry(), WAKE).context("failed to create waker")?;
        poll.registry()
            .register(
                &mut SourceFd(&source.as_raw_fd()),
                LINES,
                Interest::READABLE,
            )
            .context("failed to register lines with poll")?;
        Ok(Monitor {
            poll,
            shutdown: Shutdown(Arc::new(waker)),
            source,
        })
    }

    pub fn shutdown_handle(&self) -> Shutdown {
        self.shutdown.clone()
    }

    /// Feed edges to the handler until shutdown is triggered.
    ///
    /// The source, and so the lines, are released when this returns,
    /// whether by shutdown or error.
    pub fn run(mut self, mut handler: EdgeHandler) -> Result<()> {
        let mut events = Events::with_capacity(2);
        let mut edges = Vec::new();
        loop {
            if let Err(e) = self.poll.poll(&mut events, None) {
                if e.kind() == std::io::ErrorKind::Interrupted {
                    continue;
                }
                return Err(anyhow!(e).context("failed to poll"));
            }
            let mut stop = false;
            for event in &events {
                match event.token() {
                    WAKE => stop = true,
                    LINES => {
                        if let Err(e) = self.source.read_edges(&mut edges) {
                            error!("failed to read edge events: {e:#}");
                        }
                        for edge in edges.drain(..) {
                            match board::pin(edge.offset) {
                                Some(pin) => {
                                    handler.handle(pin, edge.timestamp_ns);
                                }
                                None => debug!("line {}: not a header pin", edge.offset),
                            }
                        }
                    }
                    _ => (),
                }
            }
            if stop {
                info!("shutting down");
                return Ok(());
            }
        }
    }
}

/// Switch sources from button presses until interrupted.
pub fn run(cfg: &Config) -> Result<()> {
    let registry = cfg.registry().context("invalid configuration")?;
    let chip = common::chip_lookup_from_id(&cfg.chip)?;
    let monitor = Monitor::new(Buttons::request(
        &chip,
        &cfg.consumer,
        &registry.offsets(),
    )?)?;

    let shutdown = monitor.shutdown_handle();
    ctrlc::set_handler(move || {
        if let Err(e) = shutdown.trigger() {
            error!("failed to signal shutdown: {e}");
        }
    })
    .context("failed to install signal handler")?;

    let changer = CommandChanger::new(cfg.backend.clone());
    info!("switching with {}", changer.backend().program().display());
    for b in registry.bindings() {
        info!(
            "switch {}: pin {} (line {}) selects source {}",
            b.switch, b.pin, b.offset, b.source
        );
    }
    let (worker, tx) = Worker::spawn(changer, cfg.queue_depth)?;
    let res = monitor.run(EdgeHandler::new(registry, cfg.debounce_period, tx));
    // the handler, and so the queue, went with the monitor
    finish(res, worker)
}

// Wait for queued switches, preferring the run loop error over the worker's.
fn finish(res: Result<()>, worker: Worker) -> Result<()> {
    let joined = worker.join();
    res.and(joined)
}
