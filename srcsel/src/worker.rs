// SPDX-FileCopyrightText: 2021 Kent Gibson <warthog618@gmail.com>
//
// SPDX-License-Identifier: Apache-2.0 OR MIT

use crate::changer::SourceChanger;
use crate::registry::Binding;
use anyhow::{anyhow, Context, Result};
use log::debug;
use std::sync::mpsc::{sync_channel, Receiver, SyncSender};
use std::thread::{self, JoinHandle};

/// The thread running source changes, one at a time, in the order the
/// buttons were pressed.
pub struct Worker {
    handle: JoinHandle<()>,
}

impl Worker {
    /// Start the worker, returning the sending side of its queue.
    ///
    /// The worker exits once every sender has been dropped and the queue
    /// has drained.
    pub fn spawn<C>(changer: C, depth: usize) -> Result<(Worker, SyncSender<Binding>)>
    where
        C: SourceChanger + Send + 'static,
    {
        let (tx, rx) = sync_channel(depth);
        let handle = thread::Builder::new()
            .name("srcsel-worker".into())
            .spawn(move || run(changer, rx))
            .context("failed to start worker thread")?;
        Ok((Worker { handle }, tx))
    }

    pub fn join(self) -> Result<()> {
        self.handle
            .join()
            .map_err(|_| anyhow!("worker thread panicked"))
    }
}

fn run<C: SourceChanger>(changer: C, rx: Receiver<Binding>) {
    for binding in rx {
        changer.change_source(&binding);
    }
    debug!("worker queue closed");
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::registry::{Registry, Switch, DEFAULT_BINDINGS};
    use std::sync::{Arc, Mutex};

    /// Records the bindings it is asked to switch to.
    #[derive(Clone, Default)]
    pub(crate) struct Recorder(pub Arc<Mutex<Vec<Binding>>>);

    impl Recorder {
        pub fn switched(&self) -> Vec<Switch> {
            self.0
                .lock()
                .expect("lock should not be poisoned")
                .iter()
                .map(|b| b.switch)
                .collect()
        }
    }

    impl SourceChanger for Recorder {
        fn change_source(&self, binding: &Binding) {
            self.0
                .lock()
                .expect("lock should not be poisoned")
                .push(*binding);
        }
    }

    #[test]
    fn drains_queue_before_exit() {
        let rec = Recorder::default();
        let r = Registry::new(&DEFAULT_BINDINGS).expect("reference bindings should be valid");
        let (worker, tx) = Worker::spawn(rec.clone(), 4).expect("worker should start");
        for idx in [2, 0, 3] {
            tx.send(*r.binding(Switch(idx)).expect("switch should be bound"))
                .expect("worker should be running");
        }
        drop(tx);
        worker.join().expect("worker should exit cleanly");
        assert_eq!(rec.switched(), [Switch(2), Switch(0), Switch(3)]);
    }
}
