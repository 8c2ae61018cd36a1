//! Running a batch on a worker thread.

use std::path::PathBuf;
use std::sync::mpsc::{channel, Receiver};
use std::thread::{self, JoinHandle};

use rand::Rng;

use super::{BatchRequest, VariationEngine, VariationError};

/// A batch running in the background.
pub struct BatchHandle {
    progress: Receiver<(usize, usize)>,
    worker: JoinHandle<Result<Vec<PathBuf>, VariationError>>,
}

impl BatchHandle {
    /// `(current, total)` events, one per palette file. The channel closes
    /// when the batch ends.
    pub fn progress(&self) -> &Receiver<(usize, usize)> {
        &self.progress
    }

    pub fn is_finished(&self) -> bool {
        self.worker.is_finished()
    }

    /// Wait for the batch and return what [`VariationEngine::generate`] returned.
    pub fn join(self) -> Result<Vec<PathBuf>, VariationError> {
        self.worker.join().map_err(|_| VariationError::WorkerPanicked)?
    }
}

/// Move `engine` onto a new thread and run `request` there.
pub fn spawn_batch<R>(mut engine: VariationEngine<R>, request: BatchRequest) -> BatchHandle
where
    R: Rng + Send + 'static,
{
    let (tx, rx) = channel();
    let worker = thread::spawn(move || {
        // A dropped receiver only means nobody is watching
        let mut report = |current: usize, total: usize| {
            let _ = tx.send((current, total));
        };
        engine.generate(&request, Some(&mut report))
    });
    BatchHandle { progress: rx, worker }
}
