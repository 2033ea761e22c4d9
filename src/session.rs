use std::sync::mpsc;
use std::thread;

use crate::engine::{self, CancelFlag, ScanEvent, ScanOptions};

/// A scan running on its own worker thread.
///
/// Engine events are forwarded into an mpsc channel so the calling
/// thread stays free to handle input while the walk runs; iteration
/// over [`events`](Self::events) ends once the final `Complete` event
/// has been delivered and the worker hangs up. One session is one
/// invocation; spawn a fresh one for the next run. Keeping at most
/// one session alive at a time is the caller's job.
pub struct ScanSession {
    events: mpsc::Receiver<ScanEvent>,
    cancel: CancelFlag,
    worker: Option<thread::JoinHandle<()>>,
}

impl ScanSession {
    /// Start a scan on a background thread.
    pub fn spawn(opts: ScanOptions) -> Self {
        let (tx, rx) = mpsc::channel::<ScanEvent>();
        let cancel = CancelFlag::new();
        let flag = cancel.clone();

        let worker = thread::spawn(move || {
            engine::run(&opts, &flag, &mut |event| {
                // A hung-up receiver just means nobody is listening
                // anymore; the scan finishes on its own terms.
                let _ = tx.send(event);
            });
            tracing::debug!("scan worker finished");
        });

        Self {
            events: rx,
            cancel,
            worker: Some(worker),
        }
    }

    /// Handle for cancelling this scan from another thread.
    pub fn cancel_flag(&self) -> CancelFlag {
        self.cancel.clone()
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Event stream for this invocation, in discovery order.
    pub fn events(&self) -> &mpsc::Receiver<ScanEvent> {
        &self.events
    }

    /// Wait for the worker thread to finish.
    pub fn join(mut self) {
        if let Some(worker) = self.worker.take() {
            let _ = worker.join();
        }
    }
}
