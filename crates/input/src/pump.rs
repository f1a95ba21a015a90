//! The input pump thread.

use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use tracing::{debug, error, info, warn};

use crate::queue::{InputSender, Pushed};
use crate::source::InputSource;

/// How long a single read may wait before the pump re-checks its stop flag.
pub const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Handle to a running pump thread.
///
/// The thread owns the source and the sending half of the queue. It exits
/// when stopped, when the source ends or fails, or when the consumer is
/// gone; in every case the sender is dropped, which closes the queue.
#[derive(Debug)]
pub struct InputPump {
    handle: Option<JoinHandle<()>>,
    running: Arc<AtomicBool>,
}

impl InputPump {
    /// Start pumping `source` into `sender`.
    ///
    /// Log records from the pump thread go to `dispatch`.
    pub fn spawn(
        source: Box<dyn InputSource>,
        sender: InputSender,
        dispatch: tracing::Dispatch,
    ) -> io::Result<Self> {
        let running = Arc::new(AtomicBool::new(true));
        let flag = Arc::clone(&running);
        let handle = thread::Builder::new()
            .name("input-pump".to_string())
            .spawn(move || {
                let _log = tracing::dispatcher::set_default(&dispatch);
                pump(source, sender, &flag);
            })?;
        Ok(Self {
            handle: Some(handle),
            running,
        })
    }

    pub fn is_finished(&self) -> bool {
        self.handle.as_ref().map_or(true, JoinHandle::is_finished)
    }

    /// Ask the thread to stop and wait for it.
    pub fn stop(mut self) {
        self.running.store(false, Ordering::Release);
        self.join_inner();
    }

    /// Wait for the thread to exit on its own (source ended or failed).
    pub fn join(mut self) {
        self.join_inner();
    }

    fn join_inner(&mut self) {
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                warn!("input pump thread panicked");
            }
        }
    }
}

impl Drop for InputPump {
    fn drop(&mut self) {
        self.running.store(false, Ordering::Release);
    }
}

fn pump(mut source: Box<dyn InputSource>, sender: InputSender, running: &AtomicBool) {
    debug!("input pump started");
    while running.load(Ordering::Acquire) {
        match source.next_event(POLL_INTERVAL) {
            Ok(Some(event)) => match sender.push(event) {
                Pushed::Queued => debug!(?event, "input queued"),
                Pushed::Dropped => debug!(?event, "input queue full, dropping event"),
                Pushed::Closed => {
                    debug!("input consumer gone");
                    return;
                }
            },
            Ok(None) => {}
            Err(err) if err.kind() == io::ErrorKind::UnexpectedEof => {
                info!("end of input stream");
                return;
            }
            Err(err) => {
                error!(%err, "error reading input");
                return;
            }
        }
    }
    debug!("input pump stopped");
}
