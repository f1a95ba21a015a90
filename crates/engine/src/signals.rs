//! Signal subscription.
//!
//! Bridges OS signals into two small bounded channels the loop polls without
//! blocking: one for shutdown (interrupt, terminate) and one for window
//! resizes. Listening happens on one extra thread driving a current-thread
//! tokio runtime; it never touches game state.

use std::io;
use std::thread::{self, JoinHandle};

use tokio::runtime::Builder;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, warn};

const SIGNAL_QUEUE_DEPTH: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShutdownSignal {
    Interrupt,
    Terminate,
}

/// Sending side: raises signals into a [`Signals`] instance.
///
/// Held by the OS listener task, or directly by tests and embedders.
#[derive(Debug, Clone)]
pub struct SignalTrigger {
    shutdown: mpsc::Sender<ShutdownSignal>,
    resize: mpsc::Sender<()>,
}

impl SignalTrigger {
    pub fn interrupt(&self) {
        let _ = self.shutdown.try_send(ShutdownSignal::Interrupt);
    }

    pub fn terminate(&self) {
        let _ = self.shutdown.try_send(ShutdownSignal::Terminate);
    }

    pub fn resize(&self) {
        let _ = self.resize.try_send(());
    }
}

/// Receiving side, owned by the game loop.
#[derive(Debug)]
pub struct Signals {
    shutdown: mpsc::Receiver<ShutdownSignal>,
    resize: mpsc::Receiver<()>,
    listener: Option<Listener>,
}

/// The listener thread; stopped and joined on drop.
#[derive(Debug)]
struct Listener {
    stop: Option<oneshot::Sender<()>>,
    handle: Option<JoinHandle<()>>,
}

impl Drop for Listener {
    fn drop(&mut self) {
        if let Some(stop) = self.stop.take() {
            let _ = stop.send(());
        }
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                warn!("signal listener thread panicked");
            }
        }
    }
}

impl Signals {
    /// Channels with no OS subscription; raise signals through the trigger.
    pub fn manual() -> (SignalTrigger, Self) {
        let (shutdown_tx, shutdown_rx) = mpsc::channel(SIGNAL_QUEUE_DEPTH);
        let (resize_tx, resize_rx) = mpsc::channel(SIGNAL_QUEUE_DEPTH);
        (
            SignalTrigger {
                shutdown: shutdown_tx,
                resize: resize_tx,
            },
            Self {
                shutdown: shutdown_rx,
                resize: resize_rx,
                listener: None,
            },
        )
    }

    /// Subscribe to interrupt, terminate and window-resize signals.
    pub fn subscribe() -> io::Result<Self> {
        let (trigger, mut signals) = Self::manual();
        let runtime = Builder::new_current_thread().enable_all().build()?;
        // Registration needs the runtime's signal driver.
        let streams = {
            let _enter = runtime.enter();
            OsSignals::register()?
        };

        let (stop_tx, stop_rx) = oneshot::channel();
        let handle = thread::Builder::new()
            .name("signal-listener".to_string())
            .spawn(move || runtime.block_on(forward(streams, trigger, stop_rx)))?;
        signals.listener = Some(Listener {
            stop: Some(stop_tx),
            handle: Some(handle),
        });
        Ok(signals)
    }

    /// Take one pending shutdown signal, if any.
    pub fn try_shutdown(&mut self) -> Option<ShutdownSignal> {
        self.shutdown.try_recv().ok()
    }

    /// Whether at least one resize is pending. Drains them all, so a burst of
    /// resizes costs one layout pass.
    pub fn take_resize(&mut self) -> bool {
        let mut fired = false;
        while self.resize.try_recv().is_ok() {
            fired = true;
        }
        fired
    }
}

#[cfg(unix)]
struct OsSignals {
    interrupt: tokio::signal::unix::Signal,
    terminate: tokio::signal::unix::Signal,
    winch: tokio::signal::unix::Signal,
}

#[cfg(unix)]
impl OsSignals {
    fn register() -> io::Result<Self> {
        use tokio::signal::unix::{signal, SignalKind};

        Ok(Self {
            interrupt: signal(SignalKind::interrupt())?,
            terminate: signal(SignalKind::terminate())?,
            winch: signal(SignalKind::window_change())?,
        })
    }
}

#[cfg(unix)]
async fn forward(mut os: OsSignals, trigger: SignalTrigger, mut stop: oneshot::Receiver<()>) {
    loop {
        tokio::select! {
            _ = &mut stop => break,
            Some(()) = os.interrupt.recv() => {
                debug!("SIGINT");
                trigger.interrupt();
            }
            Some(()) = os.terminate.recv() => {
                debug!("SIGTERM");
                trigger.terminate();
            }
            Some(()) = os.winch.recv() => trigger.resize(),
            else => break,
        }
    }
}

#[cfg(not(unix))]
struct OsSignals;

#[cfg(not(unix))]
impl OsSignals {
    fn register() -> io::Result<Self> {
        Ok(Self)
    }
}

#[cfg(not(unix))]
async fn forward(_os: OsSignals, trigger: SignalTrigger, mut stop: oneshot::Receiver<()>) {
    loop {
        tokio::select! {
            _ = &mut stop => break,
            res = tokio::signal::ctrl_c() => {
                if res.is_err() {
                    break;
                }
                debug!("ctrl-c");
                trigger.interrupt();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manual_trigger_delivers_shutdown_in_order() {
        let (trigger, mut signals) = Signals::manual();
        assert_eq!(signals.try_shutdown(), None);
        trigger.interrupt();
        trigger.terminate();
        assert_eq!(signals.try_shutdown(), Some(ShutdownSignal::Interrupt));
        assert_eq!(signals.try_shutdown(), Some(ShutdownSignal::Terminate));
        assert_eq!(signals.try_shutdown(), None);
    }

    #[test]
    fn resizes_coalesce() {
        let (trigger, mut signals) = Signals::manual();
        assert!(!signals.take_resize());
        trigger.resize();
        trigger.resize();
        trigger.resize();
        assert!(signals.take_resize());
        assert!(!signals.take_resize());
    }

    #[test]
    fn overflowing_trigger_never_blocks() {
        let (trigger, mut signals) = Signals::manual();
        for _ in 0..(SIGNAL_QUEUE_DEPTH * 3) {
            trigger.interrupt();
        }
        let mut n = 0;
        while signals.try_shutdown().is_some() {
            n += 1;
        }
        assert_eq!(n, SIGNAL_QUEUE_DEPTH);
    }

    #[cfg(unix)]
    #[test]
    fn subscribe_starts_named_listener_and_drop_joins_it() {
        let mut signals = Signals::subscribe().unwrap();
        assert_eq!(signals.try_shutdown(), None);

        let listener = signals.listener.as_ref().unwrap();
        let handle = listener.handle.as_ref().unwrap();
        assert_eq!(handle.thread().name(), Some("signal-listener"));
        assert!(!handle.is_finished());

        // Joins the listener; would hang if the stop request were ignored.
        drop(signals);
    }
}
