//! Cooperative cancellation for stream rendering.
//!
//! A `CancelSource` owns the sending half of a channel that never carries a
//! message; cancelling drops it. Every `CancelToken` then observes a
//! disconnected channel, which doubles as an interruptible sleep:
//! `recv_timeout` returns as soon as the source is gone instead of waiting
//! out the throttle interval.

use std::time::Duration;

use crossbeam_channel::{Receiver, RecvTimeoutError, Sender, TryRecvError, bounded};
use tracing::debug;

/// Side that requests cancellation. Dropping it cancels too.
#[derive(Debug)]
pub struct CancelSource {
    _tx: Sender<()>,
    rx: Receiver<()>,
}

#[derive(Debug, Clone)]
pub struct CancelToken {
    rx: Option<Receiver<()>>,
}

impl CancelSource {
    pub fn new() -> Self {
        let (tx, rx) = bounded(0);
        Self { _tx: tx, rx }
    }

    pub fn token(&self) -> CancelToken {
        CancelToken {
            rx: Some(self.rx.clone()),
        }
    }

    pub fn cancel(self) {
        debug!(target: "render.stream", "cancel_requested");
    }
}

impl Default for CancelSource {
    fn default() -> Self {
        Self::new()
    }
}

impl CancelToken {
    /// A token nobody can cancel.
    pub fn never() -> Self {
        Self { rx: None }
    }

    pub fn is_cancelled(&self) -> bool {
        match &self.rx {
            Some(rx) => matches!(rx.try_recv(), Err(TryRecvError::Disconnected)),
            None => false,
        }
    }

    /// Sleep for `interval` unless cancelled first. Returns true when the
    /// sleep was cut short by cancellation.
    pub fn sleep(&self, interval: Duration) -> bool {
        if interval.is_zero() {
            return self.is_cancelled();
        }
        match &self.rx {
            Some(rx) => !matches!(rx.recv_timeout(interval), Err(RecvTimeoutError::Timeout)),
            None => {
                std::thread::sleep(interval);
                false
            }
        }
    }
}

impl Default for CancelToken {
    fn default() -> Self {
        Self::never()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;

    #[test]
    fn token_observes_cancel() {
        let source = CancelSource::new();
        let token = source.token();
        assert!(!token.is_cancelled());
        source.cancel();
        assert!(token.is_cancelled());
        assert!(token.clone().is_cancelled());
    }

    #[test]
    fn cancel_interrupts_sleep() {
        let source = CancelSource::new();
        let token = source.token();
        let handle = std::thread::spawn(move || {
            let started = Instant::now();
            let interrupted = token.sleep(Duration::from_secs(10));
            (interrupted, started.elapsed())
        });
        std::thread::sleep(Duration::from_millis(20));
        source.cancel();
        let (interrupted, elapsed) = handle.join().unwrap();
        assert!(interrupted);
        assert!(elapsed < Duration::from_secs(5));
    }

    #[test]
    fn uncancelled_sleep_runs_out() {
        let source = CancelSource::new();
        assert!(!source.token().sleep(Duration::from_millis(1)));
        assert!(!CancelToken::never().sleep(Duration::from_millis(1)));
    }
}
