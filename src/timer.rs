use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crate::msg::Msg;

/// Periodic `Msg::Refresh` sender. Stops when dropped.
#[derive(Debug)]
pub struct RefreshTimer {
    stopped: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl RefreshTimer {
    pub fn spawn(interval: Duration, tx: mpsc::Sender<Msg>) -> Self {
        let stopped = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&stopped);

        let handle = thread::spawn(move || {
            let mut deadline = Instant::now() + interval;
            loop {
                if flag.load(Ordering::Acquire) {
                    break;
                }

                let now = Instant::now();
                if now >= deadline {
                    if tx.send(Msg::Refresh).is_err() {
                        break;
                    }
                    deadline = now + interval;
                    continue;
                }

                thread::park_timeout(deadline - now);
            }
        });

        Self {
            stopped,
            handle: Some(handle),
        }
    }
}

impl Drop for RefreshTimer {
    fn drop(&mut self) {
        self.stopped.store(true, Ordering::Release);
        if let Some(handle) = self.handle.take() {
            handle.thread().unpark();
            if handle.join().is_err() {
                tracing::warn!("refresh timer thread panicked");
            }
        }
    }
}
