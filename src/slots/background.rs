//! Fire-and-forget wrapper that moves slot I/O onto a worker thread

use crate::core::{DurableSlot, FlushTicket, LoggerError, Result};
use crossbeam_channel::{bounded, Sender, TrySendError};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

/// How long drop waits for the worker to finish the last write
pub const DEFAULT_DRAIN_TIMEOUT: Duration = Duration::from_secs(5);

enum Pending {
    Write(String),
    Clear,
}

enum Command {
    Apply,
    Flush(Sender<Result<()>>),
}

/// Wraps another slot so `write` and `clear` return immediately.
///
/// Only the latest requested state is kept: a burst of writes while the
/// worker is busy collapses into one write of the newest snapshot. Worker
/// failures cannot reach the caller, so they are counted and reported on
/// stderr.
///
/// # Example
///
/// ```
/// use factory_diagnostics::slots::{BackgroundSlot, MemorySlot};
/// use factory_diagnostics::DurableSlot;
///
/// let memory = MemorySlot::new("logs");
/// let mut slot = BackgroundSlot::new(memory.clone());
/// slot.write("[]").unwrap();
/// slot.flush().unwrap();
/// assert_eq!(memory.contents().as_deref(), Some("[]"));
/// ```
pub struct BackgroundSlot {
    key: String,
    inner: Arc<Mutex<Box<dyn DurableSlot>>>,
    pending: Arc<Mutex<Option<Pending>>>,
    sender: Option<Sender<Command>>,
    handle: Option<thread::JoinHandle<()>>,
    failures: Arc<AtomicU64>,
}

impl BackgroundSlot {
    pub fn new<S: DurableSlot + 'static>(slot: S) -> Self {
        let key = slot.key().to_string();
        let inner: Arc<Mutex<Box<dyn DurableSlot>>> = Arc::new(Mutex::new(Box::new(slot)));
        let pending: Arc<Mutex<Option<Pending>>> = Arc::new(Mutex::new(None));
        let failures = Arc::new(AtomicU64::new(0));
        let (sender, receiver) = bounded::<Command>(1);

        let worker_inner = Arc::clone(&inner);
        let worker_pending = Arc::clone(&pending);
        let worker_failures = Arc::clone(&failures);
        let worker_key = key.clone();

        let handle = thread::spawn(move || {
            // Exits once every sender is gone
            while let Ok(command) = receiver.recv() {
                let next = worker_pending.lock().take();
                if let Some(next) = next {
                    let mut slot = worker_inner.lock();
                    let result = match next {
                        Pending::Write(payload) => slot.write(&payload),
                        Pending::Clear => slot.clear(),
                    };
                    if let Err(e) = result {
                        worker_failures.fetch_add(1, Ordering::Relaxed);
                        eprintln!("[LOGGER ERROR] Background slot '{}' failed: {}", worker_key, e);
                    }
                }

                if let Command::Flush(ack) = command {
                    let result = worker_inner.lock().flush();
                    let _ = ack.send(result);
                }
            }
        });

        Self {
            key,
            inner,
            pending,
            sender: Some(sender),
            handle: Some(handle),
            failures,
        }
    }

    /// Number of writes or clears the worker could not apply
    pub fn failure_count(&self) -> u64 {
        self.failures.load(Ordering::Relaxed)
    }

    fn submit(&self, next: Pending) -> Result<()> {
        let sender = self.sender.as_ref().ok_or(LoggerError::WorkerStopped)?;
        *self.pending.lock() = Some(next);

        match sender.try_send(Command::Apply) {
            // A full queue already holds a command that will pick up `pending`
            Ok(()) | Err(TrySendError::Full(_)) => Ok(()),
            Err(TrySendError::Disconnected(_)) => Err(LoggerError::WorkerStopped),
        }
    }
}

impl DurableSlot for BackgroundSlot {
    fn key(&self) -> &str {
        &self.key
    }

    fn read(&self) -> Result<Option<String>> {
        self.inner.lock().read()
    }

    fn write(&mut self, payload: &str) -> Result<()> {
        self.submit(Pending::Write(payload.to_string()))
    }

    fn clear(&mut self) -> Result<()> {
        self.submit(Pending::Clear)
    }

    fn flush(&mut self) -> Result<()> {
        self.begin_flush().wait()
    }

    /// Queues the flush behind pending writes; the ticket resolves once the
    /// worker has applied them and flushed the wrapped slot
    fn begin_flush(&mut self) -> FlushTicket {
        let Some(sender) = self.sender.as_ref() else {
            return FlushTicket::ready(Err(LoggerError::WorkerStopped));
        };
        let (ack_tx, ack_rx) = bounded(1);
        if sender.send(Command::Flush(ack_tx)).is_err() {
            return FlushTicket::ready(Err(LoggerError::WorkerStopped));
        }
        FlushTicket::pending(ack_rx)
    }
}

impl Drop for BackgroundSlot {
    fn drop(&mut self) {
        // Queue a final apply so a coalesced write is not lost, then close
        if let Some(sender) = self.sender.take() {
            let _ = sender.try_send(Command::Apply);
        }

        if let Some(handle) = self.handle.take() {
            let start = Instant::now();
            loop {
                if handle.is_finished() {
                    if let Err(e) = handle.join() {
                        eprintln!("[LOGGER ERROR] Background slot worker panicked: {:?}", e);
                    }
                    break;
                }

                if start.elapsed() >= DEFAULT_DRAIN_TIMEOUT {
                    eprintln!(
                        "[LOGGER WARNING] Background slot '{}' did not drain within {:?}. \
                         The last snapshot may be lost.",
                        self.key, DEFAULT_DRAIN_TIMEOUT
                    );
                    break;
                }

                thread::sleep(Duration::from_millis(10));
            }
        }
    }
}
