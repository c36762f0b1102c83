//! Debounced auto-save
//!
//! Every edit calls [`AutoSaver::touch`], which (re)starts a quiet-period
//! timer. When the timer runs out the target is flushed once. There is no
//! maximum wait: a target that keeps being touched is never flushed by the
//! timer, only by [`AutoSaver::shutdown`].

use std::fmt::Display;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::Instant;

/// Default quiet period before pending edits are saved
pub const DEFAULT_AUTOSAVE_DELAY: Duration = Duration::from_secs(3);

/// Something holding edits that can be written out in one go
pub trait AutoSave {
    type Error: Display;

    /// Persist pending changes. Returns whether anything was written.
    fn flush(&mut self) -> Result<bool, Self::Error>;
}

#[derive(Debug)]
enum AutoSaveMessage {
    Touch,
    Shutdown,
}

/// Handle to a background debounce task
pub struct AutoSaver {
    sender: mpsc::UnboundedSender<AutoSaveMessage>,
    handle: JoinHandle<()>,
}

impl AutoSaver {
    /// Start the debounce task on the current tokio runtime
    pub fn spawn<T>(target: Arc<Mutex<T>>, delay: Duration) -> Self
    where
        T: AutoSave + Send + 'static,
    {
        let (sender, receiver) = mpsc::unbounded_channel();
        let handle = tokio::spawn(autosave_loop(target, delay, receiver));
        Self { sender, handle }
    }

    /// Record an edit, restarting the quiet period
    pub fn touch(&self) {
        if self.sender.send(AutoSaveMessage::Touch).is_err() {
            log::warn!("Auto-save task is no longer running");
        }
    }

    /// Flush pending edits and stop the task
    pub async fn shutdown(self) {
        let _ = self.sender.send(AutoSaveMessage::Shutdown);
        if let Err(e) = self.handle.await {
            log::error!("Auto-save task ended abnormally: {}", e);
        }
    }
}

async fn autosave_loop<T: AutoSave>(
    target: Arc<Mutex<T>>,
    delay: Duration,
    mut receiver: mpsc::UnboundedReceiver<AutoSaveMessage>,
) {
    let mut deadline: Option<Instant> = None;

    loop {
        let wake_at = deadline;
        let quiet_period = async move {
            match wake_at {
                Some(at) => tokio::time::sleep_until(at).await,
                None => std::future::pending::<()>().await,
            }
        };

        tokio::select! {
            message = receiver.recv() => match message {
                Some(AutoSaveMessage::Touch) => {
                    deadline = Some(Instant::now() + delay);
                }
                Some(AutoSaveMessage::Shutdown) => {
                    flush_target(&target);
                    break;
                }
                // Handle dropped
                None => break,
            },
            _ = quiet_period => {
                deadline = None;
                flush_target(&target);
            }
        }
    }
}

fn flush_target<T: AutoSave>(target: &Mutex<T>) {
    let mut guard = match target.lock() {
        Ok(guard) => guard,
        Err(_) => {
            log::error!("Auto-save skipped: target lock poisoned");
            return;
        }
    };

    match guard.flush() {
        Ok(true) => log::info!("Auto-saved pending changes"),
        Ok(false) => {}
        Err(e) => log::error!("Auto-save failed: {}", e),
    }
}
