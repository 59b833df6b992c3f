//! Transient notifications

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::debug;

#[derive(Debug, Default)]
struct Slot {
    message: Option<String>,
    /// Bumped on every show so a stale timer cannot hide a newer message
    generation: u64,
}

/// Shows one message at a time and hides it after a delay
///
/// Showing a message cancels the dismissal timer of the previous one, so
/// there is never more than one pending timer. Must be used inside a tokio
/// runtime.
#[derive(Debug)]
pub struct Toaster {
    slot: Arc<Mutex<Slot>>,
    pending: Option<JoinHandle<()>>,
    default_duration: Duration,
}

impl Toaster {
    pub fn new(default_duration: Duration) -> Self {
        Self {
            slot: Arc::new(Mutex::new(Slot::default())),
            pending: None,
            default_duration,
        }
    }

    /// Show `message` for `duration` (or the default duration)
    pub fn show(&mut self, message: impl Into<String>, duration: Option<Duration>) {
        let message = message.into();
        let duration = duration.unwrap_or(self.default_duration);

        if let Some(timer) = self.pending.take() {
            timer.abort();
        }

        let generation = {
            let mut slot = self.slot.lock().unwrap_or_else(PoisonError::into_inner);
            slot.generation += 1;
            slot.message = Some(message.clone());
            slot.generation
        };
        debug!("Toast shown for {:?}: {}", duration, message);

        let slot = Arc::clone(&self.slot);
        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(duration).await;
            let mut slot = slot.lock().unwrap_or_else(PoisonError::into_inner);
            if slot.generation == generation {
                slot.message = None;
            }
        }));
    }

    /// The message currently on screen
    pub fn visible(&self) -> Option<String> {
        self.slot
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .message
            .clone()
    }

    /// Hide the current message now
    pub fn dismiss(&mut self) {
        if let Some(timer) = self.pending.take() {
            timer.abort();
        }
        self.slot
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .message = None;
    }
}

impl Drop for Toaster {
    fn drop(&mut self) {
        if let Some(timer) = self.pending.take() {
            timer.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SHORT: Duration = Duration::from_millis(3000);

    async fn advance(ms: u64) {
        tokio::time::sleep(Duration::from_millis(ms)).await;
    }

    #[tokio::test(start_paused = true)]
    async fn message_hides_after_default_duration() {
        let mut toaster = Toaster::new(SHORT);
        toaster.show("Contact added successfully", None);
        assert_eq!(toaster.visible().as_deref(), Some("Contact added successfully"));

        advance(2999).await;
        assert!(toaster.visible().is_some());

        advance(2).await;
        assert_eq!(toaster.visible(), None);
    }

    #[tokio::test(start_paused = true)]
    async fn new_message_replaces_pending_timer() {
        let mut toaster = Toaster::new(SHORT);
        toaster.show("first", None);
        advance(2000).await;

        toaster.show("second", Some(Duration::from_millis(5000)));
        advance(1500).await;
        assert_eq!(toaster.visible().as_deref(), Some("second"), "old timer cancelled");

        advance(4000).await;
        assert_eq!(toaster.visible(), None);
    }

    #[tokio::test(start_paused = true)]
    async fn dismiss_hides_immediately() {
        let mut toaster = Toaster::new(SHORT);
        toaster.show("bye", None);
        toaster.dismiss();
        assert_eq!(toaster.visible(), None);
    }
}
