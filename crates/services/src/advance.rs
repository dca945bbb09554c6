use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::debug;

use crate::quiz::AdvanceTicket;

/// Pause between a correct answer and the next flag.
pub const ADVANCE_DELAY: Duration = Duration::from_millis(2000);

/// Delivers an `AdvanceTicket` after a fixed delay unless cancelled first.
///
/// At most one advance is pending; scheduling again replaces it. Must be used
/// inside a tokio runtime.
pub struct AdvanceScheduler {
    delay: Duration,
    sender: mpsc::UnboundedSender<AdvanceTicket>,
    pending: Option<JoinHandle<()>>,
}

impl AdvanceScheduler {
    /// Create a scheduler and the receiver its tickets arrive on.
    #[must_use]
    pub fn new(delay: Duration) -> (Self, mpsc::UnboundedReceiver<AdvanceTicket>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (
            Self {
                delay,
                sender,
                pending: None,
            },
            receiver,
        )
    }

    #[must_use]
    pub fn delay(&self) -> Duration {
        self.delay
    }

    pub fn schedule(&mut self, ticket: AdvanceTicket) {
        self.cancel();
        let sender = self.sender.clone();
        let delay = self.delay;
        debug!(round = ticket.round(), asked = ticket.asked(), ?delay, "advance scheduled");
        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            // Receiver gone means the quiz was torn down.
            let _ = sender.send(ticket);
        }));
    }

    /// Abort the pending advance. Returns true if one was still waiting.
    pub fn cancel(&mut self) -> bool {
        match self.pending.take() {
            Some(handle) if !handle.is_finished() => {
                handle.abort();
                debug!("pending advance cancelled");
                true
            }
            _ => false,
        }
    }

    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.pending
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }
}

impl Drop for AdvanceScheduler {
    fn drop(&mut self) {
        self.cancel();
    }
}
