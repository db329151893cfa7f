use std::time::Duration;

use tracing::debug;

use super::{PickError, PickOutcome};

/// Handle for one pick in flight.
#[derive(Debug)]
pub struct PickRequest {
    receiver: flume::Receiver<PickOutcome>,
}

/// The sending half, owned by whoever finishes the pick.
#[derive(Debug)]
pub(crate) struct PickResponder {
    sender: flume::Sender<PickOutcome>,
}

impl PickRequest {
    pub(crate) fn channel() -> (PickResponder, PickRequest) {
        let (sender, receiver) = flume::bounded(1);
        (PickResponder { sender }, PickRequest { receiver })
    }

    /// A request that has already finished.
    pub(crate) fn ready(outcome: PickOutcome) -> PickRequest {
        let (responder, request) = Self::channel();
        responder.respond(outcome);
        request
    }

    /// Block until the pick finishes.
    pub fn wait(self) -> PickOutcome {
        self.receiver
            .recv()
            .unwrap_or(PickOutcome::Failed(PickError::Abandoned))
    }

    /// Block for at most `timeout`. `None` means still in flight.
    pub fn wait_timeout(&self, timeout: Duration) -> Option<PickOutcome> {
        match self.receiver.recv_timeout(timeout) {
            Ok(outcome) => Some(outcome),
            Err(flume::RecvTimeoutError::Timeout) => None,
            Err(flume::RecvTimeoutError::Disconnected) => {
                Some(PickOutcome::Failed(PickError::Abandoned))
            }
        }
    }

    /// The outcome if the pick has finished.
    pub fn try_outcome(&self) -> Option<PickOutcome> {
        match self.receiver.try_recv() {
            Ok(outcome) => Some(outcome),
            Err(flume::TryRecvError::Empty) => None,
            Err(flume::TryRecvError::Disconnected) => {
                Some(PickOutcome::Failed(PickError::Abandoned))
            }
        }
    }

    pub async fn outcome(self) -> PickOutcome {
        self.receiver
            .recv_async()
            .await
            .unwrap_or(PickOutcome::Failed(PickError::Abandoned))
    }
}

impl PickResponder {
    pub(crate) fn respond(self, outcome: PickOutcome) {
        if self.sender.send(outcome).is_err() {
            debug!("Pick outcome dropped, request handle already gone");
        }
    }
}
