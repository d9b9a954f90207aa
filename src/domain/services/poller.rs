#[cfg(test)]
#[path = "poller_test.rs"]
mod tests;

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

use super::actions::ActionsService;
use crate::domain::models::Action;
use crate::domain::models::BackendArc;
use crate::domain::models::Event;

/// Keeps the inspector's status and collection snapshots fresh for the
/// lifetime of an interface.
///
/// Dropping the poller cancels it.
pub struct StatusPoller {
    cancel: CancellationToken,
    task: Option<JoinHandle<()>>,
}

/// Returns false once nobody is listening anymore.
async fn refresh(backend: &BackendArc, tx: &mpsc::UnboundedSender<Event>, action: Action) -> bool {
    if let Some(event) = ActionsService::execute(backend, action).await {
        return tx.send(Event::Backend(event)).is_ok();
    }

    return !tx.is_closed();
}

async fn run(
    backend: BackendArc,
    tx: mpsc::UnboundedSender<Event>,
    period: Duration,
    cancel: CancellationToken,
) {
    let initial = async {
        return refresh(&backend, &tx, Action::RefreshSystemStatus()).await
            && refresh(&backend, &tx, Action::RefreshCollectionStats()).await;
    };
    tokio::select! {
        biased;
        _ = cancel.cancelled() => return,
        open = initial => {
            if !open {
                return;
            }
        }
    }

    let mut interval = time::interval_at(time::Instant::now() + period, period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => break,
            _ = interval.tick() => {
                let open = tokio::select! {
                    biased;
                    _ = cancel.cancelled() => false,
                    open = refresh(&backend, &tx, Action::RefreshCollectionStats()) => open,
                };
                if !open {
                    break;
                }
            }
        }
    }

    tracing::debug!("Status poller stopped");
}

impl StatusPoller {
    /// Fetches the system status and collection stats right away, then
    /// refreshes the collection stats every `period`.
    pub fn start(
        backend: BackendArc,
        tx: mpsc::UnboundedSender<Event>,
        period: Duration,
    ) -> StatusPoller {
        let cancel = CancellationToken::new();
        let task = tokio::spawn(run(backend, tx, period, cancel.clone()));

        return StatusPoller {
            cancel,
            task: Some(task),
        };
    }

    /// Cancels the schedule and waits for the task to wind down, so no
    /// refresh can start after this returns.
    pub async fn stop(mut self) {
        self.cancel.cancel();
        if let Some(task) = self.task.take() {
            if let Err(err) = task.await {
                tracing::warn!(error = ?err, "Status poller exited abnormally");
            }
        }
    }
}

impl Drop for StatusPoller {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}
