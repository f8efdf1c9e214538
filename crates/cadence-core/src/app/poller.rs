//! Periodic reminder poll loop.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use super::reminder::ReminderDispatcher;
use crate::ports::ReminderSink;

/// Recommended poll period.
pub const DEFAULT_POLL_PERIOD: Duration = Duration::from_secs(60);

/// Poller handle.
/// - `request_shutdown()` でループが止まる
/// - `shutdown_and_join()` で終了を待てる
pub struct ReminderPoller {
    shutdown_tx: watch::Sender<bool>,
    join: JoinHandle<()>,
}

impl ReminderPoller {
    /// Spawn the poll loop with the recommended [`DEFAULT_POLL_PERIOD`].
    pub fn spawn_default(dispatcher: ReminderDispatcher, sink: Arc<dyn ReminderSink>) -> Self {
        Self::spawn(dispatcher, sink, DEFAULT_POLL_PERIOD)
    }

    /// Spawn the poll loop on the current tokio runtime.
    pub fn spawn(
        dispatcher: ReminderDispatcher,
        sink: Arc<dyn ReminderSink>,
        period: Duration,
    ) -> Self {
        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        let join = tokio::spawn(async move {
            poll_loop(dispatcher, sink, period, shutdown_rx).await;
        });

        Self { shutdown_tx, join }
    }

    /// Request shutdown. An in-flight poll finishes first; its side effects
    /// are idempotent, so stopping mid-cycle causes no corruption.
    pub fn request_shutdown(&self) {
        // ignore send error: receiver may already be dropped
        let _ = self.shutdown_tx.send(true);
    }

    pub async fn shutdown_and_join(self) {
        self.request_shutdown();
        let _ = self.join.await;
    }
}

async fn poll_loop(
    dispatcher: ReminderDispatcher,
    sink: Arc<dyn ReminderSink>,
    period: Duration,
    mut shutdown_rx: watch::Receiver<bool>,
) {
    let mut ticker = tokio::time::interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        if *shutdown_rx.borrow() {
            break;
        }

        tokio::select! {
            _ = shutdown_rx.changed() => {
                // 変更が入ったら次のループで判定
                continue;
            }
            _ = ticker.tick() => {}
        }

        // The claim (select-and-mark) happens inside the store's critical
        // section; delivery happens here, strictly after it released.
        let batch = match dispatcher.poll(None).await {
            Ok(batch) => batch,
            Err(e) => {
                eprintln!("[reminder-poller] poll failed: {e}");
                continue;
            }
        };

        if batch.is_empty() {
            continue;
        }

        if let Err(e) = sink.deliver(batch).await {
            // The occurrences stay marked; at-most-once over exactly-once.
            eprintln!("[reminder-poller] delivery failed: {e}");
        }
    }
}
