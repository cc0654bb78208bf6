//! The reminder evaluator.
//!
//! [`due_reminders`] is a single, side-effect-free scan. [`spawn`] runs that
//! scan on a fixed interval in a background task and hands every non-empty
//! result to the caller over a channel, so no presentation layer is needed to
//! drive or test it.
//!
//! No acknowledgement state exists: an entry stays due, and is reported on
//! every scan, until it is marked done.

use std::{sync::Arc, time::Duration};

use chrono::NaiveDateTime;
use tokio::{
  sync::mpsc,
  task::JoinHandle,
  time::MissedTickBehavior,
};
use tracing::{debug, warn};

use crate::{
  entry::{ScheduleEntry, Status},
  store::{EntryFilter, ScheduleStore},
};

/// Period between scans when none is configured.
pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(60);

const CHANNEL_CAPACITY: usize = 16;

/// Entries that need a reminder at `now`: reminder enabled, still
/// incomplete, and scheduled at or before `now`. Ordered like
/// [`ScheduleStore::list`].
pub async fn due_reminders<S>(
  store: &S,
  now: NaiveDateTime,
) -> Result<Vec<ScheduleEntry>, S::Error>
where
  S: ScheduleStore,
{
  let filter = EntryFilter {
    reminder: Some(true),
    status: Some(Status::Incomplete),
    due_by: Some(now),
    ..EntryFilter::default()
  };
  store.list(&filter).await
}

/// One scan's worth of due entries.
#[derive(Debug, Clone)]
pub struct DueReminders {
  pub evaluated_at: NaiveDateTime,
  pub entries:      Vec<ScheduleEntry>,
}

/// Handle to a running reminder task.
pub struct ReminderTask {
  handle: JoinHandle<()>,
}

impl ReminderTask {
  /// Stop scanning. Batches already sent remain readable on the receiver.
  pub fn stop(self) { self.handle.abort(); }

  pub fn is_finished(&self) -> bool { self.handle.is_finished() }
}

/// Start scanning `store` once immediately and then every `interval`, using
/// `clock` for the evaluation instant.
///
/// Store failures are logged and the task carries on with the next tick.
/// The task ends when the receiver is dropped or [`ReminderTask::stop`] is
/// called.
///
/// # Panics
///
/// Panics if `interval` is zero, or if called outside a tokio runtime.
pub fn spawn<S, C>(
  store: Arc<S>,
  interval: Duration,
  clock: C,
) -> (ReminderTask, mpsc::Receiver<DueReminders>)
where
  S: ScheduleStore + 'static,
  C: Fn() -> NaiveDateTime + Send + 'static,
{
  let (tx, rx) = mpsc::channel(CHANNEL_CAPACITY);

  let handle = tokio::spawn(async move {
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
      tokio::select! {
        _ = tx.closed() => break,
        _ = ticker.tick() => {}
      }

      let now = clock();
      match due_reminders(store.as_ref(), now).await {
        Ok(entries) if entries.is_empty() => {
          debug!(%now, "no reminders due");
        }
        Ok(entries) => {
          debug!(%now, count = entries.len(), "reminders due");
          let batch = DueReminders { evaluated_at: now, entries };
          if tx.send(batch).await.is_err() {
            break;
          }
        }
        Err(e) => warn!(%now, error = %e, "reminder scan failed"),
      }
    }

    debug!("reminder task finished");
  });

  (ReminderTask { handle }, rx)
}
