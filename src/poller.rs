//! Polls a single file's status until it reaches a terminal state.

use crate::api::{FileApi, FileRecord};
use derivative::Derivative;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, info};

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(2);

/// Invoked once with the record that carried the terminal status, while the
/// poller's state lock is held. It must not call back into the poller.
pub type CompletionCallback = Box<dyn FnOnce(&FileRecord) + Send + 'static>;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PollSnapshot {
    pub file_id: Option<String>,
    /// Raw status string from the last successful response
    pub status: Option<String>,
    pub polling: bool,
    /// Error from the last failed request; cleared by the next success
    pub error: Option<String>,
}

/// State of one watched file. Replaced wholesale when the watched id changes,
/// so a task that outlives its cancellation writes only to its own copy.
#[derive(Default)]
struct Watch {
    snapshot: Mutex<PollSnapshot>,
    cancelled: AtomicBool,
}

impl Watch {
    fn lock(&self) -> MutexGuard<'_, PollSnapshot> {
        self.snapshot.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[derive(Derivative)]
#[derivative(Debug)]
pub struct StatusPoller {
    #[derivative(Debug = "ignore")]
    api: Arc<dyn FileApi>,
    interval: Duration,
    #[derivative(Debug = "ignore")]
    runtime: Handle,
    #[derivative(Debug = "ignore")]
    watch: Arc<Watch>,
    task: Option<JoinHandle<()>>,
}

impl StatusPoller {
    pub fn new(api: Arc<dyn FileApi>, interval: Duration, runtime: Handle) -> Self {
        Self {
            api,
            interval,
            runtime,
            watch: Arc::new(Watch::default()),
            task: None,
        }
    }

    /// Starts polling `file_id`, cancelling whatever was polled before.
    /// `None` leaves the poller inactive.
    pub fn watch(&mut self, file_id: Option<String>, on_complete: Option<CompletionCallback>) {
        self.stop();
        self.watch = Arc::new(Watch::default());

        let Some(file_id) = file_id else {
            return;
        };

        *self.watch.lock() = PollSnapshot {
            file_id: Some(file_id.clone()),
            polling: true,
            ..Default::default()
        };

        debug!(%file_id, interval_ms = self.interval.as_millis() as u64, "start polling");
        self.task = Some(self.runtime.spawn(poll_until_terminal(
            Arc::clone(&self.api),
            file_id,
            self.interval,
            Arc::clone(&self.watch),
            on_complete,
        )));
    }

    pub fn stop(&mut self) {
        {
            let mut snapshot = self.watch.lock();
            self.watch.cancelled.store(true, Ordering::SeqCst);
            if self.task.is_some() {
                snapshot.polling = false;
            }
        }
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }

    pub fn snapshot(&self) -> PollSnapshot {
        self.watch.lock().clone()
    }

    pub fn is_polling(&self) -> bool {
        self.watch.lock().polling
    }
}

impl Drop for StatusPoller {
    fn drop(&mut self) {
        self.stop();
    }
}

async fn poll_until_terminal(
    api: Arc<dyn FileApi>,
    file_id: String,
    interval: Duration,
    watch: Arc<Watch>,
    on_complete: Option<CompletionCallback>,
) {
    let mut ticker = tokio::time::interval_at(Instant::now() + interval, interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        ticker.tick().await;
        let result = api.file_status(&file_id).await;

        // `stop` sets the flag under this lock, so once it returns nothing below runs.
        let mut snapshot = watch.lock();
        if watch.cancelled.load(Ordering::SeqCst) {
            return;
        }

        match result {
            Ok(record) => {
                let kind = record.status_kind();
                snapshot.status = record.status.clone();
                snapshot.error = None;
                if kind.is_terminal() {
                    snapshot.polling = false;
                    info!(%file_id, status = %kind, "file reached terminal status");
                    if let Some(on_complete) = on_complete {
                        on_complete(&record);
                    }
                    return;
                }
            }
            Err(e) => {
                // Keep going; the next tick is the retry.
                debug!(%file_id, error = %e, "status check failed");
                snapshot.error = Some(e.to_string());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::fake::FakeApi;
    use std::sync::atomic::AtomicUsize;

    const TICK: Duration = Duration::from_millis(10);

    fn poller_with(api: FakeApi) -> (StatusPoller, Arc<FakeApi>) {
        let api = Arc::new(api);
        (StatusPoller::new(api.clone(), TICK, Handle::current()), api)
    }

    fn counting_callback() -> (CompletionCallback, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let callback: CompletionCallback = Box::new(move |_record| {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        (callback, calls)
    }

    async fn wait_until_idle(poller: &StatusPoller) {
        for _ in 0..200 {
            if !poller.is_polling() {
                return;
            }
            tokio::time::sleep(TICK).await;
        }
        panic!("poller never stopped");
    }

    #[tokio::test]
    async fn test_inactive_without_file_id() {
        let (mut poller, api) = poller_with(FakeApi::with_statuses(vec![Ok("PROCESSING")]));
        poller.watch(None, None);

        tokio::time::sleep(TICK * 5).await;
        assert_eq!(poller.snapshot(), PollSnapshot::default());
        assert_eq!(api.status_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_stops_on_terminal_status_and_fires_once() {
        let (mut poller, api) = poller_with(FakeApi::with_statuses(vec![
            Ok("UPLOADED"),
            Ok("Processing"),
            Ok("completed"),
        ]));
        let (callback, calls) = counting_callback();

        poller.watch(Some("f-1".to_string()), Some(callback));
        assert!(poller.is_polling());
        wait_until_idle(&poller).await;

        let polled = api.status_calls.load(Ordering::SeqCst);
        assert_eq!(polled, 3);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(poller.snapshot().status.as_deref(), Some("completed"));

        tokio::time::sleep(TICK * 5).await;
        assert_eq!(api.status_calls.load(Ordering::SeqCst), polled);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_keeps_polling_through_errors() {
        let (mut poller, api) = poller_with(FakeApi::with_statuses(vec![
            Err("gateway timeout"),
            Err("gateway timeout"),
            Ok("FAILED"),
        ]));
        let (callback, calls) = counting_callback();

        poller.watch(Some("f-2".to_string()), Some(callback));
        wait_until_idle(&poller).await;

        let snapshot = poller.snapshot();
        assert_eq!(snapshot.status.as_deref(), Some("FAILED"));
        assert!(snapshot.error.is_none());
        assert_eq!(api.status_calls.load(Ordering::SeqCst), 3);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_records_error_while_polling() {
        let (mut poller, _api) = poller_with(FakeApi::with_statuses(vec![Err("gateway timeout")]));
        poller.watch(Some("f-3".to_string()), None);

        tokio::time::sleep(TICK * 4).await;
        let snapshot = poller.snapshot();
        assert!(snapshot.polling);
        assert_eq!(snapshot.error.as_deref(), Some("gateway timeout"));
    }

    #[tokio::test]
    async fn test_clearing_file_id_cancels() {
        let (mut poller, api) = poller_with(FakeApi::with_statuses(vec![Ok("PROCESSING")]));
        let (callback, calls) = counting_callback();

        poller.watch(Some("f-4".to_string()), Some(callback));
        tokio::time::sleep(TICK * 3).await;
        poller.watch(None, None);

        let polled = api.status_calls.load(Ordering::SeqCst);
        tokio::time::sleep(TICK * 5).await;
        assert_eq!(api.status_calls.load(Ordering::SeqCst), polled);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert!(!poller.is_polling());
        assert_eq!(poller.snapshot().file_id, None);
    }

    #[tokio::test]
    async fn test_stop_discards_in_flight_terminal_status() {
        let api = FakeApi::with_statuses(vec![Ok("COMPLETED")]);
        *api.status_delay.lock().unwrap() = Some(TICK * 5);
        let (mut poller, api) = poller_with(api);
        let (callback, calls) = counting_callback();

        poller.watch(Some("f-8".to_string()), Some(callback));
        tokio::time::sleep(TICK * 3).await;
        assert_eq!(api.status_calls.load(Ordering::SeqCst), 1);
        poller.stop();

        tokio::time::sleep(TICK * 10).await;
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        let snapshot = poller.snapshot();
        assert!(!snapshot.polling);
        assert_eq!(snapshot.status, None);
    }

    #[tokio::test]
    async fn test_drop_cancels() {
        let (mut poller, api) = poller_with(FakeApi::with_statuses(vec![Ok("PROCESSING")]));
        poller.watch(Some("f-5".to_string()), None);
        tokio::time::sleep(TICK * 3).await;
        drop(poller);

        let polled = api.status_calls.load(Ordering::SeqCst);
        tokio::time::sleep(TICK * 5).await;
        assert_eq!(api.status_calls.load(Ordering::SeqCst), polled);
    }

    #[tokio::test]
    async fn test_switching_file_resets_state() {
        let (mut poller, _api) = poller_with(FakeApi::with_statuses(vec![Ok("PROCESSING")]));
        poller.watch(Some("f-6".to_string()), None);
        tokio::time::sleep(TICK * 3).await;
        assert_eq!(poller.snapshot().status.as_deref(), Some("PROCESSING"));

        poller.watch(Some("f-7".to_string()), None);
        let snapshot = poller.snapshot();
        assert_eq!(snapshot.file_id.as_deref(), Some("f-7"));
        assert_eq!(snapshot.status, None);
        assert!(snapshot.polling);
    }
}
