//! The daily notification loop
//!
//! The loop polls the wall clock at sub-second intervals. Each poll either
//! finds the notifier idle and not yet due, or due, in which case the trigger
//! fires once and the next due time moves to the first scheduled instant
//! strictly after the poll. Failures are logged and never retried.

use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::{
    sync::mpsc,
    task::JoinHandle,
    time::{MissedTickBehavior, interval},
};
use tracing::{error, info};

use crate::{
    error::NotifyResult,
    schedule::DailySchedule,
    trigger::{Delivery, NotificationTrigger},
};

/// Where the notifier is in its daily cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotifierState {
    /// Waiting for `next_run`
    Idle { next_run: DateTime<Utc> },
    /// A delivery is in flight
    Firing,
}

/// Fires a [`NotificationTrigger`] once per day on a [`DailySchedule`]
pub struct Notifier<T> {
    schedule: DailySchedule,
    trigger: T,
    poll_interval: Duration,
    state: NotifierState,
}

impl<T: NotificationTrigger> Notifier<T> {
    /// Notifier whose first firing is the first scheduled instant after `started_at`
    pub fn new(
        schedule: DailySchedule,
        trigger: T,
        poll_interval: Duration,
        started_at: DateTime<Utc>,
    ) -> Self {
        let next_run = schedule.next_after(started_at);
        Self {
            schedule,
            trigger,
            poll_interval,
            state: NotifierState::Idle { next_run },
        }
    }

    pub fn state(&self) -> NotifierState {
        self.state
    }

    /// Check the clock once
    ///
    /// Returns `None` when nothing was due, otherwise the delivery outcome.
    pub async fn tick(&mut self, now: DateTime<Utc>) -> Option<NotifyResult<Delivery>> {
        let NotifierState::Idle { next_run } = self.state else {
            return None;
        };
        if now < next_run {
            return None;
        }

        self.state = NotifierState::Firing;
        let local = now.with_timezone(&self.schedule.timezone());
        info!(
            local_time = %local.format("%Y-%m-%d %H:%M:%S %Z"),
            "Sending daily notification"
        );

        let outcome = self.trigger.fire().await;
        match &outcome {
            Ok(delivery) => info!(
                status = delivery.status,
                body = %delivery.body,
                "Notification delivered"
            ),
            Err(e) => error!(error = %e, "Notification failed"),
        }

        let next_run = self.schedule.next_after(now);
        self.state = NotifierState::Idle { next_run };
        info!(%next_run, "Next notification scheduled");

        Some(outcome)
    }

    /// Poll until `shutdown` receives a message or its sender is dropped
    pub async fn run(mut self, mut shutdown: mpsc::Receiver<()>) {
        let mut ticker = interval(self.poll_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        info!(
            poll_millis = self.poll_interval.as_millis() as u64,
            state = ?self.state,
            "Notifier started"
        );

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    // outcome is already logged
                    let _ = self.tick(Utc::now()).await;
                }
                _ = shutdown.recv() => {
                    info!("Notifier stopped");
                    break;
                }
            }
        }
    }
}

impl<T: NotificationTrigger + 'static> Notifier<T> {
    /// Run the loop on its own task
    pub fn spawn(self) -> NotifierHandle {
        let (shutdown, rx) = mpsc::channel(1);
        let task = tokio::spawn(self.run(rx));
        NotifierHandle { shutdown, task }
    }
}

/// Keeps a spawned notifier alive; dropping it stops the loop
pub struct NotifierHandle {
    shutdown: mpsc::Sender<()>,
    task: JoinHandle<()>,
}

impl NotifierHandle {
    /// Stop the loop and wait for it to exit
    pub async fn shutdown(self) {
        let _ = self.shutdown.send(()).await;
        if let Err(e) = self.task.await {
            error!(error = %e, "Notifier task ended abnormally");
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    };

    use async_trait::async_trait;
    use chrono::{NaiveTime, TimeZone};

    use super::*;
    use crate::error::NotifyError;

    #[derive(Clone, Default)]
    struct CountingTrigger {
        calls: Arc<AtomicUsize>,
        status: u16,
    }

    #[async_trait]
    impl NotificationTrigger for CountingTrigger {
        async fn fire(&self) -> NotifyResult<Delivery> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.status >= 400 {
                return Err(NotifyError::Status {
                    status: self.status,
                    body: "boom".to_string(),
                });
            }
            Ok(Delivery {
                status: 200,
                body: "{}".to_string(),
            })
        }
    }

    fn schedule() -> DailySchedule {
        DailySchedule::new(NaiveTime::from_hms_opt(9, 0, 0).unwrap(), chrono_tz::US::Eastern)
            .unwrap()
    }

    /// Wall-clock time in US/Eastern on 2024-07-01 (EDT, UTC-4)
    fn eastern(h: u32, m: u32, s: u32, ms: i64) -> DateTime<Utc> {
        chrono_tz::US::Eastern
            .with_ymd_and_hms(2024, 7, 1, h, m, s)
            .unwrap()
            .with_timezone(&Utc)
            + chrono::Duration::milliseconds(ms)
    }

    fn notifier(trigger: CountingTrigger, started_at: DateTime<Utc>) -> Notifier<CountingTrigger> {
        Notifier::new(schedule(), trigger, Duration::from_millis(500), started_at)
    }

    #[tokio::test]
    async fn fires_once_at_nine_not_before() {
        let trigger = CountingTrigger::default();
        let mut n = notifier(trigger.clone(), eastern(8, 0, 0, 0));

        assert!(n.tick(eastern(8, 59, 59, 0)).await.is_none());
        assert!(n.tick(eastern(8, 59, 59, 900)).await.is_none());
        assert_eq!(trigger.calls.load(Ordering::SeqCst), 0);

        assert!(n.tick(eastern(9, 0, 0, 0)).await.unwrap().is_ok());
        for ms in [100, 400, 999] {
            assert!(n.tick(eastern(9, 0, 0, ms)).await.is_none());
        }
        assert!(n.tick(eastern(9, 0, 1, 0)).await.is_none());
        assert_eq!(trigger.calls.load(Ordering::SeqCst), 1);

        assert_eq!(
            n.state(),
            NotifierState::Idle {
                next_run: chrono_tz::US::Eastern
                    .with_ymd_and_hms(2024, 7, 2, 9, 0, 0)
                    .unwrap()
                    .with_timezone(&Utc)
            }
        );
    }

    #[tokio::test]
    async fn start_after_nine_waits_for_tomorrow() {
        let trigger = CountingTrigger::default();
        let mut n = notifier(trigger.clone(), eastern(9, 30, 0, 0));

        assert!(n.tick(eastern(9, 30, 0, 500)).await.is_none());
        assert!(n.tick(eastern(23, 59, 59, 0)).await.is_none());
        assert_eq!(trigger.calls.load(Ordering::SeqCst), 0);

        let tomorrow = eastern(9, 0, 0, 0) + chrono::Duration::days(1);
        assert!(n.tick(tomorrow).await.is_some());
        assert_eq!(trigger.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn failure_returns_to_idle_and_next_day_still_fires() {
        let trigger = CountingTrigger {
            status: 500,
            ..Default::default()
        };
        let mut n = notifier(trigger.clone(), eastern(8, 0, 0, 0));

        let outcome = n.tick(eastern(9, 0, 0, 0)).await.unwrap();
        assert!(matches!(outcome, Err(NotifyError::Status { status: 500, .. })));
        assert!(matches!(n.state(), NotifierState::Idle { .. }));

        // no retry within the day
        assert!(n.tick(eastern(9, 0, 0, 500)).await.is_none());
        assert!(n.tick(eastern(12, 0, 0, 0)).await.is_none());

        let tomorrow = eastern(9, 0, 0, 0) + chrono::Duration::days(1);
        assert!(n.tick(tomorrow).await.is_some());
        assert_eq!(trigger.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn late_poll_fires_once_without_catching_up() {
        let trigger = CountingTrigger::default();
        let mut n = notifier(trigger.clone(), eastern(8, 0, 0, 0));

        let three_days_late = eastern(10, 0, 0, 0) + chrono::Duration::days(3);
        assert!(n.tick(three_days_late).await.is_some());
        assert!(n.tick(three_days_late + chrono::Duration::seconds(1)).await.is_none());
        assert_eq!(trigger.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn spawned_loop_stops_on_shutdown() {
        let trigger = CountingTrigger::default();
        let handle = notifier(trigger.clone(), Utc::now()).spawn();

        tokio::time::sleep(Duration::from_millis(50)).await;
        tokio::time::timeout(Duration::from_secs(2), handle.shutdown())
            .await
            .expect("notifier should stop promptly");
        assert_eq!(trigger.calls.load(Ordering::SeqCst), 0);
    }
}
