//! Snapshot ticker
//!
//! Samples the clock once per tick, computes a dashboard snapshot and
//! publishes it to every subscriber.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration as StdDuration;

use chrono::{Duration, Local, NaiveDateTime};
use tokio::sync::{broadcast, RwLock};
use tokio::time::MissedTickBehavior;

use crate::dashboard::{Dashboard, DashboardSnapshot};

/// Snapshots buffered per subscriber before the slowest one starts lagging
const CHANNEL_CAPACITY: usize = 16;

/// Source of "now"
pub trait Clock: Send + Sync {
    fn now(&self) -> NaiveDateTime;
}

/// Local wall-clock time
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

/// A clock that only moves when told to
#[derive(Debug)]
pub struct FixedClock {
    now: Mutex<NaiveDateTime>,
}

impl FixedClock {
    pub fn new(now: NaiveDateTime) -> Self {
        Self {
            now: Mutex::new(now),
        }
    }

    pub fn set(&self, now: NaiveDateTime) {
        if let Ok(mut guard) = self.now.lock() {
            *guard = now;
        }
    }

    pub fn advance(&self, by: Duration) {
        if let Ok(mut guard) = self.now.lock() {
            *guard += by;
        }
    }
}

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        match self.now.lock() {
            Ok(guard) => *guard,
            Err(poisoned) => *poisoned.into_inner(),
        }
    }
}

/// Recomputes the dashboard on a fixed interval
pub struct Ticker {
    dashboard: Arc<Dashboard>,
    clock: Arc<dyn Clock>,
    period: StdDuration,
    sender: broadcast::Sender<Arc<DashboardSnapshot>>,
    latest: RwLock<Option<Arc<DashboardSnapshot>>>,
    running: Arc<AtomicBool>,
}

impl Ticker {
    pub fn new(dashboard: Arc<Dashboard>, clock: Arc<dyn Clock>, period: StdDuration) -> Self {
        let (sender, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self {
            dashboard,
            clock,
            period,
            sender,
            latest: RwLock::new(None),
            running: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn dashboard(&self) -> &Dashboard {
        &self.dashboard
    }

    pub fn clock(&self) -> &dyn Clock {
        self.clock.as_ref()
    }

    pub fn period(&self) -> StdDuration {
        self.period
    }

    /// Receive every snapshot published from now on
    pub fn subscribe(&self) -> broadcast::Receiver<Arc<DashboardSnapshot>> {
        self.sender.subscribe()
    }

    /// The most recently published snapshot
    pub async fn latest(&self) -> Option<Arc<DashboardSnapshot>> {
        self.latest.read().await.clone()
    }

    /// Compute and publish one snapshot
    pub async fn tick_once(&self) -> Arc<DashboardSnapshot> {
        let now = self.clock.now();
        let snapshot = Arc::new(self.dashboard.snapshot(now));

        *self.latest.write().await = Some(snapshot.clone());

        // No subscribers is fine; the snapshot is still kept as latest
        let receivers = self.sender.send(snapshot.clone()).unwrap_or(0);
        tracing::trace!(%now, receivers, "Published snapshot");

        snapshot
    }

    /// Start the ticker background task
    pub fn start(self: Arc<Self>) -> tokio::task::JoinHandle<()> {
        // Raised before spawning so a stop() issued right away is not overwritten
        self.running.store(true, Ordering::SeqCst);
        let ticker = self.clone();

        tokio::spawn(async move {
            tracing::info!(period_ms = ticker.period.as_millis() as u64, "Ticker started");

            let mut interval = tokio::time::interval(ticker.period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

            loop {
                interval.tick().await;

                if !ticker.running.load(Ordering::SeqCst) {
                    break;
                }

                ticker.tick_once().await;
            }

            tracing::info!("Ticker stopped");
        })
    }

    /// Stop the ticker
    pub fn stop(&self) {
        self.running.store(false, Ordering::SeqCst);
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }
}
