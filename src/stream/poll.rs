//! Interval-paced snapshot polling.

use crate::telemetry::{TelemetryAggregator, TelemetrySnapshot};
use futures::{Stream, ready};
use std::pin::Pin;
use std::task::{Context, Poll};
use std::time::Duration;
use tokio::time::{Interval, MissedTickBehavior, interval};

/// Shortest accepted polling period.
const MIN_PERIOD: Duration = Duration::from_millis(1);

/// Poll `aggregator` once per `period`, forever.
///
/// The first snapshot is taken immediately. Periods below one millisecond
/// are raised to one millisecond.
pub fn poll_snapshots(aggregator: TelemetryAggregator, period: Duration) -> SnapshotPoller {
    SnapshotPoller::new(aggregator, period)
}

/// Stream returned by [`poll_snapshots`].
#[derive(Debug)]
pub struct SnapshotPoller {
    aggregator: TelemetryAggregator,
    period: Duration,
    // Created on first poll so the stream can be built outside a runtime.
    interval: Option<Interval>,
}

impl SnapshotPoller {
    pub fn new(aggregator: TelemetryAggregator, period: Duration) -> Self {
        Self { aggregator, period: period.max(MIN_PERIOD), interval: None }
    }

    pub fn aggregator(&self) -> &TelemetryAggregator {
        &self.aggregator
    }

    pub fn aggregator_mut(&mut self) -> &mut TelemetryAggregator {
        &mut self.aggregator
    }

    pub fn into_inner(self) -> TelemetryAggregator {
        self.aggregator
    }
}

impl Stream for SnapshotPoller {
    type Item = TelemetrySnapshot;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();

        let period = this.period;
        let ticker = this.interval.get_or_insert_with(|| {
            let mut ticker = interval(period);
            // A slow consumer gets the latest state, not a burst of stale polls
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            ticker
        });

        ready!(ticker.poll_tick(cx));
        Poll::Ready(Some(this.aggregator.snapshot()))
    }
}
