//! Packet-id based de-duplication.

use crate::telemetry::TelemetrySnapshot;
use futures::{Stream, ready};
use pin_project_lite::pin_project;
use std::pin::Pin;
use std::task::{Context, Poll};

/// Extension trait to drop repeated frames from a snapshot stream
pub trait FreshFramesExt: Stream<Item = TelemetrySnapshot> {
    /// Only yield snapshots whose physics packet id differs from the last one
    /// yielded.
    ///
    /// A simulator that is paused or between sessions keeps the same packet
    /// id, so its snapshots collapse into one. Consecutive disconnected
    /// snapshots (no packet id) collapse the same way.
    fn fresh_frames(self) -> FreshFrames<Self>
    where
        Self: Sized,
    {
        FreshFrames::new(self)
    }
}

impl<T: Stream<Item = TelemetrySnapshot>> FreshFramesExt for T {}

pin_project! {
    /// A stream combinator that skips snapshots of an unchanged physics frame
    pub struct FreshFrames<S> {
        #[pin]
        stream: S,
        last: Option<Option<i32>>,
    }
}

impl<S> FreshFrames<S> {
    pub fn new(stream: S) -> Self {
        Self { stream, last: None }
    }
}

impl<S: Stream<Item = TelemetrySnapshot>> Stream for FreshFrames<S> {
    type Item = TelemetrySnapshot;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let mut this = self.project();

        loop {
            let Some(snapshot) = ready!(this.stream.as_mut().poll_next(cx)) else {
                return Poll::Ready(None);
            };

            let packet = snapshot.physics_packet_id;
            if *this.last == Some(packet) {
                continue;
            }
            *this.last = Some(packet);
            return Poll::Ready(Some(snapshot));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::StreamExt;
    use futures::stream;

    fn frame(packet: Option<i32>) -> TelemetrySnapshot {
        TelemetrySnapshot {
            is_connected: packet.is_some(),
            physics_packet_id: packet,
            ..TelemetrySnapshot::default()
        }
    }

    #[tokio::test]
    async fn repeated_packets_are_dropped() {
        let frames = [Some(1), Some(1), Some(2), Some(2), Some(2), Some(3)].map(frame);
        let ids: Vec<_> = stream::iter(frames)
            .fresh_frames()
            .map(|s| s.physics_packet_id)
            .collect()
            .await;
        assert_eq!(ids, vec![Some(1), Some(2), Some(3)]);
    }

    #[tokio::test]
    async fn packet_reset_after_reload_is_kept() {
        let frames = [Some(900), Some(901), Some(1), Some(2)].map(frame);
        let ids: Vec<_> = stream::iter(frames)
            .fresh_frames()
            .map(|s| s.physics_packet_id)
            .collect()
            .await;
        assert_eq!(ids, vec![Some(900), Some(901), Some(1), Some(2)]);
    }

    #[tokio::test]
    async fn disconnect_is_reported_once() {
        let frames = [Some(5), None, None, None, Some(6)].map(frame);
        let connected: Vec<_> =
            stream::iter(frames).fresh_frames().map(|s| s.is_connected).collect().await;
        assert_eq!(connected, vec![true, false, true]);
    }
}
