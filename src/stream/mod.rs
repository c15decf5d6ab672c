//! Consumer-driven telemetry streams.
//!
//! Nothing here spawns a task: each snapshot is read when the consumer polls
//! the stream and the interval has elapsed.
//!
//! ```rust,no_run
//! use futures::StreamExt;
//! use pitbox::stream::{FreshFramesExt, poll_snapshots};
//! use pitbox::telemetry::TelemetryAggregator;
//! use std::time::Duration;
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() {
//!     let mut telemetry = TelemetryAggregator::default();
//!     let _ = telemetry.connect();
//!
//!     let mut snapshots = poll_snapshots(telemetry, Duration::from_millis(100)).fresh_frames();
//!     while let Some(snapshot) = snapshots.next().await {
//!         println!("road {:.1} °C", snapshot.thermal.road_c);
//!     }
//! }
//! ```

mod fresh;
mod poll;

pub use fresh::{FreshFrames, FreshFramesExt};
pub use poll::{SnapshotPoller, poll_snapshots};
