//! Snapshot I/O for feeds. The engine itself never touches files.

pub mod snapshot;

pub use snapshot::{FeedSnapshot, LikeRecord, ReportRecord, SnapshotReader, SnapshotWriter};
