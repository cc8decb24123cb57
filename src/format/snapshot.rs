//! Feed snapshots: JSON files holding posts plus the like and report ledgers.

use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::types::{Post, SpotResult};

/// One user's like on one post.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LikeRecord {
    pub post_id: String,
    pub user_id: String,
}

/// One user's moderation report on one post.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportRecord {
    pub post_id: String,
    pub user_id: String,
}

/// Serializable contents of a feed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FeedSnapshot {
    #[serde(default)]
    pub posts: Vec<Post>,
    #[serde(default)]
    pub likes: Vec<LikeRecord>,
    #[serde(default)]
    pub reports: Vec<ReportRecord>,
}

/// Reads feed snapshots.
pub struct SnapshotReader;

impl SnapshotReader {
    /// Read a snapshot from any reader.
    pub fn read_from(reader: impl Read) -> SpotResult<FeedSnapshot> {
        Ok(serde_json::from_reader(reader)?)
    }

    /// Read a snapshot from a file.
    pub fn read_from_file(path: &Path) -> SpotResult<FeedSnapshot> {
        let file = std::fs::File::open(path)?;
        Self::read_from(BufReader::new(file))
    }
}

/// Writes feed snapshots.
pub struct SnapshotWriter {
    pretty: bool,
}

impl SnapshotWriter {
    /// Create a new writer.
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }

    /// Write a snapshot to any writer.
    pub fn write_to(&self, snapshot: &FeedSnapshot, mut writer: impl Write) -> SpotResult<()> {
        if self.pretty {
            serde_json::to_writer_pretty(&mut writer, snapshot)?;
        } else {
            serde_json::to_writer(&mut writer, snapshot)?;
        }
        writer.write_all(b"\n")?;
        writer.flush()?;
        Ok(())
    }

    /// Write a snapshot to a file, replacing it.
    pub fn write_to_file(&self, snapshot: &FeedSnapshot, path: &Path) -> SpotResult<()> {
        let file = std::fs::File::create(path)?;
        self.write_to(snapshot, BufWriter::new(file))
    }
}

impl Default for SnapshotWriter {
    fn default() -> Self {
        Self::new(true)
    }
}
