//! Story store: the authoritative post set the engine reads from.

pub mod memory;

pub use memory::{InMemoryStore, DEFAULT_REPORT_THRESHOLD};

use crate::types::{Post, SpotResult};

/// Source of stories. Implementations own persistence and must preserve
/// insertion order, since clustering depends on it.
pub trait StoryStore {
    /// All stored posts, including expired and hidden ones, in insertion order.
    fn posts(&self) -> Vec<Post>;

    /// Look up a post by ID.
    fn get(&self, id: &str) -> Option<&Post>;

    /// Insert a new post. Rejects invalid posts and duplicate IDs.
    fn create(&mut self, post: Post) -> SpotResult<()>;

    /// Remove a post, returning it.
    fn delete(&mut self, id: &str) -> SpotResult<Post>;

    /// Drop every post with `expires_at <= now`, returning the removed IDs.
    fn purge_expired(&mut self, now: u64) -> Vec<String>;
}
