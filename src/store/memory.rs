//! In-memory story store with per-user like and report ledgers.

use std::collections::{HashMap, HashSet};

use crate::format::{FeedSnapshot, LikeRecord, ReportRecord};
use crate::types::{Post, SpotError, SpotResult};

use super::StoryStore;

/// Distinct reports after which a story is hidden.
pub const DEFAULT_REPORT_THRESHOLD: usize = 3;

/// Insertion-ordered story store.
pub struct InMemoryStore {
    /// Stories in insertion order.
    posts: Vec<Post>,
    /// post_id -> index in `posts`.
    by_id: HashMap<String, usize>,
    /// post_id -> users who liked it.
    likes: HashMap<String, HashSet<String>>,
    /// post_id -> users who reported it.
    reports: HashMap<String, HashSet<String>>,
    report_threshold: usize,
}

impl InMemoryStore {
    /// Create a new, empty store.
    pub fn new() -> Self {
        Self::with_report_threshold(DEFAULT_REPORT_THRESHOLD)
    }

    /// Create an empty store that hides stories after `threshold` distinct reports.
    pub fn with_report_threshold(threshold: usize) -> Self {
        Self {
            posts: Vec::new(),
            by_id: HashMap::new(),
            likes: HashMap::new(),
            reports: HashMap::new(),
            report_threshold: threshold.max(1),
        }
    }

    /// Rebuild a store from a snapshot. A like count never drops below its ledger size.
    pub fn from_snapshot(snapshot: FeedSnapshot, report_threshold: usize) -> SpotResult<Self> {
        let mut store = Self::with_report_threshold(report_threshold);
        for post in snapshot.posts {
            store.create(post)?;
        }
        for like in snapshot.likes {
            if store.by_id.contains_key(&like.post_id) {
                store
                    .likes
                    .entry(like.post_id)
                    .or_default()
                    .insert(like.user_id);
            }
        }
        for report in snapshot.reports {
            if store.by_id.contains_key(&report.post_id) {
                store
                    .reports
                    .entry(report.post_id)
                    .or_default()
                    .insert(report.user_id);
            }
        }
        for post in &mut store.posts {
            if let Some(users) = store.likes.get(&post.id) {
                post.like_count = post.like_count.max(users.len() as u32);
            }
        }
        Ok(store)
    }

    /// Snapshot the store contents, ledgers sorted for stable output.
    pub fn to_snapshot(&self) -> FeedSnapshot {
        let mut likes: Vec<LikeRecord> = self
            .likes
            .iter()
            .flat_map(|(post_id, users)| {
                users.iter().map(move |u| LikeRecord {
                    post_id: post_id.clone(),
                    user_id: u.clone(),
                })
            })
            .collect();
        likes.sort();
        let mut reports: Vec<ReportRecord> = self
            .reports
            .iter()
            .flat_map(|(post_id, users)| {
                users.iter().map(move |u| ReportRecord {
                    post_id: post_id.clone(),
                    user_id: u.clone(),
                })
            })
            .collect();
        reports.sort();
        FeedSnapshot {
            posts: self.posts.clone(),
            likes,
            reports,
        }
    }

    fn post_mut(&mut self, id: &str) -> SpotResult<&mut Post> {
        let idx = *self
            .by_id
            .get(id)
            .ok_or_else(|| SpotError::PostNotFound(id.to_string()))?;
        Ok(&mut self.posts[idx])
    }

    /// Record a like. Returns false if this user already liked the post.
    pub fn like(&mut self, post_id: &str, user_id: &str) -> SpotResult<bool> {
        self.post_mut(post_id)?;
        let added = self
            .likes
            .entry(post_id.to_string())
            .or_default()
            .insert(user_id.to_string());
        if added {
            let post = self.post_mut(post_id)?;
            post.like_count = post.like_count.saturating_add(1);
        }
        Ok(added)
    }

    /// Remove a like. Returns false if this user had not liked the post.
    pub fn unlike(&mut self, post_id: &str, user_id: &str) -> SpotResult<bool> {
        self.post_mut(post_id)?;
        let removed = self
            .likes
            .get_mut(post_id)
            .map(|users| users.remove(user_id))
            .unwrap_or(false);
        if removed {
            let post = self.post_mut(post_id)?;
            post.like_count = post.like_count.saturating_sub(1);
        }
        Ok(removed)
    }

    /// Whether a user has liked a post.
    pub fn has_liked(&self, post_id: &str, user_id: &str) -> bool {
        self.likes
            .get(post_id)
            .is_some_and(|users| users.contains(user_id))
    }

    /// Flag a post. Returns true if the post is hidden afterwards.
    pub fn report(&mut self, post_id: &str, user_id: &str) -> SpotResult<bool> {
        self.post_mut(post_id)?;
        let reporters = self.reports.entry(post_id.to_string()).or_default();
        reporters.insert(user_id.to_string());
        let count = reporters.len();
        let threshold = self.report_threshold;
        let post = self.post_mut(post_id)?;
        if count >= threshold && !post.is_hidden {
            log::info!("Hiding post {} after {} reports", post_id, count);
            post.is_hidden = true;
        }
        Ok(post.is_hidden)
    }

    /// Number of distinct reporters for a post.
    pub fn report_count(&self, post_id: &str) -> usize {
        self.reports.get(post_id).map_or(0, |r| r.len())
    }

    pub fn set_hidden(&mut self, post_id: &str, hidden: bool) -> SpotResult<()> {
        self.post_mut(post_id)?.is_hidden = hidden;
        Ok(())
    }

    /// Number of stored posts.
    pub fn len(&self) -> usize {
        self.posts.len()
    }

    /// Whether the store is empty.
    pub fn is_empty(&self) -> bool {
        self.posts.is_empty()
    }

    fn reindex(&mut self) {
        self.by_id = self
            .posts
            .iter()
            .enumerate()
            .map(|(i, p)| (p.id.clone(), i))
            .collect();
    }

    fn forget(&mut self, post_id: &str) {
        self.likes.remove(post_id);
        self.reports.remove(post_id);
    }
}

impl StoryStore for InMemoryStore {
    fn posts(&self) -> Vec<Post> {
        self.posts.clone()
    }

    fn get(&self, id: &str) -> Option<&Post> {
        self.by_id.get(id).map(|&i| &self.posts[i])
    }

    fn create(&mut self, post: Post) -> SpotResult<()> {
        post.validate()?;
        if self.by_id.contains_key(&post.id) {
            return Err(SpotError::DuplicatePost(post.id));
        }
        self.by_id.insert(post.id.clone(), self.posts.len());
        self.posts.push(post);
        Ok(())
    }

    fn delete(&mut self, id: &str) -> SpotResult<Post> {
        let idx = self
            .by_id
            .get(id)
            .copied()
            .ok_or_else(|| SpotError::PostNotFound(id.to_string()))?;
        let post = self.posts.remove(idx);
        self.forget(id);
        self.reindex();
        Ok(post)
    }

    fn purge_expired(&mut self, now: u64) -> Vec<String> {
        let (expired, kept): (Vec<Post>, Vec<Post>) = std::mem::take(&mut self.posts)
            .into_iter()
            .partition(|p| p.expires_at <= now);
        self.posts = kept;
        let ids: Vec<String> = expired.into_iter().map(|p| p.id).collect();
        for id in &ids {
            self.forget(id);
        }
        self.reindex();
        ids
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}
