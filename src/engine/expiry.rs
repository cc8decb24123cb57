//! Expiry filter: drops expired, hidden and invalid stories.

use crate::types::Post;

/// Report from running an expiry sweep.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExpiryReport {
    /// Posts still active after the sweep.
    pub kept: usize,
    /// Posts dropped because `now >= expires_at`.
    pub expired: Vec<String>,
    /// Posts dropped because they are hidden.
    pub hidden: Vec<String>,
    /// Posts dropped because they fail [`Post::validate`].
    pub invalid: Vec<String>,
}

impl ExpiryReport {
    /// Total number of posts removed.
    pub fn removed(&self) -> usize {
        self.expired.len() + self.hidden.len() + self.invalid.len()
    }
}

/// Return the posts with `expires_at > now` that are not hidden, in input order.
///
/// Posts that fail validation (non-finite coordinates, `expires_at <= created_at`)
/// are excluded as well.
pub fn filter_active(posts: &[Post], now: u64) -> Vec<Post> {
    sweep(posts, now).0
}

/// Like [`filter_active`] but also reports why each dropped post was dropped.
pub fn sweep(posts: &[Post], now: u64) -> (Vec<Post>, ExpiryReport) {
    let mut report = ExpiryReport::default();
    let mut active = Vec::with_capacity(posts.len());

    for post in posts {
        if let Err(e) = post.validate() {
            log::warn!("Excluding post from spot computation: {}", e);
            report.invalid.push(post.id.clone());
        } else if post.is_hidden {
            report.hidden.push(post.id.clone());
        } else if post.expires_at <= now {
            report.expired.push(post.id.clone());
        } else {
            active.push(post.clone());
        }
    }

    report.kept = active.len();
    if report.removed() > 0 {
        log::debug!(
            "Expiry sweep at {}: kept {}, expired {}, hidden {}, invalid {}",
            now,
            report.kept,
            report.expired.len(),
            report.hidden.len(),
            report.invalid.len()
        );
    }
    (active, report)
}
