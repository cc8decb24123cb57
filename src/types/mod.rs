//! All data types for the spot engine.

pub mod error;
pub mod post;
pub mod spot;

pub use error::{SpotError, SpotResult};
pub use post::{GeoPoint, Post, PostBuilder};
pub use spot::{Spot, VibeLevel};

/// Maximum anchor distance (degrees) for a post to join an existing cluster.
pub const CLUSTER_THRESHOLD_DEG: f64 = 0.0015;

/// Radius (degrees) within which a centroid picks up a reference point's name.
pub const NEIGHBORHOOD_RADIUS_DEG: f64 = 0.025;

/// Points contributed to the vibe score by each member story.
pub const STORY_WEIGHT: u32 = 20;

/// Points contributed to the vibe score by each like.
pub const LIKE_WEIGHT: u32 = 2;

/// Upper bound of the vibe score.
pub const MAX_VIBE_SCORE: u32 = 100;

/// Scores at or above this are HOT.
pub const HOT_THRESHOLD: u32 = 40;

/// Scores at or below this are CALM.
pub const CALM_CEILING: u32 = 10;

/// Seconds between expiry sweeps.
pub const SWEEP_INTERVAL_SECS: u64 = 10;

/// Seconds between refreshes of the post set from the store.
pub const REFRESH_INTERVAL_SECS: u64 = 30;

/// Lifetime of a story: 24 hours.
pub const STORY_LIFETIME_MS: u64 = 86_400_000;

/// Tag filter sentinel that disables tag filtering.
pub const SHOW_ALL: &str = "All";

/// Returns the current time as Unix epoch milliseconds.
pub fn now_millis() -> u64 {
    chrono::Utc::now().timestamp_millis() as u64
}
