//! Spot engine: aggregation and ranking for location-based ephemeral story feeds.
//!
//! Takes a raw, unordered set of geotagged, time-bounded stories and derives
//! spatial clusters ("spots"), a bounded vibe score per spot, time-based expiry,
//! and sorted/filtered views. The core functions are pure: every call recomputes
//! from the posts it is given.

pub mod cli;
pub mod config;
pub mod engine;
pub mod format;
pub mod index;
pub mod store;
pub mod types;

// Re-export commonly used types at the crate root
pub use config::EngineConfig;
pub use engine::{
    build_spots, classify, cluster_posts, filter_active, project_view, vibe_score, ExpiryReport,
    SortMode, SpotEngine, SpotFeed, SpotParams, TagFilter, TickOutcome, ViewRequest, VibeWeights,
};
pub use format::{FeedSnapshot, SnapshotReader, SnapshotWriter};
pub use index::{NeighborhoodTable, ReferencePoint};
pub use store::{InMemoryStore, StoryStore};
pub use types::{
    now_millis, GeoPoint, Post, PostBuilder, Spot, SpotError, SpotResult, VibeLevel,
    CALM_CEILING, CLUSTER_THRESHOLD_DEG, HOT_THRESHOLD, LIKE_WEIGHT, MAX_VIBE_SCORE,
    NEIGHBORHOOD_RADIUS_DEG, SHOW_ALL, STORY_LIFETIME_MS, STORY_WEIGHT,
};
