//! The spot pipeline: expiry filter, clustering, scoring and view projection.

pub mod cluster;
pub mod expiry;
pub mod feed;
pub mod project;
pub mod score;

pub use cluster::{build_spots, cluster_posts, sanitize_place_name, spot_id, SpotParams};
pub use expiry::{filter_active, sweep, ExpiryReport};
pub use feed::{SpotFeed, TickOutcome};
pub use project::{filter_by_tag, project_view, sort_spots, SortMode, TagFilter, ViewRequest};
pub use score::{classify, vibe_score, VibeWeights};

use crate::config::EngineConfig;
use crate::index::NeighborhoodTable;
use crate::types::{GeoPoint, Post, Spot};

/// Stateless front door to the pipeline. Holds only configuration, so every
/// call recomputes from its inputs.
pub struct SpotEngine {
    config: EngineConfig,
    neighborhoods: NeighborhoodTable,
}

impl SpotEngine {
    /// Create an engine from a configuration.
    pub fn new(config: EngineConfig) -> Self {
        let neighborhoods = config.neighborhood_table();
        Self {
            config,
            neighborhoods,
        }
    }

    /// Replace the neighborhood table.
    pub fn with_neighborhoods(mut self, table: NeighborhoodTable) -> Self {
        self.neighborhoods = table;
        self
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn neighborhoods(&self) -> &NeighborhoodTable {
        &self.neighborhoods
    }

    /// Posts that are unexpired at `now`, visible and valid.
    pub fn filter_active(&self, posts: &[Post], now: u64) -> Vec<Post> {
        filter_active(posts, now)
    }

    /// Cluster posts into spots and score them.
    pub fn compute_spots(&self, posts: &[Post]) -> Vec<Spot> {
        let params = SpotParams {
            threshold: self.config.cluster_threshold_deg,
            neighborhoods: &self.neighborhoods,
            neighborhood_radius: self.config.neighborhood_radius_deg,
            default_label: &self.config.default_label,
            weights: self.config.weights(),
        };
        build_spots(posts, &params)
    }

    /// Order and filter spots for display.
    pub fn project_view(
        &self,
        spots: &[Spot],
        mode: SortMode,
        reference: Option<GeoPoint>,
        tag_filter: &TagFilter,
    ) -> Vec<Spot> {
        project_view(spots, mode, reference, tag_filter)
    }

    /// Run all three stages.
    pub fn view(&self, posts: &[Post], now: u64, request: &ViewRequest) -> Vec<Spot> {
        let active = self.filter_active(posts, now);
        let spots = self.compute_spots(&active);
        self.project_view(&spots, request.mode, request.reference, &request.tag_filter)
    }
}

impl Default for SpotEngine {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}
