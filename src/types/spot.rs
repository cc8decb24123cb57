//! Spots (derived clusters of posts) and their vibe classification.

use serde::Serialize;

use super::{GeoPoint, Post, CALM_CEILING, HOT_THRESHOLD};

/// Activity class of a spot, derived from its vibe score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum VibeLevel {
    /// Score at or above [`HOT_THRESHOLD`].
    Hot,
    /// Strictly between [`CALM_CEILING`] and [`HOT_THRESHOLD`].
    Active,
    /// Score at or below [`CALM_CEILING`].
    Calm,
}

impl VibeLevel {
    /// Classify a vibe score.
    pub fn classify(score: u32) -> Self {
        if score >= HOT_THRESHOLD {
            Self::Hot
        } else if score > CALM_CEILING {
            Self::Active
        } else {
            Self::Calm
        }
    }

    /// Return a human-readable name for this level.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Hot => "HOT",
            Self::Active => "ACTIVE",
            Self::Calm => "CALM",
        }
    }

    /// Parse a level from its name (case-insensitive).
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_uppercase().as_str() {
            "HOT" => Some(Self::Hot),
            "ACTIVE" => Some(Self::Active),
            "CALM" => Some(Self::Calm),
            _ => None,
        }
    }
}

impl std::fmt::Display for VibeLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// A spatial cluster of posts. Recomputed on every pass, never patched.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Spot {
    /// Derived from the anchor member's place name.
    pub id: String,
    pub centroid_latitude: f64,
    pub centroid_longitude: f64,
    /// Never empty. Sorted by likes desc, then created_at desc.
    pub members: Vec<Post>,
    pub neighborhood_label: String,
    /// In [0, 100].
    pub vibe_score: u32,
}

impl Spot {
    pub fn centroid(&self) -> GeoPoint {
        GeoPoint::new(self.centroid_latitude, self.centroid_longitude)
    }

    pub fn member_count(&self) -> usize {
        self.members.len()
    }

    /// Sum of member likes.
    pub fn total_likes(&self) -> u64 {
        self.members.iter().map(|p| p.like_count as u64).sum()
    }

    pub fn vibe_level(&self) -> VibeLevel {
        VibeLevel::classify(self.vibe_score)
    }

    /// Distinct member tags, first-seen order.
    pub fn tags(&self) -> Vec<&str> {
        let mut seen: Vec<&str> = Vec::new();
        for tag in self.members.iter().flat_map(|p| p.tags.iter()) {
            if !seen.contains(&tag.as_str()) {
                seen.push(tag);
            }
        }
        seen
    }

    /// Most recent member creation time.
    pub fn latest_activity(&self) -> u64 {
        self.members.iter().map(|p| p.created_at).max().unwrap_or(0)
    }
}
