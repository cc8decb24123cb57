//! Geotagged stories and the builder used to construct them.

use serde::{Deserialize, Serialize};

use super::{now_millis, STORY_LIFETIME_MS};
use crate::types::error::{SpotError, SpotResult};

/// A latitude/longitude pair in signed degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoPoint {
    /// Create a new point.
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Euclidean distance in raw degrees. Good enough at city scale.
    pub fn distance_to(&self, other: &GeoPoint) -> f64 {
        let dlat = self.latitude - other.latitude;
        let dlon = self.longitude - other.longitude;
        (dlat * dlat + dlon * dlon).sqrt()
    }

    /// Whether both coordinates are finite.
    pub fn is_finite(&self) -> bool {
        self.latitude.is_finite() && self.longitude.is_finite()
    }

    /// Parse `"LAT,LON"`.
    pub fn parse(s: &str) -> SpotResult<Self> {
        let (lat, lon) = s
            .split_once(',')
            .ok_or_else(|| SpotError::InvalidCoordinates(s.to_string()))?;
        let latitude: f64 = lat
            .trim()
            .parse()
            .map_err(|_| SpotError::InvalidCoordinates(s.to_string()))?;
        let longitude: f64 = lon
            .trim()
            .parse()
            .map_err(|_| SpotError::InvalidCoordinates(s.to_string()))?;
        let point = Self::new(latitude, longitude);
        if !point.is_finite() {
            return Err(SpotError::InvalidCoordinates(s.to_string()));
        }
        Ok(point)
    }
}

/// A single story: one geotagged, time-limited user submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    /// Unique opaque identifier.
    pub id: String,
    /// Owning user.
    pub author_id: String,
    pub latitude: f64,
    pub longitude: f64,
    /// Unix epoch milliseconds.
    pub created_at: u64,
    /// Unix epoch milliseconds. Must be after `created_at`.
    pub expires_at: u64,
    /// Free-text label of where the story was made.
    #[serde(default)]
    pub place_name: String,
    /// Reference to already-uploaded media.
    #[serde(default)]
    pub media_url: Option<String>,
    #[serde(default)]
    pub caption: String,
    /// Aggregate likes, maintained by the like subsystem.
    #[serde(default)]
    pub like_count: u32,
    /// Display order is significant, clustering ignores tags.
    #[serde(default)]
    pub tags: Vec<String>,
    /// Hidden stories are excluded from every spot computation.
    #[serde(default)]
    pub is_hidden: bool,
}

impl Post {
    /// Check the input contract: non-empty id, finite coordinates, positive lifetime.
    pub fn validate(&self) -> SpotResult<()> {
        if self.id.is_empty() {
            return Err(SpotError::EmptyPostId);
        }
        if !self.location().is_finite() {
            return Err(SpotError::NonFiniteCoordinates {
                id: self.id.clone(),
                latitude: self.latitude,
                longitude: self.longitude,
            });
        }
        if self.expires_at <= self.created_at {
            return Err(SpotError::InvalidLifetime {
                id: self.id.clone(),
                created_at: self.created_at,
                expires_at: self.expires_at,
            });
        }
        Ok(())
    }

    pub fn location(&self) -> GeoPoint {
        GeoPoint::new(self.latitude, self.longitude)
    }

    /// Strictly before expiry and not hidden.
    pub fn is_active(&self, now: u64) -> bool {
        self.expires_at > now && !self.is_hidden
    }

    /// Milliseconds left until expiry, zero once expired.
    pub fn remaining_millis(&self, now: u64) -> u64 {
        self.expires_at.saturating_sub(now)
    }

    /// Whether any tag contains `needle_lower` (already lowercased).
    pub(crate) fn has_tag_containing(&self, needle_lower: &str) -> bool {
        self.tags
            .iter()
            .any(|t| t.to_lowercase().contains(needle_lower))
    }
}

/// Builder for constructing Post instances ergonomically.
pub struct PostBuilder {
    id: String,
    author_id: String,
    latitude: f64,
    longitude: f64,
    created_at: Option<u64>,
    expires_at: Option<u64>,
    place_name: String,
    media_url: Option<String>,
    caption: String,
    like_count: u32,
    tags: Vec<String>,
    is_hidden: bool,
}

impl PostBuilder {
    /// Create a new builder with the required fields.
    pub fn new(id: impl Into<String>, latitude: f64, longitude: f64) -> Self {
        Self {
            id: id.into(),
            author_id: String::new(),
            latitude,
            longitude,
            created_at: None,
            expires_at: None,
            place_name: String::new(),
            media_url: None,
            caption: String::new(),
            like_count: 0,
            tags: Vec::new(),
            is_hidden: false,
        }
    }

    pub fn author(mut self, author_id: impl Into<String>) -> Self {
        self.author_id = author_id.into();
        self
    }

    /// Set the creation timestamp (epoch millis).
    pub fn created_at(mut self, ts: u64) -> Self {
        self.created_at = Some(ts);
        self
    }

    /// Set the expiry timestamp (epoch millis). Defaults to creation + 24h.
    pub fn expires_at(mut self, ts: u64) -> Self {
        self.expires_at = Some(ts);
        self
    }

    pub fn place_name(mut self, name: impl Into<String>) -> Self {
        self.place_name = name.into();
        self
    }

    pub fn media_url(mut self, url: impl Into<String>) -> Self {
        self.media_url = Some(url.into());
        self
    }

    pub fn caption(mut self, caption: impl Into<String>) -> Self {
        self.caption = caption.into();
        self
    }

    pub fn likes(mut self, like_count: u32) -> Self {
        self.like_count = like_count;
        self
    }

    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.push(tag.into());
        self
    }

    pub fn tags<I, T>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        self.tags.extend(tags.into_iter().map(Into::into));
        self
    }

    pub fn hidden(mut self, hidden: bool) -> Self {
        self.is_hidden = hidden;
        self
    }

    /// Build the Post. Does not validate; see [`Post::validate`].
    pub fn build(self) -> Post {
        let created_at = self.created_at.unwrap_or_else(now_millis);
        let expires_at = self
            .expires_at
            .unwrap_or_else(|| created_at.saturating_add(STORY_LIFETIME_MS));
        Post {
            id: self.id,
            author_id: self.author_id,
            latitude: self.latitude,
            longitude: self.longitude,
            created_at,
            expires_at,
            place_name: self.place_name,
            media_url: self.media_url,
            caption: self.caption,
            like_count: self.like_count,
            tags: self.tags,
            is_hidden: self.is_hidden,
        }
    }
}
