//! Spatial clustering: single-pass anchor-threshold grouping of posts into spots.
//!
//! Each post is compared only against the first member (the anchor) of every
//! cluster formed so far, in formation order. The first cluster whose anchor is
//! closer than the threshold takes the post; otherwise the post anchors a new
//! cluster. The result therefore depends on input order.

use crate::index::NeighborhoodTable;
use crate::types::{GeoPoint, Post, Spot};

use super::score::{vibe_score, VibeWeights};

/// Identifier used when a place name sanitizes to nothing.
pub const FALLBACK_SPOT_ID: &str = "spot";

/// Parameters for turning clusters into spots.
pub struct SpotParams<'a> {
    /// Anchor distance threshold in degrees (strict `<`).
    pub threshold: f64,
    /// Neighborhood lookup table.
    pub neighborhoods: &'a NeighborhoodTable,
    /// Radius for neighborhood lookup in degrees.
    pub neighborhood_radius: f64,
    /// Label when no neighborhood is in range.
    pub default_label: &'a str,
    /// Vibe score weights.
    pub weights: VibeWeights,
}

/// Partition posts into clusters of indices into `posts`.
///
/// Every post with finite coordinates appears in exactly one cluster; the
/// others are skipped. Clusters are never empty and appear in formation
/// order, members in input order.
pub fn cluster_posts(posts: &[Post], threshold: f64) -> Vec<Vec<usize>> {
    let mut clusters: Vec<Vec<usize>> = Vec::new();

    for (i, post) in posts.iter().enumerate() {
        let location = post.location();
        if !location.is_finite() {
            log::warn!("Skipping post {} with non-finite coordinates", post.id);
            continue;
        }
        let home = clusters
            .iter()
            .position(|c| posts[c[0]].location().distance_to(&location) < threshold);
        match home {
            Some(ci) => clusters[ci].push(i),
            None => clusters.push(vec![i]),
        }
    }

    clusters
}

/// Keep only alphanumeric characters of the place name.
pub fn sanitize_place_name(place_name: &str) -> String {
    let id: String = place_name.chars().filter(|c| c.is_alphanumeric()).collect();
    if id.is_empty() {
        FALLBACK_SPOT_ID.to_string()
    } else {
        id
    }
}

/// Spot id for a cluster: the anchor's sanitized place name, then `-`, then
/// the anchor's post id.
///
/// Depends on the anchor alone, so it does not change while the anchor stays
/// in the cluster. Sanitized names contain no `-`, so distinct anchors always
/// give distinct ids.
pub fn spot_id(anchor: &Post) -> String {
    format!("{}-{}", sanitize_place_name(&anchor.place_name), anchor.id)
}

/// Arithmetic mean of member coordinates.
pub fn centroid(members: &[Post]) -> GeoPoint {
    if members.is_empty() {
        return GeoPoint::new(0.0, 0.0);
    }
    let n = members.len() as f64;
    let (lat, lon) = members
        .iter()
        .fold((0.0, 0.0), |(lat, lon), p| (lat + p.latitude, lon + p.longitude));
    GeoPoint::new(lat / n, lon / n)
}

/// Sort by likes descending, then most recent first. Stable for full ties.
pub fn sort_members(members: &mut [Post]) {
    members.sort_by(|a, b| {
        b.like_count
            .cmp(&a.like_count)
            .then_with(|| b.created_at.cmp(&a.created_at))
    });
}

/// Cluster posts and derive a scored spot from every cluster.
pub fn build_spots(posts: &[Post], params: &SpotParams<'_>) -> Vec<Spot> {
    let clusters = cluster_posts(posts, params.threshold);
    let mut spots = Vec::with_capacity(clusters.len());

    for cluster in clusters {
        let id = spot_id(&posts[cluster[0]]);

        let mut members: Vec<Post> = cluster.iter().map(|&i| posts[i].clone()).collect();
        let center = centroid(&members);
        sort_members(&mut members);

        let total_likes: u64 = members.iter().map(|p| p.like_count as u64).sum();
        let score = vibe_score(members.len(), total_likes, params.weights);
        let label = params.neighborhoods.resolve(
            &center,
            params.neighborhood_radius,
            params.default_label,
        );

        spots.push(Spot {
            id,
            centroid_latitude: center.latitude,
            centroid_longitude: center.longitude,
            members,
            neighborhood_label: label,
            vibe_score: score,
        });
    }

    log::debug!("Clustered {} posts into {} spots", posts.len(), spots.len());
    spots
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PostBuilder;

    fn post(id: &str, lat: f64, lon: f64) -> Post {
        PostBuilder::new(id, lat, lon).created_at(1_000).build()
    }

    #[test]
    fn compares_against_anchor_only() {
        // b is near a; c is near b but not near anchor a.
        let posts = vec![
            post("a", 0.0, 0.0),
            post("b", 0.0010, 0.0),
            post("c", 0.0020, 0.0),
        ];
        let clusters = cluster_posts(&posts, 0.0015);
        assert_eq!(clusters, vec![vec![0, 1], vec![2]]);
    }

    #[test]
    fn first_match_wins() {
        let posts = vec![
            post("a", 0.0, 0.0),
            post("b", 0.0020, 0.0),
            post("c", 0.0010, 0.0),
        ];
        let clusters = cluster_posts(&posts, 0.0015);
        assert_eq!(clusters, vec![vec![0, 2], vec![1]]);
    }

    #[test]
    fn sanitizes_place_names() {
        assert_eq!(sanitize_place_name("Café de l'Avenue!"), "CafédelAvenue");
        assert_eq!(sanitize_place_name("  --  "), FALLBACK_SPOT_ID);
    }

    #[test]
    fn skips_non_finite_posts() {
        let posts = vec![
            post("a", 0.0, 0.0),
            post("nan", f64::NAN, 0.0),
            post("inf", 0.0, f64::INFINITY),
            post("b", 0.0005, 0.0),
        ];
        let clusters = cluster_posts(&posts, 0.0015);
        assert_eq!(clusters, vec![vec![0, 3]]);
    }
}
