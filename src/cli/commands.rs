//! CLI command implementations.

use std::path::Path;

use crate::config::EngineConfig;
use crate::engine::{sweep, SpotEngine, ViewRequest};
use crate::format::{FeedSnapshot, SnapshotReader, SnapshotWriter};
use crate::store::{InMemoryStore, StoryStore};
use crate::types::{PostBuilder, Spot, SpotResult, VibeLevel};

/// Fields for a new story.
pub struct NewPost {
    pub id: String,
    pub author_id: String,
    pub latitude: f64,
    pub longitude: f64,
    pub place_name: String,
    pub caption: String,
    pub media_url: Option<String>,
    pub tags: Vec<String>,
    /// Creation time; defaults to now.
    pub created_at: Option<u64>,
}

fn load_store(path: &Path, config: &EngineConfig) -> SpotResult<InMemoryStore> {
    let snapshot = SnapshotReader::read_from_file(path)?;
    InMemoryStore::from_snapshot(snapshot, config.report_threshold)
}

fn save_store(store: &InMemoryStore, path: &Path) -> SpotResult<()> {
    SnapshotWriter::new(true).write_to_file(&store.to_snapshot(), path)
}

/// Create a new empty feed snapshot.
pub fn cmd_create(path: &Path) -> SpotResult<()> {
    SnapshotWriter::new(true).write_to_file(&FeedSnapshot::default(), path)?;
    println!("Created {}", path.display());
    Ok(())
}

/// Add a story to the feed.
pub fn cmd_add(path: &Path, config: &EngineConfig, new_post: NewPost, json: bool) -> SpotResult<()> {
    let mut store = load_store(path, config)?;

    let created_at = new_post.created_at.unwrap_or_else(crate::types::now_millis);
    let mut builder = PostBuilder::new(new_post.id, new_post.latitude, new_post.longitude)
        .author(new_post.author_id)
        .created_at(created_at)
        .expires_at(created_at.saturating_add(config.story_lifetime_ms))
        .place_name(new_post.place_name)
        .caption(new_post.caption)
        .tags(new_post.tags);
    if let Some(url) = new_post.media_url {
        builder = builder.media_url(url);
    }
    let post = builder.build();
    let id = post.id.clone();
    let expires_at = post.expires_at;
    store.create(post)?;
    save_store(&store, path)?;

    if json {
        println!(
            "{}",
            serde_json::json!({"id": id, "expires_at": expires_at})
        );
    } else {
        println!(
            "Added story {} (expires {}) to {}",
            id,
            format_timestamp(expires_at),
            path.display()
        );
    }
    Ok(())
}

/// Like a story on behalf of a user.
pub fn cmd_like(
    path: &Path,
    config: &EngineConfig,
    post_id: &str,
    user_id: &str,
    json: bool,
) -> SpotResult<()> {
    let mut store = load_store(path, config)?;
    let added = store.like(post_id, user_id)?;
    let count = store.get(post_id).map(|p| p.like_count).unwrap_or(0);
    save_store(&store, path)?;

    if json {
        println!(
            "{}",
            serde_json::json!({"id": post_id, "liked": added, "like_count": count})
        );
    } else if added {
        println!("{} liked {} ({} likes)", user_id, post_id, count);
    } else {
        println!("{} already liked {} ({} likes)", user_id, post_id, count);
    }
    Ok(())
}

/// Remove a user's like from a story.
pub fn cmd_unlike(
    path: &Path,
    config: &EngineConfig,
    post_id: &str,
    user_id: &str,
    json: bool,
) -> SpotResult<()> {
    let mut store = load_store(path, config)?;
    let removed = store.unlike(post_id, user_id)?;
    let count = store.get(post_id).map(|p| p.like_count).unwrap_or(0);
    save_store(&store, path)?;

    if json {
        println!(
            "{}",
            serde_json::json!({"id": post_id, "unliked": removed, "like_count": count})
        );
    } else if removed {
        println!("{} unliked {} ({} likes)", user_id, post_id, count);
    } else {
        println!("{} had not liked {}", user_id, post_id);
    }
    Ok(())
}

/// Report a story on behalf of a user.
pub fn cmd_report(
    path: &Path,
    config: &EngineConfig,
    post_id: &str,
    user_id: &str,
    json: bool,
) -> SpotResult<()> {
    let mut store = load_store(path, config)?;
    let hidden = store.report(post_id, user_id)?;
    let reports = store.report_count(post_id);
    save_store(&store, path)?;

    if json {
        println!(
            "{}",
            serde_json::json!({"id": post_id, "reports": reports, "hidden": hidden})
        );
    } else {
        println!(
            "Reported {} ({} reports{})",
            post_id,
            reports,
            if hidden { ", hidden" } else { "" }
        );
    }
    Ok(())
}

/// Delete a story.
pub fn cmd_delete(path: &Path, config: &EngineConfig, post_id: &str, json: bool) -> SpotResult<()> {
    let mut store = load_store(path, config)?;
    let post = store.delete(post_id)?;
    save_store(&store, path)?;

    if json {
        println!("{}", serde_json::json!({"deleted": post.id}));
    } else {
        println!("Deleted story {}", post.id);
    }
    Ok(())
}

/// Purge expired stories from the snapshot.
pub fn cmd_sweep(path: &Path, config: &EngineConfig, now: u64, json: bool) -> SpotResult<()> {
    let mut store = load_store(path, config)?;
    let removed = store.purge_expired(now);
    save_store(&store, path)?;

    if json {
        println!(
            "{}",
            serde_json::json!({"removed": removed, "remaining": store.len()})
        );
    } else {
        println!(
            "Removed {} expired stories, {} remaining",
            removed.len(),
            store.len()
        );
        for id in &removed {
            println!("  {}", id);
        }
    }
    Ok(())
}

/// Compute and print a spot view.
pub fn cmd_spots(
    path: &Path,
    config: &EngineConfig,
    now: u64,
    request: &ViewRequest,
    limit: usize,
    json: bool,
) -> SpotResult<()> {
    let store = load_store(path, config)?;
    let engine = SpotEngine::new(config.clone());
    let mut spots = engine.view(&store.posts(), now, request);
    spots.truncate(limit);

    if json {
        let out: Vec<serde_json::Value> = spots.iter().map(|s| spot_json(s, now)).collect();
        println!("{}", serde_json::to_string_pretty(&out).unwrap_or_default());
    } else if spots.is_empty() {
        println!("No active spots");
    } else {
        for spot in &spots {
            print_spot(spot, now);
        }
    }
    Ok(())
}

/// Feed statistics.
pub fn cmd_stats(path: &Path, config: &EngineConfig, now: u64, json: bool) -> SpotResult<()> {
    let store = load_store(path, config)?;
    let posts = store.posts();
    let (active, report) = sweep(&posts, now);
    let engine = SpotEngine::new(config.clone());
    let spots = engine.compute_spots(&active);

    let total_likes: u64 = active.iter().map(|p| p.like_count as u64).sum();
    let count_level = |level: VibeLevel| spots.iter().filter(|s| s.vibe_level() == level).count();
    let hot = count_level(VibeLevel::Hot);
    let active_spots = count_level(VibeLevel::Active);
    let calm = count_level(VibeLevel::Calm);
    let top = spots.iter().max_by_key(|s| s.vibe_score);

    if json {
        let info = serde_json::json!({
            "posts": posts.len(),
            "active": active.len(),
            "expired": report.expired.len(),
            "hidden": report.hidden.len(),
            "invalid": report.invalid.len(),
            "likes": total_likes,
            "spots": spots.len(),
            "levels": {
                "hot": hot,
                "active": active_spots,
                "calm": calm,
            },
            "top_spot": top.map(|s| s.id.clone()),
        });
        println!("{}", serde_json::to_string_pretty(&info).unwrap_or_default());
    } else {
        println!("Feed Statistics:");
        println!("  Stories: {}", posts.len());
        println!("  Active: {}", active.len());
        println!("  Expired: {}", report.expired.len());
        println!("  Hidden: {}", report.hidden.len());
        println!("  Invalid: {}", report.invalid.len());
        println!("  Likes on active stories: {}", total_likes);
        println!();
        println!("  Spots: {}", spots.len());
        println!("    HOT: {}", hot);
        println!("    ACTIVE: {}", active_spots);
        println!("    CALM: {}", calm);
        if let Some(top) = top {
            println!(
                "  Top spot: {} ({}, vibe {})",
                top.id, top.neighborhood_label, top.vibe_score
            );
        }
    }
    Ok(())
}

fn spot_json(spot: &Spot, now: u64) -> serde_json::Value {
    let members: Vec<serde_json::Value> = spot
        .members
        .iter()
        .map(|p| {
            serde_json::json!({
                "id": p.id,
                "author_id": p.author_id,
                "place_name": p.place_name,
                "caption": p.caption,
                "likes": p.like_count,
                "tags": p.tags,
                "remaining_ms": p.remaining_millis(now),
            })
        })
        .collect();
    serde_json::json!({
        "id": spot.id,
        "latitude": spot.centroid_latitude,
        "longitude": spot.centroid_longitude,
        "neighborhood": spot.neighborhood_label,
        "vibe_score": spot.vibe_score,
        "vibe": spot.vibe_level().name(),
        "stories": spot.member_count(),
        "likes": spot.total_likes(),
        "members": members,
    })
}

fn print_spot(spot: &Spot, now: u64) {
    println!(
        "{} [{} {}] {} ({:.5}, {:.5})",
        spot.id,
        spot.vibe_level(),
        spot.vibe_score,
        spot.neighborhood_label,
        spot.centroid_latitude,
        spot.centroid_longitude
    );
    println!(
        "  {} stories, {} likes, last activity {}",
        spot.member_count(),
        spot.total_likes(),
        format_timestamp(spot.latest_activity())
    );
    for post in &spot.members {
        println!(
            "    {} by {} ({} likes, {} left): {:?}",
            post.id,
            post.author_id,
            post.like_count,
            format_remaining(post.remaining_millis(now)),
            post.caption
        );
    }
}

fn format_remaining(millis: u64) -> String {
    let minutes = millis / 60_000;
    if minutes >= 60 {
        format!("{}h{:02}m", minutes / 60, minutes % 60)
    } else {
        format!("{}m", minutes)
    }
}

fn format_timestamp(millis: u64) -> String {
    let dt = chrono::DateTime::from_timestamp_millis(millis as i64);
    match dt {
        Some(dt) => dt.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
        None => format!("{} ms", millis),
    }
}
