//! Basic post -> cluster -> rank flow.

use spot_engine::*;

fn main() -> SpotResult<()> {
    let now = now_millis();
    let mut store = InMemoryStore::new();

    // A few stories around Kaloum and one in Ratoma
    store.create(
        PostBuilder::new("s1", 9.5090, -13.7120)
            .author("aissata")
            .place_name("Port de Conakry")
            .tag("Music")
            .created_at(now)
            .build(),
    )?;
    store.create(
        PostBuilder::new("s2", 9.5095, -13.7124)
            .author("mamadou")
            .place_name("Port de Conakry")
            .tag("Food")
            .created_at(now)
            .build(),
    )?;
    store.create(
        PostBuilder::new("s3", 9.6180, -13.6400)
            .author("fatou")
            .place_name("Ratoma Market")
            .created_at(now)
            .build(),
    )?;
    store.like("s1", "fatou")?;
    store.like("s1", "mamadou")?;

    let engine = SpotEngine::default();
    let active = engine.filter_active(&store.posts(), now);
    let spots = engine.compute_spots(&active);
    println!("{} active stories in {} spots", active.len(), spots.len());

    let trending = engine.project_view(&spots, SortMode::Trending, None, &TagFilter::ShowAll);
    for spot in &trending {
        println!(
            "  {} [{} {}] in {}, {} stories",
            spot.id,
            spot.vibe_level(),
            spot.vibe_score,
            spot.neighborhood_label,
            spot.member_count()
        );
    }

    let here = GeoPoint::new(9.62, -13.64);
    let nearby = engine.project_view(&spots, SortMode::Proximity, Some(here), &TagFilter::ShowAll);
    if let Some(closest) = nearby.first() {
        println!("Closest spot: {}", closest.id);
    }

    Ok(())
}
