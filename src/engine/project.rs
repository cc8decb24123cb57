//! View projection: ordering and tag filtering of computed spots.

use crate::types::{GeoPoint, Spot, SpotError, SpotResult, SHOW_ALL};

/// Sort order for spot views.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortMode {
    /// Clustering output order.
    #[default]
    Unfiltered,
    /// Closest centroid to the reference point first.
    Proximity,
    /// Highest vibe score first, stable for ties.
    Trending,
}

impl SortMode {
    /// Return a human-readable name for this mode.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Unfiltered => "unfiltered",
            Self::Proximity => "proximity",
            Self::Trending => "trending",
        }
    }

    /// Parse a sort mode from a string name.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "unfiltered" | "all" | "none" => Some(Self::Unfiltered),
            "proximity" | "nearby" | "near" => Some(Self::Proximity),
            "trending" | "hot" => Some(Self::Trending),
            _ => None,
        }
    }
}

impl std::fmt::Display for SortMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl std::str::FromStr for SortMode {
    type Err = SpotError;

    fn from_str(s: &str) -> SpotResult<Self> {
        Self::from_name(s).ok_or_else(|| SpotError::InvalidSortMode(s.to_string()))
    }
}

/// Tag filter applied independently of the sort mode.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum TagFilter {
    /// Keep every spot.
    #[default]
    ShowAll,
    /// Keep spots where some member tag contains this text, case-insensitively.
    Tag(String),
}

impl TagFilter {
    /// Parse a filter; [`SHOW_ALL`] (any case) or blank input disables filtering.
    pub fn parse(s: &str) -> Self {
        let trimmed = s.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case(SHOW_ALL) {
            Self::ShowAll
        } else {
            Self::Tag(trimmed.to_string())
        }
    }

    pub fn matches(&self, spot: &Spot) -> bool {
        match self {
            Self::ShowAll => true,
            Self::Tag(tag) => {
                let needle = tag.to_lowercase();
                spot.members.iter().any(|p| p.has_tag_containing(&needle))
            }
        }
    }
}

/// A complete view request.
#[derive(Debug, Clone, Default)]
pub struct ViewRequest {
    pub mode: SortMode,
    /// Needed by [`SortMode::Proximity`]; without it the order is unchanged.
    pub reference: Option<GeoPoint>,
    pub tag_filter: TagFilter,
}

/// Remove spots that do not match `filter`, preserving order.
pub fn filter_by_tag(spots: &[Spot], filter: &TagFilter) -> Vec<Spot> {
    spots
        .iter()
        .filter(|s| filter.matches(s))
        .cloned()
        .collect()
}

/// Order spots by `mode`. All spots are returned; only the order changes.
pub fn sort_spots(spots: &[Spot], mode: SortMode, reference: Option<GeoPoint>) -> Vec<Spot> {
    let mut ordered = spots.to_vec();
    match mode {
        SortMode::Unfiltered => {}
        SortMode::Proximity => match reference.filter(|r| r.is_finite()) {
            Some(origin) => {
                // Vec::sort_by is stable. NaN distances sort last.
                ordered.sort_by(|a, b| {
                    let da = origin.distance_to(&a.centroid());
                    let db = origin.distance_to(&b.centroid());
                    da.is_nan().cmp(&db.is_nan()).then(da.total_cmp(&db))
                });
            }
            None => {
                log::debug!("Proximity view without a reference point, keeping cluster order");
            }
        },
        SortMode::Trending => {
            ordered.sort_by(|a, b| b.vibe_score.cmp(&a.vibe_score));
        }
    }
    ordered
}

/// Apply the tag filter, then order the remaining spots.
pub fn project_view(
    spots: &[Spot],
    mode: SortMode,
    reference: Option<GeoPoint>,
    tag_filter: &TagFilter,
) -> Vec<Spot> {
    let filtered = filter_by_tag(spots, tag_filter);
    sort_spots(&filtered, mode, reference)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_show_all_sentinel() {
        assert_eq!(TagFilter::parse("All"), TagFilter::ShowAll);
        assert_eq!(TagFilter::parse("all"), TagFilter::ShowAll);
        assert_eq!(TagFilter::parse("  "), TagFilter::ShowAll);
        assert_eq!(TagFilter::parse("Music"), TagFilter::Tag("Music".into()));
    }

    #[test]
    fn parses_sort_modes() {
        assert_eq!("Trending".parse::<SortMode>().unwrap(), SortMode::Trending);
        assert_eq!(SortMode::from_name("nearby"), Some(SortMode::Proximity));
        assert!("sideways".parse::<SortMode>().is_err());
    }
}
