//! Vibe scoring.

use crate::types::{VibeLevel, LIKE_WEIGHT, MAX_VIBE_SCORE, STORY_WEIGHT};

/// Weights of the vibe score.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VibeWeights {
    /// Points per member story.
    pub story: u32,
    /// Points per like.
    pub like: u32,
}

impl Default for VibeWeights {
    fn default() -> Self {
        Self {
            story: STORY_WEIGHT,
            like: LIKE_WEIGHT,
        }
    }
}

/// Calculate the vibe score of a spot.
///
/// Formula: min(100, member_count * story_weight + total_likes * like_weight)
pub fn vibe_score(member_count: usize, total_likes: u64, weights: VibeWeights) -> u32 {
    let raw = (member_count as u64)
        .saturating_mul(weights.story as u64)
        .saturating_add(total_likes.saturating_mul(weights.like as u64));
    raw.min(MAX_VIBE_SCORE as u64) as u32
}

/// Classify a score into HOT / ACTIVE / CALM.
pub fn classify(score: u32) -> VibeLevel {
    VibeLevel::classify(score)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_story_no_likes_is_active() {
        let score = vibe_score(1, 0, VibeWeights::default());
        assert_eq!(score, 20);
        assert_eq!(classify(score), VibeLevel::Active);
    }

    #[test]
    fn clamps_at_max() {
        let score = vibe_score(5, 15, VibeWeights::default());
        assert_eq!(score, 100);
        assert_eq!(classify(score), VibeLevel::Hot);
    }

    #[test]
    fn huge_inputs_do_not_overflow() {
        assert_eq!(vibe_score(usize::MAX, u64::MAX, VibeWeights::default()), 100);
    }

    #[test]
    fn level_boundaries() {
        assert_eq!(classify(0), VibeLevel::Calm);
        assert_eq!(classify(10), VibeLevel::Calm);
        assert_eq!(classify(11), VibeLevel::Active);
        assert_eq!(classify(39), VibeLevel::Active);
        assert_eq!(classify(40), VibeLevel::Hot);
    }
}
