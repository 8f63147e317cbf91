//! Per-sport rating parameters

use common::models::SkillLevel;

/// Ratings at or above this are at least intermediate in every sport
const INTERMEDIATE_FLOOR: i32 = 1100;

/// How far below the competitive cutoff the advanced bracket starts
const ADVANCED_MARGIN: i32 = 250;

/// Rating parameters for one sport
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SportProfile {
    /// Base sensitivity of rating updates
    pub k_factor: f64,
    /// Rating at which a player counts as competitive
    pub competitive_threshold: i32,
}

/// Look up the profile for a sport.
///
/// Individual and small-team sports swing harder than large-team ones,
/// where one player's influence on the result is diluted.
pub fn profile(sport: &str) -> SportProfile {
    let (k_factor, competitive_threshold) = match sport.to_lowercase().as_str() {
        "tennis" => (40.0, 1650),
        "pickleball" | "badminton" | "squash" | "table_tennis" => (36.0, 1600),
        "basketball" => (32.0, 1600),
        "volleyball" => (28.0, 1550),
        "soccer" | "football" | "hockey" | "rugby" => (24.0, 1550),
        "baseball" | "softball" | "cricket" => (20.0, 1500),
        "running" | "cycling" | "swimming" => (20.0, 1500),
        _ => (32.0, 1600),
    };

    SportProfile {
        k_factor,
        competitive_threshold,
    }
}

/// Map a rating to a skill bracket for a sport
pub fn skill_level(rating: i32, sport: &str) -> SkillLevel {
    let threshold = profile(sport).competitive_threshold;

    if rating >= threshold {
        SkillLevel::Competitive
    } else if rating >= threshold - ADVANCED_MARGIN {
        SkillLevel::Advanced
    } else if rating >= INTERMEDIATE_FLOOR {
        SkillLevel::Intermediate
    } else {
        SkillLevel::Beginner
    }
}
