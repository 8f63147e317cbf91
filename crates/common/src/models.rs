//! Domain models

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Rating every player starts from in a sport they have not played yet
pub const STARTING_RATING: i32 = 1200;

/// Standing score (and sub-scores) for a player with no history
pub const STARTING_STANDING: i32 = 100;

/// A player's skill rating in one sport
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PlayerRating {
    pub user_id: Uuid,
    pub sport: String,
    pub elo_rating: i32,
    pub games_played: i32,
    pub wins: i32,
    pub losses: i32,
    pub draws: i32,
    pub last_updated: DateTime<Utc>,
}

impl PlayerRating {
    /// A fresh rating row, created lazily on the first recorded result
    pub fn starting(user_id: Uuid, sport: &str, now: DateTime<Utc>) -> Self {
        Self {
            user_id,
            sport: sport.to_string(),
            elo_rating: STARTING_RATING,
            games_played: 0,
            wins: 0,
            losses: 0,
            draws: 0,
            last_updated: now,
        }
    }
}

/// How an activity concluded
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ResultType {
    Completed,
    Cancelled,
    NoShow,
}

impl ResultType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResultType::Completed => "completed",
            ResultType::Cancelled => "cancelled",
            ResultType::NoShow => "no_show",
        }
    }
}

/// The recorded outcome of one activity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivityResult {
    pub game_id: Uuid,
    pub result_type: ResultType,
    pub winning_team: Vec<Uuid>,
    pub losing_team: Vec<Uuid>,
    pub is_draw: bool,
    pub recorded_by: Option<Uuid>,
    /// Rating delta actually applied to each player
    pub elo_changes: BTreeMap<Uuid, i32>,
    pub created_at: DateTime<Utc>,
}

/// A player's behavioral standing
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PlayerStanding {
    pub user_id: Uuid,
    pub reputation_score: i32,
    pub reliability_score: i32,
    pub sportsmanship_score: i32,
    pub total_games: i32,
    pub no_shows: i32,
    pub late_arrivals: i32,
    pub positive_feedback: i32,
    pub negative_feedback: i32,
    pub updated_at: DateTime<Utc>,
}

impl PlayerStanding {
    pub fn starting(user_id: Uuid, now: DateTime<Utc>) -> Self {
        Self {
            user_id,
            reputation_score: STARTING_STANDING,
            reliability_score: STARTING_STANDING,
            sportsmanship_score: STARTING_STANDING,
            total_games: 0,
            no_shows: 0,
            late_arrivals: 0,
            positive_feedback: 0,
            negative_feedback: 0,
            updated_at: now,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum BehaviorKind {
    NoShow,
    LateArrival,
    EarlyLeave,
    Disruptive,
    Positive,
}

impl BehaviorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            BehaviorKind::NoShow => "no_show",
            BehaviorKind::LateArrival => "late_arrival",
            BehaviorKind::EarlyLeave => "early_leave",
            BehaviorKind::Disruptive => "disruptive",
            BehaviorKind::Positive => "positive",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Minor,
    Moderate,
    Severe,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Minor => "minor",
            Severity::Moderate => "moderate",
            Severity::Severe => "severe",
        }
    }
}

/// An observed behavior, never mutated after creation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BehaviorEvent {
    pub id: Uuid,
    pub user_id: Uuid,
    pub behavior_type: BehaviorKind,
    pub game_id: Option<Uuid>,
    pub severity: Severity,
    pub description: Option<String>,
    pub reported_by: Option<Uuid>,
    pub auto_detected: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PenaltyKind {
    Warning,
    /// Temporary restriction from joining activities
    TemporaryBan,
    /// Restriction from rated, competitive activities
    EloRestriction,
    /// Standing deduction with no restriction attached
    ReputationPenalty,
}

impl PenaltyKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            PenaltyKind::Warning => "warning",
            PenaltyKind::TemporaryBan => "temporary_ban",
            PenaltyKind::EloRestriction => "elo_restriction",
            PenaltyKind::ReputationPenalty => "reputation_penalty",
        }
    }
}

/// An enforcement action against a player
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Penalty {
    pub id: Uuid,
    pub user_id: Uuid,
    pub penalty_type: PenaltyKind,
    pub reason: String,
    pub severity: Severity,
    /// None means the penalty never expires on its own
    pub duration_hours: Option<i32>,
    pub active: bool,
    pub auto_applied: bool,
    pub applied_by: Option<Uuid>,
    pub expires_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl Penalty {
    /// Whether this penalty currently restricts the player
    pub fn is_in_force(&self, now: DateTime<Utc>) -> bool {
        self.active && self.expires_at.map_or(true, |expires| expires > now)
    }
}

/// Per-player matchmaking settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MatchmakingPreference {
    pub user_id: Uuid,
    pub skill_matching_enabled: bool,
    /// Rating tolerance window
    pub preferred_skill_range: i32,
    pub competitive_mode: bool,
    pub allow_mixed_skill: bool,
    /// Minimum standing acceptable for co-participants
    pub reputation_threshold: i32,
}

impl MatchmakingPreference {
    pub fn defaults_for(user_id: Uuid) -> Self {
        Self {
            user_id,
            skill_matching_enabled: true,
            preferred_skill_range: 200,
            competitive_mode: false,
            allow_mixed_skill: true,
            reputation_threshold: 0,
        }
    }
}

/// Skill bracket derived from a rating
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum SkillLevel {
    Beginner,
    Intermediate,
    Advanced,
    Competitive,
}

/// Difficulty an organizer declares for an activity
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum DeclaredSkill {
    Beginner,
    Intermediate,
    Advanced,
    Mixed,
    Competitive,
}

impl DeclaredSkill {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeclaredSkill::Beginner => "beginner",
            DeclaredSkill::Intermediate => "intermediate",
            DeclaredSkill::Advanced => "advanced",
            DeclaredSkill::Mixed => "mixed",
            DeclaredSkill::Competitive => "competitive",
        }
    }
}

/// A scheduled pickup game
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Activity {
    pub id: Uuid,
    pub sport: String,
    pub title: String,
    pub starts_at: DateTime<Utc>,
    pub min_elo_rating: Option<i32>,
    pub max_elo_rating: Option<i32>,
    pub min_reputation: Option<i32>,
    pub competitive_mode: bool,
    pub skill_level: Option<DeclaredSkill>,
    pub creator_id: Uuid,
}

/// A message for the notification dispatcher
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Notification {
    pub user_id: Uuid,
    /// Type tag, e.g. "penalty_applied"
    pub kind: String,
    pub title: String,
    pub message: String,
    pub data: serde_json::Value,
}

/// Leaderboard entry for one sport
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub rank: i32,
    pub rating: PlayerRating,
}
