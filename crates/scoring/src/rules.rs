//! Penalty escalation tables

use common::models::{PenaltyKind, Severity};

/// Look-back window for repeat no-shows
pub const NO_SHOW_WINDOW_DAYS: i64 = 30;

/// Look-back window for repeat late arrivals
pub const LATE_ARRIVAL_WINDOW_DAYS: i64 = 7;

/// A penalty the rules decided to apply
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PenaltyDecision {
    pub kind: PenaltyKind,
    pub severity: Severity,
    pub duration_hours: Option<i32>,
    /// Change to the aggregate standing score (negative)
    pub standing_delta: i32,
    pub reason: &'static str,
}

/// Escalate by how many no-shows the player already had in the window
pub fn no_show_penalty(prior_recent: i64) -> PenaltyDecision {
    match prior_recent {
        i64::MIN..=0 => PenaltyDecision {
            kind: PenaltyKind::Warning,
            severity: Severity::Minor,
            duration_hours: None,
            standing_delta: -5,
            reason: "Missed a game without notice",
        },
        1 => PenaltyDecision {
            kind: PenaltyKind::ReputationPenalty,
            severity: Severity::Moderate,
            duration_hours: None,
            standing_delta: -10,
            reason: "Second no-show within 30 days",
        },
        2 => PenaltyDecision {
            kind: PenaltyKind::TemporaryBan,
            severity: Severity::Moderate,
            duration_hours: Some(24),
            standing_delta: -15,
            reason: "Third no-show within 30 days",
        },
        _ => PenaltyDecision {
            kind: PenaltyKind::TemporaryBan,
            severity: Severity::Severe,
            duration_hours: Some(72),
            standing_delta: -25,
            reason: "Repeated no-shows within 30 days",
        },
    }
}

/// Disruptive conduct maps straight from the reported severity
pub fn disruptive_penalty(severity: Severity) -> PenaltyDecision {
    match severity {
        Severity::Minor => PenaltyDecision {
            kind: PenaltyKind::Warning,
            severity,
            duration_hours: None,
            standing_delta: -10,
            reason: "Reported for disruptive conduct",
        },
        Severity::Moderate => PenaltyDecision {
            kind: PenaltyKind::TemporaryBan,
            severity,
            duration_hours: Some(48),
            standing_delta: -20,
            reason: "Reported for disruptive conduct",
        },
        Severity::Severe => PenaltyDecision {
            kind: PenaltyKind::TemporaryBan,
            severity,
            duration_hours: Some(168),
            standing_delta: -35,
            reason: "Reported for serious misconduct",
        },
    }
}

/// Escalate by how many late arrivals the player already had in the window
pub fn late_arrival_penalty(prior_recent: i64) -> PenaltyDecision {
    if prior_recent <= 0 {
        PenaltyDecision {
            kind: PenaltyKind::Warning,
            severity: Severity::Minor,
            duration_hours: None,
            standing_delta: -2,
            reason: "Arrived late to a game",
        }
    } else {
        PenaltyDecision {
            kind: PenaltyKind::ReputationPenalty,
            severity: Severity::Minor,
            duration_hours: None,
            standing_delta: -5,
            reason: "Repeated late arrivals within 7 days",
        }
    }
}

/// Chronic lateness. Only a severe manual report reaches this tier.
pub fn chronic_late_penalty() -> PenaltyDecision {
    PenaltyDecision {
        kind: PenaltyKind::TemporaryBan,
        severity: Severity::Moderate,
        duration_hours: Some(12),
        standing_delta: -10,
        reason: "Chronic late arrivals",
    }
}
