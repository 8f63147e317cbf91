//! Player standing, behavior tracking and penalties

use std::collections::BTreeMap;

use chrono::{DateTime, Duration, Utc};
use common::models::{
    ActivityResult, BehaviorEvent, BehaviorKind, Penalty, PenaltyKind, PlayerStanding,
    ResultType, Severity,
};
use serde::Serialize;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::notify::{penalty_notification, Notifier};
use crate::rules::{self, PenaltyDecision};
use crate::store::Store;

/// Hours after an activity's start before a missing result means no-show
pub const DEFAULT_NO_SHOW_GRACE_HOURS: i64 = 2;

fn clamp_score(value: i32) -> i32 {
    value.clamp(0, 100)
}

/// Deltas to apply to a standing row
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StandingChange {
    pub reputation: i32,
    pub reliability: i32,
    pub sportsmanship: i32,
    pub games: i32,
    pub no_shows: i32,
    pub late_arrivals: i32,
    pub positive_feedback: i32,
    pub negative_feedback: i32,
}

impl StandingChange {
    /// Apply to a standing row, keeping every score within 0..=100
    pub fn apply_to(&self, standing: &mut PlayerStanding) {
        standing.reputation_score = clamp_score(standing.reputation_score + self.reputation);
        standing.reliability_score = clamp_score(standing.reliability_score + self.reliability);
        standing.sportsmanship_score =
            clamp_score(standing.sportsmanship_score + self.sportsmanship);
        standing.total_games += self.games;
        standing.no_shows += self.no_shows;
        standing.late_arrivals += self.late_arrivals;
        standing.positive_feedback += self.positive_feedback;
        standing.negative_feedback += self.negative_feedback;
    }
}

/// Whether a player is currently restricted from joining
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BanStatus {
    pub banned: bool,
    pub reason: Option<String>,
    pub expires_at: Option<DateTime<Utc>>,
}

/// Result of a report or feedback action
#[derive(Debug, Clone, Serialize)]
pub struct ActionOutcome {
    pub success: bool,
    pub message: String,
    pub penalty: Option<Penalty>,
}

impl ActionOutcome {
    fn accepted(message: impl Into<String>, penalty: Option<Penalty>) -> Self {
        Self {
            success: true,
            message: message.into(),
            penalty,
        }
    }

    fn rejected(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            penalty: None,
        }
    }
}

/// A manually filed behavior report
#[derive(Debug, Clone)]
pub struct BehaviorReport {
    pub reporter_id: Uuid,
    pub user_id: Uuid,
    pub kind: BehaviorKind,
    pub severity: Severity,
    pub game_id: Option<Uuid>,
    pub description: Option<String>,
}

/// Summary of one no-show scan
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NoShowSweep {
    pub activities_processed: usize,
    pub players_penalized: usize,
}

/// Aggregate moderation figures for dashboards
#[derive(Debug, Clone, Default, Serialize)]
pub struct ModerationStats {
    pub active_penalties: i64,
    pub auto_applied_penalties: i64,
    pub behavior_counts: BTreeMap<BehaviorKind, i64>,
}

/// Who is behind a penalty: the scheduler or a person
#[derive(Debug, Clone, Copy)]
enum Source {
    Automatic,
    Reported(Uuid),
}

impl Source {
    fn reporter(self) -> Option<Uuid> {
        match self {
            Source::Automatic => None,
            Source::Reported(id) => Some(id),
        }
    }
}

/// Records behavior, escalates penalties and maintains standing
pub struct StandingEngine<S, N> {
    store: S,
    notifier: N,
    no_show_grace: Duration,
}

impl<S: Store, N: Notifier> StandingEngine<S, N> {
    pub fn new(store: S, notifier: N) -> Self {
        Self {
            store,
            notifier,
            no_show_grace: Duration::hours(DEFAULT_NO_SHOW_GRACE_HOURS),
        }
    }

    pub fn with_no_show_grace_hours(mut self, hours: i64) -> Self {
        self.no_show_grace = Duration::hours(hours);
        self
    }

    /// Penalize every participant of activities that ended without a result.
    ///
    /// Each processed activity gets a no-show result so the next scan skips it.
    pub async fn detect_no_shows(&self, now: DateTime<Utc>) -> common::Result<NoShowSweep> {
        let cutoff = now - self.no_show_grace;
        let overdue = self.store.activities_awaiting_result(cutoff).await?;
        let mut sweep = NoShowSweep::default();

        for activity in overdue {
            let participants = self.store.participants(activity.id).await?;
            for &user_id in &participants {
                self.penalize_no_show(user_id, Some(activity.id), Source::Automatic, now)
                    .await?;
                sweep.players_penalized += 1;
            }

            self.store
                .insert_result(&ActivityResult {
                    game_id: activity.id,
                    result_type: ResultType::NoShow,
                    winning_team: vec![],
                    losing_team: vec![],
                    is_draw: false,
                    recorded_by: None,
                    elo_changes: BTreeMap::new(),
                    created_at: now,
                })
                .await?;
            sweep.activities_processed += 1;
        }

        if sweep.activities_processed > 0 {
            info!(
                "No-show scan: {} activities, {} players penalized",
                sweep.activities_processed, sweep.players_penalized
            );
        }
        Ok(sweep)
    }

    /// Handle a manually filed report
    pub async fn report_player(&self, report: BehaviorReport) -> common::Result<ActionOutcome> {
        if report.reporter_id == report.user_id {
            return Ok(ActionOutcome::rejected("You cannot report yourself"));
        }

        let now = Utc::now();
        let source = Source::Reported(report.reporter_id);

        match report.kind {
            BehaviorKind::NoShow => {
                let penalty = self
                    .penalize_no_show(report.user_id, report.game_id, source, now)
                    .await?;
                Ok(ActionOutcome::accepted("No-show recorded", Some(penalty)))
            }
            BehaviorKind::Disruptive => {
                let decision = rules::disruptive_penalty(report.severity);
                self.record_event(&report, source, now).await?;
                let change = StandingChange {
                    reputation: decision.standing_delta,
                    sportsmanship: decision.standing_delta,
                    negative_feedback: 1,
                    ..Default::default()
                };
                let penalty = self
                    .enforce(report.user_id, &decision, change, source, now)
                    .await?;
                Ok(ActionOutcome::accepted("Report recorded", Some(penalty)))
            }
            BehaviorKind::LateArrival => {
                let decision = if report.severity == Severity::Severe {
                    rules::chronic_late_penalty()
                } else {
                    let since = now - Duration::days(rules::LATE_ARRIVAL_WINDOW_DAYS);
                    let prior = self
                        .store
                        .count_behavior_since(report.user_id, BehaviorKind::LateArrival, since)
                        .await?;
                    rules::late_arrival_penalty(prior)
                };
                self.record_event(&report, source, now).await?;
                let change = StandingChange {
                    reputation: decision.standing_delta,
                    reliability: decision.standing_delta,
                    late_arrivals: 1,
                    ..Default::default()
                };
                let penalty = self
                    .enforce(report.user_id, &decision, change, source, now)
                    .await?;
                Ok(ActionOutcome::accepted("Late arrival recorded", Some(penalty)))
            }
            BehaviorKind::EarlyLeave => {
                self.record_event(&report, source, now).await?;
                self.update_standing(
                    report.user_id,
                    &StandingChange {
                        reputation: -3,
                        reliability: -3,
                        ..Default::default()
                    },
                )
                .await?;
                Ok(ActionOutcome::accepted("Early leave recorded", None))
            }
            BehaviorKind::Positive => {
                self.record_event(&report, source, now).await?;
                self.update_standing(
                    report.user_id,
                    &StandingChange {
                        reputation: 1,
                        sportsmanship: 2,
                        positive_feedback: 1,
                        ..Default::default()
                    },
                )
                .await?;
                Ok(ActionOutcome::accepted("Thanks for the shout-out", None))
            }
        }
    }

    /// Peer feedback after an activity both players took part in
    pub async fn submit_feedback(
        &self,
        from_user: Uuid,
        to_user: Uuid,
        game_id: Uuid,
        positive: bool,
    ) -> common::Result<ActionOutcome> {
        if from_user == to_user {
            return Ok(ActionOutcome::rejected("You cannot rate yourself"));
        }

        let participants = self.store.participants(game_id).await?;
        if !participants.contains(&from_user) || !participants.contains(&to_user) {
            return Ok(ActionOutcome::rejected(
                "Only players who took part in the game can leave feedback",
            ));
        }

        let change = if positive {
            let now = Utc::now();
            self.store
                .insert_behavior(&BehaviorEvent {
                    id: Uuid::new_v4(),
                    user_id: to_user,
                    behavior_type: BehaviorKind::Positive,
                    game_id: Some(game_id),
                    severity: Severity::Minor,
                    description: Some("Positive feedback from a teammate".to_string()),
                    reported_by: Some(from_user),
                    auto_detected: false,
                    created_at: now,
                })
                .await?;
            StandingChange {
                reputation: 1,
                sportsmanship: 2,
                positive_feedback: 1,
                ..Default::default()
            }
        } else {
            StandingChange {
                reputation: -1,
                sportsmanship: -3,
                negative_feedback: 1,
                ..Default::default()
            }
        };

        self.update_standing(to_user, &change).await?;
        Ok(ActionOutcome::accepted("Feedback recorded", None))
    }

    /// Insert a penalty row, computing its expiry from the duration
    pub async fn apply_penalty(
        &self,
        user_id: Uuid,
        decision: &PenaltyDecision,
        auto_applied: bool,
        applied_by: Option<Uuid>,
        now: DateTime<Utc>,
    ) -> common::Result<Penalty> {
        let penalty = Penalty {
            id: Uuid::new_v4(),
            user_id,
            penalty_type: decision.kind,
            reason: decision.reason.to_string(),
            severity: decision.severity,
            duration_hours: decision.duration_hours,
            active: true,
            auto_applied,
            applied_by,
            expires_at: decision
                .duration_hours
                .map(|hours| now + Duration::hours(hours as i64)),
            created_at: now,
        };
        self.store.insert_penalty(&penalty).await?;

        info!(
            "Applied {} to {} ({}, expires {:?})",
            penalty.penalty_type.as_str(),
            user_id,
            penalty.reason,
            penalty.expires_at
        );
        Ok(penalty)
    }

    /// Apply deltas to a player's standing, creating the row if needed
    pub async fn update_standing(
        &self,
        user_id: Uuid,
        change: &StandingChange,
    ) -> common::Result<PlayerStanding> {
        let now = Utc::now();
        let mut standing = self
            .store
            .standing(user_id)
            .await?
            .unwrap_or_else(|| PlayerStanding::starting(user_id, now));

        change.apply_to(&mut standing);
        standing.updated_at = now;
        self.store.save_standing(&standing).await?;
        Ok(standing)
    }

    /// Deactivate penalties past their expiry. Standing is not restored.
    pub async fn expire_penalties(&self, now: DateTime<Utc>) -> common::Result<u64> {
        let expired = self.store.expire_penalties(now).await?;
        if expired > 0 {
            info!("Expired {} penalties", expired);
        }
        Ok(expired)
    }

    /// The most recent temporary restriction still in force, if any
    pub async fn is_player_banned(&self, user_id: Uuid) -> common::Result<BanStatus> {
        let now = Utc::now();
        let ban = self
            .store
            .penalties_in_force(user_id, now)
            .await?
            .into_iter()
            .find(|p| p.penalty_type == PenaltyKind::TemporaryBan);

        Ok(match ban {
            Some(penalty) => BanStatus {
                banned: true,
                reason: Some(penalty.reason),
                expires_at: penalty.expires_at,
            },
            None => BanStatus {
                banned: false,
                reason: None,
                expires_at: None,
            },
        })
    }

    /// Moderation figures since a point in time. Failures yield zeros.
    pub async fn moderation_stats(&self, since: DateTime<Utc>) -> ModerationStats {
        match self.try_moderation_stats(since).await {
            Ok(stats) => stats,
            Err(e) => {
                error!("Failed to load moderation stats: {}", e);
                ModerationStats::default()
            }
        }
    }

    async fn try_moderation_stats(&self, since: DateTime<Utc>) -> common::Result<ModerationStats> {
        Ok(ModerationStats {
            active_penalties: self.store.count_active_penalties().await?,
            auto_applied_penalties: self.store.count_auto_penalties_since(since).await?,
            behavior_counts: self
                .store
                .behavior_counts_since(since)
                .await?
                .into_iter()
                .collect(),
        })
    }

    async fn penalize_no_show(
        &self,
        user_id: Uuid,
        game_id: Option<Uuid>,
        source: Source,
        now: DateTime<Utc>,
    ) -> common::Result<Penalty> {
        // Counted before this one is recorded
        let since = now - Duration::days(rules::NO_SHOW_WINDOW_DAYS);
        let prior = self
            .store
            .count_behavior_since(user_id, BehaviorKind::NoShow, since)
            .await?;
        let decision = rules::no_show_penalty(prior);

        if prior >= 2 {
            warn!("Player {} has {} prior no-shows in the window", user_id, prior);
        }

        self.store
            .insert_behavior(&BehaviorEvent {
                id: Uuid::new_v4(),
                user_id,
                behavior_type: BehaviorKind::NoShow,
                game_id,
                severity: decision.severity,
                description: Some("Did not show up for a joined game".to_string()),
                reported_by: source.reporter(),
                auto_detected: matches!(source, Source::Automatic),
                created_at: now,
            })
            .await?;

        let change = StandingChange {
            reputation: decision.standing_delta,
            reliability: decision.standing_delta,
            no_shows: 1,
            ..Default::default()
        };
        self.enforce(user_id, &decision, change, source, now).await
    }

    /// Store the reported behavior with the severity the reporter observed
    async fn record_event(
        &self,
        report: &BehaviorReport,
        source: Source,
        now: DateTime<Utc>,
    ) -> common::Result<()> {
        self.store
            .insert_behavior(&BehaviorEvent {
                id: Uuid::new_v4(),
                user_id: report.user_id,
                behavior_type: report.kind,
                game_id: report.game_id,
                severity: report.severity,
                description: report.description.clone(),
                reported_by: source.reporter(),
                auto_detected: matches!(source, Source::Automatic),
                created_at: now,
            })
            .await
    }

    /// Penalty, then standing, then exactly one notification
    async fn enforce(
        &self,
        user_id: Uuid,
        decision: &PenaltyDecision,
        change: StandingChange,
        source: Source,
        now: DateTime<Utc>,
    ) -> common::Result<Penalty> {
        let penalty = self
            .apply_penalty(
                user_id,
                decision,
                matches!(source, Source::Automatic),
                source.reporter(),
                now,
            )
            .await?;
        self.update_standing(user_id, &change).await?;
        self.notifier
            .dispatch(penalty_notification(&penalty, decision.standing_delta))
            .await?;
        Ok(penalty)
    }
}
