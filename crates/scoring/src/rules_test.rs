#[cfg(test)]
mod tests {
    use crate::rules::*;
    use common::models::{PenaltyKind, Severity};

    #[test]
    fn test_no_show_table() {
        let first = no_show_penalty(0);
        assert_eq!(first.kind, PenaltyKind::Warning);
        assert_eq!(first.duration_hours, None);
        assert_eq!(first.standing_delta, -5);

        let second = no_show_penalty(1);
        assert_eq!(second.kind, PenaltyKind::ReputationPenalty);
        assert_eq!(second.duration_hours, None);
        assert_eq!(second.standing_delta, -10);

        let third = no_show_penalty(2);
        assert_eq!(third.kind, PenaltyKind::TemporaryBan);
        assert_eq!(third.duration_hours, Some(24));
        assert_eq!(third.standing_delta, -15);

        let chronic = no_show_penalty(3);
        assert_eq!(chronic.kind, PenaltyKind::TemporaryBan);
        assert_eq!(chronic.duration_hours, Some(72));
        assert_eq!(chronic.standing_delta, -25);
    }

    #[test]
    fn test_no_show_escalation_is_monotonic() {
        let mut previous = no_show_penalty(0);
        for count in 1..10 {
            let current = no_show_penalty(count);
            assert!(current.standing_delta <= previous.standing_delta);
            assert!(current.duration_hours.unwrap_or(0) >= previous.duration_hours.unwrap_or(0));
            assert!(current.severity >= previous.severity);
            previous = current;
        }
    }

    #[test]
    fn test_no_show_caps_at_chronic_tier() {
        assert_eq!(no_show_penalty(3), no_show_penalty(25));
    }

    #[test]
    fn test_disruptive_table() {
        let minor = disruptive_penalty(Severity::Minor);
        assert_eq!(minor.kind, PenaltyKind::Warning);
        assert_eq!(minor.standing_delta, -10);

        let moderate = disruptive_penalty(Severity::Moderate);
        assert_eq!(moderate.kind, PenaltyKind::TemporaryBan);
        assert_eq!(moderate.duration_hours, Some(48));
        assert_eq!(moderate.standing_delta, -20);

        let severe = disruptive_penalty(Severity::Severe);
        assert_eq!(severe.duration_hours, Some(168));
        assert_eq!(severe.standing_delta, -35);
        assert_eq!(severe.severity, Severity::Severe);
    }

    #[test]
    fn test_late_arrival_tiers() {
        let first = late_arrival_penalty(0);
        assert_eq!(first.kind, PenaltyKind::Warning);
        assert_eq!(first.standing_delta, -2);

        let repeat = late_arrival_penalty(1);
        assert_eq!(repeat.kind, PenaltyKind::ReputationPenalty);
        assert_eq!(repeat.standing_delta, -5);
        assert_eq!(late_arrival_penalty(6), repeat);

        let chronic = chronic_late_penalty();
        assert_eq!(chronic.kind, PenaltyKind::TemporaryBan);
        assert_eq!(chronic.duration_hours, Some(12));
        assert_eq!(chronic.standing_delta, -10);
    }
}
