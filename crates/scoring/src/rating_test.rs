#[cfg(test)]
mod tests {
    use crate::rating::*;
    use crate::tests::MemoryStore;
    use common::models::{ResultType, SkillLevel};
    use uuid::Uuid;

    fn decisive(winners: Vec<Uuid>, losers: Vec<Uuid>) -> ResultInput {
        ResultInput {
            sport: "basketball".to_string(),
            participants: winners.iter().chain(losers.iter()).copied().collect(),
            winners,
            losers,
            is_draw: false,
        }
    }

    // calculate_rating_change tests
    #[test]
    fn test_equal_ratings_established_player() {
        assert_eq!(calculate_rating_change(1200, 1200, Outcome::Win, "basketball", 50), 16);
        assert_eq!(calculate_rating_change(1200, 1200, Outcome::Loss, "basketball", 50), -16);
        assert_eq!(calculate_rating_change(1200, 1200, Outcome::Draw, "basketball", 50), 0);
    }

    #[test]
    fn test_rating_change_is_deterministic() {
        let first = calculate_rating_change(1340, 1275, Outcome::Win, "tennis", 12);
        for _ in 0..10 {
            assert_eq!(calculate_rating_change(1340, 1275, Outcome::Win, "tennis", 12), first);
        }
    }

    #[test]
    fn test_new_players_move_faster() {
        for outcome in [Outcome::Win, Outcome::Loss] {
            let new = calculate_rating_change(1300, 1250, outcome, "soccer", 5);
            let established = calculate_rating_change(1300, 1250, outcome, "soccer", 50);
            assert!(new.abs() > established.abs());
        }
    }

    #[test]
    fn test_k_factor_tiers() {
        assert_eq!(k_factor("basketball", 0), 48.0);
        assert_eq!(k_factor("basketball", 9), 48.0);
        assert!((k_factor("basketball", 10) - 38.4).abs() < 1e-9);
        assert!((k_factor("basketball", 29) - 38.4).abs() < 1e-9);
        assert_eq!(k_factor("basketball", 30), 32.0);
    }

    #[test]
    fn test_large_team_sports_swing_less() {
        assert!(k_factor("soccer", 50) < k_factor("basketball", 50));
        assert!(k_factor("tennis", 50) > k_factor("basketball", 50));
    }

    #[test]
    fn test_unknown_sport_uses_default_profile() {
        assert_eq!(k_factor("quidditch", 50), 32.0);
    }

    #[test]
    fn test_underdog_win_gains_more() {
        let upset = calculate_rating_change(1100, 1500, Outcome::Win, "basketball", 50);
        let expected_win = calculate_rating_change(1500, 1100, Outcome::Win, "basketball", 50);
        assert!(upset > expected_win);
    }

    #[test]
    fn test_expected_score_symmetry() {
        let a = expected_score(1400, 1250);
        let b = expected_score(1250, 1400);
        assert!((a + b - 1.0).abs() < 1e-12);
        assert!((expected_score(1200, 1200) - 0.5).abs() < 1e-12);
    }

    // get_skill_level tests
    #[test]
    fn test_skill_levels_basketball() {
        assert_eq!(get_skill_level(900, "basketball"), SkillLevel::Beginner);
        assert_eq!(get_skill_level(1100, "basketball"), SkillLevel::Intermediate);
        assert_eq!(get_skill_level(1349, "basketball"), SkillLevel::Intermediate);
        assert_eq!(get_skill_level(1350, "basketball"), SkillLevel::Advanced);
        assert_eq!(get_skill_level(1600, "basketball"), SkillLevel::Competitive);
    }

    #[test]
    fn test_skill_levels_follow_sport_threshold() {
        assert_eq!(get_skill_level(1520, "baseball"), SkillLevel::Competitive);
        assert_eq!(get_skill_level(1520, "tennis"), SkillLevel::Advanced);
    }

    // update_player_rating tests
    #[tokio::test]
    async fn test_update_creates_rating_lazily() {
        let store = MemoryStore::new();
        let engine = RatingEngine::new(store.clone());
        let player = Uuid::new_v4();

        let update = engine
            .update_player_rating(player, "basketball", 1200, Outcome::Win)
            .await
            .unwrap();

        assert_eq!(update.old_rating, 1200);
        assert_eq!(update.new_rating, 1224);
        let saved = store.rating_of(player, "basketball").unwrap();
        assert_eq!(saved.elo_rating, 1224);
        assert_eq!(saved.games_played, 1);
        assert_eq!(saved.wins, 1);
        assert_eq!(saved.losses, 0);
    }

    #[tokio::test]
    async fn test_rating_never_drops_below_floor() {
        let store = MemoryStore::new();
        let engine = RatingEngine::new(store.clone());
        let player = Uuid::new_v4();
        store.set_rating(player, "tennis", 105, 3);

        for _ in 0..20 {
            let update = engine
                .update_player_rating(player, "tennis", 105, Outcome::Loss)
                .await
                .unwrap();
            assert!(update.new_rating >= RATING_FLOOR);
        }

        let saved = store.rating_of(player, "tennis").unwrap();
        assert_eq!(saved.elo_rating, RATING_FLOOR);
        assert_eq!(saved.losses, 20);
        assert_eq!(saved.games_played, 23);
    }

    #[tokio::test]
    async fn test_floor_limits_reported_delta() {
        let store = MemoryStore::new();
        let engine = RatingEngine::new(store.clone());
        let player = Uuid::new_v4();
        store.set_rating(player, "basketball", 110, 50);

        let update = engine
            .update_player_rating(player, "basketball", 110, Outcome::Loss)
            .await
            .unwrap();

        assert_eq!(update.new_rating, 100);
        assert_eq!(update.delta, -10);
    }

    #[tokio::test]
    async fn test_update_propagates_store_failure() {
        let store = MemoryStore::new();
        store.with(|s| s.fail = true);
        let engine = RatingEngine::new(store);

        let result = engine
            .update_player_rating(Uuid::new_v4(), "basketball", 1200, Outcome::Win)
            .await;
        assert!(matches!(result, Err(common::Error::Database(_))));
    }

    // record_activity_result tests
    #[tokio::test]
    async fn test_two_new_players_basketball() {
        let store = MemoryStore::new();
        let engine = RatingEngine::new(store.clone());
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();

        let result = engine
            .record_activity_result(
                Uuid::new_v4(),
                ResultType::Completed,
                decisive(vec![a], vec![b]),
                Some(a),
            )
            .await
            .unwrap();

        assert_eq!(store.rating_of(a, "basketball").unwrap().elo_rating, 1224);
        assert_eq!(store.rating_of(b, "basketball").unwrap().elo_rating, 1176);
        assert_eq!(result.elo_changes[&a], 24);
        assert_eq!(result.elo_changes[&b], -24);
        assert_eq!(result.recorded_by, Some(a));
    }

    #[tokio::test]
    async fn test_equal_ratings_give_symmetric_deltas() {
        let store = MemoryStore::new();
        let engine = RatingEngine::new(store.clone());
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        store.set_rating(a, "basketball", 1450, 40);
        store.set_rating(b, "basketball", 1450, 40);

        let result = engine
            .record_activity_result(
                Uuid::new_v4(),
                ResultType::Completed,
                decisive(vec![a], vec![b]),
                None,
            )
            .await
            .unwrap();

        assert_eq!(result.elo_changes[&a], -result.elo_changes[&b]);
        assert_eq!(result.elo_changes[&a], 16);
    }

    #[tokio::test]
    async fn test_team_result_uses_side_averages_before_updates() {
        let store = MemoryStore::new();
        let engine = RatingEngine::new(store.clone());
        let (w1, w2, l1, l2) = (Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());
        store.set_rating(w1, "basketball", 1300, 50);
        store.set_rating(w2, "basketball", 1100, 50);
        store.set_rating(l1, "basketball", 1250, 50);
        store.set_rating(l2, "basketball", 1150, 50);

        let result = engine
            .record_activity_result(
                Uuid::new_v4(),
                ResultType::Completed,
                decisive(vec![w1, w2], vec![l1, l2]),
                None,
            )
            .await
            .unwrap();

        // Both sides average 1200
        assert_eq!(
            result.elo_changes[&w1],
            calculate_rating_change(1300, 1200, Outcome::Win, "basketball", 50)
        );
        assert_eq!(
            result.elo_changes[&w2],
            calculate_rating_change(1100, 1200, Outcome::Win, "basketball", 50)
        );
        assert_eq!(
            result.elo_changes[&l1],
            calculate_rating_change(1250, 1200, Outcome::Loss, "basketball", 50)
        );
        assert_eq!(
            result.elo_changes[&l2],
            calculate_rating_change(1150, 1200, Outcome::Loss, "basketball", 50)
        );
        assert_eq!(result.elo_changes.len(), 4);
    }

    #[tokio::test]
    async fn test_draw_updates_everyone_against_overall_average() {
        let store = MemoryStore::new();
        let engine = RatingEngine::new(store.clone());
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        store.set_rating(a, "tennis", 1300, 50);
        store.set_rating(b, "tennis", 1100, 50);

        let result = engine
            .record_activity_result(
                Uuid::new_v4(),
                ResultType::Completed,
                ResultInput {
                    sport: "tennis".to_string(),
                    participants: vec![a, b],
                    winners: vec![],
                    losers: vec![],
                    is_draw: true,
                },
                None,
            )
            .await
            .unwrap();

        assert!(result.is_draw);
        assert!(result.elo_changes[&a] < 0);
        assert!(result.elo_changes[&b] > 0);
        let a_rating = store.rating_of(a, "tennis").unwrap();
        assert_eq!(a_rating.draws, 1);
        assert_eq!(a_rating.wins, 0);
    }

    #[tokio::test]
    async fn test_cancelled_result_changes_no_ratings() {
        let store = MemoryStore::new();
        let engine = RatingEngine::new(store.clone());
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();

        let result = engine
            .record_activity_result(
                Uuid::new_v4(),
                ResultType::Cancelled,
                decisive(vec![a], vec![b]),
                None,
            )
            .await
            .unwrap();

        assert!(result.elo_changes.is_empty());
        assert!(store.rating_of(a, "basketball").is_none());
        assert_eq!(store.with(|s| s.results.len()), 1);
    }

    #[tokio::test]
    async fn test_second_recording_is_rejected() {
        let store = MemoryStore::new();
        let engine = RatingEngine::new(store.clone());
        let game = Uuid::new_v4();
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();

        engine
            .record_activity_result(game, ResultType::Completed, decisive(vec![a], vec![b]), None)
            .await
            .unwrap();
        let again = engine
            .record_activity_result(game, ResultType::Completed, decisive(vec![a], vec![b]), None)
            .await;

        assert!(matches!(again, Err(common::Error::Conflict(_))));
        assert_eq!(store.rating_of(a, "basketball").unwrap().games_played, 1);
    }

    #[tokio::test]
    async fn test_decisive_result_missing_side_changes_nothing() {
        let store = MemoryStore::new();
        let engine = RatingEngine::new(store.clone());
        let a = Uuid::new_v4();

        let result = engine
            .record_activity_result(
                Uuid::new_v4(),
                ResultType::Completed,
                decisive(vec![a], vec![]),
                None,
            )
            .await
            .unwrap();

        assert!(result.elo_changes.is_empty());
        assert_eq!(store.with(|s| s.rating_writes), 0);
    }

    #[tokio::test]
    async fn test_leaderboard_ranks_by_rating() {
        let store = MemoryStore::new();
        let engine = RatingEngine::new(store.clone());
        let (a, b, c) = (Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());
        store.set_rating(a, "soccer", 1250, 10);
        store.set_rating(b, "soccer", 1480, 10);
        store.set_rating(c, "soccer", 1300, 0);

        let board = engine.leaderboard("soccer", 10).await.unwrap();

        assert_eq!(board.len(), 2);
        assert_eq!(board[0].rank, 1);
        assert_eq!(board[0].rating.user_id, b);
        assert_eq!(board[1].rating.user_id, a);
    }
}
