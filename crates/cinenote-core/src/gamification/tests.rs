use super::*;
use chrono::{Duration, FixedOffset};
use cinenote_models::{ColorVariant, Language, MovieDetails, StarRating};

fn jakarta() -> FixedOffset {
    FixedOffset::east_opt(7 * 3600).unwrap()
}

fn now() -> DateTime<FixedOffset> {
    jakarta().with_ymd_and_hms(2024, 6, 15, 10, 0, 0).unwrap()
}

/// Millis for `days_ago` days before `now()` at the given local hour
fn day_at(days_ago: i64, hour: u32) -> i64 {
    let date = now().date_naive() - Duration::days(days_ago);
    let naive = date.and_hms_opt(hour, 0, 0).unwrap();
    jakarta().from_local_datetime(&naive).single().unwrap().timestamp_millis()
}

fn create_review(created_at: i64) -> Review {
    Review {
        id: format!("r{}", created_at),
        movie_id: "m".to_string(),
        movie_details: MovieDetails {
            title: "Paprika".to_string(),
            year: "2006".to_string(),
            director: "Satoshi Kon".to_string(),
            genres: vec!["Animation".to_string()],
            plot: "Dream detective.".to_string(),
            rating: None,
            poster_url: None,
            external_id: None,
        },
        user_rating: StarRating::new(4).unwrap(),
        content: String::new(),
        created_at,
        color_variant: ColorVariant::Blue,
    }
}

fn reviews(count: usize) -> Vec<Review> {
    (0..count).map(|i| create_review(day_at(400 + i as i64, 12))).collect()
}

fn engine(policy: MaxRankPolicy) -> GamificationEngine {
    GamificationEngine::new(MilestoneTable::builtin(Language::En), policy)
}

#[test]
fn test_empty_collection_is_baseline() {
    let state = engine(MaxRankPolicy::Doubling).compute_at(&[], &now());
    assert_eq!(state.role, "newbie");
    assert_eq!(state.level, 0);
    assert_eq!(state.next_milestone, 25);
    assert_eq!(state.progress, 0.0);
    assert_eq!(state.streak, 0);
}

#[test]
fn test_progress_between_milestones() {
    let state = engine(MaxRankPolicy::Doubling).compute_at(&reviews(30), &now());
    assert_eq!(state.role, "casual_viewer");
    assert_eq!(state.next_milestone, 50);
    assert!((state.progress - 20.0).abs() < 1e-9);
}

#[test]
fn test_progress_is_zero_on_exact_threshold() {
    let engine = engine(MaxRankPolicy::Doubling);
    for threshold in [25usize, 50, 75, 100] {
        let state = engine.compute_at(&reviews(threshold), &now());
        assert_eq!(state.progress, 0.0, "threshold {}", threshold);
    }
}

#[test]
fn test_rank_is_monotonic_and_progress_bounded() {
    let engine = engine(MaxRankPolicy::Doubling);
    let collection = reviews(300);
    let mut previous_level = 0;
    for count in 0..=collection.len() {
        let state = engine.compute_at(&collection[..count], &now());
        assert!(state.level >= previous_level);
        assert!((0.0..=100.0).contains(&state.progress));
        previous_level = state.level;
    }
}

#[test]
fn test_max_rank_doubling() {
    let engine = engine(MaxRankPolicy::Doubling);

    let at_top = engine.compute_at(&reviews(250), &now());
    assert_eq!(at_top.role, "cinema_god");
    assert_eq!(at_top.next_milestone, 500);
    assert_eq!(at_top.progress, 0.0);

    let beyond = engine.compute_at(&reviews(300), &now());
    assert_eq!(beyond.next_milestone, 600);
    // (300 - 250) / (600 - 250)
    assert!((beyond.progress - 50.0 / 350.0 * 100.0).abs() < 1e-9);
    assert_eq!(films_to_next(&beyond, 300), Some(300));
}

#[test]
fn test_max_rank_pinned() {
    let engine = engine(MaxRankPolicy::Pinned);
    let state = engine.compute_at(&reviews(260), &now());
    assert_eq!(state.next_milestone, 250);
    assert_eq!(state.progress, 100.0);
    assert_eq!(films_to_next(&state, 260), None);
}

#[test]
fn test_single_tier_table() {
    let table = MilestoneTable::new(vec![Milestone {
        threshold: 0,
        role: "viewer".to_string(),
        title: "Viewer".to_string(),
        description: String::new(),
    }])
    .unwrap();
    let engine = GamificationEngine::new(table, MaxRankPolicy::Doubling);
    let state = engine.compute_at(&[], &now());
    assert_eq!(state.next_milestone, 0);
    assert_eq!(state.progress, 0.0);
}

#[test]
fn test_ladder_statuses() {
    let ladder = engine(MaxRankPolicy::Doubling).ladder(60);
    assert_eq!(ladder[0].status, RankStatus::Unlocked);
    assert_eq!(ladder[1].status, RankStatus::Unlocked);
    assert_eq!(ladder[2].status, RankStatus::Current);
    assert_eq!(ladder[3].status, RankStatus::Locked);
    assert_eq!(ladder[10].status, RankStatus::Locked);
}

#[test]
fn test_streak_three_consecutive_days() {
    let stamps = [day_at(0, 9), day_at(1, 22), day_at(2, 1)];
    assert_eq!(streak_at(stamps, &now()), 3);
}

#[test]
fn test_streak_gap_stops_walk() {
    assert_eq!(streak_at([day_at(0, 9), day_at(2, 9)], &now()), 1);
}

#[test]
fn test_streak_alive_from_yesterday() {
    assert_eq!(streak_at([day_at(1, 20)], &now()), 1);
}

#[test]
fn test_streak_broken_after_two_days() {
    assert_eq!(streak_at([day_at(2, 20)], &now()), 0);
}

#[test]
fn test_streak_empty() {
    assert_eq!(streak_at(Vec::<i64>::new(), &now()), 0);
}

#[test]
fn test_streak_same_day_counts_once() {
    let stamps = [day_at(0, 8), day_at(0, 9), day_at(0, 23), day_at(1, 7)];
    assert_eq!(streak_at(stamps, &now()), 2);
}

#[test]
fn test_streak_uses_evaluation_time_zone() {
    // 23:30 local on the 14th is still the 14th in UTC+7 but 16:30 UTC
    let late_yesterday = jakarta()
        .with_ymd_and_hms(2024, 6, 14, 23, 30, 0)
        .unwrap()
        .timestamp_millis();
    // 00:30 local on the 15th is 17:30 UTC on the 14th
    let early_today = jakarta()
        .with_ymd_and_hms(2024, 6, 15, 0, 30, 0)
        .unwrap()
        .timestamp_millis();
    assert_eq!(streak_at([late_yesterday, early_today], &now()), 2);

    let utc_now = now().with_timezone(&chrono::Utc);
    assert_eq!(streak_at([late_yesterday, early_today], &utc_now), 1);
}

#[test]
fn test_future_review_does_not_count_as_today() {
    assert_eq!(streak_at([day_at(-3, 9)], &now()), 0);
}

#[test]
fn test_compute_is_idempotent() {
    let engine = engine(MaxRankPolicy::Doubling);
    let collection: Vec<Review> = (0..5).map(|d| create_review(day_at(d, 12))).collect();
    let first = engine.compute_at(&collection, &now());
    let second = engine.compute_at(&collection, &now());
    assert_eq!(first, second);
    assert_eq!(first.streak, 5);
}
