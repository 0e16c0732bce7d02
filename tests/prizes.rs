//! Integration tests for the prize split check and displayed prize amounts.

use tournament_admin::render::{prize_amounts, tournament_card};
use tournament_admin::{
    is_valid_distribution, parse_percentage, prize_feedback, FormFields, Prizes, RecordId,
    TournamentDraft, TournamentRecord,
};

#[test]
fn valid_iff_total_is_exactly_one_hundred() {
    for first in -20..=120 {
        for second in [-10, 0, 15, 30, 50] {
            for third in [0, 20, 35] {
                assert_eq!(
                    is_valid_distribution(first, second, third),
                    first + second + third == 100
                );
            }
        }
    }
}

#[test]
fn non_numeric_input_counts_as_zero() {
    assert_eq!(parse_percentage(""), 0);
    assert_eq!(parse_percentage("abc"), 0);
    assert_eq!(parse_percentage("40%"), 40);
    assert_eq!(parse_percentage("-5"), -5);

    let fields = FormFields {
        first_prize: "100".into(),
        second_prize: "".into(),
        third_prize: "n/a".into(),
        ..FormFields::blank()
    };
    assert_eq!(fields.prizes(), Prizes::new(100, 0, 0));

    let feedback = prize_feedback(100, 0, 0);
    assert!(feedback.valid);
    assert_eq!(feedback.border_color, "#10b981");
    assert_eq!(prize_feedback(50, 30, 10).border_color, "#ef4444");
}

fn tournament(prize_pool: i64, prizes: Prizes) -> TournamentRecord {
    let draft = TournamentDraft {
        title: "Cup".into(),
        subtitle: "Finals".into(),
        prize_pool,
        prizes,
        ..TournamentDraft::default()
    };
    TournamentRecord::create(RecordId::Seq(1), draft, chrono::Utc::now())
}

#[test]
fn fifty_thirty_twenty_on_ten_thousand() {
    let t = tournament(10_000, Prizes::new(50, 30, 20));
    assert_eq!(prize_amounts(t.prize_pool, &t.prizes), (5000, 3000, 2000));
    let card = tournament_card(&t);
    assert!(card.contains("$5,000"));
    assert!(card.contains("$3,000"));
    assert!(card.contains("$2,000"));
}

#[test]
fn thirty_four_thirty_three_thirty_three_on_one_hundred() {
    assert!(is_valid_distribution(34, 33, 33));
    assert_eq!(prize_amounts(100, &Prizes::new(34, 33, 33)), (34, 33, 33));
}

#[test]
fn independent_rounding_is_not_corrected() {
    // 33.3 + 33.3 + 33.3 rounds to 99 of 100
    let (a, b, c) = prize_amounts(10, &Prizes::new(34, 33, 33));
    assert_eq!((a, b, c), (3, 3, 3));
    assert_ne!(a + b + c, 10);
}

#[test]
fn extreme_percentages_never_overflow() {
    assert!(!is_valid_distribution(i64::MAX, 1, 0));
    assert!(is_valid_distribution(i64::MAX, 1, 100 - i64::MAX - 1));
    let feedback = prize_feedback(i64::MAX, i64::MAX, 0);
    assert!(!feedback.valid);
    assert_eq!(feedback.total, i64::MAX);
}
