//! Penalty and lending-status engine.
//!
//! Pure calendar-date arithmetic: every function takes an explicit `as_of`
//! date supplied by the caller at the boundary, so nothing in here reads the
//! system clock. Working on `NaiveDate` (whole calendar days, no time of day)
//! means the overdue count and the due-in count are exact negations of each
//! other, so a book's penalty and its status badge can never disagree.

use chrono::NaiveDate;

use crate::{
    error::{AppError, AppResult},
    models::book::LendStatus,
};

/// Overdue days charged at the lower rate before the higher rate kicks in.
pub const FIRST_TIER_DAYS: i64 = 5;
/// Units charged per day within the first tier.
pub const FIRST_TIER_RATE: i64 = 5;
/// Units charged per day beyond the first tier.
pub const SECOND_TIER_RATE: i64 = 10;
/// A book due within this many days is flagged as due soon.
pub const DUE_SOON_WINDOW_DAYS: i64 = 3;

/// Presentation urgency tier, never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Default,
    Success,
    Warning,
    Destructive,
}

/// Derived lending-state label. `DueSoon`, `Overdue` and `Borrowed` are
/// refinements of the persisted `borrowed` status, recomputed on every read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, utoipa::ToSchema)]
pub enum StatusLabel {
    Borrowed,
    DueSoon,
    Overdue,
    Returned,
}

impl std::fmt::Display for StatusLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            StatusLabel::Borrowed => "Borrowed",
            StatusLabel::DueSoon => "Due Soon",
            StatusLabel::Overdue => "Overdue",
            StatusLabel::Returned => "Returned",
        };
        write!(f, "{}", label)
    }
}

/// Label plus its presentation tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, utoipa::ToSchema)]
pub struct StatusBadge {
    pub label: StatusLabel,
    pub severity: Severity,
}

/// Accrued late-return penalty in currency-agnostic units.
///
/// Returned books never accrue: the guard lives here rather than in every
/// caller. The first [`FIRST_TIER_DAYS`] overdue days cost
/// [`FIRST_TIER_RATE`] units each, every day beyond that
/// [`SECOND_TIER_RATE`].
pub fn calculate_penalty(deadline: NaiveDate, status: LendStatus, as_of: NaiveDate) -> i64 {
    if status == LendStatus::Returned {
        return 0;
    }

    let days_overdue = (as_of - deadline).num_days();
    if days_overdue <= 0 {
        return 0;
    }

    let first_tier = days_overdue.min(FIRST_TIER_DAYS);
    let remaining = (days_overdue - FIRST_TIER_DAYS).max(0);

    first_tier * FIRST_TIER_RATE + remaining * SECOND_TIER_RATE
}

/// Status badge for a book as of the given date.
pub fn book_status(deadline: NaiveDate, status: LendStatus, as_of: NaiveDate) -> StatusBadge {
    if status == LendStatus::Returned {
        return StatusBadge {
            label: StatusLabel::Returned,
            severity: Severity::Success,
        };
    }

    let days_until_due = (deadline - as_of).num_days();

    if days_until_due < 0 {
        StatusBadge {
            label: StatusLabel::Overdue,
            severity: Severity::Destructive,
        }
    } else if days_until_due <= DUE_SOON_WINDOW_DAYS {
        StatusBadge {
            label: StatusLabel::DueSoon,
            severity: Severity::Warning,
        }
    } else {
        StatusBadge {
            label: StatusLabel::Borrowed,
            severity: Severity::Default,
        }
    }
}

/// Human-readable countdown, e.g. `"2 days left"` or `"Overdue by 1 day"`.
pub fn days_display(deadline: NaiveDate, status: LendStatus, as_of: NaiveDate) -> String {
    if status == LendStatus::Returned {
        return "Returned".to_string();
    }

    let days_until_due = (deadline - as_of).num_days();

    if days_until_due < 0 {
        let days_overdue = -days_until_due;
        format!("Overdue by {} day{}", days_overdue, plural(days_overdue))
    } else {
        format!("{} day{} left", days_until_due, plural(days_until_due))
    }
}

/// Lending progress percentage for display: elapsed share of the loan
/// period, clamped to 0..=100. Returned books always show 100.
pub fn progress(
    borrowed: NaiveDate,
    deadline: NaiveDate,
    status: LendStatus,
    as_of: NaiveDate,
) -> u8 {
    if status == LendStatus::Returned {
        return 100;
    }

    let total_days = (deadline - borrowed).num_days();
    if total_days <= 0 {
        // Same-day deadline: the period is over as soon as it starts.
        return 100;
    }

    let elapsed = (as_of - borrowed).num_days();
    let pct = (elapsed as f64 / total_days as f64 * 100.0).round();
    pct.clamp(0.0, 100.0) as u8
}

/// Fixed "D Mon YYYY" rendering, e.g. `"16 Jan 2024"`.
pub fn format_date(date: NaiveDate) -> String {
    date.format("%-d %b %Y").to_string()
}

/// Parse an ISO 8601 calendar date (`YYYY-MM-DD`), failing fast on
/// malformed input instead of propagating garbage into the arithmetic.
pub fn parse_date(s: &str) -> AppResult<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map_err(|_| AppError::Validation(format!("Invalid date '{}'. Use YYYY-MM-DD", s)))
}

fn plural(n: i64) -> &'static str {
    if n == 1 {
        ""
    } else {
        "s"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_no_penalty_on_or_before_deadline() {
        let deadline = d(2024, 1, 10);
        assert_eq!(calculate_penalty(deadline, LendStatus::Borrowed, d(2024, 1, 1)), 0);
        assert_eq!(calculate_penalty(deadline, LendStatus::Borrowed, d(2024, 1, 9)), 0);
        assert_eq!(calculate_penalty(deadline, LendStatus::Borrowed, d(2024, 1, 10)), 0);
    }

    #[test]
    fn test_penalty_tier_boundary() {
        let deadline = d(2024, 1, 10);
        // 5 overdue days at 5 each
        assert_eq!(calculate_penalty(deadline, LendStatus::Borrowed, d(2024, 1, 15)), 25);
        // 6th day switches to the 10-unit rate
        assert_eq!(calculate_penalty(deadline, LendStatus::Borrowed, d(2024, 1, 16)), 35);
    }

    #[test]
    fn test_penalty_first_day() {
        let deadline = d(2024, 1, 10);
        assert_eq!(calculate_penalty(deadline, LendStatus::Borrowed, d(2024, 1, 11)), 5);
    }

    #[test]
    fn test_penalty_monotonic() {
        let deadline = d(2024, 1, 10);
        let mut last = 0;
        for offset in 0..30 {
            let as_of = deadline + chrono::Duration::days(offset);
            let p = calculate_penalty(deadline, LendStatus::Borrowed, as_of);
            assert!(p >= last, "penalty decreased at day {}", offset);
            last = p;
        }
    }

    #[test]
    fn test_penalty_returned_short_circuits() {
        let deadline = d(2024, 1, 10);
        assert_eq!(calculate_penalty(deadline, LendStatus::Returned, d(2024, 6, 1)), 0);
    }

    #[test]
    fn test_status_returned_wins_over_any_date() {
        let badge = book_status(d(2020, 1, 1), LendStatus::Returned, d(2024, 1, 1));
        assert_eq!(badge.label, StatusLabel::Returned);
        assert_eq!(badge.severity, Severity::Success);
    }

    #[test]
    fn test_status_boundaries() {
        let deadline = d(2024, 1, 10);
        // 3 days until due -> due soon; 4 -> borrowed; -1 -> overdue
        assert_eq!(book_status(deadline, LendStatus::Borrowed, d(2024, 1, 7)).label, StatusLabel::DueSoon);
        assert_eq!(book_status(deadline, LendStatus::Borrowed, d(2024, 1, 6)).label, StatusLabel::Borrowed);
        assert_eq!(book_status(deadline, LendStatus::Borrowed, d(2024, 1, 11)).label, StatusLabel::Overdue);
    }

    #[test]
    fn test_status_severity_tiers() {
        let deadline = d(2024, 1, 10);
        assert_eq!(book_status(deadline, LendStatus::Borrowed, d(2024, 1, 6)).severity, Severity::Default);
        assert_eq!(book_status(deadline, LendStatus::Borrowed, d(2024, 1, 8)).severity, Severity::Warning);
        assert_eq!(book_status(deadline, LendStatus::Borrowed, d(2024, 1, 12)).severity, Severity::Destructive);
    }

    #[test]
    fn test_days_display_pluralization() {
        let deadline = d(2024, 1, 10);
        assert_eq!(days_display(deadline, LendStatus::Borrowed, d(2024, 1, 9)), "1 day left");
        assert_eq!(days_display(deadline, LendStatus::Borrowed, d(2024, 1, 8)), "2 days left");
        assert_eq!(days_display(deadline, LendStatus::Borrowed, d(2024, 1, 11)), "Overdue by 1 day");
        assert_eq!(days_display(deadline, LendStatus::Returned, d(2024, 1, 11)), "Returned");
    }

    #[test]
    fn test_end_to_end_overdue_scenario() {
        // Six days past the deadline on a borrowed book
        let deadline = d(2024, 1, 10);
        let as_of = d(2024, 1, 16);
        assert_eq!(calculate_penalty(deadline, LendStatus::Borrowed, as_of), 35);
        assert_eq!(book_status(deadline, LendStatus::Borrowed, as_of).label, StatusLabel::Overdue);
        assert_eq!(days_display(deadline, LendStatus::Borrowed, as_of), "Overdue by 6 days");
    }

    #[test]
    fn test_deadline_day_convention() {
        // Calendar-date arithmetic: on the deadline itself there are 0 days
        // until due, which falls in the due-soon window, and no penalty yet.
        let deadline = d(2024, 1, 10);
        assert_eq!(calculate_penalty(deadline, LendStatus::Borrowed, deadline), 0);
        assert_eq!(book_status(deadline, LendStatus::Borrowed, deadline).label, StatusLabel::DueSoon);
        assert_eq!(days_display(deadline, LendStatus::Borrowed, deadline), "0 days left");
    }

    #[test]
    fn test_penalty_and_status_agree() {
        // The label is Overdue exactly when the penalty is positive.
        let deadline = d(2024, 1, 10);
        for offset in -10..10 {
            let as_of = deadline + chrono::Duration::days(offset);
            let penalty = calculate_penalty(deadline, LendStatus::Borrowed, as_of);
            let label = book_status(deadline, LendStatus::Borrowed, as_of).label;
            assert_eq!(penalty > 0, label == StatusLabel::Overdue, "disagreement at offset {}", offset);
        }
    }

    #[test]
    fn test_progress() {
        let borrowed = d(2024, 1, 1);
        let deadline = d(2024, 1, 11);
        assert_eq!(progress(borrowed, deadline, LendStatus::Borrowed, d(2024, 1, 1)), 0);
        assert_eq!(progress(borrowed, deadline, LendStatus::Borrowed, d(2024, 1, 6)), 50);
        assert_eq!(progress(borrowed, deadline, LendStatus::Borrowed, d(2024, 1, 11)), 100);
        // Clamped past the deadline and before the borrow date
        assert_eq!(progress(borrowed, deadline, LendStatus::Borrowed, d(2024, 2, 1)), 100);
        assert_eq!(progress(borrowed, deadline, LendStatus::Borrowed, d(2023, 12, 25)), 0);
        // Returned always reads complete
        assert_eq!(progress(borrowed, deadline, LendStatus::Returned, d(2024, 1, 3)), 100);
        // Same-day loan period
        assert_eq!(progress(borrowed, borrowed, LendStatus::Borrowed, borrowed), 100);
    }

    #[test]
    fn test_format_date() {
        assert_eq!(format_date(d(2024, 1, 16)), "16 Jan 2024");
        assert_eq!(format_date(d(2023, 12, 5)), "5 Dec 2023");
    }

    #[test]
    fn test_parse_date() {
        assert_eq!(parse_date("2024-01-16").unwrap(), d(2024, 1, 16));
        assert!(parse_date("16/01/2024").is_err());
        assert!(parse_date("not-a-date").is_err());
        assert!(parse_date("2024-02-30").is_err());
    }
}
