//! Dashboard statistics service

use chrono::NaiveDate;
use uuid::Uuid;

use crate::{
    api::stats::StatsResponse,
    error::AppResult,
    models::book::BookDetails,
    penalty::StatusLabel,
    repository::Repository,
};

#[derive(Clone)]
pub struct StatsService {
    repository: Repository,
}

impl StatsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Dashboard counters for a user's shelf as of the given date.
    ///
    /// Counters are folded from freshly derived views rather than stored
    /// aggregates, so they can never drift from the raw dates.
    pub async fn get_stats(&self, owner_id: Uuid, as_of: NaiveDate) -> AppResult<StatsResponse> {
        let books = self.repository.books.list_by_owner(owner_id).await?;

        let details: Vec<BookDetails> = books
            .into_iter()
            .map(|b| BookDetails::derive(b, as_of))
            .collect();

        Ok(Self::fold(&details))
    }

    fn fold(details: &[BookDetails]) -> StatsResponse {
        let mut stats = StatsResponse {
            total: details.len() as i64,
            ..Default::default()
        };

        for d in details {
            if d.has_label(StatusLabel::Returned) {
                stats.returned += 1;
                continue;
            }
            stats.borrowed += 1;
            if d.has_label(StatusLabel::DueSoon) {
                stats.due_soon += 1;
            }
            if d.has_label(StatusLabel::Overdue) {
                stats.overdue += 1;
            }
            // Returned books carry no penalty, so this only ever adds
            // accruals on books still out.
            stats.total_penalty += d.penalty;
        }

        stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::book::{Book, LendStatus};
    use chrono::{DateTime, Utc};

    fn book(status: LendStatus, deadline: NaiveDate, as_of: NaiveDate) -> BookDetails {
        BookDetails::derive(
            Book {
                id: Uuid::nil(),
                owner_id: Uuid::nil(),
                title: "A Fine Balance".to_string(),
                borrower_name: "Meera".to_string(),
                borrowed_date: deadline - chrono::Duration::days(7),
                return_deadline: deadline,
                returned_date: (status == LendStatus::Returned).then_some(as_of),
                status,
                created_at: DateTime::<Utc>::MIN_UTC,
            },
            as_of,
        )
    }

    #[test]
    fn test_fold_counters() {
        let as_of = NaiveDate::from_ymd_opt(2024, 1, 16).unwrap();
        let details = vec![
            // 6 days overdue: 35 units
            book(LendStatus::Borrowed, NaiveDate::from_ymd_opt(2024, 1, 10).unwrap(), as_of),
            // due in 2 days
            book(LendStatus::Borrowed, NaiveDate::from_ymd_opt(2024, 1, 18).unwrap(), as_of),
            // comfortably out
            book(LendStatus::Borrowed, NaiveDate::from_ymd_opt(2024, 2, 16).unwrap(), as_of),
            // returned, long past its deadline: no penalty counted
            book(LendStatus::Returned, NaiveDate::from_ymd_opt(2023, 12, 1).unwrap(), as_of),
        ];

        let stats = StatsService::fold(&details);
        assert_eq!(stats.total, 4);
        assert_eq!(stats.borrowed, 3);
        assert_eq!(stats.returned, 1);
        assert_eq!(stats.due_soon, 1);
        assert_eq!(stats.overdue, 1);
        assert_eq!(stats.total_penalty, 35);
    }

    #[test]
    fn test_fold_empty_shelf() {
        let stats = StatsService::fold(&[]);
        assert_eq!(stats.total, 0);
        assert_eq!(stats.total_penalty, 0);
    }
}
